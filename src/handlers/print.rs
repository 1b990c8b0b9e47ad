use std::convert::Infallible;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use warp::Reply;

use super::{invalid, required, PrintContext};
use crate::models::{
    BarcodePrintSchema, ImageDataSchema, ImageUrlSchema, QrPrintSchema, TextPrintSchema,
};
use crate::services::PrintJob;

pub async fn handle_status(ctx: PrintContext) -> Result<impl Reply, Infallible> {
    Ok(format!(
        "ESC/POS print API - Printer type: {}",
        ctx.service.target().kind()
    ))
}

pub async fn handle_print_text(
    ctx: PrintContext,
    body: TextPrintSchema,
) -> Result<impl Reply, Infallible> {
    let Some(message) = required(body.message) else {
        return Ok(invalid("'message' field is required"));
    };

    let job = PrintJob::Text(message);
    let detail = job.summary();
    let result = ctx.service.print(job).await;
    Ok(ctx.complete(
        "/print",
        detail,
        result,
        "Text printed successfully",
        "Failed to print text",
    ))
}

pub async fn handle_print_qr(
    ctx: PrintContext,
    body: QrPrintSchema,
) -> Result<impl Reply, Infallible> {
    let Some(data) = required(body.data) else {
        return Ok(invalid("'data' field is required for QR"));
    };

    let job = PrintJob::Qr(data);
    let detail = job.summary();
    let result = ctx.service.print(job).await;
    Ok(ctx.complete(
        "/print/qr",
        detail,
        result,
        "QR code printed successfully",
        "Failed to print QR code",
    ))
}

pub async fn handle_print_barcode(
    ctx: PrintContext,
    body: BarcodePrintSchema,
) -> Result<impl Reply, Infallible> {
    let Some(data) = required(body.data) else {
        return Ok(invalid("'data' field required for barcode"));
    };

    let job = PrintJob::Barcode(data);
    let detail = job.summary();
    let result = ctx.service.print(job).await;
    Ok(ctx.complete(
        "/print/barcode",
        detail,
        result,
        "Barcode printed successfully",
        "Failed to print barcode",
    ))
}

pub async fn handle_print_image(
    ctx: PrintContext,
    body: ImageDataSchema,
) -> Result<impl Reply, Infallible> {
    let Some(image_data) = required(body.image_data) else {
        return Ok(invalid("'image_data' field is required for image"));
    };
    let Ok(bytes) = STANDARD.decode(image_data.as_bytes()) else {
        return Ok(invalid("Invalid base64-encoded image"));
    };

    let job = PrintJob::Image(bytes);
    let detail = job.summary();
    let result = ctx.service.print(job).await;
    Ok(ctx.complete(
        "/print/image",
        detail,
        result,
        "Image printed successfully",
        "Failed to print image",
    ))
}

pub async fn handle_print_image_url(
    ctx: PrintContext,
    body: ImageUrlSchema,
) -> Result<impl Reply, Infallible> {
    let Some(image_url) = required(body.image_url) else {
        return Ok(invalid("'image_url' field is required"));
    };

    let result = ctx.service.print_image_url(&image_url).await;
    Ok(ctx.complete(
        "/print/image-url",
        image_url,
        result,
        "Image printed successfully from URL",
        "Failed to print image from URL",
    ))
}
