use std::convert::Infallible;

use bytes::BufMut;
use futures_util::TryStreamExt;
use warp::multipart::FormData;
use warp::reply::{json, with_status};
use warp::Reply;

use super::{invalid, PrintContext};
use crate::error::AppError;
use crate::services::PrintJob;

const IMAGE_PART: &str = "image";

struct UploadedImage {
    filename: String,
    data: Vec<u8>,
}

pub async fn handle_upload_image(
    ctx: PrintContext,
    form: FormData,
) -> Result<impl Reply, Infallible> {
    let upload = match read_image_part(form).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return Ok(invalid("No file part")),
        Err(e) => {
            return Ok(with_status(
                json(&e.to_response("Failed to read upload")),
                e.status_code(),
            ))
        }
    };

    let filename = secure_filename(&upload.filename);
    if filename.is_empty() {
        return Ok(invalid("No selected file"));
    }

    let path = ctx.upload_folder.join(&filename);
    if let Err(e) = tokio::fs::write(&path, &upload.data).await {
        let e = AppError::from(e);
        log::error!("Failed to save upload {:?}: {}", path, e);
        return Ok(with_status(
            json(&e.to_response("Failed to save image")),
            e.status_code(),
        ));
    }
    log::info!("Saved upload {:?} ({} bytes)", path, upload.data.len());

    let result = ctx.service.print(PrintJob::Image(upload.data)).await;
    Ok(ctx.complete(
        "/print/upload-image",
        filename,
        result,
        "Image printed successfully",
        "Failed to print image",
    ))
}

/// First part named `image`, if any.
async fn read_image_part(form: FormData) -> Result<Option<UploadedImage>, AppError> {
    let mut form = std::pin::pin!(form);
    while let Some(part) = form
        .try_next()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        if part.name() != IMAGE_PART {
            continue;
        }

        let filename = part.filename().unwrap_or_default().to_string();
        let mut data = Vec::new();
        let mut stream = std::pin::pin!(part.stream());
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?
        {
            data.put(chunk);
        }

        return Ok(Some(UploadedImage { filename, data }));
    }
    Ok(None)
}

/// Keeps the final path component, restricted to `[A-Za-z0-9._-]`, with
/// whitespace turned into `_` and leading dots removed.
fn secure_filename(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
