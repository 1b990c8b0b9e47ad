use std::convert::Infallible;

use serde::de::DeserializeOwned;
use warp::Filter;

use crate::handlers::{
    handle_print_barcode, handle_print_image, handle_print_image_url, handle_print_qr,
    handle_print_text, handle_status, handle_upload_image, PrintContext,
};

const MAX_JSON_BYTES: u64 = 16 * 1024 * 1024;
const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

fn with_context(
    ctx: PrintContext,
) -> impl Filter<Extract = (PrintContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn json_body<T: DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_JSON_BYTES).and(warp::body::json())
}

pub fn status_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("status")
        .and(warp::get())
        .and(with_context(ctx))
        .and_then(handle_status)
}

pub fn text_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("print")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_context(ctx))
        .and(json_body())
        .and_then(handle_print_text)
}

pub fn qr_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("print" / "qr")
        .and(warp::post())
        .and(with_context(ctx))
        .and(json_body())
        .and_then(handle_print_qr)
}

pub fn barcode_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("print" / "barcode")
        .and(warp::post())
        .and(with_context(ctx))
        .and(json_body())
        .and_then(handle_print_barcode)
}

pub fn image_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("print" / "image")
        .and(warp::post())
        .and(with_context(ctx))
        .and(json_body())
        .and_then(handle_print_image)
}

pub fn image_url_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("print" / "image-url")
        .and(warp::post())
        .and(with_context(ctx))
        .and(json_body())
        .and_then(handle_print_image_url)
}

pub fn upload_route(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("print" / "upload-image")
        .and(warp::post())
        .and(with_context(ctx))
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and_then(handle_upload_image)
}

pub fn print_routes(
    ctx: PrintContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    status_route(ctx.clone())
        .or(text_route(ctx.clone()))
        .or(qr_route(ctx.clone()))
        .or(barcode_route(ctx.clone()))
        .or(image_route(ctx.clone()))
        .or(image_url_route(ctx.clone()))
        .or(upload_route(ctx))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::{json, Value};
    use warp::http::StatusCode;

    use crate::app::PrintLog;
    use crate::handlers::PrintContext;
    use crate::routes::routes;
    use crate::services::{one_pixel_png, PrinterService, PrinterTarget};

    fn context_with_uploads(upload_folder: PathBuf) -> PrintContext {
        PrintContext::new(
            PrinterService::new(PrinterTarget::Console).unwrap(),
            Arc::new(Mutex::new(PrintLog::new(10))),
            upload_folder,
            false,
        )
    }

    fn console_context() -> PrintContext {
        context_with_uploads(std::env::temp_dir())
    }

    async fn post(ctx: &PrintContext, path: &str, body: Value) -> (StatusCode, Value) {
        let response = warp::test::request()
            .method("POST")
            .path(path)
            .json(&body)
            .reply(&routes(ctx.clone()))
            .await;
        let value = serde_json::from_slice(response.body()).unwrap();
        (response.status(), value)
    }

    #[tokio::test]
    async fn test_print_text() {
        let ctx = console_context();
        let (status, body) = post(&ctx, "/print", json!({ "message": "Hello" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "success", "message": "Text printed successfully" })
        );

        let log = ctx.print_log.lock().unwrap();
        let record = log.recent().next().unwrap();
        assert_eq!(record.endpoint, "/print");
        assert_eq!(record.detail, "Text: Hello");
        assert_eq!(record.http_status, 200);
        assert!(record.succeeded());
    }

    #[tokio::test]
    async fn test_print_text_requires_message() {
        let ctx = console_context();

        let (status, body) = post(&ctx, "/print", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "status": "error", "message": "'message' field is required" })
        );

        let (status, _) = post(&ctx, "/print", json!({ "message": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(ctx.print_log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_print_qr() {
        let ctx = console_context();
        let (status, body) = post(&ctx, "/print/qr", json!({ "data": "https://example.com" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "QR code printed successfully");

        let (status, body) = post(&ctx, "/print/qr", json!({ "data": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "'data' field is required for QR");
    }

    #[tokio::test]
    async fn test_print_barcode_requires_data() {
        let ctx = console_context();
        let (status, body) = post(&ctx, "/print/barcode", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "'data' field required for barcode");
    }

    #[tokio::test]
    async fn test_print_barcode() {
        let ctx = console_context();
        let (status, body) = post(&ctx, "/print/barcode", json!({ "data": "4006381333931" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Barcode printed successfully");
    }

    #[tokio::test]
    async fn test_print_barcode_rejects_non_digits() {
        let ctx = console_context();
        let (status, body) = post(&ctx, "/print/barcode", json!({ "data": "abc" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to print barcode: Invalid input"));

        let log = ctx.print_log.lock().unwrap();
        let record = log.recent().next().unwrap();
        assert_eq!(record.endpoint, "/print/barcode");
        assert_eq!(record.http_status, 400);
    }

    #[tokio::test]
    async fn test_print_image() {
        let ctx = console_context();
        let image_data = STANDARD.encode(one_pixel_png());
        let (status, body) = post(&ctx, "/print/image", json!({ "image_data": image_data })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "success", "message": "Image printed successfully" })
        );
    }

    #[tokio::test]
    async fn test_print_image_rejects_bad_base64() {
        let ctx = console_context();

        let (status, body) = post(&ctx, "/print/image", json!({ "image_data": "%%%" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid base64-encoded image");

        let (status, body) = post(&ctx, "/print/image", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "'image_data' field is required for image");
    }

    #[tokio::test]
    async fn test_print_image_url_download_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let ctx = console_context();
        let (status, body) = post(
            &ctx,
            "/print/image-url",
            json!({ "image_url": format!("http://{}/logo.png", addr) }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to print image from URL: Download error"));

        let log = ctx.print_log.lock().unwrap();
        let record = log.recent().next().unwrap();
        assert_eq!(record.endpoint, "/print/image-url");
        assert_eq!(record.http_status, 502);
        assert!(!record.succeeded());
    }

    #[tokio::test]
    async fn test_print_image_url_requires_url() {
        let ctx = console_context();
        let (status, body) = post(&ctx, "/print/image-url", json!({ "image_url": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "'image_url' field is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_error() {
        let ctx = console_context();
        let response = warp::test::request()
            .method("POST")
            .path("/print")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&routes(ctx))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid input"));
    }

    #[tokio::test]
    async fn test_status() {
        let response = warp::test::request()
            .method("GET")
            .path("/status")
            .reply(&routes(console_context()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.body().as_ref(),
            b"ESC/POS print API - Printer type: console"
        );
    }

    fn multipart(parts: &str) -> warp::test::RequestBuilder {
        warp::test::request()
            .method("POST")
            .path("/print/upload-image")
            .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
            .body(format!("{}--XBOUNDARY--\r\n", parts))
    }

    #[tokio::test]
    async fn test_upload_saves_and_prints() {
        let folder = std::env::temp_dir().join(format!("print-uploads-{}", std::process::id()));
        std::fs::create_dir_all(&folder).unwrap();
        let ctx = context_with_uploads(folder.clone());

        let png = one_pixel_png();
        let mut body = b"--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"my logo.png\"\r\n\
            Content-Type: image/png\r\n\r\n"
            .to_vec();
        body.extend_from_slice(&png);
        body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

        let response = warp::test::request()
            .method("POST")
            .path("/print/upload-image")
            .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
            .body(body)
            .reply(&routes(ctx.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let reply: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(reply["message"], "Image printed successfully");

        let saved = folder.join("my_logo.png");
        assert_eq!(std::fs::read(&saved).unwrap(), png);

        let log = ctx.print_log.lock().unwrap();
        let record = log.recent().next().unwrap();
        assert_eq!(record.endpoint, "/print/upload-image");
        assert_eq!(record.detail, "my_logo.png");

        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[tokio::test]
    async fn test_upload_without_image_part() {
        let response = multipart(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n",
        )
        .reply(&routes(console_context()))
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "No file part");
    }

    #[tokio::test]
    async fn test_upload_without_filename() {
        let response = multipart(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"image\"; filename=\"\"\r\nContent-Type: image/png\r\n\r\nabc\r\n",
        )
        .reply(&routes(console_context()))
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "No selected file");
    }
}
