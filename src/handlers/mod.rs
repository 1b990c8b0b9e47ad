mod print;
mod upload;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use warp::http::StatusCode;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::app::{notify_job, JobRecord, PrintLog};
use crate::error::AppError;
use crate::models::PrintResponse;
use crate::services::PrinterService;

pub use print::{
    handle_print_barcode, handle_print_image, handle_print_image_url, handle_print_qr,
    handle_print_text, handle_status,
};
pub use upload::handle_upload_image;

/// Everything a print handler needs, cloned into each request.
#[derive(Clone)]
pub struct PrintContext {
    pub service: PrinterService,
    pub print_log: Arc<Mutex<PrintLog>>,
    pub upload_folder: PathBuf,
    pub notify: bool,
}

impl PrintContext {
    pub fn new(
        service: PrinterService,
        print_log: Arc<Mutex<PrintLog>>,
        upload_folder: PathBuf,
        notify: bool,
    ) -> Self {
        Self {
            service,
            print_log,
            upload_folder,
            notify,
        }
    }

    /// Records the outcome of a job received on `endpoint` and turns it
    /// into the reply.
    fn complete(
        &self,
        endpoint: &str,
        detail: String,
        result: Result<(), AppError>,
        success: &str,
        failure: &str,
    ) -> WithStatus<Json> {
        let (record, reply) = match result {
            Ok(()) => (
                JobRecord::printed(endpoint, detail),
                with_status(json(&PrintResponse::success(success)), StatusCode::OK),
            ),
            Err(e) => {
                log::error!("{} {}: {}", endpoint, failure, e);
                let status = e.status_code();
                (
                    JobRecord::failed(endpoint, detail, status.as_u16(), e.to_string()),
                    with_status(json(&e.to_response(failure)), status),
                )
            }
        };

        if self.notify {
            notify_job(&record.detail, record.error.as_deref());
        }
        if let Ok(mut log) = self.print_log.lock() {
            log.record(record);
        }
        reply
    }
}

fn invalid(message: &str) -> WithStatus<Json> {
    with_status(json(&PrintResponse::error(message)), StatusCode::BAD_REQUEST)
}

/// Missing and empty fields are rejected alike.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
