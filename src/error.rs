use std::fmt;

use escpos::errors::PrinterError;
use warp::http::StatusCode;

use crate::models::PrintResponse;

/// Errors raised while serving a print job.
#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    PrinterError(String),
    Download(String),
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Download(_) => StatusCode::BAD_GATEWAY,
            AppError::PrinterError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Reply body for a failed job, prefixed with what was being attempted.
    pub fn to_response(&self, context: &str) -> PrintResponse {
        PrintResponse::error(format!("{}: {}", context, self))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::PrinterError(msg) => write!(f, "Printer error: {}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<PrinterError> for AppError {
    fn from(e: PrinterError) -> Self {
        match e {
            PrinterError::Input(msg) => AppError::InvalidInput(msg),
            PrinterError::InvalidResponse(msg) => AppError::PrinterError(msg),
            PrinterError::Io(msg) => AppError::PrinterError(msg),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Download(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// The single failure kind seen by the print panel: transport errors and
/// unreadable reply bodies alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    details: String,
}

impl RequestFailure {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.details)
    }
}

impl std::error::Error for RequestFailure {}

impl From<reqwest::Error> for RequestFailure {
    fn from(e: reqwest::Error) -> Self {
        RequestFailure::new(e.to_string())
    }
}

impl From<serde_json::Error> for RequestFailure {
    fn from(e: serde_json::Error) -> Self {
        RequestFailure::new(e.to_string())
    }
}
