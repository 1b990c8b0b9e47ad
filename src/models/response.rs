use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Reply body of every print endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PrintResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl PrintResponse {
    pub fn success(message: impl Into<String>) -> Self {
        PrintResponse {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PrintResponse {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}

/// The part of a print reply the panel consumes. Any other field is ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrintResult {
    pub message: String,
}
