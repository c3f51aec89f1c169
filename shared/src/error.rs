use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Invalid input provided")]
    InvalidInput,
    #[error("Resource not found")]
    NotFound,
    #[error("Resource conflict")]
    Conflict,
    #[error("Validation failed")]
    ValidationFailed,
    #[error("Upstream service call failed")]
    UpstreamFailed,
    #[error("Stores are out of sync")]
    Inconsistent,
    #[error("Internal system error")]
    SystemError,
}

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            status,
        }
    }
}
