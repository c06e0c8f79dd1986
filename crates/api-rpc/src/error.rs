//! RPC Error Types
//!
//! Maps application errors to reply codes and reply statuses.

use crate::types::ErrorReply;
use boltz_core::error::AppError;
use thiserror::Error;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SYSTEM_ERROR: i32 = 5002;
}

/// Reply statuses used when an operation fails
pub mod status {
    /// Submission rejected
    pub const FAILED: &str = "failed";
    /// No job with the given id
    pub const UNKNOWN: &str = "unknown";
    /// Output load or internal failure
    pub const ERROR: &str = "error";
}

/// Numeric code for an application error
pub fn error_code(err: &AppError) -> i32 {
    match err {
        AppError::Validation(_) | AppError::Domain(_) => code::VALIDATION_ERROR,
        AppError::NotFound(_) => code::NOT_FOUND,
        AppError::Conflict(_) | AppError::NotCompleted(_) => code::CONFLICT,
        AppError::Execution(_) | AppError::Io(_) | AppError::OutputUnavailable(_) => {
            code::SYSTEM_ERROR
        }
        AppError::Internal(_) => code::INTERNAL_ERROR,
    }
}

/// Convert AppError to a failure reply with the given status
pub fn to_error_reply(err: &AppError, status: impl Into<String>) -> ErrorReply {
    ErrorReply {
        status: status.into(),
        error: err.to_string(),
        code: error_code(err),
    }
}

/// Server startup failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to register method: {0}")]
    Register(String),

    #[error("Failed to build server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stdio transport failed: {0}")]
    Stdio(#[from] std::io::Error),
}
