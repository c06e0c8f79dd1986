// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(crate::domain::DomainError),

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Result requested before the job reached `completed`
    #[error("Job is not completed yet. Current status: {0}")]
    NotCompleted(crate::domain::JobStatus),

    #[error("Failed to load output file: {0}")]
    OutputUnavailable(#[source] Box<AppError>),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::ExecutionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Domain validation failures surface as plain validation errors
impl From<crate::domain::DomainError> for AppError {
    fn from(err: crate::domain::DomainError) -> Self {
        match err {
            crate::domain::DomainError::ValidationError(msg) => AppError::Validation(msg),
            other => AppError::Domain(other),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
