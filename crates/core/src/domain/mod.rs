// Domain Layer - Pure business logic and entities

pub mod error;
pub mod job;
pub mod sequence;

// Re-exports
pub use error::DomainError;
pub use job::{InferenceParams, JobId, JobMetadata, JobRecord, JobStatus, JobSummary};
pub use sequence::{parse_devices, ProteinSequence};
