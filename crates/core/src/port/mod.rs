// Port Layer - Interfaces for external dependencies

pub mod artifact_store;
pub mod id_provider; // Job identity (deterministic)
pub mod inference_runner;
pub mod job_registry;
pub mod system_probe;
pub mod time_provider;

// Re-exports
pub use artifact_store::ArtifactStore;
pub use id_provider::{IdProvider, Sha256IdProvider};
pub use inference_runner::{
    ExecutionError, ExecutionResult, ExecutionStatus, InferenceRequest, InferenceRunner,
};
pub use job_registry::JobRegistry;
pub use system_probe::{Accelerator, AcceleratorInfo, DiskUsage, SystemProbe};
pub use time_provider::{SystemTimeProvider, TimeProvider};
