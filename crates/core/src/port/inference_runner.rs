// Inference Runner Port
// Abstraction for launching the external structure-prediction binary

use crate::domain::InferenceParams;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Everything the runner needs for one prediction
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub job_id: String,
    pub input_path: PathBuf,
    /// Per-job output directory (`<outputs>/<job_id>`)
    pub output_dir: PathBuf,
    pub params: InferenceParams,
}

/// Result of a finished child process
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub duration_ms: i64,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Execution status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    /// Non-zero exit; carries the captured standard error verbatim
    #[error("{stderr}")]
    NonZeroExit { exit_code: Option<i32>, stderr: String },

    #[error("No CIF output file found after prediction")]
    MissingOutput,
}

/// Inference Runner trait
///
/// Implementations:
/// - BoltzRunner: spawns the Boltz CLI as a child process
#[async_trait]
pub trait InferenceRunner: Send + Sync {
    /// Run one prediction to completion and report how the process ended
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the binary cannot be started
    /// - ExecutionError::IoError if waiting on the child fails
    async fn run(&self, request: &InferenceRequest) -> Result<ExecutionResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 after writing these files (relative to the job output dir)
        Success(Vec<String>),
        /// Exit 1 with this stderr
        Fail(String),
        /// Spawning the binary fails
        SpawnError(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock Inference Runner for testing
    pub struct MockInferenceRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        requests: Arc<Mutex<Vec<InferenceRequest>>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockInferenceRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                requests: Arc::new(Mutex::new(Vec::new())),
                gate: None,
            }
        }

        /// Succeeds with a single `predictions/<stem>/<stem>_model_0.cif`
        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success(vec![
                "predictions/input/input_model_0.cif".to_string(),
            ]))
        }

        pub fn new_fail(stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(stderr.into()))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        /// Block every run until the returned handle is notified
        pub fn gated(mut self) -> (Self, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            self.gate = Some(gate.clone());
            (self, gate)
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<InferenceRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn write_outputs(dir: &Path, files: &[String]) -> Result<(), ExecutionError> {
        for rel in files {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ExecutionError::IoError(e.to_string()))?;
            }
            tokio::fs::write(&path, b"data_mock\n")
                .await
                .map_err(|e| ExecutionError::IoError(e.to_string()))?;
        }
        Ok(())
    }

    #[async_trait]
    impl InferenceRunner for MockInferenceRunner {
        async fn run(&self, request: &InferenceRequest) -> Result<ExecutionResult, ExecutionError> {
            self.requests.lock().unwrap().push(request.clone());

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success(files) => {
                    write_outputs(&request.output_dir, &files).await?;
                    Ok(ExecutionResult {
                        status: ExecutionStatus::Success,
                        duration_ms: 100,
                        exit_code: Some(0),
                        stdout: "mock output".to_string(),
                        stderr: String::new(),
                    })
                }
                MockBehavior::Fail(stderr) => Ok(ExecutionResult {
                    status: ExecutionStatus::Failed,
                    duration_ms: 100,
                    exit_code: Some(1),
                    stdout: String::new(),
                    stderr,
                }),
                MockBehavior::SpawnError(msg) => Err(ExecutionError::SpawnFailed(msg)),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
