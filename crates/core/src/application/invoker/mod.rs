// Invoker - background inference task per job

mod panic_guard;

pub use panic_guard::{describe_join_error, panic_message};

use crate::domain::{InferenceParams, JobRecord, JobStatus};
use crate::error::{AppError, Result};
use crate::port::job_registry::require;
use crate::port::{
    ArtifactStore, ExecutionError, ExecutionStatus, InferenceRequest, InferenceRunner,
    JobRegistry, TimeProvider,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Runs the inference binary for one job and records every lifecycle transition.
///
/// The invoker task bound to a job id is the only writer of that job's record
/// after creation.
pub struct Invoker {
    registry: Arc<dyn JobRegistry>,
    artifacts: Arc<dyn ArtifactStore>,
    runner: Arc<dyn InferenceRunner>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Invoker {
    pub fn new(
        registry: Arc<dyn JobRegistry>,
        artifacts: Arc<dyn ArtifactStore>,
        runner: Arc<dyn InferenceRunner>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            registry,
            artifacts,
            runner,
            time_provider,
        }
    }

    /// Schedule `run` as a detached task
    ///
    /// Callers may drop the handle; the runtime drives the task to completion.
    pub fn spawn(self: &Arc<Self>, job_id: String, params: InferenceParams) -> JoinHandle<()> {
        let invoker = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = invoker.run(&job_id, params).await {
                error!(job_id = %job_id, error = %e, "Invoker bookkeeping failed");
            }
        })
    }

    /// Drive one job from `queued` to a terminal status.
    ///
    /// Inference failures are recorded on the job, not returned. An error is
    /// returned only when the record itself cannot be read or written.
    pub async fn run(&self, job_id: &str, params: InferenceParams) -> Result<JobStatus> {
        let mut job = require(self.registry.as_ref(), job_id).await?;
        job.start(self.time_provider.now())?;
        self.registry.update(&job).await?;

        info!(
            job_id = %job.id,
            input = %job.input_path.display(),
            devices = params.device_count(),
            "Inference started"
        );

        // Isolate panics from the runner: the host process must survive them
        let artifacts = Arc::clone(&self.artifacts);
        let runner = Arc::clone(&self.runner);
        let task_job_id = job.id.clone();
        let input_path = job.input_path.clone();
        let handle = tokio::task::spawn(async move {
            Self::execute_static(artifacts, runner, task_job_id, input_path, params).await
        });

        let outcome = match handle.await {
            Ok(Ok(output_path)) => Ok(output_path),
            Ok(Err(e)) => Err(failure_message(&e)),
            Err(join_err) => Err(describe_join_error(&job.id, join_err)),
        };

        self.finish(&mut job, outcome).await
    }

    async fn finish(
        &self,
        job: &mut JobRecord,
        outcome: std::result::Result<PathBuf, String>,
    ) -> Result<JobStatus> {
        let now = self.time_provider.now();
        match outcome {
            Ok(output_path) => {
                info!(job_id = %job.id, output = %output_path.display(), "Job completed");
                job.complete(output_path, now)?;
            }
            Err(message) => {
                warn!(job_id = %job.id, error = %message, "Job failed");
                job.fail(message, now)?;
            }
        }
        self.registry.update(job).await?;
        Ok(job.status())
    }

    /// Prepare the job directory, run the binary and select the output artifact.
    ///
    /// Exit code zero alone is not trusted: at least one structure file must exist.
    async fn execute_static(
        artifacts: Arc<dyn ArtifactStore>,
        runner: Arc<dyn InferenceRunner>,
        job_id: String,
        input_path: PathBuf,
        params: InferenceParams,
    ) -> Result<PathBuf> {
        let output_dir = artifacts.prepare_job_dir(&job_id).await?;

        let request = InferenceRequest {
            job_id,
            input_path,
            output_dir: output_dir.clone(),
            params,
        };

        let result = runner.run(&request).await?;

        if result.status != ExecutionStatus::Success {
            return Err(ExecutionError::NonZeroExit {
                exit_code: result.exit_code,
                stderr: result.stderr,
            }
            .into());
        }

        // First match in file-system order; no ranking between samples
        let outputs = artifacts.find_structure_files(&output_dir).await?;
        outputs
            .into_iter()
            .next()
            .ok_or_else(|| ExecutionError::MissingOutput.into())
    }
}

/// Error text recorded on a failed job
fn failure_message(err: &AppError) -> String {
    match err {
        // Captured stderr is recorded verbatim
        AppError::Execution(e) => e.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_keeps_stderr_verbatim() {
        let err: AppError = ExecutionError::NonZeroExit {
            exit_code: Some(1),
            stderr: "CUDA out of memory\n".to_string(),
        }
        .into();
        assert_eq!(failure_message(&err), "CUDA out of memory\n");
    }

    #[test]
    fn test_failure_message_for_missing_output() {
        let err: AppError = ExecutionError::MissingOutput.into();
        assert_eq!(
            failure_message(&err),
            "No CIF output file found after prediction"
        );
    }
}
