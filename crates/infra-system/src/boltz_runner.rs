// Boltz CLI runner
// reason: tokio::process so waiting on the child never blocks the runtime
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

use boltz_core::port::inference_runner::{
    ExecutionError, ExecutionResult, ExecutionStatus, InferenceRequest, InferenceRunner,
};
use boltz_core::port::TimeProvider;

/// Default binary name, resolved through PATH
pub const DEFAULT_BOLTZ_BINARY: &str = "boltz";

/// Runner configuration
#[derive(Debug, Clone)]
pub struct BoltzRunnerConfig {
    /// Binary to execute (name on PATH or absolute path)
    pub binary: PathBuf,
    /// Shared model-weight cache passed as `--cache`
    pub cache_dir: PathBuf,
}

/// Spawns `boltz predict` as a child process per job
///
/// No timeout and no concurrency ceiling: a hung binary keeps its job running.
pub struct BoltzRunner {
    config: BoltzRunnerConfig,
    time_provider: Arc<dyn TimeProvider>,
}

impl BoltzRunner {
    /// Create a new runner
    ///
    /// # Example
    /// ```ignore
    /// let runner = BoltzRunner::new(
    ///     BoltzRunnerConfig { binary: "boltz".into(), cache_dir: "/data/models".into() },
    ///     Arc::new(SystemTimeProvider),
    /// );
    /// ```
    pub fn new(config: BoltzRunnerConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            config,
            time_provider,
        }
    }

    /// Fixed argument contract of `boltz predict`
    ///
    /// Only the device count is forwarded, never the individual ids.
    pub fn build_args(&self, request: &InferenceRequest) -> Vec<String> {
        let params = &request.params;
        vec![
            "predict".to_string(),
            request.input_path.display().to_string(),
            "--out_dir".to_string(),
            request.output_dir.display().to_string(),
            "--devices".to_string(),
            params.device_count().to_string(),
            "--recycling_steps".to_string(),
            params.recycling_steps.to_string(),
            "--sampling_steps".to_string(),
            params.sampling_steps.to_string(),
            "--diffusion_samples".to_string(),
            params.diffusion_samples.to_string(),
            "--cache".to_string(),
            self.config.cache_dir.display().to_string(),
        ]
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(&self, args: &[String]) -> Result<std::process::Output, ExecutionError> {
        let child = Command::new(&self.config.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExecutionError::SpawnFailed(format!("{}: {}", self.config.binary.display(), e))
            })?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))
    }

    /// Build execution result from process output
    fn build_result(&self, output: std::process::Output, duration_ms: i64) -> ExecutionResult {
        let status = if output.status.success() {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Failed
        };

        ExecutionResult {
            status,
            exit_code: output.status.code(),
            duration_ms,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

#[async_trait]
impl InferenceRunner for BoltzRunner {
    async fn run(&self, request: &InferenceRequest) -> Result<ExecutionResult, ExecutionError> {
        let args = self.build_args(request);
        let start_time = self.time_provider.now();

        info!(
            job_id = %request.job_id,
            binary = %self.config.binary.display(),
            args = ?args,
            "Starting Boltz prediction"
        );

        let output = self.spawn_and_wait(&args).await?;

        let duration_ms = (self.time_provider.now() - start_time).num_milliseconds();
        let result = self.build_result(output, duration_ms);

        info!(
            job_id = %request.job_id,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            status = ?result.status,
            "Boltz prediction finished"
        );

        Ok(result)
    }
}
