// Job Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::error::{DomainError, Result};

/// Job ID (16 hex chars, see `port::id_provider`)
pub type JobId = String;

/// Job Status
///
/// Transitions only along `Queued -> Running -> {Completed, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters forwarded to the inference binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceParams {
    pub devices: Vec<u32>,
    pub recycling_steps: u32,
    pub sampling_steps: u32,
    pub diffusion_samples: u32,
}

impl InferenceParams {
    /// Only the number of devices reaches the binary, never the ids themselves
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            devices: vec![0],
            recycling_steps: 3,
            sampling_steps: 200,
            diffusion_samples: 1,
        }
    }
}

/// Submission metadata, immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    pub params: InferenceParams,
}

impl JobMetadata {
    pub fn for_file(filename: impl Into<String>, params: InferenceParams) -> Self {
        Self {
            filename: filename.into(),
            sequence_length: None,
            chain_id: None,
            params,
        }
    }
}

/// Job Entity
///
/// Lifecycle fields are private so the invariants hold at every observable point:
/// `output_path` is set iff `Completed`, `error` is set iff `Failed`.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    #[serde(rename = "job_id")]
    pub id: JobId,
    status: JobStatus,
    pub input_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<PathBuf>,

    pub created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(flatten)]
    pub metadata: JobMetadata,
}

impl JobRecord {
    /// Create a new queued job
    ///
    /// # Arguments
    ///
    /// * `id` - Job ID (injected, not generated)
    /// * `input_path` - Saved input artifact
    /// * `metadata` - Submission metadata
    /// * `created_at` - Creation time (injected, not system time)
    pub fn new(
        id: impl Into<String>,
        input_path: impl Into<PathBuf>,
        metadata: JobMetadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            input_path: input_path.into(),
            output_path: None,
            created_at,
            started_at: None,
            completed_at: None,
            error: None,
            metadata,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Transition to Running
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_status(JobStatus::Queued, JobStatus::Running)?;
        self.status = JobStatus::Running;
        self.started_at = Some(now);
        Ok(())
    }

    /// Transition to Completed with the selected output artifact
    pub fn complete(&mut self, output_path: impl Into<PathBuf>, now: DateTime<Utc>) -> Result<()> {
        self.ensure_status(JobStatus::Running, JobStatus::Completed)?;
        self.status = JobStatus::Completed;
        self.output_path = Some(output_path.into());
        self.completed_at = Some(now);
        Ok(())
    }

    /// Transition to Failed, recording the error text verbatim
    pub fn fail(&mut self, error: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        self.ensure_status(JobStatus::Running, JobStatus::Failed)?;
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(now);
        Ok(())
    }

    fn ensure_status(&self, expected: JobStatus, to: JobStatus) -> Result<()> {
        if self.status != expected {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }
}

/// Condensed view used by `list_jobs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub status: JobStatus,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl From<&JobRecord> for JobSummary {
    fn from(job: &JobRecord) -> Self {
        Self {
            job_id: job.id.clone(),
            status: job.status,
            filename: job.metadata.filename.clone(),
            created_at: job.created_at,
        }
    }
}
