// Query Use Cases (status, result, listing)

use crate::application::prediction::PredictionService;
use crate::domain::{JobRecord, JobStatus, JobSummary};
use crate::error::{AppError, Result};
use crate::port::job_registry::require;
use serde::Serialize;

/// Default page size for `list_jobs`
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Encoded output of a completed job
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Base64-encoded structure file
    pub cif_content: String,
    /// Base name of the output file
    pub filename: String,
    pub job_info: JobRecord,
}

/// Recent jobs plus the registry size
#[derive(Debug, Clone, Serialize)]
pub struct JobList {
    pub jobs: Vec<JobSummary>,
    pub total: usize,
}

pub async fn get_status(service: &PredictionService, job_id: &str) -> Result<JobRecord> {
    require(service.registry.as_ref(), job_id).await
}

/// Load the output of a completed job
///
/// # Errors
/// - NotFound for an unknown id
/// - NotCompleted while the job is queued, running or failed
/// - OutputUnavailable if the recorded output cannot be read
pub async fn get_result(service: &PredictionService, job_id: &str) -> Result<PredictionResult> {
    let job = require(service.registry.as_ref(), job_id).await?;

    let output_path = match (job.status(), job.output_path()) {
        (JobStatus::Completed, Some(path)) => path.to_path_buf(),
        (status, _) => return Err(AppError::NotCompleted(status)),
    };

    let cif_content = service
        .artifacts
        .load_output(&output_path)
        .await
        .map_err(|e| AppError::OutputUnavailable(Box::new(e)))?;

    let filename = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(PredictionResult {
        cif_content,
        filename,
        job_info: job,
    })
}

pub async fn list_jobs(service: &PredictionService, limit: usize) -> Result<JobList> {
    let jobs = service.registry.list_recent(limit).await?;
    let total = service.registry.count().await?;

    Ok(JobList {
        jobs: jobs.iter().map(JobSummary::from).collect(),
        total,
    })
}
