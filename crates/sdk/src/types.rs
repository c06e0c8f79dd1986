//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate. Optional request fields
//! left as `None` fall back to the server defaults.

use serde::{Deserialize, Serialize};

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Inference knobs shared by both submission kinds
#[derive(Debug, Clone, Default, Serialize)]
pub struct InferenceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycling_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_steps: Option<u32>,
    /// Comma-separated device ids, e.g. `"0,1"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffusion_samples: Option<u32>,
}

/// predict_structure_from_pdb
#[derive(Debug, Clone, Serialize)]
pub struct PredictFromPdbRequest {
    /// Base64-encoded structure file
    pub pdb_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub options: InferenceOptions,
}

impl PredictFromPdbRequest {
    pub fn new(pdb_content: impl Into<String>) -> Self {
        Self {
            pdb_content: pdb_content.into(),
            filename: None,
            options: InferenceOptions::default(),
        }
    }
}

/// predict_structure_from_sequence
#[derive(Debug, Clone, Serialize)]
pub struct PredictFromSequenceRequest {
    pub sequence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(flatten)]
    pub options: InferenceOptions,
}

impl PredictFromSequenceRequest {
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            chain_id: None,
            options: InferenceOptions::default(),
        }
    }
}

/// Accepted submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

/// Inference parameters recorded on a job
#[derive(Debug, Clone, Deserialize)]
pub struct JobParams {
    pub devices: Vec<u32>,
    pub recycling_steps: u32,
    pub sampling_steps: u32,
    pub diffusion_samples: u32,
}

/// Full job record (check_job_status, `job_info` of a result)
#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    pub job_id: String,
    pub status: JobStatus,
    pub input_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// RFC 3339
    pub created_at: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub sequence_length: Option<usize>,
    #[serde(default)]
    pub chain_id: Option<String>,
    pub params: JobParams,
}

/// get_prediction_result
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResult {
    /// Base64-encoded structure file
    pub cif_content: String,
    pub filename: String,
    pub job_info: JobInfo,
}

/// One row of list_jobs
#[derive(Debug, Clone, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub status: JobStatus,
    pub filename: String,
    pub created_at: String,
}

/// list_jobs
#[derive(Debug, Clone, Deserialize)]
pub struct JobList {
    pub jobs: Vec<JobSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Accelerator {
    pub index: u32,
    pub name: String,
}

/// get_server_info
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub server: String,
    pub version: String,
    pub rpc_framework: String,
    pub upload_dir: String,
    pub output_dir: String,
    pub model_cache_dir: String,
    #[serde(default)]
    pub disk_usage: Option<DiskUsage>,
    pub gpu_info: String,
    #[serde(default)]
    pub accelerators: Vec<Accelerator>,
    pub max_upload_size_mb: f64,
    pub active_jobs: usize,
    pub total_jobs: usize,
}
