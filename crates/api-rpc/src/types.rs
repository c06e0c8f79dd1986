//! RPC Request/Response Types
//!
//! Parameters are named (JSON object). Every reply is a flat object carrying
//! `status`, plus either the success fields or `error` and `code`.

use boltz_core::application::prediction::{JobList, PredictionResult};
use boltz_core::application::ServerInfo;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FILENAME: &str = "input.pdb";
pub const DEFAULT_CHAIN_ID: &str = "A";
pub const DEFAULT_DEVICES: &str = "0";
pub const DEFAULT_RECYCLING_STEPS: u32 = 3;
pub const DEFAULT_SAMPLING_STEPS: u32 = 200;
pub const DEFAULT_DIFFUSION_SAMPLES: u32 = 1;

pub const RPC_FRAMEWORK: &str = "jsonrpsee";
pub const SUCCESS: &str = "success";

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

fn default_chain_id() -> String {
    DEFAULT_CHAIN_ID.to_string()
}

fn default_devices() -> String {
    DEFAULT_DEVICES.to_string()
}

fn default_recycling_steps() -> u32 {
    DEFAULT_RECYCLING_STEPS
}

fn default_sampling_steps() -> u32 {
    DEFAULT_SAMPLING_STEPS
}

fn default_diffusion_samples() -> u32 {
    DEFAULT_DIFFUSION_SAMPLES
}

fn default_limit() -> usize {
    boltz_core::application::prediction::DEFAULT_LIST_LIMIT
}

/// predict_structure_from_pdb
#[derive(Debug, Deserialize)]
pub struct PredictFromPdbRequest {
    /// Base64-encoded structure file
    pub pdb_content: String,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_recycling_steps")]
    pub recycling_steps: u32,
    #[serde(default = "default_sampling_steps")]
    pub sampling_steps: u32,
    #[serde(default = "default_devices")]
    pub devices: String,
    #[serde(default = "default_diffusion_samples")]
    pub diffusion_samples: u32,
}

/// predict_structure_from_sequence
#[derive(Debug, Deserialize)]
pub struct PredictFromSequenceRequest {
    pub sequence: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    #[serde(default = "default_recycling_steps")]
    pub recycling_steps: u32,
    #[serde(default = "default_sampling_steps")]
    pub sampling_steps: u32,
    #[serde(default = "default_devices")]
    pub devices: String,
    #[serde(default = "default_diffusion_samples")]
    pub diffusion_samples: u32,
}

/// check_job_status, get_prediction_result
#[derive(Debug, Deserialize)]
pub struct JobIdRequest {
    pub job_id: String,
}

/// list_jobs
#[derive(Debug, Deserialize)]
pub struct ListJobsRequest {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ListJobsRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

/// Failure reply
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    pub status: String,
    pub error: String,
    pub code: i32,
}

/// Success body tagged with `status: "success"`
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            status: SUCCESS,
            body,
        }
    }
}

/// get_server_info body
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfoReply {
    pub rpc_framework: &'static str,
    #[serde(flatten)]
    pub info: ServerInfo,
}

pub type PredictionResultReply = Success<PredictionResult>;
pub type JobListReply = Success<JobList>;

/// Either the success body or an `ErrorReply`, flattened on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Ok(T),
    Err(ErrorReply),
}
