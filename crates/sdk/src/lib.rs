//! Boltz SDK - Rust Client Library
//!
//! Typed client for the Boltz prediction server's JSON-RPC interface.
//!
//! # Example
//!
//! ```no_run
//! use boltz_sdk::{BoltzClient, PredictFromSequenceRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BoltzClient::connect("http://127.0.0.1:8000").await?;
//!
//!     let submitted = client
//!         .predict_from_sequence(PredictFromSequenceRequest::new("MKTAYIAKQRQ"))
//!         .await?;
//!
//!     let job = client
//!         .wait_for_completion(&submitted.job_id, Duration::from_secs(5), Duration::from_secs(3600))
//!         .await?;
//!     println!("Job {} finished: {}", job.job_id, job.status);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::BoltzClient;
pub use error::{Result, SdkError};
pub use types::{
    Accelerator, DiskUsage, InferenceOptions, JobInfo, JobList, JobParams, JobStatus, JobSummary,
    PredictFromPdbRequest, PredictFromSequenceRequest, PredictionResult, ServerInfo,
    SubmitResponse,
};
