// Submit Use Cases (file and sequence)

use crate::application::prediction::PredictionService;
use crate::domain::{
    parse_devices, InferenceParams, JobMetadata, JobRecord, JobStatus, ProteinSequence,
};
use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Submit a structure file (already base64-encoded by the client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFileRequest {
    pub content: String,
    pub filename: String,
    pub recycling_steps: u32,
    pub sampling_steps: u32,
    /// Comma-separated device ids, e.g. "0,1"
    pub devices: String,
    pub diffusion_samples: u32,
}

/// Submit a raw amino-acid sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSequenceRequest {
    pub sequence: String,
    pub chain_id: String,
    pub recycling_steps: u32,
    pub sampling_steps: u32,
    pub devices: String,
    pub diffusion_samples: u32,
}

/// Accepted submission, returned before inference starts
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

fn inference_params(
    devices: &str,
    recycling_steps: u32,
    sampling_steps: u32,
    diffusion_samples: u32,
) -> Result<InferenceParams> {
    Ok(InferenceParams {
        devices: parse_devices(devices)?,
        recycling_steps,
        sampling_steps,
        diffusion_samples,
    })
}

/// Execute file submission
///
/// The device list is parsed before anything is written, so a malformed list
/// leaves no upload behind.
pub async fn submit_file(service: &PredictionService, req: SubmitFileRequest) -> Result<Submission> {
    let params = inference_params(
        &req.devices,
        req.recycling_steps,
        req.sampling_steps,
        req.diffusion_samples,
    )?;

    let input_path = service.artifacts.save_input(&req.content, &req.filename).await?;
    let metadata = JobMetadata::for_file(req.filename.clone(), params);
    let job = enqueue(service, input_path, metadata).await?;

    Ok(Submission {
        job_id: job.id,
        status: JobStatus::Queued,
        message: format!(
            "Prediction job started for {}. Use check_job_status() to monitor progress.",
            req.filename
        ),
    })
}

/// Execute sequence submission
///
/// Validation runs first: an invalid sequence produces no file and no job.
pub async fn submit_sequence(
    service: &PredictionService,
    req: SubmitSequenceRequest,
) -> Result<Submission> {
    let sequence = ProteinSequence::parse(&req.sequence)?;
    let params = inference_params(
        &req.devices,
        req.recycling_steps,
        req.sampling_steps,
        req.diffusion_samples,
    )?;

    let fasta = sequence.to_fasta(&req.chain_id);
    let filename = format!(
        "sequence_{}.fasta",
        service.id_provider.generate_id(sequence.as_str())
    );
    let encoded = STANDARD.encode(fasta.as_bytes());

    let input_path = service.artifacts.save_input(&encoded, &filename).await?;
    let metadata = JobMetadata {
        filename,
        sequence_length: Some(sequence.len()),
        chain_id: Some(req.chain_id.clone()),
        params,
    };
    let job = enqueue(service, input_path, metadata).await?;

    Ok(Submission {
        job_id: job.id,
        status: JobStatus::Queued,
        message: format!(
            "Prediction job started for sequence (length: {}). Use check_job_status() to monitor progress.",
            sequence.len()
        ),
    })
}

/// Mint an id, register the queued job and schedule its invoker without awaiting it
async fn enqueue(
    service: &PredictionService,
    input_path: PathBuf,
    metadata: JobMetadata,
) -> Result<JobRecord> {
    let seed = format!("{}_{}", metadata.filename, service.time_provider.now_seed());
    let job_id = service.id_provider.generate_id(&seed);
    let params = metadata.params.clone();

    let job = JobRecord::new(job_id, input_path, metadata, service.time_provider.now());
    service.registry.insert(&job).await?;

    info!(
        job_id = %job.id,
        filename = %job.metadata.filename,
        "Job queued"
    );

    // Detached; the runtime owns the task from here
    drop(service.invoker.spawn(job.id.clone(), params));

    Ok(job)
}
