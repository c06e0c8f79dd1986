//! RPC Method Handlers
//!
//! Converts wire requests into service calls and every outcome into a reply.

use crate::error::{status, to_error_reply};
use crate::types::{
    JobIdRequest, JobListReply, ListJobsRequest, PredictFromPdbRequest,
    PredictFromSequenceRequest, PredictionResultReply, Reply, ServerInfoReply, Success,
    RPC_FRAMEWORK,
};
use boltz_core::application::prediction::{
    SubmitFileRequest, SubmitSequenceRequest, Submission,
};
use boltz_core::application::PredictionService;
use boltz_core::domain::JobRecord;
use boltz_core::error::AppError;
use std::sync::Arc;
use tracing::warn;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<PredictionService>,
}

impl RpcHandler {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self { service }
    }

    /// predict_structure_from_pdb
    pub async fn predict_from_pdb(&self, params: PredictFromPdbRequest) -> Reply<Submission> {
        let req = SubmitFileRequest {
            content: params.pdb_content,
            filename: params.filename,
            recycling_steps: params.recycling_steps,
            sampling_steps: params.sampling_steps,
            devices: params.devices,
            diffusion_samples: params.diffusion_samples,
        };

        match self.service.submit_file(req).await {
            Ok(submission) => Reply::Ok(submission),
            Err(e) => failed("predict_structure_from_pdb", &e, status::FAILED),
        }
    }

    /// predict_structure_from_sequence
    pub async fn predict_from_sequence(
        &self,
        params: PredictFromSequenceRequest,
    ) -> Reply<Submission> {
        let req = SubmitSequenceRequest {
            sequence: params.sequence,
            chain_id: params.chain_id,
            recycling_steps: params.recycling_steps,
            sampling_steps: params.sampling_steps,
            devices: params.devices,
            diffusion_samples: params.diffusion_samples,
        };

        match self.service.submit_sequence(req).await {
            Ok(submission) => Reply::Ok(submission),
            Err(e) => failed("predict_structure_from_sequence", &e, status::FAILED),
        }
    }

    /// check_job_status
    pub async fn check_job_status(&self, params: JobIdRequest) -> Reply<JobRecord> {
        match self.service.get_status(&params.job_id).await {
            Ok(job) => Reply::Ok(job),
            Err(e) => failed("check_job_status", &e, lookup_status(&e)),
        }
    }

    /// get_prediction_result
    pub async fn get_prediction_result(&self, params: JobIdRequest) -> Reply<PredictionResultReply> {
        match self.service.get_result(&params.job_id).await {
            Ok(result) => Reply::Ok(Success::new(result)),
            Err(e) => failed("get_prediction_result", &e, lookup_status(&e)),
        }
    }

    /// list_jobs
    pub async fn list_jobs(&self, params: ListJobsRequest) -> Reply<JobListReply> {
        match self.service.list_jobs(params.limit).await {
            Ok(list) => Reply::Ok(Success::new(list)),
            Err(e) => failed("list_jobs", &e, status::ERROR),
        }
    }

    /// get_server_info
    pub async fn get_server_info(&self) -> Reply<Success<ServerInfoReply>> {
        match self.service.server_info().await {
            Ok(info) => Reply::Ok(Success::new(ServerInfoReply {
                rpc_framework: RPC_FRAMEWORK,
                info,
            })),
            Err(e) => failed("get_server_info", &e, status::ERROR),
        }
    }
}

/// Reply status for lookups by job id
///
/// Unknown ids report `unknown`; an unfinished job reports its current status.
fn lookup_status(err: &AppError) -> String {
    match err {
        AppError::NotFound(_) => status::UNKNOWN.to_string(),
        AppError::NotCompleted(current) => current.as_str().to_string(),
        _ => status::ERROR.to_string(),
    }
}

fn failed<T>(method: &str, err: &AppError, status: impl Into<String>) -> Reply<T> {
    let reply = to_error_reply(err, status);
    warn!(method = %method, status = %reply.status, error = %reply.error, "RPC call failed");
    Reply::Err(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boltz_core::domain::JobStatus;

    #[test]
    fn test_lookup_status_mapping() {
        assert_eq!(
            lookup_status(&AppError::NotFound("Job ID x not found".into())),
            "unknown"
        );
        assert_eq!(
            lookup_status(&AppError::NotCompleted(JobStatus::Queued)),
            "queued"
        );
        assert_eq!(
            lookup_status(&AppError::NotCompleted(JobStatus::Failed)),
            "failed"
        );
        assert_eq!(lookup_status(&AppError::Internal("boom".into())), "error");
    }
}
