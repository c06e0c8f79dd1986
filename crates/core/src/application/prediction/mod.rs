// Prediction Service - the public operations behind the RPC surface

pub mod query;
pub mod submit;

pub use query::{JobList, PredictionResult, DEFAULT_LIST_LIMIT};
pub use submit::{SubmitFileRequest, SubmitSequenceRequest, Submission};

use crate::application::invoker::Invoker;
use crate::application::server_info::{self, ServerInfo};
use crate::domain::JobRecord;
use crate::error::Result;
use crate::port::{ArtifactStore, IdProvider, JobRegistry, SystemProbe, TimeProvider};
use std::sync::Arc;

/// Prediction Service
///
/// Owns handles to every port; constructed once in the composition root and
/// shared by all request handlers.
pub struct PredictionService {
    registry: Arc<dyn JobRegistry>,
    artifacts: Arc<dyn ArtifactStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    system_probe: Arc<dyn SystemProbe>,
    invoker: Arc<Invoker>,
}

impl PredictionService {
    pub fn new(
        registry: Arc<dyn JobRegistry>,
        artifacts: Arc<dyn ArtifactStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        system_probe: Arc<dyn SystemProbe>,
        invoker: Arc<Invoker>,
    ) -> Self {
        Self {
            registry,
            artifacts,
            id_provider,
            time_provider,
            system_probe,
            invoker,
        }
    }

    /// predict_structure_from_pdb
    pub async fn submit_file(&self, req: SubmitFileRequest) -> Result<Submission> {
        submit::submit_file(self, req).await
    }

    /// predict_structure_from_sequence
    pub async fn submit_sequence(&self, req: SubmitSequenceRequest) -> Result<Submission> {
        submit::submit_sequence(self, req).await
    }

    /// check_job_status
    pub async fn get_status(&self, job_id: &str) -> Result<JobRecord> {
        query::get_status(self, job_id).await
    }

    /// get_prediction_result
    pub async fn get_result(&self, job_id: &str) -> Result<PredictionResult> {
        query::get_result(self, job_id).await
    }

    /// list_jobs
    pub async fn list_jobs(&self, limit: usize) -> Result<JobList> {
        query::list_jobs(self, limit).await
    }

    /// get_server_info
    pub async fn server_info(&self) -> Result<ServerInfo> {
        server_info::collect(
            self.registry.as_ref(),
            self.artifacts.as_ref(),
            self.system_probe.as_ref(),
        )
        .await
    }
}
