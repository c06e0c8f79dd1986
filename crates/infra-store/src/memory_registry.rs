// In-memory JobRegistry Implementation

use async_trait::async_trait;
use boltz_core::domain::{JobRecord, JobStatus};
use boltz_core::error::{AppError, Result};
use boltz_core::port::JobRegistry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-lifetime job registry
///
/// One coarse lock guards the whole map. Records are never evicted.
#[derive(Default)]
pub struct InMemoryJobRegistry {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRegistry for InMemoryJobRegistry {
    async fn insert(&self, job: &JobRecord) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(AppError::Conflict(format!("Job ID {} already exists", job.id)));
        }
        jobs.insert(job.id.clone(), job.clone());
        debug!(job_id = %job.id, "Job inserted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JobRecord>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn update(&self, job: &JobRecord) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job.clone();
                debug!(job_id = %job.id, status = %job.status(), "Job updated");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Job ID {} not found", job.id))),
        }
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<JobRecord>> {
        let jobs = self.jobs.read().await;
        let mut recent: Vec<JobRecord> = jobs.values().cloned().collect();
        // Newest first; ties keep map order
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.jobs.read().await.len())
    }

    async fn count_by_status(&self, status: JobStatus) -> Result<usize> {
        Ok(self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.status() == status)
            .count())
    }
}
