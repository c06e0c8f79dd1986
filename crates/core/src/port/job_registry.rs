// Job Registry Port (Interface)

use crate::domain::{JobRecord, JobStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Registry interface for job records
///
/// The registry is the only shared mutable state. After `insert`, a record is
/// written only by the invoker task bound to its id.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    /// Insert a new job (Conflict if the id is already present)
    async fn insert(&self, job: &JobRecord) -> Result<()>;

    /// Find job by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<JobRecord>>;

    /// Replace a stored job (NotFound if absent)
    async fn update(&self, job: &JobRecord) -> Result<()>;

    /// Most recently created jobs first, at most `limit`
    async fn list_recent(&self, limit: usize) -> Result<Vec<JobRecord>>;

    /// Total number of jobs
    async fn count(&self) -> Result<usize>;

    /// Count jobs by status
    async fn count_by_status(&self, status: JobStatus) -> Result<usize>;
}

/// Convenience: fetch or fail with NotFound
pub async fn require(registry: &dyn JobRegistry, id: &str) -> Result<JobRecord> {
    registry
        .find_by_id(id)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("Job ID {} not found", id)))
}
