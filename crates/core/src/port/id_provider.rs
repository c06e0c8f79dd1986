// ID Provider Port (job identity)

use sha2::{Digest, Sha256};

/// Length of the hex job id (truncated SHA-256)
pub const JOB_ID_LEN: usize = 16;

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Derive a job ID from a seed. Identical seeds yield identical IDs.
    fn generate_id(&self, seed: &str) -> String;
}

/// SHA-256 prefix provider (production)
///
/// Truncation to 16 hex chars keeps ids short; the collision probability is
/// negligible at the job volumes a single process sees.
pub struct Sha256IdProvider;

impl IdProvider for Sha256IdProvider {
    fn generate_id(&self, seed: &str) -> String {
        let digest = Sha256::digest(seed.as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(JOB_ID_LEN);
        id
    }
}
