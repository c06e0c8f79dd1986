// Artifact Store Port (uploaded inputs, produced outputs)

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Default upload ceiling (100 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Structure-format extension produced by the inference binary
pub const STRUCTURE_EXTENSION: &str = "cif";

/// Artifact store interface
///
/// Payloads cross the RPC boundary as base64 text.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Decode and persist an uploaded input under the upload root
    ///
    /// # Errors
    /// - Validation if the payload is not valid base64
    /// - Validation if the decoded size exceeds the ceiling (nothing is written)
    ///
    /// The filename is used as given (not sanitized).
    async fn save_input(&self, encoded: &str, filename: &str) -> Result<PathBuf>;

    /// Read an output file and return it base64-encoded
    ///
    /// # Errors
    /// - NotFound if the path does not exist
    async fn load_output(&self, path: &Path) -> Result<String>;

    /// Create (idempotently) the per-job output directory
    async fn prepare_job_dir(&self, job_id: &str) -> Result<PathBuf>;

    /// Recursively find structure files under `dir`, in file-system order
    async fn find_structure_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    fn upload_dir(&self) -> &Path;
    fn output_dir(&self) -> &Path;
    fn model_cache_dir(&self) -> &Path;
    fn max_upload_bytes(&self) -> usize;
}
