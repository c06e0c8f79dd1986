// File-system ArtifactStore Implementation
// reason: base64 for text-safe payloads, walkdir for recursive output discovery

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use boltz_core::error::{AppError, Result};
use boltz_core::port::artifact_store::STRUCTURE_EXTENSION;
use boltz_core::port::ArtifactStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directory layout under the data root
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    pub upload_dir: PathBuf,
    /// Namespaced by job id
    pub output_dir: PathBuf,
    pub model_cache_dir: PathBuf,
}

impl ArtifactLayout {
    /// `<root>/uploads`, `<root>/outputs`, `<root>/models`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            upload_dir: root.join("uploads"),
            output_dir: root.join("outputs"),
            model_cache_dir: root.join("models"),
        }
    }
}

/// Local-disk artifact store
///
/// Upload filenames are joined to the upload root as given. They are not
/// sanitized, so `../` segments and name collisions are possible.
pub struct FsArtifactStore {
    layout: ArtifactLayout,
    max_upload_bytes: usize,
}

impl FsArtifactStore {
    /// Open the store, creating the layout directories if absent
    pub fn open(layout: ArtifactLayout, max_upload_bytes: usize) -> Result<Self> {
        for dir in [
            &layout.upload_dir,
            &layout.output_dir,
            &layout.model_cache_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }

        info!(
            upload_dir = %layout.upload_dir.display(),
            output_dir = %layout.output_dir.display(),
            model_cache_dir = %layout.model_cache_dir.display(),
            "Artifact store ready"
        );

        Ok(Self {
            layout,
            max_upload_bytes,
        })
    }
}

/// Decode a transmitted payload and enforce the size ceiling
///
/// Line-wrapped base64 is accepted; any other non-alphabet byte is rejected.
fn decode_payload(encoded: &str, max_upload_bytes: usize) -> Result<Vec<u8>> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let data = STANDARD
        .decode(compact)
        .map_err(|e| AppError::Validation(format!("Invalid base64 content: {}", e)))?;

    if data.len() > max_upload_bytes {
        return Err(AppError::Validation(format!(
            "File too large: {} bytes (max: {})",
            data.len(),
            max_upload_bytes
        )));
    }

    Ok(data)
}

fn blocking_task_failed(err: tokio::task::JoinError) -> AppError {
    AppError::Internal(format!("Blocking file task failed: {}", err))
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save_input(&self, encoded: &str, filename: &str) -> Result<PathBuf> {
        let encoded = encoded.to_owned();
        let max_upload_bytes = self.max_upload_bytes;
        let path = self.layout.upload_dir.join(filename);

        let saved = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let data = decode_payload(&encoded, max_upload_bytes)?;
            std::fs::write(&path, &data)?;
            debug!(path = %path.display(), bytes = data.len(), "Upload saved");
            Ok(path)
        })
        .await
        .map_err(blocking_task_failed)??;

        Ok(saved)
    }

    async fn load_output(&self, path: &Path) -> Result<String> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(AppError::NotFound(format!(
                "Output file not found: {}",
                path.display()
            )));
        }

        let data = tokio::fs::read(path).await?;
        Ok(STANDARD.encode(data))
    }

    async fn prepare_job_dir(&self, job_id: &str) -> Result<PathBuf> {
        let dir = self.layout.output_dir.join(job_id);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    async fn find_structure_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || {
            WalkDir::new(&dir)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| {
                    path.extension()
                        .is_some_and(|ext| ext == STRUCTURE_EXTENSION)
                })
                .collect::<Vec<PathBuf>>()
        })
        .await
        .map_err(blocking_task_failed)
    }

    fn upload_dir(&self) -> &Path {
        &self.layout.upload_dir
    }

    fn output_dir(&self) -> &Path {
        &self.layout.output_dir
    }

    fn model_cache_dir(&self) -> &Path {
        &self.layout.model_cache_dir
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
