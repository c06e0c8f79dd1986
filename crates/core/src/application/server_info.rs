// Server Info Use Case

use crate::domain::JobStatus;
use crate::error::Result;
use crate::port::{Accelerator, AcceleratorInfo, ArtifactStore, DiskUsage, JobRegistry, SystemProbe};
use serde::Serialize;
use std::path::PathBuf;

pub const SERVER_NAME: &str = "Boltz Prediction Server";

/// Static configuration plus live environment facts
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub server: String,
    pub version: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub model_cache_dir: PathBuf,
    /// `None` when the file system could not be resolved
    pub disk_usage: Option<DiskUsage>,
    pub gpu_info: String,
    pub accelerators: Vec<Accelerator>,
    pub max_upload_size_mb: f64,
    pub active_jobs: usize,
    pub total_jobs: usize,
}

pub async fn collect(
    registry: &dyn JobRegistry,
    artifacts: &dyn ArtifactStore,
    probe: &dyn SystemProbe,
) -> Result<ServerInfo> {
    let disk_usage = probe.disk_usage(artifacts.output_dir()).await;
    let accelerator_info = probe.detect_accelerators().await;

    let gpu_info = accelerator_info.describe();
    let accelerators = match accelerator_info {
        AcceleratorInfo::Detected(devices) => devices,
        AcceleratorInfo::Unavailable => Vec::new(),
    };

    Ok(ServerInfo {
        server: SERVER_NAME.to_string(),
        version: crate::VERSION.to_string(),
        upload_dir: artifacts.upload_dir().to_path_buf(),
        output_dir: artifacts.output_dir().to_path_buf(),
        model_cache_dir: artifacts.model_cache_dir().to_path_buf(),
        disk_usage,
        gpu_info,
        accelerators,
        max_upload_size_mb: artifacts.max_upload_bytes() as f64 / (1024.0 * 1024.0),
        active_jobs: registry.count_by_status(JobStatus::Running).await?,
        total_jobs: registry.count().await?,
    })
}
