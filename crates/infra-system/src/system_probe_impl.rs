// System probe implementation
// reason: sysinfo for cross-platform disk stats, nvidia-smi for accelerators
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tokio::process::Command;
use tracing::debug;

use boltz_core::port::system_probe::{Accelerator, AcceleratorInfo, DiskUsage, SystemProbe};

/// System probe implementation using sysinfo and nvidia-smi
#[derive(Debug, Clone)]
pub struct SystemProbeImpl {
    nvidia_smi: PathBuf,
}

impl SystemProbeImpl {
    /// Create a new system probe
    ///
    /// # Example
    /// ```ignore
    /// let probe = SystemProbeImpl::new();
    /// ```
    pub fn new() -> Self {
        Self {
            nvidia_smi: PathBuf::from("nvidia-smi"),
        }
    }

    /// Use a specific `nvidia-smi` binary
    pub fn with_nvidia_smi(nvidia_smi: impl Into<PathBuf>) -> Self {
        Self {
            nvidia_smi: nvidia_smi.into(),
        }
    }
}

impl Default for SystemProbeImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the mount with the longest prefix of `path`
fn find_disk_usage<'a>(
    path: &Path,
    mounts: impl IntoIterator<Item = (&'a Path, u64, u64)>,
) -> Option<DiskUsage> {
    mounts
        .into_iter()
        .filter(|(mount, _, _)| path.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
        .map(|(_, total, available)| DiskUsage::from_bytes(total, available))
}

/// Parse `nvidia-smi --query-gpu=index,name --format=csv,noheader`
fn parse_nvidia_smi_gpus(stdout: &str) -> Vec<Accelerator> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (index, name) = line.split_once(',')?;
            Some(Accelerator {
                index: index.trim().parse().ok()?,
                name: name.trim().to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl SystemProbe for SystemProbeImpl {
    async fn disk_usage(&self, path: &Path) -> Option<DiskUsage> {
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let disks = Disks::new_with_refreshed_list();

        let usage = find_disk_usage(
            &resolved,
            disks
                .iter()
                .map(|d| (d.mount_point(), d.total_space(), d.available_space())),
        );

        debug!(path = %resolved.display(), usage = ?usage, "Disk usage collected");
        usage
    }

    async fn detect_accelerators(&self) -> AcceleratorInfo {
        let output = match Command::new(&self.nvidia_smi)
            .args(["--query-gpu=index,name", "--format=csv,noheader"])
            .output()
            .await
        {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!(exit_code = ?output.status.code(), "nvidia-smi exited with failure");
                return AcceleratorInfo::Unavailable;
            }
            Err(e) => {
                debug!(error = %e, "nvidia-smi not available");
                return AcceleratorInfo::Unavailable;
            }
        };

        let gpus = parse_nvidia_smi_gpus(&String::from_utf8_lossy(&output.stdout));
        if gpus.is_empty() {
            AcceleratorInfo::Unavailable
        } else {
            AcceleratorInfo::Detected(gpus)
        }
    }
}
