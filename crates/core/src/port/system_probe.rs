// System probe port (server info: disk space, accelerators)
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

/// Disk usage of the file system holding a path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
}

impl DiskUsage {
    pub fn from_bytes(total: u64, available: u64) -> Self {
        const GIB: f64 = (1024 * 1024 * 1024) as f64;
        Self {
            total_gb: total as f64 / GIB,
            used_gb: total.saturating_sub(available) as f64 / GIB,
            free_gb: available as f64 / GIB,
        }
    }
}

/// A detected accelerator device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accelerator {
    pub index: u32,
    pub name: String,
}

/// Best-effort accelerator detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceleratorInfo {
    Detected(Vec<Accelerator>),
    Unavailable,
}

impl AcceleratorInfo {
    /// Human-readable summary, e.g. `2 GPUs: A100, A100`
    pub fn describe(&self) -> String {
        match self {
            AcceleratorInfo::Detected(devices) if !devices.is_empty() => {
                let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
                format!("{} GPUs: {}", devices.len(), names.join(", "))
            }
            _ => "Unknown (check with nvidia-smi)".to_string(),
        }
    }
}

/// System probe port
///
/// Neither method fails: missing capabilities degrade to `None` / `Unavailable`.
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Disk usage of the file system that contains `path`
    async fn disk_usage(&self, path: &Path) -> Option<DiskUsage>;

    /// Detect accelerators available to the inference binary
    async fn detect_accelerators(&self) -> AcceleratorInfo;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Mock SystemProbe for testing
    pub struct MockSystemProbe {
        disk: Option<DiskUsage>,
        accelerators: AcceleratorInfo,
    }

    impl MockSystemProbe {
        pub fn new(disk: Option<DiskUsage>, accelerators: AcceleratorInfo) -> Self {
            Self { disk, accelerators }
        }

        /// 500 GiB disk, 100 GiB used, no accelerators
        pub fn cpu_only() -> Self {
            Self::new(
                Some(DiskUsage::from_bytes(500 << 30, 400 << 30)),
                AcceleratorInfo::Unavailable,
            )
        }
    }

    #[async_trait]
    impl SystemProbe for MockSystemProbe {
        async fn disk_usage(&self, _path: &Path) -> Option<DiskUsage> {
            self.disk.clone()
        }

        async fn detect_accelerators(&self) -> AcceleratorInfo {
            self.accelerators.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_usage_conversion() {
        let usage = DiskUsage::from_bytes(10 << 30, 4 << 30);
        assert_eq!(usage.total_gb, 10.0);
        assert_eq!(usage.used_gb, 6.0);
        assert_eq!(usage.free_gb, 4.0);
    }

    #[test]
    fn test_describe_accelerators() {
        let info = AcceleratorInfo::Detected(vec![
            Accelerator { index: 0, name: "NVIDIA A100".to_string() },
            Accelerator { index: 1, name: "NVIDIA A100".to_string() },
        ]);
        assert_eq!(info.describe(), "2 GPUs: NVIDIA A100, NVIDIA A100");
        assert_eq!(AcceleratorInfo::Unavailable.describe(), "Unknown (check with nvidia-smi)");
        assert_eq!(AcceleratorInfo::Detected(vec![]).describe(), "Unknown (check with nvidia-smi)");
    }
}
