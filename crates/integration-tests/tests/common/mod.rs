//! Shared wiring for integration tests

#![allow(dead_code)]

use boltz_core::application::{Invoker, PredictionService};
use boltz_core::domain::JobRecord;
use boltz_core::port::artifact_store::DEFAULT_MAX_UPLOAD_BYTES;
use boltz_core::port::system_probe::mocks::MockSystemProbe;
use boltz_core::port::{InferenceRunner, Sha256IdProvider, SystemTimeProvider, TimeProvider};
use boltz_infra_store::{ArtifactLayout, FsArtifactStore, InMemoryJobRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Service wired to the real in-memory registry and a temp-dir artifact store
pub struct Harness {
    pub service: Arc<PredictionService>,
    pub registry: Arc<InMemoryJobRegistry>,
    pub layout: ArtifactLayout,
    pub root: PathBuf,
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn temp_root(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
}

pub struct HarnessBuilder {
    runner: Arc<dyn InferenceRunner>,
    time_provider: Arc<dyn TimeProvider>,
    max_upload_bytes: usize,
}

impl HarnessBuilder {
    pub fn new(runner: Arc<dyn InferenceRunner>) -> Self {
        Self {
            runner,
            time_provider: Arc::new(SystemTimeProvider),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    pub fn max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn build(self) -> Harness {
        let root = temp_root("boltz-it");
        let layout = ArtifactLayout::under(&root);
        let artifacts =
            Arc::new(FsArtifactStore::open(layout.clone(), self.max_upload_bytes).unwrap());
        let registry = Arc::new(InMemoryJobRegistry::new());

        let invoker = Arc::new(Invoker::new(
            registry.clone(),
            artifacts.clone(),
            self.runner,
            self.time_provider.clone(),
        ));

        let service = Arc::new(PredictionService::new(
            registry.clone(),
            artifacts,
            Arc::new(Sha256IdProvider),
            self.time_provider,
            Arc::new(MockSystemProbe::cpu_only()),
            invoker,
        ));

        Harness {
            service,
            registry,
            layout,
            root,
        }
    }
}

impl Harness {
    /// Poll until the job reaches a terminal status
    pub async fn wait_terminal(&self, job_id: &str) -> JobRecord {
        let poll = async {
            loop {
                let job = self.service.get_status(job_id).await.unwrap();
                if job.status().is_terminal() {
                    return job;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(10), poll)
            .await
            .expect("job did not finish in time")
    }

    /// Files currently in the upload directory
    pub fn uploads(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.layout.upload_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}
