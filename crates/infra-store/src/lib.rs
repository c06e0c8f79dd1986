// Boltz Infrastructure - Storage Adapters
// Implements: JobRegistry (in-memory), ArtifactStore (local file system)

mod fs_artifact_store;
mod memory_registry;

pub use fs_artifact_store::{ArtifactLayout, FsArtifactStore};
pub use memory_registry::InMemoryJobRegistry;
