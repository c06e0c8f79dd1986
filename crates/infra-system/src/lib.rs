// Boltz Infrastructure - System Adapters
// Implements: InferenceRunner (Boltz CLI subprocess), SystemProbe

pub mod boltz_runner;
pub mod system_probe_impl;

pub use boltz_runner::{BoltzRunner, BoltzRunnerConfig};
pub use system_probe_impl::SystemProbeImpl;
