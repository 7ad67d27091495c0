use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use guardcore::scanner::ScanProfile;
use guardcore::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub pipeline: PipelineConfig,
    /// Complete sweeps to run before reporting.
    pub sweeps: usize,
    /// Simulated time spent on each sweep step.
    pub dwell_ms: u32,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            sweeps: 3,
            dwell_ms: 10,
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(profile: ScanProfile, sweeps: usize, seed: u64) -> Self {
        Self {
            pipeline: PipelineConfig {
                profile,
                ..PipelineConfig::default()
            },
            sweeps,
            generator: GeneratorConfig {
                seed,
                ..GeneratorConfig::default()
            },
            ..Self::default()
        }
    }
}
