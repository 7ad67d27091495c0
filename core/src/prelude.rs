use serde::{Deserialize, Serialize};

use crate::scanner::{FrequencyRange, ScanProfile};

/// Received signal strength below which a sweep sample is treated as noise.
pub const DEFAULT_ACTIVITY_THRESHOLD_DBM: i8 = -75;

/// Shared configuration applied to a pipeline before a sweep starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub profile: ScanProfile,
    pub extra_ranges: Vec<FrequencyRange>,
    pub activity_threshold_dbm: i8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profile: ScanProfile::Ism,
            extra_ranges: Vec::new(),
            activity_threshold_dbm: DEFAULT_ACTIVITY_THRESHOLD_DBM,
        }
    }
}

/// Common error type for every component of the core.
#[derive(thiserror::Error, Debug)]
pub enum GuardError {
    #[error("capacity exhausted: {0}")]
    CapacityExhausted(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GuardResult<T> = Result<T, GuardError>;

/// A component that folds its accumulated observations into a verdict.
///
/// Analysis never fails: capacity problems surface when observations are
/// added, not when they are evaluated.
pub trait AnalysisStage {
    fn name(&self) -> &'static str;
    fn analyze(&mut self);
    fn reset(&mut self);
}
