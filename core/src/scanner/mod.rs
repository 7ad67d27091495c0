pub mod planner;
pub mod profile;

pub use planner::{ScanResult, ScanStatus, SweepPlanner, MAX_SCAN_RANGES, MAX_SCAN_RESULTS};
pub use profile::{FrequencyRange, ScanProfile};
