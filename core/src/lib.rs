//! Receive-only RF spectrum guard.
//!
//! A sweep planner walks a radio front-end across preset bands and its
//! results are copied into independent analysers: a device consolidator, a
//! jamming baseline detector, a GNSS spoofing indicator engine and a pattern
//! threat engine. Every collection is fixed-capacity and nothing here can
//! transmit.

pub mod buffers;
pub mod interface;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod profiler;
pub mod scanner;
pub mod security;
pub mod telemetry;

pub use pipeline::{GuardPipeline, GuardReport};
pub use prelude::{AnalysisStage, GuardError, GuardResult, PipelineConfig};
