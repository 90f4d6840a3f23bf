//! Report pipeline orchestration

mod pipeline;

pub use pipeline::{PipelineStep, ReportPipeline};
