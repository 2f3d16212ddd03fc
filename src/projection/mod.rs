//! Projection engine: month projector and horizon runner

mod engine;
mod cashflows;

pub use engine::{ProjectionEngine, ProjectionConfig, project_month, run_projection};
pub use cashflows::{MonthProjection, ProjectionResult, SummaryMetrics};
