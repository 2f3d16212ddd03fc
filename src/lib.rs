//! Cashflow Scenarios - monthly cash-flow projections for property investment portfolios
//!
//! This library provides:
//! - Portfolio snapshots of properties and loans, loaded from CSV or JSON
//! - Typed what-if factors (interest-rate shifts, vacancy, rent and expense changes)
//! - A pure month projector and a horizon runner with summary metrics
//! - Named scenarios compared against the no-factor baseline
//! - Calendar-labelled CSV reports

pub mod error;
pub mod portfolio;
pub mod factors;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{DataError, FactorError, ScenarioError};
pub use portfolio::{PortfolioState, PropertyState, LoanState};
pub use factors::{ScenarioFactor, FactorKind, RateTarget};
pub use projection::{
    ProjectionEngine, ProjectionConfig, ProjectionResult, MonthProjection, SummaryMetrics,
    project_month, run_projection,
};
pub use scenario::{Scenario, ScenarioRunner, ScenarioComparison};
