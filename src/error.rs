//! Error types for loading inputs and running named scenarios
//!
//! The projection engine itself never fails; these cover the boundary where
//! portfolios and factor rows come in from files or requests.

use thiserror::Error;

/// Failure reading portfolio data or factor rows, or writing reports
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Factor(#[from] FactorError),
}

/// A stored factor row that cannot be turned into a typed factor
#[derive(Debug, Error)]
pub enum FactorError {
    #[error("invalid config for {factor_type} factor: {reason}")]
    InvalidConfig { factor_type: String, reason: String },
}

/// Caller-side contract violations when running a named scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario '{name}' has a time horizon of {months} months; at least 1 is required")]
    InvalidHorizon { name: String, months: u32 },

    #[error(transparent)]
    Data(#[from] DataError),
}
