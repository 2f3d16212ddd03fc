//! Scenario runner for what-if projections against one portfolio
//!
//! Holds a portfolio snapshot once, then runs any number of named scenarios
//! against it and compares them with the no-factor baseline.

use crate::error::{DataError, ScenarioError};
use crate::factors::ScenarioFactor;
use crate::portfolio::PortfolioState;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, SummaryMetrics};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A user-configured what-if scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,

    pub time_horizon_months: u32,

    #[serde(default)]
    pub factors: Vec<ScenarioFactor>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, time_horizon_months: u32, factors: Vec<ScenarioFactor>) -> Self {
        Self {
            name: name.into(),
            time_horizon_months,
            factors,
        }
    }

    /// Load a scenario definition from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject horizons the engine would turn into non-finite averages
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.time_horizon_months == 0 {
            return Err(ScenarioError::InvalidHorizon {
                name: self.name.clone(),
                months: self.time_horizon_months,
            });
        }
        Ok(())
    }
}

/// Baseline and scenario summaries side by side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub scenario_name: String,
    pub baseline: SummaryMetrics,
    pub scenario: SummaryMetrics,

    /// Scenario total net minus baseline total net
    pub total_net_delta: f64,
    pub average_monthly_net_delta: f64,
    pub negative_months_delta: i64,
}

impl ScenarioComparison {
    pub fn new(scenario_name: impl Into<String>, baseline: SummaryMetrics, scenario: SummaryMetrics) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            total_net_delta: scenario.total_net - baseline.total_net,
            average_monthly_net_delta: scenario.average_monthly_net - baseline.average_monthly_net,
            negative_months_delta: scenario.months_with_negative_cash_flow as i64
                - baseline.months_with_negative_cash_flow as i64,
            baseline,
            scenario,
        }
    }
}

/// Pre-loaded scenario runner for one portfolio
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(portfolio);
///
/// let rate_rise = Scenario::new("Rates +1%", 24, vec![
///     ScenarioFactor::interest_rate(1.0, RateTarget::All, 0),
/// ]);
/// let comparison = runner.compare(&rate_rise)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    portfolio: PortfolioState,
    parallel_months: bool,
}

impl ScenarioRunner {
    pub fn new(portfolio: PortfolioState) -> Self {
        Self {
            portfolio,
            parallel_months: false,
        }
    }

    /// Take the month-level parallelism setting from a projection config
    pub fn with_config(portfolio: PortfolioState, config: &ProjectionConfig) -> Self {
        Self {
            portfolio,
            parallel_months: config.parallel,
        }
    }

    fn engine(&self, time_horizon_months: u32) -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig {
            time_horizon_months,
            parallel: self.parallel_months,
        })
    }

    /// Run one scenario
    pub fn run(&self, scenario: &Scenario) -> Result<ProjectionResult, ScenarioError> {
        scenario.validate()?;
        log::debug!(
            "Running scenario '{}' ({} factors, {} months)",
            scenario.name,
            scenario.factors.len(),
            scenario.time_horizon_months
        );
        Ok(self
            .engine(scenario.time_horizon_months)
            .project(&self.portfolio, &scenario.factors))
    }

    /// Projection with no factors applied
    pub fn baseline(&self, time_horizon_months: u32) -> Result<ProjectionResult, ScenarioError> {
        self.run(&Scenario::new("baseline", time_horizon_months, Vec::new()))
    }

    /// Run a scenario and its baseline over the same horizon
    pub fn compare(&self, scenario: &Scenario) -> Result<ScenarioComparison, ScenarioError> {
        let result = self.run(scenario)?;
        let baseline = self.baseline(scenario.time_horizon_months)?;
        Ok(ScenarioComparison::new(
            scenario.name.clone(),
            baseline.summary_metrics,
            result.summary_metrics,
        ))
    }

    /// Run many scenarios in parallel, results in input order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<Result<ProjectionResult, ScenarioError>> {
        scenarios.par_iter().map(|scenario| self.run(scenario)).collect()
    }
}
