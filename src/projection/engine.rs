//! Core projection engine for monthly portfolio cash-flow projections

use super::cashflows::{MonthProjection, ProjectionResult};
use crate::factors::{FactorKind, ScenarioFactor};
use crate::portfolio::{LoanState, PortfolioState, PropertyState};
use rayon::prelude::*;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of months to project
    pub time_horizon_months: u32,

    /// Compute months on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            time_horizon_months: 60, // 5 years
            parallel: false,
        }
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Run the configured horizon for one portfolio and factor list
    pub fn project(&self, portfolio: &PortfolioState, factors: &[ScenarioFactor]) -> ProjectionResult {
        let months = self.config.time_horizon_months;
        log::debug!(
            "Projecting {} properties, {} loans, {} factors over {} months (parallel: {})",
            portfolio.properties.len(),
            portfolio.loans.len(),
            factors.len(),
            months,
            self.config.parallel,
        );

        if !self.config.parallel {
            return run_projection(portfolio, factors, months);
        }

        // Months are independent; an indexed collect keeps them in order
        let monthly_results: Vec<MonthProjection> = (0..months)
            .into_par_iter()
            .map(|month| project_month(portfolio, factors, month))
            .collect();

        ProjectionResult::from_months(monthly_results, months)
    }
}

/// Project a full horizon, one month at a time.
///
/// `time_horizon_months` must be at least 1 for the averages to be finite;
/// a zero horizon returns no months, NaN averages and 0 lowest/highest.
pub fn run_projection(
    portfolio: &PortfolioState,
    factors: &[ScenarioFactor],
    time_horizon_months: u32,
) -> ProjectionResult {
    let monthly_results: Vec<MonthProjection> = (0..time_horizon_months)
        .map(|month| project_month(portfolio, factors, month))
        .collect();

    ProjectionResult::from_months(monthly_results, time_horizon_months)
}

/// Project a single month. Pure: depends only on its three inputs.
pub fn project_month(
    portfolio: &PortfolioState,
    factors: &[ScenarioFactor],
    month: u32,
) -> MonthProjection {
    let mut projection = MonthProjection::new(month);

    for property in &portfolio.properties {
        let (rent, expenses) = adjusted_property(property, factors, month);

        projection.income_by_property.insert(property.id.clone(), rent);
        projection.expenses_by_property.insert(property.id.clone(), expenses);
        projection.total_income += rent;
        projection.total_expenses += expenses;
    }

    for loan in &portfolio.loans {
        let monthly_interest = loan.monthly_interest_at(adjusted_rate(loan, factors, month));
        projection.total_expenses += monthly_interest;

        // Interest only lands in the breakdown if the property is in the snapshot
        if let Some(entry) = loan
            .property_id
            .as_ref()
            .and_then(|id| projection.expenses_by_property.get_mut(id))
        {
            *entry += monthly_interest;
        }
    }

    projection.net_cash_flow = projection.total_income - projection.total_expenses;
    projection
}

/// Apply factors in list order to one property's rent and expenses.
/// Later factors compound on the output of earlier ones.
fn adjusted_property(property: &PropertyState, factors: &[ScenarioFactor], month: u32) -> (f64, f64) {
    let mut rent = property.monthly_rent;
    let mut expenses = property.monthly_expenses;

    for factor in factors {
        match &factor.kind {
            FactorKind::Vacancy { property_id, months } => {
                // Half-open window [start, start + months)
                if *property_id == property.id
                    && factor.is_active(month)
                    && month - factor.start_month < *months
                {
                    rent = 0.0;
                }
            }
            FactorKind::RentChange { change_percent, property_id } => {
                let targeted = property_id.as_deref().map_or(true, |id| id == property.id);
                if targeted && factor.is_active(month) {
                    rent *= 1.0 + change_percent / 100.0;
                }
            }
            FactorKind::ExpenseChange { change_percent, .. } => {
                if factor.is_active(month) {
                    expenses *= 1.0 + change_percent / 100.0;
                }
            }
            FactorKind::InterestRate { .. } | FactorKind::Unrecognized { .. } => {}
        }
    }

    (rent, expenses)
}

/// Loan rate after active interest-rate factors, in percentage points
fn adjusted_rate(loan: &LoanState, factors: &[ScenarioFactor], month: u32) -> f64 {
    factors
        .iter()
        .filter(|f| f.is_active(month))
        .fold(loan.interest_rate, |rate, factor| match &factor.kind {
            FactorKind::InterestRate { change_percent, apply_to }
                if apply_to.matches(loan.property_id.as_deref()) =>
            {
                rate + change_percent
            }
            _ => rate,
        })
}
