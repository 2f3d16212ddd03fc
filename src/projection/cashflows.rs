//! Projection output structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One month of projected portfolio cash flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthProjection {
    /// Zero-based projection month
    pub month: u32,

    pub total_income: f64,

    /// Operating expenses plus loan interest
    pub total_expenses: f64,

    pub net_cash_flow: f64,

    /// Factor-adjusted rent per property id
    pub income_by_property: BTreeMap<String, f64>,

    /// Factor-adjusted expenses per property id, including interest on
    /// loans attributed to that property
    pub expenses_by_property: BTreeMap<String, f64>,
}

impl MonthProjection {
    pub fn new(month: u32) -> Self {
        Self {
            month,
            total_income: 0.0,
            total_expenses: 0.0,
            net_cash_flow: 0.0,
            income_by_property: BTreeMap::new(),
            expenses_by_property: BTreeMap::new(),
        }
    }

    /// Net cash flow of a single property, if it is in the breakdown
    pub fn property_net(&self, property_id: &str) -> Option<f64> {
        let income = self.income_by_property.get(property_id)?;
        let expenses = self.expenses_by_property.get(property_id)?;
        Some(income - expenses)
    }
}

/// Portfolio-level aggregates over a full horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_net: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
    pub average_monthly_net: f64,
    pub months_with_negative_cash_flow: u32,
    pub lowest_month_net: f64,
    pub highest_month_net: f64,
}

impl SummaryMetrics {
    /// Reduce monthly results to summary metrics.
    ///
    /// Averages divide by `time_horizon_months` as given; a zero horizon
    /// yields NaN averages. Lowest/highest are 0 when there are no months.
    pub fn from_months(months: &[MonthProjection], time_horizon_months: u32) -> Self {
        let total_income: f64 = months.iter().map(|m| m.total_income).sum();
        let total_expenses: f64 = months.iter().map(|m| m.total_expenses).sum();
        let total_net = total_income - total_expenses;
        let horizon = time_horizon_months as f64;

        let months_with_negative_cash_flow =
            months.iter().filter(|m| m.net_cash_flow < 0.0).count() as u32;

        let (lowest_month_net, highest_month_net) = if months.is_empty() {
            (0.0, 0.0)
        } else {
            months.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
                (lo.min(m.net_cash_flow), hi.max(m.net_cash_flow))
            })
        };

        Self {
            total_income,
            total_expenses,
            total_net,
            average_monthly_income: total_income / horizon,
            average_monthly_expenses: total_expenses / horizon,
            average_monthly_net: total_net / horizon,
            months_with_negative_cash_flow,
            lowest_month_net,
            highest_month_net,
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Monthly results in ascending month order starting at 0
    pub monthly_results: Vec<MonthProjection>,

    pub summary_metrics: SummaryMetrics,
}

impl ProjectionResult {
    pub fn from_months(monthly_results: Vec<MonthProjection>, time_horizon_months: u32) -> Self {
        let summary_metrics = SummaryMetrics::from_months(&monthly_results, time_horizon_months);
        Self {
            monthly_results,
            summary_metrics,
        }
    }

    /// Net cash flow series, one value per month
    pub fn net_cash_flows(&self) -> Vec<f64> {
        self.monthly_results.iter().map(|m| m.net_cash_flow).collect()
    }

    /// Running total of net cash flow at the end of each month
    pub fn cumulative_net(&self) -> Vec<f64> {
        self.monthly_results
            .iter()
            .scan(0.0, |running, m| {
                *running += m.net_cash_flow;
                Some(*running)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn month(index: u32, income: f64, expenses: f64) -> MonthProjection {
        MonthProjection {
            total_income: income,
            total_expenses: expenses,
            net_cash_flow: income - expenses,
            ..MonthProjection::new(index)
        }
    }

    #[test]
    fn test_summary_reduction() {
        let months = vec![
            month(0, 1000.0, 1200.0),
            month(1, 1000.0, 900.0),
            month(2, 1500.0, 1000.0),
        ];
        let summary = SummaryMetrics::from_months(&months, 3);

        assert_relative_eq!(summary.total_income, 3500.0);
        assert_relative_eq!(summary.total_expenses, 3100.0);
        assert_relative_eq!(summary.total_net, 400.0);
        assert_relative_eq!(summary.average_monthly_net, 400.0 / 3.0);
        assert_eq!(summary.months_with_negative_cash_flow, 1);
        assert_relative_eq!(summary.lowest_month_net, -200.0);
        assert_relative_eq!(summary.highest_month_net, 500.0);
    }

    #[test]
    fn test_empty_horizon_guards_min_max() {
        let summary = SummaryMetrics::from_months(&[], 0);
        assert_eq!(summary.lowest_month_net, 0.0);
        assert_eq!(summary.highest_month_net, 0.0);
        assert_eq!(summary.total_net, 0.0);
        assert_eq!(summary.months_with_negative_cash_flow, 0);
        assert!(summary.average_monthly_income.is_nan());
        assert!(summary.average_monthly_net.is_nan());
    }

    #[test]
    fn test_cumulative_net() {
        let result = ProjectionResult::from_months(
            vec![month(0, 100.0, 50.0), month(1, 100.0, 300.0), month(2, 100.0, 0.0)],
            3,
        );
        assert_eq!(result.net_cash_flows(), vec![50.0, -200.0, 100.0]);
        assert_eq!(result.cumulative_net(), vec![50.0, -150.0, -50.0]);
    }

    #[test]
    fn test_property_net() {
        let mut m = MonthProjection::new(0);
        m.income_by_property.insert("p1".to_string(), 2000.0);
        m.expenses_by_property.insert("p1".to_string(), 2600.0);
        assert_eq!(m.property_net("p1"), Some(-600.0));
        assert_eq!(m.property_net("p2"), None);
    }
}
