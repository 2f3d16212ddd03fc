//! Scenario factors: time-gated perturbations applied during projection

mod kind;
pub mod loader;

pub use kind::{FactorKind, RateTarget};
pub use loader::{FactorRow, factors_from_json, load_factors_json};

use serde::{Deserialize, Serialize};

/// One named perturbation with its start month
///
/// Serialized as the stored factor row
/// (`{ factorType, config, startMonth, durationMonths }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FactorRow", into = "FactorRow")]
pub struct ScenarioFactor {
    pub kind: FactorKind,

    /// Zero-based projection month at which the factor starts to apply
    pub start_month: u32,

    /// Carried from the stored row. The vacancy window length comes from
    /// the vacancy config's `months`.
    pub duration_months: Option<u32>,
}

impl ScenarioFactor {
    pub fn new(kind: FactorKind, start_month: u32) -> Self {
        Self {
            kind,
            start_month,
            duration_months: None,
        }
    }

    pub fn interest_rate(change_percent: f64, apply_to: RateTarget, start_month: u32) -> Self {
        Self::new(FactorKind::InterestRate { change_percent, apply_to }, start_month)
    }

    pub fn vacancy(property_id: impl Into<String>, months: u32, start_month: u32) -> Self {
        Self {
            kind: FactorKind::Vacancy {
                property_id: property_id.into(),
                months,
            },
            start_month,
            duration_months: Some(months),
        }
    }

    pub fn rent_change(change_percent: f64, property_id: Option<&str>, start_month: u32) -> Self {
        Self::new(
            FactorKind::RentChange {
                change_percent,
                property_id: property_id.map(str::to_string),
            },
            start_month,
        )
    }

    pub fn expense_change(change_percent: f64, start_month: u32) -> Self {
        Self::new(
            FactorKind::ExpenseChange {
                change_percent,
                category: None,
            },
            start_month,
        )
    }

    /// Wire tag of this factor
    pub fn factor_type(&self) -> &str {
        self.kind.factor_type()
    }

    /// Whether the factor has started by `month`
    pub fn is_active(&self, month: u32) -> bool {
        month >= self.start_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active_from_start_month() {
        let factor = ScenarioFactor::expense_change(5.0, 3);
        assert!(!factor.is_active(0));
        assert!(!factor.is_active(2));
        assert!(factor.is_active(3));
        assert!(factor.is_active(120));
    }

    #[test]
    fn test_serializes_as_stored_row() {
        let factor = ScenarioFactor::interest_rate(0.5, RateTarget::All, 6);
        let value = serde_json::to_value(&factor).unwrap();
        assert_eq!(value["factorType"], "interest_rate");
        assert_eq!(value["startMonth"], 6);
        assert_eq!(value["config"]["applyTo"], "all");
        assert_eq!(value["config"]["changePercent"], 0.5);

        let back: ScenarioFactor = serde_json::from_value(value).unwrap();
        assert_eq!(back, factor);
    }

    #[test]
    fn test_unknown_type_survives_serde() {
        let json = r#"{"factorType": "sell_property", "config": {"propertyId": "p1"}, "startMonth": 12}"#;
        let factor: ScenarioFactor = serde_json::from_str(json).unwrap();
        assert_eq!(factor.factor_type(), "sell_property");
        let value = serde_json::to_value(&factor).unwrap();
        assert_eq!(value["config"]["propertyId"], "p1");
    }
}
