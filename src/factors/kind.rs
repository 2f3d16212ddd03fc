//! Factor variants and their configuration payloads

use serde::{Deserialize, Serialize};

/// Which loans an interest-rate factor applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RateTarget {
    /// Every loan in the portfolio (wire value `"all"`)
    All,
    /// Loans attributed to this property id
    Property(String),
}

impl RateTarget {
    /// Whether a loan attributed to `property_id` is targeted
    pub fn matches(&self, property_id: Option<&str>) -> bool {
        match self {
            RateTarget::All => true,
            RateTarget::Property(target) => property_id == Some(target.as_str()),
        }
    }
}

impl From<String> for RateTarget {
    fn from(value: String) -> Self {
        if value == "all" {
            RateTarget::All
        } else {
            RateTarget::Property(value)
        }
    }
}

impl From<RateTarget> for String {
    fn from(target: RateTarget) -> Self {
        match target {
            RateTarget::All => "all".to_string(),
            RateTarget::Property(id) => id,
        }
    }
}

/// A factor's type and its type-specific configuration
#[derive(Debug, Clone, PartialEq)]
pub enum FactorKind {
    /// Shift loan rates by `change_percent` percentage points (additive)
    InterestRate {
        change_percent: f64,
        apply_to: RateTarget,
    },
    /// Zero one property's rent for `months` months
    Vacancy { property_id: String, months: u32 },
    /// Scale rent by `1 + change_percent / 100`, for one property or all
    RentChange {
        change_percent: f64,
        property_id: Option<String>,
    },
    /// Scale expenses of every property by `1 + change_percent / 100`.
    /// `category` is accepted but does not filter.
    ExpenseChange {
        change_percent: f64,
        category: Option<String>,
    },
    /// A factor type this engine does not model; has no effect
    Unrecognized {
        factor_type: String,
        config: serde_json::Value,
    },
}

impl FactorKind {
    pub const INTEREST_RATE: &'static str = "interest_rate";
    pub const VACANCY: &'static str = "vacancy";
    pub const RENT_CHANGE: &'static str = "rent_change";
    pub const EXPENSE_CHANGE: &'static str = "expense_change";

    pub fn factor_type(&self) -> &str {
        match self {
            FactorKind::InterestRate { .. } => Self::INTEREST_RATE,
            FactorKind::Vacancy { .. } => Self::VACANCY,
            FactorKind::RentChange { .. } => Self::RENT_CHANGE,
            FactorKind::ExpenseChange { .. } => Self::EXPENSE_CHANGE,
            FactorKind::Unrecognized { factor_type, .. } => factor_type,
        }
    }
}

// Wire shapes of each config payload

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InterestRateConfig {
    pub change_percent: f64,
    pub apply_to: RateTarget,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VacancyConfig {
    pub property_id: String,
    pub months: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RentChangeConfig {
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExpenseChangeConfig {
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_target_matching() {
        assert!(RateTarget::All.matches(None));
        assert!(RateTarget::All.matches(Some("p1")));

        let target = RateTarget::Property("p1".to_string());
        assert!(target.matches(Some("p1")));
        assert!(!target.matches(Some("p2")));
        assert!(!target.matches(None));
    }

    #[test]
    fn test_rate_target_wire_values() {
        let all: RateTarget = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, RateTarget::All);
        let one: RateTarget = serde_json::from_str("\"p7\"").unwrap();
        assert_eq!(one, RateTarget::Property("p7".to_string()));
    }
}
