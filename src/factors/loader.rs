//! Stored factor rows and their conversion into typed factors

use super::kind::{ExpenseChangeConfig, InterestRateConfig, RentChangeConfig, VacancyConfig};
use super::{FactorKind, ScenarioFactor};
use crate::error::{FactorError, DataError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A factor as stored against a scenario: a type tag plus a free-form config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorRow {
    pub factor_type: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub start_month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,
}

fn parse_config<T: DeserializeOwned>(factor_type: &str, config: Value) -> Result<T, FactorError> {
    serde_json::from_value(config).map_err(|e| FactorError::InvalidConfig {
        factor_type: factor_type.to_string(),
        reason: e.to_string(),
    })
}

impl TryFrom<FactorRow> for ScenarioFactor {
    type Error = FactorError;

    fn try_from(row: FactorRow) -> Result<Self, Self::Error> {
        let FactorRow { factor_type, config, start_month, duration_months } = row;
        let tag = factor_type.as_str();
        let kind = match tag {
            FactorKind::INTEREST_RATE => {
                let c: InterestRateConfig = parse_config(tag, config)?;
                FactorKind::InterestRate {
                    change_percent: c.change_percent,
                    apply_to: c.apply_to,
                }
            }
            FactorKind::VACANCY => {
                let c: VacancyConfig = parse_config(tag, config)?;
                FactorKind::Vacancy {
                    property_id: c.property_id,
                    months: c.months,
                }
            }
            FactorKind::RENT_CHANGE => {
                let c: RentChangeConfig = parse_config(tag, config)?;
                FactorKind::RentChange {
                    change_percent: c.change_percent,
                    property_id: c.property_id,
                }
            }
            FactorKind::EXPENSE_CHANGE => {
                let c: ExpenseChangeConfig = parse_config(tag, config)?;
                FactorKind::ExpenseChange {
                    change_percent: c.change_percent,
                    category: c.category,
                }
            }
            _ => {
                log::warn!("Unrecognized factor type '{}' will have no effect", tag);
                FactorKind::Unrecognized {
                    factor_type: factor_type.clone(),
                    config,
                }
            }
        };

        Ok(ScenarioFactor {
            kind,
            start_month,
            duration_months,
        })
    }
}

impl From<ScenarioFactor> for FactorRow {
    fn from(factor: ScenarioFactor) -> Self {
        let factor_type = factor.factor_type().to_string();
        // Config structs hold only strings and numbers, so encoding cannot fail
        let config = match factor.kind {
            FactorKind::InterestRate { change_percent, apply_to } => {
                serde_json::to_value(InterestRateConfig { change_percent, apply_to })
            }
            FactorKind::Vacancy { property_id, months } => {
                serde_json::to_value(VacancyConfig { property_id, months })
            }
            FactorKind::RentChange { change_percent, property_id } => {
                serde_json::to_value(RentChangeConfig { change_percent, property_id })
            }
            FactorKind::ExpenseChange { change_percent, category } => {
                serde_json::to_value(ExpenseChangeConfig { change_percent, category })
            }
            FactorKind::Unrecognized { config, .. } => Ok(config),
        }
        .unwrap_or(Value::Null);

        FactorRow {
            factor_type,
            config,
            start_month: factor.start_month,
            duration_months: factor.duration_months,
        }
    }
}

/// Load a JSON array of stored factor rows
pub fn load_factors_json<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioFactor>, DataError> {
    let contents = std::fs::read_to_string(path)?;
    factors_from_json(&contents)
}

pub fn factors_from_json(json: &str) -> Result<Vec<ScenarioFactor>, DataError> {
    let rows: Vec<FactorRow> = serde_json::from_str(json)?;
    let factors = rows
        .into_iter()
        .map(ScenarioFactor::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Loaded {} scenario factors", factors.len());
    Ok(factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::RateTarget;

    #[test]
    fn test_rows_to_typed_factors() {
        let json = r#"[
            {"factorType": "interest_rate", "config": {"changePercent": 0.5, "applyTo": "all"}, "startMonth": 0},
            {"factorType": "vacancy", "config": {"propertyId": "p1", "months": 3}, "startMonth": 2, "durationMonths": 3},
            {"factorType": "rent_change", "config": {"changePercent": -5}, "startMonth": 6},
            {"factorType": "expense_change", "config": {"changePercent": 10, "category": "insurance"}, "startMonth": 1}
        ]"#;
        let factors = factors_from_json(json).unwrap();
        assert_eq!(factors.len(), 4);

        assert_eq!(
            factors[0].kind,
            FactorKind::InterestRate { change_percent: 0.5, apply_to: RateTarget::All }
        );
        assert_eq!(
            factors[1].kind,
            FactorKind::Vacancy { property_id: "p1".to_string(), months: 3 }
        );
        assert_eq!(factors[1].duration_months, Some(3));
        assert_eq!(
            factors[2].kind,
            FactorKind::RentChange { change_percent: -5.0, property_id: None }
        );
        assert_eq!(factors[2].start_month, 6);
        assert_eq!(
            factors[3].kind,
            FactorKind::ExpenseChange {
                change_percent: 10.0,
                category: Some("insurance".to_string())
            }
        );
    }

    #[test]
    fn test_unknown_type_is_inert_not_an_error() {
        let json = r#"[{"factorType": "refinance", "config": {"newRate": 5.1}, "startMonth": 4}]"#;
        let factors = factors_from_json(json).unwrap();
        assert!(matches!(factors[0].kind, FactorKind::Unrecognized { .. }));
        assert_eq!(factors[0].factor_type(), "refinance");
    }

    #[test]
    fn test_malformed_known_config_is_rejected() {
        let row = FactorRow {
            factor_type: "vacancy".to_string(),
            config: serde_json::json!({"months": 2}),
            start_month: 0,
            duration_months: None,
        };
        let err = ScenarioFactor::try_from(row).unwrap_err();
        match err {
            FactorError::InvalidConfig { factor_type, .. } => assert_eq!(factor_type, "vacancy"),
        }
    }

    #[test]
    fn test_invalid_config_surfaces_as_load_error() {
        let json = r#"[{"factorType": "rent_change", "config": {}, "startMonth": 0}]"#;
        let err = factors_from_json(json).unwrap_err();
        assert!(matches!(err, DataError::Factor(_)));
    }
}
