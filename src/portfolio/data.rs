//! Portfolio snapshot data structures matching the upstream JSON contract

use serde::{Deserialize, Serialize};

/// One investment property's baseline monthly cash-flow inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyState {
    /// Identifier, unique within a snapshot
    pub id: String,

    /// Monthly rental income before any factor is applied
    pub monthly_rent: f64,

    /// Monthly operating expenses, excluding loan interest
    pub monthly_expenses: f64,
}

impl PropertyState {
    pub fn new(id: impl Into<String>, monthly_rent: f64, monthly_expenses: f64) -> Self {
        Self {
            id: id.into(),
            monthly_rent,
            monthly_expenses,
        }
    }
}

/// One loan's current financing terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanState {
    pub id: String,

    /// Property this loan is attributed to. `None` for facilities spread
    /// across several properties; their interest only reaches portfolio totals.
    #[serde(default)]
    pub property_id: Option<String>,

    /// Outstanding principal, held constant over the horizon
    pub current_balance: f64,

    /// Annual rate in percent (6.2 means 6.2%)
    pub interest_rate: f64,

    /// Scheduled repayment. Informational only; interest is recomputed from
    /// balance and rate each month.
    #[serde(default)]
    pub repayment_amount: f64,
}

impl LoanState {
    pub fn new(
        id: impl Into<String>,
        property_id: Option<&str>,
        current_balance: f64,
        interest_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            property_id: property_id.map(str::to_string),
            current_balance,
            interest_rate,
            repayment_amount: 0.0,
        }
    }

    /// Interest for one month at the given annual percentage rate
    pub fn monthly_interest_at(&self, annual_rate_pct: f64) -> f64 {
        self.current_balance * annual_rate_pct / 100.0 / 12.0
    }

    /// Interest for one month at the loan's own rate
    pub fn baseline_monthly_interest(&self) -> f64 {
        self.monthly_interest_at(self.interest_rate)
    }
}

/// Aggregate input to a projection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioState {
    #[serde(default)]
    pub properties: Vec<PropertyState>,

    #[serde(default)]
    pub loans: Vec<LoanState>,
}

impl PortfolioState {
    pub fn new(properties: Vec<PropertyState>, loans: Vec<LoanState>) -> Self {
        Self { properties, loans }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.loans.is_empty()
    }

    /// Look up a property by id
    pub fn property(&self, id: &str) -> Option<&PropertyState> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Sum of rents with no factors applied
    pub fn baseline_monthly_rent(&self) -> f64 {
        self.properties.iter().map(|p| p.monthly_rent).sum()
    }

    /// Sum of operating expenses with no factors applied
    pub fn baseline_monthly_expenses(&self) -> f64 {
        self.properties.iter().map(|p| p.monthly_expenses).sum()
    }

    /// Sum of loan interest at baseline rates
    pub fn baseline_monthly_interest(&self) -> f64 {
        self.loans.iter().map(|l| l.baseline_monthly_interest()).sum()
    }

    /// Loans whose interest cannot be attributed to a property in this snapshot
    pub fn unattributed_loans(&self) -> impl Iterator<Item = &LoanState> {
        self.loans.iter().filter(move |loan| match &loan.property_id {
            Some(id) => self.property(id).is_none(),
            None => true,
        })
    }
}
