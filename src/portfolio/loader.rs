//! Load portfolio snapshots from CSV exports or JSON

use super::{LoanState, PortfolioState, PropertyState};
use crate::error::DataError;
use csv::Reader;
use std::fs;
use std::path::Path;

/// Raw CSV row for a property export
#[derive(Debug, serde::Deserialize)]
struct PropertyRow {
    #[serde(rename = "PropertyID")]
    property_id: String,
    #[serde(rename = "MonthlyRent")]
    monthly_rent: f64,
    #[serde(rename = "MonthlyExpenses")]
    monthly_expenses: f64,
}

impl From<PropertyRow> for PropertyState {
    fn from(row: PropertyRow) -> Self {
        PropertyState::new(row.property_id, row.monthly_rent, row.monthly_expenses)
    }
}

/// Raw CSV row for a loan export. An empty `PropertyID` cell means the loan
/// is not attributed to a single property.
#[derive(Debug, serde::Deserialize)]
struct LoanRow {
    #[serde(rename = "LoanID")]
    loan_id: String,
    #[serde(rename = "PropertyID")]
    property_id: Option<String>,
    #[serde(rename = "CurrentBalance")]
    current_balance: f64,
    #[serde(rename = "InterestRate")]
    interest_rate: f64,
    #[serde(rename = "RepaymentAmount", default)]
    repayment_amount: Option<f64>,
}

impl From<LoanRow> for LoanState {
    fn from(row: LoanRow) -> Self {
        LoanState {
            id: row.loan_id,
            property_id: row.property_id.filter(|id| !id.trim().is_empty()),
            current_balance: row.current_balance,
            interest_rate: row.interest_rate,
            repayment_amount: row.repayment_amount.unwrap_or(0.0),
        }
    }
}

/// Load properties from a CSV file
pub fn load_properties<P: AsRef<Path>>(path: P) -> Result<Vec<PropertyState>, DataError> {
    let file = fs::File::open(path)?;
    load_properties_from_reader(file)
}

/// Load properties from any reader (string buffer, request body)
pub fn load_properties_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<PropertyState>, DataError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut properties = Vec::new();

    for result in csv_reader.deserialize() {
        let row: PropertyRow = result?;
        properties.push(row.into());
    }

    log::info!("Loaded {} properties", properties.len());
    Ok(properties)
}

/// Load loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanState>, DataError> {
    let file = fs::File::open(path)?;
    load_loans_from_reader(file)
}

/// Load loans from any reader
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanState>, DataError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: LoanRow = result?;
        loans.push(row.into());
    }

    log::info!("Loaded {} loans", loans.len());
    Ok(loans)
}

/// Assemble a snapshot from a property CSV and a loan CSV
pub fn load_portfolio<P: AsRef<Path>, Q: AsRef<Path>>(
    properties_csv: P,
    loans_csv: Q,
) -> Result<PortfolioState, DataError> {
    let portfolio = PortfolioState::new(load_properties(properties_csv)?, load_loans(loans_csv)?);
    warn_unattributed(&portfolio);
    Ok(portfolio)
}

/// Load a snapshot serialized as JSON (`{ "properties": [...], "loans": [...] }`)
pub fn load_portfolio_json<P: AsRef<Path>>(path: P) -> Result<PortfolioState, DataError> {
    let contents = fs::read_to_string(path)?;
    portfolio_from_json(&contents)
}

pub fn portfolio_from_json(json: &str) -> Result<PortfolioState, DataError> {
    let portfolio: PortfolioState = serde_json::from_str(json)?;
    warn_unattributed(&portfolio);
    Ok(portfolio)
}

fn warn_unattributed(portfolio: &PortfolioState) {
    for loan in portfolio.unattributed_loans() {
        if let Some(property_id) = &loan.property_id {
            log::warn!(
                "Loan {} references unknown property {}; interest counts toward totals only",
                loan.id,
                property_id
            );
        }
    }
}
