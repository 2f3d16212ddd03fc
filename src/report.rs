//! CSV reports with calendar labels
//!
//! The engine works in relative months; this is where month `i` becomes a
//! calendar period.

use crate::error::DataError;
use crate::projection::ProjectionResult;
use chrono::{Datelike, Months, NaiveDate};
use std::io::Write;

/// First day of the calendar month `month` months after `start`
pub fn period_start(start: NaiveDate, month: u32) -> Option<NaiveDate> {
    start
        .with_day(1)?
        .checked_add_months(Months::new(month))
}

/// `YYYY-MM` label for a projection month, or the bare month index when no
/// start date is given
pub fn period_label(start: Option<NaiveDate>, month: u32) -> String {
    match start.and_then(|s| period_start(s, month)) {
        Some(date) => date.format("%Y-%m").to_string(),
        None => month.to_string(),
    }
}

/// Write portfolio totals, one row per month
pub fn write_monthly_csv<W: Write>(
    writer: W,
    result: &ProjectionResult,
    start: Option<NaiveDate>,
) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Month", "Period", "TotalIncome", "TotalExpenses", "NetCashFlow", "CumulativeNet"])?;

    for (row, cumulative) in result.monthly_results.iter().zip(result.cumulative_net()) {
        wtr.write_record([
            row.month.to_string(),
            period_label(start, row.month),
            format!("{:.2}", row.total_income),
            format!("{:.2}", row.total_expenses),
            format!("{:.2}", row.net_cash_flow),
            format!("{:.2}", cumulative),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the per-property breakdown, one row per month and property
pub fn write_property_csv<W: Write>(
    writer: W,
    result: &ProjectionResult,
    start: Option<NaiveDate>,
) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Month", "Period", "PropertyID", "Income", "Expenses", "Net"])?;

    for row in &result.monthly_results {
        let label = period_label(start, row.month);
        for (property_id, income) in &row.income_by_property {
            let expenses = row.expenses_by_property.get(property_id).copied().unwrap_or(0.0);
            wtr.write_record([
                row.month.to_string(),
                label.clone(),
                property_id.clone(),
                format!("{:.2}", income),
                format!("{:.2}", expenses),
                format!("{:.2}", income - expenses),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{LoanState, PortfolioState, PropertyState};
    use crate::projection::run_projection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_labels() {
        let start = Some(date(2026, 11, 17));
        assert_eq!(period_label(start, 0), "2026-11");
        assert_eq!(period_label(start, 2), "2027-01");
        assert_eq!(period_label(start, 14), "2028-01");
        assert_eq!(period_label(None, 5), "5");
    }

    #[test]
    fn test_month_end_start_date() {
        // Day is normalised to the 1st so short months never overflow
        assert_eq!(period_start(date(2027, 1, 31), 1), Some(date(2027, 2, 1)));
    }

    #[test]
    fn test_monthly_csv() {
        let portfolio = PortfolioState::new(
            vec![PropertyState::new("p1", 2500.0, 800.0)],
            vec![LoanState::new("l1", Some("p1"), 500_000.0, 6.0)],
        );
        let result = run_projection(&portfolio, &[], 2);

        let mut buf = Vec::new();
        write_monthly_csv(&mut buf, &result, Some(date(2026, 12, 1))).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Month,Period,TotalIncome,TotalExpenses,NetCashFlow,CumulativeNet");
        assert_eq!(lines[1], "0,2026-12,2500.00,3300.00,-800.00,-800.00");
        assert_eq!(lines[2], "1,2027-01,2500.00,3300.00,-800.00,-1600.00");
    }

    #[test]
    fn test_property_csv() {
        let portfolio = PortfolioState::new(
            vec![
                PropertyState::new("a", 1000.0, 100.0),
                PropertyState::new("b", 500.0, 50.0),
            ],
            vec![],
        );
        let result = run_projection(&portfolio, &[], 1);

        let mut buf = Vec::new();
        write_property_csv(&mut buf, &result, None).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0,0,a,1000.00,100.00,900.00");
        assert_eq!(lines[2], "0,0,b,500.00,50.00,450.00");
    }
}
