//! Portfolio snapshot structures and loading

mod data;
pub mod loader;

pub use data::{PropertyState, LoanState, PortfolioState};
pub use loader::{
    load_properties, load_properties_from_reader, load_loans, load_loans_from_reader,
    load_portfolio, load_portfolio_json, portfolio_from_json,
};
