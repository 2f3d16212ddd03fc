//! Cashflow Scenarios CLI
//!
//! Command-line interface for running portfolio cash-flow projections

use anyhow::{bail, Context, Result};
use cashflow_scenarios::{
    factors::load_factors_json,
    portfolio::{load_portfolio, load_portfolio_json},
    report::{period_label, write_monthly_csv, write_property_csv},
    PortfolioState, ProjectionConfig, ProjectionResult, Scenario, ScenarioRunner,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;

/// Monthly cash-flow projections for property investment portfolios
#[derive(Parser)]
#[command(name = "cashflow-scenarios", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a scenario and write monthly CSV reports
    Project(ProjectArgs),
    /// Compare a scenario against the no-factor baseline
    Compare(ProjectArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Property CSV (PropertyID,MonthlyRent,MonthlyExpenses)
    #[arg(long, requires = "loans", conflicts_with = "portfolio")]
    properties: Option<PathBuf>,

    /// Loan CSV (LoanID,PropertyID,CurrentBalance,InterestRate,RepaymentAmount)
    #[arg(long, requires = "properties")]
    loans: Option<PathBuf>,

    /// Portfolio snapshot as JSON
    #[arg(long)]
    portfolio: Option<PathBuf>,

    /// Scenario definition JSON (name, timeHorizonMonths, factors)
    #[arg(long, conflicts_with = "factors")]
    scenario: Option<PathBuf>,

    /// JSON array of stored factor rows
    #[arg(long)]
    factors: Option<PathBuf>,

    /// Months to project; overrides the scenario file's horizon
    #[arg(long, env = "PROJECTION_MONTHS")]
    months: Option<u32>,

    /// Compute months in parallel
    #[arg(long)]
    parallel: bool,

    /// Calendar date of projection month 0 (YYYY-MM-DD), used for report labels
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Directory for CSV reports
    #[arg(long, default_value = ".")]
    output: PathBuf,
}

impl ProjectArgs {
    fn load_portfolio(&self) -> Result<PortfolioState> {
        match (&self.portfolio, &self.properties, &self.loans) {
            (Some(path), _, _) => load_portfolio_json(path)
                .with_context(|| format!("failed to load portfolio {}", path.display())),
            (None, Some(properties), Some(loans)) => load_portfolio(properties, loans)
                .context("failed to load property/loan CSVs"),
            _ => bail!("provide --portfolio or both --properties and --loans"),
        }
    }

    fn load_scenario(&self, config: &ProjectionConfig) -> Result<Scenario> {
        let mut scenario = match (&self.scenario, &self.factors) {
            (Some(path), _) => Scenario::from_json_path(path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?,
            (None, Some(path)) => {
                let factors = load_factors_json(path)
                    .with_context(|| format!("failed to load factors {}", path.display()))?;
                Scenario::new("custom", config.time_horizon_months, factors)
            }
            (None, None) => Scenario::new("baseline", config.time_horizon_months, Vec::new()),
        };

        if let Some(months) = self.months {
            scenario.time_horizon_months = months;
        }
        Ok(scenario)
    }

    fn config(&self) -> ProjectionConfig {
        let defaults = ProjectionConfig::default();
        ProjectionConfig {
            time_horizon_months: self.months.unwrap_or(defaults.time_horizon_months),
            parallel: self.parallel,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Project(args) => project(&args),
        Commands::Compare(args) => compare(&args),
    }
}

fn project(args: &ProjectArgs) -> Result<()> {
    let config = args.config();
    let portfolio = args.load_portfolio()?;
    let scenario = args.load_scenario(&config)?;

    let runner = ScenarioRunner::with_config(portfolio, &config);
    let result = runner.run(&scenario)?;

    println!("Scenario: {} ({} months)", scenario.name, scenario.time_horizon_months);
    print_months(&result, args.start_date);
    print_summary(&result);

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let monthly_path = args.output.join("projection_monthly.csv");
    let file = File::create(&monthly_path)
        .with_context(|| format!("failed to create {}", monthly_path.display()))?;
    write_monthly_csv(file, &result, args.start_date)?;

    let property_path = args.output.join("projection_by_property.csv");
    let file = File::create(&property_path)
        .with_context(|| format!("failed to create {}", property_path.display()))?;
    write_property_csv(file, &result, args.start_date)?;

    println!("\nMonthly results written to: {}", monthly_path.display());
    println!("Property breakdown written to: {}", property_path.display());
    Ok(())
}

fn compare(args: &ProjectArgs) -> Result<()> {
    let config = args.config();
    let portfolio = args.load_portfolio()?;
    let scenario = args.load_scenario(&config)?;

    let runner = ScenarioRunner::with_config(portfolio, &config);
    let comparison = runner.compare(&scenario)?;

    println!("Scenario: {} vs baseline ({} months)", comparison.scenario_name, scenario.time_horizon_months);
    println!("{:<26} {:>14} {:>14}", "", "Baseline", "Scenario");
    println!("{}", "-".repeat(56));
    let rows = [
        ("Total income", comparison.baseline.total_income, comparison.scenario.total_income),
        ("Total expenses", comparison.baseline.total_expenses, comparison.scenario.total_expenses),
        ("Total net", comparison.baseline.total_net, comparison.scenario.total_net),
        ("Average monthly net", comparison.baseline.average_monthly_net, comparison.scenario.average_monthly_net),
        ("Lowest month net", comparison.baseline.lowest_month_net, comparison.scenario.lowest_month_net),
        ("Highest month net", comparison.baseline.highest_month_net, comparison.scenario.highest_month_net),
    ];
    for (label, baseline, scenario) in rows {
        println!("{:<26} {:>14.2} {:>14.2}", label, baseline, scenario);
    }
    println!(
        "{:<26} {:>14} {:>14}",
        "Negative months",
        comparison.baseline.months_with_negative_cash_flow,
        comparison.scenario.months_with_negative_cash_flow
    );

    println!("\nTotal net delta: ${:.2}", comparison.total_net_delta);
    println!("Negative months delta: {:+}", comparison.negative_months_delta);
    Ok(())
}

fn print_months(result: &ProjectionResult, start: Option<NaiveDate>) {
    println!("{:>5} {:>8} {:>14} {:>14} {:>14}", "Month", "Period", "Income", "Expenses", "Net");
    println!("{}", "-".repeat(60));

    for row in result.monthly_results.iter().take(24) {
        println!(
            "{:>5} {:>8} {:>14.2} {:>14.2} {:>14.2}",
            row.month,
            period_label(start, row.month),
            row.total_income,
            row.total_expenses,
            row.net_cash_flow,
        );
    }

    if result.monthly_results.len() > 24 {
        println!("... ({} more months)", result.monthly_results.len() - 24);
    }
}

fn print_summary(result: &ProjectionResult) {
    let summary = &result.summary_metrics;
    println!("\nSummary:");
    println!("  Total Income: ${:.2}", summary.total_income);
    println!("  Total Expenses: ${:.2}", summary.total_expenses);
    println!("  Total Net: ${:.2}", summary.total_net);
    println!("  Average Monthly Net: ${:.2}", summary.average_monthly_net);
    println!("  Months With Negative Cash Flow: {}", summary.months_with_negative_cash_flow);
    println!("  Lowest Month Net: ${:.2}", summary.lowest_month_net);
    println!("  Highest Month Net: ${:.2}", summary.highest_month_net);
}
