//! Property Forecast CLI
//!
//! Command-line interface for running household forecasts

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Datelike;
use clap::Parser;

use property_forecast::{
    portfolio::load_portfolio,
    report::write_forecast_csv,
    Assumptions, ForecastConfig, ForecastEngine,
};

#[derive(Debug, Parser)]
#[command(name = "property_forecast", version, about = "Forecast household income, tax and property debt")]
struct Args {
    /// Portfolio JSON with `investors` and `properties`
    #[arg(short, long)]
    input: PathBuf,

    /// Number of years to forecast
    #[arg(short, long, default_value_t = 30)]
    years: u32,

    /// Directory holding tax_brackets.csv and model_rates.csv
    #[arg(short, long)]
    assumptions: Option<PathBuf>,

    /// Write the full forecast as CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Calendar year of forecast year 1 (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,

    /// Reject properties whose investor splits do not sum to 100
    #[arg(long)]
    strict_splits: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Property Forecast v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    let portfolio = load_portfolio(&args.input)
        .with_context(|| format!("loading portfolio from {}", args.input.display()))?;

    let assumptions = match &args.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => Assumptions::default_model(),
    };

    println!("Investors: {}", portfolio.investors().len());
    for investor in portfolio.investors() {
        println!("  {}: base income ${:.2}, growth {:.2}%",
            investor.name, investor.base_income, investor.annual_growth_rate * 100.0);
    }
    println!("Properties: {}", portfolio.properties().len());
    for property in portfolio.properties() {
        println!("  {}: purchased year {}, loan ${:.2}, value ${:.2}",
            property.name, property.purchase_year, property.loan_amount, property.initial_value);
    }
    println!();

    let config = ForecastConfig {
        years: args.years,
        enforce_split_totals: args.strict_splits,
    };
    let engine = ForecastEngine::new(assumptions, config);
    let result = engine.project(&portfolio)?;

    let start_year = args.start_year.unwrap_or_else(|| chrono::Local::now().year());

    println!("Forecast Results ({} years):", result.forecasts.len());
    println!("{:>4} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Cal", "Combined", "Rent", "Interest", "Surplus", "TotalDebt");
    println!("{}", "-".repeat(86));

    for year in &result.forecasts {
        println!("{:>4} {:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            year.year,
            start_year + year.year as i32 - 1,
            year.combined_income,
            year.total_rent,
            year.total_interest,
            year.household_surplus,
            year.total_debt,
        );
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_forecast_csv(BufWriter::new(file), &result, Some(start_year))?;
        println!("\nFull results written to: {}", path.display());
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Years: {}", summary.total_years);
    println!("  Final Total Debt: ${:.2}", summary.final_total_debt);
    if let Some(year) = summary.peak_debt_year {
        println!("  Peak Total Debt: ${:.2} (year {})", summary.peak_total_debt, year);
    }
    println!("  Final Household Surplus: ${:.2}", summary.final_household_surplus);
    println!("  Cumulative Surplus: ${:.2}", summary.cumulative_surplus);
    println!("  Cumulative Rent: ${:.2}", summary.total_rent);
    println!("  Cumulative Interest: ${:.2}", summary.total_interest);
    for (name, capacity) in &summary.min_borrowing_capacity {
        println!("  Lowest Borrowing Capacity ({}): ${:.2}", name, capacity);
    }

    Ok(())
}
