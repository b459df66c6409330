//! Forecast engine: ledgers, allocation and yearly output

mod state;
mod allocation;
mod engine;
mod output;

pub use state::{loan_to_value, IncomeLedger, IncomeYear, PropertyLedger, PropertyYear};
pub use allocation::{AllocationEngine, DebtBook, InvestorShares, YearShares};
pub use engine::{forecast, forecast_records, ForecastConfig, ForecastEngine};
pub use output::{ForecastResult, ForecastSummary, YearlyForecast};
