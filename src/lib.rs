//! Property Forecast - multi-year household income, tax and property debt projections
//!
//! This library provides:
//! - Progressive income tax with a flat levy
//! - Investor income trajectories with scheduled events and compounding growth
//! - Property loan balance, market value and LVR trajectories
//! - Proportional allocation of interest, rent, expenses and debt to investors
//! - Yearly household cash flow and borrowing capacity forecasts
//! - Batch and sensitivity runs over many portfolios

pub mod error;
pub mod assumptions;
pub mod portfolio;
pub mod projection;
pub mod scenario;
pub mod contract;
pub mod report;

// Re-export commonly used types
pub use error::ForecastError;
pub use assumptions::{Assumptions, TaxModel, TaxBracket};
pub use portfolio::{Investor, IncomeEvent, Property, InvestorSplit, Portfolio};
pub use projection::{forecast, ForecastEngine, ForecastConfig, ForecastResult, YearlyForecast};
pub use scenario::ScenarioRunner;
