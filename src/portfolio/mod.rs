//! Investor and property definitions and portfolio loading

mod data;
pub mod loader;

pub use data::{
    IncomeEvent, IncomeEventKind, IncomeEventRecord, Investor, InvestorRecord, InvestorSplit,
    InvestorSplitRecord, Portfolio, Property, PropertyRecord,
};
pub use loader::{load_portfolio, load_portfolio_from_reader, PortfolioDocument};
