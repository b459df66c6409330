//! Load portfolios from JSON documents

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{InvestorRecord, Portfolio, PropertyRecord};
use crate::error::Result;

/// Top-level document: `{ "investors": [...], "properties": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioDocument {
    #[serde(default)]
    pub investors: Vec<InvestorRecord>,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
}

impl PortfolioDocument {
    pub fn into_portfolio(self) -> Result<Portfolio> {
        Portfolio::from_records(self.investors, self.properties)
    }
}

/// Load and validate a portfolio from a JSON file
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Portfolio> {
    let file = File::open(path)?;
    load_portfolio_from_reader(BufReader::new(file))
}

/// Load and validate a portfolio from any reader (e.g., string buffer, request body)
pub fn load_portfolio_from_reader<R: Read>(reader: R) -> Result<Portfolio> {
    let document: PortfolioDocument = serde_json::from_reader(reader)?;
    log::debug!(
        "Read {} investor and {} property records",
        document.investors.len(),
        document.properties.len()
    );
    document.into_portfolio()
}
