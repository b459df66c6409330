//! CSV-based assumption loader
//!
//! Loads the tax table and model rates from CSV files in data/assumptions/

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::tax::TaxBracket;
use crate::error::{ForecastError, Result};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const TAX_BRACKETS_FILE: &str = "tax_brackets.csv";
pub const MODEL_RATES_FILE: &str = "model_rates.csv";

pub const LEVY_RATE: &str = "levy_rate";
pub const CPI_RATE: &str = "cpi_rate";
pub const BORROWING_MULTIPLIER: &str = "borrowing_multiplier";

/// Rate names accepted in model_rates.csv
pub const MODEL_RATE_NAMES: [&str; 3] = [LEVY_RATE, CPI_RATE, BORROWING_MULTIPLIER];

/// Load tax brackets from CSV
/// Rows are `threshold,rate`, ascending by threshold
pub fn load_tax_brackets(path: &Path) -> Result<Vec<TaxBracket>> {
    let file = File::open(path.join(TAX_BRACKETS_FILE))?;
    load_tax_brackets_from_reader(file)
}

pub fn load_tax_brackets_from_reader<R: Read>(reader: R) -> Result<Vec<TaxBracket>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut brackets = Vec::new();

    for result in reader.records() {
        let record = result?;
        let threshold = parse_number(&record, 0, "threshold")?;
        let rate = parse_number(&record, 1, "rate")?;
        brackets.push(TaxBracket::new(threshold, rate));
    }

    Ok(brackets)
}

/// Load named model rates from CSV
/// Returns HashMap<name, value> for rows of `name,value`; names must be
/// one of [`MODEL_RATE_NAMES`]
pub fn load_model_rates(path: &Path) -> Result<HashMap<String, f64>> {
    let file = File::open(path.join(MODEL_RATES_FILE))?;
    load_model_rates_from_reader(file)
}

pub fn load_model_rates_from_reader<R: Read>(reader: R) -> Result<HashMap<String, f64>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rates = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let name = record.get(0).unwrap_or_default().trim();
        if !MODEL_RATE_NAMES.contains(&name) {
            return Err(ForecastError::InvalidTaxTable(format!(
                "unknown model rate '{}', expected one of {}",
                name,
                MODEL_RATE_NAMES.join(", ")
            )));
        }
        let value = parse_number(&record, 1, "value")?;
        rates.insert(name.to_string(), value);
    }

    Ok(rates)
}

fn parse_number(record: &csv::StringRecord, idx: usize, column: &str) -> Result<f64> {
    let raw = record.get(idx).unwrap_or_default().trim();
    raw.parse().map_err(|_| {
        ForecastError::InvalidTaxTable(format!(
            "column '{}' has non-numeric value '{}'",
            column, raw
        ))
    })
}

/// Raw assumption tables as read from disk
pub struct LoadedAssumptions {
    pub tax_brackets: Vec<TaxBracket>,
    pub model_rates: HashMap<String, f64>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    ///
    /// `model_rates.csv` is optional; a missing file leaves every rate at its default.
    pub fn load_from(path: &Path) -> Result<Self> {
        let model_rates = if path.join(MODEL_RATES_FILE).exists() {
            load_model_rates(path)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            tax_brackets: load_tax_brackets(path)?,
            model_rates,
        })
    }

    pub fn rate(&self, name: &str) -> Option<f64> {
        self.model_rates.get(name).copied()
    }
}
