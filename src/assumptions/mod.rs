//! Model assumptions: tax table, CPI and the borrowing heuristic

mod tax;
pub mod loader;

pub use tax::{round_cents, TaxBracket, TaxModel, DEFAULT_BRACKETS, DEFAULT_LEVY_RATE};
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::{ForecastError, Result};

/// Annual inflation applied to expenditure figures
pub const DEFAULT_CPI_RATE: f64 = 0.03;

/// Serviceability multiple of net income used for borrowing capacity
pub const DEFAULT_BORROWING_MULTIPLIER: f64 = 6.0;

/// Container for all forecast assumptions
///
/// Immutable for the duration of a run; clone it to vary a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub tax: TaxModel,
    pub cpi_rate: f64,
    pub borrowing_multiplier: f64,
}

impl Assumptions {
    /// Built-in bracket table, levy, CPI and multiplier
    pub fn default_model() -> Self {
        Self {
            tax: TaxModel::default(),
            cpi_rate: DEFAULT_CPI_RATE,
            borrowing_multiplier: DEFAULT_BORROWING_MULTIPLIER,
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Self::from_loaded(loaded)
    }

    pub fn from_loaded(loaded: LoadedAssumptions) -> Result<Self> {
        let levy_rate = finite_rate(&loaded, loader::LEVY_RATE, DEFAULT_LEVY_RATE)?;
        let cpi_rate = finite_rate(&loaded, loader::CPI_RATE, DEFAULT_CPI_RATE)?;
        let borrowing_multiplier =
            finite_rate(&loaded, loader::BORROWING_MULTIPLIER, DEFAULT_BORROWING_MULTIPLIER)?;

        Ok(Self {
            cpi_rate,
            borrowing_multiplier,
            tax: TaxModel::new(loaded.tax_brackets, levy_rate)?,
        })
    }
}

fn finite_rate(loaded: &LoadedAssumptions, name: &str, default: f64) -> Result<f64> {
    let value = loaded.rate(name).unwrap_or(default);
    if !value.is_finite() {
        return Err(ForecastError::InvalidTaxTable(format!(
            "model rate '{}' is not a finite number: {}",
            name, value
        )));
    }
    Ok(value)
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_model()
    }
}
