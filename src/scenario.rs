//! Scenario runner for batch forecasts
//!
//! Holds one set of assumptions and runs many portfolios or configurations
//! against it. Forecasts share nothing mutable, so batches run in parallel.

use rayon::prelude::*;

use crate::error::Result;
use crate::projection::{ForecastConfig, ForecastEngine, ForecastResult};
use crate::{Assumptions, Portfolio};

/// Pre-loaded scenario runner for batch forecasts
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for years in [10, 20, 30] {
///     let result = runner.run(&portfolio, ForecastConfig::for_years(years))?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Pre-loaded base assumptions
    base_assumptions: Assumptions,
}

/// Outcome of one growth-rate sensitivity run
#[derive(Debug, Clone)]
pub struct SensitivityRun {
    /// Amount added to every property's growth rate
    pub growth_delta: f64,
    pub result: ForecastResult,
}

impl ScenarioRunner {
    /// Create runner with the built-in model
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::default_model(),
        }
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Run a single forecast with the given config
    pub fn run(&self, portfolio: &Portfolio, config: ForecastConfig) -> Result<ForecastResult> {
        ForecastEngine::new(self.base_assumptions.clone(), config).project(portfolio)
    }

    /// Forecast many portfolios with the same config, in parallel
    ///
    /// Results keep the input order; each portfolio succeeds or fails on its own.
    pub fn run_batch(&self, portfolios: &[Portfolio], config: ForecastConfig) -> Vec<Result<ForecastResult>> {
        let engine = ForecastEngine::new(self.base_assumptions.clone(), config);
        portfolios.par_iter().map(|p| engine.project(p)).collect()
    }

    /// Run multiple configs for a single portfolio
    pub fn run_scenarios(&self, portfolio: &Portfolio, configs: &[ForecastConfig]) -> Result<Vec<ForecastResult>> {
        configs
            .iter()
            .map(|config| self.run(portfolio, config.clone()))
            .collect()
    }

    /// Re-run a portfolio with every property's growth rate shifted by each delta
    pub fn run_growth_sensitivity(
        &self,
        portfolio: &Portfolio,
        config: ForecastConfig,
        deltas: &[f64],
    ) -> Result<Vec<SensitivityRun>> {
        let engine = ForecastEngine::new(self.base_assumptions.clone(), config);
        deltas
            .par_iter()
            .map(|&delta| {
                let shifted = portfolio.with_growth_shift(delta);
                engine.project(&shifted).map(|result| SensitivityRun {
                    growth_delta: delta,
                    result,
                })
            })
            .collect()
    }

    /// Get reference to base assumptions for inspection/modification
    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Get mutable reference to base assumptions for customization
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
