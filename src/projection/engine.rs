//! Core forecast engine for yearly household projections

use crate::assumptions::{round_cents, Assumptions};
use crate::error::{ForecastError, Result};
use crate::portfolio::{Investor, InvestorRecord, Portfolio, Property, PropertyRecord};
use super::allocation::AllocationEngine;
use super::output::{ForecastResult, YearlyForecast};
use super::state::{IncomeLedger, PropertyLedger};

/// Tolerance when checking split percentages against 100
const SPLIT_TOLERANCE: f64 = 1e-6;

/// Configuration for a forecast run
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Number of years to forecast (at least 1)
    pub years: u32,

    /// Reject properties whose splits do not sum to 100 instead of
    /// allocating whatever is specified
    pub enforce_split_totals: bool,
}

impl ForecastConfig {
    pub fn for_years(years: u32) -> Self {
        Self { years, ..Default::default() }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            years: 30,
            enforce_split_totals: false,
        }
    }
}

/// Main forecast engine
///
/// Holds no state between runs, so one engine can serve any number of
/// threads at once.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    assumptions: Assumptions,
    config: ForecastConfig,
}

impl ForecastEngine {
    /// Create a new forecast engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ForecastConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run the forecast for a validated portfolio
    ///
    /// All checks happen before the first year; on error nothing is produced.
    pub fn project(&self, portfolio: &Portfolio) -> Result<ForecastResult> {
        self.check(portfolio)?;

        log::info!(
            "Forecasting {} years for {} investors and {} properties",
            self.config.years,
            portfolio.investors().len(),
            portfolio.properties().len()
        );

        let mut incomes: Vec<IncomeLedger> = portfolio.investors().iter().map(IncomeLedger::new).collect();
        let mut properties: Vec<PropertyLedger> = portfolio.properties().iter().map(PropertyLedger::new).collect();
        let mut allocation = AllocationEngine::new(portfolio.investors());

        let mut result = ForecastResult::new();
        for year in 1..=self.config.years {
            let forecast = self.project_year(year, &mut incomes, &mut properties, &mut allocation);
            log::debug!(
                "Year {}: combined income {:.2}, surplus {:.2}, total debt {:.2}",
                year,
                forecast.combined_income,
                forecast.household_surplus,
                forecast.total_debt
            );
            result.add_year(forecast);
        }

        if let Some(last) = result.forecasts.last() {
            log::info!("Forecast complete: final total debt {:.2}", last.total_debt);
        }

        Ok(result)
    }

    fn check(&self, portfolio: &Portfolio) -> Result<()> {
        if self.config.years == 0 {
            return Err(ForecastError::InvalidYears(self.config.years));
        }

        for property in portfolio.properties() {
            let total = property.split_total();
            if (total - 100.0).abs() <= SPLIT_TOLERANCE {
                continue;
            }
            if self.config.enforce_split_totals {
                return Err(ForecastError::SplitTotal {
                    property: property.name.clone(),
                    total,
                });
            }
            log::warn!(
                "Property '{}' splits sum to {}%; allocating as specified",
                property.name,
                total
            );
        }

        Ok(())
    }

    /// Advance every ledger to `year` and assemble its record
    fn project_year(
        &self,
        year: u32,
        incomes: &mut [IncomeLedger],
        properties: &mut [PropertyLedger],
        allocation: &mut AllocationEngine,
    ) -> YearlyForecast {
        let mut forecast = YearlyForecast::new(year);

        let income_years: Vec<_> = incomes
            .iter_mut()
            .map(|ledger| (ledger.investor(), ledger.advance(year, self.assumptions.cpi_rate)))
            .collect();

        let mut held = Vec::new();
        for ledger in properties.iter_mut() {
            let property = ledger.property();
            if let Some(snapshot) = ledger.advance(year) {
                allocation.record_debt(property, snapshot.debt_change);
                forecast.property_loan_balances.insert(property.name.clone(), snapshot.balance);
                forecast.property_values.insert(property.name.clone(), snapshot.value);
                forecast.property_lvrs.insert(property.name.clone(), snapshot.lvr);
                held.push((property, snapshot.balance));
            }
        }

        let shares = allocation.allocate_year(held);

        for (investor, income) in &income_years {
            let name = &investor.name;
            let after_tax = self.assumptions.tax.net_income(income.gross_income);
            let share = shares.share(name);
            let net = round_cents(after_tax - income.total_expenditure() + share.net_cashflow());
            let debt = allocation.debts().debt(name);

            forecast.combined_income += after_tax;
            forecast.total_expenditure += income.total_expenditure();

            forecast.gross_incomes.insert(name.clone(), round_cents(income.gross_income));
            forecast.after_tax_incomes.insert(name.clone(), after_tax);
            forecast.net_incomes.insert(name.clone(), net);
            forecast.property_shares.insert(name.clone(), share);
            forecast.investor_debts.insert(name.clone(), debt);
            forecast
                .borrowing_capacities
                .insert(name.clone(), self.borrowing_capacity(net, debt));
        }

        forecast.total_rent = shares.total_rent;
        forecast.total_interest = shares.total_interest;
        forecast.total_other_expenses = shares.total_other_expenses;
        forecast.combined_income = round_cents(forecast.combined_income);
        forecast.household_surplus = round_cents(
            forecast.combined_income - forecast.total_expenditure + shares.property_cashflow(),
        );
        forecast.total_debt = forecast.property_loan_balances.values().sum();

        forecast
    }

    /// Serviceability heuristic: a multiple of net income less existing debt
    pub fn borrowing_capacity(&self, net_income: f64, debt: f64) -> f64 {
        round_cents(net_income * self.assumptions.borrowing_multiplier - debt)
    }
}

/// Forecast `years` years with the default model
pub fn forecast(investors: Vec<Investor>, properties: Vec<Property>, years: u32) -> Result<Vec<YearlyForecast>> {
    let portfolio = Portfolio::new(investors, properties)?;
    let engine = ForecastEngine::new(Assumptions::default_model(), ForecastConfig::for_years(years));
    Ok(engine.project(&portfolio)?.into_forecasts())
}

/// Validate loosely-shaped records, then forecast with the default model
pub fn forecast_records(
    investors: Vec<InvestorRecord>,
    properties: Vec<PropertyRecord>,
    years: u32,
) -> Result<Vec<YearlyForecast>> {
    let portfolio = Portfolio::from_records(investors, properties)?;
    let engine = ForecastEngine::new(Assumptions::default_model(), ForecastConfig::for_years(years));
    Ok(engine.project(&portfolio)?.into_forecasts())
}
