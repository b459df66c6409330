//! Forecast output structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::allocation::InvestorShares;

/// Household position for one forecast year
///
/// Per-property maps only hold properties purchased by `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyForecast {
    /// Forecast year (1-indexed)
    pub year: u32,

    // Investor income
    pub gross_incomes: BTreeMap<String, f64>,
    pub after_tax_incomes: BTreeMap<String, f64>,
    /// After tax, spending and the investor's property shares
    pub net_incomes: BTreeMap<String, f64>,
    pub property_shares: BTreeMap<String, InvestorShares>,

    // Investor debt and capacity
    pub investor_debts: BTreeMap<String, f64>,
    pub borrowing_capacities: BTreeMap<String, f64>,

    // Household aggregates
    /// Sum of after-tax incomes, before spending and property cash flow
    pub combined_income: f64,
    pub total_expenditure: f64,
    pub total_rent: f64,
    pub total_interest: f64,
    pub total_other_expenses: f64,
    pub household_surplus: f64,
    pub total_debt: f64,

    // Properties
    pub property_loan_balances: BTreeMap<String, f64>,
    pub property_lvrs: BTreeMap<String, f64>,
    pub property_values: BTreeMap<String, f64>,
}

impl YearlyForecast {
    pub fn new(year: u32) -> Self {
        Self {
            year,
            gross_incomes: BTreeMap::new(),
            after_tax_incomes: BTreeMap::new(),
            net_incomes: BTreeMap::new(),
            property_shares: BTreeMap::new(),
            investor_debts: BTreeMap::new(),
            borrowing_capacities: BTreeMap::new(),
            combined_income: 0.0,
            total_expenditure: 0.0,
            total_rent: 0.0,
            total_interest: 0.0,
            total_other_expenses: 0.0,
            household_surplus: 0.0,
            total_debt: 0.0,
            property_loan_balances: BTreeMap::new(),
            property_lvrs: BTreeMap::new(),
            property_values: BTreeMap::new(),
        }
    }

    /// Rent less interest and other expenses, across all held properties
    pub fn property_cashflow(&self) -> f64 {
        self.total_rent - self.total_interest - self.total_other_expenses
    }
}

/// Complete forecast, one record per year in ascending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub forecasts: Vec<YearlyForecast>,
}

impl ForecastResult {
    pub fn new() -> Self {
        Self { forecasts: Vec::new() }
    }

    pub fn add_year(&mut self, forecast: YearlyForecast) {
        self.forecasts.push(forecast);
    }

    pub fn year(&self, year: u32) -> Option<&YearlyForecast> {
        self.forecasts.iter().find(|f| f.year == year)
    }

    pub fn into_forecasts(self) -> Vec<YearlyForecast> {
        self.forecasts
    }

    /// Get summary statistics
    pub fn summary(&self) -> ForecastSummary {
        let cumulative_surplus: f64 = self.forecasts.iter().map(|f| f.household_surplus).sum();
        let total_rent: f64 = self.forecasts.iter().map(|f| f.total_rent).sum();
        let total_interest: f64 = self.forecasts.iter().map(|f| f.total_interest).sum();
        let total_other_expenses: f64 = self.forecasts.iter().map(|f| f.total_other_expenses).sum();

        let final_total_debt = self.forecasts.last().map(|f| f.total_debt).unwrap_or(0.0);
        let final_household_surplus = self.forecasts.last().map(|f| f.household_surplus).unwrap_or(0.0);

        // first year wins ties
        let peak = self
            .forecasts
            .iter()
            .fold(None::<&YearlyForecast>, |best, f| match best {
                Some(b) if b.total_debt >= f.total_debt => Some(b),
                _ => Some(f),
            });

        let mut min_borrowing_capacity = BTreeMap::new();
        for forecast in &self.forecasts {
            for (name, &capacity) in &forecast.borrowing_capacities {
                min_borrowing_capacity
                    .entry(name.clone())
                    .and_modify(|m: &mut f64| *m = m.min(capacity))
                    .or_insert(capacity);
            }
        }

        ForecastSummary {
            total_years: self.forecasts.len() as u32,
            final_total_debt,
            final_household_surplus,
            cumulative_surplus,
            total_rent,
            total_interest,
            total_other_expenses,
            peak_total_debt: peak.map(|f| f.total_debt).unwrap_or(0.0),
            peak_debt_year: peak.map(|f| f.year),
            min_borrowing_capacity,
        }
    }
}

impl Default for ForecastResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_years: u32,
    pub final_total_debt: f64,
    pub final_household_surplus: f64,
    pub cumulative_surplus: f64,
    pub total_rent: f64,
    pub total_interest: f64,
    pub total_other_expenses: f64,
    pub peak_total_debt: f64,
    pub peak_debt_year: Option<u32>,
    /// Lowest capacity each investor reaches over the forecast
    pub min_borrowing_capacity: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(year: u32, debt: f64, surplus: f64, capacity: f64) -> YearlyForecast {
        let mut forecast = YearlyForecast::new(year);
        forecast.total_debt = debt;
        forecast.household_surplus = surplus;
        forecast.total_rent = 1_000.0;
        forecast.borrowing_capacities.insert("A".into(), capacity);
        forecast
    }

    #[test]
    fn test_summary() {
        let mut result = ForecastResult::new();
        result.add_year(year(1, 100.0, 10.0, 50.0));
        result.add_year(year(2, 300.0, -5.0, -20.0));
        result.add_year(year(3, 300.0, 7.0, 40.0));

        let summary = result.summary();

        assert_eq!(summary.total_years, 3);
        assert_eq!(summary.final_total_debt, 300.0);
        assert_eq!(summary.final_household_surplus, 7.0);
        assert_eq!(summary.cumulative_surplus, 12.0);
        assert_eq!(summary.total_rent, 3_000.0);
        assert_eq!(summary.peak_total_debt, 300.0);
        assert_eq!(summary.peak_debt_year, Some(2));
        assert_eq!(summary.min_borrowing_capacity["A"], -20.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ForecastResult::new().summary();
        assert_eq!(summary.total_years, 0);
        assert_eq!(summary.peak_debt_year, None);
        assert!(summary.min_borrowing_capacity.is_empty());
    }
}
