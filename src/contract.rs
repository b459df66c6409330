//! Stored representation used by the surrounding system
//!
//! The attribute store keeps rates as whole-number percentages (`5` means
//! 5%). Conversion to the fractional rates the engine works in happens here,
//! on the way in and out, and nowhere else.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::portfolio::{
    IncomeEventRecord, InvestorRecord, InvestorSplitRecord, Portfolio, PropertyRecord,
};

/// Whole-number percentage to fraction
pub fn percent_to_fraction(percent: i64) -> f64 {
    percent as f64 / 100.0
}

/// Fraction to the nearest whole-number percentage
pub fn fraction_to_percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredInvestor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_income: Option<f64>,
    /// Whole-number percent
    #[serde(default)]
    pub annual_growth_rate: Option<i64>,
    #[serde(default)]
    pub essential_expenditure: Option<f64>,
    #[serde(default)]
    pub nonessential_expenditure: Option<f64>,
    #[serde(default)]
    pub income_events: Vec<IncomeEventRecord>,
}

impl StoredInvestor {
    pub fn into_record(self) -> InvestorRecord {
        InvestorRecord {
            name: self.name,
            base_income: self.base_income,
            annual_growth_rate: self.annual_growth_rate.map(percent_to_fraction),
            essential_expenditure: self.essential_expenditure,
            nonessential_expenditure: self.nonessential_expenditure,
            income_events: self.income_events,
        }
    }

    /// Stored form of a record; rates round to whole percentages
    pub fn from_record(record: &InvestorRecord) -> Self {
        Self {
            name: record.name.clone(),
            base_income: record.base_income,
            annual_growth_rate: record.annual_growth_rate.map(fraction_to_percent),
            essential_expenditure: record.essential_expenditure,
            nonessential_expenditure: record.nonessential_expenditure,
            income_events: record.income_events.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredProperty {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub purchase_year: Option<u32>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub annual_principal_change: Option<f64>,
    #[serde(default)]
    pub rent: Option<f64>,
    /// Whole-number percent
    #[serde(default)]
    pub interest_rate: Option<i64>,
    #[serde(default)]
    pub other_expenses: Option<f64>,
    #[serde(default)]
    pub initial_value: Option<f64>,
    /// Whole-number percent
    #[serde(default)]
    pub growth_rate: Option<i64>,
    #[serde(default)]
    pub investor_splits: Vec<InvestorSplitRecord>,
}

impl StoredProperty {
    pub fn into_record(self) -> PropertyRecord {
        PropertyRecord {
            name: self.name,
            purchase_year: self.purchase_year,
            loan_amount: self.loan_amount,
            annual_principal_change: self.annual_principal_change,
            rent: self.rent,
            interest_rate: self.interest_rate.map(percent_to_fraction),
            other_expenses: self.other_expenses,
            initial_value: self.initial_value,
            growth_rate: self.growth_rate.map(percent_to_fraction),
            investor_splits: self.investor_splits,
        }
    }

    /// Stored form of a record; rates round to whole percentages
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            name: record.name.clone(),
            purchase_year: record.purchase_year,
            loan_amount: record.loan_amount,
            annual_principal_change: record.annual_principal_change,
            rent: record.rent,
            interest_rate: record.interest_rate.map(fraction_to_percent),
            other_expenses: record.other_expenses,
            initial_value: record.initial_value,
            growth_rate: record.growth_rate.map(fraction_to_percent),
            investor_splits: record.investor_splits.clone(),
        }
    }
}

/// Convert stored investors and properties and validate them
pub fn portfolio_from_stored(investors: Vec<StoredInvestor>, properties: Vec<StoredProperty>) -> Result<Portfolio> {
    Portfolio::from_records(
        investors.into_iter().map(StoredInvestor::into_record).collect(),
        properties.into_iter().map(StoredProperty::into_record).collect(),
    )
}
