//! Proportional allocation of property economics to investors
//!
//! Two kinds of state live here. `DebtBook` is a running total carried
//! across the whole forecast. `YearShares` is rebuilt every year from the
//! properties held in that year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::portfolio::{Investor, Property};

/// Cumulative debt attributed to each investor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtBook {
    debts: BTreeMap<String, f64>,
}

impl DebtBook {
    pub fn new<'a>(investors: impl IntoIterator<Item = &'a Investor>) -> Self {
        Self {
            debts: investors.into_iter().map(|i| (i.name.clone(), 0.0)).collect(),
        }
    }

    /// Spread a change in a property's balance across its splits
    pub fn record(&mut self, property: &Property, change: f64) {
        for split in &property.investor_splits {
            *self.debts.entry(split.investor_name.clone()).or_insert(0.0) += change * split.fraction();
        }
    }

    pub fn debt(&self, investor: &str) -> f64 {
        self.debts.get(investor).copied().unwrap_or(0.0)
    }

    pub fn debts(&self) -> &BTreeMap<String, f64> {
        &self.debts
    }
}

/// One investor's share of property cash flows for a single year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorShares {
    pub rent: f64,
    pub interest: f64,
    pub other_expenses: f64,
}

impl InvestorShares {
    /// Rent less interest and other expenses
    pub fn net_cashflow(&self) -> f64 {
        self.rent - self.interest - self.other_expenses
    }
}

/// Per-year property cash flows, apportioned and property-wide
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearShares {
    shares: BTreeMap<String, InvestorShares>,

    pub total_rent: f64,
    pub total_interest: f64,
    pub total_other_expenses: f64,
}

impl YearShares {
    pub fn new<'a>(investors: impl IntoIterator<Item = &'a Investor>) -> Self {
        Self {
            shares: investors
                .into_iter()
                .map(|i| (i.name.clone(), InvestorShares::default()))
                .collect(),
            ..Default::default()
        }
    }

    /// Add one held property with its balance for the year
    pub fn allocate(&mut self, property: &Property, balance: f64) {
        let interest = balance * property.interest_rate;

        self.total_rent += property.rent;
        self.total_interest += interest;
        self.total_other_expenses += property.other_expenses;

        for split in &property.investor_splits {
            let fraction = split.fraction();
            let share = self.shares.entry(split.investor_name.clone()).or_default();
            share.rent += property.rent * fraction;
            share.interest += interest * fraction;
            share.other_expenses += property.other_expenses * fraction;
        }
    }

    pub fn share(&self, investor: &str) -> InvestorShares {
        self.shares.get(investor).copied().unwrap_or_default()
    }

    pub fn shares(&self) -> &BTreeMap<String, InvestorShares> {
        &self.shares
    }

    /// Property-wide rent less interest and other expenses
    pub fn property_cashflow(&self) -> f64 {
        self.total_rent - self.total_interest - self.total_other_expenses
    }
}

/// Distributes property economics across investor splits
#[derive(Debug, Clone)]
pub struct AllocationEngine<'a> {
    investors: &'a [Investor],
    debts: DebtBook,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(investors: &'a [Investor]) -> Self {
        Self {
            investors,
            debts: DebtBook::new(investors),
        }
    }

    pub fn record_debt(&mut self, property: &Property, change: f64) {
        self.debts.record(property, change);
    }

    /// Fresh shares for a year from `(property, balance)` pairs
    pub fn allocate_year<'p>(&self, held: impl IntoIterator<Item = (&'p Property, f64)>) -> YearShares {
        let mut shares = YearShares::new(self.investors);
        for (property, balance) in held {
            shares.allocate(property, balance);
        }
        shares
    }

    pub fn debts(&self) -> &DebtBook {
        &self.debts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn investors() -> Vec<Investor> {
        vec![Investor::new("A", 0.0, 0.0), Investor::new("B", 0.0, 0.0)]
    }

    fn shared_property() -> Property {
        let mut property = Property::new("P", 1, 600_000.0, 0.05)
            .with_split("A", 70.0)
            .with_split("B", 30.0);
        property.rent = 30_000.0;
        property.other_expenses = 5_000.0;
        property
    }

    #[test]
    fn test_shares_follow_percentages() {
        let investors = investors();
        let property = shared_property();
        let engine = AllocationEngine::new(&investors);

        let shares = engine.allocate_year([(&property, 600_000.0)]);

        assert_relative_eq!(shares.share("A").interest, 21_000.0, max_relative = 1e-9);
        assert_relative_eq!(shares.share("B").interest, 9_000.0, max_relative = 1e-9);
        assert_relative_eq!(shares.share("A").rent, 21_000.0, max_relative = 1e-9);
        assert_relative_eq!(shares.share("B").other_expenses, 1_500.0, max_relative = 1e-9);
        assert_relative_eq!(shares.total_interest, 30_000.0, max_relative = 1e-9);
        assert_relative_eq!(shares.property_cashflow(), -5_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_shares_reset_each_year_but_debt_accumulates() {
        let investors = investors();
        let property = shared_property();
        let mut engine = AllocationEngine::new(&investors);

        engine.record_debt(&property, 600_000.0);
        let first = engine.allocate_year([(&property, 600_000.0)]);
        engine.record_debt(&property, -20_000.0);
        let second = engine.allocate_year([(&property, 580_000.0)]);

        assert_relative_eq!(first.share("A").interest, 21_000.0, max_relative = 1e-9);
        assert_relative_eq!(second.share("A").interest, 20_300.0, max_relative = 1e-9);
        assert_relative_eq!(engine.debts().debt("A"), 406_000.0, max_relative = 1e-9);
        assert_relative_eq!(engine.debts().debt("B"), 174_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_investor_without_property_has_zero_shares() {
        let investors = investors();
        let property = Property::new("Solo", 1, 100_000.0, 0.05).with_split("A", 100.0);
        let engine = AllocationEngine::new(&investors);

        let shares = engine.allocate_year([(&property, 100_000.0)]);

        assert_eq!(shares.share("B"), InvestorShares::default());
        assert_eq!(engine.debts().debt("B"), 0.0);
    }

    #[test]
    fn test_under_allocated_split_leaves_remainder_unassigned() {
        let investors = investors();
        let property = Property::new("Half", 1, 200_000.0, 0.05).with_split("A", 50.0);
        let mut engine = AllocationEngine::new(&investors);

        engine.record_debt(&property, 200_000.0);
        let shares = engine.allocate_year([(&property, 200_000.0)]);

        assert_relative_eq!(engine.debts().debt("A"), 100_000.0, max_relative = 1e-9);
        assert_relative_eq!(shares.share("A").interest, 5_000.0, max_relative = 1e-9);
        assert_relative_eq!(shares.total_interest, 10_000.0, max_relative = 1e-9);
    }
}
