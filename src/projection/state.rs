//! Year-over-year state for investors and properties

use crate::assumptions::round_cents;
use crate::portfolio::{Investor, Property};

/// Gross income and spending of one investor for one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeYear {
    pub gross_income: f64,
    pub essential_expenditure: f64,
    pub nonessential_expenditure: f64,
}

impl IncomeYear {
    pub fn total_expenditure(&self) -> f64 {
        self.essential_expenditure + self.nonessential_expenditure
    }
}

/// Income trajectory of one investor
#[derive(Debug, Clone)]
pub struct IncomeLedger<'a> {
    investor: &'a Investor,

    /// Gross income carried between years
    current_income: f64,

    /// Expenditure figures, `None` when the investor does not track them
    essential: Option<f64>,
    nonessential: Option<f64>,
}

impl<'a> IncomeLedger<'a> {
    pub fn new(investor: &'a Investor) -> Self {
        Self {
            investor,
            current_income: investor.base_income,
            essential: investor.essential_expenditure,
            nonessential: investor.nonessential_expenditure,
        }
    }

    pub fn investor(&self) -> &'a Investor {
        self.investor
    }

    pub fn current_income(&self) -> f64 {
        self.current_income
    }

    /// Step to `year` (1-indexed) and snapshot it
    ///
    /// Events for the year apply first, in input order. From year 2 the
    /// result then grows by the investor's rate and expenditure by
    /// `cpi_rate`.
    pub fn advance(&mut self, year: u32, cpi_rate: f64) -> IncomeYear {
        for event in self.investor.income_events.iter().filter(|e| e.year == year) {
            self.current_income = event.apply(self.current_income);
        }

        if year > 1 {
            self.current_income *= 1.0 + self.investor.annual_growth_rate;
            for figure in [&mut self.essential, &mut self.nonessential].into_iter().flatten() {
                *figure *= 1.0 + cpi_rate;
            }
        }

        IncomeYear {
            gross_income: self.current_income,
            essential_expenditure: self.essential.unwrap_or(0.0),
            nonessential_expenditure: self.nonessential.unwrap_or(0.0),
        }
    }
}

/// Loan-to-value ratio as a percentage, 0 when the value is not positive
pub fn loan_to_value(balance: f64, value: f64) -> f64 {
    if value > 0.0 {
        round_cents(balance / value * 100.0)
    } else {
        0.0
    }
}

/// Figures for a held property in one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyYear {
    pub balance: f64,

    /// Market value recorded for the year, before that year's appreciation
    pub value: f64,

    pub lvr: f64,

    /// Debt drawn (purchase year) or principal change (later years)
    pub debt_change: f64,
}

#[derive(Debug, Clone, Copy)]
struct Position {
    balance: f64,
    value: f64,
}

/// Balance and value trajectory of one property
#[derive(Debug, Clone)]
pub struct PropertyLedger<'a> {
    property: &'a Property,
    position: Option<Position>,
}

impl<'a> PropertyLedger<'a> {
    pub fn new(property: &'a Property) -> Self {
        Self { property, position: None }
    }

    pub fn property(&self) -> &'a Property {
        self.property
    }

    pub fn is_purchased(&self) -> bool {
        self.position.is_some()
    }

    /// Step to `year`; `None` while the property is not yet held
    ///
    /// The recorded value is the one in force during the year; appreciation
    /// is applied once per held year, after recording.
    pub fn advance(&mut self, year: u32) -> Option<PropertyYear> {
        if !self.property.is_held_in(year) {
            return None;
        }

        let purchased_now = self.position.is_none();
        let position = self.position.get_or_insert(Position {
            balance: self.property.loan_amount,
            value: self.property.initial_value,
        });
        let debt_change = if purchased_now {
            self.property.loan_amount
        } else {
            position.balance += self.property.annual_principal_change;
            self.property.annual_principal_change
        };

        let snapshot = PropertyYear {
            balance: position.balance,
            value: position.value,
            lvr: loan_to_value(position.balance, position.value),
            debt_change,
        };

        position.value *= 1.0 + self.property.growth_rate;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::IncomeEvent;
    use approx::assert_relative_eq;

    #[test]
    fn test_income_grows_from_year_two() {
        let investor = Investor::new("A", 100_000.0, 0.02);
        let mut ledger = IncomeLedger::new(&investor);

        assert_eq!(ledger.advance(1, 0.03).gross_income, 100_000.0);
        assert_relative_eq!(ledger.advance(2, 0.03).gross_income, 102_000.0, max_relative = 1e-9);
        assert_relative_eq!(ledger.advance(3, 0.03).gross_income, 104_040.0, max_relative = 1e-9);
    }

    #[test]
    fn test_increase_event_applies_before_growth() {
        let investor = Investor::new("A", 100_000.0, 0.10).with_event(IncomeEvent::increase(3, 10_000.0));
        let mut ledger = IncomeLedger::new(&investor);

        let years: Vec<f64> = (1..=4).map(|y| ledger.advance(y, 0.0).gross_income).collect();

        assert_relative_eq!(years[1], 110_000.0, max_relative = 1e-9);
        // year 3: 110000 + 10000, then grown
        assert_relative_eq!(years[2], 132_000.0, max_relative = 1e-9);
        // year 4 grows the post-event value
        assert_relative_eq!(years[3], 145_200.0, max_relative = 1e-9);
    }

    #[test]
    fn test_year_one_event_is_not_grown() {
        let investor = Investor::new("A", 100_000.0, 0.10).with_event(IncomeEvent::increase(1, 5_000.0));
        let mut ledger = IncomeLedger::new(&investor);

        assert_eq!(ledger.advance(1, 0.0).gross_income, 105_000.0);
        assert_relative_eq!(ledger.advance(2, 0.0).gross_income, 115_500.0, max_relative = 1e-9);
    }

    #[test]
    fn test_set_event_replaces_income() {
        let investor = Investor::new("A", 80_000.0, 0.05)
            .with_event(IncomeEvent::set(2, 50_000.0))
            .with_event(IncomeEvent::increase(2, 1_000.0));
        let mut ledger = IncomeLedger::new(&investor);

        ledger.advance(1, 0.0);
        // set to 50000, +1000, then grown by 5%
        assert_relative_eq!(ledger.advance(2, 0.0).gross_income, 53_550.0, max_relative = 1e-9);
        assert_relative_eq!(ledger.advance(3, 0.0).gross_income, 56_227.5, max_relative = 1e-9);
    }

    #[test]
    fn test_expenditure_tracks_cpi_only_when_present() {
        let with_spend = Investor::new("A", 1.0, 0.0).with_expenditure(20_000.0, 5_000.0);
        let mut ledger = IncomeLedger::new(&with_spend);
        assert_eq!(ledger.advance(1, 0.03).total_expenditure(), 25_000.0);
        let year_two = ledger.advance(2, 0.03);
        assert_relative_eq!(year_two.essential_expenditure, 20_600.0, max_relative = 1e-9);
        assert_relative_eq!(year_two.nonessential_expenditure, 5_150.0, max_relative = 1e-9);

        let without = Investor::new("B", 1.0, 0.0);
        let mut ledger = IncomeLedger::new(&without);
        ledger.advance(1, 0.03);
        assert_eq!(ledger.advance(2, 0.03).total_expenditure(), 0.0);
    }

    fn rental() -> Property {
        let mut property = Property::new("P", 2, 400_000.0, 0.05);
        property.annual_principal_change = -10_000.0;
        property.initial_value = 500_000.0;
        property.growth_rate = 0.05;
        property
    }

    #[test]
    fn test_property_absent_before_purchase() {
        let property = rental();
        let mut ledger = PropertyLedger::new(&property);

        assert!(ledger.advance(1).is_none());
        assert!(!ledger.is_purchased());
    }

    #[test]
    fn test_property_purchase_then_paydown() {
        let property = rental();
        let mut ledger = PropertyLedger::new(&property);
        ledger.advance(1);

        let purchase = ledger.advance(2).unwrap();
        assert_eq!(purchase.balance, 400_000.0);
        assert_eq!(purchase.value, 500_000.0);
        assert_eq!(purchase.lvr, 80.0);
        assert_eq!(purchase.debt_change, 400_000.0);

        let next = ledger.advance(3).unwrap();
        assert_eq!(next.balance, 390_000.0);
        assert_relative_eq!(next.value, 525_000.0, max_relative = 1e-9);
        assert_eq!(next.debt_change, -10_000.0);
        assert_eq!(next.lvr, 74.29);
    }

    #[test]
    fn test_zero_value_lvr_is_zero() {
        assert_eq!(loan_to_value(100_000.0, 0.0), 0.0);
        assert_eq!(loan_to_value(100_000.0, -1.0), 0.0);
        assert_eq!(loan_to_value(0.0, 250_000.0), 0.0);
    }
}
