//! Investor and property definitions
//!
//! `*Record` types mirror the loosely-shaped documents callers send: every
//! field is optional so a missing value can be reported against the entity
//! that lacks it. Validation turns them into the typed `Investor` / `Property`
//! the engine consumes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

const INVESTOR: &str = "investor";
const PROPERTY: &str = "property";

/// How an income event changes current income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeEventKind {
    /// Add the amount to current income
    Increase,
    /// Replace current income with the amount
    Set,
}

impl IncomeEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeEventKind::Increase => "increase",
            IncomeEventKind::Set => "set",
        }
    }
}

/// A one-off income change firing in a given forecast year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeEvent {
    /// Forecast year (1-indexed)
    pub year: u32,
    #[serde(rename = "type")]
    pub kind: IncomeEventKind,
    pub amount: f64,
}

impl IncomeEvent {
    pub fn increase(year: u32, amount: f64) -> Self {
        Self { year, kind: IncomeEventKind::Increase, amount }
    }

    pub fn set(year: u32, amount: f64) -> Self {
        Self { year, kind: IncomeEventKind::Set, amount }
    }

    /// Income after this event fires
    pub fn apply(&self, income: f64) -> f64 {
        match self.kind {
            IncomeEventKind::Increase => income + self.amount,
            IncomeEventKind::Set => self.amount,
        }
    }
}

/// A validated investor
///
/// Built through [`InvestorRecord::validate`] or [`Investor::new`]; not
/// deserialized directly, so every ingestion error names the investor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Investor {
    /// Unique investor name
    pub name: String,

    /// Gross annual income at the start of the forecast
    pub base_income: f64,

    /// Fractional annual income growth (0.03 = 3%)
    pub annual_growth_rate: f64,

    /// Annual essential spending, grown at CPI when present
    #[serde(default)]
    pub essential_expenditure: Option<f64>,

    /// Annual discretionary spending, grown at CPI when present
    #[serde(default)]
    pub nonessential_expenditure: Option<f64>,

    /// Scheduled income events, applied in order within a year
    #[serde(default)]
    pub income_events: Vec<IncomeEvent>,
}

impl Investor {
    pub fn new(name: impl Into<String>, base_income: f64, annual_growth_rate: f64) -> Self {
        Self {
            name: name.into(),
            base_income,
            annual_growth_rate,
            essential_expenditure: None,
            nonessential_expenditure: None,
            income_events: Vec::new(),
        }
    }

    pub fn with_expenditure(mut self, essential: f64, nonessential: f64) -> Self {
        self.essential_expenditure = Some(essential);
        self.nonessential_expenditure = Some(nonessential);
        self
    }

    pub fn with_event(mut self, event: IncomeEvent) -> Self {
        self.income_events.push(event);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForecastError::missing(INVESTOR, &self.name, "name"));
        }
        check_finite(INVESTOR, &self.name, "base_income", self.base_income)?;
        check_finite(INVESTOR, &self.name, "annual_growth_rate", self.annual_growth_rate)?;
        if let Some(amount) = self.essential_expenditure {
            check_finite(INVESTOR, &self.name, "essential_expenditure", amount)?;
        }
        if let Some(amount) = self.nonessential_expenditure {
            check_finite(INVESTOR, &self.name, "nonessential_expenditure", amount)?;
        }
        for event in &self.income_events {
            if event.year == 0 {
                return Err(ForecastError::invalid(
                    INVESTOR,
                    &self.name,
                    "income_events.year",
                    "forecast years start at 1",
                ));
            }
            check_finite(INVESTOR, &self.name, "income_events.amount", event.amount)?;
        }
        Ok(())
    }
}

/// Share of a property held by one investor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorSplit {
    pub investor_name: String,
    /// Percentage stake, 0-100
    pub percentage: f64,
}

impl InvestorSplit {
    pub fn new(investor_name: impl Into<String>, percentage: f64) -> Self {
        Self { investor_name: investor_name.into(), percentage }
    }

    /// Stake as a fraction of the whole
    pub fn fraction(&self) -> f64 {
        self.percentage / 100.0
    }
}

/// A validated property
///
/// Built through [`PropertyRecord::validate`] or [`Property::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    /// Unique property name
    pub name: String,

    /// First forecast year the property is held (1-indexed)
    pub purchase_year: u32,

    /// Loan balance drawn at purchase
    pub loan_amount: f64,

    /// Signed amount added to the balance each year after purchase
    pub annual_principal_change: f64,

    /// Annual rent received
    pub rent: f64,

    /// Fractional annual interest rate on the balance
    pub interest_rate: f64,

    /// Annual holding costs other than interest
    pub other_expenses: f64,

    /// Market value at purchase
    pub initial_value: f64,

    /// Fractional annual value appreciation
    pub growth_rate: f64,

    pub investor_splits: Vec<InvestorSplit>,
}

impl Property {
    /// Property with no rent, costs or growth; `initial_value` equals the loan
    pub fn new(name: impl Into<String>, purchase_year: u32, loan_amount: f64, interest_rate: f64) -> Self {
        Self {
            name: name.into(),
            purchase_year,
            loan_amount,
            annual_principal_change: 0.0,
            rent: 0.0,
            interest_rate,
            other_expenses: 0.0,
            initial_value: loan_amount,
            growth_rate: 0.0,
            investor_splits: Vec::new(),
        }
    }

    pub fn with_split(mut self, investor_name: impl Into<String>, percentage: f64) -> Self {
        self.investor_splits.push(InvestorSplit::new(investor_name, percentage));
        self
    }

    /// Sum of split percentages
    pub fn split_total(&self) -> f64 {
        self.investor_splits.iter().map(|s| s.percentage).sum()
    }

    pub fn is_held_in(&self, year: u32) -> bool {
        year >= self.purchase_year
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForecastError::missing(PROPERTY, &self.name, "name"));
        }
        if self.purchase_year == 0 {
            return Err(ForecastError::invalid(
                PROPERTY,
                &self.name,
                "purchase_year",
                "forecast years start at 1",
            ));
        }
        for (field, value) in [
            ("loan_amount", self.loan_amount),
            ("annual_principal_change", self.annual_principal_change),
            ("rent", self.rent),
            ("interest_rate", self.interest_rate),
            ("other_expenses", self.other_expenses),
            ("initial_value", self.initial_value),
            ("growth_rate", self.growth_rate),
        ] {
            check_finite(PROPERTY, &self.name, field, value)?;
        }
        for split in &self.investor_splits {
            if !(0.0..=100.0).contains(&split.percentage) {
                return Err(ForecastError::invalid(
                    PROPERTY,
                    &self.name,
                    "investor_splits.percentage",
                    format!("{} for '{}' is outside 0-100", split.percentage, split.investor_name),
                ));
            }
        }
        Ok(())
    }
}

/// Investor as submitted, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_income: Option<f64>,
    #[serde(default)]
    pub annual_growth_rate: Option<f64>,
    #[serde(default)]
    pub essential_expenditure: Option<f64>,
    #[serde(default)]
    pub nonessential_expenditure: Option<f64>,
    #[serde(default)]
    pub income_events: Vec<IncomeEventRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeEventRecord {
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Property as submitted, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
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
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub other_expenses: Option<f64>,
    #[serde(default)]
    pub initial_value: Option<f64>,
    #[serde(default)]
    pub growth_rate: Option<f64>,
    #[serde(default)]
    pub investor_splits: Vec<InvestorSplitRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorSplitRecord {
    #[serde(default)]
    pub investor_name: Option<String>,
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl InvestorRecord {
    /// Validate into an `Investor`
    ///
    /// `index` labels unnamed records in error messages.
    pub fn validate(self, index: usize) -> Result<Investor> {
        let name = required_name(self.name, INVESTOR, index)?;
        let base_income = self
            .base_income
            .ok_or_else(|| ForecastError::missing(INVESTOR, &name, "base_income"))?;
        let annual_growth_rate = self
            .annual_growth_rate
            .ok_or_else(|| ForecastError::missing(INVESTOR, &name, "annual_growth_rate"))?;

        let income_events = self
            .income_events
            .into_iter()
            .map(|event| event.validate(&name))
            .collect::<Result<Vec<_>>>()?;

        let investor = Investor {
            name,
            base_income,
            annual_growth_rate,
            essential_expenditure: self.essential_expenditure,
            nonessential_expenditure: self.nonessential_expenditure,
            income_events,
        };
        investor.validate()?;
        Ok(investor)
    }
}

impl From<&Investor> for InvestorRecord {
    fn from(investor: &Investor) -> Self {
        Self {
            name: Some(investor.name.clone()),
            base_income: Some(investor.base_income),
            annual_growth_rate: Some(investor.annual_growth_rate),
            essential_expenditure: investor.essential_expenditure,
            nonessential_expenditure: investor.nonessential_expenditure,
            income_events: investor
                .income_events
                .iter()
                .map(|e| IncomeEventRecord {
                    year: Some(e.year),
                    kind: Some(e.kind.as_str().to_string()),
                    amount: Some(e.amount),
                })
                .collect(),
        }
    }
}

impl IncomeEventRecord {
    fn validate(self, investor: &str) -> Result<IncomeEvent> {
        let year = self
            .year
            .ok_or_else(|| ForecastError::missing(INVESTOR, investor, "income_events.year"))?;
        let kind = match self.kind.as_deref() {
            Some("increase") => IncomeEventKind::Increase,
            Some("set") => IncomeEventKind::Set,
            Some(other) => {
                return Err(ForecastError::invalid(
                    INVESTOR,
                    investor,
                    "income_events.type",
                    format!("unknown event type '{}'", other),
                ))
            }
            None => return Err(ForecastError::missing(INVESTOR, investor, "income_events.type")),
        };
        let amount = self
            .amount
            .ok_or_else(|| ForecastError::missing(INVESTOR, investor, "income_events.amount"))?;

        Ok(IncomeEvent { year, kind, amount })
    }
}

impl PropertyRecord {
    /// Validate into a `Property`
    ///
    /// Rent, other expenses, principal change and growth default to zero;
    /// initial value defaults to the loan amount.
    pub fn validate(self, index: usize) -> Result<Property> {
        let name = required_name(self.name, PROPERTY, index)?;
        let purchase_year = self
            .purchase_year
            .ok_or_else(|| ForecastError::missing(PROPERTY, &name, "purchase_year"))?;
        let loan_amount = self
            .loan_amount
            .ok_or_else(|| ForecastError::missing(PROPERTY, &name, "loan_amount"))?;
        let interest_rate = self
            .interest_rate
            .ok_or_else(|| ForecastError::missing(PROPERTY, &name, "interest_rate"))?;

        let investor_splits = self
            .investor_splits
            .into_iter()
            .map(|split| {
                let investor_name = split.investor_name.ok_or_else(|| {
                    ForecastError::missing(PROPERTY, &name, "investor_splits.investor_name")
                })?;
                let percentage = split.percentage.ok_or_else(|| {
                    ForecastError::missing(PROPERTY, &name, "investor_splits.percentage")
                })?;
                Ok(InvestorSplit { investor_name, percentage })
            })
            .collect::<Result<Vec<_>>>()?;

        let property = Property {
            purchase_year,
            loan_amount,
            annual_principal_change: self.annual_principal_change.unwrap_or(0.0),
            rent: self.rent.unwrap_or(0.0),
            interest_rate,
            other_expenses: self.other_expenses.unwrap_or(0.0),
            initial_value: self.initial_value.unwrap_or(loan_amount),
            growth_rate: self.growth_rate.unwrap_or(0.0),
            investor_splits,
            name,
        };
        property.validate()?;
        Ok(property)
    }
}

impl From<&Property> for PropertyRecord {
    fn from(property: &Property) -> Self {
        Self {
            name: Some(property.name.clone()),
            purchase_year: Some(property.purchase_year),
            loan_amount: Some(property.loan_amount),
            annual_principal_change: Some(property.annual_principal_change),
            rent: Some(property.rent),
            interest_rate: Some(property.interest_rate),
            other_expenses: Some(property.other_expenses),
            initial_value: Some(property.initial_value),
            growth_rate: Some(property.growth_rate),
            investor_splits: property
                .investor_splits
                .iter()
                .map(|s| InvestorSplitRecord {
                    investor_name: Some(s.investor_name.clone()),
                    percentage: Some(s.percentage),
                })
                .collect(),
        }
    }
}

fn required_name(name: Option<String>, entity: &'static str, index: usize) -> Result<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ForecastError::missing(entity, &format!("#{}", index + 1), "name")),
    }
}

fn check_finite(entity: &'static str, name: &str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::invalid(entity, name, field, format!("{} is not a finite number", value)))
    }
}

/// Validated set of investors and the properties they hold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    investors: Vec<Investor>,
    properties: Vec<Property>,
}

impl Portfolio {
    /// Check typed investors and properties, including cross references
    pub fn new(investors: Vec<Investor>, properties: Vec<Property>) -> Result<Self> {
        for investor in &investors {
            investor.validate()?;
        }
        for property in &properties {
            property.validate()?;
        }

        check_unique(INVESTOR, investors.iter().map(|i| i.name.as_str()))?;
        check_unique(PROPERTY, properties.iter().map(|p| p.name.as_str()))?;

        for property in &properties {
            for split in &property.investor_splits {
                if !investors.iter().any(|i| i.name == split.investor_name) {
                    return Err(ForecastError::UnknownInvestor {
                        property: property.name.clone(),
                        investor: split.investor_name.clone(),
                    });
                }
            }
        }

        Ok(Self { investors, properties })
    }

    /// Validate loosely-shaped records; the first problem found is returned
    pub fn from_records(investors: Vec<InvestorRecord>, properties: Vec<PropertyRecord>) -> Result<Self> {
        let investors = investors
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.validate(i))
            .collect::<Result<Vec<_>>>()?;
        let properties = properties
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.validate(i))
            .collect::<Result<Vec<_>>>()?;

        Self::new(investors, properties)
    }

    pub fn investors(&self) -> &[Investor] {
        &self.investors
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn investor(&self, name: &str) -> Option<&Investor> {
        self.investors.iter().find(|i| i.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Copy with every property's growth rate shifted by `delta`
    pub fn with_growth_shift(&self, delta: f64) -> Self {
        let mut shifted = self.clone();
        for property in &mut shifted.properties {
            property.growth_rate += delta;
        }
        shifted
    }
}

fn check_unique<'a>(entity: &'static str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ForecastError::DuplicateName { entity, name: name.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_record() -> PropertyRecord {
        PropertyRecord {
            name: Some("P".into()),
            purchase_year: Some(1),
            loan_amount: Some(500_000.0),
            interest_rate: Some(0.04),
            investor_splits: vec![InvestorSplitRecord {
                investor_name: Some("Test".into()),
                percentage: Some(100.0),
            }],
            ..Default::default()
        }
    }

    fn investor_record() -> InvestorRecord {
        InvestorRecord {
            name: Some("Test".into()),
            base_income: Some(100_000.0),
            annual_growth_rate: Some(0.02),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_purchase_year_names_property() {
        let mut record = property_record();
        record.purchase_year = None;

        let err = Portfolio::from_records(vec![investor_record()], vec![record]).unwrap_err();
        match err {
            ForecastError::MissingField { entity, name, field } => {
                assert_eq!(entity, "property");
                assert_eq!(name, "P");
                assert_eq!(field, "purchase_year");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_base_income() {
        let mut record = investor_record();
        record.base_income = None;

        let err = Portfolio::from_records(vec![record], vec![]).unwrap_err();
        assert_eq!(err.to_string(), "investor 'Test' is missing required field 'base_income'");
    }

    #[test]
    fn test_unnamed_record_is_labelled_by_position() {
        let mut second = investor_record();
        second.name = None;

        let err = Portfolio::from_records(vec![investor_record(), second], vec![]).unwrap_err();
        assert!(err.to_string().contains("'#2'"));
    }

    #[test]
    fn test_optional_fields_default() {
        let property = property_record().validate(0).unwrap();

        assert_eq!(property.initial_value, 500_000.0);
        assert_eq!(property.rent, 0.0);
        assert_eq!(property.annual_principal_change, 0.0);
        assert_eq!(property.growth_rate, 0.0);
    }

    #[test]
    fn test_unknown_event_type() {
        let mut record = investor_record();
        record.income_events.push(IncomeEventRecord {
            year: Some(2),
            kind: Some("bonus".into()),
            amount: Some(1.0),
        });

        let err = record.validate(0).unwrap_err();
        assert!(err.to_string().contains("unknown event type 'bonus'"));
    }

    #[test]
    fn test_split_must_reference_known_investor() {
        let property = Property::new("P", 1, 100.0, 0.05).with_split("Ghost", 100.0);
        let err = Portfolio::new(vec![Investor::new("Test", 1.0, 0.0)], vec![property]).unwrap_err();

        assert!(matches!(err, ForecastError::UnknownInvestor { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Portfolio::new(
            vec![Investor::new("A", 1.0, 0.0), Investor::new("A", 2.0, 0.0)],
            vec![],
        )
        .unwrap_err();

        assert!(matches!(err, ForecastError::DuplicateName { entity: "investor", .. }));
    }

    #[test]
    fn test_partial_splits_are_accepted() {
        let property = Property::new("P", 1, 100.0, 0.05).with_split("A", 60.0);
        let portfolio = Portfolio::new(vec![Investor::new("A", 1.0, 0.0)], vec![property]).unwrap();

        assert_eq!(portfolio.properties()[0].split_total(), 60.0);
    }

    #[test]
    fn test_percentage_out_of_range() {
        let property = Property::new("P", 1, 100.0, 0.05).with_split("A", 120.0);
        let err = Portfolio::new(vec![Investor::new("A", 1.0, 0.0)], vec![property]).unwrap_err();

        assert!(matches!(
            err,
            ForecastError::InvalidField { field: "investor_splits.percentage", .. }
        ));
    }

    #[test]
    fn test_event_kind_wire_names() {
        let record: InvestorRecord = serde_json::from_str(
            r#"{"name":"A","base_income":1,"annual_growth_rate":0,
                "income_events":[{"year":5,"type":"increase","amount":10000}]}"#,
        )
        .unwrap();
        let investor = record.validate(0).unwrap();
        assert_eq!(investor.income_events, vec![IncomeEvent::increase(5, 10_000.0)]);

        let json = serde_json::to_string(&investor.income_events[0]).unwrap();
        assert!(json.contains(r#""type":"increase""#), "{}", json);
    }

    #[test]
    fn test_missing_event_field_names_the_investor() {
        let record: InvestorRecord = serde_json::from_str(
            r#"{"name":"Sam","base_income":1,"annual_growth_rate":0,
                "income_events":[{"year":2,"amount":10}]}"#,
        )
        .unwrap();
        let err = record.validate(0).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::MissingField { ref name, field: "income_events.type", .. } if name == "Sam"
        ));
    }
}
