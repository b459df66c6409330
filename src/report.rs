//! CSV report of a forecast, one row per year

use std::collections::BTreeSet;
use std::io::Write;

use crate::error::Result;
use crate::projection::ForecastResult;

/// Write one row per forecast year
///
/// Household aggregates come first, then per-investor and per-property
/// columns in name order. A property not yet purchased leaves its cells empty.
/// `start_year`, when given, labels each row with a calendar year.
pub fn write_forecast_csv<W: Write>(writer: W, result: &ForecastResult, start_year: Option<i32>) -> Result<()> {
    let investors: BTreeSet<&str> = result
        .forecasts
        .iter()
        .flat_map(|f| f.net_incomes.keys().map(String::as_str))
        .collect();
    let properties: BTreeSet<&str> = result
        .forecasts
        .iter()
        .flat_map(|f| f.property_loan_balances.keys().map(String::as_str))
        .collect();

    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = vec!["Year".into()];
    if start_year.is_some() {
        header.push("CalendarYear".into());
    }
    header.extend(
        [
            "CombinedIncome",
            "TotalExpenditure",
            "TotalRent",
            "TotalInterest",
            "TotalOtherExpenses",
            "HouseholdSurplus",
            "TotalDebt",
        ]
        .map(String::from),
    );
    for name in &investors {
        header.push(format!("{}_NetIncome", name));
        header.push(format!("{}_Debt", name));
        header.push(format!("{}_BorrowingCapacity", name));
    }
    for name in &properties {
        header.push(format!("{}_Balance", name));
        header.push(format!("{}_Value", name));
        header.push(format!("{}_LVR", name));
    }
    out.write_record(&header)?;

    let cell = |value: Option<&f64>| value.map(|v| format!("{:.2}", v)).unwrap_or_default();

    for forecast in &result.forecasts {
        let mut row = vec![forecast.year.to_string()];
        if let Some(start) = start_year {
            row.push((start + forecast.year as i32 - 1).to_string());
        }
        for value in [
            forecast.combined_income,
            forecast.total_expenditure,
            forecast.total_rent,
            forecast.total_interest,
            forecast.total_other_expenses,
            forecast.household_surplus,
            forecast.total_debt,
        ] {
            row.push(format!("{:.2}", value));
        }
        for name in &investors {
            row.push(cell(forecast.net_incomes.get(*name)));
            row.push(cell(forecast.investor_debts.get(*name)));
            row.push(cell(forecast.borrowing_capacities.get(*name)));
        }
        for name in &properties {
            row.push(cell(forecast.property_loan_balances.get(*name)));
            row.push(cell(forecast.property_values.get(*name)));
            row.push(cell(forecast.property_lvrs.get(*name)));
        }
        out.write_record(&row)?;
    }

    out.flush()?;
    Ok(())
}
