//! Progressive income tax with a flat levy on gross income

use crate::error::{ForecastError, Result};

/// Flat levy applied to the whole gross income
pub const DEFAULT_LEVY_RATE: f64 = 0.02;

/// One marginal band: income above `threshold` (up to the next band's
/// threshold) is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

impl TaxBracket {
    pub const fn new(threshold: f64, rate: f64) -> Self {
        Self { threshold, rate }
    }
}

/// Resident bracket table used when no table is loaded
pub const DEFAULT_BRACKETS: [TaxBracket; 5] = [
    TaxBracket::new(0.0, 0.0),
    TaxBracket::new(18_200.0, 0.16),
    TaxBracket::new(45_000.0, 0.30),
    TaxBracket::new(135_000.0, 0.37),
    TaxBracket::new(190_000.0, 0.45),
];

/// Round a currency amount to cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Gross-to-net income model
///
/// Brackets ascend from a zero threshold; the last band is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxModel {
    brackets: Vec<TaxBracket>,
    levy_rate: f64,
}

impl TaxModel {
    /// Build a model, checking the bracket table is usable
    pub fn new(brackets: Vec<TaxBracket>, levy_rate: f64) -> Result<Self> {
        let first = brackets
            .first()
            .ok_or_else(|| ForecastError::InvalidTaxTable("no brackets".into()))?;
        if first.threshold != 0.0 {
            return Err(ForecastError::InvalidTaxTable(format!(
                "first bracket must start at 0, starts at {}",
                first.threshold
            )));
        }
        for pair in brackets.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ForecastError::InvalidTaxTable(format!(
                    "thresholds must ascend: {} follows {}",
                    pair[1].threshold, pair[0].threshold
                )));
            }
        }
        if let Some(bad) = brackets.iter().find(|b| !b.threshold.is_finite()) {
            return Err(ForecastError::InvalidTaxTable(format!(
                "threshold {} is not a finite number",
                bad.threshold
            )));
        }
        if let Some(bad) = brackets.iter().find(|b| !(0.0..=1.0).contains(&b.rate)) {
            return Err(ForecastError::InvalidTaxTable(format!(
                "rate {} at threshold {} is outside 0..=1",
                bad.rate, bad.threshold
            )));
        }
        if !(0.0..=1.0).contains(&levy_rate) {
            return Err(ForecastError::InvalidTaxTable(format!(
                "levy rate {} is outside 0..=1",
                levy_rate
            )));
        }

        Ok(Self { brackets, levy_rate })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn levy_rate(&self) -> f64 {
        self.levy_rate
    }

    /// Bracket tax owed on `gross`, excluding the levy
    pub fn income_tax(&self, gross: f64) -> f64 {
        if gross <= 0.0 {
            return 0.0;
        }

        let mut tax = 0.0;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if gross <= bracket.threshold {
                break;
            }
            let upper = self
                .brackets
                .get(i + 1)
                .map(|b| b.threshold)
                .unwrap_or(f64::INFINITY);
            tax += (gross.min(upper) - bracket.threshold) * bracket.rate;
        }
        tax
    }

    /// Levy on the full gross income
    pub fn levy(&self, gross: f64) -> f64 {
        gross * self.levy_rate
    }

    /// Net income after bracket tax and levy, rounded to cents
    pub fn net_income(&self, gross: f64) -> f64 {
        round_cents(gross - self.income_tax(gross) - self.levy(gross))
    }
}

impl Default for TaxModel {
    fn default() -> Self {
        Self {
            brackets: DEFAULT_BRACKETS.to_vec(),
            levy_rate: DEFAULT_LEVY_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tax_free_threshold_pays_levy_only() {
        let tax = TaxModel::default();
        assert_eq!(tax.net_income(18_200.0), 17_836.0);
        assert_eq!(tax.income_tax(18_200.0), 0.0);
    }

    #[test]
    fn test_second_bracket() {
        let tax = TaxModel::default();
        // (45000 - 18200) * 16% = 4288, levy 900
        assert_abs_diff_eq!(tax.income_tax(45_000.0), 4_288.0, epsilon = 1e-9);
        assert_eq!(tax.net_income(45_000.0), 39_812.0);
    }

    #[test]
    fn test_spans_multiple_brackets() {
        let tax = TaxModel::default();
        // 4288 + 55000 * 30% = 20788, levy 2000
        assert_eq!(tax.net_income(100_000.0), 77_212.0);

        // 4288 + 27000 + 20350 + 10000 * 45% = 56138, levy 4000
        assert_eq!(tax.net_income(200_000.0), 139_862.0);
    }

    #[test]
    fn test_non_positive_income_does_not_fail() {
        let tax = TaxModel::default();
        assert_eq!(tax.net_income(0.0), 0.0);
        assert_eq!(tax.income_tax(-5_000.0), 0.0);
        assert_eq!(tax.net_income(-5_000.0), -4_900.0);
    }

    #[test]
    fn test_substitute_table() {
        let flat = TaxModel::new(vec![TaxBracket::new(0.0, 0.10)], 0.0).unwrap();
        assert_eq!(flat.net_income(50_000.0), 45_000.0);
    }

    #[test]
    fn test_rejects_malformed_tables() {
        assert!(TaxModel::new(vec![], 0.02).is_err());
        assert!(TaxModel::new(vec![TaxBracket::new(1.0, 0.1)], 0.02).is_err());
        assert!(TaxModel::new(
            vec![TaxBracket::new(0.0, 0.0), TaxBracket::new(0.0, 0.2)],
            0.02
        )
        .is_err());
        assert!(TaxModel::new(vec![TaxBracket::new(0.0, 1.5)], 0.02).is_err());
        assert!(TaxModel::new(vec![TaxBracket::new(0.0, f64::NAN)], 0.02).is_err());
        assert!(TaxModel::new(
            vec![TaxBracket::new(0.0, 0.1), TaxBracket::new(f64::INFINITY, 0.2)],
            0.02
        )
        .is_err());
    }

    #[test]
    fn test_rejects_levy_outside_unit_range() {
        let brackets = || DEFAULT_BRACKETS.to_vec();

        for levy in [f64::NAN, -0.01, 1.5, f64::INFINITY] {
            let err = TaxModel::new(brackets(), levy).unwrap_err();
            assert!(err.to_string().contains("levy rate"), "{}", err);
        }
        assert!(TaxModel::new(brackets(), 0.0).is_ok());
        assert!(TaxModel::new(brackets(), 1.0).is_ok());
    }
}
