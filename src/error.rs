//! Error type shared by validation, loading and projection

use thiserror::Error;

/// Errors raised before or instead of a forecast run
///
/// Every configuration variant names the entity it refers to so a caller
/// can point the user at the offending record.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("{entity} '{name}' is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        name: String,
        field: &'static str,
    },

    #[error("{entity} '{name}' has invalid field '{field}': {reason}")]
    InvalidField {
        entity: &'static str,
        name: String,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate {entity} name '{name}'")]
    DuplicateName { entity: &'static str, name: String },

    #[error("property '{property}' references unknown investor '{investor}'")]
    UnknownInvestor { property: String, investor: String },

    #[error("property '{property}' investor splits sum to {total}%, expected 100%")]
    SplitTotal { property: String, total: f64 },

    #[error("forecast year count must be at least 1, got {0}")]
    InvalidYears(u32),

    #[error("invalid tax table: {0}")]
    InvalidTaxTable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    pub(crate) fn missing(entity: &'static str, name: &str, field: &'static str) -> Self {
        ForecastError::MissingField {
            entity,
            name: name.to_string(),
            field,
        }
    }

    pub(crate) fn invalid(
        entity: &'static str,
        name: &str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        ForecastError::InvalidField {
            entity,
            name: name.to_string(),
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_entity() {
        let err = ForecastError::missing("property", "Unit 4", "purchase_year");
        assert_eq!(
            err.to_string(),
            "property 'Unit 4' is missing required field 'purchase_year'"
        );

        let err = ForecastError::UnknownInvestor {
            property: "P".into(),
            investor: "Nobody".into(),
        };
        assert!(err.to_string().contains("Nobody"));
    }
}
