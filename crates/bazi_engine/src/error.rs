//! Engine errors.

use thiserror::Error;

use crate::input::{BirthInput, FieldError};
use crate::result::Stage;

/// Stable code for validation failures.
pub const INVALID_INPUT: &str = "INVALID_INPUT";
/// Stable code for failures inside the mandatory pipeline.
pub const CALCULATION_ERROR: &str = "CALCULATION_ERROR";
/// Stable code for a rejected engine configuration.
pub const INVALID_CONFIG: &str = "INVALID_CONFIG";

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BaziError {
    /// Every violated field, in check order.
    #[error("invalid input: {}", join(.errors))]
    InvalidInput { errors: Vec<FieldError> },

    /// A mandatory stage failed. The input is echoed for diagnostics.
    #[error("calculation failed at {}: {message}", .stage.name())]
    Calculation {
        stage: Stage,
        message: String,
        input: Box<BirthInput>,
    },

    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),
}

impl BaziError {
    pub(crate) fn calculation(
        stage: Stage,
        message: impl Into<String>,
        input: &BirthInput,
    ) -> Self {
        Self::Calculation {
            stage,
            message: message.into(),
            input: Box::new(input.clone()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => INVALID_INPUT,
            Self::Calculation { .. } => CALCULATION_ERROR,
            Self::InvalidConfig(_) => INVALID_CONFIG,
        }
    }

    /// The input a calculation failed on.
    pub fn input(&self) -> Option<&BirthInput> {
        match self {
            Self::Calculation { input, .. } => Some(input.as_ref()),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::InvalidInput { errors } => errors,
            _ => &[],
        }
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_base::Gender;

    #[test]
    fn invalid_input_lists_every_field() {
        let err = BaziError::InvalidInput {
            errors: vec![
                FieldError::new("year", "must be between 1900 and 2100, got 1800".into()),
                FieldError::new("hour", "must be between 0 and 23, got 25".into()),
            ],
        };
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(
            err.to_string(),
            "invalid input: year: must be between 1900 and 2100, got 1800; hour: must be between 0 and 23, got 25"
        );
        assert_eq!(err.field_errors().len(), 2);
        assert!(err.input().is_none());
    }

    #[test]
    fn calculation_echoes_input() {
        let input = BirthInput::solar(1990, 6, 15, 14, Gender::Male);
        let err = BaziError::calculation(Stage::Calendar, "boom", &input);
        assert_eq!(err.code(), "CALCULATION_ERROR");
        assert_eq!(err.input(), Some(&input));
        assert_eq!(err.to_string(), "calculation failed at calendar: boom");
    }

    #[test]
    fn config_code() {
        assert_eq!(BaziError::InvalidConfig("x").code(), "INVALID_CONFIG");
    }
}
