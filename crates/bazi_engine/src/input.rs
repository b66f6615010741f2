//! Birth input and collect-all validation.

use std::fmt::{Display, Formatter};

use bazi_base::Gender;
use serde::{Deserialize, Serialize};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// A birth instant as supplied by the caller.
///
/// `year`, `month` and `day` are lunar when `is_lunar` is set. `timezone` is
/// advisory and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BirthInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    #[serde(default)]
    pub minute: Option<u32>,
    pub gender: Gender,
    #[serde(default)]
    pub is_lunar: bool,
    #[serde(default)]
    pub is_leap_month: bool,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl BirthInput {
    /// Gregorian input with no minute or timezone.
    pub fn solar(year: i32, month: u32, day: u32, hour: u32, gender: Gender) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute: None,
            gender,
            is_lunar: false,
            is_leap_month: false,
            timezone: None,
        }
    }

    pub fn with_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn with_lunar(mut self, is_leap_month: bool) -> Self {
        self.is_lunar = true;
        self.is_leap_month = is_leap_month;
        self
    }

    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    /// Check every field and report all violations at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub(crate) fn collect_errors(&self, errors: &mut Vec<FieldError>) {
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            errors.push(FieldError::new(
                "year",
                format!("must be between {MIN_YEAR} and {MAX_YEAR}, got {}", self.year),
            ));
        }
        if !(1..=12).contains(&self.month) {
            errors.push(FieldError::new(
                "month",
                format!("must be between 1 and 12, got {}", self.month),
            ));
        }
        if !(1..=31).contains(&self.day) {
            errors.push(FieldError::new(
                "day",
                format!("must be between 1 and 31, got {}", self.day),
            ));
        }
        if self.hour > 23 {
            errors.push(FieldError::new(
                "hour",
                format!("must be between 0 and 23, got {}", self.hour),
            ));
        }
        if let Some(m) = self.minute.filter(|&m| m > 59) {
            errors.push(FieldError::new(
                "minute",
                format!("must be between 0 and 59, got {m}"),
            ));
        }
        if self.is_leap_month && !self.is_lunar {
            errors.push(FieldError::new(
                "is_leap_month",
                "only applies to lunar input".to_string(),
            ));
        }
    }
}

/// Unchecked input with a free-form gender, as read from text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBirthInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    #[serde(default)]
    pub minute: Option<u32>,
    pub gender: String,
    #[serde(default)]
    pub is_lunar: bool,
    #[serde(default)]
    pub is_leap_month: bool,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl TryFrom<RawBirthInput> for BirthInput {
    type Error = Vec<FieldError>;

    /// Parse the gender and validate the rest, collecting every failure.
    fn try_from(raw: RawBirthInput) -> Result<Self, Self::Error> {
        let gender = Gender::parse(&raw.gender);
        let input = Self {
            year: raw.year,
            month: raw.month,
            day: raw.day,
            hour: raw.hour,
            minute: raw.minute,
            gender: gender.unwrap_or(Gender::Male),
            is_lunar: raw.is_lunar,
            is_leap_month: raw.is_leap_month,
            timezone: raw.timezone,
        };
        let mut errors = Vec::new();
        input.collect_errors(&mut errors);
        if gender.is_none() {
            errors.push(FieldError::new(
                "gender",
                format!("must be male or female, got {:?}", raw.gender),
            ));
        }
        if errors.is_empty() { Ok(input) } else { Err(errors) }
    }
}

/// One violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: String) -> Self {
        Self { field, message }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
