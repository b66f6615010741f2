//! Calculation options.
//!
//! Every switch has a default, so a JSON options file only needs the fields
//! it changes.

use bazi_base::pattern::PatternConfig;
use bazi_base::period::{DEFAULT_FLEETING_RANGE, DEFAULT_PERIOD_COUNT};
use serde::{Deserialize, Serialize};

use crate::input::FieldError;

pub const MAX_PERIOD_COUNT: usize = 12;
pub const MAX_FLEETING_RANGE: u32 = 100;

/// Decimal places for fractional outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Basic,
    #[default]
    Standard,
    Detailed,
}

impl Precision {
    pub const fn decimals(self) -> u32 {
        match self {
            Self::Basic => 0,
            Self::Standard => 1,
            Self::Detailed => 2,
        }
    }

    pub fn round(self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals() as i32);
        (value * factor).round() / factor
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "standard" => Some(Self::Standard),
            "detailed" => Some(Self::Detailed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaziOptions {
    pub include_ten_gods: bool,
    pub include_element_analysis: bool,
    pub include_strength_analysis: bool,
    /// Seasonal (月令) weighted element scores next to the count-based verdict.
    pub include_seasonal_strength: bool,
    pub include_major_periods: bool,
    pub include_fleeting_years: bool,
    pub include_shensha: bool,
    /// Add the current decade and annual pillars to the marker slots.
    pub shensha_include_periods: bool,
    pub include_hidden_stems: bool,
    pub include_relationship_analysis: bool,
    pub include_pattern_analysis: bool,
    pub include_yang_blade_emperor_prosperity: bool,
    /// When false the hour pillar is ignored by the marker rules.
    pub has_accurate_time: bool,
    pub major_period_count: usize,
    /// Years on each side of the current year.
    pub fleeting_year_range: u32,
    pub precision: Precision,
    pub pattern: PatternConfig,
    /// Attach stage timings and trace notes to the result.
    pub debug: bool,
}

impl Default for BaziOptions {
    fn default() -> Self {
        Self {
            include_ten_gods: true,
            include_element_analysis: true,
            include_strength_analysis: true,
            include_seasonal_strength: false,
            include_major_periods: true,
            include_fleeting_years: true,
            include_shensha: false,
            shensha_include_periods: false,
            include_hidden_stems: false,
            include_relationship_analysis: true,
            include_pattern_analysis: true,
            include_yang_blade_emperor_prosperity: true,
            has_accurate_time: true,
            major_period_count: DEFAULT_PERIOD_COUNT,
            fleeting_year_range: DEFAULT_FLEETING_RANGE,
            precision: Precision::Standard,
            pattern: PatternConfig::default(),
            debug: false,
        }
    }
}

impl BaziOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub(crate) fn collect_errors(&self, errors: &mut Vec<FieldError>) {
        if !(1..=MAX_PERIOD_COUNT).contains(&self.major_period_count) {
            errors.push(FieldError::new(
                "major_period_count",
                format!(
                    "must be between 1 and {MAX_PERIOD_COUNT}, got {}",
                    self.major_period_count
                ),
            ));
        }
        if self.fleeting_year_range > MAX_FLEETING_RANGE {
            errors.push(FieldError::new(
                "fleeting_year_range",
                format!(
                    "must be at most {MAX_FLEETING_RANGE}, got {}",
                    self.fleeting_year_range
                ),
            ));
        }
        let threshold = self.pattern.minimum_strength_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            errors.push(FieldError::new(
                "pattern.minimum_strength_threshold",
                format!("must be a finite non-negative number, got {threshold}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = BaziOptions::default();
        assert!(o.include_ten_gods);
        assert!(!o.include_shensha);
        assert!(!o.include_hidden_stems);
        assert!(o.include_relationship_analysis);
        assert_eq!(o.major_period_count, 10);
        assert_eq!(o.fleeting_year_range, 10);
        assert_eq!(o.precision, Precision::Standard);
        assert_eq!(o.pattern.minimum_strength_threshold, 1.0);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let o = BaziOptions::from_json(r#"{"include_shensha": true, "precision": "detailed"}"#)
            .unwrap();
        assert!(o.include_shensha);
        assert_eq!(o.precision, Precision::Detailed);
        assert!(o.include_major_periods);
        assert_eq!(o.major_period_count, 10);
    }

    #[test]
    fn nested_pattern_config() {
        let o = BaziOptions::from_json(r#"{"pattern": {"include_combinations": false}}"#).unwrap();
        assert!(!o.pattern.include_combinations);
        assert_eq!(o.pattern.minimum_strength_threshold, 1.0);
    }

    #[test]
    fn invalid_options_are_collected() {
        let mut o = BaziOptions {
            major_period_count: 0,
            fleeting_year_range: 500,
            ..BaziOptions::default()
        };
        o.pattern.minimum_strength_threshold = f64::NAN;
        let fields: Vec<_> = o.validate().unwrap_err().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "major_period_count",
                "fleeting_year_range",
                "pattern.minimum_strength_threshold"
            ]
        );
    }

    #[test]
    fn precision_rounding() {
        assert_eq!(Precision::Basic.round(66.666), 67.0);
        assert_eq!(Precision::Standard.round(66.666), 66.7);
        assert_eq!(Precision::Detailed.round(66.666), 66.67);
        assert_eq!(Precision::parse("Detailed"), Some(Precision::Detailed));
        assert_eq!(Precision::parse("max"), None);
    }
}
