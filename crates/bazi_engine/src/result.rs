//! The assembled result record.

use bazi_base::pattern::PatternAnalysis;
use bazi_base::{
    ElementAnalysis, FleetingYear, FourPillars, Gender, MajorPeriodSequence, PeriodTransition,
    PillarPosition, RelationshipAnalysis, SeasonalStrength, ShenShaAnalysis, StrengthAnalysis,
    TenGodAnalysis,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::calendar::LunarDate;
use crate::input::BirthInput;

/// Format tag carried by every result.
pub const FORMAT_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Calendar,
    Pillars,
    TenGods,
    Elements,
    Strength,
    StartingAge,
    MajorPeriods,
    FleetingYears,
    ShenSha,
    Relationships,
    Pattern,
    Assembly,
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Calendar => "calendar",
            Self::Pillars => "pillars",
            Self::TenGods => "ten_gods",
            Self::Elements => "elements",
            Self::Strength => "strength",
            Self::StartingAge => "starting_age",
            Self::MajorPeriods => "major_periods",
            Self::FleetingYears => "fleeting_years",
            Self::ShenSha => "shensha",
            Self::Relationships => "relationships",
            Self::Pattern => "pattern",
            Self::Assembly => "assembly",
        }
    }

    /// Stages whose failure drops their output instead of the request.
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::ShenSha | Self::Relationships)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub stage: Stage,
    pub micros: u64,
}

/// Timings and trace notes, present only for debug runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub adapter: &'static str,
    pub timings: Vec<StageTiming>,
    pub trace: Vec<String>,
}

impl Diagnostics {
    pub fn total_micros(&self) -> u64 {
        self.timings.iter().map(|t| t.micros).sum()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Birth data echo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthInfo {
    /// Gregorian date, when the adapter knows it.
    pub solar_date: Option<NaiveDate>,
    pub lunar: Option<LunarDate>,
    pub hour: u32,
    pub minute: Option<u32>,
    pub gender: Gender,
    pub is_lunar: bool,
    pub timezone: Option<String>,
}

impl BirthInfo {
    pub(crate) fn new(
        input: &BirthInput,
        solar_date: Option<NaiveDate>,
        lunar: Option<LunarDate>,
    ) -> Self {
        Self {
            solar_date,
            lunar,
            hour: input.hour,
            minute: input.minute,
            gender: input.gender,
            is_lunar: input.is_lunar,
            timezone: input.timezone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetingYearWindow {
    pub years: Vec<FleetingYear>,
    /// Index into `years` of the current calendar year.
    pub current: Option<usize>,
}

impl FleetingYearWindow {
    pub(crate) fn new(years: Vec<FleetingYear>) -> Self {
        let current = years.iter().position(|y| y.is_current);
        Self { years, current }
    }

    pub fn current_year(&self) -> Option<&FleetingYear> {
        self.current.map(|i| &self.years[i])
    }
}

/// One chart computation. Sections switched off by options are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaziResult {
    pub version: &'static str,
    pub birth: BirthInfo,
    pub four_pillars: FourPillars,
    pub ten_gods: Option<TenGodAnalysis>,
    pub elements: Option<ElementAnalysis>,
    pub strength: Option<StrengthAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_strength: Option<SeasonalStrength>,
    pub starting_age: u32,
    pub major_periods: Option<MajorPeriodSequence>,
    pub period_transitions: Vec<PeriodTransition>,
    pub fleeting_years: Option<FleetingYearWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shensha: Option<ShenShaAnalysis>,
    pub relationships: Option<RelationshipAnalysis>,
    pub pattern: Option<PatternAnalysis>,
    pub calculated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

/// Flat per-pillar projection for tabular display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub position: PillarPosition,
    pub ganzhi: String,
    pub nayin: &'static str,
    pub ten_god: &'static str,
    pub hidden_stems: String,
    pub markers: Vec<&'static str>,
}

impl BaziResult {
    /// Year, month, day and hour rows.
    pub fn rows(&self) -> Vec<ChartRow> {
        self.four_pillars
            .iter()
            .map(|p| {
                let ten_god = if p.is_day_master { "日主" } else { p.ten_god.name() };
                let hidden_stems = p
                    .hidden_stems
                    .iter()
                    .map(|h| h.stem.glyph())
                    .collect::<Vec<_>>()
                    .join("");
                let markers = self
                    .shensha
                    .as_ref()
                    .map(|s| s.at(p.position.into()).into_iter().map(|k| k.name()).collect())
                    .unwrap_or_default();
                ChartRow {
                    position: p.position,
                    ganzhi: p.label.clone(),
                    nayin: p.nayin.name,
                    ten_god,
                    hidden_stems,
                    markers,
                }
            })
            .collect()
    }
}
