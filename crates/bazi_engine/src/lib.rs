//! Four-pillar chart engine.
//!
//! This crate provides the primary [`BaziEngine`], which validates a
//! [`BirthInput`], converts it to cycle pairs through a [`CalendarAdapter`],
//! runs the `bazi_base` analyzers selected by [`BaziOptions`] and assembles
//! one immutable [`BaziResult`].
//!
//! Marker detection and pairwise relationship analysis are optional: when
//! either fails the field is left empty and the rest of the chart is still
//! returned. Calendar failures are fatal and carry the original input.

pub mod cache;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod input;
pub mod options;
pub mod result;

pub use cache::{CacheConfig, CacheKey, CacheStats, ChartCache};
pub use calendar::{
    CalendarAdapter, CalendarError, CalendarPillars, FixedCalendar, LunarDate, SolarTermCalendar,
};
pub use engine::{BaziEngine, EngineConfig};
pub use error::{BaziError, CALCULATION_ERROR, INVALID_CONFIG, INVALID_INPUT};
pub use input::{BirthInput, FieldError, MAX_YEAR, MIN_YEAR, RawBirthInput};
pub use options::{BaziOptions, Precision};
pub use result::{
    BaziResult, BirthInfo, ChartRow, Diagnostics, FORMAT_VERSION, FleetingYearWindow, Stage,
    StageTiming,
};
