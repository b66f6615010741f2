//! Four-pillar (八字) symbol tables and chart analyzers.
//!
//! This crate provides:
//! - The ten stems, twelve branches, the 60-pair cycle and its NaYin sounds
//! - The annotated four-pillar chart with hidden stems and KuiGang analysis
//! - Element tally, day-master strength and ten-god classification
//! - Seasonal (月令) weighted element scores with a day-master share
//! - Pairwise stem and branch relationships with hidden combinations
//! - 33 positional markers (神煞) over natal and period slots
//! - Major periods, fleeting years and pattern (格局) classification
//!
//! Everything here is pure and synchronous. Lookup tables are exhaustive
//! matches over closed enums, so no lookup can fall through.

pub mod branch;
pub mod combination;
pub mod element;
pub mod element_analysis;
pub mod error;
pub mod kuigang;
pub mod pattern;
pub mod period;
pub mod pillar;
pub mod relationship;
pub mod seasonal;
pub mod sexagenary;
pub mod shensha;
pub mod stem;
pub mod ten_god;

pub use branch::{ALL_BRANCHES, EarthlyBranch, HiddenStem, HiddenStemKind};
pub use combination::{
    BranchCombination, CombinationKind, FullFrame, detect_branch_combinations, full_frames,
    pair_combination,
};
pub use element::{ALL_ELEMENTS, Element, ElementRelation, Polarity};
pub use element_analysis::{
    DayMasterStrength, ElementAnalysis, ElementTally, StrengthAnalysis, analyze_elements,
    analyze_strength, tally_elements,
};
pub use error::{RelationshipError, ShenShaError};
pub use kuigang::{KuiGangAnalysis, KuiGangInfo, KuiGangStrength, KuiGangSubType, analyze_kuigang};
pub use pattern::{
    PatternAnalysis, PatternConfig, PatternDetail, PatternUsage, SpecialPattern, classify_pattern,
    classify_strengths,
};
pub use period::{
    FALLBACK_START_AGE, Favorability, FleetingYear, MajorPeriod, MajorPeriodSequence,
    PeriodDirection, PeriodTransition, PeriodYearRelation, fleeting_years, major_periods,
    period_direction, period_transitions,
};
pub use pillar::{
    ALL_CHART_POSITIONS, ALL_POSITIONS, ChartPosition, FourPillars, Gender, Pillar,
    PillarOptions, PillarPosition, SpecialAttribute, build_four_pillars,
};
pub use relationship::{
    Harmony, HiddenCombination, RelationCategory, RelationKind, RelationshipAnalysis,
    RelationshipRecord, analyze_relationships, analyze_symbols, branch_relation, stem_relation,
};
pub use seasonal::{
    BalanceLevel, ElementScore, SeasonalPhase, SeasonalStrength, analyze_seasonal_strength,
};
pub use sexagenary::{ALL_GANZHI, GanZhi, NaYin, year_ganzhi};
pub use shensha::{
    ShenShaAnalysis, ShenShaCategory, ShenShaInput, ShenShaKind, ShenShaRecord, detect_from_symbols,
    detect_shensha,
};
pub use stem::{ALL_STEMS, HeavenlyStem};
pub use ten_god::{ALL_TEN_GODS, TenGod, TenGodAnalysis, TenGodGroup, analyze_ten_gods, ten_god};
