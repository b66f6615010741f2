//! Result and configuration types for pattern classification.

use serde::{Deserialize, Serialize};

use crate::combination::BranchCombination;
use crate::element::Polarity;
use crate::ten_god::{TenGod, TenGodGroup};

/// Default minimum aggregated strength for a dominant ten god.
pub const DEFAULT_MINIMUM_STRENGTH: f64 = 1.0;

/// Supporting ten gods must reach this share of the threshold.
pub const SUPPORTING_RATIO: f64 = 0.6;

/// Classifier switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Attach branch combinations as side notes.
    pub include_combinations: bool,
    pub minimum_strength_threshold: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            include_combinations: true,
            minimum_strength_threshold: DEFAULT_MINIMUM_STRENGTH,
        }
    }
}

/// How the dominant ten god should be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternUsage {
    Favorable,
    Unfavorable,
    Neutral,
}

impl PatternUsage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Favorable => "喜用",
            Self::Unfavorable => "忌用",
            Self::Neutral => "中性",
        }
    }
}

/// Aggregated strength of one ten god.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TenGodStrength {
    pub ten_god: TenGod,
    pub strength: f64,
    /// Share of the total, 0..=100.
    pub percentage: f64,
}

/// Aggregated strength of one ten-god pair (比劫, 食伤, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupStrength {
    pub group: TenGodGroup,
    pub label: &'static str,
    pub strength: f64,
    pub percentage: f64,
}

/// A resolved pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternDetail {
    pub name: &'static str,
    pub ten_god: TenGod,
    pub supporting: Vec<TenGod>,
    pub usage: PatternUsage,
    pub description: &'static str,
    /// Percentage share of the ranking held by `ten_god`.
    pub confidence: f64,
}

/// Strength reported for a stem-polarity pattern.
pub const POLARITY_PATTERN_STRENGTH: u8 = 70;

/// A chart-wide special pattern read straight off the stems (纯阳格/纯阴格).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecialPattern {
    pub name: &'static str,
    pub polarity: Polarity,
    pub usage: PatternUsage,
    pub description: &'static str,
    /// 0..=100.
    pub strength: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternAnalysis {
    pub primary: Option<PatternDetail>,
    pub secondary: Option<PatternDetail>,
    /// Set when all four stems share one polarity.
    pub special: Option<SpecialPattern>,
    /// Strongest first.
    pub ranking: Vec<TenGodStrength>,
    /// Largest share first.
    pub groups: Vec<GroupStrength>,
    pub combinations: Vec<BranchCombination>,
    pub notes: Vec<String>,
}

impl PatternAnalysis {
    /// Round strengths, percentages and confidences to `decimals` places.
    pub fn round_to(&mut self, decimals: u32) {
        let factor = 10f64.powi(decimals as i32);
        let round = |v: f64| (v * factor).round() / factor;
        for r in &mut self.ranking {
            r.strength = round(r.strength);
            r.percentage = round(r.percentage);
        }
        for g in &mut self.groups {
            g.strength = round(g.strength);
            g.percentage = round(g.percentage);
        }
        for d in self.primary.iter_mut().chain(self.secondary.iter_mut()) {
            d.confidence = round(d.confidence);
        }
    }
}
