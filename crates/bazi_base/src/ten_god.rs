//! Ten gods (shishen): the relation of any stem to the day master.
//!
//! Classification is a fixed 10×10 table keyed by (day master, other stem).
//! The rule behind it: same element gives the companions, the element the day
//! master generates gives output, the element it controls gives wealth, the
//! element controlling it gives power, and the element generating it gives
//! resource. Matching polarity selects the "partial" member of each pair.
//!
//! Strength weighting follows the usual positional scheme: a visible stem is
//! worth 80 × position weight × 1.2 (transparent), a hidden stem is worth its
//! base strength × kind weight × hidden position weight.

use serde::Serialize;

use crate::element::Element;
use crate::pillar::{FourPillars, PillarPosition};
use crate::stem::HeavenlyStem;

/// The ten relational categories, in classical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenGod {
    BiJian,
    JieCai,
    ShiShen,
    ShangGuan,
    PianCai,
    ZhengCai,
    QiSha,
    ZhengGuan,
    PianYin,
    ZhengYin,
}

/// All 10 ten gods in classical order.
pub const ALL_TEN_GODS: [TenGod; 10] = [
    TenGod::BiJian,
    TenGod::JieCai,
    TenGod::ShiShen,
    TenGod::ShangGuan,
    TenGod::PianCai,
    TenGod::ZhengCai,
    TenGod::QiSha,
    TenGod::ZhengGuan,
    TenGod::PianYin,
    TenGod::ZhengYin,
];

/// Qualitative leaning of a ten god.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenGodNature {
    Positive,
    Negative,
    Neutral,
}

/// The five two-member families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenGodGroup {
    /// 比劫
    Companion,
    /// 食伤
    Output,
    /// 财
    Wealth,
    /// 官杀
    Power,
    /// 印
    Resource,
}

impl TenGodGroup {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Companion => "比劫",
            Self::Output => "食伤",
            Self::Wealth => "财",
            Self::Power => "官杀",
            Self::Resource => "印",
        }
    }

    pub const fn members(self) -> [TenGod; 2] {
        match self {
            Self::Companion => [TenGod::BiJian, TenGod::JieCai],
            Self::Output => [TenGod::ShiShen, TenGod::ShangGuan],
            Self::Wealth => [TenGod::PianCai, TenGod::ZhengCai],
            Self::Power => [TenGod::QiSha, TenGod::ZhengGuan],
            Self::Resource => [TenGod::PianYin, TenGod::ZhengYin],
        }
    }
}

pub const ALL_GROUPS: [TenGodGroup; 5] = [
    TenGodGroup::Companion,
    TenGodGroup::Output,
    TenGodGroup::Wealth,
    TenGodGroup::Power,
    TenGodGroup::Resource,
];

impl TenGod {
    /// Full Chinese name (long form).
    pub const fn name(self) -> &'static str {
        match self {
            Self::BiJian => "比肩",
            Self::JieCai => "劫财",
            Self::ShiShen => "食神",
            Self::ShangGuan => "伤官",
            Self::PianCai => "偏财",
            Self::ZhengCai => "正财",
            Self::QiSha => "七杀",
            Self::ZhengGuan => "正官",
            Self::PianYin => "偏印",
            Self::ZhengYin => "正印",
        }
    }

    /// Single-glyph short form. 偏财 is "才" and 偏印 is "枭".
    pub const fn simplified(self) -> &'static str {
        match self {
            Self::BiJian => "比",
            Self::JieCai => "劫",
            Self::ShiShen => "食",
            Self::ShangGuan => "伤",
            Self::PianCai => "才",
            Self::ZhengCai => "财",
            Self::QiSha => "杀",
            Self::ZhengGuan => "官",
            Self::PianYin => "枭",
            Self::ZhengYin => "印",
        }
    }

    pub const fn english(self) -> &'static str {
        match self {
            Self::BiJian => "Friend",
            Self::JieCai => "Rob Wealth",
            Self::ShiShen => "Eating God",
            Self::ShangGuan => "Hurting Officer",
            Self::PianCai => "Indirect Wealth",
            Self::ZhengCai => "Direct Wealth",
            Self::QiSha => "Seven Killings",
            Self::ZhengGuan => "Direct Officer",
            Self::PianYin => "Indirect Resource",
            Self::ZhengYin => "Direct Resource",
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::BiJian => 0,
            Self::JieCai => 1,
            Self::ShiShen => 2,
            Self::ShangGuan => 3,
            Self::PianCai => 4,
            Self::ZhengCai => 5,
            Self::QiSha => 6,
            Self::ZhengGuan => 7,
            Self::PianYin => 8,
            Self::ZhengYin => 9,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        ALL_TEN_GODS.get(index as usize).copied()
    }

    /// Parse either encoding ("正官" or "官").
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        ALL_TEN_GODS
            .into_iter()
            .find(|g| g.name() == s || g.simplified() == s)
    }

    pub const fn group(self) -> TenGodGroup {
        match self {
            Self::BiJian | Self::JieCai => TenGodGroup::Companion,
            Self::ShiShen | Self::ShangGuan => TenGodGroup::Output,
            Self::PianCai | Self::ZhengCai => TenGodGroup::Wealth,
            Self::QiSha | Self::ZhengGuan => TenGodGroup::Power,
            Self::PianYin | Self::ZhengYin => TenGodGroup::Resource,
        }
    }

    pub const fn nature(self) -> TenGodNature {
        match self {
            Self::BiJian | Self::ShangGuan => TenGodNature::Neutral,
            Self::JieCai | Self::QiSha | Self::PianYin => TenGodNature::Negative,
            _ => TenGodNature::Positive,
        }
    }

    /// Characteristic strength score (0-100).
    pub const fn base_strength(self) -> u32 {
        match self {
            Self::BiJian => 70,
            Self::JieCai => 60,
            Self::ShiShen => 80,
            Self::ShangGuan => 75,
            Self::PianCai => 85,
            Self::ZhengCai => 90,
            Self::QiSha => 65,
            Self::ZhengGuan => 95,
            Self::PianYin => 55,
            Self::ZhengYin => 88,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::BiJian => "自我意识强，独立自主，竞争意识",
            Self::JieCai => "争夺心强，冲动易怒，破财象征",
            Self::ShiShen => "才华横溢，享受生活，子女宫",
            Self::ShangGuan => "聪明才智，反叛精神，艺术天赋",
            Self::PianCai => "善于经营，偏门财源，风流多情",
            Self::ZhengCai => "正当收入，稳定财源，妻子象征",
            Self::QiSha => "权威象征，压力挑战，小人是非",
            Self::ZhengGuan => "正当权力，社会地位，丈夫象征",
            Self::PianYin => "偏门学问，孤独象征，继母代表",
            Self::ZhengYin => "学问智慧，长辈关爱，母亲象征",
        }
    }
}

impl std::fmt::Display for TenGod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Classification table
// ---------------------------------------------------------------------------

use TenGod::*;

/// Rows: day master (甲..癸). Columns: other stem (甲..癸).
const TEN_GOD_TABLE: [[TenGod; 10]; 10] = [
    [BiJian, JieCai, ShiShen, ShangGuan, PianCai, ZhengCai, QiSha, ZhengGuan, PianYin, ZhengYin],
    [JieCai, BiJian, ShangGuan, ShiShen, ZhengCai, PianCai, ZhengGuan, QiSha, ZhengYin, PianYin],
    [PianYin, ZhengYin, BiJian, JieCai, ShiShen, ShangGuan, PianCai, ZhengCai, QiSha, ZhengGuan],
    [ZhengYin, PianYin, JieCai, BiJian, ShangGuan, ShiShen, ZhengCai, PianCai, ZhengGuan, QiSha],
    [QiSha, ZhengGuan, PianYin, ZhengYin, BiJian, JieCai, ShiShen, ShangGuan, PianCai, ZhengCai],
    [ZhengGuan, QiSha, ZhengYin, PianYin, JieCai, BiJian, ShangGuan, ShiShen, ZhengCai, PianCai],
    [PianCai, ZhengCai, QiSha, ZhengGuan, PianYin, ZhengYin, BiJian, JieCai, ShiShen, ShangGuan],
    [ZhengCai, PianCai, ZhengGuan, QiSha, ZhengYin, PianYin, JieCai, BiJian, ShangGuan, ShiShen],
    [ShiShen, ShangGuan, PianCai, ZhengCai, QiSha, ZhengGuan, PianYin, ZhengYin, BiJian, JieCai],
    [ShangGuan, ShiShen, ZhengCai, PianCai, ZhengGuan, QiSha, ZhengYin, PianYin, JieCai, BiJian],
];

/// Ten god of `other` seen from `day_master`. Total over all 100 pairs.
pub const fn ten_god(day_master: HeavenlyStem, other: HeavenlyStem) -> TenGod {
    TEN_GOD_TABLE[day_master.index() as usize][other.index() as usize]
}

// ---------------------------------------------------------------------------
// Strength weighting
// ---------------------------------------------------------------------------

const BASE_STEM_STRENGTH: f64 = 80.0;
const TRANSPARENT_BONUS: f64 = 1.2;

/// Positional weight for a visible stem.
pub const fn stem_position_weight(position: PillarPosition) -> f64 {
    match position {
        PillarPosition::Year => 0.8,
        PillarPosition::Month => 1.0,
        PillarPosition::Day => 1.2,
        PillarPosition::Hour => 0.9,
    }
}

/// Positional weight for a hidden stem (the month branch dominates).
pub const fn hidden_position_weight(position: PillarPosition) -> f64 {
    match position {
        PillarPosition::Year => 0.7,
        PillarPosition::Month => 1.2,
        PillarPosition::Day => 1.0,
        PillarPosition::Hour => 0.8,
    }
}

/// Qualitative rating for a strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthRating {
    VeryStrong,
    Strong,
    Medium,
    Weak,
    VeryWeak,
}

impl StrengthRating {
    pub fn from_strength(strength: f64) -> Self {
        if strength >= 90.0 {
            Self::VeryStrong
        } else if strength >= 70.0 {
            Self::Strong
        } else if strength >= 50.0 {
            Self::Medium
        } else if strength >= 30.0 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::VeryStrong => "很强",
            Self::Strong => "较强",
            Self::Medium => "中等",
            Self::Weak => "较弱",
            Self::VeryWeak => "很弱",
        }
    }
}

/// Where a classified stem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StemSource {
    Stem,
    Hidden,
}

/// One classified stem with its weighted strength.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodEntry {
    pub position: PillarPosition,
    pub source: StemSource,
    pub stem: HeavenlyStem,
    pub element: Element,
    pub ten_god: TenGod,
    pub strength: f64,
    /// Visible stems always; hidden stems when the same stem stands above them.
    pub visible: bool,
}

/// Per-pillar classification with both encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PillarTenGod {
    pub position: PillarPosition,
    pub ten_god: TenGod,
    pub name: &'static str,
    pub simplified: &'static str,
    pub is_day_master: bool,
}

impl PillarTenGod {
    fn new(position: PillarPosition, ten_god: TenGod) -> Self {
        Self {
            position,
            ten_god,
            name: ten_god.name(),
            simplified: ten_god.simplified(),
            is_day_master: position == PillarPosition::Day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TenGodCount {
    pub ten_god: TenGod,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodSummary {
    /// One entry per ten god, classical order.
    pub counts: Vec<TenGodCount>,
    pub strongest: Option<TenGod>,
    /// Least frequent among those present.
    pub weakest: Option<TenGod>,
    pub visible: Vec<TenGod>,
    pub hidden: Vec<TenGod>,
    pub balance: TenGodNature,
    pub distribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodAnalysis {
    pub day_master: HeavenlyStem,
    pub year: PillarTenGod,
    pub month: PillarTenGod,
    pub day: PillarTenGod,
    pub hour: PillarTenGod,
    pub entries: Vec<TenGodEntry>,
    pub summary: TenGodSummary,
}

/// Classify every stem and hidden stem of the chart against the day master.
///
/// The day stem itself is skipped, as are day-branch hidden stems equal to
/// the day master.
pub fn analyze_ten_gods(pillars: &FourPillars) -> TenGodAnalysis {
    let dm = pillars.day_master();
    let mut entries = Vec::new();

    for pillar in pillars.iter() {
        let pos = pillar.position;
        if pos != PillarPosition::Day {
            let strength = BASE_STEM_STRENGTH * stem_position_weight(pos) * TRANSPARENT_BONUS;
            entries.push(TenGodEntry {
                position: pos,
                source: StemSource::Stem,
                stem: pillar.stem,
                element: pillar.stem.element(),
                ten_god: ten_god(dm, pillar.stem),
                strength: strength.round(),
                visible: true,
            });
        }
        for hs in pillar.branch.hidden_stems() {
            if pos == PillarPosition::Day && hs.stem == dm {
                continue;
            }
            let strength = hs.kind.base_strength() * hs.kind.weight() * hidden_position_weight(pos);
            entries.push(TenGodEntry {
                position: pos,
                source: StemSource::Hidden,
                stem: hs.stem,
                element: hs.stem.element(),
                ten_god: ten_god(dm, hs.stem),
                strength: strength.round(),
                visible: hs.stem == pillar.stem,
            });
        }
    }

    let summary = summarize(&entries);
    TenGodAnalysis {
        day_master: dm,
        year: PillarTenGod::new(PillarPosition::Year, ten_god(dm, pillars.year.stem)),
        month: PillarTenGod::new(PillarPosition::Month, ten_god(dm, pillars.month.stem)),
        day: PillarTenGod::new(PillarPosition::Day, TenGod::BiJian),
        hour: PillarTenGod::new(PillarPosition::Hour, ten_god(dm, pillars.hour.stem)),
        entries,
        summary,
    }
}

fn summarize(entries: &[TenGodEntry]) -> TenGodSummary {
    let mut counts = [0u32; 10];
    let mut visible = Vec::new();
    let mut hidden = Vec::new();

    for e in entries {
        counts[e.ten_god.index() as usize] += 1;
        if e.visible {
            if !visible.contains(&e.ten_god) {
                visible.push(e.ten_god);
            }
        } else if !hidden.contains(&e.ten_god) {
            hidden.push(e.ten_god);
        }
    }

    let mut strongest = None;
    let mut weakest = None;
    let (mut max, mut min) = (0u32, u32::MAX);
    for g in ALL_TEN_GODS {
        let c = counts[g.index() as usize];
        if c > max {
            max = c;
            strongest = Some(g);
        }
        if c > 0 && c < min {
            min = c;
            weakest = Some(g);
        }
    }

    let mut positive = 0;
    let mut negative = 0;
    for g in ALL_TEN_GODS {
        match g.nature() {
            TenGodNature::Positive => positive += counts[g.index() as usize],
            TenGodNature::Negative => negative += counts[g.index() as usize],
            TenGodNature::Neutral => {}
        }
    }
    let balance = if positive > negative {
        TenGodNature::Positive
    } else if negative > positive {
        TenGodNature::Negative
    } else {
        TenGodNature::Neutral
    };

    let total: u32 = counts.iter().sum();
    let mut distribution = format!(
        "十神共{total}个，透出{}种，藏{}种。",
        visible.len(),
        hidden.len()
    );
    let major: Vec<String> = ALL_TEN_GODS
        .iter()
        .filter(|g| counts[g.index() as usize] >= 2)
        .map(|g| format!("{}{}个", g.name(), counts[g.index() as usize]))
        .collect();
    if !major.is_empty() {
        distribution.push_str(&format!("主要有{}。", major.join("、")));
    }
    distribution.push_str(match balance {
        TenGodNature::Positive => "整体偏向正面发展。",
        TenGodNature::Negative => "需要注意负面影响。",
        TenGodNature::Neutral => "正负十神比较均衡。",
    });

    TenGodSummary {
        counts: ALL_TEN_GODS
            .iter()
            .map(|&g| TenGodCount {
                ten_god: g,
                count: counts[g.index() as usize],
            })
            .collect(),
        strongest,
        weakest,
        visible,
        hidden,
        balance,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementRelation;
    use crate::stem::ALL_STEMS;

    /// Re-derive the category from element relations and polarity.
    fn derived(dm: HeavenlyStem, other: HeavenlyStem) -> TenGod {
        let base = match dm.element().relation_to(other.element()) {
            ElementRelation::Same => 0,
            ElementRelation::Generates => 2,
            ElementRelation::Controls => 4,
            ElementRelation::ControlledBy => 6,
            ElementRelation::GeneratedBy => 8,
        };
        let off = if dm.is_yang() == other.is_yang() { 0 } else { 1 };
        TenGod::from_index(base + off).unwrap()
    }

    #[test]
    fn table_matches_element_rule() {
        for dm in ALL_STEMS {
            for other in ALL_STEMS {
                assert_eq!(ten_god(dm, other), derived(dm, other), "{dm} {other}");
            }
        }
    }

    #[test]
    fn identity_is_bi_jian() {
        for s in ALL_STEMS {
            assert_eq!(ten_god(s, s), TenGod::BiJian);
        }
    }

    #[test]
    fn each_row_is_a_permutation() {
        for dm in ALL_STEMS {
            let mut seen = [false; 10];
            for other in ALL_STEMS {
                seen[ten_god(dm, other).index() as usize] = true;
            }
            assert!(seen.iter().all(|&b| b));
        }
    }

    #[test]
    fn xin_day_master_samples() {
        use HeavenlyStem as S;
        assert_eq!(ten_god(S::Xin, S::Geng), TenGod::JieCai);
        assert_eq!(ten_god(S::Xin, S::Ren), TenGod::ShangGuan);
        assert_eq!(ten_god(S::Xin, S::Yi), TenGod::PianCai);
        assert_eq!(ten_god(S::Xin, S::Bing), TenGod::ZhengGuan);
    }

    #[test]
    fn encodings_agree() {
        for g in ALL_TEN_GODS {
            assert_eq!(TenGod::parse(g.name()), Some(g));
            assert_eq!(TenGod::parse(g.simplified()), Some(g));
        }
        assert_eq!(TenGod::PianCai.simplified(), "才");
    }

    #[test]
    fn groups_partition_ten_gods() {
        let mut n = 0;
        for grp in ALL_GROUPS {
            for m in grp.members() {
                assert_eq!(m.group(), grp);
                n += 1;
            }
        }
        assert_eq!(n, 10);
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(StrengthRating::from_strength(96.0), StrengthRating::VeryStrong);
        assert_eq!(StrengthRating::from_strength(77.0), StrengthRating::Strong);
        assert_eq!(StrengthRating::from_strength(50.0), StrengthRating::Medium);
        assert_eq!(StrengthRating::from_strength(30.0), StrengthRating::Weak);
        assert_eq!(StrengthRating::from_strength(29.9), StrengthRating::VeryWeak);
    }

    #[test]
    fn stem_weights_round() {
        let weighted =
            |p| (BASE_STEM_STRENGTH * stem_position_weight(p) * TRANSPARENT_BONUS).round();
        let year = weighted(PillarPosition::Year);
        let month = weighted(PillarPosition::Month);
        let hour = weighted(PillarPosition::Hour);
        assert_eq!((year, month, hour), (77.0, 96.0, 86.0));
    }
}
