//! Pairwise relationship analysis among stems and among branches.
//!
//! Each pair resolves to exactly one relationship by priority, first match
//! wins. Every check is symmetric, so `(a, b)` and `(b, a)` always share a
//! category. Only the description keeps the direction of a generation or
//! domination.
//!
//! Branch priority: six-combination, clash, triad/meeting membership,
//! punishment, harm, breakage, void, generation/domination, none.
//! Stem priority: five-combination, clash, generation, domination, none.
//!
//! Description text comes from a template table keyed by relationship kind,
//! kept apart from the detection logic.

use serde::Serialize;

use crate::branch::EarthlyBranch;
use crate::combination::{CombinationKind, full_frames, pair_combination};
use crate::element::{Element, ElementRelation};
use crate::error::RelationshipError;
use crate::pillar::{ALL_CHART_POSITIONS, ChartPosition, FourPillars};
use crate::stem::HeavenlyStem;

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Coarse relationship category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationCategory {
    Generation,
    Domination,
    Combination,
    Opposition,
    Punishment,
    Harm,
    Breakage,
    Void,
    None,
}

/// Fine-grained relationship kind; selects the description template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    StemCombination,
    StemClash,
    SixCombination,
    Clash,
    HalfTriad,
    FullTriad,
    HalfMeeting,
    FullMeeting,
    Punishment,
    SelfPunishment,
    Harm,
    Breakage,
    Void,
    Generation,
    Domination,
    SameElement,
    Unrelated,
}

impl RelationKind {
    pub const fn category(self) -> RelationCategory {
        match self {
            Self::StemCombination
            | Self::SixCombination
            | Self::HalfTriad
            | Self::FullTriad
            | Self::HalfMeeting
            | Self::FullMeeting => RelationCategory::Combination,
            Self::StemClash | Self::Clash => RelationCategory::Opposition,
            Self::Punishment | Self::SelfPunishment => RelationCategory::Punishment,
            Self::Harm => RelationCategory::Harm,
            Self::Breakage => RelationCategory::Breakage,
            Self::Void => RelationCategory::Void,
            Self::Generation => RelationCategory::Generation,
            Self::Domination => RelationCategory::Domination,
            Self::SameElement | Self::Unrelated => RelationCategory::None,
        }
    }

    /// Sub-type label, e.g. "六合" or "相刑".
    pub const fn label(self) -> &'static str {
        match self {
            Self::StemCombination => "五合",
            Self::StemClash => "相冲",
            Self::SixCombination => "六合",
            Self::Clash => "相冲",
            Self::HalfTriad => "半合",
            Self::FullTriad => "三合",
            Self::HalfMeeting => "半会",
            Self::FullMeeting => "三会",
            Self::Punishment => "相刑",
            Self::SelfPunishment => "自刑",
            Self::Harm => "相穿",
            Self::Breakage => "相破",
            Self::Void => "相绝",
            Self::Generation => "相生",
            Self::Domination => "相克",
            Self::SameElement => "比和",
            Self::Unrelated => "无关系",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationPolarity {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationStrength {
    Weak,
    Medium,
    Strong,
}

/// A stem or a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Stem(HeavenlyStem),
    Branch(EarthlyBranch),
}

impl Symbol {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Stem(s) => s.glyph(),
            Self::Branch(b) => b.glyph(),
        }
    }

    pub fn element(self) -> Element {
        match self {
            Self::Stem(s) => s.element(),
            Self::Branch(b) => b.element(),
        }
    }
}

/// Outcome of classifying one pair, before positions are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRelation {
    pub kind: RelationKind,
    /// Transformed or frame element for combinations.
    pub element: Option<Element>,
    pub polarity: RelationPolarity,
    pub strength: RelationStrength,
    /// For generation/domination: true when the second symbol acts on the first.
    pub reversed: bool,
}

impl PairRelation {
    pub fn category(&self) -> RelationCategory {
        self.kind.category()
    }

    const fn new(
        kind: RelationKind,
        polarity: RelationPolarity,
        strength: RelationStrength,
    ) -> Self {
        Self {
            kind,
            element: None,
            polarity,
            strength,
            reversed: false,
        }
    }

    const fn with_element(mut self, e: Element) -> Self {
        self.element = Some(e);
        self
    }

    const fn reversed(mut self, r: bool) -> Self {
        self.reversed = r;
        self
    }
}

/// One relationship between two (or, for a full frame, three) symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipRecord {
    pub members: Vec<Symbol>,
    pub positions: Vec<ChartPosition>,
    pub category: RelationCategory,
    pub kind: RelationKind,
    pub sub_type: &'static str,
    pub element: Option<Element>,
    pub description: String,
    pub effect: &'static str,
    pub polarity: RelationPolarity,
    pub strength: RelationStrength,
}

impl RelationshipRecord {
    /// Excluded from aggregate output.
    pub fn is_trivial(&self) -> bool {
        self.category == RelationCategory::None && self.strength == RelationStrength::Weak
    }
}

// ---------------------------------------------------------------------------
// Description templates
// ---------------------------------------------------------------------------

/// (description template, effect). `{a}` `{b}` `{c}` are symbols, `{ea}`
/// `{eb}` their elements, `{x}` the transformed or frame element.
const fn template(kind: RelationKind) -> (&'static str, &'static str) {
    use RelationKind::*;
    match kind {
        StemCombination => ("{a}与{b}相合化{x}", "合而化气，彼此牵绊"),
        StemClash => ("{a}与{b}相冲对立", "对立冲突，变动较多"),
        SixCombination => ("{a}与{b}六合化{x}，关系和谐", "增强彼此力量，带来和谐与合作"),
        Clash => ("{a}与{b}相冲对立", "产生冲突和变动，易有波折"),
        HalfTriad => ("{a}与{b}半合{x}局，关系友好", "形成部分合作关系，增强部分力量"),
        FullTriad => ("{a}{b}{c}三合{x}局", "形成强力合作关系，增强五行力量"),
        HalfMeeting => ("{a}与{b}同属{x}方，气势相连", "方局之气初聚，略增五行力量"),
        FullMeeting => ("{a}{b}{c}三会{x}方", "一方之气汇聚，五行力量极旺"),
        Punishment => ("{a}与{b}相刑，有刑伤之忧", "带来刑伤和麻烦，需要谨慎小心"),
        SelfPunishment => ("{a}{b}自刑", "自我消耗，心绪不宁"),
        Harm => ("{a}与{b}相穿，暗中伤害", "暗中损伤，影响健康和感情"),
        Breakage => ("{a}与{b}相破，破坏力量", "削弱力量，破坏和谐"),
        Void => ("{a}与{b}相绝，气机断绝", "力量断绝，难以相济"),
        Generation => ("{a}({ea})生{b}({eb})", "相互支持，增强力量"),
        Domination => ("{a}({ea})克{b}({eb})", "相互制约，削弱力量"),
        SameElement => ("{a}与{b}同为{ea}，关系平和", "关系平和，影响较小"),
        Unrelated => ("{a}与{b}无特殊关系", "关系平和，影响较小"),
    }
}

fn render(
    kind: RelationKind,
    members: &[Symbol],
    element: Option<Element>,
) -> (String, &'static str) {
    let (tpl, effect) = template(kind);
    let glyph = |i: usize| members.get(i).map_or("", |s| s.glyph());
    let el = |i: usize| members.get(i).map_or("", |s| s.element().glyph());
    let text = tpl
        .replace("{ea}", el(0))
        .replace("{eb}", el(1))
        .replace("{a}", glyph(0))
        .replace("{b}", glyph(1))
        .replace("{c}", glyph(2))
        .replace("{x}", element.map_or("", Element::glyph));
    (text, effect)
}

// ---------------------------------------------------------------------------
// Pair classification
// ---------------------------------------------------------------------------

use RelationPolarity::{Negative, Neutral, Positive};
use RelationStrength::{Medium, Strong, Weak};

/// Classify two stems.
pub fn stem_relation(a: HeavenlyStem, b: HeavenlyStem) -> PairRelation {
    if let Some(e) = a.combines_with(b) {
        return PairRelation::new(RelationKind::StemCombination, Positive, Strong).with_element(e);
    }
    if a.clash() == Some(b) {
        return PairRelation::new(RelationKind::StemClash, Negative, Strong);
    }
    element_relation(a.element(), b.element(), Medium)
}

fn element_relation(a: Element, b: Element, strength: RelationStrength) -> PairRelation {
    match a.relation_to(b) {
        ElementRelation::Generates => {
            PairRelation::new(RelationKind::Generation, Positive, strength)
        }
        ElementRelation::GeneratedBy => {
            PairRelation::new(RelationKind::Generation, Positive, strength).reversed(true)
        }
        ElementRelation::Controls => {
            PairRelation::new(RelationKind::Domination, Negative, strength)
        }
        ElementRelation::ControlledBy => {
            PairRelation::new(RelationKind::Domination, Negative, strength).reversed(true)
        }
        ElementRelation::Same => PairRelation::new(RelationKind::SameElement, Neutral, Weak),
    }
}

fn unordered(a: EarthlyBranch, b: EarthlyBranch, pairs: &[(EarthlyBranch, EarthlyBranch)]) -> bool {
    pairs.iter().any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}

use EarthlyBranch::*;

/// 子卯, the pairs inside 寅巳申 and 丑戌未, and the 辰午酉亥 ring.
const PUNISHMENT_PAIRS: [(EarthlyBranch, EarthlyBranch); 11] = [
    (Zi, Mao),
    (Yin, Si),
    (Si, Shen),
    (Yin, Shen),
    (Chou, Xu),
    (Xu, Wei),
    (Chou, Wei),
    (Chen, Wu),
    (Wu, You),
    (You, Hai),
    (Hai, Chen),
];
/// A doubled 辰, 午, 酉 or 亥 punishes itself.
const SELF_PUNISHING: [EarthlyBranch; 4] = [Chen, Wu, You, Hai];
const HARM_PAIRS: [(EarthlyBranch, EarthlyBranch); 6] = [
    (Zi, Wei),
    (Chou, Wu),
    (Yin, Si),
    (Mao, Chen),
    (Shen, Hai),
    (You, Xu),
];
const BREAKAGE_PAIRS: [(EarthlyBranch, EarthlyBranch); 6] = [
    (Zi, You),
    (Wu, Mao),
    (Yin, Hai),
    (Shen, Si),
    (Chen, Chou),
    (Xu, Wei),
];
/// 戌卯 and 辰酉 resolve as six-combinations and 丑午 and 未子 as harms first,
/// so only four of the eight classical 绝 pairs can surface here.
const VOID_PAIRS: [(EarthlyBranch, EarthlyBranch); 4] =
    [(Zi, Si), (Mao, Shen), (Wu, Hai), (You, Yin)];

/// Classify two branches.
pub fn branch_relation(a: EarthlyBranch, b: EarthlyBranch) -> PairRelation {
    let combination = pair_combination(a, b);
    if let Some((CombinationKind::SixCombination, e)) = combination {
        return PairRelation::new(RelationKind::SixCombination, Positive, Strong).with_element(e);
    }
    if a.clash() == b {
        return PairRelation::new(RelationKind::Clash, Negative, Strong);
    }
    if let Some((kind, e)) = combination {
        let k = if kind == CombinationKind::HalfTriad {
            RelationKind::HalfTriad
        } else {
            RelationKind::HalfMeeting
        };
        return PairRelation::new(k, Positive, Medium).with_element(e);
    }
    if a == b && SELF_PUNISHING.contains(&a) {
        return PairRelation::new(RelationKind::SelfPunishment, Negative, Medium);
    }
    if unordered(a, b, &PUNISHMENT_PAIRS) {
        return PairRelation::new(RelationKind::Punishment, Negative, Medium);
    }
    if unordered(a, b, &HARM_PAIRS) {
        return PairRelation::new(RelationKind::Harm, Negative, Medium);
    }
    if unordered(a, b, &BREAKAGE_PAIRS) {
        return PairRelation::new(RelationKind::Breakage, Negative, Weak);
    }
    if unordered(a, b, &VOID_PAIRS) {
        return PairRelation::new(RelationKind::Void, Negative, Weak);
    }
    element_relation(a.element(), b.element(), Weak)
}

fn record(
    rel: PairRelation,
    first: (Symbol, ChartPosition),
    second: (Symbol, ChartPosition),
) -> RelationshipRecord {
    // keep actor first in the text for directional kinds
    let (x, y) = if rel.reversed { (second, first) } else { (first, second) };
    let members = vec![first.0, second.0];
    let (description, effect) = render(rel.kind, &[x.0, y.0], rel.element);
    RelationshipRecord {
        members,
        positions: vec![first.1, second.1],
        category: rel.category(),
        kind: rel.kind,
        sub_type: rel.kind.label(),
        element: rel.element,
        description,
        effect,
        polarity: rel.polarity,
        strength: rel.strength,
    }
}

// ---------------------------------------------------------------------------
// Hidden combinations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenCombinationKind {
    /// Pillar stem with a hidden stem of its own branch.
    SamePillar,
    /// Pillar stem with a hidden stem of another pillar's branch.
    CrossPillar,
    /// Hidden stems of two branches.
    BranchPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenCombination {
    pub kind: HiddenCombinationKind,
    /// Slot of the visible stem (or of the first branch for `BranchPair`).
    pub from: ChartPosition,
    /// Slot of the branch holding `hidden`.
    pub to: ChartPosition,
    pub stem: HeavenlyStem,
    pub hidden: HeavenlyStem,
    pub branch: EarthlyBranch,
    pub element: Element,
    pub description: String,
}

fn hidden_combinations(
    stems: &[HeavenlyStem],
    branches: &[EarthlyBranch],
) -> Vec<HiddenCombination> {
    let mut out = Vec::new();
    for (i, &stem) in stems.iter().enumerate() {
        for (j, &branch) in branches.iter().enumerate() {
            for hs in branch.hidden_stems() {
                if let Some(element) = stem.combines_with(hs.stem) {
                    let kind = if i == j {
                        HiddenCombinationKind::SamePillar
                    } else {
                        HiddenCombinationKind::CrossPillar
                    };
                    out.push(HiddenCombination {
                        kind,
                        from: ALL_CHART_POSITIONS[i],
                        to: ALL_CHART_POSITIONS[j],
                        stem,
                        hidden: hs.stem,
                        branch,
                        element,
                        description: format!("{stem}与{branch}中{}暗合化{}", hs.stem, element.glyph()),
                    });
                }
            }
        }
    }
    for (i, &b1) in branches.iter().enumerate() {
        for (j, &b2) in branches.iter().enumerate().skip(i + 1) {
            let found = b1.hidden_stems().iter().find_map(|h1| {
                b2.hidden_stems()
                    .iter()
                    .find_map(|h2| h1.stem.combines_with(h2.stem).map(|e| (h1.stem, h2.stem, e)))
            });
            if let Some((s1, s2, element)) = found {
                out.push(HiddenCombination {
                    kind: HiddenCombinationKind::BranchPair,
                    from: ALL_CHART_POSITIONS[i],
                    to: ALL_CHART_POSITIONS[j],
                    stem: s1,
                    hidden: s2,
                    branch: b2,
                    element,
                    description: format!("{b1}中{s1}与{b2}中{s2}暗合"),
                });
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Harmony {
    Excellent,
    Good,
    Average,
    Poor,
    Terrible,
}

impl Harmony {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 85 => Self::Excellent,
            s if s >= 70 => Self::Good,
            s if s >= 50 => Self::Average,
            s if s >= 30 => Self::Poor,
            _ => Self::Terrible,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Poor => "poor",
            Self::Terrible => "terrible",
        }
    }
}

/// `clamp(50 + 10·positive − 15·negative, 0, 100)`.
pub fn harmony_score(positive: usize, negative: usize) -> i32 {
    (50 + 10 * positive as i32 - 15 * negative as i32).clamp(0, 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipAnalysis {
    pub stem_relationships: Vec<RelationshipRecord>,
    pub branch_relationships: Vec<RelationshipRecord>,
    pub hidden_combinations: Vec<HiddenCombination>,
    pub stem_combinations: Vec<RelationshipRecord>,
    pub branch_combinations: Vec<RelationshipRecord>,
    pub branch_conflicts: Vec<RelationshipRecord>,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub strong_count: usize,
    pub harmony_score: i32,
    pub harmony: Harmony,
    pub summary: String,
}

/// Analyse the four pillars.
pub fn analyze_relationships(
    pillars: &FourPillars,
) -> Result<RelationshipAnalysis, RelationshipError> {
    analyze_symbols(&pillars.stems(), &pillars.branches())
}

/// Analyse parallel stem/branch slices in chart slot order (year, month,
/// day, hour, then decade and annual periods when present).
pub fn analyze_symbols(
    stems: &[HeavenlyStem],
    branches: &[EarthlyBranch],
) -> Result<RelationshipAnalysis, RelationshipError> {
    if stems.len() != branches.len() {
        return Err(RelationshipError::LengthMismatch {
            stems: stems.len(),
            branches: branches.len(),
        });
    }
    if stems.len() < 2 {
        return Err(RelationshipError::TooFewPillars { actual: stems.len() });
    }
    if stems.len() > ALL_CHART_POSITIONS.len() {
        return Err(RelationshipError::TooManyPillars {
            max: ALL_CHART_POSITIONS.len(),
            actual: stems.len(),
        });
    }

    let mut stem_relationships = Vec::new();
    for i in 0..stems.len() {
        for j in i + 1..stems.len() {
            let rec = record(
                stem_relation(stems[i], stems[j]),
                (Symbol::Stem(stems[i]), ALL_CHART_POSITIONS[i]),
                (Symbol::Stem(stems[j]), ALL_CHART_POSITIONS[j]),
            );
            if !rec.is_trivial() {
                stem_relationships.push(rec);
            }
        }
    }

    let mut branch_relationships = Vec::new();
    for i in 0..branches.len() {
        for j in i + 1..branches.len() {
            let rec = record(
                branch_relation(branches[i], branches[j]),
                (Symbol::Branch(branches[i]), ALL_CHART_POSITIONS[i]),
                (Symbol::Branch(branches[j]), ALL_CHART_POSITIONS[j]),
            );
            if !rec.is_trivial() {
                branch_relationships.push(rec);
            }
        }
    }
    collapse_full_frames(&mut branch_relationships, branches);

    let all = || stem_relationships.iter().chain(branch_relationships.iter());
    let positive_count = all().filter(|r| r.polarity == Positive).count();
    let negative_count = all().filter(|r| r.polarity == Negative).count();
    let neutral_count = all().count() - positive_count - negative_count;
    let strong_count = branch_relationships.iter().filter(|r| r.strength == Strong).count();
    let score = harmony_score(positive_count, negative_count);
    let harmony = Harmony::from_score(score);

    let stem_combinations = stem_relationships
        .iter()
        .filter(|r| r.category == RelationCategory::Combination)
        .cloned()
        .collect();
    let branch_combinations = branch_relationships
        .iter()
        .filter(|r| r.category == RelationCategory::Combination)
        .cloned()
        .collect();
    let branch_conflicts = branch_relationships
        .iter()
        .filter(|r| {
            matches!(
                r.category,
                RelationCategory::Opposition
                    | RelationCategory::Punishment
                    | RelationCategory::Harm
                    | RelationCategory::Breakage
                    | RelationCategory::Void
            )
        })
        .cloned()
        .collect();

    let summary = format!(
        "四柱关系分析：共发现{}组关系，其中正面关系{}个，负面关系{}个。整体关系{}，适合{}。",
        stem_relationships.len() + branch_relationships.len(),
        positive_count,
        negative_count,
        harmony.name(),
        if score >= 70 { "积极发展" } else { "稳健保守" }
    );

    Ok(RelationshipAnalysis {
        hidden_combinations: hidden_combinations(stems, branches),
        stem_relationships,
        branch_relationships,
        stem_combinations,
        branch_combinations,
        branch_conflicts,
        positive_count,
        negative_count,
        neutral_count,
        strong_count,
        harmony_score: score,
        harmony,
        summary,
    })
}

/// Replace the half-frame pair records of each complete triad or meeting
/// with one three-member record.
fn collapse_full_frames(records: &mut Vec<RelationshipRecord>, branches: &[EarthlyBranch]) {
    for frame in full_frames(branches) {
        let half = match frame.kind {
            CombinationKind::FullTriad => RelationKind::HalfTriad,
            _ => RelationKind::HalfMeeting,
        };
        let kind = match frame.kind {
            CombinationKind::FullTriad => RelationKind::FullTriad,
            _ => RelationKind::FullMeeting,
        };
        let insert_at = records
            .iter()
            .position(|r| r.kind == half && r.element == Some(frame.element));
        records.retain(|r| !(r.kind == half && r.element == Some(frame.element)));

        let positions: Vec<ChartPosition> = branches
            .iter()
            .zip(ALL_CHART_POSITIONS)
            .filter(|(b, _)| frame.contains(**b))
            .map(|(_, p)| p)
            .collect();
        let members: Vec<Symbol> = frame.members.iter().map(|&b| Symbol::Branch(b)).collect();
        let (description, effect) = render(kind, &members, Some(frame.element));
        let rec = RelationshipRecord {
            members,
            positions,
            category: RelationCategory::Combination,
            kind,
            sub_type: kind.label(),
            element: Some(frame.element),
            description,
            effect,
            polarity: Positive,
            strength: Strong,
        };
        match insert_at {
            Some(i) if i <= records.len() => records.insert(i, rec),
            _ => records.push(rec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::ALL_BRANCHES;
    use crate::stem::ALL_STEMS;
    use HeavenlyStem as S;

    #[test]
    fn stem_relation_symmetric() {
        for a in ALL_STEMS {
            for b in ALL_STEMS {
                assert_eq!(stem_relation(a, b).category(), stem_relation(b, a).category());
            }
        }
    }

    #[test]
    fn branch_relation_symmetric() {
        for a in ALL_BRANCHES {
            for b in ALL_BRANCHES {
                assert_eq!(
                    branch_relation(a, b).kind,
                    branch_relation(b, a).kind,
                    "{a}{b}"
                );
            }
        }
    }

    #[test]
    fn stem_priority() {
        assert_eq!(stem_relation(S::Jia, S::Ji).kind, RelationKind::StemCombination);
        assert_eq!(stem_relation(S::Jia, S::Ji).element, Some(Element::Earth));
        assert_eq!(stem_relation(S::Jia, S::Geng).kind, RelationKind::StemClash);
        assert_eq!(stem_relation(S::Jia, S::Bing).kind, RelationKind::Generation);
        assert_eq!(stem_relation(S::Jia, S::Wu).kind, RelationKind::Domination);
        assert_eq!(stem_relation(S::Jia, S::Yi).kind, RelationKind::SameElement);
        // 乙 and 戊: indices sum to 5 but they do not combine
        assert_eq!(stem_relation(S::Yi, S::Wu).kind, RelationKind::Domination);
    }

    #[test]
    fn branch_priority() {
        assert_eq!(branch_relation(Zi, Chou).kind, RelationKind::SixCombination);
        assert_eq!(branch_relation(Zi, Wu).kind, RelationKind::Clash);
        assert_eq!(branch_relation(Shen, Chen).kind, RelationKind::HalfTriad);
        assert_eq!(branch_relation(Yin, Mao).kind, RelationKind::HalfMeeting);
        assert_eq!(branch_relation(Zi, Mao).kind, RelationKind::Punishment);
        assert_eq!(branch_relation(Yin, Si).kind, RelationKind::Punishment);
        assert_eq!(branch_relation(Wu, Wu).kind, RelationKind::SelfPunishment);
        assert_eq!(branch_relation(Zi, Wei).kind, RelationKind::Harm);
        assert_eq!(branch_relation(Zi, You).kind, RelationKind::Breakage);
        assert_eq!(branch_relation(Zi, Si).kind, RelationKind::Void);
        assert_eq!(branch_relation(Chen, Wei).kind, RelationKind::SameElement);
        assert_eq!(branch_relation(Zi, Zi).kind, RelationKind::SameElement);
    }

    #[test]
    fn chen_wu_you_hai_ring_punishes() {
        for (a, b) in [(Chen, Wu), (Wu, You), (You, Hai), (Hai, Chen)] {
            assert_eq!(branch_relation(a, b).kind, RelationKind::Punishment, "{a}{b}");
            assert_eq!(branch_relation(b, a).kind, RelationKind::Punishment, "{b}{a}");
        }
        // 辰酉 combines before it can punish
        assert_eq!(branch_relation(Chen, You).kind, RelationKind::SixCombination);
        assert_eq!(branch_relation(Hai, Hai).kind, RelationKind::SelfPunishment);
    }

    #[test]
    fn shadowed_void_pairs_resolve_earlier() {
        assert_eq!(branch_relation(Xu, Mao).kind, RelationKind::SixCombination);
        assert_eq!(branch_relation(Chen, You).kind, RelationKind::SixCombination);
        assert_eq!(branch_relation(Chou, Wu).kind, RelationKind::Harm);
        assert_eq!(branch_relation(Wei, Zi).kind, RelationKind::Harm);
        for (a, b) in [(Zi, Si), (Mao, Shen), (Wu, Hai), (You, Yin)] {
            assert_eq!(branch_relation(a, b).kind, RelationKind::Void, "{a}{b}");
        }
    }

    #[test]
    fn generation_description_keeps_direction() {
        let r = analyze_symbols(&[S::Bing, S::Jia], &[Wu, Xu]).unwrap();
        let generation = &r.stem_relationships[0];
        assert_eq!(generation.kind, RelationKind::Generation);
        assert_eq!(generation.description, "甲(木)生丙(火)");
    }

    #[test]
    fn trivial_records_filtered() {
        let r = analyze_symbols(&[S::Jia, S::Yi], &[Chen, Wei]).unwrap();
        assert!(r.stem_relationships.is_empty());
        assert!(r.branch_relationships.is_empty());
        assert_eq!(r.harmony_score, 50);
    }

    #[test]
    fn scenario_full_meeting_collapses() {
        let r = analyze_symbols(&[S::Jia, S::Ding, S::Wu, S::Jia], &[Yin, Mao, Chen, Wu]).unwrap();
        let full: Vec<_> = r
            .branch_relationships
            .iter()
            .filter(|x| x.kind == RelationKind::FullMeeting)
            .collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].members.len(), 3);
        assert!(r.branch_relationships.iter().all(|x| x.kind != RelationKind::HalfMeeting));
    }

    #[test]
    fn harmony_bands() {
        assert_eq!(harmony_score(10, 0), 100);
        assert_eq!(harmony_score(0, 4), 0);
        assert_eq!(Harmony::from_score(85), Harmony::Excellent);
        assert_eq!(Harmony::from_score(50), Harmony::Average);
        assert_eq!(Harmony::from_score(29), Harmony::Terrible);
    }

    #[test]
    fn input_errors() {
        assert_eq!(
            analyze_symbols(&[S::Jia], &[Zi]),
            Err(RelationshipError::TooFewPillars { actual: 1 })
        );
        assert!(matches!(
            analyze_symbols(&[S::Jia, S::Yi], &[Zi]),
            Err(RelationshipError::LengthMismatch { .. })
        ));
        let seven = [S::Jia; 7];
        let seven_b = [Zi; 7];
        assert!(matches!(
            analyze_symbols(&seven, &seven_b),
            Err(RelationshipError::TooManyPillars { .. })
        ));
    }

    #[test]
    fn hidden_combinations_found() {
        // 丁 over 亥 combines with the hidden 壬
        let r = analyze_symbols(&[S::Ding, S::Jia], &[Hai, Xu]).unwrap();
        assert!(r
            .hidden_combinations
            .iter()
            .any(|h| h.kind == HiddenCombinationKind::SamePillar && h.hidden == S::Ren));
        // 亥 holds 壬, 戌 holds 丁
        assert!(r
            .hidden_combinations
            .iter()
            .any(|h| h.kind == HiddenCombinationKind::BranchPair));
    }
}
