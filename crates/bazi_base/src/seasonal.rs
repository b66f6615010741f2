//! Seasonal (月令) weighted element scoring.
//!
//! Every stem and hidden stem contributes a base score. Generation and
//! control between present elements, full frames and six-combinations,
//! branch conflicts and rooted stems (透干) adjust it. The month branch's
//! element then scales each element by its seasonal phase, unless the element
//! has formed momentum (成势). Raw totals give shares and the ranking; a
//! min-max normalisation gives the 1..=95 display score.
//!
//! This runs alongside the count-based verdict in [`crate::element_analysis`].

use serde::Serialize;

use crate::branch::{ALL_BRANCHES, EarthlyBranch, HiddenStemKind};
use crate::combination::{CombinationKind, full_frames};
use crate::element::{ALL_ELEMENTS, Element};
use crate::element_analysis::DayMasterStrength;
use crate::pillar::{ALL_CHART_POSITIONS, ChartPosition, FourPillars};
use crate::stem::HeavenlyStem;

use EarthlyBranch::*;

/// Day-master share above which the day master is strong.
pub const STRONG_SHARE: f64 = 30.0;
/// Day-master share below which the day master is weak.
pub const WEAK_SHARE: f64 = 15.0;

const MEETING_BONUS: f64 = 4.0;
const TRIAD_BONUS: f64 = 3.0;
const SIX_COMBINATION_BONUS: f64 = 2.0;
const CLASH_PENALTY: f64 = -3.0;
const PUNISHMENT_PENALTY: f64 = -2.0;
const BREAKAGE_PENALTY: f64 = -0.5;

const PUNISHMENT_GROUPS: [[EarthlyBranch; 3]; 2] = [[Yin, Si, Shen], [Chou, Wei, Xu]];
const BREAKAGE_PAIRS: [(EarthlyBranch, EarthlyBranch); 6] =
    [(Zi, You), (Mao, Wu), (Chen, Chou), (Wei, Xu), (Yin, Hai), (Si, Shen)];

/// Harm (穿) pairs and the elements each one damages, with their penalties.
const HARM_DAMAGE: [(EarthlyBranch, EarthlyBranch, &[(Element, f64)]); 6] = {
    use Element::*;
    [
        (Zi, Wei, &[(Fire, -2.0), (Earth, -2.0), (Water, -1.0)]),
        (Chou, Wu, &[(Water, -2.0), (Metal, -2.0), (Fire, -1.5)]),
        (Mao, Chen, &[(Water, -2.0), (Wood, -2.0)]),
        (You, Xu, &[(Metal, -2.5), (Fire, -2.0)]),
        (Shen, Hai, &[(Wood, -2.0), (Metal, -1.5)]),
        (Yin, Si, &[(Wood, -2.0), (Earth, -1.5), (Fire, -1.0)]),
    ]
};

/// Phase strength of `element` in a month whose branch element is `season`.
pub fn seasonal_factor(season: Element, element: Element) -> f64 {
    let row = match season {
        Element::Wood => [1.0, 0.7, 0.3, 0.2, 0.5],
        Element::Fire => [0.5, 1.0, 0.7, 0.3, 0.2],
        Element::Earth => [0.3, 0.5, 1.0, 0.7, 0.3],
        Element::Metal => [0.2, 0.3, 0.5, 1.0, 0.7],
        Element::Water => [0.3, 0.2, 0.3, 0.5, 1.0],
    };
    row[element.index() as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalPhase {
    /// 当令
    Prosperous,
    /// 相生
    Supported,
    /// 休囚
    Resting,
    /// 死绝
    Dead,
}

impl SeasonalPhase {
    pub fn from_factor(factor: f64) -> Self {
        if factor >= 1.0 {
            Self::Prosperous
        } else if factor >= 0.7 {
            Self::Supported
        } else if factor >= 0.3 {
            Self::Resting
        } else {
            Self::Dead
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Prosperous => "当令",
            Self::Supported => "相生",
            Self::Resting => "休囚",
            Self::Dead => "死绝",
        }
    }

    /// Fraction of the pre-seasonal subtotal added (or removed).
    pub const fn adjustment(self) -> f64 {
        match self {
            Self::Prosperous => 0.5,
            Self::Supported => 0.25,
            Self::Resting => -0.25,
            Self::Dead => -0.5,
        }
    }
}

/// Score breakdown for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementScore {
    pub element: Element,
    pub phase: SeasonalPhase,
    /// Symbol share plus weighted hidden stems.
    pub basic: f64,
    /// Generation received minus control received.
    pub interaction: f64,
    pub combination: f64,
    pub conflict: f64,
    pub transparency: f64,
    /// Zero when the element has formed momentum.
    pub seasonal: f64,
    /// Sum of the parts after the rootless and seated-control cuts.
    pub total: f64,
    /// Display score in 1..=95, 0 for an element absent from the chart.
    pub score: f64,
    /// Share of the positive totals, 0..=100.
    pub percentage: f64,
    /// 成势: two main-qi roots and a stem, three or more in all.
    pub momentum: bool,
}

impl ElementScore {
    fn subtotal(&self) -> f64 {
        self.basic + self.interaction + self.combination + self.conflict + self.transparency
    }
}

/// A stem rooted in some branch's hidden stems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transparency {
    pub stem: HeavenlyStem,
    pub position: ChartPosition,
    /// Strongest same-element hidden stem found in any branch.
    pub root: HiddenStemKind,
    pub bonus: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementRank {
    pub element: Element,
    pub total: f64,
    /// 1 for the strongest.
    pub rank: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl BalanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Self::Excellent
        } else if score > 60.0 {
            Self::Good
        } else if score > 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Excellent => "优秀",
            Self::Good => "良好",
            Self::Fair => "一般",
            Self::Poor => "失衡",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Excellent => "五行分布均衡，命局稳定",
            Self::Good => "五行分布较为平衡",
            Self::Fair => "五行分布一般，存在偏颇",
            Self::Poor => "五行分布失衡，偏枯明显",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalBalance {
    /// `100 − 2 × σ` of the shares, floored at 0.
    pub score: f64,
    pub level: BalanceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalStrength {
    /// Element of the month branch.
    pub season: Element,
    /// Wood..Water order.
    pub elements: [ElementScore; 5],
    pub transparencies: Vec<Transparency>,
    /// Highest raw total first; ties keep Wood..Water order.
    pub ranking: [ElementRank; 5],
    pub day_master_element: Element,
    pub day_master_percentage: f64,
    pub day_master_strength: DayMasterStrength,
    pub balance: SeasonalBalance,
    pub supporting_factors: Vec<&'static str>,
    pub weakening_factors: Vec<&'static str>,
    pub recommendation: String,
}

impl SeasonalStrength {
    pub fn get(&self, element: Element) -> &ElementScore {
        &self.elements[element.index() as usize]
    }

    pub fn strongest(&self) -> Element {
        self.ranking[0].element
    }

    pub fn weakest(&self) -> Element {
        self.ranking[4].element
    }

    /// Round every fractional figure to `decimals` places.
    pub fn round_to(&mut self, decimals: u32) {
        let factor = 10f64.powi(decimals as i32);
        let round = |v: f64| (v * factor).round() / factor;
        for s in &mut self.elements {
            s.basic = round(s.basic);
            s.interaction = round(s.interaction);
            s.combination = round(s.combination);
            s.conflict = round(s.conflict);
            s.transparency = round(s.transparency);
            s.seasonal = round(s.seasonal);
            s.total = round(s.total);
            s.score = round(s.score);
            s.percentage = round(s.percentage);
        }
        for r in &mut self.ranking {
            r.total = round(r.total);
        }
        for t in &mut self.transparencies {
            t.bonus = round(t.bonus);
        }
        self.day_master_percentage = round(self.day_master_percentage);
        self.balance.score = round(self.balance.score);
    }
}

/// Hidden-stem weight; earth residual qi outweighs earth middle qi.
fn hidden_weight(element: Element, kind: HiddenStemKind) -> f64 {
    match (element, kind) {
        (Element::Earth, HiddenStemKind::Secondary) => HiddenStemKind::Tertiary.weight(),
        (Element::Earth, HiddenStemKind::Tertiary) => HiddenStemKind::Secondary.weight(),
        _ => kind.weight(),
    }
}

fn transparency_bonus(element: Element, root: HiddenStemKind) -> f64 {
    match (root, element) {
        (HiddenStemKind::Primary, _) => 2.0,
        (HiddenStemKind::Secondary, Element::Earth) => 1.5,
        (HiddenStemKind::Tertiary, Element::Earth) => 0.5,
        _ => 1.0,
    }
}

/// Map a raw total onto 15..=85 by min-max, pulled 20% toward 50.
fn normalize(total: f64, min: f64, max: f64) -> f64 {
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let spread = (total - min) / range * 70.0 + 15.0;
    (spread * 0.8 + 50.0 * 0.2).round()
}

/// Apply `amount(element)` to the element of every hidden stem in `branch`.
fn spread_over(
    parts: &mut [ElementScore; 5],
    branch: EarthlyBranch,
    amount: impl Fn(Element) -> f64,
) {
    for h in branch.hidden_stems() {
        let e = h.stem.element();
        parts[e.index() as usize].conflict += amount(e);
    }
}

fn apply_conflicts(
    parts: &mut [ElementScore; 5],
    branches: &[EarthlyBranch; 4],
    season: Element,
) {
    let has = |b: EarthlyBranch| branches.contains(&b);
    let punished = |share: f64| {
        move |e: Element| PUNISHMENT_PENALTY * (1.0 - seasonal_factor(season, e) * 0.2) / share
    };

    for b in ALL_BRANCHES.into_iter().take(6) {
        if has(b) && has(b.clash()) {
            for side in [b, b.clash()] {
                spread_over(parts, side, |e| {
                    CLASH_PENALTY * (1.0 - seasonal_factor(season, e) * 0.3) / 2.0
                });
            }
        }
    }

    for group in PUNISHMENT_GROUPS {
        let members: Vec<EarthlyBranch> = group.into_iter().filter(|&b| has(b)).collect();
        if members.len() >= 2 {
            let share = members.len() as f64;
            for &b in &members {
                spread_over(parts, b, punished(share));
            }
        }
    }
    if has(Zi) && has(Mao) {
        for b in [Zi, Mao] {
            spread_over(parts, b, punished(2.0));
        }
    }

    for (a, b) in BREAKAGE_PAIRS {
        if has(a) && has(b) {
            spread_over(parts, a, |_| BREAKAGE_PENALTY);
            spread_over(parts, b, |_| BREAKAGE_PENALTY);
        }
    }

    for (a, b, damage) in HARM_DAMAGE {
        if has(a) && has(b) {
            for &(e, penalty) in damage {
                parts[e.index() as usize].conflict += penalty;
            }
        }
    }
}

/// Score the five elements of a chart with seasonal weighting.
pub fn analyze_seasonal_strength(pillars: &FourPillars) -> SeasonalStrength {
    let stems = pillars.stems();
    let branches = pillars.branches();
    let season = branches[1].element();
    let idx = |e: Element| e.index() as usize;

    let mut parts = ALL_ELEMENTS.map(|element| ElementScore {
        element,
        phase: SeasonalPhase::from_factor(seasonal_factor(season, element)),
        basic: 0.0,
        interaction: 0.0,
        combination: 0.0,
        conflict: 0.0,
        transparency: 0.0,
        seasonal: 0.0,
        total: 0.0,
        score: 0.0,
        percentage: 0.0,
        momentum: false,
    });

    let mut stem_count = [0u32; 5];
    let mut hidden_count = [0u32; 5];
    let mut main_qi = [0u32; 5];
    let mut hidden_weights = [0.0; 5];
    for s in stems {
        stem_count[idx(s.element())] += 1;
    }
    for b in branches {
        for h in b.hidden_stems() {
            let e = h.stem.element();
            hidden_count[idx(e)] += 1;
            hidden_weights[idx(e)] += hidden_weight(e, h.kind);
            if h.kind == HiddenStemKind::Primary {
                main_qi[idx(e)] += 1;
            }
        }
    }
    let count = |e: Element| stem_count[idx(e)] + hidden_count[idx(e)];
    let symbols: u32 = ALL_ELEMENTS.iter().map(|&e| count(e)).sum();

    for p in &mut parts {
        let share = 20.0 * f64::from(count(p.element)) / f64::from(symbols);
        p.basic = share.max(3.0) + hidden_weights[idx(p.element)] * 3.0;
        if p.element == Element::Earth && branches[1] == Wei {
            p.basic *= 0.8;
        }
    }

    for from in ALL_ELEMENTS.into_iter().filter(|&e| count(e) > 0) {
        let factor = seasonal_factor(season, from);
        if count(from.generates()) > 0 {
            parts[idx(from.generates())].interaction += 2.0 * factor;
        }
        if count(from.controls()) > 0 {
            parts[idx(from.controls())].interaction -= 1.5 * factor;
        }
    }

    for frame in full_frames(&branches) {
        let bonus = match frame.kind {
            CombinationKind::FullMeeting => MEETING_BONUS,
            _ => TRIAD_BONUS,
        };
        parts[idx(frame.element)].combination += bonus * seasonal_factor(season, frame.element);
    }
    for b in ALL_BRANCHES {
        let (partner, element) = b.six_combination();
        if b.index() < partner.index() && branches.contains(&b) && branches.contains(&partner) {
            parts[idx(element)].combination +=
                SIX_COMBINATION_BONUS * seasonal_factor(season, element);
        }
    }

    apply_conflicts(&mut parts, &branches, season);

    let mut transparencies = Vec::new();
    for (&stem, &position) in stems.iter().zip(&ALL_CHART_POSITIONS) {
        let element = stem.element();
        let root = branches
            .iter()
            .flat_map(|b| b.hidden_stems())
            .filter(|h| h.stem.element() == element)
            .map(|h| h.kind)
            .max_by(|a, b| a.weight().total_cmp(&b.weight()));
        if let Some(root) = root {
            let bonus = transparency_bonus(element, root);
            parts[idx(element)].transparency += bonus;
            transparencies.push(Transparency {
                stem,
                position,
                root,
                bonus,
            });
        }
    }

    for p in &mut parts {
        let i = idx(p.element);
        p.momentum = main_qi[i] >= 2 && stem_count[i] > 0 && main_qi[i] + stem_count[i] >= 3;
        if !p.momentum {
            p.seasonal = p.subtotal() * p.phase.adjustment();
        }
        p.total = p.subtotal() + p.seasonal;

        if count(p.element) == 0 {
            p.total = 0.0;
            continue;
        }
        if stem_count[i] > 0 && hidden_count[i] == 0 {
            p.total *= 0.5;
        }
        for (stem, branch) in stems.iter().zip(&branches) {
            let seat = branch.primary_hidden_stem().element();
            if stem.element() == p.element && seat.controls() == p.element {
                p.total *= 0.5;
            }
        }
    }

    let totals = parts.map(|p| p.total);
    let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let positive: f64 = totals.iter().map(|t| t.max(0.0)).sum();
    for p in &mut parts {
        p.score = if count(p.element) == 0 {
            0.0
        } else if p.basic <= 5.0 && p.total <= 3.0 && p.seasonal < -1.0 {
            (3.0 + p.total * 0.1).clamp(1.0, 8.0)
        } else {
            normalize(p.total, min, max).clamp(1.0, 95.0)
        };
        p.percentage = if positive == 0.0 {
            20.0
        } else {
            p.total.max(0.0) / positive * 100.0
        };
    }

    let mut order = ALL_ELEMENTS;
    order.sort_by(|a, b| totals[idx(*b)].total_cmp(&totals[idx(*a)]));
    let mut ranking = order.map(|element| ElementRank {
        element,
        total: totals[idx(element)],
        rank: 0,
    });
    for (r, rank) in ranking.iter_mut().zip(1..) {
        r.rank = rank;
    }

    let mean = parts.iter().map(|p| p.percentage).sum::<f64>() / 5.0;
    let variance = parts.iter().map(|p| (p.percentage - mean).powi(2)).sum::<f64>() / 5.0;
    let balance_score = (100.0 - variance.sqrt() * 2.0).max(0.0);

    let dm = pillars.day_master().element();
    let own = parts[idx(dm)];
    let day_master_strength = if own.percentage > STRONG_SHARE {
        DayMasterStrength::Strong
    } else if own.percentage < WEAK_SHARE {
        DayMasterStrength::Weak
    } else {
        DayMasterStrength::Medium
    };

    let mut supporting_factors = Vec::new();
    let mut weakening_factors = Vec::new();
    for (holds, label) in [
        (own.basic > 10.0, "本气充足"),
        (own.interaction > 0.0, "得生助力"),
        (own.combination > 0.0, "合局增力"),
        (own.transparency > 0.0, "透干有根"),
        (own.seasonal > 0.0, "当令得时"),
    ] {
        if holds {
            supporting_factors.push(label);
        }
    }
    for (holds, label) in [
        (own.interaction < 0.0, "受克制"),
        (own.conflict < 0.0, "遭刑冲"),
        (own.seasonal < 0.0, "失时休囚"),
    ] {
        if holds {
            weakening_factors.push(label);
        }
    }

    let recommendation = match day_master_strength {
        DayMasterStrength::Strong => {
            format!("{}日主偏强，宜用克泄耗的五行来平衡，避免再生扶。", dm.glyph())
        }
        DayMasterStrength::Weak => {
            format!("{}日主偏弱，宜用生扶的五行来增强，避免克泄耗。", dm.glyph())
        }
        DayMasterStrength::Medium => {
            format!("{}日主中和，宜保持现有平衡，根据具体情况微调。", dm.glyph())
        }
    };

    SeasonalStrength {
        season,
        elements: parts,
        transparencies,
        ranking,
        day_master_element: dm,
        day_master_percentage: own.percentage,
        day_master_strength,
        balance: SeasonalBalance {
            score: balance_score,
            level: BalanceLevel::from_score(balance_score),
        },
        supporting_factors,
        weakening_factors,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pillar::{Gender, PillarOptions, build_four_pillars};
    use crate::sexagenary::GanZhi;

    fn chart(p: [&str; 4]) -> FourPillars {
        build_four_pillars(
            p.map(|s| GanZhi::parse(s).unwrap()),
            Gender::Male,
            PillarOptions::default(),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn phases_follow_the_month() {
        let phase = |e| SeasonalPhase::from_factor(seasonal_factor(Element::Fire, e));
        assert_eq!(phase(Element::Fire), SeasonalPhase::Prosperous);
        assert_eq!(phase(Element::Earth), SeasonalPhase::Supported);
        assert_eq!(phase(Element::Metal), SeasonalPhase::Resting);
        assert_eq!(phase(Element::Wood), SeasonalPhase::Resting);
        assert_eq!(phase(Element::Water), SeasonalPhase::Dead);
        assert_eq!(seasonal_factor(Element::Earth, Element::Metal), 0.7);
        assert_eq!(SeasonalPhase::Dead.adjustment(), -0.5);
    }

    #[test]
    fn earth_residual_qi_outweighs_middle_qi() {
        assert_eq!(hidden_weight(Element::Earth, HiddenStemKind::Secondary), 0.3);
        assert_eq!(hidden_weight(Element::Earth, HiddenStemKind::Tertiary), 0.5);
        assert_eq!(hidden_weight(Element::Fire, HiddenStemKind::Secondary), 0.5);
        assert_eq!(transparency_bonus(Element::Earth, HiddenStemKind::Secondary), 1.5);
        assert_eq!(transparency_bonus(Element::Earth, HiddenStemKind::Tertiary), 0.5);
        assert_eq!(transparency_bonus(Element::Water, HiddenStemKind::Tertiary), 1.0);
    }

    /// 庚午 壬午 辛亥 乙未: a 辛 day master born in a 午 month.
    #[test]
    fn summer_metal_day_master_is_weak() {
        let s = analyze_seasonal_strength(&chart(["庚午", "壬午", "辛亥", "乙未"]));
        assert_eq!(s.season, Element::Fire);
        assert_eq!(s.get(Element::Fire).phase, SeasonalPhase::Prosperous);
        // 午未 six-combination forms fire at full seasonal strength
        assert_eq!(s.get(Element::Fire).combination, 2.0);

        let order = s.ranking.map(|r| r.element);
        use Element::*;
        assert_eq!(order, [Fire, Earth, Wood, Water, Metal]);
        assert_eq!(s.ranking.map(|r| r.rank), [1, 2, 3, 4, 5]);
        assert_eq!((s.strongest(), s.weakest()), (Fire, Metal));
        assert_eq!(s.elements.map(|e| e.score), [37.0, 78.0, 60.0, 22.0, 31.0]);

        // 庚 and 辛 have no metal root; 庚 also sits on 午 fire
        let metal = s.get(Metal);
        assert!(close(metal.total, 0.558_173));
        assert!(close(metal.seasonal, -0.744_231));

        assert_eq!(s.day_master_element, Metal);
        assert!(close(s.day_master_percentage, 1.200_360));
        assert_eq!(s.day_master_strength, DayMasterStrength::Weak);
        assert!(s.supporting_factors.is_empty());
        assert_eq!(s.weakening_factors, vec!["受克制", "失时休囚"]);
        assert_eq!(s.recommendation, "金日主偏弱，宜用生扶的五行来增强，避免克泄耗。");

        let total: f64 = s.elements.iter().map(|e| e.percentage).sum();
        assert!(close(total, 100.0));
        assert!(close(s.balance.score, 67.090_054));
        assert_eq!(s.balance.level, BalanceLevel::Good);
    }

    #[test]
    fn transparency_takes_the_strongest_root() {
        let s = analyze_seasonal_strength(&chart(["庚午", "壬午", "辛亥", "乙未"]));
        let found: Vec<_> = s
            .transparencies
            .iter()
            .map(|t| (t.stem, t.position, t.root, t.bonus))
            .collect();
        assert_eq!(
            found,
            vec![
                (HeavenlyStem::Ren, ChartPosition::Month, HiddenStemKind::Primary, 2.0),
                // 未 holds 乙 as middle qi, 亥 holds 甲 as residual qi
                (HeavenlyStem::Yi, ChartPosition::Hour, HiddenStemKind::Secondary, 1.0),
            ]
        );
        assert_eq!(s.get(Element::Water).transparency, 2.0);
    }

    /// 甲寅 丙寅 甲子 乙卯: wood holds three main-qi roots and three stems.
    #[test]
    fn momentum_ignores_the_season_and_absent_elements_score_zero() {
        let s = analyze_seasonal_strength(&chart(["甲寅", "丙寅", "甲子", "乙卯"]));
        let wood = s.get(Element::Wood);
        assert!(wood.momentum);
        assert_eq!(wood.seasonal, 0.0);
        assert!(close(wood.total, 25.2));
        // 子卯 punishment
        assert!(close(wood.conflict, -0.8));
        assert!(close(s.get(Element::Water).conflict, -0.9));

        let metal = s.get(Element::Metal);
        assert!(!metal.momentum);
        assert_eq!((metal.total, metal.score, metal.percentage), (0.0, 0.0, 0.0));
        assert_eq!(s.weakest(), Element::Metal);

        assert_eq!(s.day_master_strength, DayMasterStrength::Strong);
        assert!(close(s.day_master_percentage, 54.574_986));
        assert_eq!(s.supporting_factors, vec!["本气充足", "得生助力", "透干有根"]);
        assert_eq!(s.weakening_factors, vec!["遭刑冲"]);
        assert_eq!(s.balance.level, BalanceLevel::Good);
    }

    #[test]
    fn rounding_applies_to_every_figure() {
        let mut s = analyze_seasonal_strength(&chart(["庚午", "壬午", "辛亥", "乙未"]));
        s.round_to(1);
        assert_eq!(s.day_master_percentage, 1.2);
        assert_eq!(s.get(Element::Metal).total, 0.6);
        assert_eq!(s.balance.score, 67.1);
    }
}
