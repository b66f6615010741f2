//! Pattern (格局) classification.
//!
//! Ten-god strengths from every classified stem and hidden stem are summed
//! into a ranking. The strongest ten god, when it clears the configured
//! threshold, is resolved through [`rules::rule_set`] against the set of
//! other ten gods that reach 60% of the threshold. A second-ranked ten god
//! above the threshold is resolved the same way.
//!
//! Independently of the ranking, four stems of one polarity make a 纯阳格 or
//! 纯阴格 special pattern.

pub mod rules;
pub mod types;

pub use rules::{PatternRule, PatternRuleSet, PatternVariant, rule_set};
pub use types::{
    DEFAULT_MINIMUM_STRENGTH, GroupStrength, POLARITY_PATTERN_STRENGTH, PatternAnalysis,
    PatternConfig, PatternDetail, PatternUsage, SUPPORTING_RATIO, SpecialPattern, TenGodStrength,
};

use crate::branch::EarthlyBranch;
use crate::combination::detect_branch_combinations;
use crate::element::{Element, Polarity};
use crate::pillar::FourPillars;
use crate::stem::HeavenlyStem;
use crate::ten_god::{ALL_GROUPS, ALL_TEN_GODS, TenGod, TenGodAnalysis, TenGodGroup};

/// Strength per ten god, indexed by [`TenGod::index`].
pub type StrengthTable = [f64; 10];

/// Sum entry strengths per ten god.
pub fn aggregate_strengths(analysis: &TenGodAnalysis) -> StrengthTable {
    let mut table = [0.0; 10];
    for e in &analysis.entries {
        table[e.ten_god.index() as usize] += e.strength;
    }
    table
}

/// Ranking, strongest first. Ties keep classical order.
pub fn rank_strengths(strengths: &StrengthTable) -> Vec<TenGodStrength> {
    let total = positive_total(strengths.iter().copied());
    let mut ranking: Vec<TenGodStrength> = ALL_TEN_GODS
        .iter()
        .map(|&tg| {
            let strength = strengths[tg.index() as usize];
            TenGodStrength {
                ten_god: tg,
                strength,
                percentage: share(strength, total),
            }
        })
        .collect();
    ranking.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    ranking
}

/// Pair totals, largest share first.
pub fn group_strengths(strengths: &StrengthTable) -> Vec<GroupStrength> {
    let sums = ALL_GROUPS.map(|g| {
        g.members()
            .iter()
            .map(|tg| strengths[tg.index() as usize])
            .sum::<f64>()
    });
    let total = positive_total(sums.iter().copied());
    let mut groups: Vec<GroupStrength> = ALL_GROUPS
        .iter()
        .zip(sums)
        .map(|(&group, strength)| GroupStrength {
            group,
            label: group.name(),
            strength,
            percentage: share(strength, total),
        })
        .collect();
    groups.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    groups
}

fn positive_total(values: impl Iterator<Item = f64>) -> f64 {
    let total: f64 = values.sum();
    if total == 0.0 { 1.0 } else { total }
}

fn share(strength: f64, total: f64) -> f64 {
    if strength > 0.0 { strength / total * 100.0 } else { 0.0 }
}

/// Favorable, unfavorable or neutral use of `ten_god` given the whole table.
///
/// The self is strong when companions plus resources reach outputs plus
/// wealth plus 60% of officers.
pub fn pattern_usage(ten_god: TenGod, strengths: &StrengthTable) -> PatternUsage {
    let group = |g: TenGodGroup| -> f64 {
        g.members()
            .iter()
            .map(|tg| strengths[tg.index() as usize])
            .sum()
    };
    let body = group(TenGodGroup::Companion) + group(TenGodGroup::Resource);
    let drain = group(TenGodGroup::Output) + group(TenGodGroup::Wealth);
    let official = group(TenGodGroup::Power);
    let body_strong = body >= drain + official * SUPPORTING_RATIO;

    match ten_god.group() {
        TenGodGroup::Companion | TenGodGroup::Resource => {
            if body_strong {
                PatternUsage::Favorable
            } else {
                PatternUsage::Neutral
            }
        }
        _ => {
            if body_strong {
                PatternUsage::Unfavorable
            } else {
                PatternUsage::Favorable
            }
        }
    }
}

/// Element a ten-god group stands for, seen from the day-master element.
pub const fn group_element(group: TenGodGroup, day_master: Element) -> Element {
    match group {
        TenGodGroup::Companion => day_master,
        TenGodGroup::Output => day_master.generates(),
        TenGodGroup::Wealth => day_master.controls(),
        TenGodGroup::Power => day_master.controlled_by(),
        TenGodGroup::Resource => day_master.generated_by(),
    }
}

/// 纯阳格 or 纯阴格 when every stem shares one polarity.
pub fn polarity_pattern(stems: &[HeavenlyStem]) -> Option<SpecialPattern> {
    let first = stems.first()?.polarity();
    if !stems.iter().all(|s| s.polarity() == first) {
        return None;
    }
    let (name, description) = match first {
        Polarity::Yang => ("纯阳格", "四柱天干全阳，性格阳刚，但需要阴柔调和。"),
        Polarity::Yin => ("纯阴格", "四柱天干全阴，性格阴柔，但需要阳刚补充。"),
    };
    Some(SpecialPattern {
        name,
        polarity: first,
        usage: PatternUsage::Neutral,
        description,
        strength: POLARITY_PATTERN_STRENGTH,
    })
}

fn detail(
    entry: &TenGodStrength,
    supporting: &[TenGod],
    strengths: &StrengthTable,
) -> PatternDetail {
    let rule = rule_set(entry.ten_god).resolve(supporting);
    PatternDetail {
        name: rule.name,
        ten_god: entry.ten_god,
        supporting: supporting.to_vec(),
        usage: pattern_usage(entry.ten_god, strengths),
        description: rule.description,
        confidence: entry.percentage.min(100.0),
    }
}

/// Classify a strength table.
///
/// `branches` feed the combination side notes when enabled.
pub fn classify_strengths(
    strengths: &StrengthTable,
    day_master: Element,
    branches: &[EarthlyBranch],
    config: &PatternConfig,
) -> PatternAnalysis {
    let ranking = rank_strengths(strengths);
    let groups = group_strengths(strengths);
    let combinations = if config.include_combinations {
        detect_branch_combinations(branches)
    } else {
        Vec::new()
    };
    let threshold = config.minimum_strength_threshold;
    let mut notes = Vec::new();

    let Some(top) = ranking.first().filter(|e| e.strength >= threshold).copied() else {
        notes.push("十神强度分布过于平均，未能识别主导格局".to_string());
        return PatternAnalysis {
            primary: None,
            secondary: None,
            special: None,
            ranking,
            groups,
            combinations,
            notes,
        };
    };

    let supporting: Vec<TenGod> = ranking[1..]
        .iter()
        .filter(|e| e.strength >= threshold * SUPPORTING_RATIO)
        .map(|e| e.ten_god)
        .collect();

    let primary = detail(&top, &supporting, strengths);
    let secondary = ranking
        .get(1)
        .filter(|e| e.strength >= threshold)
        .map(|e| detail(e, &supporting, strengths));

    let element = group_element(top.ten_god.group(), day_master);
    notes.push(format!("主导格局五行侧重{}，请关注相关情境", element.glyph()));
    if !combinations.is_empty() {
        notes.push(format!("检测到{}项地支组合，对格局有额外影响", combinations.len()));
    }

    PatternAnalysis {
        primary: Some(primary),
        secondary,
        special: None,
        ranking,
        groups,
        combinations,
        notes,
    }
}

/// Classify a chart from its ten-god analysis.
///
/// Without an analysis there is nothing to rank; the result carries only a
/// note and any stem-polarity pattern.
pub fn classify_pattern(
    pillars: &FourPillars,
    ten_gods: Option<&TenGodAnalysis>,
    config: &PatternConfig,
) -> PatternAnalysis {
    let mut analysis = match ten_gods {
        Some(analysis) => classify_strengths(
            &aggregate_strengths(analysis),
            pillars.day_master().element(),
            &pillars.branches(),
            config,
        ),
        None => PatternAnalysis {
            primary: None,
            secondary: None,
            special: None,
            ranking: Vec::new(),
            groups: Vec::new(),
            combinations: Vec::new(),
            notes: vec!["十神分析数据缺失，无法生成格局分析".to_string()],
        },
    };
    analysis.special = polarity_pattern(&pillars.stems());
    if let Some(special) = &analysis.special {
        analysis.notes.push(format!("四柱特殊组合：{}", special.name));
    }
    analysis
}
