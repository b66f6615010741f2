//! KuiGang (魁罡): the rare pillars 庚辰, 庚戌, 壬辰 and 戊戌.
//!
//! Each KuiGang pillar gets a quality pass. Each factor found is recorded as
//! a short sentence so the verdict stays explainable.

use serde::Serialize;

use crate::branch::EarthlyBranch;
use crate::element::Element;
use crate::pillar::{Gender, PillarPosition};
use crate::sexagenary::GanZhi;
use crate::stem::HeavenlyStem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KuiGangSubType {
    /// 绝夫罡 (庚辰, 庚戌)
    HusbandSevering,
    /// 绝妻罡 (壬辰, 戊戌)
    WifeSevering,
}

impl KuiGangSubType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::HusbandSevering => "绝夫罡",
            Self::WifeSevering => "绝妻罡",
        }
    }
}

/// Primary on the day pillar, secondary elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KuiGangStrength {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KuiGangAnalysis {
    pub has_breakage: bool,
    pub has_clash: bool,
    pub support_count: usize,
    pub breakage_factors: Vec<String>,
    pub support_factors: Vec<String>,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KuiGangInfo {
    pub ganzhi: GanZhi,
    pub sub_type: KuiGangSubType,
    pub position: PillarPosition,
    pub strength: KuiGangStrength,
    pub is_positive: bool,
    pub analysis: KuiGangAnalysis,
    pub description: String,
    pub effect: &'static str,
    pub advice: String,
}

/// Sub-type when `gz` is one of the four KuiGang pairs.
pub fn kuigang_sub_type(gz: GanZhi) -> Option<KuiGangSubType> {
    use EarthlyBranch as B;
    use HeavenlyStem as S;
    match (gz.stem, gz.branch) {
        (S::Geng, B::Chen) | (S::Geng, B::Xu) => Some(KuiGangSubType::HusbandSevering),
        (S::Ren, B::Chen) | (S::Wu, B::Xu) => Some(KuiGangSubType::WifeSevering),
        _ => None,
    }
}

/// Analyse every KuiGang pillar of a year/month/day/hour chart.
pub fn analyze_kuigang(pillars: &[GanZhi; 4], gender: Gender) -> [Option<KuiGangInfo>; 4] {
    use crate::pillar::ALL_POSITIONS;
    ALL_POSITIONS.map(|pos| {
        let gz = pillars[pos.index()];
        let sub_type = kuigang_sub_type(gz)?;
        let analysis = analyze_quality(gz, pos, pillars);
        let strength = if pos == PillarPosition::Day {
            KuiGangStrength::Primary
        } else {
            KuiGangStrength::Secondary
        };
        Some(KuiGangInfo {
            ganzhi: gz,
            sub_type,
            position: pos,
            strength,
            is_positive: analysis.is_positive,
            description: describe(gz, sub_type, pos, analysis.is_positive),
            effect: effect(analysis.is_positive),
            advice: advise(sub_type, &analysis, gender),
            analysis,
        })
    })
}

fn analyze_quality(kg: GanZhi, at: PillarPosition, pillars: &[GanZhi; 4]) -> KuiGangAnalysis {
    use crate::pillar::ALL_POSITIONS;

    let mut breakage = Vec::new();
    let mut support = Vec::new();
    let mut has_breakage = false;
    let mut has_clash = false;
    let mut wealth_or_officer = false;

    let dm = pillars[2].stem;
    let dm_el = dm.element();

    // wealth (controlled by the day master) and officer (controlling it)
    for pos in ALL_POSITIONS {
        let GanZhi { stem, branch } = pillars[pos.index()];
        let p = pos.glyph();
        for (kind, glyph, el) in [
            ("天干", stem.to_string(), stem.element()),
            ("地支", branch.to_string(), branch.element()),
        ] {
            if dm_el.controls() == el {
                breakage.push(format!("{p}柱{kind}{glyph}为财星"));
                wealth_or_officer = true;
            }
            if el.controls() == dm_el {
                breakage.push(format!("{p}柱{kind}{glyph}为官星"));
                wealth_or_officer = true;
            }
        }
    }
    has_breakage |= wealth_or_officer;

    // clash and punishment of the KuiGang branch
    for pos in ALL_POSITIONS {
        let b = pillars[pos.index()].branch;
        let p = pos.glyph();
        if b == kg.branch.clash() {
            breakage.push(format!("{p}柱{b}与魁罡{}相冲", kg.branch));
            has_clash = true;
            has_breakage = true;
        }
        if matches!(b, EarthlyBranch::Chou | EarthlyBranch::Wei) {
            breakage.push(format!("{p}柱{b}刑魁罡{}", kg.branch));
            has_clash = true;
            has_breakage = true;
        }
    }

    // stacked KuiGang pillars
    let mut count = 0;
    for pos in ALL_POSITIONS {
        let gz = pillars[pos.index()];
        if kuigang_sub_type(gz).is_some() {
            count += 1;
            if pos != at {
                support.push(format!("{}柱叠见魁罡{gz}", pos.glyph()));
            }
        }
    }
    if count > 1 {
        support.push(format!("命中叠见{count}个魁罡，力量倍增"));
    }

    // day-master support
    let same = pillars
        .iter()
        .map(|gz| same_element_count(gz, dm_el))
        .sum::<usize>();
    if same >= 3 {
        support.push(format!("日主{dm}身旺，能承受魁罡之力"));
    } else if same <= 1 {
        breakage.push(format!("日主{dm}身弱，难承魁罡之力"));
        has_breakage = true;
    }

    if !wealth_or_officer {
        support.push("八字无财官星破格，魁罡纯清".to_string());
    }

    let support_count = support.len();
    KuiGangAnalysis {
        has_breakage,
        has_clash,
        support_count,
        breakage_factors: breakage,
        support_factors: support,
        is_positive: !has_breakage && support_count > 0,
    }
}

fn same_element_count(gz: &GanZhi, el: Element) -> usize {
    usize::from(gz.stem.element() == el) + usize::from(gz.branch.element() == el)
}

fn describe(gz: GanZhi, sub: KuiGangSubType, pos: PillarPosition, positive: bool) -> String {
    let rank = if pos == PillarPosition::Day {
        "为正格魁罡，影响力最强"
    } else {
        "为偏格魁罡，影响力次之"
    };
    let verdict = if positive {
        "格局纯清，主聪明果决，有威权"
    } else {
        "格局被破，主性格刚愎，易有波折"
    };
    format!("{}柱见魁罡{gz}，{}，{rank}。{verdict}", pos.glyph(), sub.name())
}

fn effect(positive: bool) -> &'static str {
    if positive {
        "头脑清晰，思维敏捷，有强烈的领导才能和决断力。性格刚毅果决，不畏艰难，有开拓精神。"
    } else {
        "性格过于刚硬，固执己见，容易与人发生冲突。婚姻感情不顺，人生起落较大。"
    }
}

fn advise(sub: KuiGangSubType, a: &KuiGangAnalysis, gender: Gender) -> String {
    let mut advice = if a.is_positive {
        String::from("魁罡格局纯清，宜发挥领导才能，从事需要决断力的职业。")
    } else {
        let mut s = String::from("魁罡格局被破，需修身养性，控制脾气。");
        if a.has_breakage {
            s.push_str("忌贪财求官，宜专心技艺。");
        }
        if a.has_clash {
            s.push_str("注意辰戌丑未年份，防刑冲引发意外。");
        }
        s
    };
    match (sub, gender) {
        (KuiGangSubType::HusbandSevering, Gender::Female) => {
            advice.push_str("女命见绝夫罡，宜晚婚，婚后需学会柔顺，与夫协调。")
        }
        (KuiGangSubType::WifeSevering, Gender::Male) => {
            advice.push_str("男命见绝妻罡，择偶宜选性格温柔者，婚后需多体贴妻子。")
        }
        _ => {}
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexagenary::ALL_GANZHI;

    fn gz(s: &str) -> GanZhi {
        GanZhi::parse(s).unwrap()
    }

    #[test]
    fn exactly_four_kuigang_pairs() {
        let n = ALL_GANZHI.iter().filter(|g| kuigang_sub_type(**g).is_some()).count();
        assert_eq!(n, 4);
        assert_eq!(kuigang_sub_type(gz("庚辰")), Some(KuiGangSubType::HusbandSevering));
        assert_eq!(kuigang_sub_type(gz("戊戌")), Some(KuiGangSubType::WifeSevering));
    }

    #[test]
    fn non_kuigang_chart_has_none() {
        let r = analyze_kuigang(&["庚午", "壬午", "辛亥", "乙未"].map(gz), Gender::Male);
        assert!(r.iter().all(Option::is_none));
    }

    #[test]
    fn day_pillar_is_primary() {
        let r = analyze_kuigang(&["甲子", "丙寅", "庚辰", "丙子"].map(gz), Gender::Male);
        let info = r[2].as_ref().unwrap();
        assert_eq!(info.strength, KuiGangStrength::Primary);
        assert_eq!(info.position, PillarPosition::Day);
        // 甲 is wealth for 庚
        assert!(info.analysis.has_breakage);
        assert!(!info.is_positive);
    }

    #[test]
    fn clash_from_xu_breaks_chen() {
        let r = analyze_kuigang(&["甲戌", "丙寅", "庚辰", "丙子"].map(gz), Gender::Female);
        let info = r[2].as_ref().unwrap();
        assert!(info.analysis.has_clash);
        assert!(info.advice.contains("绝夫罡"));
    }

    #[test]
    fn pure_kuigang_is_positive() {
        // 庚 day master: stems/branches only metal and earth, no wood or fire
        let r = analyze_kuigang(&["庚申", "戊申", "庚辰", "辛巳"].map(gz), Gender::Male);
        let info = r[2].as_ref().unwrap();
        // 巳 is fire → officer
        assert!(!info.is_positive);

        let r = analyze_kuigang(&["庚申", "戊申", "庚辰", "辛酉"].map(gz), Gender::Male);
        let info = r[2].as_ref().unwrap();
        assert!(info.is_positive, "{:?}", info.analysis);
        assert!(info.analysis.support_factors.iter().any(|f| f.contains("纯清")));
    }

    #[test]
    fn stacked_kuigang_adds_support() {
        let r = analyze_kuigang(&["庚戌", "戊申", "庚辰", "辛酉"].map(gz), Gender::Male);
        let day = r[2].as_ref().unwrap();
        assert!(day.analysis.support_factors.iter().any(|f| f.contains("叠见2个")));
        assert!(r[0].is_some());
        assert_eq!(r[0].as_ref().unwrap().strength, KuiGangStrength::Secondary);
    }
}
