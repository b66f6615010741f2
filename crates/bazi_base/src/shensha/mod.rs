//! Marker (神煞) detection.
//!
//! Every rule in [`rules`] resolves to a [`MarkerTarget`]; a marker is present
//! when any enabled chart slot carries a targeted symbol. Enabled slots are the
//! four natal pillars, minus the hour when the birth time is not accurate,
//! plus the decade and annual period pillars when supplied.
//!
//! Rules are independent and total: an empty target just means the marker is
//! absent.

pub mod rules;
pub mod sets;

use serde::Serialize;

use crate::branch::EarthlyBranch;
use crate::error::ShenShaError;
use crate::pillar::{ALL_CHART_POSITIONS, ChartPosition, FourPillars, Gender};
use crate::sexagenary::GanZhi;
use crate::stem::HeavenlyStem;

pub use rules::{
    ALL_SHENSHA, MarkerTarget, ShenShaCategory, ShenShaKind, approximate_void_branches,
    precise_void_branches, render_description, target,
};
pub use sets::{BranchSet, PillarSet, PositionSet, StemSet};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The chart as seen by the marker rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShenShaInput {
    /// Year, month, day, hour.
    pub natal: [GanZhi; 4],
    pub decade: Option<GanZhi>,
    pub annual: Option<GanZhi>,
    /// When false the hour pillar is ignored chart-wide.
    pub has_accurate_time: bool,
    /// Needed by 元辰 only.
    pub gender: Option<Gender>,
}

impl ShenShaInput {
    pub fn new(natal: [GanZhi; 4]) -> Self {
        Self {
            natal,
            decade: None,
            annual: None,
            has_accurate_time: true,
            gender: None,
        }
    }

    pub fn from_pillars(pillars: &FourPillars, gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..Self::new(pillars.ganzhis())
        }
    }

    pub fn with_decade(mut self, gz: GanZhi) -> Self {
        self.decade = Some(gz);
        self
    }

    pub fn with_annual(mut self, gz: GanZhi) -> Self {
        self.annual = Some(gz);
        self
    }

    pub fn with_accurate_time(mut self, accurate: bool) -> Self {
        self.has_accurate_time = accurate;
        self
    }

    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    /// Parse the flat symbol list `[year stem, year branch, month stem, …]`:
    /// 8 symbols for the natal chart, 10 with a decade pillar, 12 with an
    /// annual pillar as well.
    pub fn from_symbols(symbols: &[&str]) -> Result<Self, ShenShaError> {
        if !matches!(symbols.len(), 8 | 10 | 12) {
            return Err(ShenShaError::symbol_count(symbols.len()));
        }
        let pairs = symbols
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| {
                let stem = HeavenlyStem::parse(pair[0])
                    .ok_or_else(|| ShenShaError::invalid_symbol(2 * i, pair[0], "stem"))?;
                let branch = EarthlyBranch::parse(pair[1])
                    .ok_or_else(|| ShenShaError::invalid_symbol(2 * i + 1, pair[1], "branch"))?;
                GanZhi::new(stem, branch).ok_or(ShenShaError::InvalidPair { index: i })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            natal: [pairs[0], pairs[1], pairs[2], pairs[3]],
            decade: pairs.get(4).copied(),
            annual: pairs.get(5).copied(),
            has_accurate_time: true,
            gender: None,
        })
    }

    pub fn at(&self, position: ChartPosition) -> Option<GanZhi> {
        match position {
            ChartPosition::Year => Some(self.natal[0]),
            ChartPosition::Month => Some(self.natal[1]),
            ChartPosition::Day => Some(self.natal[2]),
            ChartPosition::Hour => Some(self.natal[3]),
            ChartPosition::DecadePeriod => self.decade,
            ChartPosition::AnnualPeriod => self.annual,
        }
    }

    /// Slots that take part in detection.
    pub fn enabled_positions(&self) -> PositionSet {
        let mut set = PositionSet::NATAL;
        if !self.has_accurate_time {
            set = set.without(ChartPosition::Hour);
        }
        if self.decade.is_some() {
            set = set.with(ChartPosition::DecadePeriod);
        }
        if self.annual.is_some() {
            set = set.with(ChartPosition::AnnualPeriod);
        }
        set
    }

    /// Symbol pairs at enabled slots, in slot order.
    pub fn observed(&self) -> impl Iterator<Item = (ChartPosition, GanZhi)> + '_ {
        let enabled = self.enabled_positions();
        ALL_CHART_POSITIONS
            .into_iter()
            .filter(move |&p| enabled.contains(p))
            .filter_map(move |p| self.at(p).map(|gz| (p, gz)))
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One marker rule's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShenShaRecord {
    pub kind: ShenShaKind,
    pub name: &'static str,
    pub category: ShenShaCategory,
    pub auspicious: bool,
    pub present: bool,
    /// Slots carrying a targeted symbol.
    pub positions: Vec<ChartPosition>,
    pub sub_type: Option<&'static str>,
    pub description: String,
}

/// Count of hits for a family of markers plus a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerSummary {
    /// Total hit positions across the family.
    pub count: usize,
    pub kinds: Vec<ShenShaKind>,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShenShaAnalysis {
    /// All 33 rules in rule order, present or not.
    pub records: Vec<ShenShaRecord>,
    pub peach_blossom: MarkerSummary,
    pub nobleman: MarkerSummary,
}

impl ShenShaAnalysis {
    pub fn present(&self) -> impl Iterator<Item = &ShenShaRecord> {
        self.records.iter().filter(|r| r.present)
    }

    pub fn get(&self, kind: ShenShaKind) -> Option<&ShenShaRecord> {
        self.records.iter().find(|r| r.kind == kind)
    }

    pub fn has(&self, kind: ShenShaKind) -> bool {
        self.get(kind).is_some_and(|r| r.present)
    }

    /// Display labels of present markers, sub-type in parentheses.
    pub fn labels(&self) -> Vec<String> {
        self.present()
            .map(|r| match r.sub_type {
                Some(sub) => format!("{}({sub})", r.name),
                None => r.name.to_string(),
            })
            .collect()
    }

    /// Markers sitting on one slot.
    pub fn at(&self, position: ChartPosition) -> Vec<ShenShaKind> {
        self.present()
            .filter(|r| r.positions.contains(&position))
            .map(|r| r.kind)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Run one rule.
pub fn detect_one(kind: ShenShaKind, input: &ShenShaInput) -> ShenShaRecord {
    let t = target(kind, input);
    let positions: Vec<ChartPosition> = input
        .observed()
        .filter(|&(at, gz)| t.hits(at, gz))
        .map(|(at, _)| at)
        .collect();
    let present = !positions.is_empty();
    let sub_type = if present { t.sub_type } else { None };
    ShenShaRecord {
        kind,
        name: kind.name(),
        category: kind.category(),
        auspicious: kind.category().is_auspicious(),
        present,
        positions,
        sub_type,
        description: render_description(kind, sub_type),
    }
}

/// Run all 33 rules.
pub fn detect_shensha(input: &ShenShaInput) -> ShenShaAnalysis {
    let records: Vec<ShenShaRecord> = ALL_SHENSHA.iter().map(|&k| detect_one(k, input)).collect();
    ShenShaAnalysis {
        peach_blossom: peach_blossom_summary(&records),
        nobleman: nobleman_summary(&records),
        records,
    }
}

/// Detect from the flat 8/10/12 symbol list.
pub fn detect_from_symbols(
    symbols: &[&str],
    has_accurate_time: bool,
    gender: Option<Gender>,
) -> Result<ShenShaAnalysis, ShenShaError> {
    let input = ShenShaInput::from_symbols(symbols)?
        .with_accurate_time(has_accurate_time)
        .with_gender(gender);
    Ok(detect_shensha(&input))
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

const PEACH_FAMILY: [ShenShaKind; 5] = [
    ShenShaKind::HongLuan,
    ShenShaKind::TianXi,
    ShenShaKind::MuYu,
    ShenShaKind::XianChi,
    ShenShaKind::HongYan,
];

const NOBLE_FAMILY: [ShenShaKind; 4] = [
    ShenShaKind::TianYi,
    ShenShaKind::TianDe,
    ShenShaKind::TianDeHe,
    ShenShaKind::YueDe,
];

fn family_hits(records: &[ShenShaRecord], family: &[ShenShaKind]) -> (usize, Vec<ShenShaKind>) {
    let hits: Vec<&ShenShaRecord> = records
        .iter()
        .filter(|r| r.present && family.contains(&r.kind))
        .collect();
    (
        hits.iter().map(|r| r.positions.len()).sum(),
        hits.iter().map(|r| r.kind).collect(),
    )
}

pub fn peach_blossom_summary(records: &[ShenShaRecord]) -> MarkerSummary {
    let (count, kinds) = family_hits(records, &PEACH_FAMILY);
    let description = match count {
        0 => "八字中桃花星较少，人际关系平稳，适合技术性或专业性较强的岗位",
        1..=2 => "桃花运适中，具备良好的客户沟通能力，适合综合性岗位",
        3..=4 => "桃花运旺盛，人缘极佳，非常适合销售、客服、商务拓展等前线岗位",
        _ => "桃花运极强，魅力十足，适合高端销售或公关岗位，需注意保持专业形象",
    };
    MarkerSummary {
        count,
        kinds,
        description,
    }
}

pub fn nobleman_summary(records: &[ShenShaRecord]) -> MarkerSummary {
    let (count, kinds) = family_hits(records, &NOBLE_FAMILY);
    let description = match count {
        0 => "贵人运一般，需要更多自身努力",
        1..=2 => "有贵人扶助，关键时刻能得到帮助",
        _ => "贵人运极佳，一生多得贵人相助",
    };
    MarkerSummary {
        count,
        kinds,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(p: [&str; 4]) -> ShenShaInput {
        ShenShaInput::new(p.map(|s| GanZhi::parse(s).unwrap()))
    }

    fn gz(s: &str) -> GanZhi {
        GanZhi::parse(s).unwrap()
    }

    #[test]
    fn symbol_count_is_checked() {
        let err = ShenShaInput::from_symbols(&["甲", "子"]).unwrap_err();
        assert_eq!(err, ShenShaError::SymbolCount { actual: 2 });
        let nine = ["甲", "子", "乙", "丑", "丙", "寅", "丁", "卯", "戊"];
        assert!(matches!(
            ShenShaInput::from_symbols(&nine),
            Err(ShenShaError::SymbolCount { actual: 9 })
        ));
    }

    #[test]
    fn bad_symbols_are_located() {
        let syms = ["甲", "子", "乙", "丑", "丙", "X", "丁", "卯"];
        match ShenShaInput::from_symbols(&syms) {
            Err(ShenShaError::InvalidSymbol {
                index, expected, ..
            }) => {
                assert_eq!(index, 5);
                assert_eq!(expected, "branch");
            }
            other => panic!("unexpected {other:?}"),
        }
        let mismatched = ["甲", "子", "乙", "子", "丙", "寅", "丁", "卯"];
        assert_eq!(
            ShenShaInput::from_symbols(&mismatched),
            Err(ShenShaError::InvalidPair { index: 1 })
        );
    }

    #[test]
    fn extended_input_adds_period_slots() {
        let syms = [
            "庚", "午", "壬", "午", "辛", "亥", "乙", "未", "甲", "申", "甲", "辰",
        ];
        let inp = ShenShaInput::from_symbols(&syms).unwrap();
        assert_eq!(inp.decade, Some(gz("甲申")));
        assert_eq!(inp.annual, Some(gz("甲辰")));
        assert_eq!(inp.enabled_positions(), PositionSet::ALL);
        assert_eq!(inp.observed().count(), 6);
    }

    #[test]
    fn inaccurate_time_drops_the_hour() {
        let inp = input(["庚午", "壬午", "辛亥", "乙未"]).with_accurate_time(false);
        assert!(!inp.enabled_positions().contains(ChartPosition::Hour));
        assert_eq!(inp.observed().count(), 3);
    }

    #[test]
    fn all_rules_report() {
        let a = detect_shensha(&input(["庚午", "壬午", "辛亥", "乙未"]));
        assert_eq!(a.records.len(), 33);
        assert!(a.records.iter().all(|r| r.present == !r.positions.is_empty()));
    }

    #[test]
    fn tian_yi_for_xin_day() {
        // 辛 day: 天乙 at 寅/午; 午 sits in year and month
        let a = detect_shensha(&input(["庚午", "壬午", "辛亥", "乙未"]));
        let r = a.get(ShenShaKind::TianYi).unwrap();
        assert!(r.present);
        assert_eq!(r.positions, vec![ChartPosition::Year, ChartPosition::Month]);
    }

    #[test]
    fn hour_exclusion_removes_hour_only_markers() {
        // 辛 day 华盖 for a 午 year is 戌; put 戌 only in the hour
        let chart = input(["庚午", "壬午", "辛亥", "戊戌"]);
        assert!(detect_shensha(&chart).has(ShenShaKind::HuaGai));
        assert!(!detect_shensha(&chart.with_accurate_time(false)).has(ShenShaKind::HuaGai));
    }

    #[test]
    fn period_pillars_trigger_markers() {
        // 午 year: 驿马 at 申, absent natally
        let chart = input(["庚午", "壬午", "辛亥", "乙未"]);
        assert!(!detect_shensha(&chart).has(ShenShaKind::YiMa));
        let a = detect_shensha(&chart.with_decade(gz("甲申")));
        let r = a.get(ShenShaKind::YiMa).unwrap();
        assert_eq!(r.positions, vec![ChartPosition::DecadePeriod]);
    }

    #[test]
    fn san_qi_needs_all_three() {
        let heaven = input(["甲子", "戊辰", "庚午", "丙子"]);
        let r = detect_shensha(&heaven).get(ShenShaKind::SanQi).cloned().unwrap();
        assert!(r.present);
        assert_eq!(r.sub_type, Some("天上三奇"));
        assert_eq!(r.positions.len(), 3);

        let partial = input(["甲子", "戊辰", "壬午", "丙子"]);
        assert!(!detect_shensha(&partial).has(ShenShaKind::SanQi));
    }

    #[test]
    fn tian_de_only_counts_month_and_periods() {
        // 庚 year: 天德 丁; 丁 in the hour stem does not count
        let hour_only = input(["庚午", "壬午", "辛亥", "丁酉"]);
        assert!(!detect_shensha(&hour_only).has(ShenShaKind::TianDe));
        let month = input(["庚午", "丁亥", "辛亥", "乙未"]);
        assert_eq!(
            detect_shensha(&month).get(ShenShaKind::TianDe).unwrap().positions,
            vec![ChartPosition::Month]
        );
    }

    #[test]
    fn kuigang_and_shi_e_da_bai_on_day() {
        let a = detect_shensha(&input(["甲子", "丙寅", "庚辰", "丙子"]));
        let kg = a.get(ShenShaKind::KuiGang).unwrap();
        assert!(kg.present);
        assert_eq!(kg.sub_type, Some("绝夫罡"));
        assert_eq!(kg.positions, vec![ChartPosition::Day]);
        // 庚辰 is also one of the ten great-defeat days
        assert!(a.has(ShenShaKind::ShiEDaBai));
        assert!(a.labels().contains(&"魁罡(绝夫罡)".to_string()));
    }

    #[test]
    fn yuan_chen_needs_gender() {
        // 午 year: male 元辰 at 未 (hour)
        let chart = input(["庚午", "壬午", "辛亥", "乙未"]);
        assert!(!detect_shensha(&chart).has(ShenShaKind::YuanChen));
        assert!(detect_shensha(&chart.with_gender(Some(Gender::Male))).has(ShenShaKind::YuanChen));
    }

    #[test]
    fn tian_luo_for_earth_nayin() {
        // 丙戌 carries 屋上土
        let a = detect_shensha(&input(["丙戌", "庚寅", "甲子", "甲子"]));
        let r = a.get(ShenShaKind::TianLuoDiWang).unwrap();
        assert!(r.present);
        assert_eq!(r.sub_type, Some("天罗"));
        assert!(r.description.starts_with("天罗"));
    }

    #[test]
    fn void_uses_the_heuristic() {
        // 辛亥 day: heuristic 午未, exact rule 寅卯
        let a = detect_shensha(&input(["庚午", "壬午", "辛亥", "乙未"]));
        let r = a.get(ShenShaKind::KongWang).unwrap();
        assert_eq!(
            r.positions,
            vec![ChartPosition::Year, ChartPosition::Month, ChartPosition::Hour]
        );
    }

    #[test]
    fn summaries_bucket_counts() {
        let a = detect_shensha(&input(["庚午", "壬午", "辛亥", "乙未"]));
        // 天乙 at year and month, 天德合 (壬 for a 庚 year) at month
        assert_eq!(a.nobleman.count, 3);
        assert_eq!(
            a.nobleman.kinds,
            vec![ShenShaKind::TianYi, ShenShaKind::TianDeHe]
        );
        assert_eq!(a.nobleman.description, "贵人运极佳，一生多得贵人相助");

        let none = peach_blossom_summary(&[]);
        assert_eq!(none.count, 0);
        assert!(none.description.starts_with("八字中桃花星较少"));
    }

    #[test]
    fn column_view() {
        let a = detect_shensha(&input(["庚午", "壬午", "辛亥", "乙未"]));
        assert!(a.at(ChartPosition::Year).contains(&ShenShaKind::TianYi));
        assert!(a.at(ChartPosition::DecadePeriod).is_empty());
    }

    #[test]
    fn from_symbols_round_trip() {
        let syms = ["庚", "午", "壬", "午", "辛", "亥", "乙", "未"];
        let a = detect_from_symbols(&syms, true, Some(Gender::Male)).unwrap();
        let b = detect_shensha(
            &input(["庚午", "壬午", "辛亥", "乙未"]).with_gender(Some(Gender::Male)),
        );
        assert_eq!(a, b);
    }
}
