//! Pillar builder: four GanZhi pairs annotated into a chart.
//!
//! Every annotation is a constant-table lookup keyed by the pillar's own stem
//! and branch. The day pillar's stem is the day master and never changes
//! once the chart is built.

use serde::{Deserialize, Serialize};

use crate::branch::{EarthlyBranch, HiddenStemKind};
use crate::element::Element;
use crate::kuigang::{KuiGangInfo, analyze_kuigang};
use crate::sexagenary::{GanZhi, NaYin};
use crate::stem::HeavenlyStem;
use crate::ten_god::{TenGod, ten_god};

/// Gender of the chart owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "男" => Some(Self::Male),
            "female" | "f" | "女" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Year, month, day or hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

pub const ALL_POSITIONS: [PillarPosition; 4] = [
    PillarPosition::Year,
    PillarPosition::Month,
    PillarPosition::Day,
    PillarPosition::Hour,
];

impl PillarPosition {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Year => "年",
            Self::Month => "月",
            Self::Day => "日",
            Self::Hour => "时",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Year => 0,
            Self::Month => 1,
            Self::Day => 2,
            Self::Hour => 3,
        }
    }
}

/// A slot in the extended chart: the four pillars plus the optional decade
/// and annual period pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPosition {
    Year,
    Month,
    Day,
    Hour,
    DecadePeriod,
    AnnualPeriod,
}

/// Slot order for extended input.
pub const ALL_CHART_POSITIONS: [ChartPosition; 6] = [
    ChartPosition::Year,
    ChartPosition::Month,
    ChartPosition::Day,
    ChartPosition::Hour,
    ChartPosition::DecadePeriod,
    ChartPosition::AnnualPeriod,
];

impl ChartPosition {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Year => "年",
            Self::Month => "月",
            Self::Day => "日",
            Self::Hour => "时",
            Self::DecadePeriod => "运",
            Self::AnnualPeriod => "岁",
        }
    }
}

impl From<PillarPosition> for ChartPosition {
    fn from(p: PillarPosition) -> Self {
        match p {
            PillarPosition::Year => Self::Year,
            PillarPosition::Month => Self::Month,
            PillarPosition::Day => Self::Day,
            PillarPosition::Hour => Self::Hour,
        }
    }
}

/// Closed set of branch attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialAttribute {
    /// 桃花: 子午卯酉
    Romance,
    /// 驿马: 寅申巳亥
    Movement,
    /// 墓库: 辰戌丑未
    Storage,
    /// 羊刃 on a yang stem's own branch
    Blade,
    /// 帝旺 on a yin stem's own branch
    Peak,
}

/// 禄: the branch where a stem is "salaried".
pub const fn lu_branch(stem: HeavenlyStem) -> EarthlyBranch {
    use EarthlyBranch as B;
    use HeavenlyStem::*;
    match stem {
        Jia => B::Yin,
        Yi => B::Mao,
        Bing | Wu => B::Si,
        Ding | Ji => B::Wu,
        Geng => B::Shen,
        Xin => B::You,
        Ren => B::Hai,
        Gui => B::Zi,
    }
}

/// 羊刃 for the five yang stems.
pub const fn blade_branch(stem: HeavenlyStem) -> Option<EarthlyBranch> {
    use EarthlyBranch as B;
    use HeavenlyStem::*;
    match stem {
        Jia => Some(B::Mao),
        Bing | Wu => Some(B::Wu),
        Geng => Some(B::You),
        Ren => Some(B::Zi),
        _ => None,
    }
}

/// 帝旺 for the five yin stems.
pub const fn peak_branch(stem: HeavenlyStem) -> Option<EarthlyBranch> {
    use EarthlyBranch as B;
    use HeavenlyStem::*;
    match stem {
        Yi => Some(B::Wu),
        Ding | Ji => Some(B::You),
        Xin => Some(B::Zi),
        Gui => Some(B::Mao),
        _ => None,
    }
}

/// A hidden stem with its weights and ten god.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiddenStemInfo {
    pub stem: HeavenlyStem,
    pub kind: HiddenStemKind,
    pub element: Element,
    pub weight: f64,
    pub base_strength: f64,
    pub ten_god: TenGod,
}

/// Pillar stem five-combining with a hidden stem of its own branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamePillarCombination {
    pub stem: HeavenlyStem,
    pub hidden_stem: HeavenlyStem,
    pub element: Element,
    pub description: String,
}

/// Stem five-combination with the branch's hidden stems, if any.
pub fn same_pillar_combination(
    stem: HeavenlyStem,
    branch: EarthlyBranch,
) -> Option<SamePillarCombination> {
    branch.hidden_stems().iter().find_map(|hs| {
        stem.combines_with(hs.stem).map(|element| SamePillarCombination {
            stem,
            hidden_stem: hs.stem,
            element,
            description: format!("{stem}与{branch}中{}暗合", hs.stem),
        })
    })
}

/// One annotated pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pillar {
    pub position: PillarPosition,
    pub ganzhi: GanZhi,
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
    pub label: String,
    pub nayin: NaYin,
    pub stem_element: Element,
    pub branch_element: Element,
    /// Ten god of the stem. The day pillar carries 比肩 with `is_day_master`.
    pub ten_god: TenGod,
    pub is_day_master: bool,
    /// Empty unless hidden stems were requested.
    pub hidden_stems: Vec<HiddenStemInfo>,
    pub primary_hidden_stem: HeavenlyStem,
    pub special_attributes: Vec<SpecialAttribute>,
    pub storage_element: Option<Element>,
    pub is_lu: bool,
    pub is_blade: bool,
    pub is_peak: bool,
    pub hidden_combination: Option<SamePillarCombination>,
    pub kuigang: Option<KuiGangInfo>,
}

/// Year, month, day and hour pillars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl FourPillars {
    /// The reference stem.
    pub fn day_master(&self) -> HeavenlyStem {
        self.day.stem
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pillar> {
        [&self.year, &self.month, &self.day, &self.hour].into_iter()
    }

    pub fn get(&self, position: PillarPosition) -> &Pillar {
        match position {
            PillarPosition::Year => &self.year,
            PillarPosition::Month => &self.month,
            PillarPosition::Day => &self.day,
            PillarPosition::Hour => &self.hour,
        }
    }

    pub fn ganzhis(&self) -> [GanZhi; 4] {
        [self.year.ganzhi, self.month.ganzhi, self.day.ganzhi, self.hour.ganzhi]
    }

    pub fn stems(&self) -> [HeavenlyStem; 4] {
        [self.year.stem, self.month.stem, self.day.stem, self.hour.stem]
    }

    pub fn branches(&self) -> [EarthlyBranch; 4] {
        [self.year.branch, self.month.branch, self.day.branch, self.hour.branch]
    }
}

/// Builder switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PillarOptions {
    pub include_hidden_stems: bool,
    /// When false the 羊刃/帝旺 annotations are suppressed.
    pub include_blade_peak: bool,
}

impl Default for PillarOptions {
    fn default() -> Self {
        Self {
            include_hidden_stems: true,
            include_blade_peak: true,
        }
    }
}

/// Build the annotated chart from year, month, day and hour pairs.
pub fn build_four_pillars(
    ganzhis: [GanZhi; 4],
    gender: Gender,
    opts: PillarOptions,
) -> FourPillars {
    let day_master = ganzhis[2].stem;
    let kuigang = analyze_kuigang(&ganzhis, gender);
    let [year, month, day, hour] = ALL_POSITIONS.map(|pos| {
        build_pillar(
            pos,
            ganzhis[pos.index()],
            day_master,
            opts,
            kuigang[pos.index()].clone(),
        )
    });
    FourPillars {
        year,
        month,
        day,
        hour,
    }
}

fn build_pillar(
    position: PillarPosition,
    ganzhi: GanZhi,
    day_master: HeavenlyStem,
    opts: PillarOptions,
    kuigang: Option<KuiGangInfo>,
) -> Pillar {
    let GanZhi { stem, branch } = ganzhi;
    let is_day_master = position == PillarPosition::Day;

    let hidden_stems = if opts.include_hidden_stems {
        branch
            .hidden_stems()
            .iter()
            .map(|hs| HiddenStemInfo {
                stem: hs.stem,
                kind: hs.kind,
                element: hs.stem.element(),
                weight: hs.kind.weight(),
                base_strength: hs.kind.base_strength(),
                ten_god: ten_god(day_master, hs.stem),
            })
            .collect()
    } else {
        Vec::new()
    };

    let is_blade = opts.include_blade_peak && blade_branch(stem) == Some(branch);
    let is_peak = opts.include_blade_peak && peak_branch(stem) == Some(branch);

    let mut special_attributes = Vec::new();
    match branch {
        EarthlyBranch::Zi | EarthlyBranch::Wu | EarthlyBranch::Mao | EarthlyBranch::You => {
            special_attributes.push(SpecialAttribute::Romance)
        }
        EarthlyBranch::Yin | EarthlyBranch::Shen | EarthlyBranch::Si | EarthlyBranch::Hai => {
            special_attributes.push(SpecialAttribute::Movement)
        }
        _ => special_attributes.push(SpecialAttribute::Storage),
    }
    if is_blade {
        special_attributes.push(SpecialAttribute::Blade);
    }
    if is_peak {
        special_attributes.push(SpecialAttribute::Peak);
    }

    Pillar {
        position,
        ganzhi,
        stem,
        branch,
        label: ganzhi.label(),
        nayin: ganzhi.nayin(),
        stem_element: stem.element(),
        branch_element: branch.element(),
        ten_god: if is_day_master {
            TenGod::BiJian
        } else {
            ten_god(day_master, stem)
        },
        is_day_master,
        hidden_stems,
        primary_hidden_stem: branch.primary_hidden_stem(),
        special_attributes,
        storage_element: branch.storage_element(),
        is_lu: lu_branch(stem) == branch,
        is_blade,
        is_peak,
        hidden_combination: same_pillar_combination(stem, branch),
        kuigang,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stem::ALL_STEMS;

    fn gz(s: &str) -> GanZhi {
        GanZhi::parse(s).unwrap()
    }

    fn chart(p: [&str; 4]) -> FourPillars {
        build_four_pillars(p.map(gz), Gender::Male, PillarOptions::default())
    }

    #[test]
    fn day_master_is_day_stem() {
        let fp = chart(["庚午", "壬午", "辛亥", "乙未"]);
        assert_eq!(fp.day_master(), HeavenlyStem::Xin);
        assert!(fp.day.is_day_master);
        assert_eq!(fp.day.ten_god, TenGod::BiJian);
        assert_eq!(fp.year.ten_god, TenGod::JieCai);
    }

    #[test]
    fn blade_only_on_yang_peak_only_on_yin() {
        for s in ALL_STEMS {
            assert_eq!(blade_branch(s).is_some(), s.is_yang());
            assert_eq!(peak_branch(s).is_some(), !s.is_yang());
        }
    }

    #[test]
    fn lu_flags() {
        let fp = chart(["甲寅", "丙午", "庚申", "癸亥"]);
        assert!(fp.year.is_lu);
        assert!(!fp.month.is_lu);
        assert!(fp.month.is_blade);
        assert!(fp.day.is_lu);
        assert!(!fp.hour.is_lu);
    }

    #[test]
    fn blade_peak_suppressed_by_option() {
        let opts = PillarOptions {
            include_hidden_stems: true,
            include_blade_peak: false,
        };
        let fp = build_four_pillars(
            ["丙午", "丁酉", "甲子", "甲子"].map(gz),
            Gender::Male,
            opts,
        );
        assert!(!fp.year.is_blade);
        assert!(!fp.month.is_peak);
        assert!(!fp.year.special_attributes.contains(&SpecialAttribute::Blade));
    }

    #[test]
    fn storage_branches_carry_element() {
        let fp = chart(["甲辰", "丙戌", "乙丑", "丁未"]);
        assert_eq!(fp.year.storage_element, Some(Element::Water));
        assert_eq!(fp.month.storage_element, Some(Element::Fire));
        assert_eq!(fp.day.storage_element, Some(Element::Metal));
        assert_eq!(fp.hour.storage_element, Some(Element::Wood));
        assert!(fp.iter().all(|p| p.special_attributes.contains(&SpecialAttribute::Storage)));
    }

    #[test]
    fn same_pillar_hidden_combination() {
        // 丁亥: 丁 with 壬 in 亥
        let c = same_pillar_combination(HeavenlyStem::Ding, EarthlyBranch::Hai).unwrap();
        assert_eq!(c.hidden_stem, HeavenlyStem::Ren);
        assert_eq!(c.element, Element::Wood);
        assert!(same_pillar_combination(HeavenlyStem::Jia, EarthlyBranch::Zi).is_none());
    }

    #[test]
    fn hidden_stems_follow_option() {
        let with = chart(["庚午", "壬午", "辛亥", "乙未"]);
        assert_eq!(with.year.hidden_stems.len(), 2);
        let without = build_four_pillars(
            ["庚午", "壬午", "辛亥", "乙未"].map(gz),
            Gender::Male,
            PillarOptions {
                include_hidden_stems: false,
                include_blade_peak: true,
            },
        );
        assert!(without.year.hidden_stems.is_empty());
        assert_eq!(without.year.primary_hidden_stem, HeavenlyStem::Ding);
    }

    #[test]
    fn gender_parse() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("女"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
    }
}
