//! Major periods (大运) and fleeting years (流年).
//!
//! Major periods walk the sexagenary cycle from the month pillar, one pair per
//! ten years. The walk ascends for a yang year stem with a male native or a
//! yin year stem with a female native, and descends otherwise. Fleeting years
//! are the calendar years around "now", each tagged with its own pair.

use serde::Serialize;

use crate::element::Element;
use crate::pillar::{FourPillars, Gender};
use crate::sexagenary::{GanZhi, NaYin, year_ganzhi};
use crate::stem::HeavenlyStem;
use crate::ten_god::{TenGod, ten_god};

/// Years covered by one major period.
pub const PERIOD_YEARS: u32 = 10;

/// Starting age used when no childhood-limit routine is available.
pub const FALLBACK_START_AGE: u32 = 6;

pub const DEFAULT_PERIOD_COUNT: usize = 10;

pub const DEFAULT_FLEETING_RANGE: u32 = 10;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodDirection {
    /// 顺行
    Forward,
    /// 逆行
    Backward,
}

impl PeriodDirection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "顺行",
            Self::Backward => "逆行",
        }
    }

    pub const fn step(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Yang year with a male native, or yin year with a female native, walks
/// forward.
pub const fn period_direction(year_stem: HeavenlyStem, gender: Gender) -> PeriodDirection {
    match (year_stem.is_yang(), gender) {
        (true, Gender::Male) | (false, Gender::Female) => PeriodDirection::Forward,
        _ => PeriodDirection::Backward,
    }
}

// ---------------------------------------------------------------------------
// Favorability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Favorability {
    Favorable,
    Unfavorable,
    Neutral,
}

impl Favorability {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Favorable => "有利",
            Self::Unfavorable => "不利",
            Self::Neutral => "平稳",
        }
    }
}

/// Favorable when `el` is the day-master element or generates it,
/// unfavorable when it controls it.
pub const fn favorability(day_master: Element, el: Element) -> Favorability {
    if el as u8 == day_master as u8 || el.generates() as u8 == day_master as u8 {
        Favorability::Favorable
    } else if el.controls() as u8 == day_master as u8 {
        Favorability::Unfavorable
    } else {
        Favorability::Neutral
    }
}

/// "金运" when both elements agree, "金土运" otherwise.
pub fn element_description(stem: Element, branch: Element) -> String {
    if stem == branch {
        format!("{}运", stem.glyph())
    } else {
        format!("{}{}运", stem.glyph(), branch.glyph())
    }
}

// ---------------------------------------------------------------------------
// Major periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorPeriod {
    /// 1-indexed step.
    pub order: u16,
    pub ganzhi: GanZhi,
    pub label: String,
    pub nayin: NaYin,
    /// Inclusive.
    pub start_age: u32,
    /// Inclusive.
    pub end_age: u32,
    pub start_year: i32,
    pub end_year: i32,
    pub stem_element: Element,
    pub branch_element: Element,
    pub element_description: String,
    pub ten_god: TenGod,
    pub favorability: Favorability,
    pub description: String,
}

impl MajorPeriod {
    pub fn contains_age(&self, age: i32) -> bool {
        age >= self.start_age as i32 && age <= self.end_age as i32
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorPeriodSequence {
    pub direction: PeriodDirection,
    pub start_age: u32,
    pub periods: Vec<MajorPeriod>,
    /// Index into `periods` of the period holding the current age.
    pub current: Option<usize>,
    /// Index of the first period starting after the current age.
    pub next: Option<usize>,
}

impl MajorPeriodSequence {
    pub fn current_period(&self) -> Option<&MajorPeriod> {
        self.current.map(|i| &self.periods[i])
    }

    pub fn next_period(&self) -> Option<&MajorPeriod> {
        self.next.map(|i| &self.periods[i])
    }

    /// The period covering a calendar year.
    pub fn for_year(&self, year: i32) -> Option<&MajorPeriod> {
        self.periods.iter().find(|p| p.contains_year(year))
    }
}

/// Build `count` consecutive major periods.
///
/// `start_age` is clamped to at least 1. The first period is the neighbour of
/// the month pillar in the walking direction.
pub fn major_periods(
    pillars: &FourPillars,
    gender: Gender,
    birth_year: i32,
    start_age: u32,
    count: usize,
    current_age: i32,
) -> MajorPeriodSequence {
    let direction = period_direction(pillars.year.stem, gender);
    let start_age = start_age.max(1);
    let dm = pillars.day_master();
    let month = pillars.month.ganzhi;

    let periods: Vec<MajorPeriod> = (0..count)
        .map(|i| {
            let gz = month.offset(direction.step() * (i as i32 + 1));
            let age0 = start_age + i as u32 * PERIOD_YEARS;
            let age1 = age0 + PERIOD_YEARS - 1;
            let stem_element = gz.stem.element();
            let branch_element = gz.branch.element();
            let nayin = gz.nayin();
            MajorPeriod {
                order: i as u16 + 1,
                ganzhi: gz,
                label: gz.label(),
                nayin,
                start_age: age0,
                end_age: age1,
                start_year: birth_year + age0 as i32,
                end_year: birth_year + age1 as i32,
                stem_element,
                branch_element,
                element_description: element_description(stem_element, branch_element),
                ten_god: ten_god(dm, gz.stem),
                favorability: favorability(dm.element(), stem_element),
                description: format!(
                    "第{}步大运：{gz}，五行属{}，纳音{}",
                    i + 1,
                    stem_element.glyph(),
                    nayin.name
                ),
            }
        })
        .collect();

    let current = periods.iter().position(|p| p.contains_age(current_age));
    let next = periods
        .iter()
        .position(|p| p.start_age as i32 > current_age);

    MajorPeriodSequence {
        direction,
        start_age,
        periods,
        current,
        next,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSignificance {
    Major,
    Moderate,
    Minor,
}

/// Change between two consecutive major periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTransition {
    pub from: u16,
    pub to: u16,
    pub age: u32,
    pub significance: TransitionSignificance,
    pub description: String,
}

/// Major when both the stem element and the favorability change, moderate
/// when the element or the ten god changes.
pub fn period_transitions(periods: &[MajorPeriod]) -> Vec<PeriodTransition> {
    periods
        .windows(2)
        .map(|w| {
            let (a, b) = (&w[0], &w[1]);
            let element_change = a.stem_element != b.stem_element;
            let favor_change = a.favorability != b.favorability;
            let (significance, description) = if element_change && favor_change {
                (
                    TransitionSignificance::Major,
                    format!(
                        "从{}转向{}，运势性质从{}转为{}",
                        a.element_description,
                        b.element_description,
                        a.favorability.name(),
                        b.favorability.name()
                    ),
                )
            } else if element_change || a.ten_god != b.ten_god {
                (
                    TransitionSignificance::Moderate,
                    "运势特质发生变化，需要调整应对策略".to_string(),
                )
            } else {
                (
                    TransitionSignificance::Minor,
                    "运势延续，保持稳定发展".to_string(),
                )
            };
            PeriodTransition {
                from: a.order,
                to: b.order,
                age: b.start_age,
                significance,
                description,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fleeting years
// ---------------------------------------------------------------------------

/// How a fleeting year's pair meets the major period covering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodYearRelation {
    pub period: GanZhi,
    /// Element formed when the two stems five-combine.
    pub stem_combination: Option<Element>,
    pub branch_clash: bool,
    /// Element formed when the two branches six-combine.
    pub branch_combination: Option<Element>,
    pub favorability: Favorability,
    pub description: String,
}

/// Compare a year pair against a period pair from the day master's view.
pub fn period_year_relation(
    period: GanZhi,
    year: GanZhi,
    day_master: HeavenlyStem,
) -> PeriodYearRelation {
    let stem_combination = period.stem.combines_with(year.stem);
    let branch_clash = period.branch.clash() == year.branch;
    let (partner, el) = period.branch.six_combination();
    let branch_combination = (partner == year.branch).then_some(el);
    let favorability = favorability(day_master.element(), year.stem.element());

    let mut notes = Vec::new();
    if let Some(el) = stem_combination {
        notes.push(format!("天干{}{}合化{}", period.stem, year.stem, el.glyph()));
    }
    if branch_clash {
        notes.push(format!("地支{}{}相冲", period.branch, year.branch));
    }
    if let Some(el) = branch_combination {
        notes.push(format!("地支{}{}合{}", period.branch, year.branch, el.glyph()));
    }
    let verdict = match favorability {
        Favorability::Favorable => "有利发展",
        Favorability::Unfavorable => "需要谨慎",
        Favorability::Neutral => "平稳过渡",
    };
    let description = if notes.is_empty() {
        format!("{period}运遇{year}年，{verdict}")
    } else {
        format!("{period}运遇{year}年，{}，{verdict}", notes.join("，"))
    };

    PeriodYearRelation {
        period,
        stem_combination,
        branch_clash,
        branch_combination,
        favorability,
        description,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetingYear {
    pub year: i32,
    pub ganzhi: GanZhi,
    pub label: String,
    /// Nominal age: `year − birth_year`.
    pub age: i32,
    pub stem_element: Element,
    pub ten_god: TenGod,
    pub favorability: Favorability,
    pub is_current: bool,
    pub period_relation: Option<PeriodYearRelation>,
}

/// Years in `[current_year − range, current_year + range]` with a positive
/// age.
pub fn fleeting_years(
    pillars: &FourPillars,
    birth_year: i32,
    current_year: i32,
    range: u32,
    periods: Option<&MajorPeriodSequence>,
) -> Vec<FleetingYear> {
    let dm = pillars.day_master();
    let range = range as i32;
    (current_year - range..=current_year + range)
        .filter(|&year| year - birth_year > 0)
        .map(|year| {
            let gz = year_ganzhi(year);
            FleetingYear {
                year,
                ganzhi: gz,
                label: gz.label(),
                age: year - birth_year,
                stem_element: gz.stem.element(),
                ten_god: ten_god(dm, gz.stem),
                favorability: favorability(dm.element(), gz.stem.element()),
                is_current: year == current_year,
                period_relation: periods
                    .and_then(|seq| seq.for_year(year))
                    .map(|p| period_year_relation(p.ganzhi, gz, dm)),
            }
        })
        .collect()
}
