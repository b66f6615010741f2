//! Calendar adapter seam.
//!
//! An adapter turns a birth instant into the four cycle pairs and, when it
//! can, a lunar date and a childhood-limit starting age. The engine treats it
//! as a black box.

use bazi_base::branch::EarthlyBranch;
use bazi_base::{ALL_GANZHI, GanZhi, year_ganzhi};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::BirthInput;

/// Lunar date echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_leap_month: bool,
}

impl LunarDate {
    fn from_input(input: &BirthInput) -> Self {
        Self {
            year: input.year,
            month: input.month,
            day: input.day,
            is_leap_month: input.is_leap_month,
        }
    }
}

/// Adapter output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarPillars {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    pub hour: GanZhi,
    pub solar_date: Option<NaiveDate>,
    pub lunar: Option<LunarDate>,
}

impl CalendarPillars {
    pub fn ganzhis(&self) -> [GanZhi; 4] {
        [self.year, self.month, self.day, self.hour]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CalendarError {
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("lunar input is not supported by the {adapter} adapter")]
    LunarUnsupported { adapter: &'static str },

    #[error("year {year} is outside the adapter's range")]
    OutOfRange { year: i32 },
}

/// Converts a birth instant into cycle pairs.
pub trait CalendarAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn convert(&self, input: &BirthInput) -> Result<CalendarPillars, CalendarError>;

    /// Age at which the first major period begins, walking forward or
    /// backward. `None` when the adapter cannot compute it.
    fn child_limit(&self, _input: &BirthInput, _forward: bool) -> Option<u32> {
        None
    }
}

// ---------------------------------------------------------------------------
// Fixed
// ---------------------------------------------------------------------------

/// Returns caller-supplied pillars for every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCalendar {
    pub pillars: [GanZhi; 4],
    pub lunar: Option<LunarDate>,
    pub child_limit: Option<u32>,
}

impl FixedCalendar {
    pub fn new(pillars: [GanZhi; 4]) -> Self {
        Self {
            pillars,
            lunar: None,
            child_limit: None,
        }
    }

    pub fn with_lunar(mut self, lunar: LunarDate) -> Self {
        self.lunar = Some(lunar);
        self
    }

    pub fn with_child_limit(mut self, age: u32) -> Self {
        self.child_limit = Some(age);
        self
    }
}

impl CalendarAdapter for FixedCalendar {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn convert(&self, input: &BirthInput) -> Result<CalendarPillars, CalendarError> {
        let [year, month, day, hour] = self.pillars;
        let (solar_date, lunar) = if input.is_lunar {
            (None, Some(self.lunar.unwrap_or_else(|| LunarDate::from_input(input))))
        } else {
            (NaiveDate::from_ymd_opt(input.year, input.month, input.day), self.lunar)
        };
        Ok(CalendarPillars {
            year,
            month,
            day,
            hour,
            solar_date,
            lunar,
        })
    }

    fn child_limit(&self, _input: &BirthInput, _forward: bool) -> Option<u32> {
        self.child_limit
    }
}

// ---------------------------------------------------------------------------
// Sectional solar terms
// ---------------------------------------------------------------------------

/// Approximate start dates of the twelve sectional terms (节) and the month
/// branch each opens. 立春 opens 寅 and the year.
const SECTIONAL_TERMS: [(u32, u32, EarthlyBranch); 12] = [
    (1, 6, EarthlyBranch::Chou),
    (2, 4, EarthlyBranch::Yin),
    (3, 6, EarthlyBranch::Mao),
    (4, 5, EarthlyBranch::Chen),
    (5, 6, EarthlyBranch::Si),
    (6, 6, EarthlyBranch::Wu),
    (7, 7, EarthlyBranch::Wei),
    (8, 8, EarthlyBranch::Shen),
    (9, 8, EarthlyBranch::You),
    (10, 8, EarthlyBranch::Xu),
    (11, 7, EarthlyBranch::Hai),
    (12, 7, EarthlyBranch::Zi),
];

/// Julian day number minus `num_days_from_ce` for the same date.
const JDN_CE_OFFSET: i64 = 1_721_425;

/// Cycle index of the day whose Julian day number is 0, shifted so that
/// `(jdn + DAY_CYCLE_OFFSET) mod 60` is the day's cycle index.
const DAY_CYCLE_OFFSET: i64 = 49;

/// Days per year of starting age.
const DAYS_PER_LIMIT_YEAR: f64 = 3.0;

/// Gregorian-only adapter on fixed sectional-term dates.
///
/// Term boundaries fall at midnight of the listed day, so births within a
/// day of a term may land in the neighbouring month. Hour 23 belongs to the
/// next day (子初换日).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolarTermCalendar;

impl SolarTermCalendar {
    fn date(input: &BirthInput) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(input.year, input.month, input.day).ok_or(
            CalendarError::InvalidDate {
                year: input.year,
                month: input.month,
                day: input.day,
            },
        )
    }

    /// Term dates of the years around `year`, ascending.
    fn terms_around(year: i32) -> Vec<(NaiveDate, EarthlyBranch)> {
        (year - 1..=year + 1)
            .flat_map(|y| {
                SECTIONAL_TERMS
                    .iter()
                    .filter_map(move |&(m, d, b)| NaiveDate::from_ymd_opt(y, m, d).map(|t| (t, b)))
            })
            .collect()
    }

    /// Most recent term on or before `date`.
    fn governing_term(date: NaiveDate) -> Option<(NaiveDate, EarthlyBranch)> {
        Self::terms_around(date.year())
            .into_iter()
            .take_while(|(t, _)| *t <= date)
            .last()
    }

    /// First term strictly after `date`.
    fn next_term(date: NaiveDate) -> Option<NaiveDate> {
        Self::terms_around(date.year())
            .into_iter()
            .map(|(t, _)| t)
            .find(|t| *t > date)
    }

    pub fn day_ganzhi(date: NaiveDate) -> GanZhi {
        let jdn = i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET;
        ALL_GANZHI[(jdn + DAY_CYCLE_OFFSET).rem_euclid(60) as usize]
    }

    /// Month pair from the year stem (五虎遁): the 寅 month of a 甲 or 己 year
    /// is 丙寅, and so on in steps of twelve.
    pub fn month_ganzhi(year: GanZhi, branch: EarthlyBranch) -> GanZhi {
        let yin_month = (year.stem.index() % 5) as usize * 12 + 2;
        let steps = (branch.index() as usize + 12 - 2) % 12;
        ALL_GANZHI[(yin_month + steps) % 60]
    }

    /// Hour pair from the day stem (五鼠遁): the 子 hour of a 甲 or 己 day is
    /// 甲子, and so on in steps of twelve.
    pub fn hour_ganzhi(day: GanZhi, hour: u32) -> GanZhi {
        let zi_hour = (day.stem.index() % 5) as usize * 12;
        let branch = ((hour + 1) / 2 % 12) as usize;
        ALL_GANZHI[(zi_hour + branch) % 60]
    }
}

impl CalendarAdapter for SolarTermCalendar {
    fn name(&self) -> &'static str {
        "solar-term"
    }

    fn convert(&self, input: &BirthInput) -> Result<CalendarPillars, CalendarError> {
        if input.is_lunar {
            return Err(CalendarError::LunarUnsupported {
                adapter: self.name(),
            });
        }
        let date = Self::date(input)?;
        let (_, month_branch) =
            Self::governing_term(date).ok_or(CalendarError::OutOfRange { year: input.year })?;

        // The pillar year turns at 立春.
        let spring = NaiveDate::from_ymd_opt(date.year(), 2, 4)
            .ok_or(CalendarError::OutOfRange { year: input.year })?;
        let pillar_year = if date < spring { date.year() - 1 } else { date.year() };
        let year = year_ganzhi(pillar_year);

        let day_date = if input.hour == 23 {
            date.succ_opt()
                .ok_or(CalendarError::OutOfRange { year: input.year })?
        } else {
            date
        };
        let day = Self::day_ganzhi(day_date);

        Ok(CalendarPillars {
            year,
            month: Self::month_ganzhi(year, month_branch),
            day,
            hour: Self::hour_ganzhi(day, input.hour),
            solar_date: Some(date),
            lunar: None,
        })
    }

    /// Days to the next term (forward) or since the last one (backward),
    /// three days to a year, at least one.
    fn child_limit(&self, input: &BirthInput, forward: bool) -> Option<u32> {
        if input.is_lunar {
            return None;
        }
        let date = Self::date(input).ok()?;
        let days = if forward {
            Self::next_term(date)?.signed_duration_since(date).num_days()
        } else {
            date.signed_duration_since(Self::governing_term(date)?.0).num_days()
        };
        Some(((days as f64 / DAYS_PER_LIMIT_YEAR).round() as u32).max(1))
    }
}
