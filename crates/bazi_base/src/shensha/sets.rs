//! Fixed-width symbol sets used as marker targets.
//!
//! Each set is a bitmask over ring indices: bit `i` is set when the symbol
//! with index `i` is a member.

use crate::branch::{ALL_BRANCHES, EarthlyBranch};
use crate::pillar::{ALL_CHART_POSITIONS, ChartPosition};
use crate::sexagenary::{ALL_GANZHI, GanZhi};
use crate::stem::{ALL_STEMS, HeavenlyStem};

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BranchSet(u16);

impl BranchSet {
    pub const EMPTY: Self = Self(0);

    pub const fn of(branches: &[EarthlyBranch]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < branches.len() {
            mask |= 1u16 << branches[i].index();
            i += 1;
        }
        Self(mask)
    }

    pub const fn single(b: EarthlyBranch) -> Self {
        Self(1u16 << b.index())
    }

    pub const fn contains(self, b: EarthlyBranch) -> bool {
        self.0 & (1u16 << b.index()) != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = EarthlyBranch> {
        ALL_BRANCHES.into_iter().filter(move |&b| self.contains(b))
    }
}

// ---------------------------------------------------------------------------
// Stems
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StemSet(u16);

impl StemSet {
    pub const EMPTY: Self = Self(0);

    pub const fn of(stems: &[HeavenlyStem]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < stems.len() {
            mask |= 1u16 << stems[i].index();
            i += 1;
        }
        Self(mask)
    }

    pub const fn single(s: HeavenlyStem) -> Self {
        Self(1u16 << s.index())
    }

    pub const fn contains(self, s: HeavenlyStem) -> bool {
        self.0 & (1u16 << s.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every member of `self` is in `other`.
    pub const fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = HeavenlyStem> {
        ALL_STEMS.into_iter().filter(move |&s| self.contains(s))
    }
}

// ---------------------------------------------------------------------------
// Whole pillars
// ---------------------------------------------------------------------------

/// Set of sexagenary pairs, bit = cycle index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PillarSet(u64);

impl PillarSet {
    pub const EMPTY: Self = Self(0);

    pub fn of(pairs: &[GanZhi]) -> Self {
        Self(pairs.iter().fold(0u64, |m, gz| m | 1u64 << gz.index()))
    }

    pub fn contains(self, gz: GanZhi) -> bool {
        self.0 & (1u64 << gz.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = GanZhi> {
        ALL_GANZHI.into_iter().filter(move |&gz| self.contains(gz))
    }
}

// ---------------------------------------------------------------------------
// Chart positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionSet(u8);

const fn position_bit(p: ChartPosition) -> u8 {
    1u8 << (p as u8)
}

impl PositionSet {
    pub const EMPTY: Self = Self(0);
    /// Year, month, day and hour.
    pub const NATAL: Self = Self::of(&[
        ChartPosition::Year,
        ChartPosition::Month,
        ChartPosition::Day,
        ChartPosition::Hour,
    ]);
    pub const ALL: Self = Self::of(&ALL_CHART_POSITIONS);

    pub const fn of(positions: &[ChartPosition]) -> Self {
        let mut mask = 0u8;
        let mut i = 0;
        while i < positions.len() {
            mask |= position_bit(positions[i]);
            i += 1;
        }
        Self(mask)
    }

    pub const fn contains(self, p: ChartPosition) -> bool {
        self.0 & position_bit(p) != 0
    }

    pub const fn with(self, p: ChartPosition) -> Self {
        Self(self.0 | position_bit(p))
    }

    pub const fn without(self, p: ChartPosition) -> Self {
        Self(self.0 & !position_bit(p))
    }

    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = ChartPosition> {
        ALL_CHART_POSITIONS.into_iter().filter(move |&p| self.contains(p))
    }
}

impl Default for PositionSet {
    fn default() -> Self {
        Self::NATAL
    }
}
