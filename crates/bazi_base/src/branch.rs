//! Earthly branches (dizhi): the 12-valued ring and their hidden stems.
//!
//! Each branch stores 1-3 hidden stems (canggan). The first is the primary
//! qi; the remainder are secondary (middle) or tertiary (residual) qi.

use serde::{Deserialize, Serialize};

use crate::element::{Element, Polarity};
use crate::stem::HeavenlyStem;
use crate::stem::HeavenlyStem as S;
use HiddenStemKind::{Primary, Secondary, Tertiary};

/// The 12 earthly branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarthlyBranch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// All 12 branches in ring order (index 0 = Zi).
pub const ALL_BRANCHES: [EarthlyBranch; 12] = [
    EarthlyBranch::Zi,
    EarthlyBranch::Chou,
    EarthlyBranch::Yin,
    EarthlyBranch::Mao,
    EarthlyBranch::Chen,
    EarthlyBranch::Si,
    EarthlyBranch::Wu,
    EarthlyBranch::Wei,
    EarthlyBranch::Shen,
    EarthlyBranch::You,
    EarthlyBranch::Xu,
    EarthlyBranch::Hai,
];

const BRANCH_GLYPHS: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

/// Weight class of a hidden stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenStemKind {
    /// Main qi (本气).
    Primary,
    /// Middle qi (中气).
    Secondary,
    /// Residual qi (余气).
    Tertiary,
}

impl HiddenStemKind {
    /// Relative weight used when aggregating strength.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Primary => 1.0,
            Self::Secondary => 0.5,
            Self::Tertiary => 0.3,
        }
    }

    /// Base strength before weighting.
    pub const fn base_strength(self) -> f64 {
        match self {
            Self::Primary => 100.0,
            Self::Secondary => 50.0,
            Self::Tertiary => 30.0,
        }
    }
}

/// One hidden stem inside a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HiddenStem {
    pub stem: HeavenlyStem,
    pub kind: HiddenStemKind,
}

const fn hs(stem: HeavenlyStem, kind: HiddenStemKind) -> HiddenStem {
    HiddenStem { stem, kind }
}

const HIDDEN_ZI: &[HiddenStem] = &[hs(S::Gui, Primary)];
const HIDDEN_CHOU: &[HiddenStem] =
    &[hs(S::Ji, Primary), hs(S::Gui, Tertiary), hs(S::Xin, Secondary)];
const HIDDEN_YIN: &[HiddenStem] =
    &[hs(S::Jia, Primary), hs(S::Bing, Secondary), hs(S::Wu, Tertiary)];
const HIDDEN_MAO: &[HiddenStem] = &[hs(S::Yi, Primary)];
const HIDDEN_CHEN: &[HiddenStem] =
    &[hs(S::Wu, Primary), hs(S::Yi, Tertiary), hs(S::Gui, Secondary)];
const HIDDEN_SI: &[HiddenStem] =
    &[hs(S::Bing, Primary), hs(S::Wu, Secondary), hs(S::Geng, Tertiary)];
const HIDDEN_WU: &[HiddenStem] = &[hs(S::Ding, Primary), hs(S::Ji, Tertiary)];
const HIDDEN_WEI: &[HiddenStem] =
    &[hs(S::Ji, Primary), hs(S::Ding, Tertiary), hs(S::Yi, Secondary)];
const HIDDEN_SHEN: &[HiddenStem] =
    &[hs(S::Geng, Primary), hs(S::Ren, Secondary), hs(S::Wu, Tertiary)];
const HIDDEN_YOU: &[HiddenStem] = &[hs(S::Xin, Primary)];
const HIDDEN_XU: &[HiddenStem] =
    &[hs(S::Wu, Primary), hs(S::Xin, Tertiary), hs(S::Ding, Secondary)];
const HIDDEN_HAI: &[HiddenStem] = &[hs(S::Ren, Primary), hs(S::Jia, Tertiary)];

impl EarthlyBranch {
    /// Pinyin name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zi => "Zi",
            Self::Chou => "Chou",
            Self::Yin => "Yin",
            Self::Mao => "Mao",
            Self::Chen => "Chen",
            Self::Si => "Si",
            Self::Wu => "Wu",
            Self::Wei => "Wei",
            Self::Shen => "Shen",
            Self::You => "You",
            Self::Xu => "Xu",
            Self::Hai => "Hai",
        }
    }

    /// Chinese glyph.
    pub const fn glyph(self) -> &'static str {
        BRANCH_GLYPHS[self.index() as usize]
    }

    /// 0-based ring index (Zi=0 .. Hai=11).
    pub const fn index(self) -> u8 {
        match self {
            Self::Zi => 0,
            Self::Chou => 1,
            Self::Yin => 2,
            Self::Mao => 3,
            Self::Chen => 4,
            Self::Si => 5,
            Self::Wu => 6,
            Self::Wei => 7,
            Self::Shen => 8,
            Self::You => 9,
            Self::Xu => 10,
            Self::Hai => 11,
        }
    }

    /// Create from a 0-based index. Returns None if index >= 12.
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_BRANCHES.get(index as usize).copied()
    }

    /// Parse a glyph ("子") or a pinyin name ("zi", case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        ALL_BRANCHES
            .into_iter()
            .find(|b| b.glyph() == s || b.name().eq_ignore_ascii_case(s))
    }

    /// Step `n` places around the ring (negative steps walk backwards).
    pub fn offset(self, n: i32) -> Self {
        ALL_BRANCHES[(self.index() as i32 + n).rem_euclid(12) as usize]
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Zi | Self::Hai => Element::Water,
            Self::Yin | Self::Mao => Element::Wood,
            Self::Si | Self::Wu => Element::Fire,
            Self::Shen | Self::You => Element::Metal,
            Self::Chen | Self::Xu | Self::Chou | Self::Wei => Element::Earth,
        }
    }

    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    /// Opposing branch, six places away.
    pub fn clash(self) -> Self {
        self.offset(6)
    }

    /// Six-combination partner and the element the pair forms.
    pub const fn six_combination(self) -> (EarthlyBranch, Element) {
        use EarthlyBranch::*;
        match self {
            Zi => (Chou, Element::Earth),
            Chou => (Zi, Element::Earth),
            Yin => (Hai, Element::Wood),
            Hai => (Yin, Element::Wood),
            Mao => (Xu, Element::Fire),
            Xu => (Mao, Element::Fire),
            Chen => (You, Element::Metal),
            You => (Chen, Element::Metal),
            Si => (Shen, Element::Water),
            Shen => (Si, Element::Water),
            Wu => (Wei, Element::Fire),
            Wei => (Wu, Element::Fire),
        }
    }

    /// Element of the three-harmony frame (申子辰 Water, 亥卯未 Wood,
    /// 寅午戌 Fire, 巳酉丑 Metal) this branch belongs to.
    pub const fn triad_element(self) -> Element {
        use EarthlyBranch::*;
        match self {
            Shen | Zi | Chen => Element::Water,
            Hai | Mao | Wei => Element::Wood,
            Yin | Wu | Xu => Element::Fire,
            Si | You | Chou => Element::Metal,
        }
    }

    /// Element of the seasonal (directional) meeting this branch belongs to.
    pub const fn season_element(self) -> Element {
        use EarthlyBranch::*;
        match self {
            Yin | Mao | Chen => Element::Wood,
            Si | Wu | Wei => Element::Fire,
            Shen | You | Xu => Element::Metal,
            Hai | Zi | Chou => Element::Water,
        }
    }

    /// Element held in storage by the four tomb branches.
    pub const fn storage_element(self) -> Option<Element> {
        match self {
            Self::Chou => Some(Element::Metal),
            Self::Wei => Some(Element::Wood),
            Self::Chen => Some(Element::Water),
            Self::Xu => Some(Element::Fire),
            _ => None,
        }
    }

    /// Hidden stems, primary first.
    pub const fn hidden_stems(self) -> &'static [HiddenStem] {
        match self {
            Self::Zi => HIDDEN_ZI,
            Self::Chou => HIDDEN_CHOU,
            Self::Yin => HIDDEN_YIN,
            Self::Mao => HIDDEN_MAO,
            Self::Chen => HIDDEN_CHEN,
            Self::Si => HIDDEN_SI,
            Self::Wu => HIDDEN_WU,
            Self::Wei => HIDDEN_WEI,
            Self::Shen => HIDDEN_SHEN,
            Self::You => HIDDEN_YOU,
            Self::Xu => HIDDEN_XU,
            Self::Hai => HIDDEN_HAI,
        }
    }

    /// Main qi stem.
    pub const fn primary_hidden_stem(self) -> HeavenlyStem {
        self.hidden_stems()[0].stem
    }
}

impl std::fmt::Display for EarthlyBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_branches_count() {
        assert_eq!(ALL_BRANCHES.len(), 12);
    }

    #[test]
    fn indices_sequential() {
        for (i, b) in ALL_BRANCHES.iter().enumerate() {
            assert_eq!(b.index() as usize, i);
            assert_eq!(EarthlyBranch::from_index(i as u8), Some(*b));
        }
        assert_eq!(EarthlyBranch::from_index(12), None);
    }

    #[test]
    fn hidden_stem_counts() {
        let counts: Vec<usize> = ALL_BRANCHES.iter().map(|b| b.hidden_stems().len()).collect();
        assert_eq!(counts, vec![1, 3, 3, 1, 3, 3, 2, 3, 3, 1, 3, 2]);
    }

    #[test]
    fn primary_is_first_and_unique() {
        for b in ALL_BRANCHES {
            let hidden = b.hidden_stems();
            assert_eq!(hidden[0].kind, HiddenStemKind::Primary);
            assert_eq!(
                hidden.iter().filter(|h| h.kind == HiddenStemKind::Primary).count(),
                1
            );
        }
    }

    #[test]
    fn primary_matches_branch_element() {
        for b in ALL_BRANCHES {
            assert_eq!(b.primary_hidden_stem().element(), b.element(), "{b:?}");
        }
    }

    #[test]
    fn clash_is_involution() {
        for b in ALL_BRANCHES {
            assert_eq!(b.clash().clash(), b);
            assert_ne!(b.clash(), b);
        }
        assert_eq!(EarthlyBranch::Zi.clash(), EarthlyBranch::Wu);
    }

    #[test]
    fn six_combination_symmetric() {
        for b in ALL_BRANCHES {
            let (p, e) = b.six_combination();
            assert_eq!(p.six_combination(), (b, e));
        }
    }

    #[test]
    fn triad_groups_have_three_members() {
        for b in ALL_BRANCHES {
            let n = ALL_BRANCHES
                .iter()
                .filter(|o| o.triad_element() == b.triad_element())
                .count();
            assert_eq!(n, 3);
        }
    }

    #[test]
    fn storage_branches() {
        let stores: Vec<_> = ALL_BRANCHES
            .iter()
            .filter(|b| b.storage_element().is_some())
            .collect();
        assert_eq!(stores.len(), 4);
        assert_eq!(EarthlyBranch::Chen.storage_element(), Some(Element::Water));
    }

    #[test]
    fn hidden_weights() {
        assert_eq!(HiddenStemKind::Primary.weight(), 1.0);
        let secondary = HiddenStemKind::Secondary;
        assert_eq!(secondary.base_strength() * secondary.weight(), 25.0);
    }

    #[test]
    fn parse_glyph_and_name() {
        assert_eq!(EarthlyBranch::parse("亥"), Some(EarthlyBranch::Hai));
        assert_eq!(EarthlyBranch::parse("CHOU"), Some(EarthlyBranch::Chou));
        assert_eq!(EarthlyBranch::parse("甲"), None);
    }
}
