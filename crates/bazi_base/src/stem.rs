//! Heavenly stems (tiangan): the 10-valued ring.
//!
//! Even indices are yang, odd indices yin. Consecutive pairs share an element:
//! Jia/Yi Wood, Bing/Ding Fire, Wu/Ji Earth, Geng/Xin Metal, Ren/Gui Water.

use serde::{Deserialize, Serialize};

use crate::element::{Element, Polarity};

/// The 10 heavenly stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeavenlyStem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

/// All 10 stems in ring order (index 0 = Jia).
pub const ALL_STEMS: [HeavenlyStem; 10] = [
    HeavenlyStem::Jia,
    HeavenlyStem::Yi,
    HeavenlyStem::Bing,
    HeavenlyStem::Ding,
    HeavenlyStem::Wu,
    HeavenlyStem::Ji,
    HeavenlyStem::Geng,
    HeavenlyStem::Xin,
    HeavenlyStem::Ren,
    HeavenlyStem::Gui,
];

const STEM_GLYPHS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

impl HeavenlyStem {
    /// Pinyin name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jia => "Jia",
            Self::Yi => "Yi",
            Self::Bing => "Bing",
            Self::Ding => "Ding",
            Self::Wu => "Wu",
            Self::Ji => "Ji",
            Self::Geng => "Geng",
            Self::Xin => "Xin",
            Self::Ren => "Ren",
            Self::Gui => "Gui",
        }
    }

    /// Chinese glyph.
    pub const fn glyph(self) -> &'static str {
        STEM_GLYPHS[self.index() as usize]
    }

    /// 0-based ring index (Jia=0 .. Gui=9).
    pub const fn index(self) -> u8 {
        match self {
            Self::Jia => 0,
            Self::Yi => 1,
            Self::Bing => 2,
            Self::Ding => 3,
            Self::Wu => 4,
            Self::Ji => 5,
            Self::Geng => 6,
            Self::Xin => 7,
            Self::Ren => 8,
            Self::Gui => 9,
        }
    }

    /// Create from a 0-based index. Returns None if index >= 10.
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_STEMS.get(index as usize).copied()
    }

    /// Parse a glyph ("甲") or a pinyin name ("jia", case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        ALL_STEMS
            .into_iter()
            .find(|st| st.glyph() == s || st.name().eq_ignore_ascii_case(s))
    }

    /// Step `n` places around the ring (negative steps walk backwards).
    pub fn offset(self, n: i32) -> Self {
        ALL_STEMS[(self.index() as i32 + n).rem_euclid(10) as usize]
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Jia | Self::Yi => Element::Wood,
            Self::Bing | Self::Ding => Element::Fire,
            Self::Wu | Self::Ji => Element::Earth,
            Self::Geng | Self::Xin => Element::Metal,
            Self::Ren | Self::Gui => Element::Water,
        }
    }

    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub const fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }

    /// Five-combination partner (甲己, 乙庚, 丙辛, 丁壬, 戊癸) and the element
    /// the pair transforms into.
    pub const fn combination(self) -> (HeavenlyStem, Element) {
        use HeavenlyStem::*;
        match self {
            Jia => (Ji, Element::Earth),
            Ji => (Jia, Element::Earth),
            Yi => (Geng, Element::Metal),
            Geng => (Yi, Element::Metal),
            Bing => (Xin, Element::Water),
            Xin => (Bing, Element::Water),
            Ding => (Ren, Element::Wood),
            Ren => (Ding, Element::Wood),
            Wu => (Gui, Element::Fire),
            Gui => (Wu, Element::Fire),
        }
    }

    /// Transformed element if `self` and `other` five-combine.
    pub fn combines_with(self, other: HeavenlyStem) -> Option<Element> {
        let (partner, element) = self.combination();
        (partner == other).then_some(element)
    }

    /// Opposing stem (甲庚, 乙辛, 丙壬, 丁癸). Earth stems have none.
    pub const fn clash(self) -> Option<HeavenlyStem> {
        use HeavenlyStem::*;
        match self {
            Jia => Some(Geng),
            Geng => Some(Jia),
            Yi => Some(Xin),
            Xin => Some(Yi),
            Bing => Some(Ren),
            Ren => Some(Bing),
            Ding => Some(Gui),
            Gui => Some(Ding),
            Wu | Ji => None,
        }
    }
}

impl std::fmt::Display for HeavenlyStem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Stems whose ring index is even.
pub const YANG_STEMS: [HeavenlyStem; 5] = [
    HeavenlyStem::Jia,
    HeavenlyStem::Bing,
    HeavenlyStem::Wu,
    HeavenlyStem::Geng,
    HeavenlyStem::Ren,
];
