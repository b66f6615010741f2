//! Sexagenary (60-pair) cycle and NaYin sounds.
//!
//! A stem and a branch form a valid pair only when their ring indices share
//! parity, so 60 of the 120 combinations exist. The cycle starts at 甲子
//! (index 0) and ends at 癸亥 (index 59). CE 4 was a 甲子 year.
//!
//! NaYin (纳音) assigns one of 30 named sounds to each consecutive pair of
//! the cycle (甲子/乙丑 海中金 ... 壬戌/癸亥 大海水).

use serde::{Deserialize, Serialize};

use crate::branch::EarthlyBranch;
use crate::element::Element;
use crate::stem::HeavenlyStem;

/// A valid stem/branch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GanZhi {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

/// Reference epoch: CE 4 = 甲子 (index 0).
pub const GANZHI_EPOCH_YEAR: i32 = 4;

impl GanZhi {
    /// Pair a stem and branch. Returns None when their polarities differ.
    pub fn new(stem: HeavenlyStem, branch: EarthlyBranch) -> Option<Self> {
        (stem.index() % 2 == branch.index() % 2).then_some(Self { stem, branch })
    }

    /// Create from a 0-based cycle index. Returns None if index >= 60.
    pub fn from_index(index: u8) -> Option<Self> {
        if index >= 60 {
            return None;
        }
        let stem = HeavenlyStem::from_index(index % 10)?;
        let branch = EarthlyBranch::from_index(index % 12)?;
        Some(Self { stem, branch })
    }

    /// Position in the 60-cycle (甲子 = 0).
    ///
    /// Solves `i ≡ stem (mod 10)`, `i ≡ branch (mod 12)`:
    /// `i = (6·stem − 5·branch) mod 60`.
    pub fn index(self) -> u8 {
        let s = self.stem.index() as i32;
        let b = self.branch.index() as i32;
        (6 * s - 5 * b).rem_euclid(60) as u8
    }

    /// Step `n` places around the 60-cycle (negative steps walk backwards).
    pub fn offset(self, n: i32) -> Self {
        ALL_GANZHI[(self.index() as i32 + n).rem_euclid(60) as usize]
    }

    /// Parse a two-glyph pair such as "甲子".
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let stem = HeavenlyStem::parse(&chars.next()?.to_string())?;
        let branch = EarthlyBranch::parse(&chars.next()?.to_string())?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(stem, branch)
    }

    /// Two-glyph label, e.g. "庚午".
    pub fn label(self) -> String {
        format!("{}{}", self.stem.glyph(), self.branch.glyph())
    }

    /// NaYin sound of this pair.
    pub fn nayin(self) -> NaYin {
        NAYIN_TABLE[(self.index() / 2) as usize]
    }
}

impl std::fmt::Display for GanZhi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem.glyph(), self.branch.glyph())
    }
}

/// Pair for a given CE year (year boundary taken as given).
pub fn year_ganzhi(ce_year: i32) -> GanZhi {
    let offset = (ce_year - GANZHI_EPOCH_YEAR).rem_euclid(60) as usize;
    ALL_GANZHI[offset]
}

/// All 60 pairs in cycle order.
pub const ALL_GANZHI: [GanZhi; 60] = build_cycle();

const fn build_cycle() -> [GanZhi; 60] {
    use crate::branch::ALL_BRANCHES;
    use crate::stem::ALL_STEMS;
    let mut out = [GanZhi {
        stem: HeavenlyStem::Jia,
        branch: EarthlyBranch::Zi,
    }; 60];
    let mut i = 0;
    while i < 60 {
        out[i] = GanZhi {
            stem: ALL_STEMS[i % 10],
            branch: ALL_BRANCHES[i % 12],
        };
        i += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// NaYin
// ---------------------------------------------------------------------------

/// One of the 30 NaYin sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NaYin {
    /// Chinese name, e.g. "海中金".
    pub name: &'static str,
    /// English gloss.
    pub english: &'static str,
    pub element: Element,
}

const fn ny(name: &'static str, english: &'static str, element: Element) -> NaYin {
    NaYin {
        name,
        english,
        element,
    }
}

/// NaYin for each consecutive pair of the cycle (index = cycle index / 2).
pub const NAYIN_TABLE: [NaYin; 30] = [
    ny("海中金", "Gold in the Sea", Element::Metal),
    ny("炉中火", "Fire in the Furnace", Element::Fire),
    ny("大林木", "Wood of the Great Forest", Element::Wood),
    ny("路旁土", "Earth by the Roadside", Element::Earth),
    ny("剑锋金", "Metal of the Sword Edge", Element::Metal),
    ny("山头火", "Fire on the Mountain Top", Element::Fire),
    ny("涧下水", "Water in the Ravine", Element::Water),
    ny("城头土", "Earth on the City Wall", Element::Earth),
    ny("白蜡金", "White Wax Metal", Element::Metal),
    ny("杨柳木", "Willow Wood", Element::Wood),
    ny("泉中水", "Water in the Spring", Element::Water),
    ny("屋上土", "Earth on the Roof", Element::Earth),
    ny("霹雳火", "Thunderbolt Fire", Element::Fire),
    ny("松柏木", "Pine and Cypress Wood", Element::Wood),
    ny("长流水", "Long-Flowing Water", Element::Water),
    ny("砂石金", "Metal in the Sand", Element::Metal),
    ny("山下火", "Fire at the Foot of the Mountain", Element::Fire),
    ny("平地木", "Wood of the Plain", Element::Wood),
    ny("壁上土", "Earth on the Wall", Element::Earth),
    ny("金薄金", "Gold Leaf Metal", Element::Metal),
    ny("覆灯火", "Lamp Fire", Element::Fire),
    ny("天河水", "Water of the Milky Way", Element::Water),
    ny("大驿土", "Earth of the Great Post Road", Element::Earth),
    ny("钗环金", "Hairpin Metal", Element::Metal),
    ny("桑柘木", "Mulberry Wood", Element::Wood),
    ny("大溪水", "Water of the Great Stream", Element::Water),
    ny("沙中土", "Earth in the Sand", Element::Earth),
    ny("天上火", "Fire in the Sky", Element::Fire),
    ny("石榴木", "Pomegranate Wood", Element::Wood),
    ny("大海水", "Water of the Great Sea", Element::Water),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::ALL_BRANCHES;
    use crate::stem::ALL_STEMS;

    #[test]
    fn all_ganzhi_count() {
        assert_eq!(ALL_GANZHI.len(), 60);
    }

    #[test]
    fn indices_sequential() {
        for (i, gz) in ALL_GANZHI.iter().enumerate() {
            assert_eq!(gz.index() as usize, i);
            assert_eq!(GanZhi::from_index(i as u8), Some(*gz));
        }
        assert_eq!(GanZhi::from_index(60), None);
    }

    #[test]
    fn parity_mismatch_rejected() {
        let mut valid = 0;
        for s in ALL_STEMS {
            for b in ALL_BRANCHES {
                match GanZhi::new(s, b) {
                    Some(gz) => {
                        valid += 1;
                        let back = GanZhi::from_index(gz.index()).unwrap();
                        assert_eq!((back.stem, back.branch), (s, b));
                    }
                    None => assert_ne!(s.index() % 2, b.index() % 2),
                }
            }
        }
        assert_eq!(valid, 60);
    }

    #[test]
    fn year_1984_is_jia_zi() {
        let gz = year_ganzhi(1984);
        assert_eq!(gz.label(), "甲子");
    }

    #[test]
    fn year_1990_is_geng_wu() {
        assert_eq!(year_ganzhi(1990).label(), "庚午");
    }

    #[test]
    fn year_2024_is_jia_chen() {
        assert_eq!(year_ganzhi(2024).label(), "甲辰");
    }

    #[test]
    fn year_before_epoch() {
        // CE 3: 3 - 4 = -1, rem_euclid(60) = 59 → 癸亥
        assert_eq!(year_ganzhi(3).label(), "癸亥");
    }

    #[test]
    fn offset_wraps_both_ways() {
        let jia_zi = ALL_GANZHI[0];
        assert_eq!(jia_zi.offset(-1).label(), "癸亥");
        assert_eq!(jia_zi.offset(61).label(), "乙丑");
    }

    #[test]
    fn parse_pairs() {
        assert_eq!(GanZhi::parse("辛亥").map(|g| g.index()), Some(47));
        assert_eq!(GanZhi::parse("甲丑"), None);
        assert_eq!(GanZhi::parse("甲子乙"), None);
    }

    #[test]
    fn nayin_samples() {
        assert_eq!(ALL_GANZHI[0].nayin().name, "海中金");
        assert_eq!(ALL_GANZHI[1].nayin().name, "海中金");
        assert_eq!(GanZhi::parse("庚午").unwrap().nayin().name, "路旁土");
        assert_eq!(GanZhi::parse("癸亥").unwrap().nayin().element, Element::Water);
    }

    #[test]
    fn nayin_names_unique() {
        for (i, n) in NAYIN_TABLE.iter().enumerate() {
            assert!(NAYIN_TABLE[i + 1..].iter().all(|o| o.name != n.name));
        }
    }
}
