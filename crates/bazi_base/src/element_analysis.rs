//! Five-element tally, balance score and day-master strength.

use serde::Serialize;

use crate::element::{ALL_ELEMENTS, Element};
use crate::pillar::FourPillars;

/// Count per element, indexed by `Element::index()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ElementTally {
    pub wood: u32,
    pub fire: u32,
    pub earth: u32,
    pub metal: u32,
    pub water: u32,
}

impl ElementTally {
    pub fn get(&self, e: Element) -> u32 {
        match e {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
    }

    pub fn add(&mut self, e: Element) {
        match e {
            Element::Wood => self.wood += 1,
            Element::Fire => self.fire += 1,
            Element::Earth => self.earth += 1,
            Element::Metal => self.metal += 1,
            Element::Water => self.water += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wood + self.fire + self.earth + self.metal + self.water
    }

    /// Counts in enumeration order.
    pub fn counts(&self) -> [u32; 5] {
        ALL_ELEMENTS.map(|e| self.get(e))
    }
}

/// Tally the eight primary symbols, plus every hidden stem when asked.
pub fn tally_elements(pillars: &FourPillars, include_hidden: bool) -> ElementTally {
    let mut t = ElementTally::default();
    for p in pillars.iter() {
        t.add(p.stem.element());
        t.add(p.branch.element());
        if include_hidden {
            for hs in p.branch.hidden_stems() {
                t.add(hs.stem.element());
            }
        }
    }
    t
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementAnalysis {
    pub tally: ElementTally,
    pub strongest: Element,
    pub weakest: Element,
    pub missing: Vec<Element>,
    pub excessive: Vec<Element>,
    /// `100 − 20 × variance`, clamped to [0, 100]. Unrounded.
    pub balance: f64,
}

/// Distribution verdicts over a tally.
///
/// Strongest and weakest keep the first element reached in Wood..Water order
/// on ties.
pub fn analyze_elements(tally: ElementTally) -> ElementAnalysis {
    let counts = tally.counts();
    let mut strongest = Element::Wood;
    let mut weakest = Element::Wood;
    for e in ALL_ELEMENTS {
        if tally.get(e) > tally.get(strongest) {
            strongest = e;
        }
        if tally.get(e) < tally.get(weakest) {
            weakest = e;
        }
    }

    let mean = tally.total() as f64 / 5.0;
    let variance = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / 5.0;

    ElementAnalysis {
        tally,
        strongest,
        weakest,
        missing: ALL_ELEMENTS.into_iter().filter(|&e| tally.get(e) == 0).collect(),
        excessive: ALL_ELEMENTS.into_iter().filter(|&e| tally.get(e) > 2).collect(),
        balance: (100.0 - 20.0 * variance).clamp(0.0, 100.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMasterStrength {
    Strong,
    Medium,
    Weak,
}

impl DayMasterStrength {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strong => "身强",
            Self::Medium => "中和",
            Self::Weak => "身弱",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthAnalysis {
    pub day_master_element: Element,
    pub strength: DayMasterStrength,
    /// In [−100, 100].
    pub score: i32,
    /// Generator, then the element itself.
    pub supporting_elements: [Element; 2],
    /// Controller, then the controlled element.
    pub conflicting_elements: [Element; 2],
    pub recommended_elements: [Element; 2],
    pub recommendation: String,
}

/// Classify the day master by how many symbols share its element.
pub fn analyze_strength(pillars: &FourPillars, tally: &ElementTally) -> StrengthAnalysis {
    let el = pillars.day_master().element();
    let count = tally.get(el) as i32;

    let (strength, score) = match count {
        c if c >= 3 => (DayMasterStrength::Strong, 60 + 15 * (c - 3)),
        2 => (DayMasterStrength::Medium, 0),
        c => (DayMasterStrength::Weak, -60 + 30 * c),
    };

    let supporting = [el.generated_by(), el];
    let conflicting = [el.controlled_by(), el.controls()];
    let recommended = if strength == DayMasterStrength::Weak {
        supporting
    } else {
        conflicting
    };

    StrengthAnalysis {
        day_master_element: el,
        strength,
        score: score.clamp(-100, 100),
        supporting_elements: supporting,
        conflicting_elements: conflicting,
        recommended_elements: recommended,
        recommendation: format!("宜用{}、{}", recommended[0].glyph(), recommended[1].glyph()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pillar::{Gender, PillarOptions, build_four_pillars};
    use crate::sexagenary::GanZhi;

    fn chart(p: [&str; 4]) -> FourPillars {
        build_four_pillars(
            p.map(|s| GanZhi::parse(s).unwrap()),
            Gender::Male,
            PillarOptions::default(),
        )
    }

    #[test]
    fn tally_sums_to_eight() {
        let fp = chart(["庚午", "壬午", "辛亥", "乙未"]);
        let t = tally_elements(&fp, false);
        assert_eq!(t.total(), 8);
        assert_eq!(t.metal, 2);
        assert_eq!(t.fire, 2);
        assert_eq!(t.water, 2);
        assert_eq!(t.wood, 1);
        assert_eq!(t.earth, 1);
    }

    #[test]
    fn hidden_tally_adds_hidden_count() {
        let fp = chart(["庚午", "壬午", "辛亥", "乙未"]);
        let hidden: usize = fp.iter().map(|p| p.branch.hidden_stems().len()).sum();
        let t = tally_elements(&fp, true);
        assert_eq!(t.total() as usize, 8 + hidden);
    }

    #[test]
    fn ties_keep_first_in_order() {
        let fp = chart(["庚午", "壬午", "辛亥", "乙未"]);
        let a = analyze_elements(tally_elements(&fp, false));
        assert_eq!(a.strongest, Element::Fire);
        assert_eq!(a.weakest, Element::Wood);
        assert!(a.missing.is_empty());
        assert!(a.excessive.is_empty());
    }

    #[test]
    fn balance_formula() {
        // counts 2,2,1,2,1 → mean 1.6, variance 0.24
        let fp = chart(["庚午", "壬午", "辛亥", "乙未"]);
        let a = analyze_elements(tally_elements(&fp, false));
        assert!((a.balance - 95.2).abs() < 1e-9);
    }

    #[test]
    fn balance_clamps_at_zero() {
        let t = ElementTally {
            wood: 8,
            ..Default::default()
        };
        let a = analyze_elements(t);
        assert_eq!(a.balance, 0.0);
        assert_eq!(a.excessive, vec![Element::Wood]);
        assert_eq!(a.missing.len(), 4);
    }

    #[test]
    fn strength_bands() {
        let fp = chart(["庚午", "壬午", "辛亥", "乙未"]);
        let s = analyze_strength(&fp, &tally_elements(&fp, false));
        assert_eq!(s.strength, DayMasterStrength::Medium);
        assert_eq!(s.score, 0);
        assert_eq!(s.supporting_elements, [Element::Earth, Element::Metal]);
        assert_eq!(s.conflicting_elements, [Element::Fire, Element::Wood]);
        assert_eq!(s.recommended_elements, s.conflicting_elements);

        let t = ElementTally {
            metal: 8,
            ..Default::default()
        };
        assert_eq!(analyze_strength(&fp, &t).score, 100);
        let t = ElementTally {
            fire: 8,
            ..Default::default()
        };
        let weak = analyze_strength(&fp, &t);
        assert_eq!(weak.score, -60);
        assert_eq!(weak.recommended_elements, weak.supporting_elements);
    }
}
