//! Branch combination frames and the combination detector.
//!
//! Three-harmony triads (三合) are spaced four apart on the ring; directional
//! meetings (三会) are three consecutive branches of one season. Two members
//! of a frame form a half combination. All three collapse into one full
//! combination.

use serde::Serialize;

use crate::branch::EarthlyBranch;
use crate::element::Element;
use crate::pillar::{ALL_CHART_POSITIONS, ChartPosition};

use EarthlyBranch::*;

/// 申子辰 水, 亥卯未 木, 寅午戌 火, 巳酉丑 金.
pub const TRIADS: [(Element, [EarthlyBranch; 3]); 4] = [
    (Element::Water, [Shen, Zi, Chen]),
    (Element::Wood, [Hai, Mao, Wei]),
    (Element::Fire, [Yin, Wu, Xu]),
    (Element::Metal, [Si, You, Chou]),
];

/// 寅卯辰 东方木, 巳午未 南方火, 申酉戌 西方金, 亥子丑 北方水.
pub const MEETINGS: [(Element, [EarthlyBranch; 3]); 4] = [
    (Element::Wood, [Yin, Mao, Chen]),
    (Element::Fire, [Si, Wu, Wei]),
    (Element::Metal, [Shen, You, Xu]),
    (Element::Water, [Hai, Zi, Chou]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationKind {
    /// 六合
    SixCombination,
    /// Two members of a 三合 triad.
    HalfTriad,
    /// All three members of a 三合 triad.
    FullTriad,
    /// Two members of a 三会 meeting.
    HalfMeeting,
    /// All three members of a 三会 meeting.
    FullMeeting,
}

impl CombinationKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SixCombination => "六合",
            Self::HalfTriad => "半合",
            Self::FullTriad => "三合",
            Self::HalfMeeting => "半会",
            Self::FullMeeting => "三会",
        }
    }

    pub const fn is_full(self) -> bool {
        matches!(self, Self::FullTriad | Self::FullMeeting)
    }
}

/// A complete triad or meeting found among a set of branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullFrame {
    pub kind: CombinationKind,
    pub element: Element,
    pub members: [EarthlyBranch; 3],
}

impl FullFrame {
    pub fn contains(&self, b: EarthlyBranch) -> bool {
        self.members.contains(&b)
    }
}

/// Every triad or meeting whose three members all appear in `branches`.
pub fn full_frames(branches: &[EarthlyBranch]) -> Vec<FullFrame> {
    let present = |frame: &[EarthlyBranch; 3]| frame.iter().all(|b| branches.contains(b));
    let triads = TRIADS
        .iter()
        .filter(|(_, m)| present(m))
        .map(|&(element, members)| FullFrame {
            kind: CombinationKind::FullTriad,
            element,
            members,
        });
    let meetings = MEETINGS
        .iter()
        .filter(|(_, m)| present(m))
        .map(|&(element, members)| FullFrame {
            kind: CombinationKind::FullMeeting,
            element,
            members,
        });
    triads.chain(meetings).collect()
}

/// Pair-level combination between two distinct branches, six-combination
/// first.
pub fn pair_combination(a: EarthlyBranch, b: EarthlyBranch) -> Option<(CombinationKind, Element)> {
    if a == b {
        return None;
    }
    let (partner, element) = a.six_combination();
    if partner == b {
        return Some((CombinationKind::SixCombination, element));
    }
    if a.triad_element() == b.triad_element() {
        return Some((CombinationKind::HalfTriad, a.triad_element()));
    }
    if a.season_element() == b.season_element() {
        return Some((CombinationKind::HalfMeeting, a.season_element()));
    }
    None
}

/// One detected branch combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchCombination {
    pub kind: CombinationKind,
    pub element: Element,
    pub branches: Vec<EarthlyBranch>,
    pub positions: Vec<ChartPosition>,
    pub description: String,
}

/// Detect branch combinations, slots taken in chart order.
///
/// A full frame suppresses the half combinations made of its own members.
/// Six-combinations are always reported.
pub fn detect_branch_combinations(branches: &[EarthlyBranch]) -> Vec<BranchCombination> {
    let frames = full_frames(branches);
    let mut out = Vec::new();

    for frame in &frames {
        let positions = branches
            .iter()
            .zip(ALL_CHART_POSITIONS)
            .filter(|(b, _)| frame.contains(**b))
            .map(|(_, p)| p)
            .collect();
        let [x, y, z] = frame.members;
        out.push(BranchCombination {
            kind: frame.kind,
            element: frame.element,
            branches: frame.members.to_vec(),
            positions,
            description: format!("{x}{y}{z}{}{}局", frame.kind.name(), frame.element.glyph()),
        });
    }

    for (i, &a) in branches.iter().enumerate() {
        for (j, &b) in branches.iter().enumerate().skip(i + 1) {
            let Some((kind, element)) = pair_combination(a, b) else {
                continue;
            };
            let absorbed = !matches!(kind, CombinationKind::SixCombination)
                && frames.iter().any(|f| f.contains(a) && f.contains(b));
            if absorbed {
                continue;
            }
            out.push(BranchCombination {
                kind,
                element,
                branches: vec![a, b],
                positions: vec![ALL_CHART_POSITIONS[i], ALL_CHART_POSITIONS[j]],
                description: format!("{a}{b}{}化{}", kind.name(), element.glyph()),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::ALL_BRANCHES;

    #[test]
    fn each_branch_in_one_triad_and_one_meeting() {
        for b in ALL_BRANCHES {
            assert_eq!(TRIADS.iter().filter(|(_, m)| m.contains(&b)).count(), 1);
            assert_eq!(MEETINGS.iter().filter(|(_, m)| m.contains(&b)).count(), 1);
        }
    }

    #[test]
    fn frame_elements_match_branch_tables() {
        for (e, m) in TRIADS {
            assert!(m.iter().all(|b| b.triad_element() == e));
        }
        for (e, m) in MEETINGS {
            assert!(m.iter().all(|b| b.season_element() == e));
        }
    }

    #[test]
    fn pair_combination_is_symmetric() {
        for a in ALL_BRANCHES {
            for b in ALL_BRANCHES {
                assert_eq!(pair_combination(a, b), pair_combination(b, a));
            }
        }
    }

    #[test]
    fn six_combination_wins_over_meeting() {
        assert_eq!(
            pair_combination(Zi, Chou),
            Some((CombinationKind::SixCombination, Element::Earth))
        );
    }

    #[test]
    fn full_triad_absorbs_halves() {
        let found = detect_branch_combinations(&[Shen, Zi, Chen, Wu]);
        let full: Vec<_> = found.iter().filter(|c| c.kind.is_full()).collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].element, Element::Water);
        assert!(found.iter().all(|c| c.kind != CombinationKind::HalfTriad));
    }

    #[test]
    fn meeting_keeps_six_combination() {
        let found = detect_branch_combinations(&[Hai, Zi, Chou, Wu]);
        assert_eq!(found.iter().filter(|c| c.kind == CombinationKind::FullMeeting).count(), 1);
        assert_eq!(found.iter().filter(|c| c.kind == CombinationKind::SixCombination).count(), 1);
        assert!(found.iter().all(|c| c.kind != CombinationKind::HalfMeeting));
    }

    #[test]
    fn no_frames_in_plain_chart() {
        // 午午亥未: 午未 six-combination, 亥未 half triad
        let found = detect_branch_combinations(&[Wu, Wu, Hai, Wei]);
        assert!(full_frames(&[Wu, Wu, Hai, Wei]).is_empty());
        assert_eq!(found.iter().filter(|c| c.kind == CombinationKind::SixCombination).count(), 2);
        assert_eq!(found.iter().filter(|c| c.kind == CombinationKind::HalfTriad).count(), 1);
    }
}
