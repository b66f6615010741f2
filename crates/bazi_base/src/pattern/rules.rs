//! Pattern rule table: one base rule and ordered variants per ten god.
//!
//! A variant applies when every ten god in its condition is among the
//! supporting set. The first applicable variant wins.

use crate::ten_god::TenGod;
use crate::ten_god::TenGod::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternVariant {
    pub condition: &'static [TenGod],
    pub rule: PatternRule,
}

impl PatternVariant {
    pub fn applies(&self, supporting: &[TenGod]) -> bool {
        self.condition.iter().all(|tg| supporting.contains(tg))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRuleSet {
    pub ten_god: TenGod,
    pub base: PatternRule,
    pub variants: &'static [PatternVariant],
}

impl PatternRuleSet {
    /// First applicable variant, else the base rule.
    pub fn resolve(&self, supporting: &[TenGod]) -> PatternRule {
        self.variants
            .iter()
            .find(|v| v.applies(supporting))
            .map_or(self.base, |v| v.rule)
    }
}

const fn rule(name: &'static str, description: &'static str) -> PatternRule {
    PatternRule { name, description }
}

const fn variant(
    condition: &'static [TenGod],
    name: &'static str,
    description: &'static str,
) -> PatternVariant {
    PatternVariant {
        condition,
        rule: rule(name, description),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

const BI_JIAN: PatternRuleSet = PatternRuleSet {
    ten_god: BiJian,
    base: rule("比肩格", "比肩当令，自立自强，重视合作与平等"),
    variants: &[
        variant(&[ShiShen], "比肩生食格", "比肩泄秀于食神，才华得以施展"),
        variant(&[QiSha], "比肩敌杀格", "比肩帮身抗杀，遇压力愈挫愈勇"),
        variant(&[ZhengCai], "比劫争财格", "比肩与正财并见，财务需防分夺"),
    ],
};

const JIE_CAI: PatternRuleSet = PatternRuleSet {
    ten_god: JieCai,
    base: rule("劫财格", "劫财当令，行动果敢，善于竞争"),
    variants: &[
        variant(&[QiSha], "羊刃驾杀格", "劫财得七杀制伏，刚柔相济，能成大事"),
        variant(&[ZhengGuan], "劫财见官格", "劫财受正官约束，冲动得以收敛"),
        variant(&[ShangGuan], "劫财生伤格", "劫财化为伤官，锋芒转为创造"),
        variant(&[PianCai], "比劫夺财格", "劫财与偏财并见，钱财易聚易散"),
    ],
};

const SHI_SHEN: PatternRuleSet = PatternRuleSet {
    ten_god: ShiShen,
    base: rule("食神格", "食神秀气，温和聪慧，享受生活"),
    variants: &[
        variant(&[QiSha], "食神制杀格", "食神制伏七杀，化压力为权威"),
        variant(&[PianYin], "枭神夺食格", "偏印克制食神，才华易受阻滞"),
        variant(&[ZhengCai], "食神生财格", "食神生财，凭才艺技能致富"),
        variant(&[PianCai], "食神生财格", "食神生财，凭才艺技能致富"),
    ],
};

const SHANG_GUAN: PatternRuleSet = PatternRuleSet {
    ten_god: ShangGuan,
    base: rule("伤官格", "伤官吐秀，才华横溢，个性鲜明"),
    variants: &[
        variant(&[ZhengYin], "伤官配印格", "伤官得印制化，才华而有节制"),
        variant(&[ZhengGuan], "伤官见官格", "伤官克官，需防口舌是非与规则冲突"),
        variant(&[ZhengCai], "伤官生财格", "伤官生财，善于将创意转化为收益"),
        variant(&[PianCai], "伤官生财格", "伤官生财，善于将创意转化为收益"),
    ],
};

const PIAN_CAI: PatternRuleSet = PatternRuleSet {
    ten_god: PianCai,
    base: rule("偏财格", "偏财当令，慷慨豪爽，善于把握机会"),
    variants: &[
        variant(&[ShiShen, QiSha], "食神生财滋杀格", "食神生财，财滋七杀，富贵兼得"),
        variant(&[ShiShen], "食神生财格", "食神生偏财，财源由才华而来"),
        variant(&[QiSha], "财滋七杀格", "偏财生七杀，财多身弱时压力倍增"),
        variant(&[JieCai], "比劫夺财格", "劫财分夺偏财，投资需谨慎"),
    ],
};

const ZHENG_CAI: PatternRuleSet = PatternRuleSet {
    ten_god: ZhengCai,
    base: rule("正财格", "正财当令，勤俭踏实，财源稳定"),
    variants: &[
        variant(&[ZhengGuan, ZhengYin], "财官印全格", "财生官，官生印，层层相生，格局清贵"),
        variant(&[ZhengGuan], "财官双美格", "正财生正官，名利双收"),
        variant(&[ShiShen], "食神生财格", "食神生正财，凭稳健经营致富"),
        variant(&[BiJian], "财逢比劫格", "比肩分财，合作中需明确权责"),
    ],
};

const QI_SHA: PatternRuleSet = PatternRuleSet {
    ten_god: QiSha,
    base: rule("七杀格", "七杀当令，魄力十足，敢于挑战"),
    variants: &[
        variant(&[ShiShen], "食神制杀格", "食神制杀，化凶为权，能掌大任"),
        variant(&[ZhengYin], "杀印相生格", "七杀生印，印生日主，权威与学识并重"),
        variant(&[PianYin], "杀印相生格", "七杀生印，印生日主，权威与学识并重"),
        variant(&[PianCai], "财滋七杀格", "财星滋杀，压力与机遇并存"),
    ],
};

const ZHENG_GUAN: PatternRuleSet = PatternRuleSet {
    ten_god: ZhengGuan,
    base: rule("正官格", "正官当令，端正守礼，利于仕途"),
    variants: &[
        variant(&[ZhengCai, ZhengYin], "财官印全格", "财生官，官生印，层层相生，格局清贵"),
        variant(&[ZhengYin], "官印相生格", "正官生印，名望与学识相辅相成"),
        variant(&[ZhengCai], "财官双美格", "正财生正官，名利双收"),
        variant(&[ShangGuan], "伤官见官格", "伤官克官，需防口舌是非与规则冲突"),
    ],
};

const PIAN_YIN: PatternRuleSet = PatternRuleSet {
    ten_god: PianYin,
    base: rule("偏印格", "偏印当令，思维独特，长于钻研"),
    variants: &[
        variant(&[ShiShen], "枭神夺食格", "偏印克食神，宜专注一技，避免多变"),
        variant(&[QiSha], "杀印相生格", "七杀生偏印，于逆境中成就专长"),
        variant(&[PianCai], "偏财制枭格", "偏财制偏印，化孤僻为务实"),
    ],
};

const ZHENG_YIN: PatternRuleSet = PatternRuleSet {
    ten_god: ZhengYin,
    base: rule("正印格", "正印当令，仁厚好学，得长辈庇护"),
    variants: &[
        variant(&[ZhengGuan], "官印相生格", "正官生印，名望与学识相辅相成"),
        variant(&[QiSha], "杀印相生格", "七杀生印，印生日主，权威与学识并重"),
        variant(&[ShangGuan], "伤官配印格", "印制伤官，才华而有节制"),
        variant(&[ZhengCai], "财星坏印格", "正财克印，学业与财务难以兼顾"),
    ],
};

/// Rule set for a ten god. Total over all ten.
pub const fn rule_set(ten_god: TenGod) -> &'static PatternRuleSet {
    match ten_god {
        BiJian => &BI_JIAN,
        JieCai => &JIE_CAI,
        ShiShen => &SHI_SHEN,
        ShangGuan => &SHANG_GUAN,
        PianCai => &PIAN_CAI,
        ZhengCai => &ZHENG_CAI,
        QiSha => &QI_SHA,
        ZhengGuan => &ZHENG_GUAN,
        PianYin => &PIAN_YIN,
        ZhengYin => &ZHENG_YIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ten_god::ALL_TEN_GODS;

    #[test]
    fn table_is_keyed_by_its_own_ten_god() {
        for tg in ALL_TEN_GODS {
            assert_eq!(rule_set(tg).ten_god, tg);
        }
    }

    #[test]
    fn empty_support_resolves_to_base() {
        for tg in ALL_TEN_GODS {
            let set = rule_set(tg);
            assert_eq!(set.resolve(&[]), set.base);
        }
    }

    #[test]
    fn variant_needs_every_condition_member() {
        let set = rule_set(ZhengGuan);
        assert_eq!(set.resolve(&[ZhengCai]).name, "财官双美格");
        assert_eq!(set.resolve(&[ZhengYin, ZhengCai]).name, "财官印全格");
        assert_eq!(set.resolve(&[ZhengYin]).name, "官印相生格");
    }

    #[test]
    fn first_matching_variant_wins() {
        // Both 食神 and 偏印 are supporting; 制杀 is listed first.
        let set = rule_set(ShiShen);
        assert_eq!(set.resolve(&[PianYin, QiSha]).name, "食神制杀格");
    }

    #[test]
    fn unrelated_support_keeps_base() {
        assert_eq!(rule_set(QiSha).resolve(&[BiJian, JieCai]).name, "七杀格");
    }
}
