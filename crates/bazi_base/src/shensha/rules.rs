//! The 33 marker rules.
//!
//! A rule maps the chart to a [`MarkerTarget`]: the stems, branches or whole
//! pillars that light the marker, and the chart slots allowed to carry them.
//! Detection against the observed symbols happens in the parent module.

use serde::Serialize;

use crate::branch::EarthlyBranch;
use crate::element::Element;
use crate::kuigang::kuigang_sub_type;
use crate::pillar::{ChartPosition, Gender, lu_branch};
use crate::sexagenary::GanZhi;
use crate::stem::HeavenlyStem;

use super::ShenShaInput;
use super::sets::{BranchSet, PillarSet, PositionSet, StemSet};

use EarthlyBranch as B;
use HeavenlyStem as S;

// ---------------------------------------------------------------------------
// Kinds and categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShenShaCategory {
    PeachBlossom,
    Nobleman,
    Power,
    Movement,
    Wealth,
    Blade,
    VoidHarm,
    Solitary,
    Special,
}

impl ShenShaCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::PeachBlossom => "桃花星",
            Self::Nobleman => "贵人星",
            Self::Power => "权势星",
            Self::Movement => "变动星",
            Self::Wealth => "财禄星",
            Self::Blade => "刃煞",
            Self::VoidHarm => "空亡劫害",
            Self::Solitary => "孤独煞",
            Self::Special => "特殊煞",
        }
    }

    pub const fn is_auspicious(self) -> bool {
        matches!(
            self,
            Self::PeachBlossom | Self::Nobleman | Self::Power | Self::Movement | Self::Wealth
        )
    }
}

/// One named marker (神煞).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShenShaKind {
    HongLuan,
    TianXi,
    MuYu,
    XianChi,
    HongYan,
    TianYi,
    TianDe,
    TianDeHe,
    YueDe,
    YueDeHe,
    TaiJi,
    SanQi,
    WenChang,
    GuoYin,
    JiangXing,
    HuaGai,
    JinYu,
    XueTang,
    CiGuan,
    YiMa,
    LuShen,
    YangRen,
    KongWang,
    WangShen,
    JieSha,
    ZaiSha,
    GuChen,
    GuaSu,
    YuanChen,
    TianLuoDiWang,
    BaiHu,
    ShiEDaBai,
    KuiGang,
}

/// Rule order; records are emitted in this order.
pub const ALL_SHENSHA: [ShenShaKind; 33] = {
    use ShenShaKind::*;
    [
        HongLuan, TianXi, MuYu, XianChi, HongYan, TianYi, TianDe, TianDeHe, YueDe, YueDeHe,
        TaiJi, SanQi, WenChang, GuoYin, JiangXing, HuaGai, JinYu, XueTang, CiGuan, YiMa, LuShen,
        YangRen, KongWang, WangShen, JieSha, ZaiSha, GuChen, GuaSu, YuanChen, TianLuoDiWang,
        BaiHu, ShiEDaBai, KuiGang,
    ]
};

impl ShenShaKind {
    pub const fn name(self) -> &'static str {
        use ShenShaKind::*;
        match self {
            HongLuan => "红鸾",
            TianXi => "天喜",
            MuYu => "沐浴",
            XianChi => "咸池",
            HongYan => "红艳",
            TianYi => "天乙贵人",
            TianDe => "天德贵人",
            TianDeHe => "天德合",
            YueDe => "月德贵人",
            YueDeHe => "月德合",
            TaiJi => "太极贵人",
            SanQi => "三奇贵人",
            WenChang => "文昌贵人",
            GuoYin => "国印贵人",
            JiangXing => "将星",
            HuaGai => "华盖",
            JinYu => "金舆",
            XueTang => "学堂",
            CiGuan => "词馆",
            YiMa => "驿马",
            LuShen => "禄神",
            YangRen => "羊刃",
            KongWang => "空亡",
            WangShen => "亡神",
            JieSha => "劫煞",
            ZaiSha => "灾煞",
            GuChen => "孤辰",
            GuaSu => "寡宿",
            YuanChen => "元辰",
            TianLuoDiWang => "天罗地网",
            BaiHu => "白虎煞",
            ShiEDaBai => "十恶大败",
            KuiGang => "魁罡",
        }
    }

    pub const fn category(self) -> ShenShaCategory {
        use ShenShaCategory as C;
        use ShenShaKind::*;
        match self {
            HongLuan | TianXi | MuYu | XianChi | HongYan => C::PeachBlossom,
            TianYi | TianDe | TianDeHe | YueDe | YueDeHe | TaiJi | SanQi | WenChang | GuoYin => {
                C::Nobleman
            }
            JiangXing | HuaGai | JinYu | XueTang | CiGuan => C::Power,
            YiMa => C::Movement,
            LuShen => C::Wealth,
            YangRen => C::Blade,
            KongWang | WangShen | JieSha | ZaiSha => C::VoidHarm,
            GuChen | GuaSu | YuanChen => C::Solitary,
            TianLuoDiWang | BaiHu | ShiEDaBai | KuiGang => C::Special,
        }
    }

    /// Fixed reading. `SanQi` is prefixed by its sub-type when rendered.
    pub const fn description(self) -> &'static str {
        use ShenShaKind::*;
        match self {
            HongLuan => "红鸾主婚姻喜庆，感情运佳",
            TianXi => "天喜主喜庆事件，人缘良好",
            MuYu => "沐浴主聪明俊美，但易有桃花纠纷",
            XianChi => "咸池主桃花运旺，异性缘佳",
            HongYan => "红艳主异性缘强，容易有感情纠葛",
            TianYi => "天乙贵人主逢凶化吉，有贵人相助",
            TianDe => "天德贵人主德行高尚，福德深厚，逢凶化吉",
            TianDeHe => "天德合主与天德贵人相得益彰，增强福德力量",
            YueDe => "月德贵人主福德深厚，月德所临之地皆为吉祥之所",
            YueDeHe => "月德合主与月德贵人相合，福德力量倍增",
            TaiJi => "太极贵人主聪明好学，善于钻研玄学，逢凶化吉",
            SanQi => "主智慧超群，文武双全，能化险为夷",
            WenChang => "文昌贵人主聪明好学，文思敏捷，利于考试读书",
            GuoYin => "国印贵人主官运亨通，有权威地位，能得上级提拔",
            JiangXing => "将星主有领导才能，能统率众人，适合军警政界",
            HuaGai => "华盖主聪明孤高，善于艺术宗教，但易孤独",
            JinYu => "金舆主富贵荣华，乘坐华车，生活优渥",
            XueTang => "学堂主好学深造，学业有成，智慧过人",
            CiGuan => "词馆主文笔优美，才华横溢，适合文学创作",
            YiMa => "驿马主奔波走动，变化较多，利于外出发展",
            LuShen => "禄神主衣食不愁，财源稳定，有一定社会地位",
            YangRen => "羊刃主性格刚烈，易有血光之灾，但也主勇敢果断",
            KongWang => "空亡主虚空不实，易有挫折，但也主超脱世俗",
            WangShen => "亡神主破败消耗，易有意外损失，需谨慎防范",
            JieSha => "劫煞主破财损物，易遇盗贼，需注意财物安全",
            ZaiSha => "灾煞主疾病灾祸，身体健康需多加注意",
            GuChen => "孤辰主孤独少合，男命不利婚姻，性格内向",
            GuaSu => "寡宿主孤独少合，女命不利婚姻，易守寡",
            YuanChen => "元辰主暗昧不明，易有小人是非，运势不稳",
            TianLuoDiWang => "天罗地网主困顿阻滞，诸事难以伸展",
            BaiHu => "白虎煞主血光之灾，易有外伤手术，需谨慎防范",
            ShiEDaBai => "十恶大败主运势极凶，诸事不利，但过后必有转机",
            KuiGang => "魁罡主性格刚烈果断，有领导能力但易孤独",
        }
    }
}

impl std::fmt::Display for ShenShaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reading for a detected marker, specialised by sub-type where one exists.
pub fn render_description(kind: ShenShaKind, sub_type: Option<&str>) -> String {
    match (kind, sub_type) {
        (ShenShaKind::SanQi, Some(sub)) => format!("{sub}{}", kind.description()),
        (ShenShaKind::SanQi, None) => format!("{}{}", kind.name(), kind.description()),
        (ShenShaKind::TianLuoDiWang, Some("天罗")) => "天罗主困顿不通，火土命人最忌".to_string(),
        (ShenShaKind::TianLuoDiWang, Some("地网")) => "地网主阻滞不利，水金命人最忌".to_string(),
        (ShenShaKind::KuiGang, Some(sub)) => format!("{}，{sub}", kind.description()),
        _ => kind.description().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// What a rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerTarget {
    pub branches: BranchSet,
    pub stems: StemSet,
    pub pillars: PillarSet,
    /// Slots the rule may fire at, before the chart-wide position policy.
    pub scope: PositionSet,
    pub sub_type: Option<&'static str>,
}

impl MarkerTarget {
    fn branches(branches: BranchSet) -> Self {
        Self {
            branches,
            scope: PositionSet::ALL,
            ..Default::default()
        }
    }

    fn branch(b: EarthlyBranch) -> Self {
        Self::branches(BranchSet::single(b))
    }

    fn stems(stems: StemSet) -> Self {
        Self {
            stems,
            scope: PositionSet::ALL,
            ..Default::default()
        }
    }

    fn pillars(pillars: PillarSet, scope: PositionSet) -> Self {
        Self {
            pillars,
            scope,
            ..Default::default()
        }
    }

    fn scoped(mut self, scope: PositionSet) -> Self {
        self.scope = scope;
        self
    }

    fn with_sub_type(mut self, sub: &'static str) -> Self {
        self.sub_type = Some(sub);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.stems.is_empty() && self.pillars.is_empty()
    }

    /// Does the symbol pair sitting at `at` hit this target?
    pub fn hits(&self, at: ChartPosition, gz: GanZhi) -> bool {
        self.scope.contains(at)
            && (self.branches.contains(gz.branch)
                || self.stems.contains(gz.stem)
                || self.pillars.contains(gz))
    }
}

const PERIODS: PositionSet =
    PositionSet::of(&[ChartPosition::DecadePeriod, ChartPosition::AnnualPeriod]);

/// Resolve one rule against the chart.
pub fn target(kind: ShenShaKind, input: &ShenShaInput) -> MarkerTarget {
    use ShenShaKind::*;

    let year = input.natal[0];
    let month = input.natal[1];
    let day = input.natal[2];
    let dm = day.stem;

    match kind {
        HongLuan => MarkerTarget::branch(hong_luan(year.branch)),
        TianXi => MarkerTarget::branch(hong_luan(year.branch).clash()),
        MuYu => MarkerTarget::branch(mu_yu(dm)),
        XianChi => MarkerTarget::branch(xian_chi(year.branch)),
        HongYan => MarkerTarget::branch(hong_yan(dm)),
        TianYi => MarkerTarget::branches(tian_yi(dm)),
        TianDe => MarkerTarget::stems(StemSet::single(tian_de(year.stem)))
            .scoped(PERIODS.with(ChartPosition::Month)),
        TianDeHe => MarkerTarget::stems(StemSet::single(tian_de(year.stem).combination().0)),
        YueDe => MarkerTarget::stems(StemSet::single(yue_de(month.branch))),
        YueDeHe => MarkerTarget::stems(StemSet::single(yue_de(month.branch).combination().0)),
        TaiJi => MarkerTarget::branches(tai_ji(dm)),
        SanQi => san_qi(input),
        WenChang => MarkerTarget::branch(wen_chang(dm)),
        GuoYin => MarkerTarget::branch(guo_yin(dm)),
        JiangXing => {
            MarkerTarget::branch(triad_lookup(year.branch, [B::Zi, B::Mao, B::Wu, B::You]))
        }
        HuaGai => {
            MarkerTarget::branch(triad_lookup(year.branch, [B::Chen, B::Wei, B::Xu, B::Chou]))
        }
        JinYu => MarkerTarget::branch(jin_yu(dm)),
        XueTang => MarkerTarget::branch(xue_tang(dm)),
        CiGuan => MarkerTarget::stems(StemSet::single(dm.offset(6))),
        YiMa => MarkerTarget::branch(triad_lookup(year.branch, [B::Yin, B::Si, B::Shen, B::Hai])),
        LuShen => MarkerTarget::branch(lu_branch(dm)),
        YangRen => MarkerTarget::branch(yang_ren(dm)),
        KongWang => MarkerTarget::branches(BranchSet::of(&approximate_void_branches(day.branch))),
        WangShen => {
            MarkerTarget::branch(triad_lookup(year.branch, [B::Hai, B::Yin, B::Si, B::Shen]))
        }
        JieSha => MarkerTarget::branch(triad_lookup(year.branch, [B::Si, B::Shen, B::Hai, B::Yin])),
        ZaiSha => MarkerTarget::branch(triad_lookup(year.branch, [B::Wu, B::You, B::Zi, B::Mao])),
        GuChen => MarkerTarget::branch(gu_chen_gua_su(year.branch).0),
        GuaSu => MarkerTarget::branch(gu_chen_gua_su(year.branch).1),
        YuanChen => match input.gender {
            Some(Gender::Male) => MarkerTarget::branch(year.branch.offset(1)),
            Some(Gender::Female) => MarkerTarget::branch(year.branch.offset(-1)),
            None => MarkerTarget::default(),
        },
        TianLuoDiWang => tian_luo_di_wang(year),
        BaiHu => MarkerTarget::branch(year.branch.offset(1)),
        ShiEDaBai => MarkerTarget::pillars(
            PillarSet::of(&SHI_E_DA_BAI),
            PERIODS.with(ChartPosition::Day),
        ),
        KuiGang => kui_gang(input),
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Pick from `[water, wood, fire, metal]` by the three-harmony frame of `b`
/// (申子辰, 亥卯未, 寅午戌, 巳酉丑).
const fn triad_lookup(b: EarthlyBranch, table: [EarthlyBranch; 4]) -> EarthlyBranch {
    match b.triad_element() {
        Element::Water => table[0],
        Element::Wood => table[1],
        Element::Fire => table[2],
        _ => table[3],
    }
}

/// 子→卯, 丑→寅, … counting backwards from 卯.
fn hong_luan(year: EarthlyBranch) -> EarthlyBranch {
    B::Mao.offset(-(year.index() as i32))
}

const fn xian_chi(year: EarthlyBranch) -> EarthlyBranch {
    triad_lookup(year, [B::You, B::Zi, B::Mao, B::Wu])
}

const fn mu_yu(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Hai,
        S::Yi => B::Zi,
        S::Bing | S::Wu => B::Yin,
        S::Ding | S::Ji => B::Mao,
        S::Geng => B::Si,
        S::Xin => B::Wu,
        S::Ren => B::Shen,
        S::Gui => B::You,
    }
}

const fn hong_yan(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Wu,
        S::Yi | S::Gui => B::Shen,
        S::Bing => B::Yin,
        S::Ding => B::Wei,
        S::Wu | S::Ji => B::Chen,
        S::Geng => B::Xu,
        S::Xin => B::You,
        S::Ren => B::Zi,
    }
}

const fn tian_yi(dm: HeavenlyStem) -> BranchSet {
    match dm {
        S::Jia | S::Wu | S::Geng => BranchSet::of(&[B::Chou, B::Wei]),
        S::Yi | S::Ji => BranchSet::of(&[B::Zi, B::Shen]),
        S::Bing | S::Ding => BranchSet::of(&[B::Hai, B::You]),
        S::Xin => BranchSet::of(&[B::Yin, B::Wu]),
        S::Ren | S::Gui => BranchSet::of(&[B::Mao, B::Si]),
    }
}

/// Heavenly virtue stem keyed by the year stem's combination pair.
const fn tian_de(year: HeavenlyStem) -> HeavenlyStem {
    match year {
        S::Jia | S::Ji => S::Bing,
        S::Yi | S::Geng => S::Ding,
        S::Bing | S::Xin => S::Wu,
        S::Ding | S::Ren => S::Ji,
        S::Wu | S::Gui => S::Jia,
    }
}

/// Monthly virtue stem keyed by the month branch's three-harmony frame.
const fn yue_de(month: EarthlyBranch) -> HeavenlyStem {
    match month.triad_element() {
        Element::Fire => S::Bing,
        Element::Water => S::Ren,
        Element::Wood => S::Jia,
        _ => S::Geng,
    }
}

const fn tai_ji(dm: HeavenlyStem) -> BranchSet {
    match dm {
        S::Jia | S::Yi => BranchSet::of(&[B::Zi, B::Wu]),
        S::Bing | S::Ding => BranchSet::of(&[B::Mao, B::You]),
        S::Wu | S::Ji => BranchSet::of(&[B::Chen, B::Xu]),
        S::Geng | S::Xin => BranchSet::of(&[B::Chou, B::Wei]),
        S::Ren | S::Gui => BranchSet::of(&[B::Yin, B::Shen]),
    }
}

const fn wen_chang(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Si,
        S::Yi => B::Wu,
        S::Bing | S::Wu => B::Shen,
        S::Ding | S::Ji => B::You,
        S::Geng => B::Hai,
        S::Xin => B::Zi,
        S::Ren => B::Yin,
        S::Gui => B::Mao,
    }
}

const fn guo_yin(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Xu,
        S::Yi => B::Hai,
        S::Bing | S::Wu => B::Chou,
        S::Ding | S::Ji => B::Yin,
        S::Geng => B::Chen,
        S::Xin => B::Si,
        S::Ren => B::Wei,
        S::Gui => B::Shen,
    }
}

const fn jin_yu(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Chen,
        S::Yi => B::Si,
        S::Bing | S::Wu => B::Wei,
        S::Ding | S::Ji => B::Shen,
        S::Geng => B::Xu,
        S::Xin => B::Hai,
        S::Ren => B::Chou,
        S::Gui => B::Yin,
    }
}

/// Growth (长生) branch of the day stem.
const fn xue_tang(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Hai,
        S::Yi => B::Wu,
        S::Bing | S::Wu => B::Yin,
        S::Ding | S::Ji => B::You,
        S::Geng => B::Si,
        S::Xin => B::Zi,
        S::Ren => B::Shen,
        S::Gui => B::Mao,
    }
}

/// Every stem has a blade here, yin stems included.
const fn yang_ren(dm: HeavenlyStem) -> EarthlyBranch {
    match dm {
        S::Jia => B::Mao,
        S::Yi => B::Yin,
        S::Bing | S::Wu => B::Wu,
        S::Ding | S::Ji => B::Si,
        S::Geng => B::You,
        S::Xin => B::Shen,
        S::Ren => B::Zi,
        S::Gui => B::Hai,
    }
}

/// (孤辰, 寡宿) keyed by the seasonal frame of the year branch.
const fn gu_chen_gua_su(year: EarthlyBranch) -> (EarthlyBranch, EarthlyBranch) {
    match year.season_element() {
        Element::Water => (B::Yin, B::Xu),
        Element::Wood => (B::Si, B::Chou),
        Element::Fire => (B::Shen, B::Chen),
        _ => (B::Hai, B::Wei),
    }
}

const SHI_E_DA_BAI: [GanZhi; 10] = [
    GanZhi { stem: S::Jia, branch: B::Chen },
    GanZhi { stem: S::Yi, branch: B::Si },
    GanZhi { stem: S::Bing, branch: B::Shen },
    GanZhi { stem: S::Ding, branch: B::Hai },
    GanZhi { stem: S::Wu, branch: B::Xu },
    GanZhi { stem: S::Ji, branch: B::Chou },
    GanZhi { stem: S::Geng, branch: B::Chen },
    GanZhi { stem: S::Xin, branch: B::Si },
    GanZhi { stem: S::Ren, branch: B::Shen },
    GanZhi { stem: S::Gui, branch: B::Hai },
];

const SAN_QI: [(&str, [HeavenlyStem; 3]); 3] = [
    ("天上三奇", [S::Jia, S::Wu, S::Geng]),
    ("地下三奇", [S::Yi, S::Bing, S::Ding]),
    ("人中三奇", [S::Ren, S::Gui, S::Xin]),
];

/// First trio whose three stems all appear at enabled positions.
fn san_qi(input: &ShenShaInput) -> MarkerTarget {
    let seen = StemSet::of(
        &input
            .observed()
            .map(|(_, gz)| gz.stem)
            .collect::<Vec<_>>(),
    );
    SAN_QI
        .iter()
        .find(|(_, trio)| StemSet::of(trio).is_subset_of(seen))
        .map(|&(sub, trio)| MarkerTarget::stems(StemSet::of(&trio)).with_sub_type(sub))
        .unwrap_or_default()
}

const KUI_GANG: [GanZhi; 4] = [
    GanZhi { stem: S::Geng, branch: B::Chen },
    GanZhi { stem: S::Geng, branch: B::Xu },
    GanZhi { stem: S::Ren, branch: B::Chen },
    GanZhi { stem: S::Wu, branch: B::Xu },
];

/// The four KuiGang pairs on the day pillar or a period pillar. The
/// sub-type is taken from the first such slot.
fn kui_gang(input: &ShenShaInput) -> MarkerTarget {
    let scope = PERIODS.with(ChartPosition::Day);
    input
        .observed()
        .filter(|(at, _)| scope.contains(*at))
        .find_map(|(_, gz)| kuigang_sub_type(gz))
        .map(|sub| MarkerTarget::pillars(PillarSet::of(&KUI_GANG), scope).with_sub_type(sub.name()))
        .unwrap_or_default()
}

/// 天罗 (戌亥) for a fire or earth year NaYin, 地网 (辰巳) for water or metal.
fn tian_luo_di_wang(year: GanZhi) -> MarkerTarget {
    let scope = PERIODS.with(ChartPosition::Year);
    match year.nayin().element {
        Element::Fire | Element::Earth => MarkerTarget::branches(BranchSet::of(&[B::Xu, B::Hai]))
            .scoped(scope)
            .with_sub_type("天罗"),
        Element::Water | Element::Metal => MarkerTarget::branches(BranchSet::of(&[B::Chen, B::Si]))
            .scoped(scope)
            .with_sub_type("地网"),
        Element::Wood => MarkerTarget::default(),
    }
}

// ---------------------------------------------------------------------------
// Void (空亡)
// ---------------------------------------------------------------------------

/// Void branches from the day branch alone, in pairs of branches:
/// 子丑寅卯 → 戌亥, 辰巳午未 → 寅卯, 申酉戌亥 → 午未.
///
/// This approximates the decade rule and disagrees with
/// [`precise_void_branches`] for most days. Detection uses it.
pub const fn approximate_void_branches(day: EarthlyBranch) -> [EarthlyBranch; 2] {
    match (day.index() / 2) * 2 {
        0 | 2 => [B::Xu, B::Hai],
        4 | 6 => [B::Yin, B::Mao],
        _ => [B::Wu, B::Wei],
    }
}

/// Exact void branches: the two branches left unpaired by the ten-day
/// decade (旬) containing `day`.
pub fn precise_void_branches(day: GanZhi) -> [EarthlyBranch; 2] {
    let head = day.offset(-((day.index() % 10) as i32));
    [head.branch.offset(10), head.branch.offset(11)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::ALL_BRANCHES;
    use crate::sexagenary::ALL_GANZHI;
    use crate::stem::ALL_STEMS;

    fn gz(s: &str) -> GanZhi {
        GanZhi::parse(s).unwrap()
    }

    #[test]
    fn thirty_three_rules_in_nine_categories() {
        assert_eq!(ALL_SHENSHA.len(), 33);
        let peach = ALL_SHENSHA
            .iter()
            .filter(|k| k.category() == ShenShaCategory::PeachBlossom)
            .count();
        let noble = ALL_SHENSHA
            .iter()
            .filter(|k| k.category() == ShenShaCategory::Nobleman)
            .count();
        assert_eq!(peach, 5);
        assert_eq!(noble, 9);
    }

    #[test]
    fn hong_luan_and_tian_xi_face_each_other() {
        assert_eq!(hong_luan(B::Zi), B::Mao);
        assert_eq!(hong_luan(B::Chen), B::Hai);
        assert_eq!(hong_luan(B::Hai), B::Chen);
        for b in ALL_BRANCHES {
            assert_eq!(hong_luan(b).clash().index(), (9 + 12 - b.index()) % 12);
        }
    }

    #[test]
    fn triad_tables() {
        assert_eq!(xian_chi(B::Shen), B::You);
        assert_eq!(xian_chi(B::Hai), B::Zi);
        assert_eq!(xian_chi(B::Wu), B::Mao);
        assert_eq!(xian_chi(B::Chou), B::Wu);
        assert_eq!(triad_lookup(B::Zi, [B::Yin, B::Si, B::Shen, B::Hai]), B::Yin);
        assert_eq!(triad_lookup(B::You, [B::Yin, B::Si, B::Shen, B::Hai]), B::Hai);
    }

    #[test]
    fn virtue_stems() {
        assert_eq!(tian_de(S::Geng), S::Ding);
        assert_eq!(tian_de(S::Gui), S::Jia);
        assert_eq!(yue_de(B::Wu), S::Bing);
        assert_eq!(yue_de(B::Chou), S::Geng);
        // 天德合 partners
        assert_eq!(tian_de(S::Geng).combination().0, S::Ren);
    }

    #[test]
    fn every_stem_has_a_target_in_each_day_table() {
        for s in ALL_STEMS {
            assert!(!tian_yi(s).is_empty());
            assert!(!tai_ji(s).is_empty());
            // both tables sit on the growth branch for yang stems
            if s.is_yang() {
                assert_eq!(xue_tang(s), mu_yu(s), "{s}");
            }
        }
    }

    #[test]
    fn gu_chen_gua_su_by_season() {
        assert_eq!(gu_chen_gua_su(B::Zi), (B::Yin, B::Xu));
        assert_eq!(gu_chen_gua_su(B::Chen), (B::Si, B::Chou));
        assert_eq!(gu_chen_gua_su(B::Wei), (B::Shen, B::Chen));
        assert_eq!(gu_chen_gua_su(B::Xu), (B::Hai, B::Wei));
    }

    #[test]
    fn approximate_void_groups() {
        assert_eq!(approximate_void_branches(B::Zi), [B::Xu, B::Hai]);
        assert_eq!(approximate_void_branches(B::Mao), [B::Xu, B::Hai]);
        assert_eq!(approximate_void_branches(B::Chen), [B::Yin, B::Mao]);
        assert_eq!(approximate_void_branches(B::Hai), [B::Wu, B::Wei]);
    }

    #[test]
    fn precise_void_follows_decades() {
        assert_eq!(precise_void_branches(gz("甲子")), [B::Xu, B::Hai]);
        assert_eq!(precise_void_branches(gz("癸酉")), [B::Xu, B::Hai]);
        assert_eq!(precise_void_branches(gz("甲戌")), [B::Shen, B::You]);
        assert_eq!(precise_void_branches(gz("辛亥")), [B::Yin, B::Mao]);
        assert_eq!(precise_void_branches(gz("癸亥")), [B::Zi, B::Chou]);
        // void branches never appear inside their own decade
        for day in ALL_GANZHI {
            let void = precise_void_branches(day);
            let head = day.index() - day.index() % 10;
            for i in head..head + 10 {
                let member = ALL_GANZHI[i as usize].branch;
                assert!(!void.contains(&member));
            }
        }
    }

    #[test]
    fn known_limitation_heuristic_differs_from_decade_rule() {
        // 甲戌 sits in the 甲戌 decade (void 申酉) but the heuristic says 午未
        assert_eq!(approximate_void_branches(B::Xu), [B::Wu, B::Wei]);
        assert_ne!(
            approximate_void_branches(B::Xu),
            precise_void_branches(gz("甲戌"))
        );
    }

    #[test]
    fn descriptions_render_sub_types() {
        assert_eq!(
            render_description(ShenShaKind::SanQi, Some("天上三奇")),
            "天上三奇主智慧超群，文武双全，能化险为夷"
        );
        assert!(render_description(ShenShaKind::KuiGang, Some("绝夫罡")).ends_with("，绝夫罡"));
        assert!(render_description(ShenShaKind::TianLuoDiWang, Some("地网")).starts_with("地网"));
        assert_eq!(
            render_description(ShenShaKind::HongLuan, None),
            ShenShaKind::HongLuan.description()
        );
    }

    #[test]
    fn hits_respect_scope() {
        let t = MarkerTarget::branch(B::Zi).scoped(PositionSet::of(&[ChartPosition::Day]));
        assert!(t.hits(ChartPosition::Day, gz("甲子")));
        assert!(!t.hits(ChartPosition::Year, gz("甲子")));
        assert!(!t.hits(ChartPosition::Day, gz("乙丑")));
        assert!(MarkerTarget::default().is_empty());
    }
}
