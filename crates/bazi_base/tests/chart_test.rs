//! Chart-level scenarios over fixed pillars.

use bazi_base::relationship::RelationKind;
use bazi_base::{
    Element, FourPillars, GanZhi, Gender, HeavenlyStem, PeriodDirection, PillarOptions, TenGod,
    analyze_relationships, analyze_ten_gods, build_four_pillars, major_periods,
};

fn chart(pairs: [&str; 4], gender: Gender) -> FourPillars {
    build_four_pillars(
        pairs.map(|s| GanZhi::parse(s).unwrap()),
        gender,
        PillarOptions::default(),
    )
}

/// 庚午 壬午 辛亥 乙未: 辛 metal day master, ten gods read off the table.
#[test]
fn scenario_day_master_and_ten_gods() {
    let fp = chart(["庚午", "壬午", "辛亥", "乙未"], Gender::Male);
    assert_eq!(fp.day_master(), HeavenlyStem::Xin);
    assert_eq!(fp.day_master().element(), Element::Metal);

    let tg = analyze_ten_gods(&fp);
    assert_eq!(tg.year.ten_god, TenGod::JieCai);
    assert_eq!(tg.month.ten_god, TenGod::ShangGuan);
    assert_eq!(tg.hour.ten_god, TenGod::PianCai);
    assert!(tg.day.is_day_master);
    assert_eq!(tg.year.name, "劫财");
    assert_eq!(tg.year.simplified, "劫");
}

/// A yang year stem walks forward for a male and backward for a female.
#[test]
fn scenario_direction_by_gender() {
    let male = chart(["庚午", "壬午", "辛亥", "乙未"], Gender::Male);
    let female = chart(["庚午", "壬午", "辛亥", "乙未"], Gender::Female);

    let up = major_periods(&male, Gender::Male, 1990, 3, 10, 0);
    let down = major_periods(&female, Gender::Female, 1990, 3, 10, 0);
    assert_eq!(up.direction, PeriodDirection::Forward);
    assert_eq!(down.direction, PeriodDirection::Backward);

    let month = male.month.ganzhi;
    for (i, p) in up.periods.iter().enumerate() {
        assert_eq!(p.ganzhi, month.offset(i as i32 + 1), "forward period {}", p.order);
    }
    for (i, p) in down.periods.iter().enumerate() {
        assert_eq!(p.ganzhi, month.offset(-(i as i32 + 1)), "backward period {}", p.order);
    }
}

/// 申子辰 in one chart collapses into a single three-member water record.
#[test]
fn scenario_full_triad_reported_once() {
    let fp = chart(["丙申", "庚子", "壬辰", "丁未"], Gender::Male);
    let rel = analyze_relationships(&fp).unwrap();

    let full: Vec<_> = rel
        .branch_relationships
        .iter()
        .filter(|r| r.kind == RelationKind::FullTriad)
        .collect();
    assert_eq!(full.len(), 1, "expected one full triad, got {full:?}");
    assert_eq!(full[0].element, Some(Element::Water));
    assert_eq!(full[0].members.len(), 3);

    let halves = rel
        .branch_relationships
        .iter()
        .filter(|r| r.kind == RelationKind::HalfTriad && r.element == Some(Element::Water))
        .count();
    assert_eq!(halves, 0, "half triads of a complete frame must collapse");
}

/// Same-pillar hidden combination: 丁亥 pairs 丁 with the 壬 inside 亥.
#[test]
fn same_pillar_hidden_combination() {
    let fp = chart(["丁亥", "壬午", "辛亥", "乙未"], Gender::Male);
    let hc = fp.year.hidden_combination.as_ref().expect("丁亥 carries 丁壬");
    assert_eq!(hc.hidden_stem, HeavenlyStem::Ren);
    assert_eq!(hc.element, Element::Wood);
}

/// Relationship and marker output keep their snake_case JSON shape.
#[test]
fn analyses_serialize_as_snake_case() {
    use bazi_base::{EarthlyBranch, ShenShaInput, analyze_symbols, detect_shensha};

    let rel = analyze_symbols(
        &[HeavenlyStem::Jia, HeavenlyStem::Ji],
        &[EarthlyBranch::Zi, EarthlyBranch::Chou],
    )
    .unwrap();
    let json = serde_json::to_value(&rel).unwrap();
    let stem = &json["stem_relationships"][0];
    assert_eq!(stem["kind"], "stem_combination");
    assert_eq!(stem["members"], serde_json::json!([{ "stem": "jia" }, { "stem": "ji" }]));
    let branch = &json["branch_relationships"][0];
    assert_eq!(branch["kind"], "six_combination");
    assert_eq!(branch["element"], "earth");
    assert_eq!(branch["positions"], serde_json::json!(["year", "month"]));

    let pairs = ["庚午", "壬午", "辛亥", "乙未"].map(|s| GanZhi::parse(s).unwrap());
    let markers = serde_json::to_value(detect_shensha(&ShenShaInput::new(pairs))).unwrap();
    let records = markers["records"].as_array().unwrap();
    assert_eq!(records.len(), 33);
    let tian_yi = records.iter().find(|r| r["kind"] == "tian_yi").unwrap();
    assert_eq!(tian_yi["name"], "天乙贵人");
    assert_eq!(tian_yi["present"], true);
    assert_eq!(tian_yi["positions"], serde_json::json!(["year", "month"]));
}
