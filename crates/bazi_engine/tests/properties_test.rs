//! Property tests over random Gregorian birth instants.

use bazi_base::Gender;
use bazi_engine::{BaziEngine, BaziOptions, BirthInput, EngineConfig};
use chrono::{DateTime, Utc};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn input_strategy() -> impl Strategy<Value = BirthInput> {
    (1901i32..2100, 1u32..=12, 1u32..=28, 0u32..24, any::<bool>()).prop_map(
        |(year, month, day, hour, male)| {
            let gender = if male { Gender::Male } else { Gender::Female };
            BirthInput::solar(year, month, day, hour, gender)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Starting age is at least one and the periods tile the ages without
    /// gaps, exactly `major_period_count` of them.
    #[test]
    fn periods_are_contiguous(input in input_strategy(), count in 1usize..=12) {
        let engine = BaziEngine::new(EngineConfig::uncached()).unwrap();
        let options = BaziOptions { major_period_count: count, ..BaziOptions::default() };
        let r = engine.calculate(&input, &options, now()).unwrap();
        prop_assert!(r.starting_age >= 1);
        let seq = r.major_periods.as_ref().unwrap();
        prop_assert_eq!(seq.periods.len(), count);
        prop_assert_eq!(seq.periods[0].start_age, r.starting_age);
        for w in seq.periods.windows(2) {
            prop_assert_eq!(w[1].start_age, w[0].end_age + 1);
            prop_assert_eq!(w[1].start_year, w[0].end_year + 1);
        }
    }

    /// The element tally over the eight visible symbols always sums to 8.
    #[test]
    fn tally_sums_to_eight(input in input_strategy()) {
        let engine = BaziEngine::new(EngineConfig::uncached()).unwrap();
        let r = engine.calculate(&input, &BaziOptions::default(), now()).unwrap();
        prop_assert_eq!(r.elements.as_ref().unwrap().tally.total(), 8);
    }

    /// Two runs serialize to the same bytes.
    #[test]
    fn deterministic_json(input in input_strategy()) {
        let engine = BaziEngine::new(EngineConfig::uncached()).unwrap();
        let options = BaziOptions { include_shensha: true, ..BaziOptions::default() };
        let run = || serde_json::to_string(&*engine.calculate(&input, &options, now()).unwrap());
        let (a, b) = (run().unwrap(), run().unwrap());
        prop_assert_eq!(a, b);
    }
}
