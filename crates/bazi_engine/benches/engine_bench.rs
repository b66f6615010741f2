use bazi_base::Gender;
use bazi_engine::{BaziEngine, BaziOptions, BirthInput, EngineConfig};
use chrono::{DateTime, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn chart_bench(c: &mut Criterion) {
    let engine = BaziEngine::new(EngineConfig::uncached()).unwrap();
    let input = BirthInput::solar(1990, 6, 15, 14, Gender::Male).with_minute(30);
    let mut group = c.benchmark_group("chart");
    group.bench_function("default_options", |b| {
        let options = BaziOptions::default();
        b.iter(|| engine.calculate(black_box(&input), &options, now()))
    });
    group.bench_function("with_shensha", |b| {
        let options = BaziOptions {
            include_shensha: true,
            shensha_include_periods: true,
            include_hidden_stems: true,
            ..BaziOptions::default()
        };
        b.iter(|| engine.calculate(black_box(&input), &options, now()))
    });
    group.finish();
}

fn cached_bench(c: &mut Criterion) {
    let engine = BaziEngine::new(EngineConfig::default()).unwrap();
    let input = BirthInput::solar(1990, 6, 15, 14, Gender::Male);
    let options = BaziOptions::default();
    c.bench_function("chart_cached", |b| {
        b.iter(|| engine.calculate(black_box(&input), &options, now()))
    });
}

fn batch_bench(c: &mut Criterion) {
    let engine = BaziEngine::new(EngineConfig::uncached()).unwrap();
    let inputs: Vec<BirthInput> = (1950..2050)
        .map(|y| BirthInput::solar(y, 6, 15, 14, Gender::Female))
        .collect();
    let options = BaziOptions::default();
    c.bench_function("batch_100", |b| {
        b.iter(|| engine.calculate_batch(black_box(&inputs), &options, now()))
    });
}

criterion_group!(benches, chart_bench, cached_bench, batch_bench);
criterion_main!(benches);
