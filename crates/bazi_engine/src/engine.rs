//! Chart engine: validation, calendar conversion, analysis and assembly.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use bazi_base::pattern::classify_pattern;
use bazi_base::{
    FALLBACK_START_AGE, GanZhi, MajorPeriodSequence, PillarOptions, ShenShaAnalysis,
    analyze_elements, analyze_relationships, analyze_seasonal_strength, analyze_strength,
    analyze_ten_gods, build_four_pillars, detect_from_symbols, fleeting_years, major_periods,
    period_direction, period_transitions, tally_elements, year_ganzhi,
};
use chrono::{DateTime, Datelike, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CacheKey, ChartCache};
use crate::calendar::{CalendarAdapter, SolarTermCalendar};
use crate::error::BaziError;
use crate::input::BirthInput;
use crate::options::BaziOptions;
use crate::result::{
    BaziResult, BirthInfo, Diagnostics, FORMAT_VERSION, FleetingYearWindow, Stage, StageTiming,
};

/// Engine configuration used at startup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `None` disables memoization.
    pub cache: Option<CacheConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache: Some(CacheConfig::default()),
        }
    }
}

impl EngineConfig {
    pub fn uncached() -> Self {
        Self { cache: None }
    }

    fn validate(&self) -> Result<(), BaziError> {
        if let Some(cache) = &self.cache {
            cache.validate().map_err(BaziError::InvalidConfig)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stage recorder
// ---------------------------------------------------------------------------

/// Collects stage timings and trace notes for one request.
struct Recorder {
    enabled: bool,
    timings: Vec<StageTiming>,
    trace: Vec<String>,
}

impl Recorder {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
            trace: Vec::new(),
        }
    }

    fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let micros = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        debug!(stage = stage.name(), micros, "stage complete");
        if self.enabled {
            self.timings.push(StageTiming { stage, micros });
        }
        out
    }

    fn note(&mut self, message: String) {
        if self.enabled {
            self.trace.push(message);
        }
    }

    fn finish(self, adapter: &'static str) -> Option<Diagnostics> {
        self.enabled.then(|| Diagnostics {
            adapter,
            timings: self.timings,
            trace: self.trace,
        })
    }
}

/// Keep an optional stage's output, or log the failure and drop it.
fn degrade<T, E: Display>(stage: Stage, outcome: Result<T, E>, rec: &mut Recorder) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(stage = stage.name(), error = %e, "optional stage failed, output omitted");
            rec.note(format!("{} omitted: {e}", stage.name()));
            None
        }
    }
}

fn push_symbols(symbols: &mut Vec<&'static str>, gz: GanZhi) {
    symbols.push(gz.stem.glyph());
    symbols.push(gz.branch.glyph());
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Computes charts through a calendar adapter, optionally memoized.
pub struct BaziEngine<C: CalendarAdapter = SolarTermCalendar> {
    config: EngineConfig,
    adapter: C,
    cache: Option<ChartCache>,
}

impl<C: CalendarAdapter> std::fmt::Debug for BaziEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaziEngine")
            .field("adapter", &self.adapter.name())
            .field("config", &self.config)
            .field("cached_entries", &self.cache.as_ref().map_or(0, ChartCache::len))
            .finish()
    }
}

impl BaziEngine<SolarTermCalendar> {
    /// Engine over the built-in solar-term adapter.
    pub fn new(config: EngineConfig) -> Result<Self, BaziError> {
        Self::with_adapter(SolarTermCalendar, config)
    }
}

impl<C: CalendarAdapter> BaziEngine<C> {
    pub fn with_adapter(adapter: C, config: EngineConfig) -> Result<Self, BaziError> {
        config.validate()?;
        Ok(Self {
            cache: config.cache.map(ChartCache::new),
            config,
            adapter,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn adapter(&self) -> &C {
        &self.adapter
    }

    pub fn cache(&self) -> Option<&ChartCache> {
        self.cache.as_ref()
    }

    /// Validate, then compute or fetch the chart for `input`.
    ///
    /// `now` fixes the current year for period pointers and fleeting years,
    /// and is echoed as `calculated_at`. Cached charts are keyed by that year
    /// and re-stamped on a hit. Debug runs bypass the cache so their
    /// diagnostics describe real work.
    pub fn calculate(
        &self,
        input: &BirthInput,
        options: &BaziOptions,
        now: DateTime<Utc>,
    ) -> Result<Arc<BaziResult>, BaziError> {
        let mut rec = Recorder::new(options.debug);
        let errors = rec.time(Stage::Validation, || {
            let mut errors = Vec::new();
            input.collect_errors(&mut errors);
            options.collect_errors(&mut errors);
            errors
        });
        if !errors.is_empty() {
            debug!(count = errors.len(), "input rejected");
            return Err(BaziError::InvalidInput { errors });
        }

        let key = match (&self.cache, options.debug) {
            (Some(_), false) => CacheKey::new(input, options, now.year()),
            _ => None,
        };
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key, now) {
                info!(year = input.year, month = input.month, day = input.day, "chart cache hit");
                if hit.calculated_at == now {
                    return Ok(hit);
                }
                return Ok(Arc::new(BaziResult {
                    calculated_at: now,
                    ..BaziResult::clone(&hit)
                }));
            }
        }

        let result = Arc::new(self.compute(input, options, now, rec)?);
        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.put(key, Arc::clone(&result), now);
        }
        Ok(result)
    }

    pub fn calculate_now(
        &self,
        input: &BirthInput,
        options: &BaziOptions,
    ) -> Result<Arc<BaziResult>, BaziError> {
        self.calculate(input, options, Utc::now())
    }

    /// Compute many charts in parallel. Results keep input order.
    pub fn calculate_batch(
        &self,
        inputs: &[BirthInput],
        options: &BaziOptions,
        now: DateTime<Utc>,
    ) -> Vec<Result<Arc<BaziResult>, BaziError>> {
        let results: Vec<_> = inputs
            .par_iter()
            .map(|input| self.calculate(input, options, now))
            .collect();
        info!(
            count = results.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "batch complete"
        );
        results
    }

    fn compute(
        &self,
        input: &BirthInput,
        options: &BaziOptions,
        now: DateTime<Utc>,
        mut rec: Recorder,
    ) -> Result<BaziResult, BaziError> {
        let adapter = self.adapter.name();

        let converted = rec
            .time(Stage::Calendar, || self.adapter.convert(input))
            .map_err(|e| BaziError::calculation(Stage::Calendar, e.to_string(), input))?;

        let pillars = rec.time(Stage::Pillars, || {
            build_four_pillars(
                converted.ganzhis(),
                input.gender,
                PillarOptions {
                    include_hidden_stems: options.include_hidden_stems,
                    include_blade_peak: options.include_yang_blade_emperor_prosperity,
                },
            )
        });

        let ten_gods = (options.include_ten_gods || options.include_pattern_analysis)
            .then(|| rec.time(Stage::TenGods, || analyze_ten_gods(&pillars)));

        let tally = rec.time(Stage::Elements, || {
            tally_elements(&pillars, options.include_hidden_stems)
        });
        let elements = options.include_element_analysis.then(|| {
            let mut analysis = analyze_elements(tally);
            analysis.balance = options.precision.round(analysis.balance);
            analysis
        });
        let strength = options
            .include_strength_analysis
            .then(|| rec.time(Stage::Strength, || analyze_strength(&pillars, &tally)));
        let seasonal_strength = options.include_seasonal_strength.then(|| {
            rec.time(Stage::Strength, || {
                let mut scores = analyze_seasonal_strength(&pillars);
                scores.round_to(options.precision.decimals());
                scores
            })
        });

        let direction = period_direction(pillars.year.stem, input.gender);
        let starting_age = rec.time(Stage::StartingAge, || {
            self.adapter.child_limit(input, direction.is_forward())
        });
        let starting_age = match starting_age {
            Some(age) => age.max(1),
            None => {
                debug!(adapter, "child limit unavailable, using fallback starting age");
                rec.note(format!(
                    "{adapter} adapter gave no child limit, starting age falls back to {FALLBACK_START_AGE}"
                ));
                FALLBACK_START_AGE
            }
        };

        let current_year = now.year();
        let current_age = current_year - input.year;
        let periods: MajorPeriodSequence = rec.time(Stage::MajorPeriods, || {
            major_periods(
                &pillars,
                input.gender,
                input.year,
                starting_age,
                options.major_period_count,
                current_age,
            )
        });
        let transitions = if options.include_major_periods {
            period_transitions(&periods.periods)
        } else {
            Vec::new()
        };

        let fleeting = options.include_fleeting_years.then(|| {
            rec.time(Stage::FleetingYears, || {
                FleetingYearWindow::new(fleeting_years(
                    &pillars,
                    input.year,
                    current_year,
                    options.fleeting_year_range,
                    Some(&periods),
                ))
            })
        });

        let shensha = if options.include_shensha {
            let mut symbols = Vec::with_capacity(12);
            for gz in pillars.ganzhis() {
                push_symbols(&mut symbols, gz);
            }
            if options.shensha_include_periods {
                match periods.current_period() {
                    Some(decade) => {
                        push_symbols(&mut symbols, decade.ganzhi);
                        push_symbols(&mut symbols, year_ganzhi(current_year));
                    }
                    None => rec.note(format!(
                        "no major period covers age {current_age}, markers use natal pillars only"
                    )),
                }
            }
            let outcome: Result<ShenShaAnalysis, _> = rec.time(Stage::ShenSha, || {
                detect_from_symbols(&symbols, options.has_accurate_time, Some(input.gender))
            });
            degrade(Stage::ShenSha, outcome, &mut rec)
        } else {
            None
        };

        let relationships = if options.include_relationship_analysis {
            let outcome = rec.time(Stage::Relationships, || analyze_relationships(&pillars));
            degrade(Stage::Relationships, outcome, &mut rec)
        } else {
            None
        };

        let pattern = options.include_pattern_analysis.then(|| {
            rec.time(Stage::Pattern, || {
                let mut analysis = classify_pattern(&pillars, ten_gods.as_ref(), &options.pattern);
                analysis.round_to(options.precision.decimals());
                analysis
            })
        });

        let birth = BirthInfo::new(input, converted.solar_date, converted.lunar);
        let result = rec.time(Stage::Assembly, || BaziResult {
            version: FORMAT_VERSION,
            birth,
            four_pillars: pillars,
            ten_gods: if options.include_ten_gods { ten_gods } else { None },
            elements,
            strength,
            seasonal_strength,
            starting_age,
            major_periods: options.include_major_periods.then_some(periods),
            period_transitions: transitions,
            fleeting_years: fleeting,
            shensha,
            relationships,
            pattern,
            calculated_at: now,
            diagnostics: None,
        });

        Ok(BaziResult {
            diagnostics: rec.finish(adapter),
            ..result
        })
    }
}
