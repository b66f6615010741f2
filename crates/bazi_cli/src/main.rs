use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use bazi_base::relationship::PairRelation;
use bazi_base::{EarthlyBranch, GanZhi, HeavenlyStem, branch_relation, stem_relation, ten_god};
use bazi_engine::{
    BaziEngine, BaziOptions, BaziResult, BirthInput, EngineConfig, Precision, RawBirthInput,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "bazi", about = "Four-pillar (八字) chart calculator")]
struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a full chart
    Chart(ChartArgs),
    /// Compute charts for a JSON array of birth records
    Batch {
        /// File holding `[{"year":..,"month":..,"day":..,"hour":..,"gender":..}, ...]`
        file: PathBuf,
        /// JSON options file
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Look up a 60-cycle pair by index (0-59) or by name (e.g. 甲子)
    Ganzhi {
        value: String,
    },
    /// Ten god of a stem relative to a day stem
    TenGod {
        /// Day stem, e.g. 辛
        day: String,
        /// Other stem, e.g. 庚
        other: String,
    },
    /// Relationship between two stems or two branches
    Relation {
        a: String,
        b: String,
    },
    /// NaYin sound of a 60-cycle pair
    Nayin {
        pair: String,
    },
}

#[derive(Args)]
struct ChartArgs {
    /// Birth date, YYYY-MM-DD (lunar when --lunar is given)
    date: String,
    /// Birth time, HH:MM or HH
    time: String,
    /// male or female
    #[arg(long)]
    gender: String,
    /// Interpret the date as a lunar date
    #[arg(long)]
    lunar: bool,
    /// Lunar leap month
    #[arg(long)]
    leap: bool,
    /// Advisory timezone echoed in the result
    #[arg(long)]
    timezone: Option<String>,
    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
    /// Include markers (神煞)
    #[arg(long)]
    shensha: bool,
    /// Add the current decade and annual pillars to marker detection
    #[arg(long)]
    shensha_periods: bool,
    /// Include hidden stems in pillars and the element tally
    #[arg(long)]
    hidden_stems: bool,
    /// Add seasonal (月令) weighted element scores
    #[arg(long)]
    seasonal: bool,
    /// Number of major periods
    #[arg(long)]
    periods: Option<usize>,
    /// Fleeting years on each side of the current year
    #[arg(long)]
    years: Option<u32>,
    /// basic, standard or detailed
    #[arg(long)]
    precision: Option<String>,
    /// Attach stage timings and trace notes
    #[arg(long)]
    debug: bool,
    /// Birth hour is a placeholder; hour-based markers are skipped
    #[arg(long)]
    no_accurate_time: bool,
    /// JSON options file; flags given here override it
    #[arg(long)]
    options: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_writer(io::stderr).with_env_filter(filter).init();
}

fn load_options(path: Option<&Path>) -> Result<BaziOptions> {
    let Some(path) = path else {
        return Ok(BaziOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading options file {}", path.display()))?;
    let options = BaziOptions::from_json(&text)
        .with_context(|| format!("parsing options file {}", path.display()))?;
    debug!(path = %path.display(), "options loaded");
    Ok(options)
}

fn parse_date(s: &str) -> Result<(i32, u32, u32)> {
    let parts: Vec<&str> = s.trim().split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        bail!("date must be YYYY-MM-DD, got {s:?}");
    };
    Ok((
        y.parse().with_context(|| format!("bad year in {s:?}"))?,
        m.parse().with_context(|| format!("bad month in {s:?}"))?,
        d.parse().with_context(|| format!("bad day in {s:?}"))?,
    ))
}

fn parse_time(s: &str) -> Result<(u32, Option<u32>)> {
    match s.trim().split_once(':') {
        Some((h, m)) => Ok((
            h.parse().with_context(|| format!("bad hour in {s:?}"))?,
            Some(m.parse().with_context(|| format!("bad minute in {s:?}"))?),
        )),
        None => Ok((s.trim().parse().with_context(|| format!("bad hour in {s:?}"))?, None)),
    }
}

impl ChartArgs {
    fn input(&self) -> Result<BirthInput> {
        let (year, month, day) = parse_date(&self.date)?;
        let (hour, minute) = parse_time(&self.time)?;
        let raw = RawBirthInput {
            year,
            month,
            day,
            hour,
            minute,
            gender: self.gender.clone(),
            is_lunar: self.lunar,
            is_leap_month: self.leap,
            timezone: self.timezone.clone(),
        };
        BirthInput::try_from(raw).map_err(|errors| {
            let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow!("invalid input: {}", list.join("; "))
        })
    }

    /// File options first, then flags.
    fn options(&self) -> Result<BaziOptions> {
        let mut o = load_options(self.options.as_deref())?;
        o.include_shensha |= self.shensha || self.shensha_periods;
        o.shensha_include_periods |= self.shensha_periods;
        o.include_hidden_stems |= self.hidden_stems;
        o.include_seasonal_strength |= self.seasonal;
        o.debug |= self.debug;
        if self.no_accurate_time {
            o.has_accurate_time = false;
        }
        if let Some(n) = self.periods {
            o.major_period_count = n;
        }
        if let Some(n) = self.years {
            o.fleeting_year_range = n;
        }
        if let Some(p) = &self.precision {
            o.precision = Precision::parse(p).ok_or_else(|| {
                anyhow!("precision must be basic, standard or detailed, got {p:?}")
            })?;
        }
        Ok(o)
    }
}

fn parse_ganzhi(s: &str) -> Result<GanZhi> {
    if let Ok(i) = s.trim().parse::<u8>() {
        return GanZhi::from_index(i).ok_or_else(|| anyhow!("cycle index must be 0-59, got {i}"));
    }
    GanZhi::parse(s).ok_or_else(|| anyhow!("not a valid stem-branch pair: {s:?}"))
}

fn parse_stem(s: &str) -> Result<HeavenlyStem> {
    HeavenlyStem::parse(s).ok_or_else(|| anyhow!("not a heavenly stem: {s:?}"))
}

fn print_relation(a: &str, b: &str, rel: PairRelation) {
    let element = rel
        .element
        .map(|e| format!(" -> {}", e.glyph()))
        .unwrap_or_default();
    println!(
        "{a} {b}: {} ({:?}, {:?}, {:?}){element}",
        rel.kind.label(),
        rel.category(),
        rel.polarity,
        rel.strength
    );
}

fn print_chart(r: &BaziResult) {
    println!("{:<6}{:<8}{:<10}{:<8}{:<8}markers", "", "pillar", "nayin", "ten god", "hidden");
    for row in r.rows() {
        println!(
            "{:<6}{:<8}{:<10}{:<8}{:<8}{}",
            row.position.glyph(),
            row.ganzhi,
            row.nayin,
            row.ten_god,
            row.hidden_stems,
            row.markers.join(" ")
        );
    }
    println!();
    let day_master = r.four_pillars.day_master();
    println!(
        "day master: {} ({})",
        day_master,
        day_master.element().glyph()
    );
    if let Some(e) = &r.elements {
        let t = e.tally;
        println!(
            "elements: 木{} 火{} 土{} 金{} 水{}  balance {}",
            t.wood, t.fire, t.earth, t.metal, t.water, e.balance
        );
    }
    if let Some(s) = &r.strength {
        println!("strength: {} (score {})", s.strength.name(), s.score);
    }
    if let Some(s) = &r.seasonal_strength {
        let scores: Vec<String> = s
            .elements
            .iter()
            .map(|e| format!("{}{}", e.element.glyph(), e.score))
            .collect();
        println!(
            "seasonal: {}  day master {}% {}  balance {} ({})",
            scores.join(" "),
            s.day_master_percentage,
            s.day_master_strength.name(),
            s.balance.score,
            s.balance.level.name()
        );
    }
    println!("starting age: {}", r.starting_age);
    if let Some(seq) = &r.major_periods {
        let current = seq.current_period().map(|p| p.order);
        for p in &seq.periods {
            let mark = if Some(p.order) == current { "*" } else { " " };
            println!(
                "{mark} {:>2}. {} {:>3}-{:<3} {}-{} {} {}",
                p.order,
                p.label,
                p.start_age,
                p.end_age,
                p.start_year,
                p.end_year,
                p.ten_god,
                p.favorability.name()
            );
        }
    }
    if let Some(y) = r.fleeting_years.as_ref().and_then(|w| w.current_year()) {
        println!("current year: {} {} (age {}, {})", y.year, y.label, y.age, y.ten_god);
    }
    if let Some(s) = &r.shensha {
        println!("markers: {}", s.labels().join(" "));
    }
    if let Some(rel) = &r.relationships {
        println!("harmony: {} ({})", rel.harmony_score, rel.summary);
    }
    if let Some(p) = &r.pattern {
        match &p.primary {
            Some(d) => println!("pattern: {} ({}, {}%)", d.name, d.usage.name(), d.confidence),
            None => println!("pattern: -"),
        }
        for note in &p.notes {
            println!("  {note}");
        }
    }
    if let Some(d) = &r.diagnostics {
        println!();
        for t in &d.timings {
            println!("{:<16}{:>8} us", t.stage.name(), t.micros);
        }
        for line in &d.trace {
            println!("trace: {line}");
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chart(args) => {
            let input = args.input()?;
            let options = args.options()?;
            let engine = BaziEngine::new(EngineConfig::uncached())?;
            let result = engine.calculate_now(&input, &options)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&*result)?);
            } else {
                print_chart(&result);
            }
        }

        Commands::Batch { file, options } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading batch file {}", file.display()))?;
            let raws: Vec<RawBirthInput> = serde_json::from_str(&text)
                .with_context(|| format!("parsing batch file {}", file.display()))?;
            let options = load_options(options.as_deref())?;
            let inputs = raws
                .into_iter()
                .enumerate()
                .map(|(i, raw)| {
                    BirthInput::try_from(raw).map_err(|errors| {
                        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
                        anyhow!("record {i}: {}", list.join("; "))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let engine = BaziEngine::new(EngineConfig::default())?;
            let results = engine.calculate_batch(&inputs, &options, chrono::Utc::now());
            let out: Vec<serde_json::Value> = results
                .iter()
                .map(|r| match r {
                    Ok(chart) => serde_json::to_value(&**chart)
                        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
                    Err(e) => serde_json::json!({ "error": e.to_string(), "code": e.code() }),
                })
                .collect();
            info!(count = out.len(), "batch written");
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Commands::Ganzhi { value } => {
            let gz = parse_ganzhi(&value)?;
            let nayin = gz.nayin();
            println!(
                "{gz} index {} stem {} ({}) branch {} ({}) nayin {} ({})",
                gz.index(),
                gz.stem,
                gz.stem.element().glyph(),
                gz.branch,
                gz.branch.element().glyph(),
                nayin.name,
                nayin.element.glyph()
            );
        }

        Commands::TenGod { day, other } => {
            let tg = ten_god(parse_stem(&day)?, parse_stem(&other)?);
            println!("{tg} ({}, {})", tg.simplified(), tg.english());
        }

        Commands::Relation { a, b } => {
            if let (Some(x), Some(y)) = (HeavenlyStem::parse(&a), HeavenlyStem::parse(&b)) {
                print_relation(&a, &b, stem_relation(x, y));
            } else if let (Some(x), Some(y)) =
                (EarthlyBranch::parse(&a), EarthlyBranch::parse(&b))
            {
                print_relation(&a, &b, branch_relation(x, y));
            } else {
                bail!("expected two stems or two branches, got {a:?} and {b:?}");
            }
        }

        Commands::Nayin { pair } => {
            let nayin = parse_ganzhi(&pair)?.nayin();
            println!("{} ({}, {})", nayin.name, nayin.english, nayin.element.glyph());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_and_time_parsing() {
        assert_eq!(parse_date("1990-06-15").unwrap(), (1990, 6, 15));
        assert!(parse_date("1990/06/15").is_err());
        assert_eq!(parse_time("14:30").unwrap(), (14, Some(30)));
        assert_eq!(parse_time("9").unwrap(), (9, None));
        assert!(parse_time("aa:10").is_err());
    }

    #[test]
    fn ganzhi_by_index_or_name() {
        assert_eq!(parse_ganzhi("0").unwrap().label(), "甲子");
        assert_eq!(parse_ganzhi("辛亥").unwrap().index(), 47);
        assert!(parse_ganzhi("60").is_err());
        assert!(parse_ganzhi("甲丑").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "bazi", "chart", "1990-06-15", "14:30", "--gender", "male", "--shensha-periods",
            "--periods", "8", "--precision", "detailed", "--no-accurate-time", "--seasonal",
        ]);
        let Commands::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        let input = args.input().unwrap();
        assert_eq!((input.year, input.minute), (1990, Some(30)));
        let o = args.options().unwrap();
        assert!(o.include_shensha && o.shensha_include_periods);
        assert_eq!(o.major_period_count, 8);
        assert_eq!(o.precision, Precision::Detailed);
        assert!(!o.has_accurate_time);
        assert!(o.include_major_periods);
        assert!(o.include_seasonal_strength);
    }

    #[test]
    fn bad_gender_is_reported() {
        let cli = Cli::parse_from(["bazi", "chart", "1990-06-15", "14", "--gender", "x"]);
        let Commands::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        let err = args.input().unwrap_err().to_string();
        assert!(err.contains("gender"), "{err}");
    }
}
