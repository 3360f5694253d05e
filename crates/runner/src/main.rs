use chainwalk_calibration::{CalibrationEngine, EventRule, Journal, OutcomeLedger};
use chainwalk_clock::{Clock, FixedClock, SystemClock};
use chainwalk_core::Date;
use chainwalk_engine::{ConsistencyCheck, FusionEngine, JsonSurface, SpineSurface};
use chainwalk_runner::{
    BatchRunner, DailyPipeline, JsonlFeatureSource, JsonlRealizedSource, RunConfig,
};
use std::sync::Arc;

fn print_help() {
    eprintln!(
        r#"ChainWalk - constraint fusion and calibration engine

USAGE:
    chainwalk --features <PATH> [OPTIONS]

OPTIONS:
    --features <PATH>   JSONL feature sets, one per date (required)
    --config <PATH>     Load engine and calibration configuration from JSON
    --realized <PATH>   JSONL realized statistics used to resolve outcomes
    --journal <PATH>    Ledger journal; replayed at startup, appended to
    --window <DAYS>     Report a single trailing window instead of the defaults
    --as-of <DATE>      Treat DATE (YYYY-MM-DD) as today
    --report <PATH>     Write the calibration report as JSON
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Daily run against the journal
    chainwalk --features features.jsonl --journal ledger.jsonl

    # Backfill as of a past date and score the last 90 days
    chainwalk --features features.jsonl --realized realized.jsonl \
        --as-of 2025-12-31 --window 90
"#
    );
}

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    features: Option<String>,
    realized: Option<String>,
    journal: Option<String>,
    window: Option<u32>,
    as_of: Option<Date>,
    report: Option<String>,
}

fn value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("Error: {} requires a value", flag);
            std::process::exit(1);
        }
    }
}

fn parse_args() -> Result<Option<Args>, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--config" | "-c" => {
                i += 1;
                parsed.config = Some(value(&args, i, flag));
            }
            "--features" => {
                i += 1;
                parsed.features = Some(value(&args, i, flag));
            }
            "--realized" => {
                i += 1;
                parsed.realized = Some(value(&args, i, flag));
            }
            "--journal" => {
                i += 1;
                parsed.journal = Some(value(&args, i, flag));
            }
            "--window" => {
                i += 1;
                parsed.window = Some(value(&args, i, flag).parse()?);
            }
            "--as-of" => {
                i += 1;
                parsed.as_of = Some(value(&args, i, flag).parse()?);
            }
            "--report" => {
                i += 1;
                parsed.report = Some(value(&args, i, flag));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    let Some(features_path) = args.features.as_deref() else {
        eprintln!("Error: --features is required");
        print_help();
        std::process::exit(1);
    };

    let mut config = match &args.config {
        Some(path) => {
            log::info!("[RUN] Loading configuration from: {}", path);
            RunConfig::from_file(path)?
        }
        None => RunConfig::default(),
    };
    if let Some(days) = args.window {
        config.calibration.windows = vec![days];
    }
    config.validate()?;
    config.verify_integrity()?;

    let clock: Arc<dyn Clock> = match args.as_of {
        Some(date) => Arc::new(FixedClock::at_date(date)),
        None => Arc::new(SystemClock::new()),
    };
    let as_of = clock.today();
    log::info!("[RUN] As of {} ({})", as_of, clock.name());

    let engine = Arc::new(FusionEngine::new(config.engine.clone())?);

    let mut ledger = OutcomeLedger::new(
        EventRule::new(config.calibration.events.clone()),
        Arc::clone(&clock),
    );
    if let Some(path) = &args.journal {
        ledger.replay(Journal::read(path)?)?;
        ledger = ledger.with_journal(Journal::open(path)?);
    }
    let ledger = Arc::new(ledger);

    let surfaces = ConsistencyCheck::new()
        .with_surface(Box::new(SpineSurface))
        .with_surface(Box::new(JsonSurface));
    let pipeline = Arc::new(DailyPipeline::new(
        Arc::clone(&engine),
        Arc::clone(&ledger),
        surfaces,
    ));

    let features = JsonlFeatureSource::from_file(features_path)?;
    let days = features.up_to(as_of);
    let latest = days.last().cloned();

    let summary = BatchRunner::new(Arc::clone(&pipeline)).run(days).await?;
    for run in &summary.published {
        println!("{}", run.spine);
    }
    for (date, reason) in &summary.failed {
        eprintln!("{}: {}", date, reason);
    }

    if let Some(path) = &args.realized {
        let realized = JsonlRealizedSource::from_file(path)?;
        pipeline.resolve_due(&realized)?;
    }

    let calibrator = CalibrationEngine::new(config.calibration.clone(), Arc::clone(&ledger))?;
    let outlook = match latest {
        Some(raw) => {
            let today = engine.prepare(&raw)?;
            let distribution = engine.outlook().distribution(&today.features);
            Some(calibrator.regime_outlook(engine.outlook(), distribution))
        }
        None => None,
    };

    let report = calibrator.report(as_of, outlook);
    print!("{}", report.summary());

    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        log::info!("[RUN] Report written to {}", path);
    }

    Ok(())
}
