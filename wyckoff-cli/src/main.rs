//! Wyckoff CLI — scan an index for markup candidates.
//!
//! Commands:
//! - `scan` — fetch history for every symbol, flag markup candidates, write JSON
//! - `symbols` — resolve and print the universe a scan would use
//! - `config` — print the default configuration as TOML

mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use wyckoff_core::data::{resolve_universe, Universe, UniverseOrigin, YahooProvider};
use wyckoff_core::output::summary_json;
use wyckoff_core::{write_outputs, Monotonicity, ScanConfig, Scanner, StdoutProgress};

#[derive(Parser)]
#[command(
    name = "wyckoff",
    about = "Wyckoff scanner — flag symbols breaking out of an accumulation range"
)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the universe and write markup candidates to JSON.
    Scan(ScanArgs),
    /// Print the universe a scan would use.
    Symbols {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as TOML.
    Config,
}

#[derive(Args)]
struct ScanArgs {
    /// Path to a TOML config file. Defaults apply to anything it omits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan these symbols instead of fetching the index (e.g., TCS.NS INFY.NS).
    #[arg(long, num_args = 1..)]
    symbols: Vec<String>,

    /// Output directory for the JSON files.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Calendar days of history to fetch per symbol.
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Pause between symbols, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Bars in the accumulation window.
    #[arg(long)]
    accumulation_window: Option<usize>,

    /// Fraction the last close must clear the window high by (0.05 = 5%).
    #[arg(long)]
    breakout_threshold: Option<f64>,

    /// Multiple of average volume the last bar must exceed.
    #[arg(long)]
    volume_multiplier: Option<f64>,

    /// Require strictly rising highs/lows in the trend window.
    #[arg(long, default_value_t = false)]
    strict_trend: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level);

    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Symbols { config } => run_symbols(config),
        Commands::Config => {
            print!("{}", ScanConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ScanConfig> {
    match path {
        Some(p) => {
            let config = ScanConfig::from_file(p)?;
            info!(path = %p.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(ScanConfig::default()),
    }
}

fn apply_overrides(config: &mut ScanConfig, args: &ScanArgs) {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(days) = args.lookback_days {
        config.scan.lookback_days = days;
    }
    if let Some(ms) = args.delay_ms {
        config.scan.symbol_delay_ms = ms;
    }
    if let Some(w) = args.accumulation_window {
        config.detector.accumulation_window = w;
    }
    if let Some(t) = args.breakout_threshold {
        config.detector.breakout_threshold = t;
    }
    if let Some(m) = args.volume_multiplier {
        config.detector.volume_multiplier = m;
    }
    if args.strict_trend {
        config.detector.monotonicity = Monotonicity::Strict;
    }
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let universe = if args.symbols.is_empty() {
        resolve_universe(&config.symbols)
    } else {
        Universe::explicit(args.symbols.clone())
    };
    describe_universe(&universe);

    let provider = YahooProvider::new(&config.provider)?;
    let report = Scanner::new(&config, &provider).scan(&universe, &StdoutProgress);

    let paths = write_outputs(&config.output, &report.summary, &report.dataset)
        .context("failed to persist scan results")?;
    info!(
        summary = %paths.summary.display(),
        dataset = %paths.dataset.display(),
        failed = report.failed(),
        skipped = report.skipped(),
        "wrote scan results"
    );

    println!();
    println!("Scan complete.");
    println!("{}", summary_json(&report.summary)?);
    Ok(())
}

fn run_symbols(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_ref())?;
    let universe = resolve_universe(&config.symbols);
    describe_universe(&universe);
    for symbol in universe.iter() {
        println!("{symbol}");
    }
    Ok(())
}

fn describe_universe(universe: &Universe) {
    match &universe.origin {
        UniverseOrigin::Remote { index } => {
            println!("Fetched {} symbols from {index}.", universe.len());
        }
        UniverseOrigin::Fallback { reason } => {
            println!(
                "Warning: couldn't fetch the index listing ({reason}). \
                 Using fallback list of {} symbols.",
                universe.len()
            );
        }
        UniverseOrigin::Explicit => {
            println!("Using {} symbols from the command line.", universe.len());
        }
    }
}
