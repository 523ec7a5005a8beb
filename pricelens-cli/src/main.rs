//! PriceLens CLI — synthetic data, annotation, summaries and correlation.
//!
//! Commands:
//! - `generate` — write a synthetic four-instrument dataset as a JSON snapshot
//! - `annotate` — load raw bars, compute indicators, write the annotated snapshot
//! - `summary` — summary insights for one instrument over a display range
//! - `correlate` — daily-return correlation matrix over a display range

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pricelens_core::{AnalyticsConfig, DisplayRange};
use pricelens_runner::synthetic::{preset_end, preset_start};
use pricelens_runner::{
    build_dataset, default_specs, export_correlation_csv, export_dataset_json,
    export_summary_json, export_summary_markdown, generate_dataset, load_dataset, write_artifact,
    AnalysisSession, InputFormat,
};

#[derive(Parser)]
#[command(
    name = "pricelens",
    about = "PriceLens CLI — OHLCV analytics: moving averages, returns, volatility, correlation"
)]
struct Cli {
    /// Engine configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic AMZN/DPZ/BTC/NFLX dataset as an annotated JSON snapshot.
    Generate {
        /// Output file.
        #[arg(long)]
        out: PathBuf,

        /// First calendar day (YYYY-MM-DD). Defaults to 2013-05-01.
        #[arg(long)]
        start: Option<String>,

        /// Last calendar day (YYYY-MM-DD). Defaults to 2019-05-31.
        #[arg(long)]
        end: Option<String>,
    },
    /// Load raw bars, compute indicators, and write an annotated JSON snapshot.
    Annotate {
        #[command(flatten)]
        input: InputArgs,

        /// Output file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Summary insights for one instrument over a display range.
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Instrument symbol.
        #[arg(long)]
        symbol: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Print JSON instead of a Markdown report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Correlation of daily returns between every instrument, over the
    /// calendar window of one instrument's display range.
    Correlate {
        #[command(flatten)]
        input: InputArgs,

        /// Instrument whose range defines the window.
        #[arg(long)]
        symbol: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Also write the matrix as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// JSON snapshot, per-instrument CSV file or directory, or wide CSV.
    #[arg(long)]
    input: PathBuf,

    /// json, csv or wide. Guessed from the path when omitted.
    #[arg(long)]
    format: Option<InputFormat>,
}

#[derive(Args)]
struct RangeArgs {
    /// First bar index (inclusive). Defaults to 0 when --end is given.
    #[arg(long, conflicts_with = "last")]
    start: Option<usize>,

    /// Last bar index (inclusive). Defaults to the final bar.
    #[arg(long, conflicts_with = "last")]
    end: Option<usize>,

    /// Trailing number of bars. Without any range flag the configured
    /// default window is used.
    #[arg(long)]
    last: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalyticsConfig::default(),
    };

    match cli.command {
        Commands::Generate { out, start, end } => run_generate(&config, &out, start, end),
        Commands::Annotate { input, out } => run_annotate(&config, &input, &out),
        Commands::Summary {
            input,
            symbol,
            range,
            json,
        } => run_summary(config, &input, &symbol, &range, json),
        Commands::Correlate {
            input,
            symbol,
            range,
            csv,
        } => run_correlate(config, &input, &symbol, &range, csv.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(
    config: &AnalyticsConfig,
    out: &Path,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let start = match start {
        Some(s) => parse_date(&s)?,
        None => preset_start(),
    };
    let end = match end {
        Some(s) => parse_date(&s)?,
        None => preset_end(),
    };
    if end < start {
        bail!("--end {end} is before --start {start}");
    }

    let raw = generate_dataset(&default_specs(), start, end);
    let dataset = build_dataset(raw, config)?;
    write_artifact(out, &export_dataset_json(&dataset)?)?;

    println!("Synthetic dataset: {start} to {end}");
    for (symbol, bars) in dataset.iter() {
        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            let growth = (last.close - first.close) / first.close * 100.0;
            println!(
                "  {symbol:<6} {:>5} days  ${:.2} -> ${:.2} ({growth:+.1}%)",
                bars.len(),
                first.close,
                last.close
            );
        }
    }
    println!("Written to {}", out.display());
    Ok(())
}

fn run_annotate(config: &AnalyticsConfig, input: &InputArgs, out: &Path) -> Result<()> {
    let dataset = load_dataset(&input.input, input.format, config)
        .with_context(|| format!("failed to load {}", input.input.display()))?;
    write_artifact(out, &export_dataset_json(&dataset)?)?;
    println!(
        "Annotated {} instruments ({}) into {}",
        dataset.len(),
        dataset.symbols().join(", "),
        out.display()
    );
    Ok(())
}

fn run_summary(
    config: AnalyticsConfig,
    input: &InputArgs,
    symbol: &str,
    range: &RangeArgs,
    json: bool,
) -> Result<()> {
    let session = open_session(config, input)?;
    let range = resolve_range(&session, symbol, range)?;
    let view = session.view(symbol, range)?;
    let Some(summary) = view.summary else {
        bail!("no bars for {symbol} in range");
    };

    info!(
        symbol,
        start = range.start(),
        end = range.end(),
        bars = view.bars.len(),
        "summary computed"
    );
    if json {
        println!("{}", export_summary_json(&summary)?);
    } else {
        let (first, last) = range.dates(session.dataset().get(symbol)?)?;
        println!("{}", export_summary_markdown(symbol, &summary));
        println!("_Range: bars {}..={} ({first} to {last})_", range.start(), range.end());
    }
    Ok(())
}

fn run_correlate(
    config: AnalyticsConfig,
    input: &InputArgs,
    symbol: &str,
    range: &RangeArgs,
    csv: Option<&Path>,
) -> Result<()> {
    let session = open_session(config, input)?;
    let range = resolve_range(&session, symbol, range)?;
    let matrix = session.correlation(symbol, range)?;
    let (first, last) = range.dates(session.dataset().get(symbol)?)?;

    println!("Correlation of daily returns, {first} to {last}");
    let symbols = matrix.symbols();
    print!("{:<8}", "");
    for s in &symbols {
        print!("{s:>8}");
    }
    println!();
    for a in &symbols {
        print!("{a:<8}");
        for b in &symbols {
            match matrix.get(a, b) {
                Some(r) => print!("{r:>8.2}"),
                None => print!("{:>8}", "-"),
            }
        }
        println!();
    }

    if let Some(path) = csv {
        write_artifact(path, &export_correlation_csv(&matrix)?)?;
        println!("Written to {}", path.display());
    }
    Ok(())
}

fn open_session(config: AnalyticsConfig, input: &InputArgs) -> Result<AnalysisSession> {
    let dataset = load_dataset(&input.input, input.format, &config)
        .with_context(|| format!("failed to load {}", input.input.display()))?;
    Ok(AnalysisSession::new(dataset, config))
}

fn resolve_range(session: &AnalysisSession, symbol: &str, args: &RangeArgs) -> Result<DisplayRange> {
    let len = session.dataset().get(symbol)?.len();
    if len == 0 {
        bail!("{symbol} has no bars");
    }

    let range = match (args.start, args.end, args.last) {
        (_, _, Some(0)) => bail!("--last must be at least 1"),
        (_, _, Some(n)) => DisplayRange::trailing(len, n),
        (None, None, None) => session.default_range(symbol)?,
        (start, end, None) => Some(session.range(
            symbol,
            start.unwrap_or(0),
            end.unwrap_or(len - 1),
        )?),
    };
    range.with_context(|| format!("{symbol} has no bars"))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn session() -> AnalysisSession {
        let config = AnalyticsConfig::default();
        let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        let dataset = build_dataset(generate_dataset(&default_specs(), start, end), &config).unwrap();
        AnalysisSession::new(dataset, config)
    }

    fn range_args(start: Option<usize>, end: Option<usize>, last: Option<usize>) -> RangeArgs {
        RangeArgs { start, end, last }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn range_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "pricelens", "summary", "--input", "x.json", "--symbol", "AMZN", "--start", "1",
            "--last", "5",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::try_parse_from([
            "pricelens", "annotate", "--input", "closes.csv", "--format", "wide", "--out", "o.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Annotate { input, .. } => assert_eq!(input.format, Some(InputFormat::Wide)),
            _ => panic!("expected annotate"),
        }
    }

    #[test]
    fn range_resolution() {
        let s = session();
        let len = s.dataset().get("AMZN").unwrap().len();

        let r = resolve_range(&s, "AMZN", &range_args(None, None, None)).unwrap();
        assert_eq!((r.start(), r.end()), (len - 365, len - 1));

        let r = resolve_range(&s, "AMZN", &range_args(None, None, Some(10))).unwrap();
        assert_eq!(r.len(), 10);

        let r = resolve_range(&s, "AMZN", &range_args(Some(5), None, None)).unwrap();
        assert_eq!((r.start(), r.end()), (5, len - 1));

        assert!(resolve_range(&s, "AMZN", &range_args(None, None, Some(0))).is_err());
        assert!(resolve_range(&s, "AMZN", &range_args(Some(9), Some(3), None)).is_err());
        assert!(resolve_range(&s, "TSLA", &range_args(None, None, None)).is_err());
    }
}
