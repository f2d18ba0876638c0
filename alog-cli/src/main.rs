//! CLI for alog mission logs.
//!
//! Provides commands for summarizing an alog file and printing single or
//! combined series as CSV or JSON.

use std::path::{Path, PathBuf};

use alog::{Modifier, ParseOptions, PlotSeries, SeriesStore};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// alog — Inspect and query timestamped mission logs.
#[derive(Parser)]
#[command(name = "alog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Display mission bounds, parse statistics, and per-variable counts.
    Info {
        /// Path to the alog file.
        log_path: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Print one variable as a (time, value) series.
    Query {
        /// Path to the alog file.
        log_path: PathBuf,

        /// Variable name to query.
        variable: String,

        /// Transform applied to the values (derivate or integrate).
        #[arg(long)]
        modifier: Option<Modifier>,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Combine several variables record by record.
    Combine {
        /// Path to the alog file.
        log_path: PathBuf,

        /// Variable names to combine, in order.
        #[arg(required = true)]
        variables: Vec<String>,

        /// How to combine the values at each record index.
        #[arg(long, default_value = "sum")]
        op: CombineOp,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

/// Options controlling how the log is parsed.
#[derive(Args)]
struct ParseArgs {
    /// JSON file with parse options; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only keep these variables (repeatable).
    #[arg(long)]
    include: Vec<String>,

    /// Drop these variables (repeatable).
    #[arg(long)]
    exclude: Vec<String>,

    /// Drop records that repeat the previous value of the same variable.
    #[arg(long)]
    filter_repeats: bool,

    /// Keep records that carry no value.
    #[arg(long)]
    keep_blanks: bool,
}

/// Output format for series.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON object with `times` and `values` arrays.
    Json,
}

/// Per-record combining operation.
#[derive(Clone, Copy, ValueEnum)]
enum CombineOp {
    /// Sum of all values.
    Sum,
    /// Product of all values.
    Product,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Arithmetic mean.
    Mean,
}

impl CombineOp {
    fn name(self) -> &'static str {
        match self {
            CombineOp::Sum => "sum",
            CombineOp::Product => "product",
            CombineOp::Min => "min",
            CombineOp::Max => "max",
            CombineOp::Mean => "mean",
        }
    }

    #[allow(clippy::cast_precision_loss)] // Variable counts are tiny
    fn apply(self, values: &[f64]) -> f64 {
        match self {
            CombineOp::Sum => values.iter().sum(),
            CombineOp::Product => values.iter().product(),
            CombineOp::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            CombineOp::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            CombineOp::Mean => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { log_path, parse } => cmd_info(&log_path, &parse),
        Commands::Query {
            log_path,
            variable,
            modifier,
            format,
            parse,
        } => cmd_query(&log_path, &variable, modifier, &format, &parse),
        Commands::Combine {
            log_path,
            variables,
            op,
            format,
            parse,
        } => cmd_combine(&log_path, &variables, op, &format, &parse),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Builds parse options from an optional config file plus flag overrides.
fn parse_options(args: &ParseArgs) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let mut options = match &args.config {
        Some(path) => ParseOptions::load(path)?,
        None => ParseOptions::default(),
    };

    if !args.include.is_empty() {
        options = options.with_include(args.include.iter().cloned());
    }
    if !args.exclude.is_empty() {
        options = options.with_exclude(args.exclude.iter().cloned());
    }
    if args.filter_repeats {
        options = options.filter_repeats(true);
    }
    if args.keep_blanks {
        options = options.ignore_blanks(false);
    }

    Ok(options)
}

fn open_store(log_path: &Path, args: &ParseArgs) -> Result<SeriesStore, Box<dyn std::error::Error>> {
    let options = parse_options(args)?;
    tracing::debug!(?options, path = %log_path.display(), "opening alog file");
    Ok(SeriesStore::open(log_path, &options)?)
}

/// Implements `alog info <log_path>`.
fn cmd_info(log_path: &Path, args: &ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(log_path, args)?;
    let stats = store.stats();

    println!("Log: {}", log_path.display());
    println!();
    println!("  Start:    {:.3}", store.start_time());
    println!("  End:      {:.3}", store.end_time());
    println!("  Duration: {}", format_duration(store.duration()));
    println!();
    println!("  Lines:    {}", stats.lines);
    println!("  Records:  {} ({} kept)", stats.records, stats.kept);
    println!(
        "  Dropped:  {} blank, {} filtered, {} repeated, {} malformed",
        stats.blanks_dropped, stats.filtered, stats.repeats_dropped, stats.malformed
    );
    println!();

    let summary = store.summary();
    println!("Variables: {}", summary.len());
    let width = summary.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for var in &summary {
        println!(
            "  - {:<width$} {:>8} records  [{:.3} .. {:.3}]  last={}",
            var.name,
            var.count,
            var.first_time,
            var.last_time,
            truncate(&var.last_value, 40),
        );
    }

    Ok(())
}

/// Implements `alog query <log_path> <variable>`.
fn cmd_query(
    log_path: &Path,
    variable: &str,
    modifier: Option<Modifier>,
    format: &OutputFormat,
    args: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(log_path, args)?;

    let apply = |series: &[f64]| modifier.map_or_else(|| series.to_vec(), |m| m.apply(series));
    let series = store.timed_plot_series(variable, Some(&apply))?;

    let label = match modifier {
        Some(m) => format!("{m}({variable})"),
        None => variable.to_string(),
    };
    print_series(&label, &series, format)
}

/// Implements `alog combine <log_path> <variables>...`.
fn cmd_combine(
    log_path: &Path,
    variables: &[String],
    op: CombineOp,
    format: &OutputFormat,
    args: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(log_path, args)?;

    let names: Vec<&str> = variables.iter().map(String::as_str).collect();
    let series = store.combined_plot_series(&names, |values| op.apply(values))?;

    let label = format!("{}({})", op.name(), names.join(","));
    print_series(&label, &series, format)
}

fn print_series(
    label: &str,
    series: &PlotSeries,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => {
            println!("# series={label}, points={}", series.len());
            println!("time,value");
            for (time, value) in series.points() {
                println!("{time},{value}");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "series": label,
                "count": series.len(),
                "data": series,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Formats seconds as a human-readable duration.
fn format_duration(secs: f64) -> String {
    if secs >= 3600.0 {
        let hours = (secs / 3600.0).floor();
        let minutes = ((secs % 3600.0) / 60.0).floor();
        format!("{hours:.0}h {minutes:.0}m {:.1}s", secs % 60.0)
    } else if secs >= 60.0 {
        format!("{:.0}m {:.1}s", (secs / 60.0).floor(), secs % 60.0)
    } else {
        format!("{secs:.1}s")
    }
}

/// Shortens long values for display.
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let head: String = value.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
