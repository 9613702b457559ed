use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pathlab_extract::{
    ColumnBreakpoints, ExtractionResult, LayoutProfile, VerticalWindow, extract_pdf_file,
    to_json_string, write_csv, write_csv_to_string, write_json,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "lab2json",
    version,
    about = "Extract patient details and test results from a lab report PDF"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract the first page of a report.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Patient details and tests as one JSON document.
    Json,
    /// Test rows only.
    Csv,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// JSON layout profile; missing keys keep their defaults.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Column breakpoints as test_end,results_end,units_end.
    #[arg(long)]
    columns: Option<String>,

    /// Vertical table window as start,end.
    #[arg(long)]
    window: Option<String>,

    /// Maximum vertical distance between tokens of one row.
    #[arg(long)]
    row_threshold: Option<f64>,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Log per-row decisions to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn load_profile(path: &Path) -> Result<LayoutProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid profile '{}'", path.display()))
}

fn parse_profile(args: &ExtractArgs) -> Result<LayoutProfile> {
    let mut profile = match &args.profile {
        Some(path) => load_profile(path)?,
        None => LayoutProfile::default(),
    };

    if let Some(columns) = args.columns.as_deref() {
        profile.columns = ColumnBreakpoints::from_str(columns)
            .map_err(|error| anyhow!("invalid column breakpoints: {error}"))
            .context("failed to parse --columns")?;
    }
    if let Some(window) = args.window.as_deref() {
        profile.window = VerticalWindow::from_str(window)
            .map_err(|error| anyhow!("invalid table window: {error}"))
            .context("failed to parse --window")?;
    }
    if let Some(row_threshold) = args.row_threshold {
        profile.row_threshold = row_threshold;
    }

    profile.validate()?;
    Ok(profile)
}

fn emit(args: &ExtractArgs, result: &ExtractionResult) -> Result<()> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }
    let delimiter = args.delimiter as u8;

    match (&args.output, args.format) {
        (Some(path), OutputFormat::Json) => write_json(path, result)?,
        (Some(path), OutputFormat::Csv) => write_csv(path, &result.tests, delimiter)?,
        (None, format) => {
            let rendered = match format {
                OutputFormat::Json => to_json_string(result)?,
                OutputFormat::Csv => write_csv_to_string(&result.tests, delimiter)?,
            };
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if format == OutputFormat::Json {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionResult> {
    let profile = parse_profile(args)?;
    let result = extract_pdf_file(&args.input, &profile)
        .with_context(|| format!("failed to extract report from '{}'", args.input.display()))?;
    emit(args, &result).context("failed to write output")?;
    Ok(result)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Extract(args) = cli.command;

    let default_filter = if args.verbose {
        "pathlab_extract=debug"
    } else {
        "pathlab_extract=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run_extract(&args) {
        Ok(result) => {
            if result.tests.is_empty() {
                eprintln!("warning: no test rows found in '{}'", args.input.display());
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
