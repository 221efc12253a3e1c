use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use flixstat::config::{AnalysisConfig, DEFAULT_CONFIG_FILE};
use flixstat::data::Titles;
use flixstat::report::Report;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Descriptive statistics over a catalog of streaming movies and shows.
#[derive(Debug, Parser)]
#[command(name = "flixstat", version)]
struct Cli {
    /// CSV file with one row per title.
    #[arg(default_value = "imdb_movies_shows.csv")]
    csv: PathBuf,

    /// TOML file with analysis settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Year of the age-certification breakdown.
    #[arg(short, long)]
    year: Option<i32>,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("flixstat error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config_file = match &cli.config {
        Some(path) if !path.is_file() => {
            bail!("config file '{}' does not exist", path.display())
        }
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    let mut config = AnalysisConfig::load(&config_file).context("failed to load configuration")?;
    if let Some(year) = cli.year {
        config.focus_year = year;
    }

    let titles = Titles::load(&cli.csv)
        .with_context(|| format!("failed to load titles from '{}'", cli.csv.display()))?;
    let report = Report::build(&titles, &config);

    match cli.format {
        OutputFormat::Table => print!("{}", report.render_tables()),
        OutputFormat::Json => println!("{}", report.to_json().context("failed to encode report")?),
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FLIXSTAT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
