use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use geodata_tools::config::Config;
use geodata_tools::model::{Level, Strategy};
use geodata_tools::{Result, ToolError, compare, io, menu};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))?;

    match cli.command {
        Command::Compare(args) => execute_compare(args),
        Command::Menu(args) => menu::run_menu(&load_config(args.config.as_deref())?),
    }
}

fn execute_compare(args: CompareArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let threshold = args.threshold.unwrap_or(config.fuzzy_threshold);
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());

    let bundle = io::excel_read::load_bundle(&config)?;
    let outcomes = compare::run_comparisons(
        &bundle,
        args.level.into(),
        args.method.into(),
        threshold,
        &output_dir,
    )?;
    for outcome in &outcomes {
        compare::print_summary(bundle.reference.name(), outcome);
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile administrative-area names across geographic reference datasets."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one comparison batch and export the results.
    Compare(CompareArgs),
    /// Pick granularity and strategy interactively, looping until exit.
    Menu(MenuArgs),
}

#[derive(clap::Args)]
struct CompareArgs {
    /// Comparison granularity.
    #[arg(long, value_enum)]
    level: LevelArg,

    /// Matching strategy.
    #[arg(long, value_enum)]
    method: MethodArg,

    /// Fuzzy-match acceptance threshold (0-100); overrides the
    /// configured value.
    #[arg(long)]
    threshold: Option<f64>,

    /// Path of a JSON configuration file describing the datasets.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the comparison workbooks are written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
struct MenuArgs {
    /// Path of a JSON configuration file describing the datasets.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LevelArg {
    /// Commune (ADM2) names only.
    Commune,
    /// Commune + section communale names.
    CommuneSection,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MethodArg {
    Exact,
    CaseInsensitive,
    Normalized,
    Fuzzy,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Commune => Level::Commune,
            LevelArg::CommuneSection => Level::CommuneSection,
        }
    }
}

impl From<MethodArg> for Strategy {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Exact => Strategy::Exact,
            MethodArg::CaseInsensitive => Strategy::CaseInsensitive,
            MethodArg::Normalized => Strategy::Normalized,
            MethodArg::Fuzzy => Strategy::Fuzzy,
        }
    }
}
