//! Batch harness for the `reconstruct` tool.
//!
//! Runs every fixture in a directory through the collaborator, one at a time,
//! and prints a collapsed report suitable for diffing between runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use reconstruct_harness::core::report::render_text;
use reconstruct_harness::core::types::Report;
use reconstruct_harness::exit_codes;
use reconstruct_harness::io::config::{DEFAULT_CONFIG_FILE, HarnessConfig, load_config};
use reconstruct_harness::logging;
use reconstruct_harness::run::run_harness;

#[derive(Parser, Debug)]
#[command(
    name = "reconstruct-harness",
    version,
    about = "Run fixtures through reconstruct and print a collapsed report"
)]
struct Cli {
    /// Directory to scan for fixtures (default: current directory).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Config file (default: `reconstruct-harness.toml` in the scanned directory, if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Collaborator command and leading arguments; the fixture name is appended.
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    command: Option<Vec<String>>,

    /// Process fixtures in name order instead of directory order.
    #[arg(long)]
    sorted: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let workdir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let config = resolve_config(&cli, &workdir)?;
    let report = run_harness(&workdir, &config)?;
    print_report(&report, &config, cli.format)
}

fn resolve_config(cli: &Cli, workdir: &Path) -> Result<HarnessConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("config {} not found", path.display());
            }
            load_config(path)?
        }
        None => load_config(&workdir.join(DEFAULT_CONFIG_FILE))?,
    };
    if let Some(command) = &cli.command {
        config.collaborator.command = command.clone();
    }
    if cli.sorted {
        config.selection.sorted = true;
    }
    config.validate().context("apply command-line overrides")?;
    Ok(config)
}

fn print_report(report: &Report, config: &HarnessConfig, format: Format) -> Result<()> {
    match format {
        Format::Text => print!("{}", render_text(report, &config.report.marker_prefix)),
        Format::Json => {
            let payload = serde_json::to_string_pretty(report).context("serialize report")?;
            println!("{payload}");
        }
    }
    Ok(())
}
