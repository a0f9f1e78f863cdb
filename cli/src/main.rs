#![deny(missing_docs)]

//! # API Doc CLI
//!
//! Command Line Interface for documenting a Rust API crate from its
//! metadata snapshot.
//!
//! Supported Commands:
//! - `describe`: Adds description attributes and fills the description and external model registries.
//! - `samples`: Creates or completes response example documents.

use apidoc_core::{FsWorkspace, Reporter, RunReport, SnapshotSession, StdoutReporter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ConventionArgs;
use crate::error::CliResult;

mod config;
mod describe;
mod error;
mod samples;

#[derive(Parser, Debug)]
#[clap(author, version, about = "API documentation toolchain")]
struct Cli {
    /// Metadata snapshot of the API crate (`.json` or `.yaml`).
    #[clap(long, env = "APIDOC_SNAPSHOT")]
    snapshot: PathBuf,

    /// Root directory of the API crate's sources.
    #[clap(long, env = "APIDOC_PROJECT", default_value = ".")]
    project: PathBuf,

    /// Config file with naming conventions. Defaults to `apidoc.yaml` in the project.
    #[clap(long, env = "APIDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug detail.
    #[clap(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only.
    #[clap(short, long)]
    quiet: bool,

    #[clap(flatten)]
    conventions: ConventionArgs,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate models with description attributes.
    Describe(describe::DescribeArgs),
    /// Create response examples for response models.
    Samples(samples::SamplesArgs),
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, reporter: &mut dyn Reporter) -> CliResult<RunReport> {
    let mut conventions = config::load(cli.config.as_deref(), &cli.project)?;
    cli.conventions.apply(&mut conventions);

    let session = SnapshotSession::open(&cli.snapshot)?;
    let mut docs = FsWorkspace::open(&cli.project)?;

    let report = match &cli.command {
        Commands::Describe(args) => {
            describe::execute(args, &session, &conventions, &mut docs, reporter)?
        }
        Commands::Samples(args) => {
            samples::execute(args, &session, &conventions, &mut docs, reporter)?
        }
    };
    Ok(report)
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let report = run(&cli, &mut StdoutReporter)?;
    print!("{}", report);

    Ok(())
}
