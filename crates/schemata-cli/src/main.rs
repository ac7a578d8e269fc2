//! # schemata CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to the subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use schemata_cli::list::{run_list, ListArgs};
use schemata_cli::materialize::{run_materialize, MaterializeArgs};

/// Schema composition toolchain.
///
/// Replays YAML declaration manifests and prints the JSON schemas they
/// describe.
#[derive(Parser, Debug)]
#[command(name = "schemata", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log events as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print materialized schemas for a manifest.
    Materialize(MaterializeArgs),

    /// List the types a manifest registers.
    List(ListArgs),
}

fn init_tracing(verbose: u8, log_json: bool) {
    // RUST_LOG takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = match &cli.command {
        Commands::Materialize(args) => run_materialize(args),
        Commands::List(args) => run_list(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
