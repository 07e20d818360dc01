//! # abex CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abex_cli::browse::{run_demos, run_list, run_show, run_stats, ListArgs, OutputArgs, ShowArgs};
use abex_cli::run::{run_example, run_invoke, run_validate, ExampleArgs, InputArgs};
use abex_cli::Session;

/// Ability Explorer CLI
///
/// Browse, inspect, validate, and invoke abilities described in a catalog
/// file (YAML or JSON).
#[derive(Parser, Debug)]
#[command(name = "abex", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Catalog file listing the abilities to load.
    #[arg(long, env = "ABEX_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Namespace of an active theme. Repeatable or comma-separated.
    #[arg(long = "theme", value_delimiter = ',', global = true)]
    themes: Vec<String>,

    /// Demo ability to enable for this run (e.g. site-health). Repeatable.
    #[arg(long = "enable-demo", global = true)]
    enable_demos: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search, filter, sort, and paginate abilities.
    List(ListArgs),

    /// Show one ability with its input fields and example input.
    Show(ShowArgs),

    /// Ability counts per provider.
    Stats(OutputArgs),

    /// Print a generated example input for an ability.
    Example(ExampleArgs),

    /// Check input against an ability's schema without executing it.
    Validate(InputArgs),

    /// Validate input and execute an ability.
    Invoke(InputArgs),

    /// List built-in demo abilities.
    Demos(OutputArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("abex CLI starting");

    let session = match Session::load(cli.catalog.as_deref(), &cli.themes, &cli.enable_demos) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let mut out = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::List(args) => run_list(args, &session, &mut out),
        Commands::Show(args) => run_show(args, &session, &mut out),
        Commands::Stats(args) => run_stats(args, &session, &mut out),
        Commands::Example(args) => run_example(args, &session, &mut out),
        Commands::Validate(args) => run_validate(args, &session, &mut out),
        Commands::Invoke(args) => run_invoke(args, &session, &mut out),
        Commands::Demos(args) => run_demos(args, &session, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
