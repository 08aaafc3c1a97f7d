//! # classy CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use classy_cli::config::{load_config, run_config, ConfigArgs, LogSettings};
use classy_cli::load::{run_load, LoadArgs};
use classy_cli::render::{run_render, RenderArgs};
use classy_cli::validate::{run_validate, ValidateArgs};

/// classyjson CLI
///
/// Validates, renders, and loads structured data through JSON Schema
/// literals, and inspects versioned configuration files.
#[derive(Parser, Debug)]
#[command(name = "classy", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a versioned configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate data against a schema literal.
    Validate(ValidateArgs),

    /// Print the rendered document of a schema literal.
    Render(RenderArgs),

    /// Load data through a schema literal and print the result.
    Load(LoadArgs),

    /// Load and print a versioned configuration file.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = cli.config.as_deref().map(load_config);
    let settings = match &config {
        Some(Ok(instance)) => LogSettings::from_config(instance),
        _ => None,
    };
    init_tracing(cli.verbose, settings.as_ref());

    tracing::debug!("classy CLI starting");
    if let Some(Err(e)) = &config {
        tracing::warn!(error = %e, "configuration file not applied");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &mut out),
        Commands::Render(args) => run_render(&args, &mut out),
        Commands::Load(args) => run_load(&args, &mut out),
        Commands::Config(args) => run_config(&args, cli.config.as_deref(), &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Install the subscriber on stderr. `-v` wins over the configured level.
fn init_tracing(verbose: u8, settings: Option<&LogSettings>) {
    let level = match (verbose, settings) {
        (0, Some(settings)) => settings.level.as_str(),
        (0, None) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(level);

    if settings.is_some_and(|s| s.json) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
