//! stickctl - replay and configuration tool for the stick limiter
//!
//! Feeds recorded left-stick traces through the limiter off-target so the
//! shaped output can be inspected, and validates limiter configuration files.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;
mod trace;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stickshape_limiter::TimeBase;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "stickctl")]
#[command(about = "Replay stick traces through the analog limiter and check its configuration")]
#[command(version)]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shape a JSON-lines trace of raw stick samples
    Replay {
        /// Limiter configuration file (JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sample spacing in 4 µs ticks
        #[arg(short, long, default_value_t = TimeBase::DEFAULT.sample_spacing())]
        spacing: u16,

        /// Starting value of the sample clock
        #[arg(long, default_value_t = 0)]
        start: u16,

        /// Trace file, or `-` for stdin
        input: Option<PathBuf>,
    },

    /// Validate a limiter configuration file
    CheckConfig {
        /// Configuration file (JSON)
        path: PathBuf,
    },

    /// Print the default limiter configuration
    Defaults {
        /// Print the configuration with every detector and jitter disabled
        #[arg(long)]
        pure_easing: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("stickctl={log_level},stickshape_limiter={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e
                .downcast_ref::<CliError>()
                .map(CliError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Replay {
            config,
            spacing,
            start,
            input,
        } => commands::replay(config.as_deref(), *spacing, *start, input.as_deref(), cli.json),
        Commands::CheckConfig { path } => commands::check_config(path, cli.json),
        Commands::Defaults { pure_easing } => commands::defaults(*pure_easing),
    }
}
