//! Age Estimate CLI - Single-image age estimation tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Estimate(args)) => estimate(args),
        Some(Commands::Encode(ref args)) => match commands::encode::run(args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        Some(Commands::Config(args)) => {
            let args = commands::config::ConfigArgs::with_config(args, &AppConfig::load());
            match commands::config::run(&args) {
                Ok(()) => ExitCode::Success,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        // Default behavior: estimate with flattened args
        None => estimate(cli.estimate),
    };

    exit_code.into()
}

fn estimate(args: commands::estimate::EstimateArgs) -> ExitCode {
    let args = commands::estimate::EstimateArgs::with_config(args, &AppConfig::load());
    match commands::estimate::run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
