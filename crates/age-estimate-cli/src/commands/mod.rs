//! CLI command definitions and handlers.

pub mod config;
pub mod encode;
pub mod estimate;

use clap::{Parser, Subcommand};

/// Age Estimate - Single-image age estimation with calibrated intervals
#[derive(Parser)]
#[command(name = "age-estimate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared estimate arguments (request, config, output flags).
    #[command(flatten)]
    pub estimate: estimate::EstimateArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Estimate age for one request document
    Estimate(estimate::EstimateArgs),
    /// Build a synthetic image payload or request
    Encode(encode::EncodeArgs),
    /// Show or check the resolved service config
    Config(config::ConfigArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Request processed.
    Success,
    /// Request rejected for a reason the caller can fix.
    Rejected,
    /// Internal fault, bad config, or I/O failure.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::Rejected => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
