//! Config command - inspect the resolved service config.

use std::path::PathBuf;

use age_estimate_adapters::load_service_config;
use anyhow::Result;
use clap::Args;

use crate::config::AppConfig;

/// Arguments for the config command
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Service config document (TOML, or JSON by extension)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only validate; print nothing on success
    #[arg(long)]
    pub check: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ConfigArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.config.is_none() {
            args.config.clone_from(&config.service.config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args
    }
}

/// Run the config command.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let service = load_service_config(args.config.as_deref())?;
    if args.check {
        eprintln!("service config OK: {} {}", service.model.name, service.model.version);
        return Ok(());
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&service)?
    } else {
        serde_json::to_string(&service)?
    };
    println!("{json}");
    Ok(())
}
