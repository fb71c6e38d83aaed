//! Estimate command - run one request through the pipeline.

use std::path::PathBuf;

use age_estimate_adapters::{load_service_config, parse_request, RequestSource};
use age_estimate_core::{AgeEstimationPipeline, ErrorReport, PipelineError, ResultOutput};
use anyhow::Result;
use clap::Args;
use tracing::{error, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Shared arguments for estimation.
#[derive(Args, Clone, Debug, Default)]
pub struct EstimateArgs {
    /// Request JSON file, or `-` for stdin (default: stdin)
    #[arg(value_name = "REQUEST")]
    pub request: Option<PathBuf>,

    /// Service config document (TOML, or JSON by extension)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Include the detected face box unless the request says otherwise
    #[arg(long)]
    pub include_face_bbox: bool,
}

impl EstimateArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Boolean flags can only be switched on by config when the CLI flag
    /// was not passed.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.config.is_none() {
            args.config.clone_from(&config.service.config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.include_face_bbox {
            args.include_face_bbox = config.output.include_face_bbox.unwrap_or(false);
        }
        args
    }
}

/// Run the estimate command.
///
/// Pipeline rejections are reported on stdout and map to an exit code;
/// only config and I/O failures are returned as errors.
pub fn run(args: &EstimateArgs) -> Result<ExitCode> {
    let mut service = load_service_config(args.config.as_deref())?;
    if args.include_face_bbox {
        service.return_face_bbox_default = true;
    }

    let source = RequestSource::from_arg(args.request.as_deref());
    info!("Reading request from {source:?}");
    let document = source.read()?;

    let output = JsonOutput::stdout(args.pretty);
    let pipeline = AgeEstimationPipeline::new(service);

    let outcome = parse_request(&document).and_then(|payload| pipeline.run(&payload));
    let code = match outcome {
        Ok(result) => {
            output.write(&result)?;
            ExitCode::Success
        }
        Err(err) => report_error(&output, &err)?,
    };
    output.flush()?;

    Ok(code)
}

/// Writes the error envelope and picks the exit code.
fn report_error(output: &JsonOutput, err: &PipelineError) -> Result<ExitCode> {
    if !err.is_recoverable() {
        error!(kind = %err.kind(), "Internal fault: {err}");
    }
    output.write_error(&ErrorReport::from(err))?;
    Ok(if err.is_recoverable() {
        ExitCode::Rejected
    } else {
        ExitCode::Error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_config(pretty: Option<bool>, bbox: Option<bool>, path: Option<&str>) -> AppConfig {
        let mut config = AppConfig::default();
        config.output.pretty = pretty;
        config.output.include_face_bbox = bbox;
        config.service.config = path.map(PathBuf::from);
        config
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let args = EstimateArgs::with_config(
            EstimateArgs::default(),
            &app_config(Some(true), Some(true), Some("/svc.toml")),
        );
        assert!(args.pretty);
        assert!(args.include_face_bbox);
        assert_eq!(args.config, Some(PathBuf::from("/svc.toml")));
    }

    #[test]
    fn test_cli_path_wins_over_config() {
        let cli = EstimateArgs {
            config: Some(PathBuf::from("/cli.toml")),
            ..EstimateArgs::default()
        };
        let args = EstimateArgs::with_config(cli, &app_config(None, None, Some("/svc.toml")));
        assert_eq!(args.config, Some(PathBuf::from("/cli.toml")));
    }

    #[test]
    fn test_cli_flag_wins_over_config_false() {
        let cli = EstimateArgs {
            pretty: true,
            ..EstimateArgs::default()
        };
        let args = EstimateArgs::with_config(cli, &app_config(Some(false), None, None));
        assert!(args.pretty);
    }
}
