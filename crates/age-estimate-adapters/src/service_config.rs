//! Service config loading.
//!
//! Resolves the read-only [`ServiceConfig`] snapshot once, before any request
//! is processed. Documents are TOML unless the file name ends in `.json`.

use std::fs;
use std::path::Path;

use age_estimate_core::ServiceConfig;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Service document used when no path is given.
pub const DEFAULT_SERVICE_CONFIG: &str = include_str!("../../../config/age_service.toml");

/// Serialization format of a service document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension, defaulting to TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::Json
        } else {
            Self::Toml
        }
    }
}

/// Loads and validates the service config.
///
/// With `None`, the embedded default document is used.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or fails
/// validation.
pub fn load_service_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read service config: {}", path.display()))?;
            parse_service_config(&text, ConfigFormat::from_path(path))
                .with_context(|| format!("Invalid service config: {}", path.display()))?
        }
        None => parse_service_config(DEFAULT_SERVICE_CONFIG, ConfigFormat::Toml)
            .context("Invalid built-in service config")?,
    };

    info!(
        model = %config.model.name,
        version = %config.model.version,
        detector = %config.detector.name,
        "Service config loaded"
    );

    Ok(config)
}

/// Parses and validates a service document.
///
/// Allowed levels without an error margin are accepted with a warning; a
/// request for such a level fails at estimation time.
///
/// # Errors
///
/// Returns an error if the text does not parse or fails validation.
pub fn parse_service_config(text: &str, format: ConfigFormat) -> Result<ServiceConfig> {
    let config: ServiceConfig = match format {
        ConfigFormat::Toml => toml::from_str(text).context("Failed to parse TOML")?,
        ConfigFormat::Json => serde_json::from_str(text).context("Failed to parse JSON")?,
    };
    debug!(?format, "Service document parsed");

    config.validate().map_err(anyhow::Error::msg)?;

    for level in config.levels_without_margin() {
        warn!(level, "Confidence level has no error margin configured");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_is_valid() {
        let config = parse_service_config(DEFAULT_SERVICE_CONFIG, ConfigFormat::Toml);
        assert!(config.is_ok(), "{config:?}");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Toml);
    }

    #[test]
    fn test_invalid_default_level_rejected() {
        let text = DEFAULT_SERVICE_CONFIG.replace(
            "default_confidence_level = \"medium\"",
            "default_confidence_level = \"extreme\"",
        );
        assert!(parse_service_config(&text, ConfigFormat::Toml).is_err());
    }

    #[test]
    fn test_missing_margin_only_warns() {
        let text = DEFAULT_SERVICE_CONFIG.replace("high = 4.0\n", "");
        let config = parse_service_config(&text, ConfigFormat::Toml);
        assert!(config.is_ok_and(|c| c.levels_without_margin() == vec!["high"]));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_service_config("not = [valid", ConfigFormat::Toml).is_err());
        assert!(parse_service_config("{", ConfigFormat::Json).is_err());
    }
}
