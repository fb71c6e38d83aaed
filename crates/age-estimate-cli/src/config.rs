//! Configuration file support for age-estimate.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/age-estimate/config.toml` (lowest priority)
//! - Project-local: `.age-estimate.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

/// Project-local config file name.
const PROJECT_CONFIG_FILE: &str = ".age-estimate.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service document settings.
    pub service: ServiceSection,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Service document location.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Path to the service config document.
    ///
    /// Relative paths are resolved against the directory of the file that
    /// sets them.
    pub config: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Include the detected face box in results.
    pub include_face_bbox: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/age-estimate/config.toml`
    /// 2. Project-local: `.age-estimate.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid files are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            warn!("Ignoring service.config: {e}");
            config.service.config = None;
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.service.config {
            if path.as_os_str().is_empty() {
                return Err("service.config must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Service
        self.service.config = other.service.config.or_else(|| self.service.config.take());

        // Output
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.include_face_bbox = other
            .output
            .include_face_bbox
            .or(self.output.include_face_bbox);
    }

    /// Resolves relative paths against `base`.
    fn resolve_paths(&mut self, base: &Path) {
        if let Some(path) = self.service.config.take() {
            self.service.config = Some(if path.is_relative() {
                base.join(path)
            } else {
                path
            });
        }
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("age-estimate").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.age-estimate.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(mut config) => {
            if let Some(dir) = path.parent() {
                config.resolve_paths(dir);
            }
            Some(config)
        }
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
