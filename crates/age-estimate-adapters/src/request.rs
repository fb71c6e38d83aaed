//! Request document adapter.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use age_estimate_core::{PipelineError, PipelineResult};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// Where a request document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSource {
    /// Standard input.
    Stdin,
    /// A file on disk.
    File(PathBuf),
}

impl RequestSource {
    /// Interprets a CLI argument; `None` and `-` both mean stdin.
    #[must_use]
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => Self::File(path.to_path_buf()),
            _ => Self::Stdin,
        }
    }

    /// Reads the raw document bytes.
    ///
    /// Encoding is not checked here; [`parse_request`] rejects anything that
    /// is not UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    pub fn read(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            Self::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .context("Failed to read request from stdin")?;
                buf
            }
            Self::File(path) => fs::read(path)
                .with_context(|| format!("Failed to read request: {}", path.display()))?,
        };
        debug!(bytes = bytes.len(), source = ?self, "Request read");
        Ok(bytes)
    }
}

/// Parses a request document into a JSON value.
///
/// Bytes that are not UTF-8 JSON are a malformed payload, not an I/O failure.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedPayload`] if the bytes are not valid JSON.
pub fn parse_request(bytes: &[u8]) -> PipelineResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| PipelineError::MalformedPayload {
        field: None,
        message: format!("request is not valid JSON: {e}"),
    })
}
