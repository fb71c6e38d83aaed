//! Typed pipeline errors.

use serde::Serialize;
use thiserror::Error;

/// Result type for pipeline stages.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Every way a single inference request can fail.
///
/// All variants are terminal for the request. Use [`PipelineError::kind`] to
/// map an error onto a transport-specific response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("consent must be granted to process the image")]
    Consent,

    #[error("confidence level '{level}' is not supported (expected one of: {})", .allowed.join(", "))]
    InvalidConfidenceLevel { level: String, allowed: Vec<String> },

    #[error("malformed payload: {message}")]
    MalformedPayload {
        field: Option<String>,
        message: String,
    },

    #[error("invalid base64 encoded image: {0}")]
    ImageDecode(String),

    #[error("invalid image payload: {0}")]
    ImageFormat(String),

    #[error("image is {width}x{height}, below the minimum resolution ({requirement})")]
    LowResolution {
        width: u32,
        height: u32,
        requirement: String,
    },

    #[error("no face detected")]
    NoFaceDetected,

    #[error("{count} faces detected, exactly one is required")]
    MultipleFacesDetected { count: usize },

    #[error("face appears occluded")]
    OccludedFace,

    #[error("face region {region} lies outside the {width}x{height} image")]
    InvalidRegion {
        region: String,
        width: u32,
        height: u32,
    },

    #[error("estimation failed: {0}")]
    Estimation(String),
}

impl PipelineError {
    /// Create a malformed payload error tied to a request field.
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Create an image format error.
    pub fn image_format(message: impl Into<String>) -> Self {
        Self::ImageFormat(message.into())
    }

    /// Create an estimation error.
    pub fn estimation(message: impl Into<String>) -> Self {
        Self::Estimation(message.into())
    }

    /// Returns the stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Consent => ErrorKind::Consent,
            Self::InvalidConfidenceLevel { .. } => ErrorKind::InvalidConfidenceLevel,
            Self::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            Self::ImageDecode(_) => ErrorKind::ImageDecode,
            Self::ImageFormat(_) => ErrorKind::ImageFormat,
            Self::LowResolution { .. } => ErrorKind::LowResolution,
            Self::NoFaceDetected => ErrorKind::NoFaceDetected,
            Self::MultipleFacesDetected { .. } => ErrorKind::MultipleFacesDetected,
            Self::OccludedFace => ErrorKind::OccludedFace,
            Self::InvalidRegion { .. } => ErrorKind::InvalidRegion,
            Self::Estimation(_) => ErrorKind::Estimation,
        }
    }

    /// Whether the caller can fix the request and try again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }

    /// Message safe to hand back to a caller.
    ///
    /// Internal faults are collapsed into a generic message; the detail is
    /// only available through `Display`.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_recoverable() {
            self.to_string()
        } else {
            String::from("internal error while estimating age")
        }
    }
}

/// Stable, serializable error kinds.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Consent,
    InvalidConfidenceLevel,
    MalformedPayload,
    ImageDecode,
    ImageFormat,
    LowResolution,
    NoFaceDetected,
    MultipleFacesDetected,
    OccludedFace,
    InvalidRegion,
    Estimation,
}

impl ErrorKind {
    /// Whether errors of this kind are caused by the request rather than a bug.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, Self::InvalidRegion | Self::Estimation)
    }

    /// The snake_case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consent => "consent",
            Self::InvalidConfidenceLevel => "invalid_confidence_level",
            Self::MalformedPayload => "malformed_payload",
            Self::ImageDecode => "image_decode",
            Self::ImageFormat => "image_format",
            Self::LowResolution => "low_resolution",
            Self::NoFaceDetected => "no_face_detected",
            Self::MultipleFacesDetected => "multiple_faces_detected",
            Self::OccludedFace => "occluded_face",
            Self::InvalidRegion => "invalid_region",
            Self::Estimation => "estimation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable error body for output adapters.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Error kind.
    pub kind: ErrorKind,
    /// Human readable message.
    pub message: String,
    /// Whether the caller can fix the request.
    pub recoverable: bool,
    /// Offending request field, for malformed payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&PipelineError> for ErrorReport {
    fn from(err: &PipelineError) -> Self {
        let field = match err {
            PipelineError::MalformedPayload { field, .. } => field.clone(),
            _ => None,
        };
        Self {
            kind: err.kind(),
            message: err.public_message(),
            recoverable: err.is_recoverable(),
            field,
        }
    }
}
