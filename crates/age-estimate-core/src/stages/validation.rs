//! Payload validation.
//!
//! Checks the raw JSON request against the configured constraints before any
//! image work happens. Check order is: object shape, consent, image,
//! confidence level, optional flags, detector hints.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{FaceRegion, ServiceConfig, ValidatedRequest};
use crate::error::{PipelineError, PipelineResult};

/// Accepted keys for the image payload, in lookup order.
const IMAGE_KEYS: &[&str] = &["image", "image_base64"];

const HINTS_FIELD: &str = "detector_hints";

/// Validates a raw request payload.
///
/// # Errors
///
/// - [`PipelineError::MalformedPayload`] if the payload is not an object or a
///   field has the wrong shape.
/// - [`PipelineError::Consent`] if consent is absent or false.
/// - [`PipelineError::InvalidConfidenceLevel`] if the level is not allowed.
pub fn validate(payload: &Value, config: &ServiceConfig) -> PipelineResult<ValidatedRequest> {
    let Some(fields) = payload.as_object() else {
        return Err(PipelineError::MalformedPayload {
            field: None,
            message: String::from("payload must be a JSON object"),
        });
    };

    check_consent(fields)?;
    let image = image_field(fields)?;

    let confidence_level = match present(fields, "confidence_level") {
        None => config.default_confidence_level.clone(),
        Some(Value::String(level)) => level.clone(),
        Some(_) => {
            return Err(PipelineError::malformed(
                "confidence_level",
                "confidence_level must be a string",
            ))
        }
    };
    if !config.is_allowed_level(&confidence_level) {
        return Err(PipelineError::InvalidConfidenceLevel {
            level: confidence_level,
            allowed: config.allowed_confidence_levels.clone(),
        });
    }

    let return_face_bbox = match present(fields, "return_face_bbox") {
        None => config.return_face_bbox_default,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            return Err(PipelineError::malformed(
                "return_face_bbox",
                "return_face_bbox must be a boolean",
            ))
        }
    };

    let detector_hints = detector_hints(fields)?;

    debug!(
        confidence_level = %confidence_level,
        return_face_bbox,
        hints = detector_hints.len(),
        "Request validated"
    );

    Ok(ValidatedRequest {
        image,
        confidence_level,
        return_face_bbox,
        detector_hints,
    })
}

/// Looks up a field, treating JSON `null` as absent.
fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

fn check_consent(fields: &Map<String, Value>) -> PipelineResult<()> {
    match present(fields, "consent") {
        Some(Value::Bool(true)) => Ok(()),
        None | Some(Value::Bool(false)) => Err(PipelineError::Consent),
        Some(_) => Err(PipelineError::malformed(
            "consent",
            "consent must be a boolean",
        )),
    }
}

fn image_field(fields: &Map<String, Value>) -> PipelineResult<String> {
    let value = IMAGE_KEYS.iter().find_map(|key| present(fields, key));
    match value {
        None => Err(PipelineError::malformed("image", "image is required")),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(_) => Err(PipelineError::malformed(
            "image",
            "image must be a non-empty base64 string",
        )),
    }
}

/// Parses the optional `detector_hints` list of `{x, y, width, height}`
/// boxes. Coordinates must be non-negative integers; bounds are checked
/// later by the cropper.
fn detector_hints(fields: &Map<String, Value>) -> PipelineResult<Vec<FaceRegion>> {
    let entries = match present(fields, HINTS_FIELD) {
        None => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(PipelineError::malformed(
                HINTS_FIELD,
                "detector_hints must be a list",
            ))
        }
    };

    entries
        .iter()
        .map(|entry| {
            let Some(hint) = entry.as_object() else {
                return Err(PipelineError::malformed(
                    HINTS_FIELD,
                    "detector_hints entries must be objects",
                ));
            };
            Ok(FaceRegion::new(
                hint_coordinate(hint, "x")?,
                hint_coordinate(hint, "y")?,
                hint_coordinate(hint, "width")?,
                hint_coordinate(hint, "height")?,
            ))
        })
        .collect()
}

fn hint_coordinate(hint: &Map<String, Value>, key: &str) -> PipelineResult<u32> {
    hint.get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            PipelineError::malformed(
                HINTS_FIELD,
                format!("invalid detector hint: '{key}' must be a non-negative integer"),
            )
        })
}
