//! Image loading and normalization.
//!
//! The payload is base64 over an ASCII string `width,height,intensity`
//! describing a uniform grayscale image. Intensity may carry a fractional
//! part and is rounded to the nearest level.

// Intensity is range-checked before the cast.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::domain::{NormalizedImage, ServiceConfig};
use crate::error::{PipelineError, PipelineResult};

/// Parsed synthetic image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImageHeader {
    width: u32,
    height: u32,
    intensity: u8,
}

/// Decodes and normalizes a base64 image payload.
///
/// # Errors
///
/// - [`PipelineError::ImageDecode`] if the base64 is invalid.
/// - [`PipelineError::ImageFormat`] if the payload is not
///   `width,height,intensity` with positive dimensions and intensity in
///   `[0, 255]`, or if the image exceeds `max_pixel_count`.
/// - [`PipelineError::LowResolution`] if the image is below the configured
///   minimum.
pub fn load(encoded: &str, config: &ServiceConfig) -> PipelineResult<NormalizedImage> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|e| PipelineError::ImageDecode(e.to_string()))?;

    if !raw.is_ascii() {
        return Err(PipelineError::image_format("image payload must be ASCII"));
    }
    // ASCII is always valid UTF-8.
    let payload = String::from_utf8_lossy(&raw);
    let header = parse_payload(&payload)?;

    check_resolution(header, config)?;

    debug!(
        width = header.width,
        height = header.height,
        intensity = header.intensity,
        "Image decoded"
    );

    NormalizedImage::uniform(header.width, header.height, header.intensity)
        .ok_or_else(|| PipelineError::image_format("image dimensions must be positive"))
}

fn parse_payload(payload: &str) -> PipelineResult<ImageHeader> {
    let fields: Vec<&str> = payload.split(',').map(str::trim).collect();
    let [width, height, intensity] = fields.as_slice() else {
        return Err(PipelineError::image_format(
            "image payload must be width,height,intensity",
        ));
    };

    let width = parse_dimension(width, "width")?;
    let height = parse_dimension(height, "height")?;

    let intensity: f64 = intensity.parse().map_err(|_| {
        PipelineError::image_format(format!("intensity '{intensity}' is not a number"))
    })?;
    if !(0.0..=255.0).contains(&intensity) {
        return Err(PipelineError::image_format(
            "intensity must be between 0 and 255",
        ));
    }

    Ok(ImageHeader {
        width,
        height,
        intensity: intensity.round() as u8,
    })
}

fn parse_dimension(value: &str, name: &str) -> PipelineResult<u32> {
    let parsed: i64 = value.parse().map_err(|_| {
        PipelineError::image_format(format!("{name} '{value}' is not an integer"))
    })?;
    if parsed <= 0 {
        return Err(PipelineError::image_format(format!(
            "{name} must be positive, got {parsed}"
        )));
    }
    u32::try_from(parsed)
        .map_err(|_| PipelineError::image_format(format!("{name} {parsed} is too large")))
}

fn check_resolution(header: ImageHeader, config: &ServiceConfig) -> PipelineResult<()> {
    let pixels = u64::from(header.width) * u64::from(header.height);

    if pixels < config.min_pixel_count {
        return Err(PipelineError::LowResolution {
            width: header.width,
            height: header.height,
            requirement: format!("at least {} pixels", config.min_pixel_count),
        });
    }
    if let Some(min_edge) = config.min_image_edge {
        if header.width.min(header.height) < min_edge {
            return Err(PipelineError::LowResolution {
                width: header.width,
                height: header.height,
                requirement: format!("at least {min_edge}px on each edge"),
            });
        }
    }
    if pixels > config.max_pixel_count {
        return Err(PipelineError::image_format(format!(
            "image has {pixels} pixels, above the maximum of {}",
            config.max_pixel_count
        )));
    }

    Ok(())
}
