//! Core domain types for age estimation.

mod config;
mod face;
mod normalized;
mod request;
mod result;

pub use config::{
    Calibration, DetectorConfig, ModelMetadata, ServiceConfig, DEFAULT_INPUT_SIZE,
    DEFAULT_MAX_PIXEL_COUNT,
};
pub use face::{DetectionOutcome, FaceRegion};
pub use normalized::{CroppedImage, NormalizedImage};
pub use request::ValidatedRequest;
pub use result::{AgeEstimate, InferenceResult, ModelInfo};
