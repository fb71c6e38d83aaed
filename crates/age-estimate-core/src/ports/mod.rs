//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the pipeline and pluggable
//! detectors, models, and output adapters.

mod age_model;
mod face_detector;
mod result_output;

pub use age_model::AgeModel;
pub use face_detector::FaceDetector;
pub use result_output::ResultOutput;
