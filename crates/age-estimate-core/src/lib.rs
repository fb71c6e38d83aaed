//! Age Estimate Core - Domain types, pipeline stages and orchestration
//!
//! This crate contains the request/response domain model, the ports that
//! detectors, models and outputs plug into, the reference stage
//! implementations, and the single-request inference pipeline.

pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod stages;

pub use domain::{
    AgeEstimate, DetectionOutcome, FaceRegion, InferenceResult, ModelInfo, NormalizedImage,
    ServiceConfig,
};
pub use error::{ErrorKind, ErrorReport, PipelineError, PipelineResult};
pub use pipeline::{run_inference, AgeEstimationPipeline};
pub use ports::{AgeModel, FaceDetector, ResultOutput};
