//! Test support utilities for age-estimate.
//!
//! Provides request builders, a sample service config, and mocks of the
//! core ports for testing the inference pipeline.
//!
//! # Example
//!
//! ```
//! use age_estimate_core::run_inference;
//! use age_estimate_test_support::{sample_config, PayloadBuilder};
//!
//! let payload = PayloadBuilder::face(128, 128).level("high").build();
//! let result = run_inference(&payload, &sample_config());
//! assert!(result.is_ok());
//! ```

mod builders;
mod mocks;

pub use builders::{encode_image, sample_config, PayloadBuilder};
pub use mocks::{MockAgeModel, MockFaceDetector, MockResultOutput};
