//! Pipeline stage implementations.
//!
//! Each stage is a pure function of its inputs and the config snapshot, or a
//! port implementation.

mod assembler;
mod crop;
mod detector;
mod estimator;
mod loader;
mod validation;

pub use assembler::assemble;
pub use crop::crop;
pub use detector::IntensityBandDetector;
pub use estimator::{estimate, estimate_with, CalibratedLinearModel};
pub use loader::load;
pub use validation::validate;
