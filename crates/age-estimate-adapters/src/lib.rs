//! Age Estimate Adapters - External adapters for age-estimate.
//!
//! This crate provides adapters for:
//! - Service config loading (TOML or JSON, with an embedded default)
//! - Reading request documents from files or stdin

pub mod request;
pub mod service_config;

pub use request::{parse_request, RequestSource};
pub use service_config::{
    load_service_config, parse_service_config, ConfigFormat, DEFAULT_SERVICE_CONFIG,
};
