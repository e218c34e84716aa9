//! Shared utilities, configuration, and error handling for Soudan
//!
//! This crate provides common functionality used across the Soudan services:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors that validate at the boundary

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
