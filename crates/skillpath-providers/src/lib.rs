//! skillpath-providers — Generation-service integrations and configuration.
//!
//! Implements the `GenerationService` trait over HTTP, provides a mock for
//! tests, and loads the configuration that wires the pipeline together.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{create_pipeline, create_service, load_config, GenerationConfig, SkillpathConfig};
pub use error::GenerationError;
