//! Trait definition for the external text-generation service.
//!
//! Implemented by the `skillpath-providers` crate. The credential travels
//! with each call because it may be supplied per request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for text-generation backends that turn a prompt into text.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Human-readable service name, used in failure summaries (e.g. "Gemini").
    fn name(&self) -> &str;

    /// Send one generation request. Implementations must not retry.
    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> anyhow::Result<String>;
}

/// Body of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The full natural-language prompt.
    pub prompt: String,
    /// Maximum tokens the service may produce.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Default output budget for roadmap generation.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 800;

/// Default sampling temperature for roadmap generation.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
