//! Configuration loading and pipeline factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillpath_core::classifier::ClassifierAdapter;
use skillpath_core::traits::{GenerationService, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use skillpath_core::{QuestionBank, RoadmapGenerator, SubmissionPipeline};

use crate::gemini::{GeminiClient, DEFAULT_ENDPOINT, DEFAULT_SERVICE_NAME, DEFAULT_TIMEOUT_SECS};

/// Generation-service settings.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Endpoint receiving the generation POST.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Process-wide key; a per-request key takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Name used in failure summaries.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("service_name", &self.service_name)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            service_name: default_service_name(),
            timeout_secs: default_timeout(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

/// Top-level skillpath configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillpathConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Classifier artifact, probed once at startup.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// JSON file holding users, results and feedback.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/xgb_model.json")
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./skillpath-data.json")
}

impl Default for SkillpathConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            model_path: default_model_path(),
            store_path: default_store_path(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted literally and never re-scanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillpath.toml` in the current directory
/// 2. `~/.config/skillpath/config.toml`
///
/// Environment variable overrides: `GEMINI_API_KEY`, `SKILLPATH_GENERATION_URL`.
pub fn load_config() -> Result<SkillpathConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillpathConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skillpath.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SkillpathConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillpathConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut SkillpathConfig) {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            config.generation.api_key = Some(key);
        }
    }
    if let Ok(url) = std::env::var("SKILLPATH_GENERATION_URL") {
        if !url.is_empty() {
            config.generation.endpoint = url;
        }
    }

    config.generation.endpoint = resolve_env_vars(&config.generation.endpoint);
    config.generation.api_key = config
        .generation
        .api_key
        .as_deref()
        .map(resolve_env_vars)
        .filter(|k| !k.is_empty());
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillpath"))
}

/// Create the generation service described by `config`.
pub fn create_service(config: &GenerationConfig) -> Result<Arc<dyn GenerationService>> {
    let client = GeminiClient::new(Some(config.endpoint.clone()), config.timeout_secs)?
        .with_name(&config.service_name);
    Ok(Arc::new(client))
}

/// Build the submission pipeline: standard bank, load-once classifier, HTTP service.
pub fn create_pipeline(config: &SkillpathConfig) -> Result<SubmissionPipeline> {
    let service = create_service(&config.generation)?;
    let classifier = ClassifierAdapter::load(&config.model_path);
    tracing::debug!(state = %classifier.state(), "classifier ready");

    let roadmaps = RoadmapGenerator::new(service, config.generation.api_key.clone())
        .with_sampling(config.generation.max_output_tokens, config.generation.temperature)
        .with_timeout(std::time::Duration::from_secs(config.generation.timeout_secs));

    Ok(SubmissionPipeline::new(
        QuestionBank::standard(),
        Arc::new(classifier),
        roadmaps,
    ))
}
