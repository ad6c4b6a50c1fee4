//! Study roadmap types and generation.
//!
//! A roadmap is produced once per submission. When a generation-service
//! credential is available the service is asked for a JSON roadmap; otherwise
//! a fixed heuristic plan is returned without touching the network. Service
//! failures never propagate: they become a summary-only [`Roadmap::Failed`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{ClassifierPrediction, PerQuestionRecord};
use crate::scoring::partition;
use crate::traits::{GenerationRequest, GenerationService, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};

/// Upper bound on a single generation call.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(20);

/// One week of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapWeek {
    pub week: u32,
    pub goal: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recommended learning resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapResource {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub why: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete, structured plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPlan {
    pub summary: String,
    #[serde(default)]
    pub weeks: Vec<RoadmapWeek>,
    #[serde(default)]
    pub resources: Vec<RoadmapResource>,
    /// Keys the service sent beyond the known ones, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A roadmap together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Roadmap {
    /// Parsed from the generation service's output.
    Generated(RoadmapPlan),
    /// The fixed plan used when no credential is configured.
    Heuristic(RoadmapPlan),
    /// The service answered, but not with a roadmap; holds the raw text.
    Unstructured { summary: String },
    /// The service call failed; holds a failure notice only.
    Failed { summary: String },
}

impl Roadmap {
    pub fn summary(&self) -> &str {
        match self {
            Roadmap::Generated(plan) | Roadmap::Heuristic(plan) => &plan.summary,
            Roadmap::Unstructured { summary } | Roadmap::Failed { summary } => summary,
        }
    }

    pub fn weeks(&self) -> &[RoadmapWeek] {
        match self {
            Roadmap::Generated(plan) | Roadmap::Heuristic(plan) => &plan.weeks,
            _ => &[],
        }
    }

    pub fn resources(&self) -> &[RoadmapResource] {
        match self {
            Roadmap::Generated(plan) | Roadmap::Heuristic(plan) => &plan.resources,
            _ => &[],
        }
    }

    /// Short name of the variant, for logs and tables.
    pub fn source(&self) -> &'static str {
        match self {
            Roadmap::Generated(_) => "generated",
            Roadmap::Heuristic(_) => "heuristic",
            Roadmap::Unstructured { .. } => "unstructured",
            Roadmap::Failed { .. } => "failed",
        }
    }
}

/// The fixed six-week plan returned when no credential is available.
pub fn heuristic_roadmap(service_name: &str) -> Roadmap {
    let week = |week: u32, goal: &str, activities: &[&str]| RoadmapWeek {
        week,
        goal: goal.to_string(),
        activities: activities.iter().map(|a| a.to_string()).collect(),
        extra: Map::new(),
    };
    let resource = |title: &str, url: &str, why: &str| RoadmapResource {
        title: title.to_string(),
        url: url.to_string(),
        why: why.to_string(),
        extra: Map::new(),
    };

    Roadmap::Heuristic(RoadmapPlan {
        summary: format!("No {service_name} key — heuristic plan provided."),
        weeks: vec![
            week(1, "Basics refresh", &["Revise loops & functions", "Small coding tasks"]),
            week(2, "Data structures", &["Practice lists, dicts, comprehensions"]),
            week(3, "Probability & statistics basics", &["Mean, probability tasks"]),
            week(4, "APIs & Systems", &["Build a small API endpoint"]),
            week(5, "Design & UX", &["Design a poster, apply visual hierarchy"]),
            week(6, "Collaboration & presentation", &["Use Git, prepare a presentation"]),
        ],
        resources: vec![
            resource("LeetCode", "https://leetcode.com", "Short focused problems"),
            resource(
                "MDN Web Docs",
                "https://developer.mozilla.org",
                "Web fundamentals",
            ),
        ],
        extra: Map::new(),
    })
}

/// Build the natural-language prompt sent to the generation service.
pub fn build_prompt(
    user_name: &str,
    total_score: i32,
    per_question: &[PerQuestionRecord],
    prediction: Option<&ClassifierPrediction>,
) -> String {
    let (strengths, weaknesses) = partition(per_question);

    let mut prompt = format!(
        "Create a personalized 6-week learning roadmap for {user_name} in JSON.\n\
         Total score: {total_score}\n\
         Strengths: {strengths:?}\n\
         Weaknesses: {weaknesses:?}\n"
    );
    if let Some(prediction) = prediction {
        prompt.push_str(&format!("Model assessment: {}\n", prediction.label));
    }
    prompt.push_str(
        "\nOutput a JSON object with keys: summary (string), weeks (array of {week, goal, activities}), resources (array of {title, url, why}).",
    );
    prompt
}

/// Interpret the service's text as a roadmap, or keep it as a bare summary.
///
/// Only a reply that is itself a JSON plan counts; prose around a fenced
/// block is kept as-is.
pub fn parse_roadmap(text: &str) -> Roadmap {
    match serde_json::from_str::<RoadmapPlan>(text) {
        Ok(plan) => Roadmap::Generated(plan),
        Err(e) => {
            tracing::debug!("generation output is not a roadmap: {e}");
            Roadmap::Unstructured {
                summary: text.to_string(),
            }
        }
    }
}

/// Produces roadmaps, calling the generation service when a key is available.
pub struct RoadmapGenerator {
    service: Arc<dyn GenerationService>,
    default_api_key: Option<String>,
    max_output_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl RoadmapGenerator {
    pub fn new(service: Arc<dyn GenerationService>, default_api_key: Option<String>) -> Self {
        Self {
            service,
            default_api_key: default_api_key.filter(|k| !k.is_empty()),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: GENERATION_TIMEOUT,
        }
    }

    /// Override the sampling parameters sent with each request.
    pub fn with_sampling(mut self, max_output_tokens: u32, temperature: f64) -> Self {
        self.max_output_tokens = max_output_tokens;
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Build a roadmap. Never fails; degraded paths are encoded in the variant.
    pub async fn build_roadmap(
        &self,
        user_name: &str,
        total_score: i32,
        per_question: &[PerQuestionRecord],
        prediction: Option<&ClassifierPrediction>,
        api_key: Option<&str>,
    ) -> Roadmap {
        let key = api_key
            .filter(|k| !k.is_empty())
            .or(self.default_api_key.as_deref());
        let Some(key) = key else {
            tracing::info!("no generation key, using heuristic roadmap");
            return heuristic_roadmap(self.service.name());
        };

        let request = GenerationRequest {
            prompt: build_prompt(user_name, total_score, per_question, prediction),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };

        let outcome = tokio::time::timeout(self.timeout, self.service.generate(key, &request)).await;
        let reason = match outcome {
            Ok(Ok(text)) => {
                let roadmap = parse_roadmap(&text);
                tracing::info!("roadmap source: {}", roadmap.source());
                return roadmap;
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("request timed out after {}s", self.timeout.as_secs()),
        };

        tracing::warn!("{} call failed: {reason}", self.service.name());
        Roadmap::Failed {
            summary: format!(
                "{} call failed: {reason}. Returning heuristic roadmap.",
                self.service.name()
            ),
        }
    }
}
