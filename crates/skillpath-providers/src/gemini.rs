//! HTTP generation-service client.
//!
//! Posts `{prompt, max_output_tokens, temperature}` with a bearer token and
//! reads the generated text from `output_text` or `result`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use skillpath_core::traits::{GenerationRequest, GenerationService};

use crate::error::GenerationError;

pub const DEFAULT_ENDPOINT: &str = "https://api.generativeai.example/v1/generate";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_SERVICE_NAME: &str = "Gemini";

/// Client for a Gemini-style text-generation endpoint.
pub struct GeminiClient {
    name: String,
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(endpoint: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout_secs,
            client,
        })
    }

    /// Override the name used in failure summaries.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pick the generated text out of a response body.
///
/// `output_text` wins, then `result`; empty or null fields are skipped. If
/// neither is usable the whole body is returned re-serialized.
fn extract_text(body: &serde_json::Value) -> String {
    for field in ["output_text", "result"] {
        match body.get(field) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => {}
            Some(other) => return other.to_string(),
        }
    }
    body.to_string()
}

#[async_trait]
impl GenerationService for GeminiClient {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, api_key, request), fields(endpoint = %self.endpoint))]
    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    GenerationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(self.timeout_secs)
            } else {
                GenerationError::MalformedResponse(e.to_string())
            }
        })?;

        Ok(extract_text(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "Create a roadmap".into(),
            max_output_tokens: 800,
            temperature: 0.2,
        }
    }

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(Some(format!("{}/v1/generate", server.uri())), 20).unwrap()
    }

    #[tokio::test]
    async fn successful_generation_reads_output_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_json(serde_json::json!({
                "prompt": "Create a roadmap",
                "max_output_tokens": 800,
                "temperature": 0.2
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"output_text": "{\"summary\": \"ok\"}"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).generate("test-key", &request()).await.unwrap();
        assert_eq!(text, "{\"summary\": \"ok\"}");
    }

    #[tokio::test]
    async fn falls_back_to_result_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"output_text": "", "result": "plain text"})),
            )
            .mount(&server)
            .await;

        let text = client(&server).generate("k", &request()).await.unwrap();
        assert_eq!(text, "plain text");
    }

    #[tokio::test]
    async fn unknown_shape_returns_whole_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let text = client(&server).generate("k", &request()).await.unwrap();
        assert_eq!(text, r#"{"candidates":[]}"#);
    }

    #[tokio::test]
    async fn error_status_is_an_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).generate("k", &request()).await.unwrap_err();
        match err.downcast_ref::<GenerationError>() {
            Some(GenerationError::ApiError { status, message }) => {
                assert_eq!(*status, 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).generate("k", &request()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"output_text": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(Some(server.uri()), 1).unwrap();
        let err = client.generate("k", &request()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::Timeout(1))
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let client = GeminiClient::new(Some("http://127.0.0.1:9/v1/generate".into()), 5).unwrap();
        let err = client.generate("k", &request()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::NetworkError(_))
        ));
    }

    #[test]
    fn extract_text_rules() {
        assert_eq!(
            extract_text(&serde_json::json!({"output_text": "a", "result": "b"})),
            "a"
        );
        assert_eq!(
            extract_text(&serde_json::json!({"output_text": null, "result": "b"})),
            "b"
        );
        assert_eq!(
            extract_text(&serde_json::json!({"result": {"summary": "x"}})),
            r#"{"summary":"x"}"#
        );
    }

    #[test]
    fn default_name_and_override() {
        let client = GeminiClient::new(None, 20).unwrap();
        assert_eq!(client.name(), "Gemini");
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(client.with_name("Vertex").name(), "Vertex");
    }
}
