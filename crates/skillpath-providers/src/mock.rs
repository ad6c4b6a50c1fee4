//! Mock generation service for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skillpath_core::traits::{GenerationRequest, GenerationService};

use crate::error::GenerationError;

/// A mock generation service for exercising the pipeline without network calls.
pub struct MockGenerationService {
    /// Text returned on success.
    response: String,
    /// If set, every call fails with an API error carrying this status.
    fail_with_status: Option<u16>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received, with the key it carried.
    last_request: Mutex<Option<(String, GenerationRequest)>>,
}

impl MockGenerationService {
    /// Create a mock that always returns the same text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_with_status: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock whose every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            response: String::new(),
            fail_with_status: Some(status),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this service.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last key and request sent to this service.
    pub fn last_request(&self) -> Option<(String, GenerationRequest)> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some((api_key.to_string(), request.clone()));

        if let Some(status) = self.fail_with_status {
            return Err(GenerationError::ApiError {
                status,
                message: "mock failure".into(),
            }
            .into());
        }
        Ok(self.response.clone())
    }
}
