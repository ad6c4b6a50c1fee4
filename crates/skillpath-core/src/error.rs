//! Error types for the scoring pipeline and its collaborators.
//!
//! Only [`PipelineError`] ever aborts a submission. Classifier and generation
//! errors are defined here so the adapters can classify failures without
//! string matching, but they are always recovered before leaving the core.

use thiserror::Error;

/// Input validation failures. These are the only errors a submission surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The answer vector does not have one entry per question.
    #[error("expected {expected} answers, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },

    /// An answer index falls outside its question's option range.
    #[error("answer {index} for question {question} is out of range (question has {options} options)")]
    IndexOutOfRange {
        question: usize,
        index: i64,
        options: usize,
    },
}

/// Errors raised while loading or running the classifier backend.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No model is loaded.
    #[error("classifier unavailable")]
    Unavailable,

    /// The feature row does not match the width the model was trained on.
    #[error("feature width mismatch: model expects {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The model artifact could not be read or parsed.
    #[error("failed to load model: {0}")]
    Load(String),

    /// The backend failed while producing a prediction.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors that can occur when calling the external generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service answered 2xx with a body that is not JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised by the local result store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("user not found: {0}")]
    UnknownUser(String),

    #[error("result {0} not found for this user")]
    UnknownResult(u64),

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}
