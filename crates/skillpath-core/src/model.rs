//! Core data model types for skillpath.
//!
//! These are the records that flow through the pipeline: questions, the
//! per-question score records, feedback entries, classifier predictions and
//! the caller-supplied user identity.

use serde::{Deserialize, Serialize};

/// A single multiple-choice question with per-option point values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text shown to the user.
    #[serde(rename = "question")]
    pub text: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Points awarded for each option; same length as `options`.
    pub scores: Vec<i32>,
}

impl Question {
    pub fn new(text: &str, options: &[&str], scores: &[i32]) -> Self {
        Self {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            scores: scores.to_vec(),
        }
    }

    /// Index of the highest-scoring option. Ties go to the first occurrence.
    pub fn correct_index(&self) -> usize {
        let mut best = 0;
        for (i, &score) in self.scores.iter().enumerate() {
            if score > self.scores[best] {
                best = i;
            }
        }
        best
    }

    /// Highest point value any option awards.
    pub fn max_score(&self) -> i32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }
}

/// Score for one answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerQuestionRecord {
    /// The question text.
    pub question: String,
    /// Text of the option the user picked.
    pub selected: String,
    /// Points for that option.
    pub score: i32,
}

/// Output of the fallback scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Sum of all per-question scores.
    pub total_score: i32,
    /// One record per question, in bank order.
    pub per_question: Vec<PerQuestionRecord>,
}

/// Informational correctness feedback for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    pub question: String,
    pub chosen_index: usize,
    pub chosen_text: String,
    pub is_correct: bool,
    pub correct_index: usize,
    pub correct_text: String,
    pub score_for_choice: i32,
}

/// Label produced by the optional classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPrediction {
    /// Predicted class, or the stringified prediction row for tree models.
    pub label: String,
    /// Class probabilities or raw predictions, depending on the backend.
    #[serde(default)]
    pub raw: Vec<f64>,
}

/// Authenticated user, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: u64,
    pub name: String,
    pub email: String,
}
