//! Feature encoding for classifier input.

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::error::PipelineError;

/// A single feature row: one `f32` column per question, in bank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Encode raw answer indices as a feature row.
///
/// The answer count must equal the bank size exactly; nothing is truncated
/// or padded. Indices are not range-checked here, the scorer does that.
pub fn encode(bank: &QuestionBank, answers: &[i64]) -> Result<FeatureVector, PipelineError> {
    if answers.len() != bank.len() {
        return Err(PipelineError::InputLengthMismatch {
            expected: bank.len(),
            actual: answers.len(),
        });
    }
    Ok(FeatureVector {
        values: answers.iter().map(|&a| a as f32).collect(),
    })
}
