//! Rubric-based fallback scoring.
//!
//! The score is always computed from the question bank's point values,
//! whether or not a classifier is loaded.

use crate::bank::QuestionBank;
use crate::error::PipelineError;
use crate::model::{PerQuestionRecord, QuestionFeedback, ScoreResult};

/// Points at or above this count as a strength.
pub const STRENGTH_THRESHOLD: i32 = 8;
/// Points at or below this count as a weakness.
pub const WEAKNESS_THRESHOLD: i32 = 3;

/// Validate the answer vector against the bank and return the option indices.
pub fn validate_answers(bank: &QuestionBank, answers: &[i64]) -> Result<Vec<usize>, PipelineError> {
    if answers.len() != bank.len() {
        return Err(PipelineError::InputLengthMismatch {
            expected: bank.len(),
            actual: answers.len(),
        });
    }

    bank.iter()
        .zip(answers)
        .enumerate()
        .map(|(i, (question, &answer))| {
            usize::try_from(answer)
                .ok()
                .filter(|&idx| idx < question.options.len() && idx < question.scores.len())
                .ok_or(PipelineError::IndexOutOfRange {
                    question: i,
                    index: answer,
                    options: question.options.len(),
                })
        })
        .collect()
}

/// Score an answer vector.
pub fn score(bank: &QuestionBank, answers: &[i64]) -> Result<ScoreResult, PipelineError> {
    let indices = validate_answers(bank, answers)?;

    let per_question: Vec<PerQuestionRecord> = bank
        .iter()
        .zip(&indices)
        .map(|(question, &idx)| PerQuestionRecord {
            question: question.text.clone(),
            selected: question.options[idx].clone(),
            score: question.scores[idx],
        })
        .collect();
    let total_score = per_question.iter().map(|r| r.score).sum();

    Ok(ScoreResult {
        total_score,
        per_question,
    })
}

/// Per-question correctness feedback. Does not affect the score.
pub fn feedback(bank: &QuestionBank, answers: &[i64]) -> Result<Vec<QuestionFeedback>, PipelineError> {
    let indices = validate_answers(bank, answers)?;

    Ok(bank
        .iter()
        .zip(indices)
        .map(|(question, chosen)| {
            let correct = question.correct_index();
            QuestionFeedback {
                question: question.text.clone(),
                chosen_index: chosen,
                chosen_text: question.options[chosen].clone(),
                is_correct: chosen == correct,
                correct_index: correct,
                correct_text: question.options.get(correct).cloned().unwrap_or_default(),
                score_for_choice: question.scores[chosen],
            }
        })
        .collect())
}

/// Split per-question records into strengths and weaknesses (question texts).
pub fn partition(per_question: &[PerQuestionRecord]) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for record in per_question {
        if record.score >= STRENGTH_THRESHOLD {
            strengths.push(record.question.clone());
        } else if record.score <= WEAKNESS_THRESHOLD {
            weaknesses.push(record.question.clone());
        }
    }
    (strengths, weaknesses)
}
