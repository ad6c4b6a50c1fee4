//! Submission pipeline orchestrator.
//!
//! Wires the question bank, fallback scorer, classifier adapter and roadmap
//! generator into a single pass per submission. Only input validation can
//! fail a submission; model and generation problems degrade the output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::classifier::ClassifierAdapter;
use crate::error::PipelineError;
use crate::features::encode;
use crate::model::{ClassifierPrediction, QuestionFeedback, ScoreResult, UserIdentity};
use crate::roadmap::{Roadmap, RoadmapGenerator};
use crate::scoring;

/// Everything a submission returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub total_score: i32,
    pub per_question: Vec<QuestionFeedback>,
    #[serde(default)]
    pub prediction: Option<ClassifierPrediction>,
    pub roadmap: Roadmap,
}

/// The scoring-and-roadmap pipeline. Shared read-only across submissions.
pub struct SubmissionPipeline {
    bank: Arc<QuestionBank>,
    classifier: Arc<ClassifierAdapter>,
    roadmaps: RoadmapGenerator,
}

impl SubmissionPipeline {
    pub fn new(
        bank: Arc<QuestionBank>,
        classifier: Arc<ClassifierAdapter>,
        roadmaps: RoadmapGenerator,
    ) -> Self {
        Self {
            bank,
            classifier,
            roadmaps,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn classifier(&self) -> &ClassifierAdapter {
        &self.classifier
    }

    /// Rubric score for an answer vector.
    pub fn score(&self, answers: &[i64]) -> Result<ScoreResult, PipelineError> {
        scoring::score(&self.bank, answers)
    }

    /// Optional model label for an answer vector. Length errors yield `None`.
    pub fn classify(&self, answers: &[i64]) -> Option<ClassifierPrediction> {
        let features = encode(&self.bank, answers).ok()?;
        self.classifier.classify(&features)
    }

    /// Score, classify and plan for one user.
    pub async fn submit(
        &self,
        user: &UserIdentity,
        answers: &[i64],
        api_key: Option<&str>,
    ) -> Result<Submission, PipelineError> {
        let features = encode(&self.bank, answers)?;
        let scored = scoring::score(&self.bank, answers)?;
        let per_question = scoring::feedback(&self.bank, answers)?;

        let prediction = self.classifier.classify(&features);

        let roadmap = self
            .roadmaps
            .build_roadmap(
                &user.name,
                scored.total_score,
                &scored.per_question,
                prediction.as_ref(),
                api_key,
            )
            .await;

        tracing::debug!(
            user = user.id,
            total = scored.total_score,
            roadmap = roadmap.source(),
            "submission processed"
        );

        Ok(Submission {
            total_score: scored.total_score,
            per_question,
            prediction,
            roadmap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierBackend, LinearEstimator};
    use crate::traits::{GenerationRequest, GenerationService};
    use async_trait::async_trait;

    struct DownService;

    #[async_trait]
    impl GenerationService for DownService {
        fn name(&self) -> &str {
            "Gemini"
        }

        async fn generate(&self, _: &str, _: &GenerationRequest) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    fn user() -> UserIdentity {
        UserIdentity {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    fn pipeline(classifier: ClassifierAdapter) -> SubmissionPipeline {
        SubmissionPipeline::new(
            QuestionBank::standard(),
            Arc::new(classifier),
            RoadmapGenerator::new(Arc::new(DownService), None),
        )
    }

    #[tokio::test]
    async fn best_answers_end_to_end() {
        let answers = [2, 1, 2, 2, 2, 1, 1, 1, 1, 1, 1, 2, 2, 1, 2];
        let submission = pipeline(ClassifierAdapter::unloaded())
            .submit(&user(), &answers, None)
            .await
            .unwrap();

        assert_eq!(submission.total_score, 150);
        assert_eq!(submission.per_question.len(), 15);
        assert!(submission
            .per_question
            .iter()
            .all(|f| f.correct_index == f.chosen_index && f.is_correct));
        assert!(submission.prediction.is_none());
        assert_eq!(submission.roadmap.source(), "heuristic");
    }

    #[tokio::test]
    async fn first_options_end_to_end() {
        let submission = pipeline(ClassifierAdapter::unloaded())
            .submit(&user(), &[0; 15], None)
            .await
            .unwrap();
        assert_eq!(submission.total_score, 32);
    }

    #[tokio::test]
    async fn invalid_input_fails_the_submission() {
        let p = pipeline(ClassifierAdapter::unloaded());
        assert!(matches!(
            p.submit(&user(), &[0; 3], None).await,
            Err(PipelineError::InputLengthMismatch { .. })
        ));

        let mut answers = [0i64; 15];
        answers[14] = 9;
        assert!(matches!(
            p.submit(&user(), &answers, None).await,
            Err(PipelineError::IndexOutOfRange { question: 14, .. })
        ));
    }

    #[tokio::test]
    async fn dependency_failures_do_not_fail_the_submission() {
        // Model trained on a different width, and a generation service that is down.
        let estimator = LinearEstimator::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0; 4], vec![0.0; 4]],
            vec![0.0, 0.0],
        )
        .unwrap();
        let p = pipeline(ClassifierAdapter::from_backend(ClassifierBackend::Estimator(estimator)));

        let submission = p.submit(&user(), &[0; 15], Some("key")).await.unwrap();
        assert_eq!(submission.total_score, 32);
        assert!(submission.prediction.is_none());
        assert!(matches!(submission.roadmap, Roadmap::Failed { .. }));
        assert!(submission.roadmap.summary().contains("connection refused"));
    }

    #[tokio::test]
    async fn prediction_is_attached_when_model_works() {
        let estimator = LinearEstimator::new(
            vec!["novice".into(), "ready".into()],
            vec![vec![-0.1; 15], vec![0.1; 15]],
            vec![0.0, 0.0],
        )
        .unwrap();
        let p = pipeline(ClassifierAdapter::from_backend(ClassifierBackend::Estimator(estimator)));

        let submission = p
            .submit(&user(), &[2, 1, 2, 2, 2, 1, 1, 1, 1, 1, 1, 2, 2, 1, 2], None)
            .await
            .unwrap();
        assert_eq!(submission.prediction.unwrap().label, "ready");
        assert_eq!(p.classify(&[0; 3]), None);
    }
}
