//! Optional model-based classification.
//!
//! A model artifact is probed once at startup. Two formats are understood,
//! tried in order:
//!
//! 1. a linear estimator (`classes`, `coef`, `intercept`) with
//!    `predict` / `predict_proba`;
//! 2. a boosted-tree dump (`trees`, `base_score`, `objective`) that
//!    predicts over a dense feature matrix.
//!
//! If neither loads, the adapter stays [`ClassifierState::Unloaded`] for the
//! lifetime of the process. Prediction failures are logged and reported as
//! "no prediction"; they never reach the caller as errors.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ClassifierError;
use crate::features::FeatureVector;
use crate::model::ClassifierPrediction;

/// Environment variable consulted when the configured model path is missing.
pub const MODEL_PATH_ENV: &str = "XGB_MODEL_PATH";

/// Which backend the adapter settled on at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    Unloaded,
    Estimator,
    Booster,
}

impl fmt::Display for ClassifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierState::Unloaded => write!(f, "unloaded"),
            ClassifierState::Estimator => write!(f, "estimator"),
            ClassifierState::Booster => write!(f, "booster"),
        }
    }
}

// ---------------------------------------------------------------------------
// Linear estimator backend
// ---------------------------------------------------------------------------

/// Multinomial linear classifier: one weight row and intercept per class.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearEstimator {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearEstimator {
    pub fn new(classes: Vec<String>, coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self, ClassifierError> {
        let estimator = Self {
            classes,
            coef,
            intercept,
        };
        estimator.check()?;
        Ok(estimator)
    }

    fn check(&self) -> Result<(), ClassifierError> {
        if self.classes.is_empty() {
            return Err(ClassifierError::Load("estimator has no classes".into()));
        }
        if self.coef.len() != self.classes.len() || self.intercept.len() != self.classes.len() {
            return Err(ClassifierError::Load(format!(
                "estimator has {} classes, {} coefficient rows and {} intercepts",
                self.classes.len(),
                self.coef.len(),
                self.intercept.len()
            )));
        }
        let width = self.coef[0].len();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err(ClassifierError::Load("ragged coefficient matrix".into()));
        }
        Ok(())
    }

    /// Number of features the estimator was trained on.
    pub fn width(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    /// Class probabilities for one feature row (softmax over class scores).
    pub fn predict_proba(&self, row: &[f32]) -> Result<Vec<f64>, ClassifierError> {
        if row.len() != self.width() {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.width(),
                actual: row.len(),
            });
        }

        let logits: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| {
                weights
                    .iter()
                    .zip(row)
                    .map(|(w, &x)| w * f64::from(x))
                    .sum::<f64>()
                    + bias
            })
            .collect();

        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(ClassifierError::Backend("non-finite class scores".into()));
        }
        Ok(exps.into_iter().map(|e| e / total).collect())
    }

    /// Most probable class label.
    pub fn predict(&self, row: &[f32]) -> Result<String, ClassifierError> {
        let proba = self.predict_proba(row)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best].clone())
    }
}

// ---------------------------------------------------------------------------
// Boosted-tree backend
// ---------------------------------------------------------------------------

/// Learning objective recorded in a tree dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Objective {
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
    #[default]
    #[serde(rename = "reg:squarederror")]
    SquaredError,
}

/// One node of a regression tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        #[serde(default)]
        missing: Option<usize>,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    fn leaf_value(&self, row: &[f32]) -> Result<f64, ClassifierError> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=self.nodes.len() {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| ClassifierError::Backend(format!("dangling node reference {idx}")))?;
            match node {
                TreeNode::Leaf { leaf } => return Ok(*leaf),
                TreeNode::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let value = row.get(*feature).ok_or_else(|| ClassifierError::ShapeMismatch {
                        expected: feature.saturating_add(1),
                        actual: row.len(),
                    })?;
                    idx = if value.is_nan() {
                        missing.unwrap_or(*yes)
                    } else if value < threshold {
                        *yes
                    } else {
                        *no
                    };
                }
            }
        }
        Err(ClassifierError::Backend("tree traversal did not terminate".into()))
    }
}

/// Dense row-major feature matrix handed to the tree backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl DenseMatrix {
    pub fn from_features(features: &FeatureVector) -> Self {
        Self {
            rows: 1,
            cols: features.width(),
            data: features.values().to_vec(),
        }
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        self.data.get(start..start + self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Additive ensemble of regression trees.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeEnsemble {
    #[serde(default = "default_base_score")]
    base_score: f64,
    #[serde(default)]
    objective: Objective,
    #[serde(default)]
    num_features: Option<usize>,
    trees: Vec<Tree>,
}

fn default_base_score() -> f64 {
    0.5
}

impl TreeEnsemble {
    pub fn new(base_score: f64, objective: Objective, num_features: Option<usize>, trees: Vec<Tree>) -> Self {
        Self {
            base_score,
            objective,
            num_features,
            trees,
        }
    }

    /// One prediction per matrix row.
    pub fn predict(&self, matrix: &DenseMatrix) -> Result<Vec<f64>, ClassifierError> {
        if let Some(expected) = self.num_features {
            if matrix.cols != expected {
                return Err(ClassifierError::ShapeMismatch {
                    expected,
                    actual: matrix.cols,
                });
            }
        }

        (0..matrix.rows())
            .map(|r| {
                let row = matrix
                    .row(r)
                    .ok_or_else(|| ClassifierError::Backend(format!("missing row {r}")))?;
                let mut margin = match self.objective {
                    Objective::BinaryLogistic => logit(self.base_score),
                    Objective::SquaredError => self.base_score,
                };
                for tree in &self.trees {
                    margin += tree.leaf_value(row)?;
                }
                let value = match self.objective {
                    Objective::BinaryLogistic => sigmoid(margin),
                    Objective::SquaredError => margin,
                };
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ClassifierError::Backend("non-finite prediction".into()))
                }
            })
            .collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// The backend chosen at load time.
#[derive(Debug, Clone)]
pub enum ClassifierBackend {
    Estimator(LinearEstimator),
    Booster(TreeEnsemble),
}

/// Load-once, read-only wrapper around an optional classifier backend.
#[derive(Debug, Clone, Default)]
pub struct ClassifierAdapter {
    backend: Option<ClassifierBackend>,
}

impl ClassifierAdapter {
    /// An adapter with no model; every prediction is absent.
    pub fn unloaded() -> Self {
        Self { backend: None }
    }

    pub fn from_backend(backend: ClassifierBackend) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Probe the artifact at `path` (or at `$XGB_MODEL_PATH` if `path` is missing).
    pub fn load(path: &Path) -> Self {
        let env_path = std::env::var_os(MODEL_PATH_ENV).map(PathBuf::from);
        let Some(resolved) = resolve_model_path(path, env_path.as_deref()) else {
            tracing::info!("no model artifact at {}, classifier disabled", path.display());
            return Self::unloaded();
        };

        match probe(&resolved) {
            Ok(backend) => {
                let adapter = Self::from_backend(backend);
                tracing::info!(
                    "loaded {} classifier from {}",
                    adapter.state(),
                    resolved.display()
                );
                adapter
            }
            Err(e) => {
                tracing::warn!("classifier disabled: {e}");
                Self::unloaded()
            }
        }
    }

    pub fn state(&self) -> ClassifierState {
        match &self.backend {
            None => ClassifierState::Unloaded,
            Some(ClassifierBackend::Estimator(_)) => ClassifierState::Estimator,
            Some(ClassifierBackend::Booster(_)) => ClassifierState::Booster,
        }
    }

    /// Predict a label, or `None` if the model is absent or fails.
    pub fn classify(&self, features: &FeatureVector) -> Option<ClassifierPrediction> {
        match self.try_classify(features) {
            Ok(prediction) => Some(prediction),
            Err(ClassifierError::Unavailable) => None,
            Err(e) => {
                tracing::warn!("model error, continuing without prediction: {e}");
                None
            }
        }
    }

    fn try_classify(&self, features: &FeatureVector) -> Result<ClassifierPrediction, ClassifierError> {
        match &self.backend {
            None => Err(ClassifierError::Unavailable),
            Some(ClassifierBackend::Estimator(estimator)) => {
                let label = estimator.predict(features.values())?;
                let raw = estimator.predict_proba(features.values())?;
                Ok(ClassifierPrediction { label, raw })
            }
            Some(ClassifierBackend::Booster(ensemble)) => {
                let matrix = DenseMatrix::from_features(features);
                let preds = ensemble.predict(&matrix)?;
                Ok(ClassifierPrediction {
                    label: format!("{preds:?}"),
                    raw: preds,
                })
            }
        }
    }
}

fn resolve_model_path(configured: &Path, env_path: Option<&Path>) -> Option<PathBuf> {
    if configured.exists() {
        return Some(configured.to_path_buf());
    }
    env_path.filter(|p| p.exists()).map(Path::to_path_buf)
}

fn probe(path: &Path) -> Result<ClassifierBackend, ClassifierError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ClassifierError::Load(format!("{}: {e}", path.display())))?;

    let estimator_err = match serde_json::from_str::<LinearEstimator>(&content) {
        Ok(estimator) => match estimator.check() {
            Ok(()) => return Ok(ClassifierBackend::Estimator(estimator)),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    match serde_json::from_str::<TreeEnsemble>(&content) {
        Ok(ensemble) => Ok(ClassifierBackend::Booster(ensemble)),
        Err(booster_err) => Err(ClassifierError::Load(format!(
            "{} is neither an estimator ({estimator_err}) nor a tree dump ({booster_err})",
            path.display()
        ))),
    }
}
