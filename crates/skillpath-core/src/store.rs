//! Local JSON persistence for users, results and feedback.
//!
//! The whole store lives in one pretty-printed JSON file. It is loaded on
//! open and rewritten after every mutation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::Submission;
use crate::error::StoreError;
use crate::model::UserIdentity;
use crate::roadmap::Roadmap;

/// A persisted quiz result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: u64,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    /// The raw answer vector that was submitted.
    pub answers: Vec<i64>,
    pub score: i32,
    #[serde(default)]
    pub prediction: Option<String>,
    pub roadmap: Roadmap,
}

/// User feedback on a result (or on the service in general).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeedback {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub result_id: Option<u64>,
    /// 1 to 5.
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user's history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub user: UserIdentity,
    pub results: Vec<StoredResult>,
    pub feedbacks: Vec<StoredFeedback>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    users: Vec<UserIdentity>,
    #[serde(default)]
    results: Vec<StoredResult>,
    #[serde(default)]
    feedbacks: Vec<StoredFeedback>,
}

/// File-backed store for users, results and feedback.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    data: StoreData,
}

impl LocalStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read store from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse store JSON: {}", path.display()))?
        } else {
            StoreData::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data).context("failed to serialize store")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write store to {}", self.path.display()))?;
        Ok(())
    }

    /// Create a user. E-mail addresses are unique, compared case-insensitively.
    pub fn register(&mut self, name: &str, email: &str) -> Result<UserIdentity> {
        if self.find_user(email).is_some() {
            return Err(StoreError::EmailTaken(email.to_string()).into());
        }
        let user = UserIdentity {
            id: self.data.users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: name.to_string(),
            email: email.to_string(),
        };
        self.data.users.push(user.clone());
        self.save()?;
        Ok(user)
    }

    pub fn find_user(&self, email: &str) -> Option<UserIdentity> {
        self.data
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Look up a user by e-mail, failing with [`StoreError::UnknownUser`].
    pub fn require_user(&self, email: &str) -> Result<UserIdentity> {
        self.find_user(email)
            .ok_or_else(|| StoreError::UnknownUser(email.to_string()).into())
    }

    /// Persist a submission for `user`.
    pub fn save_result(
        &mut self,
        user: &UserIdentity,
        answers: &[i64],
        submission: &Submission,
    ) -> Result<StoredResult> {
        let result = StoredResult {
            id: self.data.results.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            user_id: user.id,
            created_at: Utc::now(),
            answers: answers.to_vec(),
            score: submission.total_score,
            prediction: submission.prediction.as_ref().map(|p| p.label.clone()),
            roadmap: submission.roadmap.clone(),
        };
        self.data.results.push(result.clone());
        self.save()?;
        Ok(result)
    }

    /// Record feedback. A referenced result must belong to `user`.
    pub fn save_feedback(
        &mut self,
        user: &UserIdentity,
        result_id: Option<u64>,
        rating: u8,
        comment: Option<String>,
    ) -> Result<StoredFeedback> {
        if !(1..=5).contains(&rating) {
            return Err(StoreError::InvalidRating(rating).into());
        }
        if let Some(id) = result_id {
            let owned = self
                .data
                .results
                .iter()
                .any(|r| r.id == id && r.user_id == user.id);
            if !owned {
                return Err(StoreError::UnknownResult(id).into());
            }
        }

        let feedback = StoredFeedback {
            id: self.data.feedbacks.iter().map(|f| f.id).max().unwrap_or(0) + 1,
            user_id: user.id,
            result_id,
            rating,
            comment,
            created_at: Utc::now(),
        };
        self.data.feedbacks.push(feedback.clone());
        self.save()?;
        Ok(feedback)
    }

    /// All results and feedback for `user`, newest first.
    pub fn dashboard(&self, user: &UserIdentity) -> Dashboard {
        let mut results: Vec<StoredResult> = self
            .data
            .results
            .iter()
            .filter(|r| r.user_id == user.id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let mut feedbacks: Vec<StoredFeedback> = self
            .data
            .feedbacks
            .iter()
            .filter(|f| f.user_id == user.id)
            .cloned()
            .collect();
        feedbacks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Dashboard {
            user: user.clone(),
            results,
            feedbacks,
        }
    }
}
