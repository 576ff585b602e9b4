//! Scoring resource client
//!
//! Single overall scores per user and report. These endpoints require a
//! logged-in client.

use crate::client::{HttpClient, MessageResponse};
use crate::error::{SdkResult, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::segment;

/// Client for per-user scoring operations
#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: Arc<HttpClient>,
}

impl ScoringClient {
    /// Create a new scoring client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Create or replace the current user's score for a report
    pub async fn submit(&self, submission: &ScoreSubmission) -> SdkResult<MessageResponse> {
        if self.client.config().validate_requests {
            submission.check(&self.client.config().score_range)?;
        }
        self.client.post("/api/scoring", submission).await
    }

    /// Get the current user's score for a report
    pub async fn get(&self, report_id: &str) -> SdkResult<ScoreRecord> {
        self.client
            .get(&format!("/api/scoring/{}", segment(report_id)))
            .await
    }

    /// List every score the current user has given
    pub async fn mine(&self) -> SdkResult<Vec<UserScore>> {
        self.client.get("/api/user_scores").await
    }
}

/// An overall score for one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub report_id: String,
    pub score: u32,
    pub comments: String,
}

impl ScoreSubmission {
    pub fn new(report_id: impl Into<String>, score: u32) -> Self {
        Self {
            report_id: report_id.into(),
            score,
            comments: String::new(),
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn check(
        &self,
        range: &report_scoring_core::settings::ScoreRange,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(err) = range.check("score", f64::from(self.score)) {
            errors.push(err);
        }
        errors.into_result()
    }
}

/// A stored score as returned for one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A stored score in the current user's listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScore {
    pub report_id: String,
    pub score: u32,
    #[serde(default)]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_scoring_core::settings::ScoreRange;

    #[test]
    fn test_submission_body_uses_backend_keys() {
        let body =
            serde_json::to_value(ScoreSubmission::new("case-1", 88).with_comments("clear")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"report_id": "case-1", "score": 88, "comments": "clear"})
        );
    }

    #[test]
    fn test_submission_check() {
        let range = ScoreRange::default();
        assert!(ScoreSubmission::new("case-1", 100).check(&range).is_ok());
        assert!(ScoreSubmission::new("case-1", 101).check(&range).is_err());
    }
}
