//! Reports resource client
//!
//! This module provides methods for browsing reports, reading their
//! content and submitting rubric scores.

use crate::client::HttpClient;
use crate::error::SdkResult;
use report_scoring_core::domain::{ReportQuery, ScoreData};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::segment;

/// Client for report operations
#[derive(Debug, Clone)]
pub struct ReportsClient {
    client: Arc<HttpClient>,
}

impl ReportsClient {
    /// Create a new reports client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// List reports. Filters are sent as given; unset ones are omitted.
    pub async fn list(&self, query: &ReportQuery) -> SdkResult<Vec<ReportSummary>> {
        if self.client.config().validate_requests {
            query.check()?;
        }
        self.client.get_with_query("/api/reports", query).await
    }

    /// Get a report by ID
    pub async fn get(&self, id: &str) -> SdkResult<serde_json::Value> {
        self.client
            .get(&format!("/api/reports/{}", segment(id)))
            .await
    }

    /// Submit rubric scores for a report
    pub async fn submit_score(&self, score: &ScoreData) -> SdkResult<serde_json::Value> {
        if self.client.config().validate_requests {
            score.check(&self.client.config().score_range)?;
        }
        self.client.post("/api/reports/score", score).await
    }

    /// Download a report as raw bytes
    pub async fn download(&self, id: &str) -> SdkResult<Vec<u8>> {
        self.client
            .get_bytes(&format!("/api/reports/{}/download", segment(id)))
            .await
    }

    /// Download a report and write it to `dest`, returning the byte count
    pub async fn download_to(&self, id: &str, dest: impl AsRef<Path>) -> SdkResult<u64> {
        let bytes = self.download(id).await?;
        tokio::fs::write(dest.as_ref(), &bytes).await?;
        info!(report = %id, path = %dest.as_ref().display(), size = bytes.len(), "Saved report");
        Ok(bytes.len() as u64)
    }

    /// List the evidence files attached to a report
    pub async fn files(&self, id: &str) -> SdkResult<CaseFiles> {
        self.client
            .get(&format!("/api/reports/{}/files", segment(id)))
            .await
    }

    /// Get the generated report document
    pub async fn document(&self, id: &str) -> SdkResult<serde_json::Value> {
        self.client
            .get(&format!("/api/reports/{}/report", segment(id)))
            .await
    }

    /// Fetch one evidence file listed by [`files`](Self::files).
    ///
    /// `folder` is `pics` or `records`. Names ending in `.json` are parsed as
    /// records; anything else is returned as raw bytes.
    pub async fn file(&self, id: &str, folder: &str, filename: &str) -> SdkResult<CaseFile> {
        let path = format!(
            "/api/reports/{}/file/{}/{}",
            segment(id),
            segment(folder),
            segment(filename)
        );
        if filename.ends_with(".json") {
            Ok(CaseFile::Record(self.client.get(&path).await?))
        } else {
            Ok(CaseFile::Binary(self.client.get_bytes(&path).await?))
        }
    }

    /// Get the knowledge graph of a report, an HTML document
    pub async fn graph(&self, id: &str) -> SdkResult<Vec<u8>> {
        self.client
            .get_bytes(&format!("/api/reports/{}/graph", segment(id)))
            .await
    }
}

/// Report list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    pub name: String,
}

/// Evidence attached to a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseFiles {
    /// Image file names
    #[serde(default)]
    pub pics: Vec<String>,
    /// JSON record file names
    #[serde(default)]
    pub records: Vec<String>,
}

/// Content of a single evidence file
#[derive(Debug, Clone, PartialEq)]
pub enum CaseFile {
    /// Parsed JSON record
    Record(serde_json::Value),
    /// Image or other binary content
    Binary(Vec<u8>),
}

impl CaseFile {
    /// Raw bytes to write to disk. Records are pretty-printed.
    pub fn into_bytes(self) -> SdkResult<Vec<u8>> {
        match self {
            Self::Record(value) => Ok(serde_json::to_vec_pretty(&value)?),
            Self::Binary(bytes) => Ok(bytes),
        }
    }
}
