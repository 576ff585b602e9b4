//! Request payloads for the report endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationErrors;
use crate::settings::{ScoreRange, Settings};

/// Filter and pagination parameters for the report list.
///
/// Serialized as query parameters with camelCase keys; unset filters are
/// left out of the query string entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: u32,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page_size: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self::new(1, Settings::global().default_page_size)
    }
}

impl ReportQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search_query: None,
            time_range: None,
            report_type: None,
        }
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_time_range(mut self, range: impl Into<String>) -> Self {
        self.time_range = Some(range.into());
        self
    }

    pub fn with_report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    /// Check pagination bounds without touching the network.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate().map_err(ValidationErrors::from)
    }
}

/// An expert's rubric scores for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreData {
    pub report_id: String,
    pub completeness: f64,
    pub accuracy: f64,
    pub professionalism: f64,
    pub comment: String,
}

impl ScoreData {
    pub fn new(
        report_id: impl Into<String>,
        completeness: f64,
        accuracy: f64,
        professionalism: f64,
    ) -> Self {
        Self {
            report_id: report_id.into(),
            completeness,
            accuracy,
            professionalism,
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Check every rubric field against `range`. All out-of-range fields are
    /// reported, not just the first.
    pub fn check(&self, range: &ScoreRange) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = [
            ("completeness", self.completeness),
            ("accuracy", self.accuracy),
            ("professionalism", self.professionalism),
        ];
        for (name, value) in fields {
            if let Some(err) = range.check(name, value) {
                errors.push(err);
            }
        }
        errors.into_result()
    }

    /// Mean of the three rubric fields.
    pub fn average(&self) -> f64 {
        (self.completeness + self.accuracy + self.professionalism) / 3.0
    }
}
