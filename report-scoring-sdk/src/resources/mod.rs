//! SDK resource modules
//!
//! This module contains resource-specific clients for interacting with
//! different API endpoints.

pub mod auth;
pub mod files;
pub mod reports;
pub mod scoring;

pub use auth::AuthClient;
pub use files::FilesClient;
pub use reports::ReportsClient;
pub use scoring::ScoringClient;

/// Percent-encode one path segment.
///
/// Everything outside the RFC 3986 unreserved set is escaped, including
/// `!'()*`. The server decodes these back to the same name.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
