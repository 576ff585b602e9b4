//! Report Scoring SDK
//!
//! This crate provides a Rust client for the report scoring backend. It
//! offers typed clients for file uploads, report browsing and scoring, and
//! account login.
//!
//! # Features
//!
//! - **One shared transport**: every resource client talks to the same origin
//!   through one [`HttpClient`]
//! - **Interceptors**: request and response hooks run on every call
//! - **Session tokens**: a login stores the token and later calls carry it
//! - **Optional local validation**: pagination and score bounds are checked
//!   before sending when enabled
//! - **Typed errors**: backend messages, network failures and timeouts are
//!   distinct [`SdkError`] variants
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use report_scoring_sdk::{ReportQuery, ReportScoringClient, SdkConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReportScoringClient::new(SdkConfig::new("http://localhost:5000"))?;
//!
//!     let query = ReportQuery::new(1, 5).with_report_type("final");
//!     for report in client.reports().list(&query).await? {
//!         println!("{} {}", report.id, report.name);
//!     }
//!
//!     let uploaded = client.files().upload("scene.png").await?;
//!     println!("Preview: {}", client.files().preview_url(&uploaded.filename));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use report_scoring_sdk::{ReportScoringClient, SdkError};
//!
//! async fn show(client: &ReportScoringClient, id: &str) {
//!     match client.reports().get(id).await {
//!         Ok(report) => println!("{report:#}"),
//!         Err(SdkError::Api { status: 404, .. }) => eprintln!("No report {id}"),
//!         Err(e) if e.is_network() => eprintln!("Backend unreachable: {e}"),
//!         Err(e) => eprintln!("Request failed: {e}"),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod resources;

// Re-export main types for convenience
pub use client::{HttpClient, MessageResponse};
pub use config::{AuthConfig, SdkConfig, SdkConfigBuilder};
pub use error::{FieldError, SdkError, SdkResult, ValidationErrors};
pub use interceptor::{
    AuthInterceptor, RawResponse, RequestInterceptor, ResponseInterceptor, TokenStore,
};
pub use report_scoring_core::domain::{ReportQuery, ScoreData};
pub use report_scoring_core::settings::ScoreRange;

// Re-export resource clients
pub use resources::auth::{
    AuthClient, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
pub use resources::files::{FileEntry, FilesClient, UploadedFile};
pub use resources::reports::{CaseFile, CaseFiles, ReportSummary, ReportsClient};
pub use resources::scoring::{ScoreRecord, ScoreSubmission, ScoringClient, UserScore};

use std::sync::Arc;

/// The main client for the report scoring API.
///
/// All resource clients share one [`HttpClient`], so a token stored by
/// [`AuthClient::login`] is seen by every other resource.
///
/// # Example
///
/// ```rust,no_run
/// use report_scoring_sdk::{ReportScoringClient, SdkConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReportScoringClient::new(SdkConfig::default())?;
///
/// let files = client.files();
/// let reports = client.reports();
/// let auth = client.auth();
/// let scoring = client.scoring();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReportScoringClient {
    http_client: Arc<HttpClient>,
    files: FilesClient,
    reports: ReportsClient,
    auth: AuthClient,
    scoring: ScoringClient,
}

impl ReportScoringClient {
    /// Create a new client with the given configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config)?);

        Ok(Self {
            files: FilesClient::new(Arc::clone(&http_client)),
            reports: ReportsClient::new(Arc::clone(&http_client)),
            auth: AuthClient::new(Arc::clone(&http_client)),
            scoring: ScoringClient::new(Arc::clone(&http_client)),
            http_client,
        })
    }

    /// Create a client from the process-wide settings.
    pub fn from_settings() -> SdkResult<Self> {
        Self::new(SdkConfig::from_settings(
            report_scoring_core::settings::Settings::global(),
        ))
    }

    /// Create a new client using a builder pattern.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use report_scoring_sdk::ReportScoringClient;
    /// use std::time::Duration;
    ///
    /// let client = ReportScoringClient::builder("http://localhost:5000")
    ///     .with_timeout(Duration::from_secs(30))
    ///     .with_validation(true)
    ///     .build()?;
    /// # Ok::<(), report_scoring_sdk::SdkError>(())
    /// ```
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Get the files client.
    pub fn files(&self) -> &FilesClient {
        &self.files
    }

    /// Get the reports client.
    pub fn reports(&self) -> &ReportsClient {
        &self.reports
    }

    /// Get the account client.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Get the per-user scoring client.
    pub fn scoring(&self) -> &ScoringClient {
        &self.scoring
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// This is useful for making custom requests not covered by the resource clients.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Builder for creating a [`ReportScoringClient`] with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config_builder: SdkConfigBuilder,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config_builder: SdkConfig::builder(base_url),
        }
    }

    /// Set the authentication configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config_builder = self.config_builder.with_auth(auth);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.with_timeout(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.with_connect_timeout(timeout);
        self
    }

    /// Enable or disable request/response body logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config_builder = self.config_builder.with_logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.with_header(name, value);
        self
    }

    /// Check requests locally before sending.
    pub fn with_validation(mut self, enable: bool) -> Self {
        self.config_builder = self.config_builder.with_validation(enable);
        self
    }

    /// Set the score bounds used by local validation.
    pub fn with_score_range(mut self, range: ScoreRange) -> Self {
        self.config_builder = self.config_builder.with_score_range(range);
        self
    }

    /// Append an outbound hook.
    pub fn with_request_interceptor(
        mut self,
        interceptor: impl RequestInterceptor + 'static,
    ) -> Self {
        self.config_builder = self.config_builder.with_request_interceptor(interceptor);
        self
    }

    /// Append an inbound hook.
    pub fn with_response_interceptor(
        mut self,
        interceptor: impl ResponseInterceptor + 'static,
    ) -> Self {
        self.config_builder = self.config_builder.with_response_interceptor(interceptor);
        self
    }

    /// Build the client.
    ///
    /// Returns the configured client or an error if configuration is invalid.
    pub fn build(self) -> SdkResult<ReportScoringClient> {
        let config = self.config_builder.build();
        ReportScoringClient::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let result = ReportScoringClient::builder("https://scoring.example.com")
            .with_auth(AuthConfig::BearerToken("token".to_string()))
            .with_timeout(std::time::Duration::from_secs(30))
            .with_validation(true)
            .with_logging(true)
            .build();

        assert!(result.is_ok());
        let client = result.unwrap();
        assert_eq!(client.base_url(), "https://scoring.example.com");
        assert!(client.http_client().config().validate_requests);
    }

    #[test]
    fn test_client_rejects_bad_origin() {
        let result = ReportScoringClient::builder("ftp://scoring.example.com").build();
        assert!(matches!(result, Err(SdkError::Configuration(_))));
    }

    #[test]
    fn test_resource_clients_share_token_store() {
        let client = ReportScoringClient::new(SdkConfig::default()).unwrap();

        client.http_client().tokens().set("abc");
        assert!(client.auth().is_authenticated());

        client.auth().logout();
        assert!(!client.http_client().tokens().is_set());

        let _ = client.files();
        let _ = client.reports();
        let _ = client.scoring();
    }
}
