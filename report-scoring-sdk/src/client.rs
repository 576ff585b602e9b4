//! HTTP client implementation
//!
//! This module provides the shared transport used by every resource client:
//! one base URL, one timeout, and the interceptor chain. There is no retry
//! logic; a failed call fails once.

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::interceptor::{
    AuthInterceptor, RawResponse, RequestInterceptor, ResponseInterceptor, TokenStore,
};
use reqwest::multipart::Form;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
    tokens: TokenStore,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        // Add custom headers
        for (name, value) in &config.custom_headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::Network)?;

        let tokens = match config.auth.token() {
            Some(token) => TokenStore::with_token(token),
            None => TokenStore::new(),
        };

        // The auth hook runs first so user hooks see the final headers.
        let mut request_interceptors: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(AuthInterceptor::new(tokens.clone()))];
        request_interceptors.extend(config.request_interceptors.iter().cloned());
        let response_interceptors = config.response_interceptors.clone();

        Ok(Self {
            client,
            config: Arc::new(config),
            tokens,
            request_interceptors,
            response_interceptors,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// The session token slot shared with the auth interceptor
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        let builder = self.builder(Method::GET, path);
        self.execute(builder).await?.json()
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> SdkResult<T> {
        let builder = self.builder(Method::GET, path).query(query);
        self.execute(builder).await?.json()
    }

    /// Make a GET request whose body is binary; the body is never parsed
    pub async fn get_bytes(&self, path: &str) -> SdkResult<Vec<u8>> {
        let builder = self
            .builder(Method::GET, path)
            .header(header::ACCEPT, "*/*");
        Ok(self.execute(builder).await?.body)
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SdkResult<T> {
        if self.config.enable_logging {
            if let Ok(text) = serde_json::to_string(body) {
                debug!("Request body: {}", text);
            }
        }
        let builder = self.builder(Method::POST, path).json(body);
        self.execute(builder).await?.json()
    }

    /// Make a POST request with a multipart form body
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> SdkResult<T> {
        let builder = self.builder(Method::POST, path).multipart(form);
        self.execute(builder).await?.json()
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        let builder = self.builder(Method::DELETE, path);
        self.execute(builder).await?.json()
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request through the interceptor chain. Errors from any stage
    /// pass through every response interceptor's `on_error` hook.
    pub async fn execute(&self, builder: RequestBuilder) -> SdkResult<RawResponse> {
        match self.dispatch(builder).await {
            Ok(response) => Ok(response),
            Err(mut err) => {
                for interceptor in &self.response_interceptors {
                    err = interceptor.on_error(err).await;
                }
                Err(err)
            }
        }
    }

    async fn dispatch(&self, builder: RequestBuilder) -> SdkResult<RawResponse> {
        let mut request = builder
            .build()
            .map_err(|e| SdkError::InvalidRequest(e.to_string()))?;

        for interceptor in &self.request_interceptors {
            interceptor.on_request(&mut request).await?;
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?
            .to_vec();

        debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "Received response");

        let mut raw = RawResponse {
            status,
            headers,
            body,
        };

        if self.config.enable_logging && is_textual(&raw) {
            debug!("Response body: {}", raw.text());
        }

        for interceptor in &self.response_interceptors {
            raw = interceptor.on_response(raw).await?;
        }

        if raw.is_success() {
            Ok(raw)
        } else {
            Err(SdkError::from_response(raw.status.as_u16(), &raw.text()))
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> SdkError {
        error!("Request failed: {}", e);
        if e.is_timeout() {
            SdkError::Timeout(self.config.timeout)
        } else {
            SdkError::Network(e)
        }
    }
}

fn is_textual(response: &RawResponse) -> bool {
    response
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json") || ct.starts_with("text/"))
        .unwrap_or(false)
}

/// Acknowledgement returned by write endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let config = SdkConfig::new("http://localhost:5000");
        let client = HttpClient::new(config).unwrap();

        assert_eq!(client.url("/api/files"), "http://localhost:5000/api/files");
        assert_eq!(client.url("api/files"), "http://localhost:5000/api/files");
    }

    #[test]
    fn test_url_building_with_trailing_slash() {
        let config = SdkConfig::new("https://scoring.example.com/");
        let client = HttpClient::new(config).unwrap();

        assert_eq!(
            client.url("/api/reports"),
            "https://scoring.example.com/api/reports"
        );
    }

    #[test]
    fn test_auth_token_seeds_store() {
        let config = SdkConfig::new("http://localhost:5000").with_bearer_token("seed");
        let client = HttpClient::new(config).unwrap();

        assert_eq!(client.tokens().get().as_deref(), Some("seed"));
        assert_eq!(client.request_interceptors.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(HttpClient::new(SdkConfig::new("")).is_err());
    }
}
