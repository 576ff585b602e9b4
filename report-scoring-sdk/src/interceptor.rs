//! Request and response hooks.
//!
//! Every call made through [`HttpClient`](crate::client::HttpClient) runs the
//! configured request interceptors before sending and the response
//! interceptors after receiving. Both traits default to pass-through, so an
//! implementation only overrides the hooks it needs.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Request, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::{SdkError, SdkResult};

/// Hook run on every outbound request.
#[async_trait]
pub trait RequestInterceptor: Send + Sync + fmt::Debug {
    /// Inspect or modify the request. Returning an error aborts the call.
    async fn on_request(&self, _request: &mut Request) -> SdkResult<()> {
        Ok(())
    }
}

/// Hook run on every inbound response.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync + fmt::Debug {
    /// Inspect or replace a received response, before status handling.
    async fn on_response(&self, response: RawResponse) -> SdkResult<RawResponse> {
        Ok(response)
    }

    /// Inspect or replace an error on its way to the caller.
    async fn on_error(&self, error: SdkError) -> SdkError {
        error
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> SdkResult<T> {
        serde_json::from_slice(&self.body).map_err(SdkError::Serialization)
    }
}

/// Shared slot for the session token.
///
/// Login writes it; the [`AuthInterceptor`] reads it on every request.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn get(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("set", &self.is_set())
            .finish()
    }
}

/// Attaches `Authorization: Bearer <token>` when a token is stored.
/// Requests that already carry an `Authorization` header are left alone.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    tokens: TokenStore,
}

impl AuthInterceptor {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl RequestInterceptor for AuthInterceptor {
    async fn on_request(&self, request: &mut Request) -> SdkResult<()> {
        if request.headers().contains_key(AUTHORIZATION) {
            return Ok(());
        }
        if let Some(token) = self.tokens.get() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                SdkError::Configuration("Token is not a valid header value".to_string())
            })?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn request() -> Request {
        Request::new(
            Method::GET,
            "http://localhost:5000/api/files".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_auth_interceptor_without_token_passes_through() {
        let interceptor = AuthInterceptor::new(TokenStore::new());
        let mut req = request();

        interceptor.on_request(&mut req).await.unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_auth_interceptor_attaches_token() {
        let tokens = TokenStore::new();
        let interceptor = AuthInterceptor::new(tokens.clone());
        tokens.set("abc.def.ghi");

        let mut req = request();
        interceptor.on_request(&mut req).await.unwrap();
        assert_eq!(
            req.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc.def.ghi"
        );
    }

    #[tokio::test]
    async fn test_auth_interceptor_rejects_bad_token() {
        let interceptor = AuthInterceptor::new(TokenStore::with_token("bad\ntoken"));
        let mut req = request();

        let result = interceptor.on_request(&mut req).await;
        assert!(matches!(result, Err(SdkError::Configuration(_))));
    }

    #[test]
    fn test_token_store_debug_hides_token() {
        let tokens = TokenStore::with_token("secret");
        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("secret"));

        tokens.clear();
        assert!(!tokens.is_set());
    }

    #[test]
    fn test_raw_response_helpers() {
        let response = RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: br#"{"message": "ok"}"#.to_vec(),
        };
        assert!(response.is_success());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["message"], "ok");
    }
}
