//! Auth resource client
//!
//! Account registration and login. A successful login stores the issued
//! token in the client's [`TokenStore`](crate::interceptor::TokenStore), so
//! every later request is authenticated.

use crate::client::HttpClient;
use crate::error::SdkResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Client for account operations
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Arc<HttpClient>,
}

impl AuthClient {
    /// Create a new auth client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Register a new account
    pub async fn register(&self, request: &RegisterRequest) -> SdkResult<RegisterResponse> {
        self.client.post("/api/auth/register", request).await
    }

    /// Log in and keep the issued token for later requests
    pub async fn login(&self, request: &LoginRequest) -> SdkResult<LoginResponse> {
        let response: LoginResponse = self.client.post("/api/auth/login", request).await?;
        self.client.tokens().set(response.token.clone());
        info!(username = %response.username, "Logged in");
        Ok(response)
    }

    /// Forget the stored token. The backend keeps no session to end.
    pub fn logout(&self) {
        self.client.tokens().clear();
    }

    /// Whether a token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.client.tokens().is_set()
    }
}

/// Request to register an account
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Request to log in
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub username: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("message", &self.message)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secrets() {
        let login = LoginRequest::new("expert", "hunter2");
        assert!(!format!("{:?}", login).contains("hunter2"));

        let register = RegisterRequest::new("expert", "e@example.com", "hunter2");
        assert!(!format!("{:?}", register).contains("hunter2"));
    }

    #[test]
    fn test_login_request_body() {
        let body = serde_json::to_value(LoginRequest::new("expert", "pw")).unwrap();
        assert_eq!(body, serde_json::json!({"username": "expert", "password": "pw"}));
    }
}
