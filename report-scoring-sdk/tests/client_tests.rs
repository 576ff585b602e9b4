//! Transport, session and interceptor behavior against a mock backend.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use report_scoring_sdk::{
    LoginRequest, RawResponse, RegisterRequest, ReportScoringClient, RequestInterceptor,
    ResponseInterceptor, ScoreSubmission, SdkConfig, SdkError, SdkResult,
};
use reqwest::header::HeaderValue;
use reqwest::Request;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReportScoringClient {
    ReportScoringClient::new(SdkConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn login_token_is_attached_to_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "expert", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "token": "jwt-123",
            "username": "expert"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user_scores"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"report_id": "case-1", "score": 80, "comments": "ok"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let login = client
        .auth()
        .login(&LoginRequest::new("expert", "pw"))
        .await
        .unwrap();
    assert_eq!(login.username, "expert");
    assert!(client.auth().is_authenticated());

    let scores = client.scoring().mine().await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].score, 80);
}

#[tokio::test]
async fn logout_stops_sending_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ReportScoringClient::new(
        SdkConfig::new(server.uri()).with_bearer_token("seeded"),
    )
    .unwrap();

    client.files().list().await.unwrap();
    client.auth().logout();
    client.files().list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer seeded"
    );
    assert!(requests[1].headers.get("authorization").is_none());
}

#[tokio::test]
async fn failed_login_keeps_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .auth()
        .login(&LoginRequest::new("expert", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!client.auth().is_authenticated());
}

#[tokio::test]
async fn register_returns_the_new_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "User registered successfully",
            "user_id": 7
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .auth()
        .register(&RegisterRequest::new("expert", "e@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(response.user_id, Some(7));
}

#[tokio::test]
async fn scoring_submit_and_get() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scoring"))
        .and(body_json(json!({"report_id": "case-1", "score": 75, "comments": "fine"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Score saved successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/scoring/case-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 75,
            "comments": "fine",
            "created_at": "2024-05-01 10:15:00",
            "updated_at": "2024-05-01 10:15:00"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ack = client
        .scoring()
        .submit(&ScoreSubmission::new("case-1", 75).with_comments("fine"))
        .await
        .unwrap();
    assert_eq!(ack.message, "Score saved successfully");

    let record = client.scoring().get("case-1").await.unwrap();
    assert_eq!(record.score, 75);
    assert_eq!(record.comments.as_deref(), Some("fine"));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = ReportScoringClient::builder("http://127.0.0.1:1")
        .with_connect_timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let err = client.files().list().await.unwrap_err();
    assert!(err.is_network(), "expected network error, got {err:?}");
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn slow_backend_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = ReportScoringClient::builder(server.uri())
        .with_timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client.files().list().await.unwrap_err();
    assert!(matches!(err, SdkError::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client_for(&server).files().list().await.unwrap_err();
    assert!(err.is_server_error());
    assert!(err.to_string().contains("upstream exploded"));
}

#[derive(Debug)]
struct TraceHeader;

#[async_trait]
impl RequestInterceptor for TraceHeader {
    async fn on_request(&self, request: &mut Request) -> SdkResult<()> {
        request
            .headers_mut()
            .insert("x-trace-id", HeaderValue::from_static("trace-1"));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Counter {
    responses: AtomicUsize,
    errors: AtomicUsize,
}

#[derive(Debug)]
struct Counting(Arc<Counter>);

#[async_trait]
impl ResponseInterceptor for Counting {
    async fn on_response(&self, response: RawResponse) -> SdkResult<RawResponse> {
        self.0.responses.fetch_add(1, Ordering::SeqCst);
        Ok(response)
    }

    async fn on_error(&self, error: SdkError) -> SdkError {
        self.0.errors.fetch_add(1, Ordering::SeqCst);
        error
    }
}

#[tokio::test]
async fn interceptors_run_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .and(header("x-trace-id", "trace-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Report not found"})))
        .mount(&server)
        .await;

    let counter = Arc::new(Counter::default());
    let client = ReportScoringClient::builder(server.uri())
        .with_request_interceptor(TraceHeader)
        .with_response_interceptor(Counting(Arc::clone(&counter)))
        .build()
        .unwrap();

    client.files().list().await.unwrap();
    let err = client.reports().get("missing").await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(counter.responses.load(Ordering::SeqCst), 2);
    assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
}

#[derive(Debug)]
struct Reject;

#[async_trait]
impl RequestInterceptor for Reject {
    async fn on_request(&self, _request: &mut Request) -> SdkResult<()> {
        Err(SdkError::InvalidRequest("blocked".into()))
    }
}

#[tokio::test]
async fn request_interceptor_error_aborts_the_call() {
    let server = MockServer::start().await;
    let counter = Arc::new(Counter::default());
    let client = ReportScoringClient::builder(server.uri())
        .with_request_interceptor(Reject)
        .with_response_interceptor(Counting(Arc::clone(&counter)))
        .build()
        .unwrap();

    let err = client.files().list().await.unwrap_err();
    assert!(matches!(err, SdkError::InvalidRequest(ref m) if m == "blocked"));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
}
