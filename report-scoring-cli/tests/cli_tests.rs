//! End-to-end tests of the `report-scoring` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A command isolated from the user's configuration and environment.
fn cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("report-scoring").unwrap();
    cmd.current_dir(home.path())
        .env("REPORT_SCORING_CONFIG_DIR", home.path())
        .env_remove("REPORT_SCORING_PROFILE")
        .env_remove("REPORT_SCORING_API_URL")
        .env_remove("REPORT_SCORING_PASSWORD")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn routes_resolve_scoring() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["routes", "resolve", "/scoring"])
        .assert()
        .success()
        .stdout(predicate::str::contains("views/scoring"))
        .stdout(predicate::str::contains("main_layout"));
}

#[test]
fn routes_resolve_unknown_path_fails() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["routes", "resolve", "/admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No route matches '/admin'"));
}

#[test]
fn routes_list_as_json() {
    let home = TempDir::new().unwrap();
    let output = cmd(&home)
        .args(["--output", "json", "routes", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let routes: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let paths: Vec<&str> = routes.iter().filter_map(|r| r["path"].as_str()).collect();
    assert_eq!(
        paths,
        vec!["/", "/report", "/analysis", "/expert", "/scoring", "/login", "/register"]
    );
}

#[test]
fn files_preview_encodes_name() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--api-url", "http://scoring.test", "files", "preview", "a b.png"])
        .assert()
        .success()
        .stdout("http://scoring.test/api/preview/a%20b.png\n");
}

#[test]
fn set_url_is_used_by_later_commands() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["config", "set-url", "http://lab.test:5000"])
        .assert()
        .success();

    cmd(&home)
        .args(["files", "preview", "x.png"])
        .assert()
        .success()
        .stdout("http://lab.test:5000/api/preview/x.png\n");

    assert!(home.path().join("config.toml").exists());
}

#[test]
fn set_url_rejects_other_schemes() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["config", "set-url", "ftp://lab.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported URL scheme"));
}

#[test]
fn scoring_requires_login() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["scoring", "mine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn reports_list_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "5"))
        .and(query_param("reportType", "final"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "case-7", "name": "Flood damage"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = cmd(&home)
        .args(["--api-url", &server.uri(), "--output", "json"])
        .args(["reports", "list", "--page", "2", "--type", "final"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports, json!([{"id": "case-7", "name": "Flood damage"}]));
}

#[tokio::test]
async fn backend_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Report not found"})))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--api-url", &server.uri(), "reports", "get", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Report not found"));
}

#[tokio::test]
async fn login_session_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "token": "jwt-abc",
            "username": "expert"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user_scores"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"report_id": "case-1", "score": 90, "comments": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--api-url", &server.uri()])
        .args(["auth", "login", "-u", "expert", "--password", "pw"])
        .assert()
        .success();

    let creds = std::fs::read_to_string(home.path().join("credentials.toml")).unwrap();
    assert!(creds.contains("jwt-abc"));

    // the origin was saved with the session
    let output = cmd(&home)
        .args(["--output", "json", "scoring", "mine"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let scores: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(scores[0]["report_id"], "case-1");

    cmd(&home).args(["auth", "logout"]).assert().success();
    cmd(&home)
        .args(["scoring", "mine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn reports_file_saves_image_under_its_name() {
    let server = MockServer::start().await;
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
    Mock::given(method("GET"))
        .and(path("/api/reports/case-1/file/pics/scene.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(jpeg.clone(), "image/jpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--api-url", &server.uri()])
        .args(["reports", "file", "case-1", "pics", "scene.jpg"])
        .assert()
        .success();

    assert_eq!(std::fs::read(home.path().join("scene.jpg")).unwrap(), jpeg);
}

#[tokio::test]
async fn reports_file_prints_json_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/case-1/file/records/interview.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"speaker": "witness"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = cmd(&home)
        .args(["--api-url", &server.uri(), "--output", "json"])
        .args(["reports", "file", "case-1", "records", "interview.json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record, json!({"speaker": "witness"}));
    assert!(!home.path().join("interview.json").exists());
}

#[test]
fn reports_file_rejects_unknown_folder() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["reports", "file", "case-1", "secrets", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("secrets"));
}

#[tokio::test]
async fn reports_graph_is_saved_as_html() {
    let server = MockServer::start().await;
    let html = "<html><body>graph</body></html>";
    Mock::given(method("GET"))
        .and(path("/api/reports/case-1/graph"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--api-url", &server.uri(), "reports", "graph", "case-1"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(home.path().join("case-1-graph.html")).unwrap();
    assert_eq!(saved, html);
    assert!(!home.path().join("case-1-graph.png").exists());
}

#[tokio::test]
async fn reports_list_on_last_page_number_does_not_overflow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .and(query_param("page", "4294967295"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "case-9", "name": "Last"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--api-url", &server.uri()])
        .args(["reports", "list", "--page", "4294967295", "--page-size", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --page 4294967295 for more."));
}
