use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use termfolio::commands::CommandRegistry;
use termfolio::config::Config;
use termfolio::server::rate_limit::RateLimiter;
use termfolio::server::router;
use termfolio::server::state::AppState;

use crate::common::*;

fn app_with(config: &Config, max_requests: u32) -> Router {
    let state = AppState::with_parts(
        Arc::new(CommandRegistry::builtin()),
        environment(config),
        RateLimiter::new(max_requests, Duration::from_secs(60)),
    );
    router(Arc::new(state), false)
}

fn app() -> Router {
    app_with(&Config::default(), 20)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_session(app: &Router) -> String {
    let (status, _, body) = send(app, json_request("POST", "/api/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send(&app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();
    let id = create_session(&app).await;

    let (status, _, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "normal");
    assert_eq!(body["history"].as_array().unwrap().len(), 1);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/sessions/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_run_command_and_mode() {
    let app = app();
    let id = create_session(&app).await;
    let commands = format!("/api/sessions/{}/commands", id);

    let (status, headers, body) =
        send(&app, json_request("POST", &commands, json!({ "command": "echo hi" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-ratelimit-limit"], "20");
    // session creation counted against the same window
    assert_eq!(headers["x-ratelimit-remaining"], "18");
    assert!(headers.contains_key("x-ratelimit-reset"));
    assert_eq!(body["outcome"], "appended");
    assert!(body["entry"]["output"]["value"]
        .as_str()
        .unwrap()
        .contains("not available in normal mode"));

    let (status, _, body) = send(
        &app,
        json_request("PUT", &format!("/api/sessions/{}/mode", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "advanced");

    let (_, _, body) =
        send(&app, json_request("POST", &commands, json!({ "command": "echo hi" }))).await;
    assert_eq!(body["entry"]["output"], json!({ "kind": "text", "value": "hi" }));
    assert_eq!(body["mode"], "advanced");

    let (_, _, body) =
        send(&app, json_request("POST", &commands, json!({ "command": "clear" }))).await;
    assert_eq!(body["outcome"], "cleared");
}

#[tokio::test]
async fn test_restart_directive_resets_session() {
    let app = app();
    let id = create_session(&app).await;
    let commands = format!("/api/sessions/{}/commands", id);

    send(&app, json_request("POST", &commands, json!({ "command": "about" }))).await;
    let (_, _, body) = send(
        &app,
        json_request("POST", &commands, json!({ "command": "rodrodrod start" })),
    )
    .await;
    assert_eq!(body["restarted"], true);
    assert_eq!(body["entry"]["output"]["kind"], "restart");

    let (_, _, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let app = app_with(&Config::default(), 2);
    let id = create_session(&app).await;
    let commands = format!("/api/sessions/{}/commands", id);

    let from = |ip: &str| {
        Request::builder()
            .method("POST")
            .uri(&commands)
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(json!({ "command": "about" }).to_string()))
            .unwrap()
    };

    assert_eq!(send(&app, from("198.51.100.1")).await.0, StatusCode::OK);
    assert_eq!(send(&app, from("198.51.100.1")).await.0, StatusCode::OK);

    let (status, headers, body) = send(&app, from("198.51.100.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert!(headers.contains_key("retry-after"));
    assert_eq!(body["code"], "RATE_LIMITED");

    assert_eq!(send(&app, from("198.51.100.2")).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_session_creation_is_rate_limited() {
    let app = app_with(&Config::default(), 1);
    create_session(&app).await;

    let (status, headers, body) =
        send(&app, json_request("POST", "/api/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(headers.contains_key("retry-after"));
    assert_eq!(body["code"], "RATE_LIMITED");

    let (_, _, body) = send(&app, get("/api/health")).await;
    assert_eq!(body["sessions"], 1);
}

#[tokio::test]
async fn test_complete_endpoint() {
    let app = app();
    let id = create_session(&app).await;

    let (status, _, body) =
        send(&app, get(&format!("/api/sessions/{}/complete?input=proj", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completion"], "projects");
    assert_eq!(body["suggestion"], "projects");

    let (_, _, body) = send(&app, get(&format!("/api/sessions/{}/complete?input=v", id))).await;
    assert_eq!(body["completion"], Value::Null);
}

#[tokio::test]
async fn test_github_stats_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "linguist", "stargazers_count": 40, "forks_count": 4 },
            { "name": "hello-world", "stargazers_count": 2, "forks_count": 9 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with(&config_with_services(&server.uri()), 20);
    let (status, _, body) = send(&app, get("/api/github-stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalStars"], 42);
    assert_eq!(body["totalForks"], 13);
    assert_eq!(body["publicRepos"], 2);
    assert_eq!(body["topRepos"][0]["name"], "linguist");

    // served from cache the second time
    let (status, _, _) = send(&app, get("/api/github-stats")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_github_stats_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let app = app_with(&config_with_services(&server.uri()), 20);
    let (status, _, body) = send(&app, get("/api/github-stats")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_FAILED");
}

#[tokio::test]
async fn test_citation_segmentation_endpoint() {
    let request = json_request(
        "POST",
        "/api/citations/segment",
        json!({
            "text": "Water boils at 100C at sea level.",
            "claims": {
                "c1": { "start_index": 0, "end_index": 21, "parent_claim_ids": [] },
                "c2": { "start_index": 15, "end_index": 21, "parent_claim_ids": ["c1"] }
            }
        }),
    );
    let (status, _, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments[0]["text"], "Water boils at 100C a");
    assert_eq!(segments[0]["claimId"], "c1");
    assert_eq!(segments[1]["claimId"], Value::Null);
    assert_eq!(body["root_claims"], json!(["c1"]));
    assert_eq!(body["depths"], json!({ "c1": 0, "c2": 1 }));
}
