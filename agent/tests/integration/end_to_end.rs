//! The real service and runner behind the router, and the remote client
//! against a live listener. `echo` stands in for `docker` so nothing here
//! needs a Docker daemon.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use compose_agent::application::services::ComposeService;
use compose_agent::client::{AgentClient, ComposeReply};
use compose_agent::domain::{AgentConfig, Authenticator};
use compose_agent::gateway::{self, GatewayState};
use compose_agent::infra::TokioCommandRunner;
use compose_agent_common::{
    ComposeDownOptions, ComposeStatusOptions, ComposeUpOptions, ErrorKind, StatusFormat,
};
use http_body_util::BodyExt as _;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt as _;

const TOKEN: &str = "integration-token-0001";

fn config(working_directory: &Path, compose_command: &str) -> Arc<AgentConfig> {
    let mut config: AgentConfig = serde_yaml::from_str("{}").unwrap();
    config.auth.token = TOKEN.to_string();
    config.docker.working_directory = working_directory.to_path_buf();
    config.docker.compose_command = compose_command.to_string();
    config.validate().unwrap();
    Arc::new(config)
}

fn router(config: &Arc<AgentConfig>) -> Router {
    let service = ComposeService::new(TokioCommandRunner::default(), Arc::clone(config));
    gateway::router(Arc::new(GatewayState::new(
        Authenticator::from_config(config),
        service,
    )))
}

async fn call(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn authed_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_up_runs_configured_command_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), "echo compose");

    let (status, body) = call(
        router(&config),
        authed_post("/docker/compose/up", r#"{"build": true}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["return_code"], 0);
    assert_eq!(body["command"], "echo compose up -d --build");
    assert_eq!(body["stdout"], "compose up -d --build\n");
    assert_eq!(body["working_directory"], dir.path().display().to_string());
}

#[tokio::test]
async fn test_nonzero_exit_is_reported_with_http_ok() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), "false");

    let (status, body) = call(router(&config), authed_post("/docker/compose/down", "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["return_code"], 1);
    assert_eq!(body["error"], "command_failed");
}

#[tokio::test]
async fn test_missing_working_directory_is_configuration_error_on_every_route() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir.path().join("not-created"), "echo compose");

    let requests = [
        authed_post("/docker/compose/up", ""),
        authed_post(
            "/docker/compose/up",
            r#"{"detached": false, "build": true, "force_recreate": true}"#,
        ),
        authed_post("/docker/compose/down", r#"{"volumes": true}"#),
        Request::get("/docker/compose/status?format=json")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap(),
    ];
    for req in requests {
        let uri = req.uri().to_string();
        let (status, body) = call(router(&config), req).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["success"], false, "{uri}");
        assert_eq!(body["error"], "configuration_error", "{uri}");
        assert_eq!(body["return_code"], Value::Null, "{uri}");
    }
}

#[tokio::test]
async fn test_missing_compose_binary_is_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), "no-such-compose-binary-9d2e compose");

    let (status, body) = call(router(&config), authed_post("/docker/compose/up", "")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "launch_error");
}

#[tokio::test]
async fn test_remote_client_against_live_listener() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), "echo compose");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(gateway::serve(listener, router(&config)));

    let client = AgentClient::new(&base, TOKEN).unwrap();
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");

    let outcome = client.up(&ComposeUpOptions::default()).await.unwrap();
    assert_eq!(outcome.status, 200);
    assert!(outcome.is_success());

    let outcome = client
        .down(&ComposeDownOptions {
            remove_volumes: true,
            remove_orphans: false,
        })
        .await
        .unwrap();
    let ComposeReply::Executed(resp) = &outcome.reply else {
        panic!("expected execution reply, got {:?}", outcome.reply);
    };
    assert_eq!(resp.stdout, "compose down -v\n");

    let outcome = client
        .status(&ComposeStatusOptions {
            format: StatusFormat::Json,
        })
        .await
        .unwrap();
    let ComposeReply::Executed(resp) = &outcome.reply else {
        panic!("expected execution reply, got {:?}", outcome.reply);
    };
    assert_eq!(resp.command, "echo compose ps --format json");

    let intruder = AgentClient::new(&base, "wrong-token-000000000").unwrap();
    let outcome = intruder.up(&ComposeUpOptions::default()).await.unwrap();
    assert_eq!(outcome.status, 401);
    assert!(!outcome.is_success());
    assert!(matches!(
        outcome.reply,
        ComposeReply::Rejected(ref err) if err.error == ErrorKind::Unauthorized
    ));

    server.abort();
}
