//! ToolClient over real sockets

use axum::{http::StatusCode, routing::post, Router};
use guesstimate_api::{ApiConfig, ApiServer};
use guesstimate_core::tool_client::{ToolClient, ToolOutcome};
use guesstimate_tools::ToolRegistry;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

#[tokio::test]
async fn test_timeout_is_an_error_envelope() {
    let (listener, url) = bind().await;
    // Accept and hold connections without ever answering.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = ToolClient::http(url, Duration::from_millis(200));
    let started = Instant::now();
    let outcome = client.calculate("2 + 2").await;

    assert!(!outcome.is_success());
    assert!(
        matches!(outcome, ToolOutcome::Failure(ref msg) if msg.contains("timed out")),
        "{outcome:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_connection_refused_is_an_error_envelope() {
    let (listener, url) = bind().await;
    drop(listener);

    let outcome = ToolClient::http(url, Duration::from_secs(2))
        .web_search("anything")
        .await;
    assert!(matches!(outcome, ToolOutcome::Failure(_)));
}

#[tokio::test]
async fn test_round_trip_against_api_server() {
    let (listener, url) = bind().await;
    let server = ApiServer::new(ApiConfig::default(), ToolRegistry::default());
    tokio::spawn(async move { server.serve(listener).await });

    let client = ToolClient::http(url, Duration::from_secs(5));
    assert_eq!(
        client.calculate("sqrt(16) + 10 % 3").await,
        ToolOutcome::Success("sqrt(16) + 10 % 3 = 5".to_string())
    );
    assert_eq!(
        client.calculate("1 / 0").await,
        ToolOutcome::Failure("division by zero".to_string())
    );
    assert!(client.web_search("NYC").await.is_success());
}

#[tokio::test]
async fn test_non_2xx_is_an_error_envelope() {
    let (listener, url) = bind().await;
    let app = Router::new().route(
        "/tools/calculator",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    tokio::spawn(async move { axum::serve(listener, app).await });

    let outcome = ToolClient::http(url, Duration::from_secs(5))
        .calculate("1 + 1")
        .await;
    assert_eq!(
        outcome,
        ToolOutcome::Failure("Tool server returned HTTP 500: boom".to_string())
    );
}
