//! Weather tool against a local stand-in for the forecast API.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use agent_core::ResultStatus;
use capital_agent::tools::TemperatureTool;
use capital_agent::weather::{OpenMeteoClient, WeatherConfig};
use capital_agent::WorldFacts;

/// Serve `app` on an ephemeral port and return the forecast endpoint URL
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1/forecast")
}

fn config(endpoint: String) -> WeatherConfig {
    WeatherConfig {
        endpoint,
        timeout: Some(Duration::from_secs(5)),
        max_retries: 0,
        retry_backoff: Duration::from_millis(10),
    }
}

fn tool(config: WeatherConfig) -> TemperatureTool {
    let client = OpenMeteoClient::new(config).unwrap();
    TemperatureTool::new(Arc::new(WorldFacts::builtin()), Arc::new(client))
}

fn fixed(status: StatusCode, body: &'static str) -> Router {
    Router::new().route("/v1/forecast", get(move || async move { (status, body) }))
}

#[tokio::test]
async fn reports_current_temperature() {
    async fn forecast(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
        assert_eq!(params["latitude"], "48.850000");
        assert_eq!(params["longitude"], "2.350000");
        assert_eq!(params["current"], "temperature_2m");
        (
            StatusCode::OK,
            r#"{"latitude":48.86,"longitude":2.36,"current":{"time":"2024-05-01T12:00","temperature_2m":18.3}}"#.into(),
        )
    }

    let endpoint = serve(Router::new().route("/v1/forecast", get(forecast))).await;
    let result = tool(config(endpoint)).temperature_for("Paris").await;

    assert_eq!(result.status, ResultStatus::Found);
    assert!(result.result.contains("18.3"));
    assert!(result.result.contains("Paris"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let endpoint = serve(fixed(StatusCode::SERVICE_UNAVAILABLE, "down for maintenance")).await;
    let result = tool(config(endpoint)).temperature_for("Tokyo").await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert_eq!(
        result.result,
        "Weather API returned status: 503 Service Unavailable"
    );
}

#[tokio::test]
async fn malformed_json_is_reported() {
    let endpoint = serve(fixed(StatusCode::OK, "{\"current\": ")).await;
    let result = tool(config(endpoint)).temperature_for("Lisbon").await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert!(result.result.starts_with("Failed to parse weather JSON:"));
}

#[tokio::test]
async fn schema_mismatch_is_reported() {
    let endpoint = serve(fixed(StatusCode::OK, r#"{"current": {"temperature_2m": "warm"}}"#)).await;
    let result = tool(config(endpoint)).temperature_for("Ottawa").await;

    assert!(result.result.starts_with("Failed to parse weather JSON:"));
}

#[tokio::test]
async fn connection_failure_is_reported() {
    // Bind then drop to get a port nothing listens on
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let result = tool(config(format!("http://{addr}/v1/forecast")))
        .temperature_for("Paris")
        .await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert!(result.result.starts_with("Failed to call weather API:"));
}

#[tokio::test]
async fn truncated_body_is_reported() {
    // Promise 100 bytes, send a few, then hang up
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"current\":")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let result = tool(config(format!("http://{addr}/v1/forecast")))
        .temperature_for("Paris")
        .await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert!(result.result.starts_with("Failed to read API response:"));
}

#[tokio::test]
async fn retries_transient_status_once() {
    async fn flaky(State(hits): State<Arc<AtomicUsize>>) -> (StatusCode, &'static str) {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
            (StatusCode::BAD_GATEWAY, "")
        } else {
            (StatusCode::OK, r#"{"current": {"temperature_2m": 21.04}}"#)
        }
    }

    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/v1/forecast", get(flaky))
        .with_state(Arc::clone(&hits));
    let endpoint = serve(app).await;

    let result = tool(WeatherConfig {
        max_retries: 1,
        ..config(endpoint)
    })
    .temperature_for("Tokyo")
    .await;

    assert_eq!(result.result, "The current temperature in Tokyo is 21.0°C.");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    async fn missing(State(hits): State<Arc<AtomicUsize>>) -> StatusCode {
        hits.fetch_add(1, Ordering::SeqCst);
        StatusCode::NOT_FOUND
    }

    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/v1/forecast", get(missing))
        .with_state(Arc::clone(&hits));
    let endpoint = serve(app).await;

    let result = tool(WeatherConfig {
        max_retries: 3,
        ..config(endpoint)
    })
    .temperature_for("Paris")
    .await;

    assert_eq!(result.result, "Weather API returned status: 404 Not Found");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_server_hits_timeout() {
    async fn stall() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        r#"{"current": {"temperature_2m": 1.0}}"#
    }

    let endpoint = serve(Router::new().route("/v1/forecast", get(stall))).await;
    let result = tool(WeatherConfig {
        timeout: Some(Duration::from_millis(100)),
        ..config(endpoint)
    })
    .temperature_for("Paris")
    .await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert!(result.result.starts_with("Failed to call weather API:"));
}
