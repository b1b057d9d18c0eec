//! Integration tests for the HTTP front door.

mod helpers;

use anyhow::Result;
use helpers::app::TestAppBuilder;
use procwatch::DISPLAY_NAME;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const METRIC_KEYS: [&str; 5] = ["cpu_percent", "memoria_mb", "nome", "pid", "sistema_operacional"];

fn sorted_keys(body: &Value) -> Vec<String> {
    let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn info_returns_only_the_name() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;

    let response = reqwest::get(app.url("/info")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str()?.to_string();
    assert!(content_type.starts_with("application/json"));

    let body: Value = response.json().await?;
    assert_eq!(sorted_keys(&body), vec!["nome".to_string()]);
    assert_eq!(body["nome"], "João Otávio Andreotti");

    app.shutdown(Duration::from_secs(5)).await
}

#[tokio::test]
async fn info_is_idempotent() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;

    let first = reqwest::get(app.url("/info")).await?.text().await?;
    let second = reqwest::get(app.url("/info")).await?.text().await?;
    assert_eq!(first, second);
    assert_eq!(first, r#"{"nome":"João Otávio Andreotti"}"#);

    app.shutdown(Duration::from_secs(5)).await
}

#[tokio::test]
async fn metricas_returns_all_fields() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;

    let response = reqwest::get(app.url("/metricas")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;

    assert_eq!(sorted_keys(&body), METRIC_KEYS.map(String::from).to_vec());
    assert_eq!(body["nome"], DISPLAY_NAME);
    // The server runs inside the test process.
    assert_eq!(body["pid"].as_u64(), Some(u64::from(std::process::id())));

    let memory = body["memoria_mb"].as_f64().unwrap();
    assert!(memory >= 0.0);
    assert!(((memory * 100.0).round() - memory * 100.0).abs() < 1e-6);

    assert!(body["cpu_percent"].as_f64().unwrap() >= 0.0);
    assert!(!body["sistema_operacional"].as_str().unwrap().is_empty());

    app.shutdown(Duration::from_secs(5)).await
}

#[tokio::test]
async fn metricas_twice_reports_same_process() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;

    let first: Value = reqwest::get(app.url("/metricas")).await?.json().await?;
    let second: Value = reqwest::get(app.url("/metricas")).await?.json().await?;

    assert_eq!(first["nome"], second["nome"]);
    assert_eq!(first["pid"], second["pid"]);

    app.shutdown(Duration::from_secs(5)).await
}

#[tokio::test]
async fn concurrent_requests_are_independent() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;
    let client = reqwest::Client::new();

    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = app.url("/metricas");
        async move { client.get(url).send().await?.json::<Value>().await }
    });
    let bodies = futures::future::try_join_all(requests).await?;

    for body in &bodies {
        assert_eq!(body["pid"].as_u64(), Some(u64::from(std::process::id())));
        assert_eq!(body["nome"], DISPLAY_NAME);
    }

    app.shutdown(Duration::from_secs(5)).await
}

#[tokio::test]
async fn index_renders_html_page() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;

    let response = reqwest::get(app.url("/")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str()?.to_string();
    assert!(content_type.starts_with("text/html"));

    let page = response.text().await?;
    assert!(page.contains(DISPLAY_NAME));
    assert!(page.contains(&format!("<td>{}</td>", std::process::id())));
    assert!(!page.contains("{{"));

    app.shutdown(Duration::from_secs(5)).await
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let app = TestAppBuilder::new().start().await?;

    let response = reqwest::get(app.url("/nope")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.shutdown(Duration::from_secs(5)).await
}
