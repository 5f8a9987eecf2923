use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use kharcha_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, but with a fresh in-memory store and an
    /// ephemeral port, so tests are fully isolated from each other.
    async fn spawn() -> Self {
        let app = build_app(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_expense(
    client: &reqwest::Client,
    base_url: &str,
    body: serde_json::Value,
    idempotency_key: Option<&str>,
) -> reqwest::Response {
    let mut req = client.post(format!("{base_url}/expenses")).json(&body);
    if let Some(key) = idempotency_key {
        req = req.header("Idempotency-Key", key);
    }
    req.send().await.unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn create_then_list_round_trips_amounts_exactly() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = post_expense(
        &client,
        &server.base_url,
        json!({ "amount": 12.50, "category": "Food", "description": "lunch", "date": "2024-01-15" }),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["amount"], json!(12.5));
    assert_eq!(created["category"], json!("Food"));
    assert_eq!(created["description"], json!("lunch"));
    assert_eq!(created["date"], json!("2024-01-15"));
    assert!(created["id"].is_string());
    assert!(created["created_at"].is_string());

    let res = post_expense(
        &client,
        &server.base_url,
        json!({ "amount": 0.10, "category": "Transport", "date": "2024-01-20" }),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/expenses", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(listed.len(), 2);
    // Newest date first; no float drift on read-back.
    assert_eq!(listed[0]["amount"], json!(0.1));
    assert_eq!(listed[1]["amount"], json!(12.5));
    // Description defaults to empty when omitted.
    assert_eq!(listed[0]["description"], json!(""));
}

#[tokio::test]
async fn idempotency_key_header_replays_the_original() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let first: serde_json::Value = post_expense(
        &client,
        &server.base_url,
        json!({ "amount": 42.0, "category": "Food", "date": "2024-02-01" }),
        Some("retry-1"),
    )
    .await
    .json()
    .await
    .unwrap();

    // Retried write with a different body: the original wins verbatim.
    let res = post_expense(
        &client,
        &server.base_url,
        json!({ "amount": 99.0, "category": "Transport", "date": "2024-06-01" }),
        Some("retry-1"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let second: serde_json::Value = res.json().await.unwrap();
    assert_eq!(first, second);

    let listed: Vec<serde_json::Value> = client
        .get(format!("{}/expenses", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["amount"], json!(42.0));
}

#[tokio::test]
async fn invalid_writes_are_rejected_with_400() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let missing_amount = post_expense(
        &client,
        &server.base_url,
        json!({ "category": "Food", "date": "2024-01-01" }),
        None,
    )
    .await;
    assert_eq!(missing_amount.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = missing_amount.json().await.unwrap();
    assert_eq!(body["error"], json!("missing_fields"));

    let negative = post_expense(
        &client,
        &server.base_url,
        json!({ "amount": -1.0, "category": "Food", "date": "2024-01-01" }),
        None,
    )
    .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let blank_category = post_expense(
        &client,
        &server.base_url,
        json!({ "amount": 1.0, "category": "   ", "date": "2024-01-01" }),
        None,
    )
    .await;
    assert_eq!(blank_category.status(), StatusCode::BAD_REQUEST);

    // Nothing half-written must be visible after failed writes.
    let listed: Vec<serde_json::Value> = client
        .get(format!("{}/expenses", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn list_supports_category_filter_and_tolerates_unknown_sort() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (amount, category, date) in [
        (1.0, "Food", "2024-01-01"),
        (2.0, "Transport", "2024-03-05"),
        (3.0, "Food", "2024-02-10"),
    ] {
        let res = post_expense(
            &client,
            &server.base_url,
            json!({ "amount": amount, "category": category, "date": date }),
            None,
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let food: Vec<serde_json::Value> = client
        .get(format!("{}/expenses?category=Food", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(food.len(), 2);
    assert_eq!(food[0]["date"], json!("2024-02-10"));
    assert_eq!(food[1]["date"], json!("2024-01-01"));

    // An unrecognized sort value falls back to the default order silently.
    let all: Vec<serde_json::Value> = client
        .get(format!("{}/expenses?sort=amount_asc", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let dates: Vec<&str> = all.iter().map(|e| e["date"].as_str().unwrap()).collect();
    assert_eq!(dates, ["2024-03-05", "2024-02-10", "2024-01-01"]);

    let none: Vec<serde_json::Value> = client
        .get(format!("{}/expenses?category=Nonexistent", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.is_empty());
}
