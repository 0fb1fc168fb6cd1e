//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the full router (body
//! limit, compression and tracing layers included) without binding a socket.
//! Methods are intentionally broad to support the different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use finlens::config::Config;
use finlens::server::build_app;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// A test client that sends requests straight into the application router.
pub struct TestClient {
    router: Router,
}

impl TestClient {
    /// Create a new test client with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let (_state, router) = build_app(config);
        Self { router }
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a POST request with a raw body and JSON content type.
    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// POST a JSON value and parse the JSON response.
    pub async fn post_json(&self, uri: &str, payload: &Value) -> (StatusCode, Value) {
        let (status, body) = self.post_raw(uri, payload.to_string()).await;
        let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, parsed)
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A breakdown row with the given monthly values; the total is their sum.
pub fn row(id: Option<i64>, name: &str, monthly: &[f64]) -> Value {
    let total: f64 = monthly.iter().sum();
    json!({ "id": id, "name": name, "total": total, "monthly": monthly })
}

/// An overview payload whose monthly flows are derived from the given
/// income and expense series.
pub fn overview(year: i32, income: &[Value], expense: &[Value]) -> Value {
    let monthly_sum = |rows: &[Value], month: usize| -> f64 {
        rows.iter()
            .map(|r| r["monthly"][month].as_f64().unwrap_or(0.0))
            .sum()
    };
    let total = |rows: &[Value]| -> f64 { rows.iter().map(|r| r["total"].as_f64().unwrap()).sum() };

    let monthly: Vec<Value> = (0..12)
        .map(|m| {
            json!({
                "month": m + 1,
                "income": monthly_sum(income, m),
                "expense": monthly_sum(expense, m),
            })
        })
        .collect();

    let total_income = total(income);
    let total_expense = total(expense);

    json!({
        "year": year,
        "stats": {
            "total_income": total_income,
            "total_expense": total_expense,
            "net_savings": total_income - total_expense,
        },
        "monthly": monthly,
        "category_breakdown": expense,
        "income_category_breakdown": income,
    })
}
