//! Integration tests for the agent API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rightsize_agent::api::{create_router, AppState};
use rightsize_lib::{
    health::{components, HealthRegistry},
    observability::{RecommenderMetrics, StructuredLogger},
    PriceLookup, ScaleDownRecommender, StaticPriceTable,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.set_healthy(components::PRICE_TABLE).await;
    health_registry.set_healthy(components::RECOMMENDER).await;

    let prices: Arc<dyn PriceLookup> = Arc::new(StaticPriceTable::builtin());
    let state = Arc::new(AppState::new(
        health_registry,
        RecommenderMetrics::new(),
        StructuredLogger::new("test"),
        ScaleDownRecommender::default(),
        prices,
        "ap-northeast-1",
    ));

    (create_router(state.clone()), state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;
    let (status, health) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["price_table"].is_object());
}

#[tokio::test]
async fn test_healthz_returns_ok_when_degraded() {
    let (app, state) = setup_test_app().await;
    state
        .health_registry
        .set_degraded(components::PRICE_TABLE, "price file unreadable")
        .await;

    let (status, health) = get(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_readyz_tracks_startup() {
    let (app, state) = setup_test_app().await;
    let (status, _) = get(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    state.health_registry.set_ready(true).await;
    let (status, readiness) = get(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_recommendations_preserve_order_and_round() {
    let (app, _state) = setup_test_app().await;
    let body = json!({
        "items": [
            {"name": "web-1", "instance_type": "t3a.large", "utilization": 10.0, "service": "ec2"},
            {"name": "orders", "instance_type": "db.r5.large", "utilization": 15.0, "service": "rds"},
            {"name": "sessions", "instance_type": "cache.t3.medium", "utilization": 55.0, "service": "elasticache"},
            {"name": "idle", "instance_type": "t3.large", "service": "ec2"}
        ]
    });

    let (status, response) = post(app, "/api/v1/recommendations", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["region"], "ap-northeast-1");

    let outcomes = response["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[0]["name"], "web-1");

    let first = &outcomes[0]["outcome"];
    assert_eq!(first["status"], "recommended");
    assert_eq!(first["note"], "recommended");
    assert_eq!(first["recommendation"]["recommended_type"], "t3a.small");
    assert_eq!(first["recommendation"]["predicted_utilization"], 40.0);
    assert_eq!(first["recommendation"]["monthly_savings"], 41.17);

    assert_eq!(outcomes[1]["outcome"]["reason"], "minimum_configuration");
    assert_eq!(outcomes[2]["outcome"]["reason"], "adequate");
    assert_eq!(outcomes[3]["outcome"]["reason"], "utilization_unavailable");

    assert_eq!(response["summary"]["total"], 4);
    assert_eq!(response["summary"]["recommended"], 1);
    assert_eq!(response["summary"]["by_reason"]["adequate"], 1);
}

#[tokio::test]
async fn test_recommendations_use_requested_region() {
    let (app, _state) = setup_test_app().await;
    let body = json!({"region": "us-east-1", "items": []});

    let (status, response) = post(app, "/api/v1/recommendations", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["region"], "us-east-1");
    assert_eq!(response["summary"]["total"], 0);
}

#[tokio::test]
async fn test_price_lookup() {
    let (app, _state) = setup_test_app().await;
    let (status, price) = get(app, "/api/v1/prices/ec2/m5.large?region=us-east-1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(price["hourly_price"], 0.096);
    assert_eq!(price["region"], "us-east-1");
    assert!((price["monthly_price"].as_f64().unwrap() - 70.08).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_price_is_not_found() {
    let (app, _state) = setup_test_app().await;
    let (status, error) = get(app, "/api/v1/prices/ec2/x9.large").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error["error"].as_str().unwrap().contains("x9.large"));
}

#[tokio::test]
async fn test_unknown_service_is_bad_request() {
    let (app, _state) = setup_test_app().await;
    let (status, error) = get(app, "/api/v1/prices/lambda/m5.large").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("lambda"));
}

#[tokio::test]
async fn test_alternatives() {
    let (app, _state) = setup_test_app().await;
    let (status, report) = get(app, "/api/v1/alternatives/ec2/t3.large").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["current_price"], 0.0832);
    assert_eq!(report["alternatives"][0]["instance_type"], "t4g.large");
}

#[tokio::test]
async fn test_savings() {
    let (app, _state) = setup_test_app().await;
    let body = json!({
        "current_type": "m5.xlarge",
        "proposed_type": "m5.large",
        "count": 2,
        "service": "ec2"
    });

    let (status, estimate) = post(app.clone(), "/api/v1/savings", body).await;
    assert_eq!(status, StatusCode::OK);
    let monthly = estimate["monthly_savings"].as_f64().unwrap();
    assert!((monthly - 0.096 * 730.0 * 2.0).abs() < 1e-9);

    let body = json!({
        "current_type": "m5.xlarge",
        "proposed_type": "m5.large",
        "count": 0,
        "service": "ec2"
    });
    let (status, _) = post(app, "/api/v1/savings", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_exposes_outcome_counters() {
    let (app, _state) = setup_test_app().await;
    let body = json!({
        "items": [{"name": "web", "instance_type": "t3.medium", "utilization": 85.0, "service": "ec2"}]
    });
    post(app.clone(), "/api/v1/recommendations", body).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("rightsize_outcomes_total"));
    assert!(text.contains("under_provisioned"));
}
