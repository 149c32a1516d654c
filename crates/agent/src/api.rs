//! HTTP API: recommendations, prices, health checks and Prometheus metrics

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use rightsize_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{RecommenderMetrics, StructuredLogger},
    pricing::{self, AlternativesReport, SavingsEstimate},
    BatchItem, BatchOutcome, BatchSummary, PriceLookup, SavingsError, ScaleDownRecommender,
    Service,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: RecommenderMetrics,
    pub logger: StructuredLogger,
    pub recommender: Arc<ScaleDownRecommender>,
    pub prices: Arc<dyn PriceLookup>,
    pub default_region: String,
    pub batch_concurrency: usize,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: RecommenderMetrics,
        logger: StructuredLogger,
        recommender: ScaleDownRecommender,
        prices: Arc<dyn PriceLookup>,
        default_region: impl Into<String>,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            logger,
            recommender: Arc::new(recommender),
            prices,
            default_region: default_region.into(),
            batch_concurrency: 8,
        }
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency;
        self
    }

    fn region(&self, requested: Option<String>) -> String {
        requested
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| self.default_region.clone())
    }

    fn hours_per_month(&self) -> f64 {
        self.recommender.config().hours_per_month
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownService(#[from] rightsize_lib::error::ServiceParseError),

    #[error("no {service} price for {instance_type} in {region}")]
    PriceNotFound {
        instance_type: String,
        service: Service,
        region: String,
    },

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownService(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PriceNotFound { .. } => StatusCode::NOT_FOUND,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub region: Option<String>,
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub region: String,
    pub outcomes: Vec<BatchOutcome>,
    pub summary: BatchSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceResponse {
    pub instance_type: String,
    pub service: Service,
    pub region: String,
    pub hourly_price: f64,
    pub monthly_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct SavingsRequest {
    pub current_type: String,
    pub proposed_type: String,
    #[serde(default = "default_count")]
    pub count: u32,
    pub service: Service,
    pub region: Option<String>,
}

fn default_count() -> u32 {
    1
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn recommendations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> Json<RecommendationResponse> {
    let region = state.region(request.region);
    let started = Instant::now();

    let outcomes = state
        .recommender
        .recommend_batch_concurrent(
            request.items,
            Arc::clone(&state.prices),
            &region,
            state.batch_concurrency,
        )
        .await;

    let elapsed = started.elapsed().as_secs_f64();
    let summary = BatchSummary::from_outcomes(&outcomes);
    state.metrics.record_batch(&outcomes, &summary, elapsed);
    for item in &outcomes {
        state.logger.log_recommendation(item, &region);
    }
    state.logger.log_batch(&summary, &region, elapsed);

    let outcomes = outcomes
        .into_iter()
        .map(|item| BatchOutcome {
            outcome: item.outcome.rounded(),
            ..item
        })
        .collect();

    Json(RecommendationResponse {
        region,
        outcomes,
        summary,
    })
}

async fn price(
    State(state): State<Arc<AppState>>,
    Path((service, instance_type)): Path<(String, String)>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<PriceResponse>, ApiError> {
    let service: Service = service.parse()?;
    let region = state.region(query.region);

    let found = pricing::usable_price(
        state
            .prices
            .hourly_price(&instance_type, &region, service)
            .await,
    );
    state.metrics.record_price_lookup(found.is_some());

    let hourly_price = found.ok_or_else(|| ApiError::PriceNotFound {
        instance_type: instance_type.clone(),
        service,
        region: region.clone(),
    })?;

    Ok(Json(PriceResponse {
        monthly_price: hourly_price * state.hours_per_month(),
        instance_type,
        service,
        region,
        hourly_price,
    }))
}

async fn alternatives(
    State(state): State<Arc<AppState>>,
    Path((service, instance_type)): Path<(String, String)>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<AlternativesReport>, ApiError> {
    let service: Service = service.parse()?;
    let region = state.region(query.region);

    let report =
        pricing::cheaper_alternatives(&instance_type, service, &region, state.prices.as_ref())
            .await;
    state
        .metrics
        .record_price_lookup(report.current_price.is_some());

    if report.current_price.is_none() {
        return Err(ApiError::PriceNotFound {
            instance_type,
            service,
            region,
        });
    }
    Ok(Json(report))
}

async fn savings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SavingsRequest>,
) -> Result<Json<SavingsEstimate>, ApiError> {
    let region = state.region(request.region);

    pricing::calculate_savings(
        &request.current_type,
        &request.proposed_type,
        request.count,
        request.service,
        &region,
        state.prices.as_ref(),
        state.hours_per_month(),
    )
    .await
    .map(Json)
    .map_err(|e| match e {
        SavingsError::PriceUnavailable {
            instance_type,
            service,
        } => ApiError::PriceNotFound {
            instance_type,
            service,
            region,
        },
        SavingsError::ZeroCount => ApiError::BadRequest(SavingsError::ZeroCount.to_string()),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/recommendations", post(recommendations))
        .route("/api/v1/prices/:service/:instance_type", get(price))
        .route("/api/v1/alternatives/:service/:instance_type", get(alternatives))
        .route("/api/v1/savings", post(savings))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
