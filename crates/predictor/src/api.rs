//! HTTP API for predictions, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    health::{HealthRegistry, HealthResponse},
    validation::as_object,
    DurationResult, FaultResult, ModelStatus, PredictionError, PredictionService,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

pub const DURATION_ROUTE: &str = "/api/ai/predict/duration";
pub const FAULT_ROUTE: &str = "/api/ai/predict/fault";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>, health_registry: HealthRegistry) -> Self {
        Self {
            service,
            health_registry,
        }
    }
}

/// Response envelope shared by every prediction route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Errors returned by the prediction routes
#[derive(Debug)]
pub enum ApiError {
    /// 400, caller supplied invalid input
    Validation(String),
    /// 500, details are logged but not returned
    Internal(String),
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::Validation(e) => ApiError::Validation(e.to_string()),
            PredictionError::Internal(e) => ApiError::Internal(format!("{:#}", e)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!(
            "request body has an invalid format: {}",
            rejection.body_text()
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(detail) => {
                debug!(error = "VALIDATION_ERROR", %detail, "API client error");
                (StatusCode::BAD_REQUEST, format!("VALIDATION_ERROR: {}", detail))
            }
            ApiError::Internal(detail) => {
                error!(error = "INTERNAL_ERROR", %detail, "API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR: prediction failed".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()> {
            code: status.as_u16(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

const PREDICTION_SUCCEEDED: &str = "prediction succeeded";

async fn predict_duration(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<DurationResult>>, ApiError> {
    let Json(body) = payload?;
    let input = as_object(&body).map_err(PredictionError::from)?;
    let result = state.service.predict_duration(input)?;
    Ok(Json(ApiResponse::success(PREDICTION_SUCCEEDED, result)))
}

async fn predict_fault(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<FaultResult>>, ApiError> {
    let Json(body) = payload?;
    let input = as_object(&body).map_err(PredictionError::from)?;
    let result = state.service.predict_fault(input)?;
    Ok(Json(ApiResponse::success(PREDICTION_SUCCEEDED, result)))
}

/// Service banner
async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "EV Charging AI Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [DURATION_ROUTE, FAULT_ROUTE],
    }))
}

/// Model availability
async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ModelStatus>> {
    Json(ApiResponse::success("ok", state.service.model_status()))
}

/// Liveness: always 200, a degraded status means the heuristic is serving
async fn healthz(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.health_registry.health().await)
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

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
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

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route(DURATION_ROUTE, post(predict_duration))
        .route(FAULT_ROUTE, post(predict_fault))
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
