// Financial Intelligence Engine - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use fin_intel::error::ensure_finite;
use fin_intel::{forecast, AnalysisSnapshot, Engine, EngineConfig, EngineError, VERSION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Shared application state
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Body of POST /api/forecast
#[derive(Deserialize)]
struct ForecastRequest {
    series: Vec<f64>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Map an engine error to 422, anything else to 500
fn error_response(err: anyhow::Error) -> Response {
    let status = if err.downcast_ref::<EngineError>().is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "request failed");
    }
    (status, Json(ApiResponse::<()>::err(err.to_string()))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: VERSION,
    }))
}

/// POST /api/analyze - Full analysis of a snapshot
async fn analyze(State(state): State<AppState>, Json(snapshot): Json<AnalysisSnapshot>) -> Response {
    let engine = state.engine.clone();

    // CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || engine.analyze(&snapshot)).await;

    match outcome {
        Ok(Ok(report)) => (StatusCode::OK, Json(ApiResponse::ok(report))).into_response(),
        Ok(Err(e)) => error_response(e.into()),
        Err(join) => error_response(anyhow::Error::new(join).context("analysis task failed")),
    }
}

/// POST /api/forecast - Forecast the next value of a series
async fn forecast_series(Json(request): Json<ForecastRequest>) -> Response {
    for (i, value) in request.series.iter().enumerate() {
        if let Err(e) = ensure_finite(format!("series[{}]", i), *value) {
            return error_response(e.into());
        }
    }

    let result = forecast(&request.series);
    (StatusCode::OK, Json(ApiResponse::ok(result))).into_response()
}

fn load_config() -> Result<EngineConfig> {
    match std::env::var("FIN_INTEL_CONFIG") {
        Ok(path) => EngineConfig::from_file(&path),
        Err(_) => Ok(EngineConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fin_intel=info,fin_intel_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("🌐 Financial Intelligence Engine - Web Server v{}", VERSION);

    let config = load_config()?;
    let engine = Engine::new(config).context("Invalid engine configuration")?;

    // Create shared state
    let state = AppState {
        engine: Arc::new(engine),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .route("/forecast", post(forecast_series))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = std::env::var("FIN_INTEL_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("   POST /api/analyze   snapshot -> report");
    info!("   POST /api/forecast  series -> forecast");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
