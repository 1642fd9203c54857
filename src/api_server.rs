// Axum API Server Module
//
// Purpose: REST API for eco-score comparison
// Routes: GET / (liveness), GET /health, POST /compare

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use anyhow::Context;

use crate::category_table::CategoryTable;
use crate::compare::{rank, resolve_all, CompareRequest, ComparisonEntry};
use crate::config::Config;
use crate::lookup::{CachedLookup, OpenFoodFactsClient, ProductLookup};
use crate::scorer::EcoScorer;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<EcoScorer>,
    pub lookup: Arc<dyn ProductLookup>,
}

impl AppState {
    /// Load the category table and build the cached catalog client.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        tracing::info!("Loading category table...");
        let outcome = CategoryTable::load(&config.category_table_path);
        outcome.log_outcome(&config.category_table_path);
        let table = Arc::new(outcome.into_table());

        tracing::info!(
            "Initializing catalog client (timeout {:?}, cache capacity {})...",
            config.lookup_timeout,
            config.lookup_cache_capacity
        );
        let client = OpenFoodFactsClient::new(&config.catalog_base_url, config.lookup_timeout)
            .context("Failed to build catalog HTTP client")?;
        let lookup = CachedLookup::new(client, config.lookup_cache_capacity);

        Ok(Self::with_lookup(table, Arc::new(lookup)))
    }

    /// Assemble state from parts (tests plug in an in-memory lookup here).
    pub fn with_lookup(table: Arc<CategoryTable>, lookup: Arc<dyn ProductLookup>) -> Self {
        Self {
            scorer: Arc::new(EcoScorer::new(table)),
            lookup,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/compare", post(compare))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Allow all origins
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Eco-Friendly Product Comparer API is running!"
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "category_entries": state.scorer.table().len(),
    }))
}

async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request =
        CompareRequest::from_json(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!("Comparing {} products", request.product_names.len());

    let resolutions = resolve_all(&request, state.lookup.as_ref()).await;

    // CPU-bound work: run in blocking thread pool
    let scorer = state.scorer.clone();
    let comparison: Vec<ComparisonEntry> =
        tokio::task::spawn_blocking(move || rank(&scorer, resolutions))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    let failed = comparison.iter().filter(|e| e.is_placeholder()).count();
    if failed > 0 {
        tracing::info!("{} of {} products could not be resolved", failed, comparison.len());
    }

    Ok(Json(serde_json::json!({ "comparison": comparison })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
