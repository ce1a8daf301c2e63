//! Sales catalog HTTP server.
//!
//! Exposes the dataset as a JSON API for catalog browsers. Every endpoint
//! is a read: the dataset is loaded once into [`SalesStore`] and each
//! request runs the query pipeline over that snapshot.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/sales` | Search, filter, sort, and paginate records |
//! | `GET`  | `/sales/filter-options` | Facet values for filter pickers |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Response Contract
//!
//! Success bodies carry `success: true` plus the payload:
//!
//! ```json
//! { "success": true, "data": [ ... ], "pagination": { "currentPage": 1, ... } }
//! ```
//!
//! Failures are always `500` with:
//!
//! ```json
//! { "success": false, "message": "Error fetching sales data", "error": "..." }
//! ```
//!
//! Malformed query parameters are never a failure; the query boundary falls
//! back to defaults instead.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based
//! dashboards can call the API directly.

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::params::parse_query;
use crate::store::SalesStore;
use sales_scope_core::{compute_facets, run_query, FacetSummary, PageMeta, Record};

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning).
    config: Arc<Config>,
    /// Cached dataset snapshot shared by every request.
    store: Arc<SalesStore>,
}

/// Starts the sales API server.
///
/// Binds to the address configured in `[server].bind`, warms the dataset
/// cache, and serves until the process is terminated.
///
/// This is the entry point used by the `salescope serve` command.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let store = Arc::new(SalesStore::from_path(config.dataset.path.clone()));

    // Warm the cache so the first request does not pay for the read.
    store.load().await;

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/sales", get(handle_sales))
        .route("/sales/filter-options", get(handle_filter_options))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("sales API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// Internal fault envelope: serialized as
/// `{ "success": false, "message": ..., "error": ... }` with status 500.
///
/// Only internal faults take this shape. Bad query parameters degrade to
/// defaults at the boundary and a missing dataset degrades to an empty
/// snapshot in the store, so in practice this path stays dormant.
struct ApiError {
    message: String,
    detail: String,
}

impl ApiError {
    fn internal(message: &str, err: anyhow::Error) -> Self {
        tracing::error!("{message}: {err:#}");
        Self {
            message: message.to_string(),
            detail: format!("{err:#}"),
        }
    }
}

/// JSON failure body.
#[derive(Serialize)]
struct FailureBody {
    success: bool,
    message: String,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = FailureBody {
            success: false,
            message: self.message,
            error: self.detail,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /sales ============

/// JSON response body for `GET /sales`.
#[derive(Serialize)]
struct SalesResponse {
    success: bool,
    /// Records on the requested page, in their serialized column form.
    data: Vec<Record>,
    pagination: PageMeta,
}

/// Handler for `GET /sales`.
///
/// Query parameters are decoded as repeatable key/value pairs so
/// multi-valued filters (`?regions=North&regions=South`) work without any
/// bracket syntax. The boundary ignores what it does not recognize.
async fn handle_sales(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<SalesResponse>, ApiError> {
    build_sales_response(&state, &params)
        .await
        .map(Json)
        .map_err(|err| ApiError::internal("Error fetching sales data", err))
}

async fn build_sales_response(
    state: &AppState,
    params: &[(String, String)],
) -> anyhow::Result<SalesResponse> {
    let query = parse_query(params, state.config.query.default_page_size);
    let snapshot = state.store.load().await;
    let page = run_query(&snapshot, &query);
    Ok(SalesResponse {
        success: true,
        data: page.rows,
        pagination: page.meta,
    })
}

// ============ GET /sales/filter-options ============

/// JSON response body for `GET /sales/filter-options`. The facet fields sit
/// directly beside `success`, not nested under a key.
#[derive(Serialize)]
struct FilterOptionsResponse {
    success: bool,
    #[serde(flatten)]
    options: FacetSummary,
}

/// Handler for `GET /sales/filter-options`.
///
/// Facets always describe the whole dataset, never a filtered view.
async fn handle_filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    build_filter_options(&state)
        .await
        .map(Json)
        .map_err(|err| ApiError::internal("Error fetching filter options", err))
}

async fn build_filter_options(state: &AppState) -> anyhow::Result<FilterOptionsResponse> {
    let snapshot = state.store.load().await;
    Ok(FilterOptionsResponse {
        success: true,
        options: compute_facets(&snapshot),
    })
}
