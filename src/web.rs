//! HTTP API for the chat front-end glue
//!
//! Both front-ends forward each incoming message here and render whatever
//! comes back. Inventory failures surface only as a generic "try again"
//! message, never as upstream error text.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chat::{route, Reply, INVENTORY_UNAVAILABLE};
use crate::error::Result;
use crate::models::InventoryRecord;
use crate::normalizer::NormalizedKey;
use crate::service::StockLookupService;
use crate::snapshot::{Clock, SnapshotStatus};
use crate::source::InventorySource;

/// Shared application state
struct AppState<S, C> {
    service: Arc<StockLookupService<S, C>>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Lookup query parameters
#[derive(Deserialize)]
struct LookupParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    best_per_brand: bool,
}

/// Chat message body
#[derive(Deserialize)]
struct MessageBody {
    text: String,
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    fn err(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        })
    }
}

#[derive(Serialize)]
struct LookupData {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<NormalizedKey>,
    is_size_query: bool,
    matches: Vec<InventoryRecord>,
}

#[derive(Serialize)]
struct MessageData {
    reply: Reply,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'static str>,
    needs_fallback: bool,
}

#[derive(Serialize)]
struct RefreshData {
    record_count: usize,
}

/// GET /health
async fn health_handler() -> &'static str {
    "ok"
}

/// GET /api/lookup?q={text}&best_per_brand={bool}
async fn lookup_handler<S, C>(
    State(state): State<AppState<S, C>>,
    Query(params): Query<LookupParams>,
) -> Json<ApiResponse<LookupData>>
where
    S: InventorySource + 'static,
    C: Clock + 'static,
{
    let key = state.service.query_key(&params.q);
    let matches = if params.best_per_brand {
        state.service.lookup_best_per_brand(&params.q).await
    } else {
        state.service.lookup(&params.q).await
    };

    ApiResponse::ok(LookupData {
        is_size_query: key.is_some(),
        key,
        query: params.q,
        matches,
    })
}

/// POST /api/message {"text": ...}
async fn message_handler<S, C>(
    State(state): State<AppState<S, C>>,
    Json(body): Json<MessageBody>,
) -> Json<ApiResponse<MessageData>>
where
    S: InventorySource + 'static,
    C: Clock + 'static,
{
    let reply = route(state.service.as_ref(), &body.text).await;

    ApiResponse::ok(MessageData {
        text: reply.text(),
        needs_fallback: reply.needs_fallback(),
        reply,
    })
}

/// GET /api/status
async fn status_handler<S, C>(
    State(state): State<AppState<S, C>>,
) -> Json<ApiResponse<SnapshotStatus>>
where
    S: InventorySource + 'static,
    C: Clock + 'static,
{
    ApiResponse::ok(state.service.status().await)
}

/// POST /api/refresh
async fn refresh_handler<S, C>(
    State(state): State<AppState<S, C>>,
) -> (StatusCode, Json<ApiResponse<RefreshData>>)
where
    S: InventorySource + 'static,
    C: Clock + 'static,
{
    match state.service.refresh().await {
        Ok(record_count) => (StatusCode::OK, ApiResponse::ok(RefreshData { record_count })),
        Err(e) => {
            log::warn!("Manual inventory refresh failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiResponse::err(INVENTORY_UNAVAILABLE),
            )
        }
    }
}

/// Build the web server router
pub fn create_router<S, C>(service: Arc<StockLookupService<S, C>>) -> Router
where
    S: InventorySource + 'static,
    C: Clock + 'static,
{
    let state = AppState { service };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/lookup", get(lookup_handler::<S, C>))
        .route("/api/message", post(message_handler::<S, C>))
        .route("/api/status", get(status_handler::<S, C>))
        .route("/api/refresh", post(refresh_handler::<S, C>))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

/// Start the web server and run until Ctrl-C
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve<S, C>(service: Arc<StockLookupService<S, C>>, port: u16) -> Result<()>
where
    S: InventorySource + 'static,
    C: Clock + 'static,
{
    let app = create_router(service);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Stock lookup API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
#[path = "web_tests.rs"]
mod tests;
