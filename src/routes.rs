//! Route definitions and router setup
//!
//! Adapts plain HTTP requests onto the content event protocol and mounts the
//! raw event endpoint. CORS is answered by the handler itself, so no CORS
//! layer sits in front of it.

use crate::error::AppError;
use crate::event::{ContentRequest, ContentResponse};
use crate::state::SharedState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::Method,
    routing::{any, get, post},
    Json, Router,
};
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{warn, Level};

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState) -> Router {
    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Raw trigger events
        .route("/events", post(invoke_event))
        // Content endpoint, every method goes to the handler
        .route("/", any(content))
        .route("/content", any(content))
        .layer(middleware)
        .with_state(state)
}

/// Map an HTTP request onto the event shape and run the handler
async fn content(
    State(state): State<SharedState>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> ContentResponse {
    let request = ContentRequest {
        http_method: method.to_string(),
        query_string_parameters: Some(params),
        body: (!body.is_empty()).then_some(body),
    };

    state.handler.handle(request).await
}

/// Run a gateway event verbatim and return the event response as JSON.
/// Undecodable events still get an event-shaped 400.
async fn invoke_event(State(state): State<SharedState>, body: Bytes) -> Json<ContentResponse> {
    match serde_json::from_slice::<ContentRequest>(&body) {
        Ok(event) => Json(state.handler.handle(event).await),
        Err(e) => {
            warn!("Rejected malformed event: {}", e);
            Json(ContentResponse::from(AppError::from(e)))
        }
    }
}

/// Health check endpoint
async fn health_check(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "databaseConfigured": state.handler.is_configured(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
