//! HTTP handlers for the routing query API
//!
//! Lets the UI ask whether content may be offered for public sharing
//! before it calls publish:
//! - POST /api/v1/routing/classify: classification and reason
//! - POST /api/v1/routing/resolve: destination relays for a publish
//! - GET  /api/v1/routing/relays: configured relays

use crate::event::{Kind, Tags};
use super::RelayResolver;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for routing handlers
#[derive(Clone)]
pub struct RoutingState {
    pub resolver: Arc<RelayResolver>,
}

/// Create the routing router
pub fn routing_router(state: RoutingState) -> Router {
    Router::new()
        .route("/api/v1/routing/classify", post(classify))
        .route("/api/v1/routing/resolve", post(resolve))
        .route("/api/v1/routing/relays", get(relays))
        .with_state(state)
}

// =============================================================================
// Request / Response types
// =============================================================================

/// Request body for classification
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub kind: i64,
    #[serde(default)]
    pub tags: Tags,
}

/// Classification response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub classification: String,
    pub reason: String,
    pub can_publish_publicly: bool,
}

/// Request body for relay resolution
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub kind: i64,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub share_to_public: bool,
}

/// Relay resolution response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub relays: Vec<String>,
    pub public_allowed: bool,
    pub vetoed: bool,
}

/// Configured relays
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaysResponse {
    pub private_relay: String,
    pub public_relays: Vec<String>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: "BAD_REQUEST".to_string(),
                message: message.into(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

fn parse_kind(kind: i64) -> Result<Kind, ApiError> {
    u16::try_from(kind)
        .map(Kind)
        .map_err(|_| ApiError::bad_request(format!("kind {} is out of range 0..=65535", kind)))
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/routing/classify
async fn classify(
    State(state): State<RoutingState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let Json(req) = payload?;
    let kind = parse_kind(req.kind)?;
    let result = state.resolver.policy().classifier().explain(kind, &req.tags);
    Ok(Json(ClassifyResponse {
        classification: result.class.to_string(),
        reason: result.reason.describe(),
        can_publish_publicly: result.class.is_shareable(),
    }))
}

/// POST /api/v1/routing/resolve
async fn resolve(
    State(state): State<RoutingState>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let Json(req) = payload?;
    let kind = parse_kind(req.kind)?;
    let decision = state.resolver.route(kind, &req.tags, req.share_to_public);
    Ok(Json(ResolveResponse {
        public_allowed: decision.relays.includes_public(),
        vetoed: decision.vetoed(),
        relays: decision.relays.into_vec(),
    }))
}

/// GET /api/v1/routing/relays
async fn relays(State(state): State<RoutingState>) -> impl IntoResponse {
    let relays = state.resolver.relays();
    Json(RelaysResponse {
        private_relay: relays.private_relay.clone(),
        public_relays: relays.public_relays.clone(),
    })
}
