use crate::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HeartbeatResponse {
    pub message: String,
}

/// Route path to provider summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProvidersResponse(pub BTreeMap<String, String>);

/// Liveness check
#[utoipa::path(
    get,
    path = "/heartbeat/",
    responses(
        (status = 200, description = "Service is up", body = HeartbeatResponse)
    ),
    tag = "Service"
)]
pub async fn heartbeat() -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse {
        message: "Heartbeat".to_string(),
    })
}

/// List every registered provider route
#[utoipa::path(
    get,
    path = "/providers/",
    responses(
        (status = 200, description = "Provider routes and their summaries", body = ProvidersResponse)
    ),
    tag = "Service"
)]
pub async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse(state.registry.summaries()))
}
