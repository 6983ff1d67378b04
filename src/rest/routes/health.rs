use axum::{extract::State, Json};
use std::sync::Arc;

use crate::rest::model::HealthResponse;
use crate::AppContext;

/// Live snapshot: renderer presence plus the gate's current/max counts.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        renderer_available: ctx.orchestrator.renderer_available(),
        active_instances: ctx.orchestrator.active(),
        max_instances: ctx.orchestrator.capacity(),
    })
}
