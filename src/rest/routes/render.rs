// rest/routes/render.rs — Rendering REST routes.
//
// /render and /network report renderer failures as `success: false` bodies;
// /screenshot (a binary endpoint) reports them as HTTP 500. A saturated
// concurrency gate is the one condition with its own status code: 429.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::renderer::model::{OutputMode, RenderJob, RenderOutput};
use crate::renderer::RendererError;
use crate::rest::model::{
    NetworkEntry, NetworkResponse, RenderRequest, RenderResponse, ScreenshotRequest,
};
use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

fn unprocessable(message: String) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": message })),
    )
}

fn rate_limited(err: &RendererError) -> ApiError {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "detail": err.to_string() })),
    )
}

/// Resolve the wire request into an orchestrator job.
fn build_job(ctx: &AppContext, req: &RenderRequest, mode: OutputMode) -> Result<RenderJob, ApiError> {
    let profile_dir = match &req.profile {
        Some(name) => Some(
            ctx.profiles
                .resolve(name)
                .map_err(|e| unprocessable(e.to_string()))?,
        ),
        None => None,
    };
    Ok(RenderJob {
        url: req.url.clone(),
        wait: req.wait,
        profile_dir,
        type_actions: req.type_actions.clone(),
        click_actions: req.click_actions.clone(),
        post_wait: req.post_wait,
        exec_js: req.exec_js.clone(),
        post_js: req.post_js.clone(),
        mode,
    })
}

/// `POST /render` — render a page and return its HTML.
pub async fn render_page(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, ApiError> {
    req.validate().map_err(unprocessable)?;
    let job = build_job(&ctx, &req, OutputMode::Html)?;

    match ctx.orchestrator.render(&job).await {
        Ok(RenderOutput::Html { html, current_url }) => Ok(Json(RenderResponse {
            success: true,
            html: Some(html),
            current_url,
            error: None,
        })),
        Ok(_) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "renderer produced unexpected output" })),
        )),
        Err(e) if e.is_capacity() => Err(rate_limited(&e)),
        Err(e) => Ok(Json(RenderResponse::failure(e.to_string()))),
    }
}

/// `POST /screenshot` — render a page and return a PNG screenshot.
pub async fn take_screenshot(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<ScreenshotRequest>,
) -> Result<Response, ApiError> {
    req.validate().map_err(unprocessable)?;
    let mode = OutputMode::Screenshot {
        width: req.width,
        height: req.height,
    };
    let job = build_job(&ctx, &req.base, mode)?;

    match ctx.orchestrator.render(&job).await {
        Ok(RenderOutput::Screenshot { png }) => {
            Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
        }
        Ok(_) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "renderer produced unexpected output" })),
        )),
        Err(e) if e.is_capacity() => Err(rate_limited(&e)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": e.to_string() })),
        )),
    }
}

/// `POST /network` — render a page and return the captured request URLs.
pub async fn capture_network(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<NetworkResponse>, ApiError> {
    req.validate().map_err(unprocessable)?;
    let job = build_job(&ctx, &req, OutputMode::Network)?;

    match ctx.orchestrator.render(&job).await {
        Ok(RenderOutput::Network { requests }) => Ok(Json(NetworkResponse {
            success: true,
            requests: Some(requests.into_iter().map(|url| NetworkEntry { url }).collect()),
            error: None,
        })),
        Ok(_) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "renderer produced unexpected output" })),
        )),
        Err(e) if e.is_capacity() => Err(rate_limited(&e)),
        Err(e) => Ok(Json(NetworkResponse {
            success: false,
            requests: None,
            error: Some(e.to_string()),
        })),
    }
}
