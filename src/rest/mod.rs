// rest/mod.rs — Public REST API server.
//
// Axum HTTP server fronting the render orchestrator and the profile store.
//
// Endpoints:
//   GET    /health             (no auth)
//   POST   /render
//   POST   /screenshot
//   POST   /network
//   GET    /profiles
//   POST   /profiles
//   GET    /profiles/{name}
//   DELETE /profiles/{name}

pub mod auth;
pub mod model;
pub mod routes;

use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let protected = Router::new()
        // Rendering
        .route("/render", post(routes::render::render_page))
        .route("/screenshot", post(routes::render::take_screenshot))
        .route("/network", post(routes::render::capture_network))
        // Profiles
        .route(
            "/profiles",
            get(routes::profiles::list_profiles).post(routes::profiles::create_profile),
        )
        .route(
            "/profiles/{name}",
            get(routes::profiles::get_profile).delete(routes::profiles::delete_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::require_api_key,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health))
        .merge(protected)
        .with_state(ctx)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(err = %e, "failed to install ctrl-c handler");
        return;
    }
    info!("shutdown signal received — draining in-flight renders");
}
