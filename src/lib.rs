pub mod config;
pub mod health;
pub mod profiles;
pub mod renderer;
pub mod rest;

use std::sync::Arc;

use config::ServerConfig;
use profiles::ProfileStore;
use renderer::orchestrator::RenderOrchestrator;

/// Shared application state passed to every REST handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    /// The renderer invocation orchestrator — owns the concurrency gate.
    pub orchestrator: Arc<RenderOrchestrator>,
    /// Filesystem store for persisted browser profiles.
    pub profiles: Arc<ProfileStore>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire up the context from a loaded config.
    pub fn new(config: ServerConfig) -> Self {
        let orchestrator = Arc::new(RenderOrchestrator::new(
            &config.renderer_path,
            config.max_instances,
        ));
        let profiles = Arc::new(ProfileStore::new(&config.profiles_dir));
        Self {
            config: Arc::new(config),
            orchestrator,
            profiles,
            started_at: std::time::Instant::now(),
        }
    }
}
