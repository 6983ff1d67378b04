use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_MAX_INSTANCES: usize = 4;
const DEFAULT_RENDERER_PATH: &str = "/opt/js-web-renderer/bin/fetch-rendered.py";
const DEFAULT_PROFILES_DIR: &str = "/opt/js-web-renderer/profiles";

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// REST server port (default: 9000).
    port: Option<u16>,
    /// Bind address for the REST server (default: "0.0.0.0").
    bind_address: Option<String>,
    /// Path to the js-web-renderer executable.
    renderer_path: Option<PathBuf>,
    /// Directory holding persisted browser profiles.
    profiles_dir: Option<PathBuf>,
    /// Maximum simultaneously running renderer processes (default: 4).
    max_instances: Option<usize>,
    /// Log level filter string, e.g. "debug", "info,renderd=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// API key required in the `X-API-Key` header. Omit to disable auth.
    api_key: Option<String>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bind address for the REST server (RENDERD_BIND env var, default: "0.0.0.0").
    pub bind_address: String,
    pub data_dir: PathBuf,
    /// Path to the js-web-renderer executable (RENDERD_RENDERER_PATH env var).
    pub renderer_path: PathBuf,
    /// Root directory for persisted browser profiles (RENDERD_PROFILES_DIR env var).
    pub profiles_dir: PathBuf,
    /// Hard cap on simultaneously running renderer processes.
    pub max_instances: usize,
    pub log: String,
    /// Log output format: "pretty" (default) | "json" (structured for Loki/Elasticsearch).
    pub log_format: String,
    /// API key required in the `X-API-Key` header on every rendering and
    /// profile endpoint. `None` disables authentication (trusted-network use).
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("RENDERD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let renderer_path = std::env::var("RENDERD_RENDERER_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or(toml.renderer_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RENDERER_PATH));

        let profiles_dir = std::env::var("RENDERD_PROFILES_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or(toml.profiles_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILES_DIR));

        let max_instances = std::env::var("RENDERD_MAX_INSTANCES")
            .ok()
            .and_then(|s| s.parse().ok())
            .or(toml.max_instances)
            .unwrap_or(DEFAULT_MAX_INSTANCES);

        let log_format = std::env::var("RENDERD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let api_key = std::env::var("RENDERD_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.api_key.filter(|s| !s.is_empty()));

        Self {
            port,
            bind_address,
            data_dir,
            renderer_path,
            profiles_dir,
            max_instances,
            log,
            log_format,
            api_key,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/renderd
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("renderd");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/renderd or ~/.local/share/renderd
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("renderd");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("renderd");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\renderd
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("renderd");
        }
    }
    // Fallback
    PathBuf::from(".renderd")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.max_instances, DEFAULT_MAX_INSTANCES);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.log_format, "pretty");
    }

    #[test]
    fn cli_overrides_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "port = 9100\nmax_instances = 8\n",
        )
        .unwrap();
        let cfg = ServerConfig::new(Some(9200), Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, 9200, "CLI value wins over TOML");
        assert_eq!(cfg.max_instances, 8, "TOML value wins over default");
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = [not valid").unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
