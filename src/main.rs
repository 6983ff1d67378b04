use anyhow::Result;
use clap::{Parser, Subcommand};
use renderd::{config::ServerConfig, rest, AppContext};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "renderd",
    about = "renderd — REST API daemon fronting the js-web-renderer executable",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// REST server port
    #[arg(long, env = "RENDERD_PORT")]
    port: Option<u16>,

    /// Data directory for config.toml
    #[arg(long, env = "RENDERD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RENDERD_LOG")]
    log: Option<String>,

    /// Bind address for the REST server (default: 0.0.0.0)
    #[arg(long, env = "RENDERD_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "RENDERD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server (default when no subcommand given).
    ///
    /// Examples:
    ///   renderd serve
    ///   renderd
    Serve,
    /// Check the runtime environment: renderer executable present,
    /// profiles directory writable. Exits non-zero on any failure.
    ///
    /// Examples:
    ///   renderd doctor
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── Logging setup ────────────────────────────────────────────────────────
    // Init once — must happen before any tracing calls.
    let log_level = args.log.as_deref().unwrap_or("info").to_owned();
    let log_format = std::env::var("RENDERD_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let _file_guard = setup_logging(&log_level, args.log_file.as_deref(), &log_format);

    match args.command {
        Some(Command::Doctor) => {
            let config = ServerConfig::new(None, args.data_dir, Some("error".to_string()), None);
            let exit_code = run_doctor(&config).await;
            std::process::exit(exit_code);
        }
        None | Some(Command::Serve) => {
            run_server(args.port, args.data_dir, args.log, args.bind_address).await?;
        }
    }

    Ok(())
}

async fn run_server(
    port: Option<u16>,
    data_dir: Option<std::path::PathBuf>,
    log: Option<String>,
    bind_address: Option<String>,
) -> Result<()> {
    let config = ServerConfig::new(port, data_dir, log, bind_address);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        renderer = %config.renderer_path.display(),
        profiles = %config.profiles_dir.display(),
        max_instances = config.max_instances,
        "starting renderd"
    );

    if config.api_key.is_none() {
        warn!("no API key configured — authentication is disabled (set RENDERD_API_KEY)");
    }

    let ctx = Arc::new(AppContext::new(config));

    if !ctx.orchestrator.renderer_available() {
        warn!(
            path = %ctx.orchestrator.renderer_path().display(),
            "renderer executable not found — render requests will fail until it is installed"
        );
    }

    rest::start_rest_server(ctx).await
}

async fn run_doctor(config: &ServerConfig) -> i32 {
    use renderd::health::{HealthReporter, ProfilesDirCheck, RendererBinaryCheck};

    let report = HealthReporter::new()
        .with_check(RendererBinaryCheck::new(&config.renderer_path))
        .with_check(ProfilesDirCheck::new(&config.profiles_dir))
        .get_health_report()
        .await;

    for check in &report.checks {
        println!("[{}] {}: {}", check.status, check.name, check.message);
    }
    println!("overall: {}", report.status);

    if report.is_healthy() {
        0
    } else {
        1
    }
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators like Loki/Elasticsearch).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("renderd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
