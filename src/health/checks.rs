// SPDX-License-Identifier: MIT
//! Individual health check implementations.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Severity level reported by a health check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The subsystem is operating normally.
    Ok,
    /// The subsystem is functional but degraded.
    Degraded,
    /// The subsystem is unavailable or critically broken.
    Critical,
}

impl CheckStatus {
    /// Returns the worst (highest-severity) of two statuses.
    pub fn worst(a: CheckStatus, b: CheckStatus) -> CheckStatus {
        match (&a, &b) {
            (CheckStatus::Critical, _) | (_, CheckStatus::Critical) => CheckStatus::Critical,
            (CheckStatus::Degraded, _) | (_, CheckStatus::Degraded) => CheckStatus::Degraded,
            _ => CheckStatus::Ok,
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "ok"),
            CheckStatus::Degraded => write!(f, "degraded"),
            CheckStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Result of running a single health check.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckResult {
    /// Machine-readable name of this check (e.g., `"renderer"`, `"profiles"`).
    pub name: String,
    /// Human-readable message describing the result.
    pub message: String,
    pub status: CheckStatus,
    /// ISO-8601 timestamp when the check was run.
    pub checked_at: String,
}

impl CheckResult {
    fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status: CheckStatus::Ok,
            checked_at: Utc::now().to_rfc3339(),
        }
    }

    fn critical(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status: CheckStatus::Critical,
            checked_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Async health check trait.
#[async_trait]
pub trait SystemHealthCheck: Send + Sync {
    /// Run the check and return a result.
    async fn run(&self) -> CheckResult;
}

// ─── Renderer binary check ────────────────────────────────────────────────────

/// Checks that the configured renderer executable exists.
pub struct RendererBinaryCheck {
    path: PathBuf,
}

impl RendererBinaryCheck {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SystemHealthCheck for RendererBinaryCheck {
    async fn run(&self) -> CheckResult {
        let path = self.path.clone();
        let exists = tokio::task::spawn_blocking(move || path.is_file())
            .await
            .unwrap_or(false);

        if exists {
            CheckResult::ok(
                "renderer",
                format!("renderer executable found: {}", self.path.display()),
            )
        } else {
            CheckResult::critical(
                "renderer",
                format!(
                    "renderer executable missing: {} — set RENDERD_RENDERER_PATH",
                    self.path.display()
                ),
            )
        }
    }
}

// ─── Profiles dir check ───────────────────────────────────────────────────────

/// Checks that the profiles root exists (or can be created) and is writable.
pub struct ProfilesDirCheck {
    root: PathBuf,
}

impl ProfilesDirCheck {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn is_writable(path: &Path) -> bool {
        // Attempt to create a temporary file in the directory.
        let probe = path.join(".health_probe");
        match std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&probe)
        {
            Ok(_) => {
                let _ = std::fs::remove_file(&probe);
                true
            }
            Err(_) => false,
        }
    }
}

#[async_trait]
impl SystemHealthCheck for ProfilesDirCheck {
    async fn run(&self) -> CheckResult {
        let root = self.root.clone();
        // Run the blocking FS operations on a thread pool thread.
        let result = tokio::task::spawn_blocking(move || {
            if let Err(e) = std::fs::create_dir_all(&root) {
                return Err(format!("profiles dir cannot be created: {e}"));
            }
            if !Self::is_writable(&root) {
                return Err(format!("profiles dir is not writable: {}", root.display()));
            }
            Ok(root)
        })
        .await;

        match result {
            Ok(Ok(p)) => CheckResult::ok("profiles", format!("profiles dir writable: {}", p.display())),
            Ok(Err(msg)) => CheckResult::critical("profiles", msg),
            Err(e) => CheckResult::critical("profiles", format!("spawn_blocking error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn renderer_check_critical_when_missing() {
        let check = RendererBinaryCheck::new("/nonexistent/fetch-rendered.py");
        let result = check.run().await;
        assert_eq!(result.status, CheckStatus::Critical);
    }

    #[tokio::test]
    async fn renderer_check_ok_when_present() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("fetch-rendered.py");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();
        let result = RendererBinaryCheck::new(&bin).run().await;
        assert_eq!(result.status, CheckStatus::Ok);
    }

    #[tokio::test]
    async fn profiles_check_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("profiles");
        let result = ProfilesDirCheck::new(&root).run().await;
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(root.is_dir());
    }

    #[test]
    fn worst_prefers_critical() {
        assert_eq!(
            CheckStatus::worst(CheckStatus::Ok, CheckStatus::Critical),
            CheckStatus::Critical
        );
        assert_eq!(
            CheckStatus::worst(CheckStatus::Degraded, CheckStatus::Ok),
            CheckStatus::Degraded
        );
    }
}
