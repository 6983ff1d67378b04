// SPDX-License-Identifier: MIT
//! Health reporter — aggregates all [`SystemHealthCheck`] results into a
//! [`HealthReport`].
//!
//! The reporter runs all registered checks concurrently and derives an
//! overall status from the worst individual result.

use crate::health::checks::{CheckResult, CheckStatus, SystemHealthCheck};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Aggregated health report returned by [`HealthReporter::get_health_report`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthReport {
    /// Overall status: `"ok"`, `"degraded"`, or `"critical"`.
    pub status: String,
    /// Individual check results.
    pub checks: Vec<CheckResult>,
    /// ISO-8601 timestamp when this report was generated.
    pub timestamp: String,
    pub version: String,
}

impl HealthReport {
    /// Returns `true` if the overall status is `"ok"`.
    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}

/// Runs all registered health checks and aggregates the results.
pub struct HealthReporter {
    checks: Vec<Arc<dyn SystemHealthCheck>>,
}

impl HealthReporter {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Register a health check. Checks run concurrently when
    /// [`get_health_report`](Self::get_health_report) is called.
    pub fn with_check(mut self, check: impl SystemHealthCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Run all registered checks concurrently and return the aggregated
    /// [`HealthReport`]. Each check runs in its own task so a hung check
    /// cannot block the others; panicked checks report as critical.
    pub async fn get_health_report(&self) -> HealthReport {
        debug!("running {} health checks", self.checks.len());

        let handles: Vec<_> = self
            .checks
            .iter()
            .map(|check| {
                let check = Arc::clone(check);
                tokio::spawn(async move { check.run().await })
            })
            .collect();

        let mut results: Vec<CheckResult> = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    results.push(CheckResult {
                        name: "unknown".to_string(),
                        message: format!("health check panicked: {e}"),
                        status: CheckStatus::Critical,
                        checked_at: Utc::now().to_rfc3339(),
                    });
                }
            }
        }

        let overall = results
            .iter()
            .fold(CheckStatus::Ok, |acc, r| CheckStatus::worst(acc, r.status.clone()));

        HealthReport {
            status: overall.to_string(),
            checks: results,
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for HealthReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::checks::{ProfilesDirCheck, RendererBinaryCheck};
    use tempfile::TempDir;

    #[tokio::test]
    async fn report_is_critical_when_renderer_missing() {
        let dir = TempDir::new().unwrap();
        let report = HealthReporter::new()
            .with_check(RendererBinaryCheck::new("/nonexistent/renderer"))
            .with_check(ProfilesDirCheck::new(dir.path().join("profiles")))
            .get_health_report()
            .await;
        assert_eq!(report.status, "critical");
        assert!(!report.is_healthy());
        assert_eq!(report.checks.len(), 2);
    }

    #[tokio::test]
    async fn report_is_ok_when_all_checks_pass() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("fetch-rendered.py");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();
        let report = HealthReporter::new()
            .with_check(RendererBinaryCheck::new(&bin))
            .with_check(ProfilesDirCheck::new(dir.path().join("profiles")))
            .get_health_report()
            .await;
        assert!(report.is_healthy());
    }
}
