// SPDX-License-Identifier: MIT
//! Daemon health check system.
//!
//! Provides [`HealthReporter`] that aggregates multiple [`SystemHealthCheck`]
//! implementations into a single [`HealthReport`].
//!
//! # Included checks
//! - [`RendererBinaryCheck`] — verifies the renderer executable is present
//! - [`ProfilesDirCheck`] — verifies the profiles root is writable
//!
//! Used by the `doctor` subcommand; the live `/health` endpoint reads the
//! orchestrator's snapshot directly instead.

pub mod checks;
pub mod reporter;

// Convenience re-exports.
pub use checks::{CheckResult, CheckStatus, ProfilesDirCheck, RendererBinaryCheck, SystemHealthCheck};
pub use reporter::{HealthReport, HealthReporter};
