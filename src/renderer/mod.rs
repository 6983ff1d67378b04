// SPDX-License-Identifier: MIT
//! Renderer invocation orchestration.
//!
//! Everything between the REST surface and the external `js-web-renderer`
//! process lives here: argument assembly, the global concurrency gate,
//! process execution with a deadline, and output classification.

pub mod classifier;
pub mod error;
pub mod gate;
pub mod invocation;
pub mod model;
pub mod orchestrator;
pub mod runner;

// Convenience re-exports.
pub use error::RendererError;
pub use model::{OutputMode, ProcessOutcome, RenderJob, RenderOutput, TypeAction};
pub use orchestrator::RenderOrchestrator;
