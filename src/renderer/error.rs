// SPDX-License-Identifier: MIT
//! Renderer error taxonomy.

/// Errors returned by the render orchestrator.
///
/// `CapacityExceeded` is the only variant the REST layer maps to a distinct
/// status code (429); all others surface uniformly as renderer failures.
/// None of these are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// The concurrency gate is saturated — the caller should back off.
    #[error("Too many concurrent render requests. Limit is {limit}.")]
    CapacityExceeded { limit: usize },

    /// The renderer process could not be started, or its pipes failed after
    /// spawn. Usually a configuration problem (missing or unrunnable binary).
    #[error("Failed to start renderer process: {0}")]
    SpawnFailure(String),

    /// The renderer exited non-zero. The message carries its stderr text,
    /// or a generic "exited with code N" when stderr was empty.
    #[error("{0}")]
    NonZeroExit(String),

    /// The deadline expired (or the request was cancelled) and the process
    /// was forcibly killed.
    #[error("Renderer timed out")]
    Timeout,

    /// The renderer exited 0 but the expected artifact (screenshot file)
    /// was never produced.
    #[error("Screenshot file was not created")]
    OutputMissing,
}

impl RendererError {
    /// True for the one variant the HTTP boundary must report as a
    /// rate-limit condition rather than a renderer failure.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}
