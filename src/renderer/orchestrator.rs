// SPDX-License-Identifier: MIT
//! Render orchestrator — the state machine gluing the gate, the invocation
//! builder, the process runner, and the output classifier together.
//!
//! Flow per request:
//!   try_acquire slot → build invocation (+ reserve temp artifact for
//!   screenshots) → execute with deadline → classify stdout/artifact.
//!
//! The slot and the artifact are RAII guards owned by the `render` future, so
//! every exit path — success, any error, deadline kill, caller cancellation —
//! releases the slot and deletes the temp file exactly once.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::renderer::classifier;
use crate::renderer::error::RendererError;
use crate::renderer::gate::ConcurrencyGate;
use crate::renderer::invocation::Invocation;
use crate::renderer::model::{OutputMode, RenderJob, RenderOutput};
use crate::renderer::runner::{render_deadline, ProcessRunner};

/// Orchestrates renderer invocations behind a bounded concurrency gate.
///
/// Owns its gate — two orchestrator instances never share a ceiling.
pub struct RenderOrchestrator {
    renderer_path: PathBuf,
    gate: ConcurrencyGate,
}

impl RenderOrchestrator {
    pub fn new(renderer_path: impl Into<PathBuf>, max_instances: usize) -> Self {
        Self {
            renderer_path: renderer_path.into(),
            gate: ConcurrencyGate::new(max_instances),
        }
    }

    /// Whether the configured renderer executable exists.
    pub fn renderer_available(&self) -> bool {
        self.renderer_path.is_file()
    }

    pub fn renderer_path(&self) -> &Path {
        &self.renderer_path
    }

    /// Renderer processes currently in flight.
    pub fn active(&self) -> usize {
        self.gate.active()
    }

    /// Configured concurrency ceiling.
    pub fn capacity(&self) -> usize {
        self.gate.capacity()
    }

    /// Run one render job to completion.
    ///
    /// Fails fast with [`RendererError::CapacityExceeded`] when the gate is
    /// saturated — never queues, never retries.
    pub async fn render(&self, job: &RenderJob) -> Result<RenderOutput, RendererError> {
        self.render_with_deadline(job, render_deadline(job.wait, job.post_wait))
            .await
    }

    /// [`render`](Self::render) with an explicit deadline instead of the
    /// computed one.
    pub async fn render_with_deadline(
        &self,
        job: &RenderJob,
        deadline: std::time::Duration,
    ) -> Result<RenderOutput, RendererError> {
        let Some(_slot) = self.gate.try_acquire() else {
            debug!(
                active = self.gate.active(),
                capacity = self.gate.capacity(),
                "render rejected: concurrency gate saturated"
            );
            return Err(RendererError::CapacityExceeded {
                limit: self.gate.capacity(),
            });
        };

        let render_id = short_render_id();

        // Reserve the screenshot artifact before spawning so the renderer has
        // a unique path to write into. Deleted by the guard's Drop.
        let artifact = match job.mode {
            OutputMode::Screenshot { .. } => Some(TempArtifact::reserve()?),
            _ => None,
        };

        let invocation = Invocation::build(
            &self.renderer_path,
            job,
            artifact.as_ref().map(TempArtifact::path),
        );

        debug!(
            render_id = %render_id,
            url = %job.url,
            mode = job.mode.as_str(),
            deadline_secs = deadline.as_secs(),
            "spawning renderer"
        );

        let outcome = ProcessRunner::execute(&invocation, deadline).await?;

        if outcome.timed_out {
            return Err(RendererError::Timeout);
        }

        if !outcome.success() {
            let stderr = String::from_utf8_lossy(&outcome.stderr);
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                format!(
                    "Renderer exited with code {}",
                    outcome.exit_code.unwrap_or(-1)
                )
            } else {
                stderr.to_string()
            };
            warn!(render_id = %render_id, exit_code = ?outcome.exit_code, "renderer failed");
            return Err(RendererError::NonZeroExit(message));
        }

        let result = match job.mode {
            OutputMode::Html => Ok(classifier::parse_html(&String::from_utf8_lossy(
                &outcome.stdout,
            ))),
            OutputMode::Network => Ok(classifier::parse_network(&String::from_utf8_lossy(
                &outcome.stdout,
            ))),
            OutputMode::Screenshot { .. } => match &artifact {
                Some(artifact) => classifier::read_screenshot(artifact.path()),
                None => Err(RendererError::OutputMissing),
            },
        };

        if result.is_ok() {
            info!(
                render_id = %render_id,
                url = %job.url,
                mode = job.mode.as_str(),
                duration_ms = outcome.duration.as_millis() as u64,
                "render complete"
            );
        }
        result
    }
}

fn short_render_id() -> String {
    format!("r-{}", &Uuid::new_v4().to_string()[..8])
}

/// Owned temp file for one in-flight screenshot invocation.
///
/// Reserved (created empty) before spawn; read after exit; removed on drop.
/// Cleanup must never fail the render, but suppressed failures are logged
/// rather than silently discarded. Absence on delete is not an error.
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    fn reserve() -> Result<Self, RendererError> {
        let file = tempfile::Builder::new()
            .prefix("renderd-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| {
                RendererError::SpawnFailure(format!("failed to create screenshot temp file: {e}"))
            })?;
        // Take over deletion from the tempfile guard so failures get logged.
        let (_, path) = file.keep().map_err(|e| {
            RendererError::SpawnFailure(format!("failed to persist screenshot temp file: {e}"))
        })?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), err = %e, "failed to remove screenshot temp file");
            }
        }
    }
}
