// SPDX-License-Identifier: MIT
//! Process runner — spawns the renderer executable and enforces its deadline.
//!
//! The runner owns the child process for its whole lifetime:
//!   1. spawn with piped stdout/stderr (never through a shell),
//!   2. drain both pipes while waiting for exit, under a single deadline,
//!   3. on deadline expiry, kill the process and report a timed-out outcome.
//!
//! `kill_on_drop` backstops caller cancellation: if the future driving a
//! render is dropped (client disconnect), the child is killed by the runtime
//! rather than leaked.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::renderer::error::RendererError;
use crate::renderer::invocation::Invocation;
use crate::renderer::model::ProcessOutcome;

/// Deadline for one renderer process.
///
/// `max(wait + post_wait + 60, 120)` seconds: a fixed floor so short requests
/// still get a generous window for browser startup and teardown, plus a
/// margin proportional to the requested in-page wait time.
pub fn render_deadline(wait: u32, post_wait: Option<u32>) -> Duration {
    let secs = (u64::from(wait) + u64::from(post_wait.unwrap_or(0)) + 60).max(120);
    Duration::from_secs(secs)
}

/// Executes renderer invocations. Stateless; one call per process.
pub struct ProcessRunner;

impl ProcessRunner {
    /// Run `invocation` to completion or until `deadline` expires.
    ///
    /// Returns `Err(SpawnFailure)` only when the process could not be started
    /// (or its pipes failed afterwards). A deadline expiry is an `Ok` outcome
    /// with `timed_out` set — the orchestrator classifies it; it is never
    /// reported as a natural exit.
    pub async fn execute(
        invocation: &Invocation,
        deadline: Duration,
    ) -> Result<ProcessOutcome, RendererError> {
        let started = Instant::now();

        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RendererError::SpawnFailure(e.to_string()))?;

        let (Some(mut out_pipe), Some(mut err_pipe)) = (child.stdout.take(), child.stderr.take())
        else {
            return Err(RendererError::SpawnFailure(
                "renderer stdio pipes unavailable".to_string(),
            ));
        };

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Drain both pipes to EOF, then reap the exit status, all under one
        // deadline. The pipes must be drained before wait() or a renderer
        // producing more than the pipe buffer would deadlock.
        let waited = timeout(deadline, async {
            tokio::try_join!(
                out_pipe.read_to_end(&mut stdout),
                err_pipe.read_to_end(&mut stderr),
            )?;
            child.wait().await
        })
        .await;

        match waited {
            Err(_elapsed) => {
                // Deadline hit — kill. The process may already be gone; that
                // race is expected and not surfaced.
                if let Err(e) = child.kill().await {
                    debug!(err = %e, "kill after deadline failed (process already exited)");
                }
                warn!(
                    deadline_secs = deadline.as_secs(),
                    "renderer exceeded its deadline and was killed"
                );
                Ok(ProcessOutcome {
                    exit_code: None,
                    stdout,
                    stderr,
                    duration: started.elapsed(),
                    timed_out: true,
                })
            }
            Ok(Err(e)) => Err(RendererError::SpawnFailure(format!(
                "renderer process I/O failed: {e}"
            ))),
            Ok(Ok(status)) => Ok(ProcessOutcome {
                exit_code: status.code(),
                stdout,
                stderr,
                duration: started.elapsed(),
                timed_out: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_floor_is_two_minutes() {
        assert_eq!(render_deadline(0, None), Duration::from_secs(120));
        assert_eq!(render_deadline(5, None), Duration::from_secs(120));
        assert_eq!(render_deadline(60, None), Duration::from_secs(120));
    }

    #[test]
    fn deadline_grows_with_requested_waits() {
        assert_eq!(render_deadline(61, None), Duration::from_secs(121));
        assert_eq!(render_deadline(30, Some(40)), Duration::from_secs(130));
        assert_eq!(render_deadline(60, Some(120)), Duration::from_secs(240));
    }
}
