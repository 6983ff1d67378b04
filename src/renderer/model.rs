// SPDX-License-Identifier: MIT
//! Renderer data model types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A selector + value pair typed into the page before click actions run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAction {
    /// CSS selector for the input element.
    pub selector: String,
    /// Value to type into the element.
    pub value: String,
}

/// Which of the renderer's output contracts a job requests.
///
/// Exactly one mode per invocation; the mode decides which payload variant
/// of [`RenderOutput`] is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Rendered page HTML (optionally preceded by a `CURRENT_URL:` marker line).
    Html,
    /// PNG screenshot written to a temp file by the renderer.
    Screenshot { width: u32, height: u32 },
    /// One captured request URL per stdout line.
    Network,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Screenshot { .. } => "screenshot",
            Self::Network => "network",
        }
    }
}

/// A fully resolved render job, as consumed by the orchestrator.
///
/// The REST layer validates field bounds and resolves the profile name to a
/// directory path before constructing this; the orchestrator never sees raw
/// caller input.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub url: String,
    /// Seconds to wait for page load (0–60).
    pub wait: u32,
    /// Resolved profile directory, if the caller named one.
    pub profile_dir: Option<PathBuf>,
    pub type_actions: Vec<TypeAction>,
    pub click_actions: Vec<String>,
    /// Seconds to wait after actions complete (0–120).
    pub post_wait: Option<u32>,
    /// JavaScript executed before page load.
    pub exec_js: Option<String>,
    /// JavaScript executed after actions.
    pub post_js: Option<String>,
    pub mode: OutputMode,
}

impl RenderJob {
    /// A bare HTML-mode job for `url` with the default load wait.
    pub fn html(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wait: 5,
            profile_dir: None,
            type_actions: Vec::new(),
            click_actions: Vec::new(),
            post_wait: None,
            exec_js: None,
            post_js: None,
            mode: OutputMode::Html,
        }
    }
}

/// What happened to one renderer process, as observed by the runner.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Exit code, or `None` if the process was killed.
    pub exit_code: Option<i32>,
    /// Captured stdout (complete for natural exits, partial after a kill).
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Wall-clock time from spawn to exit or kill.
    pub duration: Duration,
    /// True when the process was terminated at the deadline rather than
    /// exiting on its own.
    pub timed_out: bool,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Classified output of a successful render. One payload variant per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    Html {
        html: String,
        /// Final (post-redirect) URL, when the renderer reported one.
        current_url: Option<String>,
    },
    Screenshot {
        png: Vec<u8>,
    },
    Network {
        /// Captured request URLs in capture order.
        requests: Vec<String>,
    },
}
