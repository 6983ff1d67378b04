// SPDX-License-Identifier: MIT
//! Output classifier — turns renderer stdout (or the screenshot artifact)
//! into a [`RenderOutput`].
//!
//! The `CURRENT_URL:` marker line is a wire contract with the external
//! executable; it is parsed here and nowhere else so the rule stays
//! unit-testable without spawning a process.

use std::path::Path;

use tracing::warn;

use crate::renderer::error::RendererError;
use crate::renderer::model::RenderOutput;

const CURRENT_URL_MARKER: &str = "CURRENT_URL:";

/// Classify html-mode stdout.
///
/// A leading marker line yields the final (post-redirect) URL, with the rest
/// of the text as the page HTML; without the marker the whole text is HTML
/// and the URL is unset.
pub fn parse_html(stdout: &str) -> RenderOutput {
    if let Some(rest) = stdout.strip_prefix(CURRENT_URL_MARKER) {
        let (first_line, body) = match rest.split_once('\n') {
            Some((line, body)) => (line, body),
            None => (rest, ""),
        };
        RenderOutput::Html {
            html: body.to_string(),
            current_url: Some(first_line.trim().to_string()),
        }
    } else {
        RenderOutput::Html {
            html: stdout.to_string(),
            current_url: None,
        }
    }
}

/// Classify network-mode stdout: one captured request URL per line, trimmed,
/// blank lines dropped, original order preserved.
pub fn parse_network(stdout: &str) -> RenderOutput {
    let requests = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    RenderOutput::Network { requests }
}

/// Read the screenshot artifact produced by the renderer.
///
/// The temp file is reserved (created empty) before spawn, so "the renderer
/// never wrote it" shows up as either a missing file or a zero-length one —
/// both are classifier failures, never a silent empty success.
pub fn read_screenshot(path: &Path) -> Result<RenderOutput, RendererError> {
    let png = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RendererError::OutputMissing);
        }
        Err(e) => {
            warn!(path = %path.display(), err = %e, "screenshot artifact unreadable");
            return Err(RendererError::OutputMissing);
        }
    };
    if png.is_empty() {
        return Err(RendererError::OutputMissing);
    }
    Ok(RenderOutput::Screenshot { png })
}
