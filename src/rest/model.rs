//! REST wire schemas and their field-bound validation.

use serde::{Deserialize, Serialize};

use crate::renderer::model::TypeAction;

const MAX_WAIT_SECS: u32 = 60;
const MAX_POST_WAIT_SECS: u32 = 120;
const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 320..=3840;
const HEIGHT_RANGE: std::ops::RangeInclusive<u32> = 240..=2160;

fn default_wait() -> u32 {
    5
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    900
}

/// Body of `POST /render` and `POST /network`, and the base of
/// `POST /screenshot`.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    /// URL to render.
    pub url: String,
    /// Seconds to wait for page load (0–60, default 5).
    #[serde(default = "default_wait")]
    pub wait: u32,
    /// Profile name for session persistence.
    pub profile: Option<String>,
    /// Type actions to perform, in order.
    #[serde(default)]
    pub type_actions: Vec<TypeAction>,
    /// CSS selectors to click, in order.
    #[serde(default)]
    pub click_actions: Vec<String>,
    /// Seconds to wait after actions (0–120).
    pub post_wait: Option<u32>,
    /// JavaScript to execute before page load.
    pub exec_js: Option<String>,
    /// JavaScript to execute after actions.
    pub post_js: Option<String>,
}

impl RenderRequest {
    /// Check field bounds. Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("url must not be empty".to_string());
        }
        if self.wait > MAX_WAIT_SECS {
            return Err(format!("wait must be between 0 and {MAX_WAIT_SECS}"));
        }
        if let Some(post_wait) = self.post_wait {
            if post_wait > MAX_POST_WAIT_SECS {
                return Err(format!(
                    "post_wait must be between 0 and {MAX_POST_WAIT_SECS}"
                ));
            }
        }
        Ok(())
    }
}

/// Body of `POST /screenshot`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotRequest {
    #[serde(flatten)]
    pub base: RenderRequest,
    /// Viewport width in pixels (320–3840, default 1280).
    #[serde(default = "default_width")]
    pub width: u32,
    /// Viewport height in pixels (240–2160, default 900).
    #[serde(default = "default_height")]
    pub height: u32,
}

impl ScreenshotRequest {
    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if !WIDTH_RANGE.contains(&self.width) {
            return Err(format!(
                "width must be between {} and {}",
                WIDTH_RANGE.start(),
                WIDTH_RANGE.end()
            ));
        }
        if !HEIGHT_RANGE.contains(&self.height) {
            return Err(format!(
                "height must be between {} and {}",
                HEIGHT_RANGE.start(),
                HEIGHT_RANGE.end()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub success: bool,
    pub html: Option<String>,
    pub current_url: Option<String>,
    pub error: Option<String>,
}

impl RenderResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            html: None,
            current_url: None,
            error: Some(message.into()),
        }
    }
}

/// One captured network request.
#[derive(Debug, Serialize)]
pub struct NetworkEntry {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub success: bool,
    pub requests: Option<Vec<NetworkEntry>>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileCreateRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileCreateResponse {
    pub success: bool,
    pub name: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileInfoResponse {
    pub name: String,
    pub path: String,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub renderer_available: bool,
    pub active_instances: usize,
    pub max_instances: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_omitted() {
        let req: RenderRequest = serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(req.wait, 5);
        assert!(req.type_actions.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn wait_out_of_bounds_is_rejected() {
        let req: RenderRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "wait": 61}"#).unwrap();
        assert!(req.validate().unwrap_err().contains("wait"));
    }

    #[test]
    fn post_wait_out_of_bounds_is_rejected() {
        let req: RenderRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "post_wait": 121}"#).unwrap();
        assert!(req.validate().unwrap_err().contains("post_wait"));
    }

    #[test]
    fn screenshot_flattens_base_fields_and_bounds_viewport() {
        let req: ScreenshotRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "wait": 3, "width": 800, "height": 600}"#,
        )
        .unwrap();
        assert_eq!(req.base.wait, 3);
        assert!(req.validate().is_ok());

        let req: ScreenshotRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "width": 100}"#).unwrap();
        assert!(req.validate().unwrap_err().contains("width"));

        let req: ScreenshotRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "height": 9999}"#).unwrap();
        assert!(req.validate().unwrap_err().contains("height"));
    }
}
