//! Driving port for the content lab.

use async_trait::async_trait;
use serde::Serialize;

/// Outcome of a generation request.
///
/// Failures carry the operator-facing message rather than an error value so
/// the lab always has something to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ContentOutcome {
    Generated(String),
    Failed(String),
}

impl ContentOutcome {
    /// Text to display, whichever way the request went.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Failed(text) => text,
        }
    }
}

/// Domain use-case port for generating training content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentLabCommand: Send + Sync {
    /// Generate content of `content_type` for the operator's prompt.
    async fn generate(&self, content_type: &str, prompt: &str) -> ContentOutcome;
}
