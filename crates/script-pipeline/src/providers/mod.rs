/// Generation providers
///
/// A provider performs one structured `generateContent`-style call:
/// - Gemini REST API
/// - Mock (scripted replies, offline runs and tests)
pub mod gemini;
pub mod mock;

use crate::ingest::InlineAttachment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use mock::{MockProvider, MockReply};

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    RateLimited(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    InvalidResponse(String),
    #[error("{0}")]
    Service(String),
}

impl ProviderError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ProviderError::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ProviderError::Transport(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        ProviderError::InvalidResponse(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        ProviderError::Service(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            ProviderError::Configuration(msg)
            | ProviderError::Authentication(msg)
            | ProviderError::RateLimited(msg)
            | ProviderError::Transport(msg)
            | ProviderError::InvalidResponse(msg)
            | ProviderError::Service(msg) => msg,
        }
    }
}

/// One segment of the request payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
    InlineData(InlineAttachment),
    Text(String),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::InlineData(_) => None,
        }
    }
}

/// A single structured-output request.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRequest {
    pub model: String,
    /// Inline attachments first, instruction text last.
    pub parts: Vec<Part>,
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl ContentRequest {
    pub fn instruction_text(&self) -> Option<&str> {
        self.parts.iter().rev().find_map(Part::as_text)
    }

    pub fn inline_parts(&self) -> impl Iterator<Item = &InlineAttachment> {
        self.parts.iter().filter_map(|part| match part {
            Part::InlineData(data) => Some(data),
            Part::Text(_) => None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageTelemetry {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub latency: Option<Duration>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentResponse {
    /// Text payload; `None` when the service sent no text.
    pub text: Option<String>,
    pub usage: UsageTelemetry,
}

/// Structured content generation backend
#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model_name(&self) -> &str;

    /// Issue exactly one request and await its response.
    async fn generate_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
        assert_eq!(ProviderKind::Mock.to_string(), "mock");
    }

    #[test]
    fn test_error_displays_bare_message() {
        let err = ProviderError::RateLimited("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.message(), "quota exceeded");
    }

    #[test]
    fn test_instruction_text_is_last_text_part() {
        let request = ContentRequest {
            model: "m".to_string(),
            parts: vec![
                Part::InlineData(InlineAttachment {
                    mime_type: "image/png".to_string(),
                    data: "AA==".to_string(),
                }),
                Part::Text("do it".to_string()),
            ],
            response_mime_type: "application/json".to_string(),
            response_schema: Value::Null,
        };
        assert_eq!(request.instruction_text(), Some("do it"));
        assert_eq!(request.inline_parts().count(), 1);
    }
}
