use crate::docx::DocxError;
use crate::ingest::IngestError;
use crate::providers::ProviderError;
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter your idea.";
pub const NO_RESPONSE_MESSAGE: &str = "No response received from the AI.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while generating the script.";

/// Why a submission failed. Every variant ends only the current submission.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(String),
    #[error("Could not read text from {file}: {source}")]
    AttachmentExtraction {
        file: String,
        #[source]
        source: DocxError,
    },
    #[error("{}", NO_RESPONSE_MESSAGE)]
    NoResponseText,
    #[error("{0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Service(#[from] ProviderError),
}

impl GenerateError {
    /// Text shown in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::Service(err) if err.message().trim().is_empty() => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<IngestError> for GenerateError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Extraction { file, source } => {
                GenerateError::AttachmentExtraction { file, source }
            }
        }
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(err: serde_json::Error) -> Self {
        GenerateError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            GenerateError::Validation(VALIDATION_MESSAGE.to_string()).user_message(),
            VALIDATION_MESSAGE
        );
        assert_eq!(GenerateError::NoResponseText.user_message(), NO_RESPONSE_MESSAGE);
        assert_eq!(
            GenerateError::from(ProviderError::RateLimited("quota exceeded".to_string()))
                .user_message(),
            "quota exceeded"
        );
    }

    #[test]
    fn test_blank_service_message_falls_back() {
        let err = GenerateError::from(ProviderError::service("  "));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_parser_message_is_kept() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let expected = parse_err.to_string();
        let err = GenerateError::from(parse_err);
        assert_eq!(err.user_message(), expected);
    }
}
