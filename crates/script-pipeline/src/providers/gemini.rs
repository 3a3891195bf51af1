/// Google Gemini `generateContent` provider
use super::{
    ContentRequest, ContentResponse, GenerationProvider, Part, ProviderError, ProviderKind,
    UsageTelemetry,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3.1-pro-preview";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_BASE_ENV: &str = "GEMINI_API_BASE";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Read the credential (and optional endpoint override) from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.api_key = key;
        }
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                config.api_base = base;
            }
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn validate(&self) -> Result<(), ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::configuration(format!(
                "Gemini API key is required (set {API_KEY_ENV})."
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ProviderError::configuration("Gemini model name is required."));
        }
        Ok(())
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim().trim_end_matches('/'),
            model.trim()
        )
    }
}

pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentResponse, ProviderError> {
        let payload = build_payload(request);
        let start = Instant::now();
        let response = self
            .client
            .post(self.config.endpoint(&request.model))
            .header("x-goog-api-key", self.config.api_key.trim())
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|err| ProviderError::transport(format!("Gemini request failed: {err}")))?;
        let status = response.status();
        let body = response.text().await.map_err(|err| {
            ProviderError::transport(format!("Read Gemini response failed: {err}"))
        })?;
        if !status.is_success() {
            return Err(error_from_status(status.as_u16(), &body));
        }
        let mut parsed = parse_response(&body)?;
        parsed.usage.latency = Some(start.elapsed());
        Ok(parsed)
    }
}

/// REST body for a single-turn request with a declared response schema.
pub fn build_payload(request: &ContentRequest) -> Value {
    let parts: Vec<Value> = request
        .parts
        .iter()
        .map(|part| match part {
            Part::InlineData(data) => json!({
                "inlineData": {
                    "mimeType": data.mime_type,
                    "data": data.data,
                }
            }),
            Part::Text(text) => json!({ "text": text }),
        })
        .collect();
    json!({
        "contents": [{
            "role": "user",
            "parts": parts,
        }],
        "generationConfig": {
            "responseMimeType": request.response_mime_type,
            "responseSchema": request.response_schema,
        }
    })
}

/// Extract the text payload of the first candidate.
pub fn parse_response(body: &str) -> Result<ContentResponse, ProviderError> {
    let parsed: GeminiResponse = serde_json::from_str(body).map_err(|err| {
        ProviderError::invalid_response(format!("Invalid Gemini response JSON: {err}"))
    })?;
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.is_empty());
    let usage = parsed
        .usage_metadata
        .map(|usage| UsageTelemetry {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
            latency: None,
        })
        .unwrap_or_default();
    Ok(ContentResponse { text, usage })
}

/// Map an unsuccessful HTTP response onto a provider error, keeping the
/// service's own message when it sent one.
pub fn error_from_status(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| format!("Gemini API error: HTTP {status}"));
    match status {
        401 | 403 => ProviderError::Authentication(message),
        429 => ProviderError::RateLimited(message),
        _ => ProviderError::Service(message),
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(default, rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(default, rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
    #[serde(default, rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: Option<String>,
}
