/// Script generation service
///
/// Wraps a [`GenerationProvider`] with the fixed prompt template and
/// response schema, and turns the text payload into a [`ScriptResult`].
use crate::error::GenerateError;
use crate::ingest::InlineAttachment;
use crate::models::ScriptResult;
use crate::prompt::{self, PromptInputs, DEFAULT_NARRATIVE_LANGUAGE, RESPONSE_MIME_TYPE};
use crate::providers::{ContentRequest, GenerationProvider, Part, ProviderError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Persisted generator preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Model identifier sent with every request
    pub model: String,

    /// Language for the narrative fields of the result
    pub narrative_language: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: crate::providers::gemini::DEFAULT_GEMINI_MODEL.to_string(),
            narrative_language: DEFAULT_NARRATIVE_LANGUAGE.to_string(),
        }
    }
}

impl GeneratorSettings {
    /// Save settings to JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load settings from JSON
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[derive(Clone)]
pub struct ScriptGenerator {
    provider: Arc<dyn GenerationProvider>,
    model: String,
}

impl ScriptGenerator {
    /// Use the provider's own model name.
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        let model = provider.model_name().to_string();
        Self { provider, model }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn provider(&self) -> Arc<dyn GenerationProvider> {
        Arc::clone(&self.provider)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assemble the request: attachments in order, instruction text last.
    pub fn build_request(
        &self,
        inputs: &PromptInputs,
        attachments: &[InlineAttachment],
    ) -> ContentRequest {
        let mut parts: Vec<Part> = attachments
            .iter()
            .cloned()
            .map(Part::InlineData)
            .collect();
        parts.push(Part::Text(prompt::compose_prompt(inputs)));
        ContentRequest {
            model: self.model.clone(),
            parts,
            response_mime_type: RESPONSE_MIME_TYPE.to_string(),
            response_schema: prompt::response_schema(),
        }
    }

    /// One request, one response. No retry.
    pub async fn generate(
        &self,
        inputs: &PromptInputs,
        attachments: &[InlineAttachment],
    ) -> Result<ScriptResult, GenerateError> {
        let request = self.build_request(inputs, attachments);
        tracing::info!(
            target: "generation",
            "Requesting script from {} ({}) with {} attachment(s)",
            self.provider.kind(),
            self.model,
            attachments.len()
        );
        let response = self
            .provider
            .generate_content(&request)
            .await
            .map_err(|err: ProviderError| {
                tracing::error!(target: "generation", "Generation failed: {}", err);
                GenerateError::from(err)
            })?;
        tracing::info!(
            target: "generation",
            "Response received (tokens in: {:?}, out: {:?}, latency: {:?})",
            response.usage.input_tokens,
            response.usage.output_tokens,
            response.usage.latency
        );
        let text = response
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerateError::NoResponseText)?;
        let result: ScriptResult = serde_json::from_str(&text)?;
        for scene in result.overlong_scenes() {
            tracing::warn!(
                target: "generation",
                "Scene {} runs {}s, longer than the {}s limit",
                scene.scene_number,
                scene.duration,
                crate::models::MAX_SCENE_SECONDS
            );
        }
        Ok(result)
    }
}
