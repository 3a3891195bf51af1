/// Video script and scene-prompt generation
///
/// Turns an idea, reference material and style parameters into a hook,
/// script, setting, character roster and per-scene video prompts using a
/// structured-output LLM call.
///
/// Flow: [`controller`] → [`ingest`] → [`prompt`] → [`service`] → [`render`]

pub mod controller;
pub mod docx;
pub mod error;
pub mod ingest;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod render;
pub mod service;

pub use controller::{run_submission, FormController, FormInputs, Phase, Submission, SubmitRejected};
pub use error::GenerateError;
pub use ingest::{
    ingest_files, Attachment, FileRoute, InlineAttachment, IngestedFiles, SourceFile,
};
pub use models::{Character, Scene, ScriptResult, VideoStyle};
pub use prompt::{compose_prompt, response_schema, PromptInputs};
pub use providers::{
    GeminiConfig, GeminiProvider, GenerationProvider, MockProvider, MockReply, ProviderError,
    ProviderKind,
};
pub use render::{render, ResultTab, ResultView};
pub use service::{GeneratorSettings, ScriptGenerator};
