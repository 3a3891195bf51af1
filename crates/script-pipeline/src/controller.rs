/// Form state and the submit / resolve protocol
///
/// The controller is the only writer of form and result state. Front ends
/// call [`FormController::submit`], run the returned [`Submission`] with
/// [`run_submission`], and hand the outcome back through
/// [`FormController::resolve`].
use crate::error::{GenerateError, VALIDATION_MESSAGE};
use crate::ingest::{self, IngestedFiles, SourceFile};
use crate::models::{ScriptResult, VideoStyle, DEFAULT_DURATION_SECONDS};
use crate::prompt::{PromptInputs, DEFAULT_NARRATIVE_LANGUAGE};
use crate::render::{self, ResultTab, ResultView};
use crate::service::ScriptGenerator;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything the user typed or attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormInputs {
    pub idea: String,
    pub documents: String,
    pub user_setting: String,
    pub user_characters: String,
    pub video_style: VideoStyle,
    pub duration_seconds: u32,
    pub files: Vec<SourceFile>,
}

impl Default for FormInputs {
    fn default() -> Self {
        Self {
            idea: String::new(),
            documents: String::new(),
            user_setting: String::new(),
            user_characters: String::new(),
            video_style: VideoStyle::default(),
            duration_seconds: DEFAULT_DURATION_SECONDS,
            files: Vec::new(),
        }
    }
}

impl FormInputs {
    pub fn add_files(&mut self, files: impl IntoIterator<Item = SourceFile>) {
        self.files.extend(files);
    }

    pub fn remove_file(&mut self, index: usize) -> Option<SourceFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Template inputs: typed documents followed by text extracted from files.
    pub fn prompt_inputs(
        &self,
        ingested: &IngestedFiles,
        narrative_language: &str,
    ) -> PromptInputs {
        PromptInputs {
            idea: self.idea.clone(),
            reference_text: format!("{}{}", self.documents, ingested.extracted_text),
            target_duration_seconds: self.duration_seconds,
            user_setting: self.user_setting.clone(),
            user_characters: self.user_characters.clone(),
            video_style: self.video_style,
            narrative_language: narrative_language.to_string(),
        }
    }
}

/// Snapshot of the inputs for one in-flight request.
#[derive(Clone, Debug)]
pub struct Submission {
    pub id: Uuid,
    pub inputs: FormInputs,
    pub narrative_language: String,
}

impl Submission {
    pub fn prompt_inputs(&self, ingested: &IngestedFiles) -> PromptInputs {
        self.inputs.prompt_inputs(ingested, &self.narrative_language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// The idea was blank; the validation message is now shown.
    Validation,
    /// A request is already running.
    InFlight,
}

#[derive(Debug)]
pub struct FormController {
    pub inputs: FormInputs,
    pub narrative_language: String,
    phase: Phase,
    error: Option<String>,
    result: Option<ScriptResult>,
    active_tab: ResultTab,
    in_flight: Option<Uuid>,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            inputs: FormInputs::default(),
            narrative_language: DEFAULT_NARRATIVE_LANGUAGE.to_string(),
            phase: Phase::Idle,
            error: None,
            result: None,
            active_tab: ResultTab::Script,
            in_flight: None,
            completed_at: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&ScriptResult> {
        self.result.as_ref()
    }

    pub fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    /// Start a submission. A blank idea only sets the validation message.
    pub fn submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.is_loading() {
            return Err(SubmitRejected::InFlight);
        }
        if self.inputs.idea.trim().is_empty() {
            self.error = Some(VALIDATION_MESSAGE.to_string());
            return Err(SubmitRejected::Validation);
        }
        let id = Uuid::new_v4();
        self.error = None;
        self.phase = Phase::Submitting;
        self.in_flight = Some(id);
        tracing::debug!(target: "controller", "Submission {} started", id);
        Ok(Submission {
            id,
            inputs: self.inputs.clone(),
            narrative_language: self.narrative_language.clone(),
        })
    }

    /// Apply the outcome of the in-flight submission. Returns `false` when
    /// `id` is not the submission currently running.
    pub fn resolve(&mut self, id: Uuid, outcome: Result<ScriptResult, GenerateError>) -> bool {
        if self.in_flight != Some(id) {
            tracing::warn!(target: "controller", "Ignoring outcome of stale submission {}", id);
            return false;
        }
        self.in_flight = None;
        self.completed_at = Some(Utc::now());
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.active_tab = ResultTab::Script;
                self.phase = Phase::Succeeded;
                tracing::debug!(target: "controller", "Submission {} succeeded", id);
            }
            Err(err) => {
                let message = err.user_message();
                tracing::error!(target: "controller", "Submission {} failed: {}", id, message);
                self.error = Some(message);
                self.phase = Phase::Failed;
            }
        }
        true
    }

    pub fn select_tab(&mut self, tab: ResultTab) {
        self.active_tab = tab;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Current result projected into the active tab.
    pub fn view(&self) -> Option<ResultView> {
        self.result
            .as_ref()
            .map(|result| render::render(result, self.active_tab))
    }
}

/// Ingest the submission's files, compose the prompt and call the service.
pub async fn run_submission(
    submission: &Submission,
    generator: &ScriptGenerator,
) -> Result<ScriptResult, GenerateError> {
    let ingested = ingest::ingest_files(&submission.inputs.files)?;
    if !ingested.skipped.is_empty() {
        tracing::info!(
            target: "controller",
            "Skipped {} unsupported file(s): {}",
            ingested.skipped.len(),
            ingested.skipped.join(", ")
        );
    }
    let prompt_inputs = submission.prompt_inputs(&ingested);
    generator.generate(&prompt_inputs, &ingested.inline_parts).await
}
