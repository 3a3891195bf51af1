use crate::generation_manager::{GenerationCommand, GenerationManager, GenerationResponse};
use eframe::egui;
use script_pipeline::providers::gemini::DEFAULT_GEMINI_MODEL;
use script_pipeline::{
    FormController, GeminiConfig, GeminiProvider, GenerateError, GenerationProvider,
    MockProvider, ProviderKind, ScriptGenerator, SubmitRejected,
};
use std::sync::Arc;

pub struct App {
    pub(crate) controller: FormController,
    pub(crate) provider: ProviderKind,
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) loading_files: bool,
    pub(crate) file_warnings: Vec<String>,
    manager: GenerationManager,
}

impl App {
    pub fn new() -> Self {
        let config = GeminiConfig::from_env();
        Self {
            controller: FormController::new(),
            provider: ProviderKind::Gemini,
            api_key: config.api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            loading_files: false,
            file_warnings: Vec::new(),
            manager: GenerationManager::new(),
        }
    }

    fn build_generator(&self) -> Result<ScriptGenerator, GenerateError> {
        let provider: Arc<dyn GenerationProvider> = match self.provider {
            ProviderKind::Gemini => {
                let config = GeminiConfig::from_env()
                    .with_api_key(self.api_key.clone())
                    .with_model(self.model.clone());
                Arc::new(GeminiProvider::new(config)?)
            }
            ProviderKind::Mock => Arc::new(MockProvider::default()),
        };
        let generator = ScriptGenerator::new(provider);
        Ok(match self.provider {
            ProviderKind::Gemini => generator.with_model(self.model.clone()),
            ProviderKind::Mock => generator,
        })
    }

    pub(crate) fn submit(&mut self) {
        let submission = match self.controller.submit() {
            Ok(submission) => submission,
            Err(SubmitRejected::Validation) => return,
            Err(SubmitRejected::InFlight) => {
                tracing::debug!("Submit ignored: a request is already running");
                return;
            }
        };
        let generator = match self.build_generator() {
            Ok(generator) => generator,
            Err(err) => {
                self.controller.resolve(submission.id, Err(err));
                return;
            }
        };
        let id = submission.id;
        if let Err(message) = self.manager.send_command(GenerationCommand::Generate {
            submission,
            generator,
        }) {
            self.controller.resolve(
                id,
                Err(GenerateError::Service(
                    script_pipeline::ProviderError::service(message),
                )),
            );
        }
    }

    pub(crate) fn pick_files(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images, PDF, Word", &["png", "jpg", "jpeg", "gif", "webp", "heic", "pdf", "docx"])
            .pick_files()
        else {
            return;
        };
        if paths.is_empty() {
            return;
        }
        self.file_warnings.clear();
        match self.manager.send_command(GenerationCommand::LoadFiles(paths)) {
            Ok(()) => self.loading_files = true,
            Err(message) => self.file_warnings.push(message),
        }
    }

    fn drain_responses(&mut self) {
        for response in self.manager.poll_responses() {
            match response {
                GenerationResponse::FilesLoaded { files, failures } => {
                    self.loading_files = false;
                    self.controller.inputs.add_files(files);
                    self.file_warnings.extend(failures.into_iter().map(|(path, err)| {
                        format!("Could not read {}: {}", path.display(), err)
                    }));
                }
                GenerationResponse::Finished { id, outcome } => {
                    self.controller.resolve(id, outcome);
                }
                GenerationResponse::Error { message } => {
                    tracing::error!("{}", message);
                    self.loading_files = false;
                    self.file_warnings.push(message);
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_responses();

        egui::SidePanel::left("form_panel")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    crate::app_form::render_form(ui, self);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::app_result::render_results(ui, self);
        });

        if self.controller.is_loading() || self.loading_files {
            ctx.request_repaint(); // Poll event channel until work completes
        }
    }
}
