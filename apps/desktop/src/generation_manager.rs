/// Generation Manager - Async bridge for file loading and script generation
///
/// Runs the async pipeline on a background thread and communicates with the
/// egui UI via channels.
use crossbeam_channel::{unbounded, Receiver, Sender};
use script_pipeline::{
    run_submission, GenerateError, ScriptGenerator, ScriptResult, SourceFile, Submission,
};
use std::path::PathBuf;
use std::thread;
use uuid::Uuid;

/// Commands sent from UI to the generation manager
pub enum GenerationCommand {
    /// Read picked files from disk, one after another
    LoadFiles(Vec<PathBuf>),

    /// Run one submission against the given generator
    Generate {
        submission: Submission,
        generator: ScriptGenerator,
    },

    /// Shutdown the manager
    Shutdown,
}

/// Responses sent from the generation manager to UI
pub enum GenerationResponse {
    /// Files read successfully, plus the ones that could not be read
    FilesLoaded {
        files: Vec<SourceFile>,
        failures: Vec<(PathBuf, String)>,
    },

    /// The submission finished, successfully or not
    Finished {
        id: Uuid,
        outcome: Result<ScriptResult, GenerateError>,
    },

    /// The background runtime could not start
    Error { message: String },
}

pub struct GenerationManager {
    command_tx: Sender<GenerationCommand>,
    response_rx: Receiver<GenerationResponse>,
}

impl GenerationManager {
    /// Create new generation manager and start background thread
    pub fn new() -> Self {
        let (command_tx, command_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();

        thread::spawn(move || {
            run_generation_thread(command_rx, response_tx);
        });

        Self {
            command_tx,
            response_rx,
        }
    }

    pub fn send_command(&self, cmd: GenerationCommand) -> Result<(), String> {
        self.command_tx
            .send(cmd)
            .map_err(|e| format!("Failed to send command: {}", e))
    }

    /// Poll for responses (call every frame from egui)
    pub fn poll_responses(&self) -> Vec<GenerationResponse> {
        self.response_rx.try_iter().collect()
    }
}

impl Drop for GenerationManager {
    fn drop(&mut self) {
        let _ = self.command_tx.send(GenerationCommand::Shutdown);
    }
}

fn run_generation_thread(
    command_rx: Receiver<GenerationCommand>,
    response_tx: Sender<GenerationResponse>,
) {
    // Create tokio runtime for async operations
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = response_tx.send(GenerationResponse::Error {
                message: format!("Failed to create async runtime: {}", e),
            });
            return;
        }
    };

    while let Ok(cmd) = command_rx.recv() {
        match cmd {
            GenerationCommand::LoadFiles(paths) => {
                let response_tx = response_tx.clone();
                rt.spawn(async move {
                    let mut files = Vec::with_capacity(paths.len());
                    let mut failures = Vec::new();
                    for path in paths {
                        match SourceFile::load(&path).await {
                            Ok(file) => files.push(file),
                            Err(err) => {
                                tracing::warn!("Could not read {}: {}", path.display(), err);
                                failures.push((path, err.to_string()));
                            }
                        }
                    }
                    let _ = response_tx.send(GenerationResponse::FilesLoaded { files, failures });
                });
            }

            GenerationCommand::Generate {
                submission,
                generator,
            } => {
                let response_tx = response_tx.clone();
                rt.spawn(async move {
                    let outcome = run_submission(&submission, &generator).await;
                    let _ = response_tx.send(GenerationResponse::Finished {
                        id: submission.id,
                        outcome,
                    });
                });
            }

            GenerationCommand::Shutdown => break,
        }
    }
}
