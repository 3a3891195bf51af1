use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use script_pipeline::models::{MAX_DURATION_SECONDS, MIN_DURATION_SECONDS};
use script_pipeline::providers::gemini::{API_KEY_ENV, DEFAULT_GEMINI_MODEL};
use script_pipeline::{
    ingest_files, render, run_submission, FormController, GeminiConfig, GeminiProvider,
    GenerationProvider, MockProvider, MockReply, ResultTab, ScriptGenerator,
    SourceFile, SubmitRejected, VideoStyle,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "scriptgen")]
#[command(about = "Turn a video idea into a script, characters and per-scene generation prompts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a script and scene prompts
    Generate {
        #[command(flatten)]
        form: FormArgs,

        /// Gemini API key
        #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
        api_key: Option<String>,

        /// Model identifier
        #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
        model: String,

        /// View to print (script, characters, scenes, json, all)
        #[arg(long, default_value = "script")]
        view: String,

        /// Write the full result as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Answer from a saved response file instead of calling the service
        #[arg(long)]
        mock_response: Option<PathBuf>,
    },

    /// Print the instruction text that would be sent, without calling the service
    Prompt {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Print the response schema declared to the model
    Schema,
}

#[derive(Args)]
struct FormArgs {
    /// Main idea for the video
    idea: String,

    /// Desired setting
    #[arg(long, default_value = "")]
    setting: String,

    /// Desired characters
    #[arg(long, default_value = "")]
    characters: String,

    /// Reference text typed inline
    #[arg(long, default_value = "")]
    documents: String,

    /// Read reference text from a file
    #[arg(long)]
    documents_file: Option<PathBuf>,

    /// Attach images, PDFs or .docx files (repeatable)
    #[arg(short, long = "file")]
    files: Vec<PathBuf>,

    /// Video style (Cinematic, 3D, Anime, Pixar, Disney)
    #[arg(long, default_value = "Cinematic")]
    style: VideoStyle,

    /// Target duration in seconds
    #[arg(short, long, default_value = "60")]
    duration: u32,

    /// Language for the hook, script, setting, actions and dialogue
    #[arg(long, default_value = script_pipeline::prompt::DEFAULT_NARRATIVE_LANGUAGE)]
    language: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            form,
            api_key,
            model,
            view,
            output,
            mock_response,
        } => generate_command(form, api_key, model, view, output, mock_response).await,
        Commands::Prompt { form } => prompt_command(form).await,
        Commands::Schema => schema_command(),
    }
}

async fn build_controller(form: FormArgs) -> Result<FormController> {
    if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&form.duration) {
        warn!(
            "Duration {}s is outside the usual {}-{}s range; sending it as is",
            form.duration, MIN_DURATION_SECONDS, MAX_DURATION_SECONDS
        );
    }

    let mut documents = form.documents;
    if let Some(path) = form.documents_file {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if !documents.is_empty() {
            documents.push_str("\n\n");
        }
        documents.push_str(&text);
    }

    let mut files = Vec::with_capacity(form.files.len());
    for path in &form.files {
        let file = SourceFile::load(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        info!("Attached {} ({})", file.name, file.content_type);
        files.push(file);
    }

    let mut controller = FormController::new();
    controller.inputs.idea = form.idea;
    controller.inputs.documents = documents;
    controller.inputs.user_setting = form.setting;
    controller.inputs.user_characters = form.characters;
    controller.inputs.video_style = form.style;
    controller.inputs.duration_seconds = form.duration;
    controller.inputs.add_files(files);
    controller.narrative_language = form.language;
    Ok(controller)
}

async fn generate_command(
    form: FormArgs,
    api_key: Option<String>,
    model: String,
    view: String,
    output: Option<PathBuf>,
    mock_response: Option<PathBuf>,
) -> Result<()> {
    let tabs = parse_view(&view)?;
    let mut controller = build_controller(form).await?;

    let provider: Arc<dyn GenerationProvider> = match mock_response {
        Some(path) => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Arc::new(MockProvider::new(vec![MockReply::Text(text)]))
        }
        None => {
            let mut config = GeminiConfig::from_env().with_model(model.clone());
            if let Some(key) = api_key {
                config = config.with_api_key(key);
            }
            Arc::new(GeminiProvider::new(config)?)
        }
    };
    let generator = ScriptGenerator::new(provider).with_model(model);

    let submission = match controller.submit() {
        Ok(submission) => submission,
        Err(SubmitRejected::Validation) | Err(SubmitRejected::InFlight) => {
            bail!(controller
                .error()
                .unwrap_or(script_pipeline::error::VALIDATION_MESSAGE)
                .to_string())
        }
    };
    let outcome = run_submission(&submission, &generator).await;
    controller.resolve(submission.id, outcome);

    if let Some(message) = controller.error() {
        bail!(message.to_string());
    }
    let result = controller
        .result()
        .ok_or_else(|| anyhow!("No result was produced"))?;

    if let Some(path) = output {
        std::fs::write(&path, result.to_pretty_json())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved result to {:?}", path);
    }

    let rendered: Vec<String> = tabs
        .into_iter()
        .map(|tab| render(result, tab).to_plain_text())
        .collect();
    println!("{}", rendered.join("\n\n"));
    Ok(())
}

async fn prompt_command(form: FormArgs) -> Result<()> {
    let controller = build_controller(form).await?;
    let inputs = &controller.inputs;
    if inputs.idea.trim().is_empty() {
        bail!(script_pipeline::error::VALIDATION_MESSAGE);
    }
    let ingested = ingest_files(&inputs.files)?;
    for part in &ingested.inline_parts {
        println!("[inline {} · {} base64 chars]", part.mime_type, part.data.len());
    }
    for name in &ingested.skipped {
        println!("[skipped {}]", name);
    }
    let prompt_inputs = inputs.prompt_inputs(&ingested, &controller.narrative_language);
    println!("{}", script_pipeline::compose_prompt(&prompt_inputs));
    Ok(())
}

fn schema_command() -> Result<()> {
    let schema = script_pipeline::response_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn parse_view(view: &str) -> Result<Vec<ResultTab>> {
    if view.trim().eq_ignore_ascii_case("all") {
        return Ok(ResultTab::ALL.to_vec());
    }
    ResultTab::parse(view)
        .map(|tab| vec![tab])
        .ok_or_else(|| anyhow!("Unknown view '{}'. Use script, characters, scenes, json or all", view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view() {
        assert_eq!(parse_view("all").unwrap().len(), 4);
        assert_eq!(parse_view("scenes").unwrap(), vec![ResultTab::Scenes]);
        assert!(parse_view("storyboard").is_err());
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "scriptgen",
            "generate",
            "Morning coffee ad",
            "--style",
            "3D",
            "--duration",
            "45",
            "--file",
            "a.png",
            "--file",
            "b.docx",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { form, model, .. } => {
                assert_eq!(form.idea, "Morning coffee ad");
                assert_eq!(form.style, VideoStyle::ThreeD);
                assert_eq!(form.duration, 45);
                assert_eq!(form.files.len(), 2);
                assert_eq!(model, DEFAULT_GEMINI_MODEL);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_style() {
        assert!(Cli::try_parse_from(["scriptgen", "prompt", "idea", "--style", "Noir"]).is_err());
    }

    #[tokio::test]
    async fn test_build_controller_reads_documents_file() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "From file").unwrap();
        let cli = Cli::try_parse_from([
            "scriptgen",
            "prompt",
            "idea",
            "--documents",
            "Typed",
            "--documents-file",
            notes.to_str().unwrap(),
        ])
        .unwrap();
        let Commands::Prompt { form } = cli.command else {
            panic!("expected prompt");
        };
        let controller = build_controller(form).await.unwrap();
        assert_eq!(controller.inputs.documents, "Typed\n\nFrom file");
    }
}
