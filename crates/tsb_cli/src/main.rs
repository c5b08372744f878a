//! Command-line entry point for the batch transcription pipeline.
//!
//! Loads (or creates) the TOML config, wires the external
//! collaborators, and runs either the whole input directory or a
//! single explicitly named file. Per-item failures are tallied in the
//! run report; only startup failures produce a nonzero exit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use tsb_core::config::{load_system_prompt, ConfigManager, Settings};
use tsb_core::logging::{init_tracing, LogLevel};
use tsb_core::models::RunReport;
use tsb_core::orchestrator::{BatchRunner, Collaborators};
use tsb_core::services::{OpenAiSummarizer, OpenAiTranscriber};
use tsb_core::transcode::{ensure_ffmpeg, FfmpegTranscoder};

#[derive(Parser, Debug)]
#[command(
    name = "transcribe-batch",
    version,
    about = "Transcribe and summarize media files in batch"
)]
struct Cli {
    /// Process a single file instead of the configured input directory.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Transcription language hint (ISO 639-1, e.g. "en").
    /// Omit to let the service auto-detect.
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Transcription context prompt (names, jargon, spelling hints).
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Path to the TOML config file. Created with defaults if absent.
    #[arg(long, value_name = "PATH", default_value = "transcribe-batch.toml")]
    config: PathBuf,

    /// API key for the transcription and summarization services.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(LogLevel::Info);
    tracing::info!("transcribe-batch v{}", tsb_core::version());

    ensure_ffmpeg().context("ffmpeg and ffprobe must be installed and on PATH")?;

    let mut manager = ConfigManager::new(&cli.config);
    manager
        .load_or_create()
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    let settings = manager.settings_mut();
    apply_overrides(settings, &cli);

    if let Some(file) = &cli.file {
        redirect_to_single_file(settings, file);
    }

    manager
        .ensure_directories()
        .context("failed to create configured directories")?;

    let settings = manager.settings().clone();
    let system_prompt = load_system_prompt(settings.summary.prompt_path.as_deref().map(Path::new));

    let collaborators = Collaborators {
        transcoder: Arc::new(FfmpegTranscoder::new(
            settings.transcription.bitrate_kbps,
            settings.transcription.sample_rate_hz,
        )),
        speech_to_text: Arc::new(OpenAiTranscriber::new(
            &cli.api_key,
            &settings.api.base_url,
        )),
        summarizer: Arc::new(OpenAiSummarizer::new(
            &cli.api_key,
            &settings.api.base_url,
            &settings.summary.model,
        )),
        system_prompt,
    };

    let runner = BatchRunner::new(settings, collaborators);

    let report: RunReport = match &cli.file {
        Some(file) => runner
            .run_single(file)
            .with_context(|| format!("failed to process {}", file.display()))?,
        None => runner.run().context("failed to scan input directory")?,
    };

    println!("{}", report);
    Ok(())
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.language.is_some() {
        settings.transcription.language = cli.language.clone();
    }
    if cli.prompt.is_some() {
        settings.transcription.prompt = cli.prompt.clone();
    }
}

/// Point output, summary, and scratch paths next to a single input file.
///
/// The transcript and summary land beside the input; scratch goes in a
/// subdirectory so it can be cleared without touching anything else.
fn redirect_to_single_file(settings: &mut Settings, file: &Path) {
    let parent = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    settings.paths.output_dir = parent.to_string_lossy().to_string();
    settings.paths.summary_dir = parent.to_string_lossy().to_string();
    settings.paths.temp_dir = parent.join(".transcribe_scratch").to_string_lossy().to_string();
}
