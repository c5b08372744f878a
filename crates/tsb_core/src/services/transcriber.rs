//! Speech-to-text client and the bounded format-fallback policy.
//!
//! `OpenAiTranscriber` is the raw HTTP client for the transcription
//! endpoint. `TranscriptionClient` wraps any `SpeechToText` impl with
//! the per-chunk retry policy: when the service rejects a non-WAV chunk
//! as unreadable, the chunk is transcoded once to PCM WAV and the
//! request retried exactly once. The retry budget is enforced by a
//! loop, never recursion, so a service that keeps reporting format
//! errors cannot cause unbounded retries.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::models::AudioChunk;
use crate::transcode::Transcoder;

use super::{SpeechToText, TranscribeRequest, TranscriptionError};

/// Message fragments the service uses for bad-input format errors.
const FORMAT_ERROR_MARKERS: &[&str] = &["corrupted", "unsupported", "Invalid file format"];

/// Maximum number of format-fallback retries per chunk.
const FORMAT_RETRY_BUDGET: usize = 1;

/// Classify a service error body as a format error or not.
fn is_format_error(body: &str) -> bool {
    FORMAT_ERROR_MARKERS.iter().any(|m| body.contains(m))
}

/// Blocking client for an OpenAI-compatible transcription endpoint.
pub struct OpenAiTranscriber {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiTranscriber {
    /// Create a client for the given API base URL and credential.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// Treat empty or whitespace-only optional fields as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Guess the multipart MIME type from the file extension.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => "audio/wav",
        _ => "audio/mpeg",
    }
}

impl SpeechToText for OpenAiTranscriber {
    fn transcribe(
        &self,
        audio_path: &Path,
        request: &TranscribeRequest,
    ) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let bytes = fs::read(audio_path)?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        let file_part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(audio_path))
            .map_err(|e| TranscriptionError::Service(format!("mime: {}", e)))?;

        let mut form = Form::new()
            .text("model", request.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        match non_empty(request.language.as_deref()) {
            Some(lang) => {
                tracing::info!("Transcribing {} (model {}, language {})", file_name, request.model, lang);
                form = form.text("language", lang.to_string());
            }
            None => {
                tracing::info!(
                    "Transcribing {} (model {}, language auto-detect)",
                    file_name,
                    request.model
                );
            }
        }
        if let Some(prompt) = non_empty(request.prompt.as_deref()) {
            form = form.text("prompt", prompt.to_string());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| TranscriptionError::Service(format!("request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TranscriptionError::Service(format!("body: {}", e)))?;

        if status.is_success() {
            tracing::debug!("Transcription completed for {}", file_name);
            return Ok(body.trim().to_string());
        }

        if status == StatusCode::BAD_REQUEST && is_format_error(&body) {
            return Err(TranscriptionError::Format(body));
        }

        Err(TranscriptionError::Service(format!(
            "status {}: {}",
            status, body
        )))
    }
}

/// Per-chunk driver applying the bounded format-fallback policy.
pub struct TranscriptionClient<'a> {
    speech_to_text: &'a dyn SpeechToText,
    transcoder: &'a dyn Transcoder,
    request: TranscribeRequest,
}

impl<'a> TranscriptionClient<'a> {
    /// Create a client for one item's chunk sequence.
    pub fn new(
        speech_to_text: &'a dyn SpeechToText,
        transcoder: &'a dyn Transcoder,
        request: TranscribeRequest,
    ) -> Self {
        Self {
            speech_to_text,
            transcoder,
            request,
        }
    }

    /// Transcribe one chunk, retrying at most once on a format error.
    ///
    /// The fallback temp WAV is removed on every exit path.
    pub fn transcribe_chunk(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        let mut fallback: Option<PathBuf> = None;
        let result = self.transcribe_with_fallback(&chunk.path, &mut fallback);

        if let Some(wav) = fallback {
            if wav.exists() {
                if let Err(e) = fs::remove_file(&wav) {
                    tracing::warn!("Failed to remove fallback file {}: {}", wav.display(), e);
                }
            }
        }

        result
    }

    fn transcribe_with_fallback(
        &self,
        chunk_path: &Path,
        fallback: &mut Option<PathBuf>,
    ) -> Result<String, TranscriptionError> {
        let mut path = chunk_path.to_path_buf();

        for attempt in 0..=FORMAT_RETRY_BUDGET {
            match self.speech_to_text.transcribe(&path, &self.request) {
                Ok(text) => return Ok(text),
                Err(TranscriptionError::Format(msg))
                    if attempt < FORMAT_RETRY_BUDGET && !is_wav(&path) =>
                {
                    tracing::warn!(
                        "Service rejected {} as unreadable, retrying once as PCM WAV",
                        path.display()
                    );
                    let wav = path.with_extension("wav");
                    // Recorded before the transcode runs: a failed
                    // encode can still leave a partial file behind.
                    *fallback = Some(wav.clone());
                    self.transcoder.to_pcm_wav(&path, &wav).map_err(|e| {
                        TranscriptionError::Service(format!(
                            "fallback transcode failed after format error '{}': {}",
                            msg, e
                        ))
                    })?;
                    path = wav;
                }
                Err(e) => return Err(e),
            }
        }

        // The loop always returns within the budget; reaching this
        // point means a WAV chunk hit the format arm, which the guard
        // above excludes.
        Err(TranscriptionError::Service(
            "format-fallback retry budget exhausted".to_string(),
        ))
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}
