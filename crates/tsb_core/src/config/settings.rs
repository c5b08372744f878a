//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a serde default so a partial config file loads cleanly.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Transcription service settings.
    #[serde(default)]
    pub transcription: TranscriptionSettings,

    /// Chunk sizing limits.
    #[serde(default)]
    pub chunking: ChunkingSettings,

    /// Summarization settings.
    #[serde(default)]
    pub summary: SummarySettings,

    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiSettings,
}

/// Path configuration for input, output, summaries, and scratch space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder scanned for input media.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Folder for transcript files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Folder for summary files.
    #[serde(default = "default_summary_dir")]
    pub summary_dir: String,

    /// Scratch folder for temporary artifacts; cleared at end of run.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
}

fn default_input_dir() -> String {
    "input".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_summary_dir() -> String {
    "output/summaries".to_string()
}

fn default_temp_dir() -> String {
    "temp_processing".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            summary_dir: default_summary_dir(),
            temp_dir: default_temp_dir(),
        }
    }
}

/// Transcription service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Model identifier sent with each transcription request.
    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// Optional language hint (ISO-639). None means auto-detect.
    #[serde(default)]
    pub language: Option<String>,

    /// Optional domain prompt attached to each request.
    #[serde(default)]
    pub prompt: Option<String>,

    /// Target bitrate for normalized audio, in kbit/s.
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,

    /// Target sample rate for normalized audio, in Hz.
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: u32,
}

fn default_transcription_model() -> String {
    "gpt-4o-mini-transcribe".to_string()
}

fn default_bitrate_kbps() -> u32 {
    128
}

fn default_sample_rate_hz() -> u32 {
    16_000
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
            language: None,
            prompt: None,
            bitrate_kbps: default_bitrate_kbps(),
            sample_rate_hz: default_sample_rate_hz(),
        }
    }
}

/// Chunk sizing limits imposed by the transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingSettings {
    /// Hard payload size ceiling per request, in bytes.
    #[serde(default = "default_byte_ceiling")]
    pub byte_ceiling: u64,

    /// Safety margin below the byte-derived duration limit, in seconds.
    #[serde(default = "default_margin_secs")]
    pub size_margin_secs: u32,

    /// Hard audio duration ceiling per request, in seconds.
    #[serde(default = "default_duration_ceiling_secs")]
    pub duration_ceiling_secs: u32,

    /// Safety margin below the duration ceiling, in seconds.
    #[serde(default = "default_margin_secs")]
    pub duration_margin_secs: u32,

    /// Absolute per-chunk cap in seconds.
    #[serde(default = "default_absolute_cap_secs")]
    pub absolute_cap_secs: u32,
}

fn default_byte_ceiling() -> u64 {
    25 * 1024 * 1024
}

fn default_margin_secs() -> u32 {
    5
}

fn default_duration_ceiling_secs() -> u32 {
    1500
}

fn default_absolute_cap_secs() -> u32 {
    600
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            byte_ceiling: default_byte_ceiling(),
            size_margin_secs: default_margin_secs(),
            duration_ceiling_secs: default_duration_ceiling_secs(),
            duration_margin_secs: default_margin_secs(),
            absolute_cap_secs: default_absolute_cap_secs(),
        }
    }
}

/// Summarization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Model identifier for summarization requests.
    #[serde(default = "default_summary_model")]
    pub model: String,

    /// Path to the prompt document (JSON with a `system_prompt` field).
    /// None or an unreadable file degrades to an empty instruction.
    #[serde(default)]
    pub prompt_path: Option<String>,
}

fn default_summary_model() -> String {
    "o3-mini".to_string()
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: default_summary_model(),
            prompt_path: None,
        }
    }
}

/// API endpoint configuration.
///
/// Credentials are not stored here; the binary reads them from the
/// environment at startup and injects them into the service clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}
