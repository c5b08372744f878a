//! Low-level ffmpeg/ffprobe command wrappers.
//!
//! Each wrapper builds the argument list, logs the invocation, and maps
//! a non-zero exit to `ConversionError::ToolFailed` carrying stderr.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::models::NormalizedAudio;

use super::types::{ConversionError, ConversionResult, Transcoder};

/// Run a command, capturing output and mapping failure to errors.
fn run_tool(tool: &str, args: &[&OsStr]) -> ConversionResult<std::process::Output> {
    let mut cmd = Command::new(tool);
    cmd.args(args);

    tracing::debug!(
        "Running: {} {}",
        tool,
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = cmd.output().map_err(|e| ConversionError::ToolUnavailable {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConversionError::tool_failed(
            tool,
            output.status.code().unwrap_or(-1),
            stderr.trim().to_string(),
        ));
    }

    Ok(output)
}

fn run_ffmpeg(args: &[&OsStr]) -> ConversionResult<std::process::Output> {
    // -y: overwrite scratch outputs; -hide_banner keeps stderr useful on failure
    let mut full: Vec<&OsStr> = vec![OsStr::new("-y"), OsStr::new("-hide_banner")];
    full.extend_from_slice(args);
    run_tool("ffmpeg", &full)
}

/// Verify the ffmpeg and ffprobe tools are invocable.
///
/// Called once at startup; absence is an unrecoverable configuration
/// failure for the whole run.
pub fn ensure_ffmpeg() -> ConversionResult<()> {
    run_tool("ffmpeg", &[OsStr::new("-version")])?;
    run_tool("ffprobe", &[OsStr::new("-version")])?;
    Ok(())
}

/// Check that an output file exists and is non-empty.
fn verify_output(path: &Path) -> ConversionResult<u64> {
    match fs::metadata(path) {
        Ok(m) if m.len() > 0 => Ok(m.len()),
        _ => Err(ConversionError::OutputMissing(path.to_path_buf())),
    }
}

/// ffmpeg-backed transcoder with a fixed target audio format.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    /// Target bitrate for normalized audio, in kbit/s.
    bitrate_kbps: u32,
    /// Target sample rate in Hz.
    sample_rate_hz: u32,
}

impl FfmpegTranscoder {
    /// Create a transcoder targeting the given bitrate and sample rate.
    pub fn new(bitrate_kbps: u32, sample_rate_hz: u32) -> Self {
        Self {
            bitrate_kbps,
            sample_rate_hz,
        }
    }
}

impl Transcoder for FfmpegTranscoder {
    fn normalize(&self, input: &Path, output: &Path) -> ConversionResult<NormalizedAudio> {
        if !input.exists() {
            return Err(ConversionError::InputNotFound(input.to_path_buf()));
        }

        let bitrate = format!("{}k", self.bitrate_kbps);
        let sample_rate = self.sample_rate_hz.to_string();
        run_ffmpeg(&[
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-vn"), // drop video and other non-audio streams
            OsStr::new("-acodec"),
            OsStr::new("libmp3lame"),
            OsStr::new("-b:a"),
            OsStr::new(&bitrate),
            OsStr::new("-ac"),
            OsStr::new("1"),
            OsStr::new("-ar"),
            OsStr::new(&sample_rate),
            output.as_os_str(),
        ])?;

        let size_bytes = verify_output(output)?;

        tracing::info!(
            "Normalized {} -> {} ({:.2} MB, mono {} Hz {} kbps)",
            input.display(),
            output.display(),
            size_bytes as f64 / (1024.0 * 1024.0),
            self.sample_rate_hz,
            self.bitrate_kbps
        );

        Ok(NormalizedAudio {
            path: output.to_path_buf(),
            size_bytes,
        })
    }

    fn segment(&self, input: &Path, chunk_secs: u32, pattern: &Path) -> ConversionResult<()> {
        if !input.exists() {
            return Err(ConversionError::InputNotFound(input.to_path_buf()));
        }

        // Stream copy: the input is already in the target encoding, so
        // splitting only re-containers it.
        let secs = chunk_secs.to_string();
        run_ffmpeg(&[
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-f"),
            OsStr::new("segment"),
            OsStr::new("-segment_time"),
            OsStr::new(&secs),
            OsStr::new("-c"),
            OsStr::new("copy"),
            pattern.as_os_str(),
        ])?;

        tracing::debug!(
            "Segmented {} into {}s chunks ({})",
            input.display(),
            chunk_secs,
            pattern.display()
        );

        Ok(())
    }

    fn to_pcm_wav(&self, input: &Path, output: &Path) -> ConversionResult<()> {
        if !input.exists() {
            return Err(ConversionError::InputNotFound(input.to_path_buf()));
        }

        let sample_rate = self.sample_rate_hz.to_string();
        run_ffmpeg(&[
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-vn"),
            OsStr::new("-ac"),
            OsStr::new("1"),
            OsStr::new("-ar"),
            OsStr::new(&sample_rate),
            OsStr::new("-c:a"),
            OsStr::new("pcm_s16le"),
            output.as_os_str(),
        ])?;

        verify_output(output)?;
        Ok(())
    }

    fn probe_duration(&self, input: &Path) -> ConversionResult<f64> {
        if !input.exists() {
            return Err(ConversionError::InputNotFound(input.to_path_buf()));
        }

        let output = run_tool(
            "ffprobe",
            &[
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-show_entries"),
                OsStr::new("format=duration"),
                OsStr::new("-of"),
                OsStr::new("default=noprint_wrappers=1:nokey=1"),
                input.as_os_str(),
            ],
        )?;

        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse::<f64>()
            .map_err(|e| ConversionError::ParseError {
                tool: "ffprobe".to_string(),
                message: format!("duration '{}': {}", text.trim(), e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // These tests exercise the guard paths that never reach ffmpeg, so
    // they run without the tool installed.

    #[test]
    fn normalize_rejects_missing_input() {
        let transcoder = FfmpegTranscoder::new(128, 16000);
        let err = transcoder
            .normalize(Path::new("/no/such/file.mp4"), Path::new("/tmp/out.mp3"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::InputNotFound(_)));
    }

    #[test]
    fn segment_rejects_missing_input() {
        let transcoder = FfmpegTranscoder::new(128, 16000);
        let err = transcoder
            .segment(
                Path::new("/no/such/file.mp3"),
                600,
                &PathBuf::from("/tmp/x_%03d.mp3"),
            )
            .unwrap_err();
        assert!(matches!(err, ConversionError::InputNotFound(_)));
    }

    #[test]
    fn probe_rejects_missing_input() {
        let transcoder = FfmpegTranscoder::new(128, 16000);
        let err = transcoder
            .probe_duration(Path::new("/no/such/file.mp3"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::InputNotFound(_)));
    }
}
