//! Summarization prompt document loader.
//!
//! The summarization collaborator takes its system instruction from an
//! external JSON document with a `system_prompt` field. Absence or
//! unreadability of the document degrades to an empty instruction
//! rather than aborting the run.

use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct PromptDocument {
    #[serde(default)]
    system_prompt: String,
}

/// Load the system instruction for summarization.
///
/// Returns an empty string when no path is configured, the file is
/// missing, or the JSON fails to parse; each case is logged.
pub fn load_system_prompt(path: Option<&Path>) -> String {
    let path = match path {
        Some(p) => p,
        None => {
            tracing::debug!("No prompt document configured, using empty instruction");
            return String::new();
        }
    };

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                "Failed to read prompt document {}: {}; using empty instruction",
                path.display(),
                e
            );
            return String::new();
        }
    };

    match serde_json::from_str::<PromptDocument>(&content) {
        Ok(doc) => doc.system_prompt,
        Err(e) => {
            tracing::warn!(
                "Failed to parse prompt document {}: {}; using empty instruction",
                path.display(),
                e
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_system_prompt_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.json");
        fs::write(&path, r#"{"system_prompt": "Summarize as HR minutes."}"#).unwrap();

        assert_eq!(
            load_system_prompt(Some(&path)),
            "Summarize as HR minutes."
        );
    }

    #[test]
    fn missing_field_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.json");
        fs::write(&path, r#"{"other": 1}"#).unwrap();

        assert_eq!(load_system_prompt(Some(&path)), "");
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        assert_eq!(load_system_prompt(Some(Path::new("/no/such/doc.json"))), "");
    }

    #[test]
    fn unconfigured_degrades_to_empty() {
        assert_eq!(load_system_prompt(None), "");
    }

    #[test]
    fn malformed_json_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.json");
        fs::write(&path, "not json at all").unwrap();

        assert_eq!(load_system_prompt(Some(&path)), "");
    }
}
