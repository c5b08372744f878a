//! TSB Core - Backend logic for the batch transcription pipeline
//!
//! This crate contains all business logic with no CLI dependencies:
//! media discovery, audio normalization and chunk planning, the
//! transcription and summarization service clients, and the pipeline
//! orchestrator that ties them together per item.

pub mod aggregate;
pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod services;
pub mod transcode;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
