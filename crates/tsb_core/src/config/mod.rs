//! Configuration loading and management.
//!
//! Settings live in a TOML file with serde-defaulted sections, loaded
//! once at process entry and passed by reference into each component.
//! No pipeline component reads ambient environment state; credentials
//! are injected by the binary at startup.

mod manager;
mod prompt_doc;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use prompt_doc::load_system_prompt;
pub use settings::{
    ApiSettings, ChunkingSettings, PathSettings, Settings, SummarySettings, TranscriptionSettings,
};
