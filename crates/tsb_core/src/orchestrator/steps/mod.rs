//! Pipeline step implementations.

mod normalize;
mod persist;
mod plan;
mod summarize;
mod transcribe;

pub use normalize::NormalizeStep;
pub use persist::PersistStep;
pub use plan::PlanStep;
pub use summarize::SummarizeStep;
pub use transcribe::TranscribeStep;
