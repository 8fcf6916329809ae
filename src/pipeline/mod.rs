//! Request orchestration: cache, classification, extraction and fallback.

pub mod input;
pub mod orchestrator;
pub mod result;

pub use input::clamp_message;
pub use orchestrator::NluPipeline;
pub use result::NluResult;
