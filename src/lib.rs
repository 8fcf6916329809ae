//! # campus-nlu
//!
//! Natural-language understanding for a university course assistant.
//!
//! ## Features
//!
//! - Text normalization (tokenizing, lowercasing, Porter stemming)
//! - Rule-based intent classification with a priority-ordered rule table
//! - Optional learned intent classifier loaded from model artifacts
//! - Arbitration between the two classifiers by confidence
//! - Entity extraction (course codes, instructors, times, days, semesters,
//!   departments, numbers) with session-context backfill
//! - A cached, deadline-bounded pipeline that never fails its caller
//!
//! ## Example
//!
//! ```
//! use campus_nlu::entity::SessionContext;
//! use campus_nlu::pipeline::NluPipeline;
//!
//! # async fn example() -> campus_nlu::error::Result<()> {
//! let pipeline = NluPipeline::rule_based()?;
//! let result = pipeline.process("What is CS101?", &SessionContext::new()).await;
//! assert_eq!(result.intent, "course_info");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod intent;
pub mod pipeline;

pub mod prelude {
    pub use crate::config::NluConfig;
    pub use crate::entity::{EntityBag, SessionContext};
    pub use crate::error::{NluError, Result};
    pub use crate::intent::{ClassificationMethod, ClassificationResult, HybridIntentClassifier};
    pub use crate::pipeline::{NluPipeline, NluResult};
}

// Version information
/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
