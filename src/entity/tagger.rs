//! Linguistic tagger capability used by the entity extractor.
//!
//! The extractor only needs three things from a tagger: person mentions,
//! temporal expressions and numerals. Keeping the seam this narrow lets a
//! different tagger (another language, a statistical model) replace
//! [`HeuristicTagger`](crate::entity::heuristic::HeuristicTagger) without
//! touching extraction.

use serde::{Deserialize, Serialize};

/// Kind of temporal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    /// Clock time such as `3pm` or `10:30`.
    Time,
    /// Calendar date, weekday or relative day such as `Monday` or `tomorrow`.
    Date,
}

/// A temporal expression found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalExpression {
    pub text: String,
    pub kind: TemporalKind,
    /// Byte offset of the match in the source text.
    pub start: usize,
    pub end: usize,
}

/// Tagger capability interface.
pub trait LinguisticTagger: Send + Sync + std::fmt::Debug {
    /// Person names, in order of appearance.
    fn find_person_mentions(&self, text: &str) -> Vec<String>;

    /// Clock times and calendar expressions, in order of appearance.
    fn find_temporal_expressions(&self, text: &str) -> Vec<TemporalExpression>;

    /// Numerals (digits, ordinals, number words), in order of appearance.
    fn find_numerals(&self, text: &str) -> Vec<String>;

    /// Get the name of this tagger for debugging and logging.
    fn name(&self) -> &str;
}
