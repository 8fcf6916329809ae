//! Entity extraction and context enhancement.

pub mod enhancer;
pub mod extractor;
pub mod heuristic;
pub mod lexicon;
pub mod tagger;
pub mod types;
pub mod validation;

pub use enhancer::ContextEnhancer;
pub use extractor::EntityExtractor;
pub use heuristic::HeuristicTagger;
pub use tagger::{LinguisticTagger, TemporalExpression, TemporalKind};
pub use types::{EntityBag, EntityType, SessionContext};
pub use validation::{ConfidenceLevel, EntityValidation, validate_entities};
