//! Intent classification: rule table, learned model and their arbiter.

pub mod arbiter;
pub mod artifacts;
pub mod classifier;
pub mod learned_classifier;
pub mod model;
pub mod rule_classifier;
pub mod types;

pub use arbiter::{HybridIntentClassifier, arbitrate};
pub use artifacts::{LabelMap, ModelArtifacts, VocabularyIndex};
pub use classifier::IntentClassifier;
pub use learned_classifier::LearnedIntentClassifier;
pub use model::{EmbeddingBagModel, FnSequenceModel, SequenceModel};
pub use rule_classifier::RuleBasedIntentClassifier;
pub use types::{ClassificationMethod, ClassificationResult, Intent, IntentPrediction, LabelScore};
