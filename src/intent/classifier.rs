//! Intent classifier trait definition.

use crate::error::Result;
use crate::intent::types::IntentPrediction;

/// Intent classifier trait.
///
/// Implemented by the rule table, the learned model wrapper, and any test
/// double that needs to script confidences for the arbiter.
pub trait IntentClassifier: Send + Sync {
    /// Predict the intent for a given utterance.
    fn predict(&self, text: &str) -> Result<IntentPrediction>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
