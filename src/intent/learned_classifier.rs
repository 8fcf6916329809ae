//! Learned intent classifier backed by a [`SequenceModel`].

use log::debug;

use crate::analysis::normalizer::TextNormalizer;
use crate::error::{NluError, Result};
use crate::intent::artifacts::{ModelArtifacts, VocabularyIndex};
use crate::intent::classifier::IntentClassifier;
use crate::intent::types::{IntentPrediction, LabelScore};

/// Classifies utterances with a pre-trained model.
///
/// The utterance is normalized, each stemmed token mapped through the
/// vocabulary (unknown tokens → 0), and the sequence truncated or
/// zero-padded to `max_sequence_length` before inference.
#[derive(Debug, Clone)]
pub struct LearnedIntentClassifier {
    artifacts: ModelArtifacts,
    normalizer: TextNormalizer,
    max_sequence_length: usize,
}

impl LearnedIntentClassifier {
    /// Create a classifier over loaded artifacts.
    pub fn new(
        artifacts: ModelArtifacts,
        normalizer: TextNormalizer,
        max_sequence_length: usize,
    ) -> Self {
        Self {
            artifacts,
            normalizer,
            max_sequence_length,
        }
    }

    /// Artifacts this classifier was built from.
    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Fixed-length index sequence for `text`.
    pub fn text_to_sequence(&self, text: &str) -> Vec<u32> {
        let form = self.normalizer.normalize(text);
        let mut sequence: Vec<u32> = form
            .stemmed
            .iter()
            .take(self.max_sequence_length)
            .map(|token| self.artifacts.vocabulary.index_of(token))
            .collect();
        sequence.resize(self.max_sequence_length, VocabularyIndex::UNKNOWN);
        sequence
    }

    /// Run the model and return the arg-max label with the full distribution.
    pub fn classify_learned(&self, text: &str) -> Result<IntentPrediction> {
        let sequence = self.text_to_sequence(text);
        let probabilities = self.artifacts.model.predict(&sequence)?;

        if probabilities.len() != self.artifacts.labels.len() {
            return Err(NluError::classification(format!(
                "model returned {} probabilities for {} labels",
                probabilities.len(),
                self.artifacts.labels.len()
            )));
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(NluError::classification("model returned non-finite probabilities"));
        }

        // First strictly greater probability wins, starting from zero.
        let (best_index, best_probability) = probabilities
            .iter()
            .enumerate()
            .fold((0usize, 0.0f32), |best, (i, &p)| if p > best.1 { (i, p) } else { best });

        let intent = self
            .artifacts
            .labels
            .label_for(best_index)
            .ok_or_else(|| NluError::classification(format!("no label for class {best_index}")))?
            .to_string();

        let distribution = self
            .artifacts
            .labels
            .labels()
            .iter()
            .zip(&probabilities)
            .map(|(label, &p)| LabelScore {
                label: label.clone(),
                probability: f64::from(p),
            })
            .collect();

        debug!("Learned classifier predicted {intent} ({best_probability:.4})");
        Ok(IntentPrediction::new(intent, f64::from(best_probability)).with_distribution(distribution))
    }
}

impl IntentClassifier for LearnedIntentClassifier {
    fn predict(&self, text: &str) -> Result<IntentPrediction> {
        self.classify_learned(text)
    }

    fn name(&self) -> &str {
        self.artifacts.model.name()
    }
}
