//! Learned-classifier artifacts: vocabulary index, label map and model.
//!
//! An artifact directory holds:
//!
//! - `word_index.json` - stemmed token → index (index 0 is reserved)
//! - `intent_labels.json` - label → class index
//! - `embedding_bag.json` - [`EmbeddingBagModel`] weights
//!
//! A directory without `embedding_bag.json` is a valid, expected state: the
//! pipeline then runs rule-based only. So is one holding only a TensorFlow.js
//! layers export (`model.json`), which this crate cannot execute.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use log::{info, warn};

use crate::error::{NluError, Result};
use crate::intent::model::{EmbeddingBagModel, SequenceModel};

/// File name of the embedding-bag weights.
pub const MODEL_FILE: &str = "embedding_bag.json";
/// File name of a TensorFlow.js layers export, recognized but not loaded.
pub const TFJS_MODEL_FILE: &str = "model.json";
/// File name of the vocabulary index.
pub const WORD_INDEX_FILE: &str = "word_index.json";
/// File name of the label map.
pub const INTENT_LABELS_FILE: &str = "intent_labels.json";

/// Immutable mapping from stemmed token to vocabulary index.
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    index: AHashMap<String, u32>,
}

impl VocabularyIndex {
    /// Index reserved for unknown tokens and padding.
    pub const UNKNOWN: u32 = 0;

    /// Build an index; no token may claim the reserved index 0.
    pub fn new(entries: HashMap<String, u32>) -> Result<Self> {
        if let Some((token, _)) = entries.iter().find(|(_, i)| **i == Self::UNKNOWN) {
            return Err(NluError::artifact(format!(
                "token {token:?} uses the reserved index 0"
            )));
        }
        Ok(Self {
            index: entries.into_iter().collect(),
        })
    }

    /// Index of `token`, or [`VocabularyIndex::UNKNOWN`].
    pub fn index_of(&self, token: &str) -> u32 {
        self.index.get(token).copied().unwrap_or(Self::UNKNOWN)
    }

    /// Largest index in use.
    pub fn max_index(&self) -> u32 {
        self.index.values().copied().max().unwrap_or(Self::UNKNOWN)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index has no tokens.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Immutable mapping between intent labels and class indices `0..n`.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Build a label map; indices must cover `0..n` exactly once.
    pub fn new(entries: HashMap<String, usize>) -> Result<Self> {
        let mut slots: Vec<Option<String>> = vec![None; entries.len()];
        for (label, index) in entries {
            let slot = slots.get_mut(index).ok_or_else(|| {
                NluError::artifact(format!("label {label:?} has out-of-range index {index}"))
            })?;
            if let Some(existing) = slot.replace(label.clone()) {
                return Err(NluError::artifact(format!(
                    "labels {existing:?} and {label:?} share index {index}"
                )));
            }
        }

        let labels = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| NluError::artifact("label indices are not contiguous"))?;
        Ok(Self { labels })
    }

    /// Label for a class index.
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Class index of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Labels in class-index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels are defined.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Everything the learned classifier needs, loaded once at startup.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub vocabulary: VocabularyIndex,
    pub labels: LabelMap,
    pub model: Arc<dyn SequenceModel>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("labels", &self.labels.labels())
            .field("model", &self.model.name())
            .finish()
    }
}

impl ModelArtifacts {
    /// Assemble artifacts, checking the model output matches the label map.
    pub fn new(
        vocabulary: VocabularyIndex,
        labels: LabelMap,
        model: Arc<dyn SequenceModel>,
    ) -> Result<Self> {
        if labels.is_empty() {
            return Err(NluError::artifact("label map is empty"));
        }
        if model.num_labels() != labels.len() {
            return Err(NluError::artifact(format!(
                "model predicts {} classes but {} labels are defined",
                model.num_labels(),
                labels.len()
            )));
        }
        Ok(Self {
            vocabulary,
            labels,
            model,
        })
    }

    /// Load artifacts from `dir`, or `None` when no model was trained there.
    pub fn load_optional<P: AsRef<Path>>(dir: P) -> Result<Option<Self>> {
        let dir = dir.as_ref();
        if !dir.join(MODEL_FILE).is_file() {
            if dir.join(TFJS_MODEL_FILE).is_file() {
                warn!(
                    "{} holds a TensorFlow.js model, which is not supported; expected {MODEL_FILE}. Using rule-based classification.",
                    dir.display()
                );
                return Ok(None);
            }
            warn!(
                "No pre-trained model found in {}. Using rule-based classification.",
                dir.display()
            );
            return Ok(None);
        }

        info!("Loading pre-trained intent classification model from {}", dir.display());
        let vocabulary = VocabularyIndex::new(read_json(&dir.join(WORD_INDEX_FILE))?)?;
        let labels = LabelMap::new(read_json(&dir.join(INTENT_LABELS_FILE))?)?;
        let model = EmbeddingBagModel::from_file(dir.join(MODEL_FILE))?;

        if vocabulary.max_index() as usize >= model.vocabulary_rows() {
            return Err(NluError::artifact(format!(
                "vocabulary index {} exceeds the model's {} embedding rows",
                vocabulary.max_index(),
                model.vocabulary_rows()
            )));
        }

        let artifacts = Self::new(vocabulary, labels, Arc::new(model))?;
        info!(
            "Model loaded with {} intent classes and {} vocabulary entries",
            artifacts.labels.len(),
            artifacts.vocabulary.len()
        );
        Ok(Some(artifacts))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        NluError::artifact(format!("cannot read {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&content)?)
}
