//! Sequence models behind the learned intent classifier.
//!
//! A [`SequenceModel`] maps a fixed-length sequence of vocabulary indices to
//! a probability vector over intent classes. [`EmbeddingBagModel`] is the
//! bundled implementation read from `embedding_bag.json`; [`FnSequenceModel`]
//! adapts any closure, which is how other inference backends plug in.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NluError, Result};

/// A trained classifier callable as a pure function `sequence -> probabilities`.
pub trait SequenceModel: Send + Sync {
    /// Probability of each class for `sequence`. Must sum to ~1.0.
    fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>>;

    /// Number of classes in the output vector.
    fn num_labels(&self) -> usize;

    /// Get the name of this model for debugging and logging.
    fn name(&self) -> &str;
}

/// Fully connected layer, `weights` laid out as `[output][input]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    fn input_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn output_dim(&self) -> usize {
        self.weights.len()
    }

    fn validate(&self, name: &str, input_dim: usize) -> Result<()> {
        if self.weights.is_empty() {
            return Err(NluError::artifact(format!("{name} layer has no units")));
        }
        if self.bias.len() != self.output_dim() {
            return Err(NluError::artifact(format!(
                "{name} layer has {} units but {} biases",
                self.output_dim(),
                self.bias.len()
            )));
        }
        if self.weights.iter().any(|row| row.len() != input_dim) {
            return Err(NluError::artifact(format!(
                "{name} layer expects input dimension {input_dim}"
            )));
        }
        Ok(())
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias)
            .collect()
    }
}

/// Serialized form of [`EmbeddingBagModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingBagWeights {
    /// One row per vocabulary index; row 0 is padding/unknown.
    pub embeddings: Vec<Vec<f32>>,
    pub hidden: DenseLayer,
    pub output: DenseLayer,
}

/// Embedding lookup, mean pooling over non-padding positions, one ReLU
/// hidden layer and a softmax output layer.
pub struct EmbeddingBagModel {
    weights: EmbeddingBagWeights,
    embedding_dim: usize,
}

impl fmt::Debug for EmbeddingBagModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingBagModel")
            .field("vocabulary_rows", &self.weights.embeddings.len())
            .field("embedding_dim", &self.embedding_dim)
            .field("hidden_units", &self.weights.hidden.output_dim())
            .field("num_labels", &self.weights.output.output_dim())
            .finish()
    }
}

impl EmbeddingBagModel {
    /// Build a model, checking that every layer shape lines up.
    pub fn new(weights: EmbeddingBagWeights) -> Result<Self> {
        let embedding_dim = weights.embeddings.first().map_or(0, Vec::len);
        if embedding_dim == 0 {
            return Err(NluError::artifact("embedding matrix is empty"));
        }
        if weights.embeddings.iter().any(|row| row.len() != embedding_dim) {
            return Err(NluError::artifact("embedding rows differ in length"));
        }
        weights.hidden.validate("hidden", embedding_dim)?;
        weights
            .output
            .validate("output", weights.hidden.output_dim())?;

        Ok(Self {
            weights,
            embedding_dim,
        })
    }

    /// Read the weights from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let weights: EmbeddingBagWeights = serde_json::from_str(&content)?;
        Self::new(weights)
    }

    /// Number of embedding rows, i.e. the largest usable index plus one.
    pub fn vocabulary_rows(&self) -> usize {
        self.weights.embeddings.len()
    }

    fn pool(&self, sequence: &[u32]) -> Result<Vec<f32>> {
        let mut pooled = vec![0.0f32; self.embedding_dim];
        let mut count = 0usize;

        for &index in sequence.iter().filter(|&&i| i != 0) {
            let row = self.weights.embeddings.get(index as usize).ok_or_else(|| {
                NluError::classification(format!(
                    "token index {index} outside embedding matrix of {} rows",
                    self.weights.embeddings.len()
                ))
            })?;
            for (acc, value) in pooled.iter_mut().zip(row) {
                *acc += value;
            }
            count += 1;
        }

        if count > 0 {
            for value in &mut pooled {
                *value /= count as f32;
            }
        }
        Ok(pooled)
    }
}

impl SequenceModel for EmbeddingBagModel {
    fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>> {
        let pooled = self.pool(sequence)?;
        let hidden: Vec<f32> = self
            .weights
            .hidden
            .forward(&pooled)
            .into_iter()
            .map(|x| x.max(0.0))
            .collect();
        Ok(softmax(&self.weights.output.forward(&hidden)))
    }

    fn num_labels(&self) -> usize {
        self.weights.output.output_dim()
    }

    fn name(&self) -> &str {
        "embedding_bag"
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}

/// Adapts a closure into a [`SequenceModel`].
///
/// ```
/// use campus_nlu::intent::model::{FnSequenceModel, SequenceModel};
///
/// let model = FnSequenceModel::new(2, |_seq: &[u32]| Ok(vec![0.2, 0.8]));
/// assert_eq!(model.predict(&[1, 0, 0]).unwrap(), vec![0.2, 0.8]);
/// ```
pub struct FnSequenceModel<F> {
    predict_fn: F,
    num_labels: usize,
}

impl<F> FnSequenceModel<F>
where
    F: Fn(&[u32]) -> anyhow::Result<Vec<f32>> + Send + Sync,
{
    /// Wrap `predict_fn`, which must return `num_labels` probabilities.
    pub fn new(num_labels: usize, predict_fn: F) -> Self {
        Self {
            predict_fn,
            num_labels,
        }
    }
}

impl<F> SequenceModel for FnSequenceModel<F>
where
    F: Fn(&[u32]) -> anyhow::Result<Vec<f32>> + Send + Sync,
{
    fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>> {
        Ok((self.predict_fn)(sequence)?)
    }

    fn num_labels(&self) -> usize {
        self.num_labels
    }

    fn name(&self) -> &str {
        "fn"
    }
}
