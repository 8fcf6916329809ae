//! Canonical form of an utterance shared by both classifiers and the cache.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stem::StemFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// Lowercased, trimmed, tokenized and stemmed representation of an utterance.
///
/// Never surfaced to end users; it feeds the classifiers and cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedForm {
    /// The text as received.
    pub original: String,
    /// Lowercased and whitespace-trimmed text.
    pub lowercased: String,
    /// Word tokens of `lowercased`.
    pub tokens: Vec<String>,
    /// Stemmed `tokens`, position for position.
    pub stemmed: Vec<String>,
    /// `stemmed` joined with single spaces.
    pub normalized: String,
}

impl NormalizedForm {
    /// Whether the utterance produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Produces [`NormalizedForm`]s with a word tokenizer, lowercasing and Porter stemming.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    words: PipelineAnalyzer,
    stem: Arc<StemFilter>,
}

impl TextNormalizer {
    /// Create a normalizer with the default word pattern.
    pub fn new() -> Result<Self> {
        let words = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("normalizer_words");

        Ok(Self {
            words,
            stem: Arc::new(StemFilter::new()),
        })
    }

    /// Normalize `text`. Total and deterministic: empty input gives an empty form.
    pub fn normalize(&self, text: &str) -> NormalizedForm {
        let lowercased = text.to_lowercase().trim().to_string();

        let (tokens, stemmed) = match self.analyze(&lowercased) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Normalization of {lowercased:?} produced no tokens: {e}");
                (Vec::new(), Vec::new())
            }
        };

        NormalizedForm {
            original: text.to_string(),
            normalized: stemmed.join(" "),
            lowercased,
            tokens,
            stemmed,
        }
    }

    fn analyze(&self, lowercased: &str) -> Result<(Vec<String>, Vec<String>)> {
        let words: Vec<_> = self.words.analyze(lowercased)?.collect();
        let tokens = words.iter().map(|t| t.text.clone()).collect();
        let stemmed = self
            .stem
            .filter(Box::new(words.into_iter()))?
            .map(|t| t.text)
            .collect();
        Ok((tokens, stemmed))
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Default word pattern should be valid")
    }
}
