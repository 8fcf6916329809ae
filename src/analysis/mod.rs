//! Text analysis for utterances.
//!
//! Tokenization, token filters and analyzers in the usual
//! tokenizer → filter chain shape. The [`normalizer::TextNormalizer`] built
//! on top of them produces the canonical form consumed by the classifiers
//! and by the result cache.

pub mod analyzer;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::{Analyzer, PipelineAnalyzer};
pub use normalizer::{NormalizedForm, TextNormalizer};
pub use token::{Token, TokenStream};
pub use token_filter::Filter;
pub use tokenizer::Tokenizer;
