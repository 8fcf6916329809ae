//! Token filters applied after tokenization.
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stem::StemFilter`] - Reduces words to their stem form

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod stem;

pub use lowercase::LowercaseFilter;
pub use stem::StemFilter;
