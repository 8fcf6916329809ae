//! Result cache collaborator.
//!
//! The pipeline stores serialized results under prefixed keys. A cache that
//! cannot be reached is treated as a miss by the caller and never fails a
//! request.

pub mod disabled;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use disabled::DisabledCache;
pub use memory::MemoryCache;

/// Key-value store with per-entry expiry.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use campus_nlu::cache::ResultCache;
/// use campus_nlu::error::{NluError, Result};
///
/// #[derive(Debug)]
/// struct Unreachable;
///
/// #[async_trait]
/// impl ResultCache for Unreachable {
///     async fn get(&self, _key: &str) -> Result<Option<String>> {
///         Err(NluError::cache("connection refused"))
///     }
///
///     async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<bool> {
///         Err(NluError::cache("connection refused"))
///     }
/// }
/// ```
#[async_trait]
pub trait ResultCache: Send + Sync + std::fmt::Debug {
    /// Value stored under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for `ttl_secs` seconds (0 keeps it until
    /// evicted). Returns whether the value was stored.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool>;
}
