//! Cache that never stores anything.

use async_trait::async_trait;

use crate::cache::ResultCache;
use crate::error::Result;

/// A [`ResultCache`] where every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

#[async_trait]
impl ResultCache for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<bool> {
        Ok(false)
    }
}
