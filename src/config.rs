//! Configuration for the NLU pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NluError, Result};

/// Configuration for classification, caching and request handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    /// Directory holding `embedding_bag.json`, `word_index.json` and `intent_labels.json`.
    pub model_path: PathBuf,
    /// Learned results at or above this confidence are accepted as-is.
    pub confidence_threshold: f64,
    /// Fixed input length of the learned model.
    pub max_sequence_length: usize,
    /// Expiry of cached pipeline results, in seconds.
    pub cache_ttl_secs: u64,
    /// Prefix prepended to every cache key.
    pub cache_prefix: String,
    /// Per-request deadline in milliseconds. `0` disables the deadline.
    pub request_timeout_ms: u64,
    /// Maximum accepted message length in characters at the input boundary.
    pub max_message_length: usize,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./nlp/models/intent_classifier"),
            confidence_threshold: 0.75,
            max_sequence_length: 50,
            cache_ttl_secs: 3600,
            cache_prefix: "nlp".to_string(),
            request_timeout_ms: 5000,
            max_message_length: 1000,
        }
    }
}

impl NluConfig {
    /// Build a configuration from defaults overridden by environment variables.
    ///
    /// Recognized variables: `NLP_MODEL_PATH`, `NLP_CONFIDENCE_THRESHOLD`,
    /// `NLP_MAX_SEQUENCE_LENGTH`, `NLP_CACHE_PREFIX`, `NLP_CACHE_TTL_SECS` and
    /// `NLP_REQUEST_TIMEOUT_MS`. Values that fail to parse keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NluConfig::from_env`] but reading from an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("NLP_MODEL_PATH").filter(|v| !v.is_empty()) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(threshold) = parse_var::<f64, _>(&lookup, "NLP_CONFIDENCE_THRESHOLD") {
            config.confidence_threshold = threshold;
        }
        if let Some(len) = parse_var::<usize, _>(&lookup, "NLP_MAX_SEQUENCE_LENGTH") {
            config.max_sequence_length = len;
        }
        if let Some(prefix) = lookup("NLP_CACHE_PREFIX").filter(|v| !v.is_empty()) {
            config.cache_prefix = prefix;
        }
        if let Some(ttl) = parse_var::<u64, _>(&lookup, "NLP_CACHE_TTL_SECS") {
            config.cache_ttl_secs = ttl;
        }
        if let Some(timeout) = parse_var::<u64, _>(&lookup, "NLP_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = timeout;
        }

        config
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NluConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(NluError::invalid_config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.max_sequence_length == 0 {
            return Err(NluError::invalid_config(
                "max_sequence_length must be greater than zero",
            ));
        }
        Ok(())
    }

    /// The request deadline, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = NluConfig::default();
        assert_eq!(config.confidence_threshold, 0.75);
        assert_eq!(config.max_sequence_length, 50);
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(5000)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides_and_fallbacks() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("NLP_MODEL_PATH", "/srv/models"),
            ("NLP_CONFIDENCE_THRESHOLD", "0.6"),
            ("NLP_MAX_SEQUENCE_LENGTH", "not-a-number"),
            ("NLP_REQUEST_TIMEOUT_MS", "0"),
        ]);
        let config = NluConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.model_path, PathBuf::from("/srv/models"));
        assert_eq!(config.confidence_threshold, 0.6);
        assert_eq!(config.max_sequence_length, 50);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = NluConfig {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NluError::InvalidConfig(_))));

        let config = NluConfig {
            max_sequence_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: NluConfig = serde_json::from_str(r#"{"confidence_threshold": 0.9}"#).unwrap();
        assert_eq!(config.confidence_threshold, 0.9);
        assert_eq!(config.cache_prefix, "nlp");
    }
}
