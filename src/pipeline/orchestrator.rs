//! The pipeline orchestrator.
//!
//! One call to [`NluPipeline::process`] runs:
//!
//! 1. cache lookup under `{prefix}:{lowercased, trimmed text}`
//! 2. on a miss, classification and extraction + enhancement concurrently
//! 3. cache write of the merged result
//!
//! The whole call is raced against a request deadline: the configured one
//! for [`NluPipeline::process`], or the caller's own for
//! [`NluPipeline::process_with_deadline`]. Any failure, including the
//! deadline, yields [`NluResult::degraded`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::analysis::normalizer::{NormalizedForm, TextNormalizer};
use crate::cache::{MemoryCache, ResultCache};
use crate::config::NluConfig;
use crate::entity::enhancer::ContextEnhancer;
use crate::entity::extractor::EntityExtractor;
use crate::entity::types::{EntityBag, SessionContext};
use crate::error::{NluError, Result};
use crate::intent::arbiter::HybridIntentClassifier;
use crate::intent::types::ClassificationResult;
use crate::pipeline::result::NluResult;

/// Natural-language understanding pipeline.
#[derive(Debug, Clone)]
pub struct NluPipeline {
    config: NluConfig,
    normalizer: TextNormalizer,
    classifier: Arc<HybridIntentClassifier>,
    extractor: Arc<EntityExtractor>,
    enhancer: ContextEnhancer,
    cache: Arc<dyn ResultCache>,
}

impl NluPipeline {
    /// Build a pipeline from configuration.
    ///
    /// Loads the learned model if one exists at `config.model_path` and uses
    /// an in-memory cache.
    pub fn from_config(config: NluConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = TextNormalizer::new()?;
        let classifier = HybridIntentClassifier::from_config(&config, normalizer.clone());

        info!(
            "NLP pipeline ready ({} classification)",
            if classifier.is_learned_available() {
                "hybrid"
            } else {
                "rule-based"
            }
        );

        Ok(Self {
            config,
            normalizer,
            classifier: Arc::new(classifier),
            extractor: Arc::new(EntityExtractor::default()),
            enhancer: ContextEnhancer::new(),
            cache: Arc::new(MemoryCache::new()),
        })
    }

    /// Rule-only pipeline with default configuration and no model lookup.
    pub fn rule_based() -> Result<Self> {
        let config = NluConfig::default();
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            classifier: Arc::new(HybridIntentClassifier::new(config.confidence_threshold)),
            extractor: Arc::new(EntityExtractor::default()),
            enhancer: ContextEnhancer::new(),
            cache: Arc::new(MemoryCache::new()),
            config,
        })
    }

    /// Replace the intent classifier.
    pub fn with_classifier(mut self, classifier: HybridIntentClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Replace the entity extractor.
    pub fn with_extractor(mut self, extractor: EntityExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Replace the result cache.
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the configuration. The classifier is not rebuilt.
    pub fn with_config(mut self, config: NluConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &NluConfig {
        &self.config
    }

    /// The arbitrating classifier.
    pub fn classifier(&self) -> &HybridIntentClassifier {
        &self.classifier
    }

    /// Normalized form of `text`.
    pub fn normalize(&self, text: &str) -> NormalizedForm {
        self.normalizer.normalize(text)
    }

    /// Arbitrated classification only.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classifier.classify(text)
    }

    /// Extraction followed by context enhancement.
    pub fn extract_entities(&self, text: &str, context: &SessionContext) -> EntityBag {
        self.enhancer.enhance(self.extractor.extract(text), context)
    }

    /// Cache key for `text`: case and surrounding whitespace are ignored.
    pub fn cache_key(&self, text: &str) -> String {
        format!("{}:{}", self.config.cache_prefix, text.trim().to_lowercase())
    }

    /// Understand one utterance under the configured request deadline.
    /// Never fails.
    pub async fn process(&self, text: &str, context: &SessionContext) -> NluResult {
        self.process_with_deadline(text, context, self.config.request_timeout())
            .await
    }

    /// Understand one utterance under a caller-supplied deadline.
    ///
    /// `None` waits for completion. When the deadline passes first, the
    /// in-flight work is abandoned and a degraded result is returned.
    pub async fn process_with_deadline(
        &self,
        text: &str,
        context: &SessionContext,
        deadline: Option<Duration>,
    ) -> NluResult {
        let started = Instant::now();

        let outcome = match deadline {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.run(text, context, started)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(NluError::timeout(format!(
                        "processing exceeded {} ms",
                        deadline.as_millis()
                    ))),
                }
            }
            None => self.run(text, context, started).await,
        };

        outcome.unwrap_or_else(|e| {
            error!("NLP processing error: {e}");
            NluResult::degraded(context.clone(), elapsed_ms(started), e.to_string())
        })
    }

    /// Process several utterances concurrently with an empty context.
    ///
    /// Results are returned in input order.
    pub async fn process_batch<S: AsRef<str>>(&self, messages: &[S]) -> Vec<NluResult> {
        let context = SessionContext::new();
        join_all(messages.iter().map(|m| self.process(m.as_ref(), &context))).await
    }

    async fn run(&self, text: &str, context: &SessionContext, started: Instant) -> Result<NluResult> {
        let key = self.cache_key(text);

        if let Some(cached) = self.lookup(&key).await {
            debug!("NLP result retrieved from cache: {key}");
            return Ok(cached);
        }

        let (classification, entities) =
            tokio::join!(self.classify_task(text), self.extract_task(text, context));
        let classification = classification?;
        let entities = entities?;

        let result = NluResult {
            intent: classification.intent,
            confidence: classification.confidence,
            entities: Some(entities),
            method: Some(classification.method),
            processing_time_ms: elapsed_ms(started),
            context: context.clone(),
            error: None,
        };

        self.store(&key, &result).await;

        info!(
            "NLP processing complete: intent={} confidence={:.2} method={} time={}ms",
            result.intent,
            result.confidence,
            classification.method,
            result.processing_time_ms
        );
        Ok(result)
    }

    async fn classify_task(&self, text: &str) -> Result<ClassificationResult> {
        let classifier = Arc::clone(&self.classifier);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || classifier.classify(&text))
            .await
            .map_err(|e| NluError::classification(format!("classification task failed: {e}")))
    }

    async fn extract_task(&self, text: &str, context: &SessionContext) -> Result<EntityBag> {
        let extractor = Arc::clone(&self.extractor);
        let enhancer = self.enhancer;
        let text = text.to_string();
        let context = context.clone();
        tokio::task::spawn_blocking(move || enhancer.enhance(extractor.extract(&text), &context))
            .await
            .map_err(|e| NluError::extraction(format!("extraction task failed: {e}")))
    }

    /// Cached result for `key`. Cache errors and unreadable entries are misses.
    async fn lookup(&self, key: &str) -> Option<NluResult> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read failed for {key}, treating as miss: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Ignoring unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    async fn store(&self, key: &str, result: &NluResult) {
        let json = match serde_json::to_string(result) {
            Ok(json) => json,
            Err(e) => {
                warn!("Cannot serialize result for caching: {e}");
                return;
            }
        };

        match self.cache.set(key, &json, self.config.cache_ttl_secs).await {
            Ok(true) => debug!("Cached NLP result under {key}"),
            Ok(false) => debug!("Cache declined {key}"),
            Err(e) => warn!("Cache write failed for {key}: {e}"),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
