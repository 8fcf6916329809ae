//! Arbitration between the learned and rule-based classifiers.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::analysis::normalizer::TextNormalizer;
use crate::config::NluConfig;
use crate::error::{NluError, Result};
use crate::intent::artifacts::ModelArtifacts;
use crate::intent::classifier::IntentClassifier;
use crate::intent::learned_classifier::LearnedIntentClassifier;
use crate::intent::rule_classifier::RuleBasedIntentClassifier;
use crate::intent::types::{ClassificationMethod, ClassificationResult, IntentPrediction};

/// Combine a learned prediction with the rule table.
///
/// - no learned prediction: the rule result, tagged `rule-based`
/// - learned confidence at or above `threshold`: the learned result, tagged `learned`
/// - otherwise the rules are consulted; a strictly more confident rule
///   result wins as `rule-based`, else the learned result is kept as `hybrid`
///
/// `rules` is only evaluated when needed.
pub fn arbitrate<F>(
    learned: Option<IntentPrediction>,
    threshold: f64,
    rules: F,
) -> ClassificationResult
where
    F: FnOnce() -> IntentPrediction,
{
    let Some(learned) = learned else {
        return ClassificationResult::from_prediction(rules(), ClassificationMethod::RuleBased);
    };

    if learned.confidence >= threshold {
        return ClassificationResult::from_prediction(learned, ClassificationMethod::Learned);
    }

    let rule_based = rules();
    if rule_based.confidence > learned.confidence {
        ClassificationResult::from_prediction(rule_based, ClassificationMethod::RuleBased)
    } else {
        ClassificationResult::from_prediction(learned, ClassificationMethod::Hybrid)
    }
}

/// Intent classifier that prefers a learned model and falls back to rules.
///
/// The learned model is optional. Its absence is decided once at
/// construction; a failing prediction is logged and the rules answer.
#[derive(Clone)]
pub struct HybridIntentClassifier {
    rules: RuleBasedIntentClassifier,
    learned: Option<Arc<dyn IntentClassifier>>,
    threshold: f64,
}

impl std::fmt::Debug for HybridIntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridIntentClassifier")
            .field("learned", &self.learned.as_ref().map(|c| c.name().to_string()))
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl HybridIntentClassifier {
    /// A rule-only classifier.
    pub fn new(threshold: f64) -> Self {
        Self {
            rules: RuleBasedIntentClassifier::new(),
            learned: None,
            threshold,
        }
    }

    /// Attach a learned classifier.
    pub fn with_learned(mut self, learned: Arc<dyn IntentClassifier>) -> Self {
        self.learned = Some(learned);
        self
    }

    /// Build from configuration, loading model artifacts if present.
    ///
    /// Missing or malformed artifacts leave the classifier rule-only.
    pub fn from_config(config: &NluConfig, normalizer: TextNormalizer) -> Self {
        let classifier = Self::new(config.confidence_threshold);

        match ModelArtifacts::load_optional(&config.model_path) {
            Ok(Some(artifacts)) => classifier.with_learned(Arc::new(LearnedIntentClassifier::new(
                artifacts,
                normalizer,
                config.max_sequence_length,
            ))),
            Ok(None) => classifier,
            Err(e) => {
                error!(
                    "Failed to load intent model from {}: {e}. Using rule-based classification.",
                    config.model_path.display()
                );
                classifier
            }
        }
    }

    /// Learned results at or above this confidence are accepted.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a learned classifier is attached.
    pub fn is_learned_available(&self) -> bool {
        self.learned.is_some()
    }

    /// Rule-table prediction for `text`.
    pub fn classify_rules(&self, text: &str) -> IntentPrediction {
        self.rules.classify_rules(text)
    }

    /// Learned prediction for `text`, or [`NluError::ModelUnavailable`].
    pub fn classify_learned(&self, text: &str) -> Result<IntentPrediction> {
        match &self.learned {
            Some(learned) => learned.predict(text),
            None => Err(NluError::ModelUnavailable),
        }
    }

    /// Classify `text`. Never fails.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let learned = match self.classify_learned(text) {
            Ok(prediction) => Some(prediction),
            Err(NluError::ModelUnavailable) => None,
            Err(e) => {
                warn!("Learned classification failed, using rules: {e}");
                None
            }
        };

        let result = arbitrate(learned, self.threshold, || self.rules.classify_rules(text));
        debug!(
            "Classified {text:?} as {} ({:.2}, {})",
            result.intent, result.confidence, result.method
        );
        result
    }
}

impl Default for HybridIntentClassifier {
    fn default() -> Self {
        Self::new(NluConfig::default().confidence_threshold)
    }
}

impl IntentClassifier for HybridIntentClassifier {
    fn predict(&self, text: &str) -> Result<IntentPrediction> {
        let result = self.classify(text);
        Ok(IntentPrediction::new(result.intent, result.confidence))
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct ScriptedClassifier {
        outcome: std::result::Result<(String, f64), String>,
        calls: AtomicUsize,
    }

    impl ScriptedClassifier {
        fn confident(intent: &str, confidence: f64) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok((intent.to_string(), confidence)),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl IntentClassifier for ScriptedClassifier {
        fn predict(&self, _text: &str) -> Result<IntentPrediction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok((intent, confidence)) => Ok(IntentPrediction::new(intent.clone(), *confidence)),
                Err(message) => Err(NluError::classification(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn test_without_model_uses_rules() {
        let classifier = HybridIntentClassifier::new(0.75);
        assert!(!classifier.is_learned_available());
        assert!(classifier.classify_learned("hi").unwrap_err().is_model_unavailable());

        let result = classifier.classify("hi");
        assert_eq!(result.intent, "greeting");
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.method, ClassificationMethod::RuleBased);
    }

    #[test]
    fn test_confident_model_is_returned_unmodified() {
        let learned = ScriptedClassifier::confident("course_schedule", 0.8);
        let classifier = HybridIntentClassifier::new(0.75).with_learned(learned.clone());

        let result = classifier.classify("thanks!");
        assert_eq!(result.intent, "course_schedule");
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.method, ClassificationMethod::Learned);
        assert_eq!(learned.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let classifier = HybridIntentClassifier::new(0.75)
            .with_learned(ScriptedClassifier::confident("course_credits", 0.75));
        assert_eq!(classifier.classify("hi").method, ClassificationMethod::Learned);
    }

    #[test]
    fn test_more_confident_rules_win() {
        let classifier = HybridIntentClassifier::new(0.75)
            .with_learned(ScriptedClassifier::confident("greeting", 0.5));

        let result = classifier.classify("When does the CS101 class meet?");
        assert_eq!(result.intent, "course_schedule");
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.method, ClassificationMethod::RuleBased);
    }

    #[test]
    fn test_weak_rules_keep_learned_as_hybrid() {
        let classifier = HybridIntentClassifier::new(0.75)
            .with_learned(ScriptedClassifier::confident("course_credits", 0.5));

        let result = classifier.classify("asdkjasd");
        assert_eq!(result.intent, "course_credits");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.method, ClassificationMethod::Hybrid);
    }

    #[test]
    fn test_tie_keeps_learned() {
        let classifier = HybridIntentClassifier::new(0.9)
            .with_learned(ScriptedClassifier::confident("course_info", 0.85));

        let result = classifier.classify("When does the CS101 class meet?");
        assert_eq!(result.intent, "course_info");
        assert_eq!(result.method, ClassificationMethod::Hybrid);
    }

    #[test]
    fn test_model_failure_falls_back_to_rules() {
        let classifier = HybridIntentClassifier::new(0.75)
            .with_learned(ScriptedClassifier::failing("tensor shape mismatch"));

        let result = classifier.classify("thanks so much");
        assert_eq!(result.intent, "thanks");
        assert_eq!(result.method, ClassificationMethod::RuleBased);
    }

    #[test]
    fn test_rules_not_consulted_when_confident() {
        let result = arbitrate(Some(IntentPrediction::new("greeting", 0.99)), 0.75, || {
            panic!("rules should not run")
        });
        assert_eq!(result.method, ClassificationMethod::Learned);
    }

    #[test]
    fn test_missing_model_dir_is_rule_only() {
        let config = NluConfig {
            model_path: "/nonexistent/campus-nlu/model".into(),
            ..Default::default()
        };
        let classifier = HybridIntentClassifier::from_config(&config, TextNormalizer::default());
        assert!(!classifier.is_learned_available());
    }
}
