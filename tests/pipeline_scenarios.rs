use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use campus_nlu::cache::{MemoryCache, ResultCache};
use campus_nlu::config::NluConfig;
use campus_nlu::entity::{EntityExtractor, LinguisticTagger, SessionContext, TemporalExpression};
use campus_nlu::error::{NluError, Result};
use campus_nlu::intent::{
    ClassificationMethod, HybridIntentClassifier, IntentClassifier, IntentPrediction,
};
use campus_nlu::pipeline::{NluPipeline, NluResult};

/// Learned classifier double with a fixed answer, an optional delay and a call counter.
struct ScriptedClassifier {
    intent: &'static str,
    confidence: f64,
    delay: Option<Duration>,
    fail: bool,
    panic: bool,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn answering(intent: &'static str, confidence: f64) -> Self {
        Self {
            intent,
            confidence,
            delay: None,
            fail: false,
            panic: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IntentClassifier for ScriptedClassifier {
    fn predict(&self, _text: &str) -> Result<IntentPrediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.panic {
            panic!("scripted classifier crashed");
        }
        if self.fail {
            return Err(NluError::classification("scripted failure"));
        }
        Ok(IntentPrediction::new(self.intent, self.confidence))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Cache whose backend is always down.
#[derive(Debug)]
struct UnreachableCache;

#[async_trait]
impl ResultCache for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(NluError::cache("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<bool> {
        Err(NluError::cache("connection refused"))
    }
}

/// Tagger that crashes on every call.
#[derive(Debug)]
struct CrashingTagger;

impl LinguisticTagger for CrashingTagger {
    fn find_person_mentions(&self, _text: &str) -> Vec<String> {
        panic!("tagger crashed");
    }

    fn find_temporal_expressions(&self, _text: &str) -> Vec<TemporalExpression> {
        panic!("tagger crashed");
    }

    fn find_numerals(&self, _text: &str) -> Vec<String> {
        panic!("tagger crashed");
    }

    fn name(&self) -> &str {
        "crashing"
    }
}

fn assert_degraded(result: &NluResult) -> Result<()> {
    assert!(result.is_degraded());
    assert_eq!(result.intent, "unknown");
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.entities, None);
    assert_eq!(result.method, None);

    let value = serde_json::to_value(result)?;
    assert_eq!(value["entities"], serde_json::json!({}));
    assert!(value["error"].as_str().is_some());
    Ok(())
}

fn pipeline_with_learned(learned: Arc<ScriptedClassifier>) -> Result<NluPipeline> {
    let classifier = HybridIntentClassifier::new(0.75).with_learned(learned);
    Ok(NluPipeline::rule_based()?.with_classifier(classifier))
}

#[tokio::test]
async fn course_code_question_is_course_info() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;
    let result = pipeline.process("What is CS101?", &SessionContext::new()).await;

    assert_eq!(result.intent, "course_info");
    assert_eq!(result.confidence, 0.85);
    assert_eq!(result.method, Some(ClassificationMethod::RuleBased));
    assert!(result.error.is_none());

    let entities = result.entities.expect("entities present");
    assert_eq!(entities.course_codes, vec!["CS101"]);
    assert!(entities.instructor_names.is_empty());
    assert!(entities.departments.is_empty());
    assert!(entities.times.is_empty());
    assert!(entities.days.is_empty());
    assert!(entities.semesters.is_empty());
    assert!(entities.numbers.is_empty());
    assert!(!entities.from_context);
    Ok(())
}

#[tokio::test]
async fn conversational_and_unknown_messages() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;

    let thanks = pipeline.process("thanks!", &SessionContext::new()).await;
    assert_eq!(thanks.intent, "thanks");
    assert_eq!(thanks.confidence, 0.95);
    assert_eq!(thanks.method, Some(ClassificationMethod::RuleBased));

    let gibberish = pipeline.process("asdkjasd", &SessionContext::new()).await;
    assert_eq!(gibberish.intent, "unknown");
    assert_eq!(gibberish.confidence, 0.3);
    assert!(!gibberish.is_degraded());
    Ok(())
}

#[tokio::test]
async fn cache_hit_ignores_case_and_whitespace() -> Result<()> {
    let learned = Arc::new(ScriptedClassifier::answering("greeting", 0.9));
    let pipeline = pipeline_with_learned(learned.clone())?;

    let first = pipeline.process("Hello", &SessionContext::new()).await;
    let second = pipeline.process("hello  ", &SessionContext::new()).await;

    assert_eq!(first, second);
    assert_eq!(first.processing_time_ms, second.processing_time_ms);
    assert_eq!(learned.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn results_are_written_to_the_configured_cache() -> Result<()> {
    let cache = Arc::new(MemoryCache::new());
    let pipeline = NluPipeline::rule_based()?.with_cache(cache.clone());

    pipeline.process("What is CS101?", &SessionContext::new()).await;

    assert!(cache.exists("nlp:what is cs101?"));
    let stored = cache.get("nlp:what is cs101?").await?.expect("cached value");
    let value: serde_json::Value = serde_json::from_str(&stored)?;
    assert_eq!(value["intent"], "course_info");
    assert_eq!(value["method"], "rule-based");
    Ok(())
}

#[tokio::test]
async fn context_backfills_missing_course() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;
    let context = SessionContext::new().with_last_course("cs101");

    let result = pipeline.process("When does the class meet?", &context).await;

    assert_eq!(result.intent, "course_schedule");
    let entities = result.entities.expect("entities present");
    assert_eq!(entities.course_codes, vec!["CS101"]);
    assert!(entities.from_context);
    assert_eq!(result.context, context);
    Ok(())
}

#[tokio::test]
async fn unreachable_cache_is_a_miss() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?.with_cache(Arc::new(UnreachableCache));

    let result = pipeline.process("hello", &SessionContext::new()).await;
    assert_eq!(result.intent, "greeting");
    assert!(!result.is_degraded());
    Ok(())
}

#[tokio::test]
async fn deadline_yields_degraded_result() -> Result<()> {
    let learned = Arc::new(
        ScriptedClassifier::answering("course_info", 0.99).slow(Duration::from_millis(300)),
    );
    let config = NluConfig {
        request_timeout_ms: 50,
        ..Default::default()
    };
    let pipeline = pipeline_with_learned(learned)?.with_config(config);

    let result = pipeline.process("What is CS101?", &SessionContext::new()).await;

    assert_degraded(&result)?;
    assert!(result.error.as_deref().is_some_and(|e| e.starts_with("Timeout")));
    Ok(())
}

#[tokio::test]
async fn caller_deadline_yields_degraded_result() -> Result<()> {
    let learned = Arc::new(
        ScriptedClassifier::answering("course_info", 0.99).slow(Duration::from_millis(300)),
    );
    let pipeline = pipeline_with_learned(learned)?;
    assert_eq!(pipeline.config().request_timeout_ms, 5000);
    let context = SessionContext::new().with_last_course("CS101");

    let result = pipeline
        .process_with_deadline("What is CS101?", &context, Some(Duration::from_millis(50)))
        .await;

    assert_degraded(&result)?;
    assert_eq!(result.context, context);
    Ok(())
}

#[tokio::test]
async fn crashing_classifier_yields_degraded_result() -> Result<()> {
    let learned = Arc::new(ScriptedClassifier::answering("greeting", 0.99).panicking());
    let pipeline = pipeline_with_learned(learned.clone())?;

    let result = pipeline.process("hello", &SessionContext::new()).await;

    assert_degraded(&result)?;
    assert_eq!(learned.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn crashing_extractor_yields_degraded_result() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?
        .with_extractor(EntityExtractor::new(Arc::new(CrashingTagger)));

    let result = pipeline.process("What is CS101?", &SessionContext::new()).await;

    assert_degraded(&result)?;
    Ok(())
}

#[tokio::test]
async fn course_titles_leave_room_for_instructor_backfill() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;
    let context = SessionContext::new().with_last_instructor("Smith");

    let result = pipeline.process("When does Data Structures meet?", &context).await;

    let entities = result.entities.expect("entities present");
    assert_eq!(entities.instructor_names, vec!["Smith"]);
    assert!(entities.from_context);
    Ok(())
}

#[tokio::test]
async fn learned_failure_falls_back_to_rules() -> Result<()> {
    let learned = Arc::new(ScriptedClassifier::answering("greeting", 0.99).failing());
    let pipeline = pipeline_with_learned(learned.clone())?;

    let result = pipeline.process("thanks!", &SessionContext::new()).await;
    assert_eq!(result.intent, "thanks");
    assert_eq!(result.method, Some(ClassificationMethod::RuleBased));
    assert!(!result.is_degraded());
    assert_eq!(learned.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn without_model_every_method_is_rule_based() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;
    let messages = [
        "hi",
        "thank you",
        "what can you do",
        "Who teaches Professor Smith's class? Which instructor offers it?",
        "Are there open seats in CS201?",
        "Where is the class held?",
        "how many credits is MATH101",
        "zzz",
    ];

    for result in pipeline.process_batch(&messages).await {
        assert_eq!(result.method, Some(ClassificationMethod::RuleBased));
        assert!((0.0..=1.0).contains(&result.confidence));
    }
    Ok(())
}

#[tokio::test]
async fn batch_preserves_input_order() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;
    let results = pipeline
        .process_batch(&["hello", "What is CS101?", "asdkjasd"])
        .await;

    let intents: Vec<&str> = results.iter().map(|r| r.intent.as_str()).collect();
    assert_eq!(intents, vec!["greeting", "course_info", "unknown"]);
    Ok(())
}

#[tokio::test]
async fn concurrent_duplicate_requests_agree() -> Result<()> {
    let pipeline = NluPipeline::rule_based()?;
    let context = SessionContext::new();

    let (a, b) = tokio::join!(
        pipeline.process("When is CS101 class?", &context),
        pipeline.process("when is cs101 class?", &context)
    );
    assert_eq!(a.intent, b.intent);
    assert_eq!(a.confidence, b.confidence);
    Ok(())
}
