use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use campus_nlu::analysis::TextNormalizer;
use campus_nlu::config::NluConfig;
use campus_nlu::entity::SessionContext;
use campus_nlu::error::{NluError, Result};
use campus_nlu::intent::{
    ClassificationMethod, HybridIntentClassifier, ModelArtifacts, SequenceModel,
};
use campus_nlu::pipeline::NluPipeline;

/// Two-class model: `hello` → greeting, `cours` → course_info.
fn write_artifacts(dir: &Path) -> Result<()> {
    fs::write(
        dir.join("word_index.json"),
        json!({"hello": 1, "cours": 2}).to_string(),
    )?;
    fs::write(
        dir.join("intent_labels.json"),
        json!({"greeting": 0, "course_info": 1}).to_string(),
    )?;
    fs::write(
        dir.join("embedding_bag.json"),
        json!({
            "embeddings": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            "hidden": {"weights": [[1.0, 0.0], [0.0, 1.0]], "bias": [0.0, 0.0]},
            "output": {"weights": [[10.0, 0.0], [0.0, 10.0]], "bias": [0.0, 0.0]},
        })
        .to_string(),
    )?;
    Ok(())
}

fn config_for(dir: &Path) -> NluConfig {
    NluConfig {
        model_path: dir.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn artifacts_load_from_directory() -> Result<()> {
    let dir = TempDir::new()?;
    write_artifacts(dir.path())?;

    let artifacts = ModelArtifacts::load_optional(dir.path())?.expect("model present");
    assert_eq!(artifacts.labels.len(), 2);
    assert_eq!(artifacts.vocabulary.index_of("cours"), 2);
    assert_eq!(artifacts.model.num_labels(), 2);
    Ok(())
}

#[test]
fn missing_model_file_is_not_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    assert!(ModelArtifacts::load_optional(dir.path())?.is_none());

    let classifier =
        HybridIntentClassifier::from_config(&config_for(dir.path()), TextNormalizer::default());
    assert!(!classifier.is_learned_available());
    Ok(())
}

#[test]
fn tensorflow_export_is_skipped_without_error() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("word_index.json"),
        json!({"hello": 1}).to_string(),
    )?;
    fs::write(
        dir.path().join("intent_labels.json"),
        json!({"greeting": 0}).to_string(),
    )?;
    fs::write(
        dir.path().join("model.json"),
        json!({
            "format": "layers-model",
            "modelTopology": {"class_name": "Sequential"},
            "weightsManifest": [],
        })
        .to_string(),
    )?;

    assert!(ModelArtifacts::load_optional(dir.path())?.is_none());

    let classifier =
        HybridIntentClassifier::from_config(&config_for(dir.path()), TextNormalizer::default());
    assert!(!classifier.is_learned_available());
    Ok(())
}

#[test]
fn malformed_artifacts_degrade_to_rules() -> Result<()> {
    let dir = TempDir::new()?;
    write_artifacts(dir.path())?;
    fs::write(dir.path().join("intent_labels.json"), r#"{"greeting": 0}"#)?;

    assert!(matches!(
        ModelArtifacts::load_optional(dir.path()),
        Err(NluError::Artifact(_))
    ));

    let classifier =
        HybridIntentClassifier::from_config(&config_for(dir.path()), TextNormalizer::default());
    assert!(!classifier.is_learned_available());
    assert_eq!(classifier.classify("hello").method, ClassificationMethod::RuleBased);
    Ok(())
}

#[test]
fn loaded_model_drives_arbitration() -> Result<()> {
    let dir = TempDir::new()?;
    write_artifacts(dir.path())?;
    let classifier =
        HybridIntentClassifier::from_config(&config_for(dir.path()), TextNormalizer::default());
    assert!(classifier.is_learned_available());

    let confident = classifier.classify("Tell me about the course");
    assert_eq!(confident.intent, "course_info");
    assert_eq!(confident.method, ClassificationMethod::Learned);
    assert!(confident.confidence > 0.99);

    // No known tokens: a flat 0.5/0.5 distribution, first label wins and
    // the 0.3 rule fallback does not beat it.
    let unsure = classifier.classify("asdkjasd");
    assert_eq!(unsure.intent, "greeting");
    assert!((unsure.confidence - 0.5).abs() < 1e-6);
    assert_eq!(unsure.method, ClassificationMethod::Hybrid);
    Ok(())
}

#[tokio::test]
async fn pipeline_reports_learned_method() -> Result<()> {
    let dir = TempDir::new()?;
    write_artifacts(dir.path())?;
    let pipeline = NluPipeline::from_config(config_for(dir.path()))?;

    let result = pipeline.process("hello there", &SessionContext::new()).await;
    assert_eq!(result.intent, "greeting");
    assert_eq!(result.method, Some(ClassificationMethod::Learned));
    Ok(())
}
