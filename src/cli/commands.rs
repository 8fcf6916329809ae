//! Command implementations for the campus-nlu CLI.

use std::fs;
use std::time::Instant;

use log::{debug, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::entity::validation::{ConfidenceLevel, validate_entities};
use crate::error::Result;
use crate::pipeline::input::clamp_message;
use crate::pipeline::orchestrator::NluPipeline;

/// Execute a CLI command.
pub fn execute_command(args: CampusNluArgs) -> Result<()> {
    let config = args.nlu_config()?;
    debug!("Using configuration: {config:?}");
    let pipeline = NluPipeline::from_config(config)?;

    match &args.command {
        Command::Analyze(analyze_args) => analyze(&pipeline, analyze_args, &args),
        Command::Classify(text_args) => classify(&pipeline, text_args, &args),
        Command::Entities(entity_args) => entities(&pipeline, entity_args, &args),
        Command::Normalize(text_args) => normalize(&pipeline, text_args, &args),
        Command::Batch(batch_args) => batch(&pipeline, batch_args, &args),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn bounded<'a>(pipeline: &NluPipeline, text: &'a str) -> &'a str {
    let max = pipeline.config().max_message_length;
    let clamped = clamp_message(text, max);
    if clamped.len() < text.len() {
        warn!("Message truncated to {max} characters");
    }
    clamped
}

/// Run the full pipeline on one message.
fn analyze(pipeline: &NluPipeline, args: &AnalyzeArgs, cli_args: &CampusNluArgs) -> Result<()> {
    let text = bounded(pipeline, &args.message.text);
    let context = args.message.session_context();

    let result = runtime()?.block_on(pipeline.process(text, &context));

    let validation = args.validate.then(|| {
        let entities = result.entities.clone().unwrap_or_default();
        validate_entities(&entities, &result.intent)
    });

    output_result(
        "Analysis complete",
        &AnalysisOutput {
            confidence_level: result.confidence_level(),
            result,
            validation,
        },
        cli_args,
    )
}

/// Classify one message.
fn classify(pipeline: &NluPipeline, args: &TextArgs, cli_args: &CampusNluArgs) -> Result<()> {
    let result = pipeline.classify(bounded(pipeline, &args.text));
    if cli_args.verbosity() > 1 {
        println!(
            "Confidence level: {}",
            ConfidenceLevel::from_score(result.confidence)
        );
    }
    output_result("Classification complete", &result, cli_args)
}

/// Extract and enhance entities from one message.
fn entities(
    pipeline: &NluPipeline,
    args: &ContextTextArgs,
    cli_args: &CampusNluArgs,
) -> Result<()> {
    let entities =
        pipeline.extract_entities(bounded(pipeline, &args.text), &args.session_context());
    output_result("Extraction complete", &entities, cli_args)
}

/// Show the normalized form of one message.
fn normalize(pipeline: &NluPipeline, args: &TextArgs, cli_args: &CampusNluArgs) -> Result<()> {
    let form = pipeline.normalize(bounded(pipeline, &args.text));
    output_result("Normalization complete", &form, cli_args)
}

/// Run the pipeline on every non-empty line of a file.
fn batch(pipeline: &NluPipeline, args: &BatchArgs, cli_args: &CampusNluArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Reading messages from: {}", args.file.display());
    }

    let content = fs::read_to_string(&args.file)?;
    let messages: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| bounded(pipeline, line))
        .collect();

    let start_time = Instant::now();
    let results = runtime()?.block_on(pipeline.process_batch(&messages));
    let duration = start_time.elapsed();

    output_result(
        "Batch complete",
        &BatchOutput {
            total_messages: results.len(),
            degraded: results.iter().filter(|r| r.is_degraded()).count(),
            results,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}
