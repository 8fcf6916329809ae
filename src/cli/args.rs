//! Command line argument parsing for the campus-nlu CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::NluConfig;
use crate::entity::types::SessionContext;
use crate::error::Result;

/// campus-nlu - intent classification and entity extraction for course questions
#[derive(Parser, Debug, Clone)]
#[command(name = "campus-nlu")]
#[command(about = "Understand student questions about courses and instructors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CampusNluArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON configuration file (defaults plus environment otherwise)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the trained intent model
    #[arg(long, value_name = "MODEL_DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Confidence at which a learned prediction is accepted as-is
    #[arg(long, value_name = "THRESHOLD", global = true)]
    pub threshold: Option<f64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CampusNluArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Configuration from the file or environment, with flag overrides applied.
    pub fn nlu_config(&self) -> Result<NluConfig> {
        let mut config = match &self.config {
            Some(path) => NluConfig::from_file(path)?,
            None => NluConfig::from_env(),
        };

        if let Some(model_dir) = &self.model_dir {
            config.model_path = model_dir.clone();
        }
        if let Some(threshold) = self.threshold {
            config.confidence_threshold = threshold;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full pipeline on one message
    Analyze(AnalyzeArgs),

    /// Classify the intent of one message
    Classify(TextArgs),

    /// Extract entities from one message
    Entities(ContextTextArgs),

    /// Show the normalized form of one message
    Normalize(TextArgs),

    /// Run the full pipeline on every line of a file
    Batch(BatchArgs),
}

/// A single message argument
#[derive(Parser, Debug, Clone)]
pub struct TextArgs {
    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// A message plus optional session context
#[derive(Parser, Debug, Clone)]
pub struct ContextTextArgs {
    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Course discussed in a previous turn
    #[arg(long, value_name = "COURSE")]
    pub last_course: Option<String>,

    /// Instructor discussed in a previous turn
    #[arg(long, value_name = "INSTRUCTOR")]
    pub last_instructor: Option<String>,
}

impl ContextTextArgs {
    /// Session context built from the `--last-*` flags.
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            last_course: self.last_course.clone(),
            last_instructor: self.last_instructor.clone(),
            ..Default::default()
        }
    }
}

/// Arguments for the full pipeline
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub message: ContextTextArgs,

    /// Also report missing entities for the detected intent
    #[arg(long)]
    pub validate: bool,
}

/// Arguments for batch processing
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// File with one message per line
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
