//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{CampusNluArgs, OutputFormat};
use crate::entity::validation::{ConfidenceLevel, EntityValidation};
use crate::error::Result;
use crate::pipeline::result::NluResult;

/// Result of the `analyze` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisOutput {
    #[serde(flatten)]
    pub result: NluResult,
    pub confidence_level: ConfidenceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<EntityValidation>,
}

/// Result of the `batch` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchOutput {
    pub results: Vec<NluResult>,
    pub total_messages: usize,
    pub degraded: usize,
    pub duration_ms: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(
    message: &str,
    result: &T,
    args: &CampusNluArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &CampusNluArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value, 0) {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &CampusNluArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Indented `key: value` lines. Nested objects are expanded, array items
/// holding objects are separated by a rule.
fn human_lines(value: &serde_json::Value, indent: usize) -> Vec<String> {
    let pad = "  ".repeat(indent);
    let mut lines = Vec::new();

    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(inner) if !inner.is_empty() => {
                        lines.push(format!("{pad}{key}:"));
                        lines.extend(human_lines(val, indent + 1));
                    }
                    serde_json::Value::Array(items)
                        if items.iter().any(serde_json::Value::is_object) =>
                    {
                        lines.push(format!("{pad}{key}:"));
                        for (i, item) in items.iter().enumerate() {
                            lines.push(format!("{pad}── {} ──", i + 1));
                            lines.extend(human_lines(item, indent + 1));
                        }
                    }
                    _ => lines.push(format!("{pad}{key}: {}", format_value(val))),
                }
            }
        }
        _ => lines.push(format!("{pad}{}", format_value(value))),
    }

    lines
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) if obj.is_empty() => "{}".to_string(),
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_human_lines_expand_nested_objects() {
        let value = json!({
            "intent": "course_info",
            "confidence": 0.85,
            "entities": {"course_codes": ["CS101"], "days": []},
        });

        let lines = human_lines(&value, 0);
        assert!(lines.contains(&"intent: course_info".to_string()));
        assert!(lines.contains(&"confidence: 0.85".to_string()));
        assert!(lines.contains(&"entities:".to_string()));
        assert!(lines.contains(&"  course_codes: [CS101]".to_string()));
        assert!(lines.contains(&"  days: []".to_string()));
    }

    #[test]
    fn test_empty_object_is_inline() {
        let lines = human_lines(&json!({"entities": {}}), 0);
        assert_eq!(lines, vec!["entities: {}"]);
    }

    #[test]
    fn test_analysis_output_flattens_result() {
        let output = AnalysisOutput {
            result: NluResult::degraded(Default::default(), 0, "boom"),
            confidence_level: ConfidenceLevel::VeryLow,
            validation: None,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["intent"], json!("unknown"));
        assert_eq!(value["confidence_level"], json!("very_low"));
        assert!(value.get("validation").is_none());
    }
}
