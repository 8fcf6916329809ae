//! Common types for intent classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NluError;

/// Confidence assigned to conversational rule matches (greeting, thanks).
pub const CONVERSATIONAL_CONFIDENCE: f64 = 0.95;
/// Confidence assigned to informational rule matches.
pub const INFORMATIONAL_CONFIDENCE: f64 = 0.85;
/// Confidence of the rule-based `unknown` fallback.
pub const UNKNOWN_CONFIDENCE: f64 = 0.3;

/// Intents recognized by the rule table, plus `Unknown`.
///
/// A learned model may emit labels outside this set; those travel as plain
/// strings in [`IntentPrediction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Thanks,
    Help,
    CourseInfo,
    CourseSchedule,
    CoursePrerequisites,
    InstructorInfo,
    InstructorOfficeHours,
    CourseAvailability,
    CourseLocation,
    CourseCredits,
    DepartmentCourses,
    Unknown,
}

impl Intent {
    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Thanks => "thanks",
            Intent::Help => "help",
            Intent::CourseInfo => "course_info",
            Intent::CourseSchedule => "course_schedule",
            Intent::CoursePrerequisites => "course_prerequisites",
            Intent::InstructorInfo => "instructor_info",
            Intent::InstructorOfficeHours => "instructor_office_hours",
            Intent::CourseAvailability => "course_availability",
            Intent::CourseLocation => "course_location",
            Intent::CourseCredits => "course_credits",
            Intent::DepartmentCourses => "department_courses",
            Intent::Unknown => "unknown",
        }
    }

    /// Small-talk intents that carry no course or instructor question.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Intent::Greeting | Intent::Thanks)
    }

    /// Fixed confidence the rule-based classifier reports for this intent.
    pub fn rule_confidence(&self) -> f64 {
        match self {
            Intent::Unknown => UNKNOWN_CONFIDENCE,
            intent if intent.is_conversational() => CONVERSATIONAL_CONFIDENCE,
            _ => INFORMATIONAL_CONFIDENCE,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = NluError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let intent = match s {
            "greeting" => Intent::Greeting,
            "thanks" => Intent::Thanks,
            "help" => Intent::Help,
            "course_info" => Intent::CourseInfo,
            "course_schedule" => Intent::CourseSchedule,
            "course_prerequisites" => Intent::CoursePrerequisites,
            "instructor_info" => Intent::InstructorInfo,
            "instructor_office_hours" => Intent::InstructorOfficeHours,
            "course_availability" => Intent::CourseAvailability,
            "course_location" => Intent::CourseLocation,
            "course_credits" => Intent::CourseCredits,
            "department_courses" => Intent::DepartmentCourses,
            "unknown" => Intent::Unknown,
            other => {
                return Err(NluError::classification(format!(
                    "unrecognized intent label: {other}"
                )));
            }
        };
        Ok(intent)
    }
}

/// Which classifier produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationMethod {
    /// Rule table result.
    #[serde(rename = "rule-based")]
    RuleBased,
    /// Learned result at or above the confidence threshold.
    #[serde(rename = "learned")]
    Learned,
    /// Learned result below threshold, kept because rules did not beat it.
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl ClassificationMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::RuleBased => "rule-based",
            ClassificationMethod::Learned => "learned",
            ClassificationMethod::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability the learned model assigned to one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub probability: f64,
}

/// Output of a single classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    /// Predicted intent label.
    pub intent: String,
    /// Confidence of the prediction.
    pub confidence: f64,
    /// Full distribution over labels, in class-index order. Empty for rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distribution: Vec<LabelScore>,
}

impl IntentPrediction {
    /// Prediction without a distribution.
    pub fn new<S: Into<String>>(intent: S, confidence: f64) -> Self {
        Self {
            intent: intent.into(),
            confidence,
            distribution: Vec::new(),
        }
    }

    /// Attach a label distribution.
    pub fn with_distribution(mut self, distribution: Vec<LabelScore>) -> Self {
        self.distribution = distribution;
        self
    }
}

/// Final arbitrated classification of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub method: ClassificationMethod,
}

impl ClassificationResult {
    /// Build a result from a prediction, clamping the confidence into `[0, 1]`.
    pub fn from_prediction(prediction: IntentPrediction, method: ClassificationMethod) -> Self {
        Self {
            intent: prediction.intent,
            confidence: clamp_confidence(prediction.confidence),
            method,
        }
    }
}

/// Clamp a score into `[0, 1]`; NaN becomes 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
