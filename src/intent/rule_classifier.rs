//! Rule-based intent classifier.
//!
//! An ordered table of case-insensitive patterns, checked against the
//! original (non-normalized) utterance. The first matching rule wins, so
//! table order is a priority list: a greeting that mentions "help" is still
//! a greeting.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::error::Result;
use crate::intent::classifier::IntentClassifier;
use crate::intent::types::{Intent, IntentPrediction};

/// One entry of the rule table.
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub pattern: Regex,
}

fn rule(intent: Intent, pattern: &str) -> IntentRule {
    IntentRule {
        intent,
        pattern: Regex::new(&format!("(?i){pattern}")).expect("Rule patterns should be valid"),
    }
}

lazy_static! {
    /// The priority-ordered rule table.
    pub static ref INTENT_RULES: Vec<IntentRule> = vec![
        rule(Intent::Greeting, r"^(hi|hello|hey|good morning|good afternoon|greetings)"),
        rule(Intent::Thanks, r"(thank|thanks|appreciate)"),
        rule(Intent::Help, r"(help|assist|support|guide|what can you do)"),
        rule(
            Intent::CourseInfo,
            r"(what is|tell me about|information about|describe|explain).*(course|class|\b[a-z]{2,4}\s?\d{3}\b)",
        ),
        rule(
            Intent::CourseSchedule,
            r"(when|what time|schedule|timing).*(course|class)|when is (cs|math|eng|phy|bus)\d+",
        ),
        rule(
            Intent::CoursePrerequisites,
            r"(prerequisite|prereq|requirement|need to take|before taking)",
        ),
        rule(
            Intent::InstructorInfo,
            r"(who teaches|professor|instructor|faculty).*(teach|offer|information)",
        ),
        rule(
            Intent::InstructorOfficeHours,
            r"(office hours|when.*available|meet with|visit)",
        ),
        rule(
            Intent::CourseAvailability,
            r"(available|open|seats|full|enrollment|can i enroll)",
        ),
        rule(Intent::CourseLocation, r"(where|location|room|building).*(held|meet|class)"),
        rule(Intent::CourseCredits, r"(how many credits|credit hours|worth)"),
        rule(
            Intent::DepartmentCourses,
            r"(what courses|list.*courses|courses in).*(department|major)",
        ),
    ];
}

/// Rule-based intent classifier.
///
/// Never fails and depends on no external state; it is the guaranteed
/// fallback when no learned model is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedIntentClassifier;

impl RuleBasedIntentClassifier {
    /// Create a classifier over [`INTENT_RULES`].
    pub fn new() -> Self {
        RuleBasedIntentClassifier
    }

    /// The first rule matching `text`, if any.
    pub fn matching_rule(&self, text: &str) -> Option<Intent> {
        INTENT_RULES
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.intent)
    }

    /// Classify `text` against the rule table.
    ///
    /// Returns `unknown` with confidence 0.3 when nothing matches.
    pub fn classify_rules(&self, text: &str) -> IntentPrediction {
        let intent = self.matching_rule(text).unwrap_or(Intent::Unknown);
        debug!("Rule classifier matched {intent} for {text:?}");
        IntentPrediction::new(intent.as_str(), intent.rule_confidence())
    }
}

impl IntentClassifier for RuleBasedIntentClassifier {
    fn predict(&self, text: &str) -> Result<IntentPrediction> {
        Ok(self.classify_rules(text))
    }

    fn name(&self) -> &str {
        "rule_based"
    }
}
