//! Entity completeness checks and confidence levels.

use serde::{Deserialize, Serialize};

use crate::entity::types::{EntityBag, EntityType};
use crate::intent::types::Intent;

/// Entity types an intent needs to be answerable.
pub fn required_entities(intent: &str) -> &'static [EntityType] {
    match intent.parse::<Intent>() {
        Ok(
            Intent::CourseInfo
            | Intent::CourseSchedule
            | Intent::CoursePrerequisites
            | Intent::CourseAvailability
            | Intent::CourseLocation
            | Intent::CourseCredits,
        ) => &[EntityType::CourseCodes],
        Ok(Intent::InstructorInfo | Intent::InstructorOfficeHours) => {
            &[EntityType::InstructorNames]
        }
        _ => &[],
    }
}

/// Outcome of [`validate_entities`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValidation {
    pub is_valid: bool,
    pub missing_entities: Vec<EntityType>,
    pub warnings: Vec<String>,
}

/// Check that `entities` carries what `intent` requires.
pub fn validate_entities(entities: &EntityBag, intent: &str) -> EntityValidation {
    let missing_entities: Vec<EntityType> = required_entities(intent)
        .iter()
        .copied()
        .filter(|t| entities.get(*t).is_empty())
        .collect();

    let mut warnings = Vec::new();
    if entities.course_codes.len() > 1 {
        warnings.push("Multiple course codes detected. Using first one.".to_string());
    }
    if entities.instructor_names.len() > 1 {
        warnings.push("Multiple instructor names detected. Using first one.".to_string());
    }

    EntityValidation {
        is_valid: missing_entities.is_empty(),
        missing_entities,
        warnings,
    }
}

/// Coarse description of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Bucket a confidence score.
    pub fn from_score(confidence: f64) -> Self {
        if confidence >= 0.9 {
            ConfidenceLevel::VeryHigh
        } else if confidence >= 0.75 {
            ConfidenceLevel::High
        } else if confidence >= 0.6 {
            ConfidenceLevel::Medium
        } else if confidence >= 0.4 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    /// Wire name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "very_low",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
            ConfidenceLevel::VeryHigh => "very_high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_course_code() {
        let validation = validate_entities(&EntityBag::new(), "course_schedule");
        assert!(!validation.is_valid);
        assert_eq!(validation.missing_entities, vec![EntityType::CourseCodes]);
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn test_instructor_intent() {
        let mut entities = EntityBag::new();
        entities.instructor_names = vec!["Smith".to_string(), "Lee".to_string()];

        let validation = validate_entities(&entities, "instructor_office_hours");
        assert!(validation.is_valid);
        assert_eq!(
            validation.warnings,
            vec!["Multiple instructor names detected. Using first one."]
        );
    }

    #[test]
    fn test_conversational_intents_need_nothing() {
        assert!(required_entities("greeting").is_empty());
        assert!(required_entities("no_such_intent").is_empty());
        assert!(validate_entities(&EntityBag::new(), "thanks").is_valid);
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(0.95), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.75), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.6), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.3), ConfidenceLevel::VeryLow);
        assert_eq!(ConfidenceLevel::from_score(0.0).as_str(), "very_low");
    }
}
