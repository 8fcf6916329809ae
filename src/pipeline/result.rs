//! Pipeline output.

use serde::{Deserialize, Serialize};

use crate::entity::types::{EntityBag, SessionContext};
use crate::entity::validation::ConfidenceLevel;
use crate::intent::types::{ClassificationMethod, Intent};

/// Merged classification and extraction result for one utterance.
///
/// A degraded result (internal failure or deadline) has intent `unknown`,
/// confidence 0, `entities` serialized as `{}`, no method and an `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NluResult {
    pub intent: String,
    pub confidence: f64,
    #[serde(default, with = "entities_or_empty")]
    pub entities: Option<EntityBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ClassificationMethod>,
    pub processing_time_ms: u64,
    #[serde(default)]
    pub context: SessionContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NluResult {
    /// The fallback result returned instead of an error.
    pub fn degraded<S: Into<String>>(
        context: SessionContext,
        processing_time_ms: u64,
        error: S,
    ) -> Self {
        Self {
            intent: Intent::Unknown.as_str().to_string(),
            confidence: 0.0,
            entities: None,
            method: None,
            processing_time_ms,
            context,
            error: Some(error.into()),
        }
    }

    /// Whether this result came from the failure path.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Confidence bucket of this result.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }
}

/// `None` is written as an empty object and an empty object reads back as `None`.
mod entities_or_empty {
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::entity::types::EntityBag;

    pub fn serialize<S>(entities: &Option<EntityBag>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match entities {
            Some(bag) => bag.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<EntityBag>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(map) if map.is_empty() => Ok(None),
            _ => EntityBag::deserialize(value).map(Some).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_degraded_shape() {
        let result = NluResult::degraded(SessionContext::new(), 4, "deadline exceeded");
        assert!(result.is_degraded());
        assert_eq!(result.confidence_level(), ConfidenceLevel::VeryLow);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["intent"], json!("unknown"));
        assert_eq!(value["confidence"], json!(0.0));
        assert_eq!(value["entities"], json!({}));
        assert_eq!(value["error"], json!("deadline exceeded"));
        assert!(value.get("method").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut entities = EntityBag::new();
        entities.course_codes.push("CS101".to_string());
        let result = NluResult {
            intent: "course_info".to_string(),
            confidence: 0.85,
            entities: Some(entities),
            method: Some(ClassificationMethod::RuleBased),
            processing_time_ms: 12,
            context: SessionContext::new().with_last_course("CS101"),
            error: None,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""method":"rule-based""#));
        assert_eq!(serde_json::from_str::<NluResult>(&json).unwrap(), result);

        let degraded = NluResult::degraded(SessionContext::new(), 1, "boom");
        let json = serde_json::to_string(&degraded).unwrap();
        assert_eq!(serde_json::from_str::<NluResult>(&json).unwrap(), degraded);
    }
}
