//! Entity bag and session context types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NluError, Result};

/// The closed set of entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    CourseCodes,
    InstructorNames,
    Departments,
    Times,
    Days,
    Semesters,
    Numbers,
}

impl EntityType {
    /// All entity types, in serialization order.
    pub const ALL: [EntityType; 7] = [
        EntityType::CourseCodes,
        EntityType::InstructorNames,
        EntityType::Departments,
        EntityType::Times,
        EntityType::Days,
        EntityType::Semesters,
        EntityType::Numbers,
    ];

    /// Key of this type in the serialized entity bag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::CourseCodes => "course_codes",
            EntityType::InstructorNames => "instructor_names",
            EntityType::Departments => "departments",
            EntityType::Times => "times",
            EntityType::Days => "days",
            EntityType::Semesters => "semesters",
            EntityType::Numbers => "numbers",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = NluError;

    fn from_str(s: &str) -> Result<Self> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| NluError::extraction(format!("unknown entity type: {s}")))
    }
}

/// Entities extracted from one utterance.
///
/// Every type is always present, possibly empty. Values keep their order
/// of appearance and may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityBag {
    pub course_codes: Vec<String>,
    pub instructor_names: Vec<String>,
    pub departments: Vec<String>,
    pub times: Vec<String>,
    pub days: Vec<String>,
    pub semesters: Vec<String>,
    pub numbers: Vec<String>,
    /// Set when a value was backfilled from session context.
    pub from_context: bool,
}

impl EntityBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values extracted for `entity_type`.
    pub fn get(&self, entity_type: EntityType) -> &[String] {
        match entity_type {
            EntityType::CourseCodes => &self.course_codes,
            EntityType::InstructorNames => &self.instructor_names,
            EntityType::Departments => &self.departments,
            EntityType::Times => &self.times,
            EntityType::Days => &self.days,
            EntityType::Semesters => &self.semesters,
            EntityType::Numbers => &self.numbers,
        }
    }

    /// Mutable values for `entity_type`.
    pub fn get_mut(&mut self, entity_type: EntityType) -> &mut Vec<String> {
        match entity_type {
            EntityType::CourseCodes => &mut self.course_codes,
            EntityType::InstructorNames => &mut self.instructor_names,
            EntityType::Departments => &mut self.departments,
            EntityType::Times => &mut self.times,
            EntityType::Days => &mut self.days,
            EntityType::Semesters => &mut self.semesters,
            EntityType::Numbers => &mut self.numbers,
        }
    }

    /// First value of `entity_type`, if any.
    pub fn first(&self, entity_type: EntityType) -> Option<&str> {
        self.get(entity_type).first().map(String::as_str)
    }

    /// Total number of values across all types.
    pub fn len(&self) -> usize {
        EntityType::ALL.iter().map(|t| self.get(*t).len()).sum()
    }

    /// Whether no entity of any type was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caller-owned conversation state.
///
/// Only `last_course` and `last_instructor` are interpreted; any other
/// field is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_instructor: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the course discussed in a previous turn.
    pub fn with_last_course<S: Into<String>>(mut self, course: S) -> Self {
        self.last_course = Some(course.into());
        self
    }

    /// Set the instructor discussed in a previous turn.
    pub fn with_last_instructor<S: Into<String>>(mut self, instructor: S) -> Self {
        self.last_instructor = Some(instructor.into());
        self
    }

    /// Last course, ignoring empty values.
    pub fn last_course(&self) -> Option<&str> {
        self.last_course.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Last instructor, ignoring empty values.
    pub fn last_instructor(&self) -> Option<&str> {
        self.last_instructor.as_deref().filter(|s| !s.trim().is_empty())
    }
}
