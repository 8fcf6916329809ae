//! Entity extraction from a single utterance.

use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::entity::heuristic::HeuristicTagger;
use crate::entity::tagger::{LinguisticTagger, TemporalKind};
use crate::entity::types::EntityBag;

lazy_static! {
    /// Two to four uppercase letters followed by three digits, e.g. `CS101`.
    static ref COURSE_CODE: Regex =
        Regex::new(r"\b[A-Z]{2,4}\d{3}\b").expect("Course code pattern should be valid");
    static ref SEMESTER: Regex = Regex::new(r"(?i)(spring|fall|summer|winter)\s*\d{4}")
        .expect("Semester pattern should be valid");
    static ref DEPARTMENT: Regex = Regex::new(
        r"(?i)\b(computer science|mathematics|math|english|physics|business|chemistry|biology|cs|eng|phys|phy|chem|bio)\b"
    )
    .expect("Department pattern should be valid");
}

/// Stateless extractor combining fixed patterns with a [`LinguisticTagger`].
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    tagger: Arc<dyn LinguisticTagger>,
}

impl EntityExtractor {
    /// Create an extractor backed by `tagger`.
    pub fn new(tagger: Arc<dyn LinguisticTagger>) -> Self {
        Self { tagger }
    }

    /// The tagger used for people, times, days and numbers.
    pub fn tagger(&self) -> &dyn LinguisticTagger {
        self.tagger.as_ref()
    }

    /// Extract every entity type from `text`. Pure: same text, same bag.
    pub fn extract(&self, text: &str) -> EntityBag {
        let mut bag = EntityBag::new();

        bag.course_codes = COURSE_CODE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        bag.instructor_names = self.tagger.find_person_mentions(text);

        for expression in self.tagger.find_temporal_expressions(text) {
            match expression.kind {
                TemporalKind::Time => bag.times.push(expression.text),
                TemporalKind::Date => bag.days.push(expression.text),
            }
        }

        bag.numbers = self.tagger.find_numerals(text);

        bag.semesters = SEMESTER
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        for m in DEPARTMENT.find_iter(text) {
            let department = m.as_str().to_lowercase();
            if !bag.departments.contains(&department) {
                bag.departments.push(department);
            }
        }

        debug!(
            "Extracted {} entities with {} tagger",
            bag.len(),
            self.tagger.name()
        );
        bag
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicTagger::new()))
    }
}
