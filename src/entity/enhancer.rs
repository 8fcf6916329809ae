//! Context backfill and entity value normalization.

use log::debug;

use crate::entity::lexicon::normalize_department;
use crate::entity::types::{EntityBag, SessionContext};

/// Fills entity gaps from session context and canonicalizes values.
///
/// Steps run in this order:
///
/// 1. empty `course_codes` ← `context.last_course`
/// 2. empty `instructor_names` ← `context.last_instructor`
/// 3. uppercase every course code
/// 4. map departments to canonical names
///
/// Backfill precedes normalization, so a course code taken from context
/// is uppercased too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextEnhancer;

impl ContextEnhancer {
    /// Create an enhancer.
    pub fn new() -> Self {
        ContextEnhancer
    }

    /// Backfill `entities` from `context`, then canonicalize values.
    pub fn enhance(&self, mut entities: EntityBag, context: &SessionContext) -> EntityBag {
        if entities.course_codes.is_empty() {
            if let Some(course) = context.last_course() {
                debug!("Using course {course} from session context");
                entities.course_codes = vec![course.to_string()];
                entities.from_context = true;
            }
        }

        if entities.instructor_names.is_empty() {
            if let Some(instructor) = context.last_instructor() {
                debug!("Using instructor {instructor} from session context");
                entities.instructor_names = vec![instructor.to_string()];
                entities.from_context = true;
            }
        }

        for code in &mut entities.course_codes {
            *code = code.to_uppercase();
        }

        for department in &mut entities.departments {
            *department = normalize_department(department);
        }

        entities
    }
}
