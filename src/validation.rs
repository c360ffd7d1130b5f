//! Input validation for timetable generation.
//!
//! Checks structural integrity of the configuration, subjects, teachers,
//! rooms and sections before any placement happens. Malformed input fails
//! fast with a [`ScheduleError`]; anything recoverable (an unschedulable
//! subject, a missing room at one slot) is reported later as a diagnostic,
//! never here.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Classroom, ScheduleConfig, Section, Subject, Teacher};

/// A fatal input defect. Generation never starts once one is found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The configuration lists no teaching days.
    #[error("schedule configuration has no teaching days")]
    EmptyDays,
    /// The configuration lists no periods.
    #[error("schedule configuration has no periods")]
    EmptyPeriods,
    /// Periods must run 1, 2, 3, ... without holes.
    #[error("periods must be contiguous starting at 1, got {0:?}")]
    NonContiguousPeriods(Vec<u32>),
    /// Two entities of the same kind share an identifier.
    #[error("duplicate {kind} identifier: {id}")]
    DuplicateId {
        /// Entity kind ("subject", "teacher", "room", "section").
        kind: &'static str,
        /// The offending identifier.
        id: String,
    },
    /// A teacher is assigned to a subject code that does not exist.
    #[error("teacher {teacher} references unknown subject code {code}")]
    UnknownSubjectReference {
        /// Teacher display name.
        teacher: String,
        /// The unknown code.
        code: String,
    },
    /// Practical subjects are present but no lab exists to host them.
    #[error("practical subjects present but no lab room is defined")]
    MissingLab,
}

/// Validates the input set for a generation run.
///
/// Checks, in order:
/// 1. Non-empty day and period lists; periods contiguous from 1
/// 2. No duplicate subject (code, kind) pairs, teacher IDs, room IDs,
///    or section labels
/// 3. Every teacher's subject codes resolve to a known subject
/// 4. At least one lab exists when any practical subject is present
///
/// Returns the first defect found.
pub fn validate_input(
    config: &ScheduleConfig,
    subjects: &[Subject],
    teachers: &[Teacher],
    rooms: &[Classroom],
    sections: &[Section],
) -> Result<(), ScheduleError> {
    if config.days.is_empty() {
        return Err(ScheduleError::EmptyDays);
    }
    if config.periods.is_empty() {
        return Err(ScheduleError::EmptyPeriods);
    }
    for (i, p) in config.periods.iter().enumerate() {
        if *p != (i as u32) + 1 {
            return Err(ScheduleError::NonContiguousPeriods(config.periods.clone()));
        }
    }

    // A code may appear twice only as a theory/practical pair.
    let mut subject_keys = HashSet::new();
    for s in subjects {
        if !subject_keys.insert((s.code.as_str(), s.is_practical)) {
            return Err(ScheduleError::DuplicateId {
                kind: "subject",
                id: s.code.clone(),
            });
        }
    }

    let mut teacher_ids = HashSet::new();
    for t in teachers {
        if !teacher_ids.insert(t.id) {
            return Err(ScheduleError::DuplicateId {
                kind: "teacher",
                id: t.id.to_string(),
            });
        }
    }

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id) {
            return Err(ScheduleError::DuplicateId {
                kind: "room",
                id: r.id.to_string(),
            });
        }
    }

    let mut section_labels = HashSet::new();
    for s in sections {
        if !section_labels.insert(s.to_string()) {
            return Err(ScheduleError::DuplicateId {
                kind: "section",
                id: s.to_string(),
            });
        }
    }

    let known_codes: HashSet<&str> = subjects.iter().map(|s| s.code.as_str()).collect();
    for t in teachers {
        for code in &t.subjects {
            if !known_codes.contains(code.as_str()) {
                return Err(ScheduleError::UnknownSubjectReference {
                    teacher: t.name.clone(),
                    code: code.clone(),
                });
            }
        }
    }

    let any_practical = subjects.iter().any(|s| s.is_practical);
    let any_lab = rooms.iter().any(|r| r.is_lab);
    if any_practical && !any_lab {
        return Err(ScheduleError::MissingLab);
    }

    Ok(())
}
