//! Placement constraint checks.
//!
//! Stateless predicates over an explicit working set of entries plus the
//! availability index. Rule precedence, in evaluation order:
//!
//! 1. The section's slot must be empty
//! 2. Some qualified teacher must be free (index) and available
//!    (declared unavailability, zero tolerance)
//! 3. Thesis-day exclusivity, both directions, at batch level
//! 4. No duplicate theory session of the same subject on one day
//!
//! Rules 1-3 are hard and survive every relaxation phase. Rule 4 is never
//! relaxed during placement; the duplicate-elimination repair pass defends
//! it when later passes reintroduce duplicates.

use crate::availability::AvailabilityIndex;
use crate::models::{ScheduleConfig, Section, Subject, Teacher, TimetableEntry, Weekday};

/// Shared inputs for placement checks.
#[derive(Clone, Copy)]
pub struct PlacementCtx<'a> {
    /// Grid configuration.
    pub config: &'a ScheduleConfig,
    /// All subjects in the run.
    pub subjects: &'a [Subject],
    /// All teachers in the run.
    pub teachers: &'a [Teacher],
    /// Global occupancy index.
    pub index: &'a AvailabilityIndex,
}

/// Whether a batch has a thesis subject, making its thesis day exclusive.
pub fn batch_has_thesis(subjects: &[Subject], batch: &str) -> bool {
    subjects.iter().any(|s| s.applies_to(batch) && s.is_thesis())
}

/// Whether the section has no entry at the slot.
pub fn section_slot_free(
    entries: &[TimetableEntry],
    section: &Section,
    day: Weekday,
    period: u32,
) -> bool {
    !entries
        .iter()
        .any(|e| e.section == *section && e.day == day && e.period == period)
}

/// Whether some teacher of the subject is both free per the index and
/// available per their declared unavailability for the whole block.
pub fn some_teacher_available(
    teachers: &[Teacher],
    index: &AvailabilityIndex,
    subject_code: &str,
    day: Weekday,
    start: u32,
    len: u32,
) -> bool {
    teachers.iter().any(|t| {
        t.teaches(subject_code)
            && t.is_available_block(day, start, len)
            && index.teacher_free_block(t.id, day, start, len)
    })
}

/// Thesis-day exclusivity for one candidate placement.
///
/// For a thesis batch: thesis entries belong on the thesis day and nothing
/// else does. Non-thesis batches are unrestricted.
pub fn thesis_day_ok(
    config: &ScheduleConfig,
    subjects: &[Subject],
    section: &Section,
    subject: &Subject,
    day: Weekday,
) -> bool {
    if !batch_has_thesis(subjects, &section.batch) {
        return true;
    }
    if subject.is_thesis() {
        day == config.thesis_day
    } else {
        day != config.thesis_day
    }
}

/// Whether placing a theory session would not duplicate the subject on
/// that day. Practicals are exempt; their three block entries share a day
/// by definition.
pub fn no_duplicate_theory(
    entries: &[TimetableEntry],
    section: &Section,
    subject: &Subject,
    day: Weekday,
) -> bool {
    if subject.is_practical {
        return true;
    }
    !entries.iter().any(|e| {
        e.section == *section && e.day == day && e.subject_code == subject.code && !e.is_practical
    })
}

/// Full placement check for a single theory period.
pub fn can_place(
    ctx: PlacementCtx<'_>,
    entries: &[TimetableEntry],
    section: &Section,
    subject: &Subject,
    day: Weekday,
    period: u32,
) -> bool {
    section_slot_free(entries, section, day, period)
        && some_teacher_available(ctx.teachers, ctx.index, &subject.code, day, period, 1)
        && thesis_day_ok(ctx.config, ctx.subjects, section, subject, day)
        && no_duplicate_theory(entries, section, subject, day)
}

/// Full placement check for a consecutive block (practical sessions).
pub fn can_place_block(
    ctx: PlacementCtx<'_>,
    entries: &[TimetableEntry],
    section: &Section,
    subject: &Subject,
    day: Weekday,
    start: u32,
    len: u32,
) -> bool {
    if start + len - 1 > ctx.config.max_period() {
        return false;
    }
    (start..start + len).all(|p| section_slot_free(entries, section, day, p))
        && some_teacher_available(ctx.teachers, ctx.index, &subject.code, day, start, len)
        && thesis_day_ok(ctx.config, ctx.subjects, section, subject, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_parts() -> (ScheduleConfig, Vec<Subject>, Vec<Teacher>) {
        let config = ScheduleConfig::default();
        let subjects = vec![
            Subject::new("SW-316", "SPM", 3).with_batch("21SW"),
            Subject::new("SW-317", "DB Lab", 1).practical().with_batch("21SW"),
        ];
        let teachers = vec![
            Teacher::new(1, "Dr. Shah").with_subject("SW-316"),
            Teacher::new(2, "Ms. Memon").with_subject("SW-317"),
        ];
        (config, subjects, teachers)
    }

    #[test]
    fn test_rule_order_slot_occupancy_first() {
        let (config, subjects, teachers) = ctx_parts();
        let index = AvailabilityIndex::new();
        let ctx = PlacementCtx {
            config: &config,
            subjects: &subjects,
            teachers: &teachers,
            index: &index,
        };
        let section = Section::new("21SW", "I");
        let occupied =
            vec![TimetableEntry::new(section.clone(), "SW-316", Weekday::Monday, 1).with_teacher(1)];

        assert!(!can_place(ctx, &occupied, &section, &subjects[0], Weekday::Monday, 1));
        assert!(can_place(ctx, &occupied, &section, &subjects[0], Weekday::Tuesday, 1));
    }

    #[test]
    fn test_teacher_unavailability_blocks_placement() {
        let (config, subjects, _) = ctx_parts();
        let teachers =
            vec![Teacher::new(1, "Dr. Shah").with_subject("SW-316").with_unavailable_day(Weekday::Monday)];
        let index = AvailabilityIndex::new();
        let ctx = PlacementCtx {
            config: &config,
            subjects: &subjects,
            teachers: &teachers,
            index: &index,
        };
        let section = Section::new("21SW", "I");
        assert!(!can_place(ctx, &[], &section, &subjects[0], Weekday::Monday, 1));
        assert!(can_place(ctx, &[], &section, &subjects[0], Weekday::Tuesday, 1));
    }

    #[test]
    fn test_duplicate_theory_blocked() {
        let (config, subjects, teachers) = ctx_parts();
        let index = AvailabilityIndex::new();
        let ctx = PlacementCtx {
            config: &config,
            subjects: &subjects,
            teachers: &teachers,
            index: &index,
        };
        let section = Section::new("21SW", "I");
        let entries =
            vec![TimetableEntry::new(section.clone(), "SW-316", Weekday::Monday, 1).with_teacher(1)];

        assert!(!can_place(ctx, &entries, &section, &subjects[0], Weekday::Monday, 3));
    }

    #[test]
    fn test_thesis_day_exclusive_both_directions() {
        let (config, mut subjects, mut teachers) = ctx_parts();
        subjects.push(Subject::new("SW-499", "Thesis", 0).with_batch("21SW"));
        teachers.push(Teacher::new(3, "Coordinator").with_subject("SW-499"));
        let index = AvailabilityIndex::new();
        let ctx = PlacementCtx {
            config: &config,
            subjects: &subjects,
            teachers: &teachers,
            index: &index,
        };
        let section = Section::new("21SW", "I");

        // Non-thesis kept off Wednesday, thesis kept on it.
        assert!(!can_place(ctx, &[], &section, &subjects[0], Weekday::Wednesday, 1));
        assert!(thesis_day_ok(&config, &subjects, &section, &subjects[2], Weekday::Wednesday));
        assert!(!thesis_day_ok(&config, &subjects, &section, &subjects[2], Weekday::Monday));
    }

    #[test]
    fn test_block_respects_grid_edge() {
        let (config, subjects, teachers) = ctx_parts();
        let index = AvailabilityIndex::new();
        let ctx = PlacementCtx {
            config: &config,
            subjects: &subjects,
            teachers: &teachers,
            index: &index,
        };
        let section = Section::new("21SW", "I");
        assert!(can_place_block(ctx, &[], &section, &subjects[1], Weekday::Monday, 5, 3));
        assert!(!can_place_block(ctx, &[], &section, &subjects[1], Weekday::Monday, 6, 3));
    }

    #[test]
    fn test_busy_teacher_blocks_block_placement() {
        let (config, subjects, teachers) = ctx_parts();
        let mut index = AvailabilityIndex::new();
        index.mark_teacher(2, Weekday::Monday, 2);
        let ctx = PlacementCtx {
            config: &config,
            subjects: &subjects,
            teachers: &teachers,
            index: &index,
        };
        let section = Section::new("21SW", "I");
        assert!(!can_place_block(ctx, &[], &section, &subjects[1], Weekday::Monday, 1, 3));
        assert!(can_place_block(ctx, &[], &section, &subjects[1], Weekday::Monday, 3, 3));
    }
}
