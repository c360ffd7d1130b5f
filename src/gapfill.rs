//! Gap closing and extra-class filling.
//!
//! Two best-effort post-passes over the finished grid:
//!
//! - [`close_gaps`] pulls theory classes from other days into internal
//!   blank periods, so a section's day runs without dead time. Practicals
//!   and thesis entries never move, reserved thesis days are untouched,
//!   and Friday gaps past period 4 stay open.
//! - [`schedule_extra_classes`] fills remaining blank slots with optional
//!   filler sessions, practicals first. Fillers are flagged `is_extra`,
//!   never get a room, and take a teacher only when one is genuinely free.

use std::collections::HashSet;

use log::debug;

use crate::availability::AvailabilityIndex;
use crate::constraints::batch_has_thesis;
use crate::models::{ScheduleConfig, Section, Subject, Teacher, TimetableEntry, Weekday};

/// Latest period a gap fill or move may target.
fn max_fill_period(day: Weekday) -> u32 {
    if day.is_friday() {
        4
    } else {
        6
    }
}

fn distinct_sections(entries: &[TimetableEntry]) -> Vec<Section> {
    let mut sections: Vec<Section> = entries.iter().map(|e| e.section.clone()).collect();
    sections.sort();
    sections.dedup();
    sections
}

fn slot_blank(entries: &[TimetableEntry], section: &Section, day: Weekday, period: u32) -> bool {
    !entries
        .iter()
        .any(|e| e.section == *section && e.day == day && e.period == period)
}

/// Moves theory classes into internal schedule gaps. Returns the number of
/// entries moved.
pub fn close_gaps(
    config: &ScheduleConfig,
    subjects: &[Subject],
    teachers: &[Teacher],
    entries: &mut [TimetableEntry],
    index: &mut AvailabilityIndex,
) -> usize {
    let is_thesis_code = |code: &str| {
        subjects
            .iter()
            .any(|s| s.code == code && s.is_thesis())
    };
    let mut moved = 0;

    for section in distinct_sections(entries) {
        let thesis = batch_has_thesis(subjects, &section.batch);
        for &day in &config.days {
            if thesis && day == config.thesis_day {
                continue;
            }
            let mut periods: Vec<u32> = entries
                .iter()
                .filter(|e| e.section == section && e.day == day && !e.is_extra)
                .map(|e| e.period)
                .collect();
            periods.sort_unstable();
            let (Some(&first), Some(&last)) = (periods.first(), periods.last()) else {
                continue;
            };

            for gap in (first + 1)..last {
                if periods.contains(&gap) || gap > max_fill_period(day) {
                    continue;
                }
                // Donors from the busiest other days first.
                let mut donors: Vec<usize> = entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| {
                        e.section == section
                            && e.day != day
                            && !e.is_practical
                            && !e.is_extra
                            && !is_thesis_code(&e.subject_code)
                    })
                    .map(|(i, _)| i)
                    .collect();
                donors.sort_by_key(|&i| {
                    let src = entries[i].day;
                    std::cmp::Reverse(
                        entries
                            .iter()
                            .filter(|e| e.section == section && e.day == src && !e.is_extra)
                            .count(),
                    )
                });

                for i in donors {
                    if move_into_gap(teachers, entries, index, i, day, gap) {
                        moved += 1;
                        debug!("{section}: gap at {day} period {gap} closed");
                        break;
                    }
                }
            }
        }
    }
    moved
}

/// Relocates one theory entry into a known-blank slot of its own section.
/// The entry's room must follow it; a move that would leave the class
/// roomless is refused.
fn move_into_gap(
    teachers: &[Teacher],
    entries: &mut [TimetableEntry],
    index: &mut AvailabilityIndex,
    idx: usize,
    day: Weekday,
    period: u32,
) -> bool {
    let old = entries[idx].clone();
    let teacher_fits = old.teacher_id.is_some_and(|t| {
        teachers
            .iter()
            .find(|c| c.id == t)
            .is_some_and(|c| c.is_available(day, period))
            && index.teacher_free(t, day, period)
    });
    if !teacher_fits {
        return false;
    }
    if let Some(r) = old.room_id {
        if !index.room_free(r, day, period) {
            return false;
        }
    }
    let duplicate = entries.iter().enumerate().any(|(i, e)| {
        i != idx
            && e.section == old.section
            && e.day == day
            && !e.is_practical
            && e.subject_code == old.subject_code
    });
    if duplicate {
        return false;
    }

    index.release_entry(&old);
    let e = &mut entries[idx];
    e.day = day;
    e.period = period;
    let moved = entries[idx].clone();
    index.mark_entry(&moved);
    true
}

/// Fills remaining blank slots with optional filler sessions. Returns the
/// number of entries added.
pub fn schedule_extra_classes(
    config: &ScheduleConfig,
    subjects: &[Subject],
    teachers: &[Teacher],
    sections: &[Section],
    entries: &mut Vec<TimetableEntry>,
    index: &mut AvailabilityIndex,
) -> usize {
    let mut added = 0;

    for section in sections {
        let thesis = batch_has_thesis(subjects, &section.batch);
        let own: Vec<&Subject> = subjects
            .iter()
            .filter(|s| s.applies_to(&section.batch) && !s.is_thesis())
            .collect();

        // Practicals first: a filler block needs three literal consecutive
        // blank periods, or nothing at all.
        for subject in own.iter().filter(|s| s.is_practical) {
            'day: for &day in &config.days {
                if thesis && day == config.thesis_day {
                    continue;
                }
                let maxp = config.max_period();
                if maxp < 3 {
                    break;
                }
                for start in 1..=maxp - 2 {
                    if !(start..start + 3).all(|p| slot_blank(entries, section, day, p)) {
                        continue;
                    }
                    let teacher = free_teacher(teachers, index, &subject.code, day, start, 3);
                    for p in start..start + 3 {
                        let mut e =
                            TimetableEntry::new(section.clone(), subject.code.as_str(), day, p)
                                .practical()
                                .extra();
                        if let Some(t) = teacher {
                            e = e.with_teacher(t);
                            index.mark_teacher(t, day, p);
                        }
                        entries.push(e);
                    }
                    added += 3;
                    break 'day;
                }
            }
        }

        // Theory fillers: one per blank slot, each subject at most once.
        let mut used: HashSet<String> = HashSet::new();
        for &day in &config.days {
            if thesis && day == config.thesis_day {
                continue;
            }
            for &period in &config.periods {
                if period > max_fill_period(day) {
                    continue;
                }
                if !slot_blank(entries, section, day, period) {
                    continue;
                }
                let candidate = own.iter().find(|s| {
                    !s.is_practical
                        && !used.contains(&s.code)
                        && !entries.iter().any(|e| {
                            e.section == *section
                                && e.day == day
                                && !e.is_practical
                                && e.subject_code == s.code
                        })
                });
                let Some(subject) = candidate else {
                    continue;
                };
                let teacher = free_teacher(teachers, index, &subject.code, day, period, 1);
                let mut e = TimetableEntry::new(section.clone(), subject.code.as_str(), day, period)
                    .extra();
                if let Some(t) = teacher {
                    e = e.with_teacher(t);
                    index.mark_teacher(t, day, period);
                }
                used.insert(subject.code.clone());
                entries.push(e);
                added += 1;
            }
        }
    }
    added
}

/// First qualified teacher free and available across a span, if any.
fn free_teacher(
    teachers: &[Teacher],
    index: &AvailabilityIndex,
    subject_code: &str,
    day: Weekday,
    start: u32,
    len: u32,
) -> Option<u32> {
    teachers
        .iter()
        .find(|t| {
            t.teaches(subject_code)
                && t.is_available_block(day, start, len)
                && index.teacher_free_block(t.id, day, start, len)
        })
        .map(|t| t.id)
}
