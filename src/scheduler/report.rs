//! Run quality reporting.
//!
//! A defensive conflict sweep over the final entry set plus summary
//! statistics: compaction (how early section days finish) and credit-hour
//! compliance. The sweep should find nothing; it exists so that a
//! constraint regression surfaces in the result instead of silently
//! shipping a broken grid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Section, Subject, TimetableEntry, Weekday};

/// A double-booking found by the post-run sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// What kind of clash this is.
    pub kind: ConflictKind,
    /// Day of the clash.
    pub day: Weekday,
    /// Period of the clash.
    pub period: u32,
    /// Human-readable description.
    pub detail: String,
}

/// Clash categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// One teacher in two places at once.
    TeacherDoubleBooked,
    /// One room holding two classes at once.
    RoomDoubleBooked,
    /// One section with two classes at once.
    SectionOverlap,
}

/// Summary statistics for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Total entries in the final grid, filler classes included.
    pub total_entries: usize,
    /// Sections processed.
    pub sections: usize,
    /// Mean final period across all (section, day) pairs with classes.
    pub average_last_period: f64,
    /// Latest final period anywhere on the grid.
    pub max_last_period: u32,
    /// Section-days finishing by period 4.
    pub early_finish_days: usize,
    /// Section-days finishing exactly at period 5.
    pub medium_finish_days: usize,
    /// Section-days running past period 5.
    pub late_finish_days: usize,
    /// Percentage of (section, subject) pairs at their exact session quota.
    pub credit_compliance_pct: f64,
}

/// Sweeps the final entry set for double-bookings.
pub fn sweep_conflicts(entries: &[TimetableEntry]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    let mut by_teacher: HashMap<(u32, Weekday, u32), usize> = HashMap::new();
    let mut by_room: HashMap<(u32, Weekday, u32), usize> = HashMap::new();
    let mut by_section: HashMap<(String, Weekday, u32), usize> = HashMap::new();

    for e in entries {
        if let Some(t) = e.teacher_id {
            *by_teacher.entry((t, e.day, e.period)).or_insert(0) += 1;
        }
        if let Some(r) = e.room_id {
            *by_room.entry((r, e.day, e.period)).or_insert(0) += 1;
        }
        *by_section
            .entry((e.section.to_string(), e.day, e.period))
            .or_insert(0) += 1;
    }

    for ((t, day, period), n) in by_teacher {
        if n > 1 {
            conflicts.push(Conflict {
                kind: ConflictKind::TeacherDoubleBooked,
                day,
                period,
                detail: format!("teacher {t} booked {n} times"),
            });
        }
    }
    for ((r, day, period), n) in by_room {
        if n > 1 {
            conflicts.push(Conflict {
                kind: ConflictKind::RoomDoubleBooked,
                day,
                period,
                detail: format!("room {r} booked {n} times"),
            });
        }
    }
    for ((s, day, period), n) in by_section {
        if n > 1 {
            conflicts.push(Conflict {
                kind: ConflictKind::SectionOverlap,
                day,
                period,
                detail: format!("section {s} holds {n} classes"),
            });
        }
    }

    conflicts
}

impl RunStats {
    /// Computes run statistics from the final entry set.
    ///
    /// Filler classes count toward the total but are excluded from both
    /// the compaction and compliance figures; thesis subjects are outside
    /// the credit ledger entirely.
    pub fn calculate(
        subjects: &[Subject],
        sections: &[Section],
        entries: &[TimetableEntry],
    ) -> Self {
        let mut last_by_day: HashMap<(String, Weekday), u32> = HashMap::new();
        for e in entries.iter().filter(|e| !e.is_extra) {
            let key = (e.section.to_string(), e.day);
            let last = last_by_day.entry(key).or_insert(0);
            *last = (*last).max(e.period);
        }

        let mut early = 0;
        let mut medium = 0;
        let mut late = 0;
        let mut sum = 0u64;
        let mut max_last = 0u32;
        for &last in last_by_day.values() {
            match last {
                0..=4 => early += 1,
                5 => medium += 1,
                _ => late += 1,
            }
            sum += u64::from(last);
            max_last = max_last.max(last);
        }
        let average_last_period = if last_by_day.is_empty() {
            0.0
        } else {
            sum as f64 / last_by_day.len() as f64
        };

        let mut pairs = 0usize;
        let mut compliant = 0usize;
        for section in sections {
            for subject in subjects
                .iter()
                .filter(|s| s.applies_to(&section.batch) && !s.is_thesis())
            {
                let count = entries
                    .iter()
                    .filter(|e| {
                        e.section == *section
                            && e.subject_code == subject.code
                            && e.is_practical == subject.is_practical
                            && !e.is_extra
                    })
                    .count();
                // A practical block shows up as three grid entries.
                let target = if subject.is_practical {
                    3
                } else {
                    subject.credits as usize
                };
                pairs += 1;
                if count == target {
                    compliant += 1;
                }
            }
        }
        let credit_compliance_pct = if pairs == 0 {
            100.0
        } else {
            compliant as f64 * 100.0 / pairs as f64
        };

        Self {
            total_entries: entries.len(),
            sections: sections.len(),
            average_last_period,
            max_last_period: max_last,
            early_finish_days: early,
            medium_finish_days: medium,
            late_finish_days: late,
            credit_compliance_pct,
        }
    }
}
