//! Timetable entry.
//!
//! One placed class: a (section, day, period) cell holding a subject, with
//! an optional teacher and room. Thesis placeholders carry neither; filler
//! classes added after the main run are flagged `is_extra` and never carry
//! a room.

use serde::{Deserialize, Serialize};

use super::{ScheduleConfig, Section, Weekday};

/// A single cell of a section's weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Teaching day.
    pub day: Weekday,
    /// Period number on the grid.
    pub period: u32,
    /// Code of the subject taught.
    pub subject_code: String,
    /// Assigned teacher. `None` for thesis placeholders and unstaffed
    /// filler classes.
    pub teacher_id: Option<u32>,
    /// Assigned room. `None` for thesis placeholders, filler classes and
    /// sessions the allocator could not house.
    pub room_id: Option<u32>,
    /// Section the entry belongs to.
    pub section: Section,
    /// Part of a practical lab block.
    pub is_practical: bool,
    /// Added by the extra-class filler, outside the credit-hour ledger.
    pub is_extra: bool,
}

impl TimetableEntry {
    /// Creates a theory entry with no teacher or room assigned yet.
    pub fn new(
        section: Section,
        subject_code: impl Into<String>,
        day: Weekday,
        period: u32,
    ) -> Self {
        Self {
            day,
            period,
            subject_code: subject_code.into(),
            teacher_id: None,
            room_id: None,
            section,
            is_practical: false,
            is_extra: false,
        }
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher_id: u32) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: u32) -> Self {
        self.room_id = Some(room_id);
        self
    }

    /// Marks the entry as part of a practical block.
    pub fn practical(mut self) -> Self {
        self.is_practical = true;
        self
    }

    /// Marks the entry as a filler class.
    pub fn extra(mut self) -> Self {
        self.is_extra = true;
        self
    }

    /// Wall-clock start, formatted "HH:MM".
    pub fn start_time(&self, config: &ScheduleConfig) -> String {
        ScheduleConfig::format_minutes(config.period_span(self.period).0)
    }

    /// Wall-clock end, formatted "HH:MM".
    pub fn end_time(&self, config: &ScheduleConfig) -> String {
        ScheduleConfig::format_minutes(config.period_span(self.period).1)
    }
}
