//! Teacher model.
//!
//! Teachers carry the subject codes they can teach and a per-day
//! unavailability map. Unavailability is a hard constraint with zero
//! tolerance: no phase of the engine, however desperate, may place a teacher
//! into a period they have declared unavailable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Weekday;

/// Declared unavailability for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unavailability {
    /// The teacher cannot teach at all on this day.
    AllDay,
    /// The teacher cannot teach during these periods.
    Periods(Vec<u32>),
}

/// A teaching staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Codes of the subjects this teacher is assigned to.
    pub subjects: Vec<String>,
    /// Days and periods the teacher has declared unavailable.
    pub unavailable: HashMap<Weekday, Unavailability>,
}

impl Teacher {
    /// Creates a teacher with no subject assignments and full availability.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            subjects: Vec::new(),
            unavailable: HashMap::new(),
        }
    }

    /// Assigns a subject code to this teacher.
    pub fn with_subject(mut self, code: impl Into<String>) -> Self {
        self.subjects.push(code.into());
        self
    }

    /// Blocks out an entire day.
    pub fn with_unavailable_day(mut self, day: Weekday) -> Self {
        self.unavailable.insert(day, Unavailability::AllDay);
        self
    }

    /// Blocks out specific periods on a day.
    pub fn with_unavailable_periods(mut self, day: Weekday, periods: Vec<u32>) -> Self {
        self.unavailable.insert(day, Unavailability::Periods(periods));
        self
    }

    /// Whether this teacher is assigned to the given subject code.
    pub fn teaches(&self, code: &str) -> bool {
        self.subjects.iter().any(|c| c == code)
    }

    /// Whether the teacher may teach at the given slot per their
    /// declared unavailability.
    pub fn is_available(&self, day: Weekday, period: u32) -> bool {
        match self.unavailable.get(&day) {
            None => true,
            Some(Unavailability::AllDay) => false,
            Some(Unavailability::Periods(ps)) => !ps.contains(&period),
        }
    }

    /// Availability across a consecutive block of periods.
    pub fn is_available_block(&self, day: Weekday, start: u32, len: u32) -> bool {
        (start..start + len).all(|p| self.is_available(day, p))
    }

    /// Whether the teacher has any declared unavailability.
    ///
    /// Constrained teachers are scheduled with priority: their feasible
    /// windows shrink fastest as the grid fills.
    pub fn is_constrained(&self) -> bool {
        !self.unavailable.is_empty()
    }
}
