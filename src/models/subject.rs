//! Subject model.
//!
//! A subject is one course offering for a batch: either a theory course that
//! meets once per credit hour per week, or a practical (lab) course that
//! meets as a single three-period block regardless of credits. Thesis work
//! is a degenerate subject recognized by name; it pins an entire weekday and
//! needs neither teacher nor room.

use serde::{Deserialize, Serialize};

/// A course offering to be placed on the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Course code, e.g. "SW-316".
    pub code: String,
    /// Full course title.
    pub name: String,
    /// Credit hours. Determines weekly theory sessions.
    pub credits: u32,
    /// Practical courses occupy one three-period lab block per week.
    pub is_practical: bool,
    /// Owning batch (e.g. "21SW"). `None` means the subject applies to
    /// every section in the run.
    pub batch: Option<String>,
}

impl Subject {
    /// Creates a theory subject.
    pub fn new(code: impl Into<String>, name: impl Into<String>, credits: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            credits,
            is_practical: false,
            batch: None,
        }
    }

    /// Marks the subject as a practical (lab) course.
    pub fn practical(mut self) -> Self {
        self.is_practical = true;
        self
    }

    /// Sets the owning batch.
    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    /// Whether this subject is thesis/project work.
    ///
    /// Detection is by substring: a code or title containing "thesis"
    /// (case-insensitive) marks the subject, and through it the whole batch,
    /// as thesis-bearing.
    pub fn is_thesis(&self) -> bool {
        let needle = "thesis";
        self.code.to_ascii_lowercase().contains(needle)
            || self.name.to_ascii_lowercase().contains(needle)
    }

    /// Weekly grid sessions this subject is owed.
    ///
    /// A practical counts as one session (the block), a theory subject as
    /// one session per credit hour.
    pub fn weekly_sessions(&self) -> u32 {
        if self.is_practical {
            1
        } else {
            self.credits
        }
    }

    /// Whether this subject applies to a given batch.
    pub fn applies_to(&self, batch: &str) -> bool {
        match &self.batch {
            Some(b) => b == batch,
            None => true,
        }
    }
}
