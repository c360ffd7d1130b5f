//! Section model.
//!
//! A section is one student group within a batch, e.g. batch "21SW" split
//! into sections I, II and III. Sections are the unit of scheduling: each
//! gets its own weekly grid, while batch-level rules (thesis day) apply
//! to all of a batch's sections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One student group, identified as `<batch>-<letter>`, e.g. "21SW-I".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Section {
    /// Batch name, e.g. "21SW".
    pub batch: String,
    /// Section designator within the batch, e.g. "I" or "II".
    pub letter: String,
}

impl Section {
    /// Creates a section.
    pub fn new(batch: impl Into<String>, letter: impl Into<String>) -> Self {
        Self {
            batch: batch.into(),
            letter: letter.into(),
        }
    }

    /// Parses a `<batch>-<letter>` label. The split is at the last hyphen,
    /// so hyphenated batch names survive.
    pub fn parse(label: &str) -> Option<Self> {
        let (batch, letter) = label.rsplit_once('-')?;
        if batch.is_empty() || letter.is_empty() {
            return None;
        }
        Some(Self::new(batch, letter))
    }

    /// Expands a batch into sections "I", "II", ... for a section count.
    pub fn expand_batch(batch: &str, count: usize) -> Vec<Self> {
        const ROMAN: [&str; 6] = ["I", "II", "III", "IV", "V", "VI"];
        ROMAN
            .iter()
            .take(count.min(ROMAN.len()))
            .map(|letter| Self::new(batch, *letter))
            .collect()
    }

    /// Leading intake-year digits of the batch name, if present.
    pub fn intake_year(&self) -> Option<u32> {
        let digits: String = self.batch.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.batch, self.letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let s = Section::new("21SW", "I");
        assert_eq!(s.to_string(), "21SW-I");
        assert_eq!(Section::parse("21SW-I"), Some(s));
        assert_eq!(Section::parse("21SW"), None);
    }

    #[test]
    fn test_expand_batch() {
        let sections = Section::expand_batch("22SW", 3);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].to_string(), "22SW-III");
    }

    #[test]
    fn test_intake_year() {
        assert_eq!(Section::new("21SW", "I").intake_year(), Some(21));
        assert_eq!(Section::new("SW", "I").intake_year(), None);
    }
}
