//! Teaching weekday.
//!
//! The scheduling grid runs Monday through Friday. Friday is special-cased
//! throughout the engine (shorter teaching window, prayer-break cutoffs), so
//! the type exposes an explicit `is_friday` query rather than leaving callers
//! to compare variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A teaching day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All teaching days in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Zero-based calendar index (Monday = 0).
    pub fn index(self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
        }
    }

    /// Whether this is the shortened Friday teaching day.
    pub fn is_friday(self) -> bool {
        self == Weekday::Friday
    }

    /// Three-letter abbreviation ("Mon", "Tue", ...).
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_calendar() {
        assert!(Weekday::Monday < Weekday::Friday);
        assert_eq!(Weekday::ALL[Weekday::Wednesday.index()], Weekday::Wednesday);
    }

    #[test]
    fn test_friday_flag() {
        assert!(Weekday::Friday.is_friday());
        assert!(!Weekday::Thursday.is_friday());
    }

    #[test]
    fn test_display() {
        assert_eq!(Weekday::Tuesday.to_string(), "Tuesday");
        assert_eq!(Weekday::Tuesday.short_name(), "Tue");
    }
}
