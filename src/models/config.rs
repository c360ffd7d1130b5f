//! Schedule configuration.
//!
//! Defines the weekly grid the engine places into: teaching days, numbered
//! periods, the clock anchor for period times, and the reserved thesis day.

use serde::{Deserialize, Serialize};

use super::Weekday;

/// The weekly grid and its clock mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Teaching days, in calendar order.
    pub days: Vec<Weekday>,
    /// Period numbers, contiguous from 1.
    pub periods: Vec<u32>,
    /// Start of period 1, minutes past midnight.
    pub start_minutes: u32,
    /// Length of one period in minutes.
    pub period_minutes: u32,
    /// Day reserved for thesis batches.
    pub thesis_day: Weekday,
}

impl Default for ScheduleConfig {
    /// Monday-Friday, seven periods from 08:30, one hour each,
    /// Wednesday reserved for thesis.
    fn default() -> Self {
        Self {
            days: Weekday::ALL.to_vec(),
            periods: (1..=7).collect(),
            start_minutes: 8 * 60 + 30,
            period_minutes: 60,
            thesis_day: Weekday::Wednesday,
        }
    }
}

impl ScheduleConfig {
    /// Highest period number on the grid.
    pub fn max_period(&self) -> u32 {
        self.periods.last().copied().unwrap_or(0)
    }

    /// Earliest acceptable final period for a teaching day.
    ///
    /// A day whose last class ends before this is considered truncated and
    /// gets extended by the duration repair pass. Friday tolerates an
    /// earlier finish.
    pub fn min_final_period(&self, day: Weekday) -> u32 {
        if day.is_friday() {
            2
        } else {
            3
        }
    }

    /// Clock span of a period as (start, end) minutes past midnight.
    pub fn period_span(&self, period: u32) -> (u32, u32) {
        let start = self.start_minutes + (period.saturating_sub(1)) * self.period_minutes;
        (start, start + self.period_minutes)
    }

    /// Formats minutes past midnight as "HH:MM".
    pub fn format_minutes(minutes: u32) -> String {
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let c = ScheduleConfig::default();
        assert_eq!(c.days.len(), 5);
        assert_eq!(c.max_period(), 7);
        assert_eq!(c.thesis_day, Weekday::Wednesday);
    }

    #[test]
    fn test_period_clock() {
        let c = ScheduleConfig::default();
        let (start, end) = c.period_span(1);
        assert_eq!(ScheduleConfig::format_minutes(start), "08:30");
        assert_eq!(ScheduleConfig::format_minutes(end), "09:30");
        let (s3, _) = c.period_span(3);
        assert_eq!(ScheduleConfig::format_minutes(s3), "10:30");
    }

    #[test]
    fn test_min_final_period() {
        let c = ScheduleConfig::default();
        assert_eq!(c.min_final_period(Weekday::Monday), 3);
        assert_eq!(c.min_final_period(Weekday::Friday), 2);
    }
}
