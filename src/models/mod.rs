//! Domain models for academic timetabling.
//!
//! The vocabulary maps onto the university week as follows:
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Weekday`] | Teaching day, Monday through Friday |
//! | [`ScheduleConfig`] | The weekly grid: days, periods, clock anchor, thesis day |
//! | [`Subject`] | A course offering (theory, practical, or thesis) |
//! | [`Teacher`] | Staff member with subject assignments and unavailability |
//! | [`Classroom`] | A room, either a lab or a ranked regular classroom |
//! | [`Section`] | One student group within a batch, e.g. "21SW-I" |
//! | [`TimetableEntry`] | A placed class: one (section, day, period) cell |

mod classroom;
mod config;
mod entry;
mod section;
mod subject;
mod teacher;
mod weekday;

pub use classroom::Classroom;
pub use config::ScheduleConfig;
pub use entry::TimetableEntry;
pub use section::Section;
pub use subject::Subject;
pub use teacher::{Teacher, Unavailability};
pub use weekday::Weekday;
