//! Academic weekly timetable generation.
//!
//! Builds conflict-free weekly grids for university sections: theory
//! sessions placed per credit hour, practicals as three-period lab blocks,
//! thesis batches pinned to a reserved weekday. The engine is a greedy
//! constructive heuristic with escalating relaxation phases and a fixed
//! suite of repair passes; it always produces a grid, recording anything
//! it could not honor as diagnostics instead of failing.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Subject`, `Teacher`, `Classroom`,
//!   `Section`, `TimetableEntry`, `ScheduleConfig`
//! - **`validation`**: Fail-fast input integrity checks
//! - **`availability`**: O(1) teacher/room occupancy index
//! - **`constraints`**: Stateless placement predicates
//! - **`allocator`**: Lab memoization and building-ranked room search
//! - **`scheduler`**: The generation engine, repair passes, and reporting
//! - **`gapfill`**: Gap closing and optional filler classes
//!
//! # Hard rules
//!
//! Three constraints survive every relaxation phase and every repair pass:
//! teacher unavailability, single occupancy of a section's slot, and
//! thesis-day exclusivity.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod allocator;
pub mod availability;
pub mod constraints;
pub mod gapfill;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use allocator::RoomAllocator;
pub use availability::AvailabilityIndex;
pub use models::{
    Classroom, ScheduleConfig, Section, Subject, Teacher, TimetableEntry, Unavailability, Weekday,
};
pub use scheduler::{
    Conflict, ConflictKind, Diagnostic, DiagnosticKind, GenerationResult, Phase, RunStats,
    TimetableScheduler,
};
pub use validation::{validate_input, ScheduleError};
