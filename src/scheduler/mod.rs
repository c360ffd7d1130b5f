//! The timetable generation engine.
//!
//! # Algorithm
//!
//! `TimetableScheduler` is a constructive greedy heuristic with escalating
//! search phases and a fixed suite of repair passes. Each section is built
//! independently: practicals first (three-period lab blocks), then theory
//! sessions ordered by teacher constraints and credits, each placed at the
//! best-scoring feasible slot. When the normal phase runs dry the engine
//! escalates to aggressive, then emergency relaxations; it never retreats
//! to a lower phase within a section.
//!
//! After placement, six repair passes run in fixed order: daily-duration
//! redistribution, Friday time-limit enforcement, minimum daily classes,
//! credit-hour correction, duplicate-theory elimination, and thesis-day
//! cleanup. Hard constraints (teacher unavailability, slot occupancy,
//! thesis exclusivity) survive every phase and every pass.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

mod engine;
mod repair;
mod report;

pub use engine::{Diagnostic, DiagnosticKind, GenerationResult, Phase, TimetableScheduler};
pub use report::{Conflict, ConflictKind, RunStats};
