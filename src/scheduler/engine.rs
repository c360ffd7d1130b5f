//! Placement engine.
//!
//! Builds each section's grid with a greedy best-slot heuristic, escalating
//! through [`Phase`]s when the current rules cannot seat a session. Teacher
//! unavailability is honored in every phase; relaxation only widens the slot
//! window and, at the last resort, the pool of substitute teachers.

use std::cmp::Reverse;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::allocator::RoomAllocator;
use crate::availability::AvailabilityIndex;
use crate::constraints::{
    can_place_block, no_duplicate_theory, section_slot_free, some_teacher_available,
    thesis_day_ok, PlacementCtx,
};
use crate::gapfill;
use crate::models::{
    Classroom, ScheduleConfig, Section, Subject, Teacher, TimetableEntry, Weekday,
};
use crate::scheduler::repair;
use crate::scheduler::report::{self, Conflict, RunStats};
use crate::validation::{validate_input, ScheduleError};

/// Search phase for one section. Escalation is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Preferred slots only: periods 1-5, Friday within its theory cutoff.
    Normal,
    /// Friday up to period 5 and substitute teachers allowed.
    Aggressive,
    /// The whole grid and any available teacher.
    Emergency,
}

impl Phase {
    /// The next harsher phase, or `None` from `Emergency`.
    pub fn escalate(self) -> Option<Phase> {
        match self {
            Phase::Normal => Some(Phase::Aggressive),
            Phase::Aggressive => Some(Phase::Emergency),
            Phase::Emergency => None,
        }
    }
}

/// A recoverable condition recorded during generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Condition category.
    pub kind: DiagnosticKind,
    /// Affected section.
    pub section: Section,
    /// Affected subject code, when one is involved.
    pub subject: Option<String>,
    /// Human-readable context.
    pub detail: String,
}

/// Categories of recoverable conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A session could not be seated even in the emergency phase.
    UnscheduledSubject,
    /// A session was seated without a room.
    NoResourceAvailable,
    /// A Friday entry past the cutoff could not be relocated.
    FridayLimitKept,
    /// The credit ledger was corrected after placement.
    CreditCorrection,
    /// A day stayed below the minimum class count.
    MinimumDailyUnresolved,
    /// A same-day duplicate could not be redistributed.
    DuplicateTheoryUnresolved,
}

/// Output of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// The generated grid, filler classes included.
    pub entries: Vec<TimetableEntry>,
    /// Everything the engine had to work around.
    pub diagnostics: Vec<Diagnostic>,
    /// Double-bookings found by the post-run sweep. Expected empty.
    pub conflicts: Vec<Conflict>,
    /// Summary statistics.
    pub stats: RunStats,
}

/// The timetable generation engine.
///
/// Owns its inputs for the duration of a run; `generate` consumes the
/// scheduler so a run cannot be replayed against mutated state.
#[derive(Debug, Clone)]
pub struct TimetableScheduler {
    config: ScheduleConfig,
    subjects: Vec<Subject>,
    teachers: Vec<Teacher>,
    rooms: Vec<Classroom>,
    sections: Vec<Section>,
    committed: Vec<TimetableEntry>,
    seed: u64,
}

impl TimetableScheduler {
    /// Creates a scheduler over the given inputs with seed 0.
    pub fn new(
        config: ScheduleConfig,
        subjects: Vec<Subject>,
        teachers: Vec<Teacher>,
        rooms: Vec<Classroom>,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            config,
            subjects,
            teachers,
            rooms,
            sections,
            committed: Vec::new(),
            seed: 0,
        }
    }

    /// Sets the RNG seed. Equal seeds over equal inputs give equal output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Seeds teacher and room occupancy from already-committed entries,
    /// typically another semester sharing the same staff and rooms.
    pub fn with_committed_entries(mut self, entries: Vec<TimetableEntry>) -> Self {
        self.committed = entries;
        self
    }

    /// Runs the full pipeline: validation, per-section placement and
    /// repairs, gap closing, extra-class filling, then the conflict sweep
    /// and statistics.
    pub fn generate(self) -> Result<GenerationResult, ScheduleError> {
        validate_input(
            &self.config,
            &self.subjects,
            &self.teachers,
            &self.rooms,
            &self.sections,
        )?;

        let TimetableScheduler {
            config,
            subjects,
            teachers,
            rooms,
            mut sections,
            committed,
            seed,
        } = self;

        sections.sort();
        let mut batches: Vec<String> = sections.iter().map(|s| s.batch.clone()).collect();
        batches.sort();
        batches.dedup();

        let mut index = AvailabilityIndex::new();
        index.seed_from_entries(&committed);
        let mut allocator = RoomAllocator::new(&rooms);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut all_entries: Vec<TimetableEntry> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        for section in &sections {
            let mut entries = schedule_section(
                &config,
                &subjects,
                &teachers,
                &mut allocator,
                &mut index,
                &batches,
                &mut rng,
                section,
                &mut diagnostics,
            );
            let mut rctx = repair::RepairCtx {
                config: &config,
                subjects: &subjects,
                teachers: &teachers,
                allocator: &mut allocator,
                index: &mut index,
                batches: &batches,
                rng: &mut rng,
            };
            repair::run_section(&mut rctx, section, &mut entries, &mut diagnostics);
            info!("section {section}: {} entries placed", entries.len());
            all_entries.extend(entries);
        }

        let moved = gapfill::close_gaps(&config, &subjects, &teachers, &mut all_entries, &mut index);
        let added = gapfill::schedule_extra_classes(
            &config,
            &subjects,
            &teachers,
            &sections,
            &mut all_entries,
            &mut index,
        );
        debug!("gap filler moved {moved} entries, added {added} extra classes");

        let conflicts = report::sweep_conflicts(&all_entries);
        if !conflicts.is_empty() {
            warn!("post-run sweep found {} conflicts", conflicts.len());
        }
        let stats = RunStats::calculate(&subjects, &sections, &all_entries);

        Ok(GenerationResult {
            entries: all_entries,
            diagnostics,
            conflicts,
            stats,
        })
    }
}

/// Candidate slot with its desirability score. Lower is better.
struct SlotCand {
    day: Weekday,
    period: u32,
    score: f64,
}

/// Friday theory cutoff for a section, derived from its Friday practical.
///
/// No practical: theory stops at period 3. A practical starting at 5 or
/// later leaves room through period 4; one starting at 4 pushes theory back
/// to period 3; an earlier block caps theory just before it.
pub(crate) fn friday_theory_cutoff(entries: &[TimetableEntry], section: &Section) -> u32 {
    let practical_start = entries
        .iter()
        .filter(|e| e.section == *section && e.day.is_friday() && e.is_practical && !e.is_extra)
        .map(|e| e.period)
        .min();
    match practical_start {
        None => 3,
        Some(start) if start >= 5 => 4,
        Some(4) => 3,
        Some(start) => start.saturating_sub(1).max(1),
    }
}

/// Desirability of a theory slot. Base cost is the period number; Mon-Thu
/// and morning slots get small bonuses, Friday slots past the cutoff get
/// prohibitive penalties.
///
/// When a Friday practical sets the cutoff, every period beyond it collides
/// with the lab block and carries the full penalty. Without a practical the
/// first period over the line is merely strongly discouraged.
fn slot_score(day: Weekday, period: u32, friday_cutoff: u32, friday_practical: bool) -> f64 {
    let mut score = period as f64;
    if day.is_friday() {
        if period > friday_cutoff {
            if friday_practical || period > friday_cutoff + 1 {
                score += 100.0;
            } else {
                score += 50.0;
            }
        }
    } else {
        score -= 0.1;
        if period <= 3 {
            score -= 0.2;
        }
    }
    score
}

/// Orders candidates by (score, period), then shuffles each equal group so
/// that day choice varies between runs while period order stays monotonic.
fn order_candidates(cands: &mut [SlotCand], rng: &mut StdRng) {
    cands.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.period.cmp(&b.period))
    });
    let mut i = 0;
    while i < cands.len() {
        let mut j = i + 1;
        while j < cands.len()
            && (cands[j].score - cands[i].score).abs() < 1e-9
            && cands[j].period == cands[i].period
        {
            j += 1;
        }
        cands[i..j].shuffle(rng);
        i = j;
    }
}

/// Day order for a practical block: days under pressure sort last, and
/// Friday is penalized in proportion to its existing theory load.
fn practical_day_order(
    config: &ScheduleConfig,
    entries: &[TimetableEntry],
    section: &Section,
) -> Vec<Weekday> {
    let mut scored: Vec<(Weekday, f64)> = config
        .days
        .iter()
        .map(|&day| {
            let count = entries
                .iter()
                .filter(|e| e.section == *section && e.day == day)
                .count() as f64;
            let score = if day.is_friday() {
                let friday_theory = entries
                    .iter()
                    .filter(|e| e.section == *section && e.day.is_friday() && !e.is_practical)
                    .count();
                let base = if friday_theory >= 3 {
                    100.0
                } else if friday_theory >= 2 {
                    50.0
                } else {
                    10.0
                };
                base + count
            } else {
                let bonus = match day {
                    Weekday::Monday => -0.3,
                    Weekday::Tuesday => -0.2,
                    Weekday::Wednesday => -0.1,
                    _ => 0.0,
                };
                count + bonus
            };
            (day, score)
        })
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(d, _)| d).collect()
}

/// Picks a teacher for a span. Qualified teachers win; among them,
/// unavailability-constrained teachers are preferred since their feasible
/// windows shrink fastest. Substitutes are only considered when allowed
/// and no qualified teacher fits.
pub(crate) fn pick_teacher(
    teachers: &[Teacher],
    index: &AvailabilityIndex,
    rng: &mut StdRng,
    subject_code: &str,
    day: Weekday,
    start: u32,
    len: u32,
    allow_substitute: bool,
) -> Option<u32> {
    let mut qualified: Vec<&Teacher> = teachers
        .iter()
        .filter(|t| {
            t.teaches(subject_code)
                && t.is_available_block(day, start, len)
                && index.teacher_free_block(t.id, day, start, len)
        })
        .collect();
    if !qualified.is_empty() {
        qualified.sort_by_key(|t| !t.is_constrained());
        let lead = qualified[0].is_constrained();
        let tier: Vec<&Teacher> = qualified
            .into_iter()
            .take_while(|t| t.is_constrained() == lead)
            .collect();
        return tier.choose(rng).map(|t| t.id);
    }
    if allow_substitute {
        let free: Vec<&Teacher> = teachers
            .iter()
            .filter(|t| {
                t.is_available_block(day, start, len)
                    && index.teacher_free_block(t.id, day, start, len)
            })
            .collect();
        return free.choose(rng).map(|t| t.id);
    }
    None
}

/// Period window for a phase on a given day.
fn allowed_periods(
    config: &ScheduleConfig,
    phase: Phase,
    day: Weekday,
    friday_cutoff: u32,
) -> Vec<u32> {
    let maxp = config.max_period();
    let top = match (phase, day.is_friday()) {
        (Phase::Normal, true) => friday_cutoff.min(maxp),
        (Phase::Normal, false) => 5.min(maxp),
        (Phase::Aggressive, _) => 5.min(maxp),
        (Phase::Emergency, _) => maxp,
    };
    (1..=top).collect()
}

#[allow(clippy::too_many_arguments)]
fn schedule_section(
    config: &ScheduleConfig,
    subjects: &[Subject],
    teachers: &[Teacher],
    allocator: &mut RoomAllocator,
    index: &mut AvailabilityIndex,
    batches: &[String],
    rng: &mut StdRng,
    section: &Section,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<TimetableEntry> {
    let mut entries: Vec<TimetableEntry> = Vec::new();
    let own: Vec<&Subject> = subjects
        .iter()
        .filter(|s| s.applies_to(&section.batch))
        .collect();

    // Practicals first: three-period blocks are the hardest to seat.
    let mut practicals: Vec<&Subject> = own.iter().copied().filter(|s| s.is_practical).collect();
    practicals.shuffle(rng);
    for subject in practicals {
        if !place_practical(
            config, subjects, teachers, allocator, index, rng, section, subject, &mut entries,
        ) {
            warn!("{section}: practical {} could not be placed", subject.code);
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::UnscheduledSubject,
                section: section.clone(),
                subject: Some(subject.code.clone()),
                detail: "no three-period lab block available".into(),
            });
        }
    }

    // Theory, hardest-constrained subjects first.
    let mut theories: Vec<&Subject> = own
        .iter()
        .copied()
        .filter(|s| !s.is_practical && !s.is_thesis())
        .collect();
    theories.sort_by_key(|s| {
        let constrained = teachers
            .iter()
            .any(|t| t.teaches(&s.code) && t.is_constrained());
        (Reverse(constrained), Reverse(s.credits), s.code.clone())
    });

    let mut phase = Phase::Normal;
    for subject in theories {
        for _ in 0..subject.credits {
            loop {
                if place_theory_session(
                    config, subjects, teachers, allocator, index, batches, rng, section, subject,
                    &mut entries, phase, diagnostics,
                ) {
                    break;
                }
                match phase.escalate() {
                    Some(next) => {
                        debug!("{section}: escalating to {next:?} for {}", subject.code);
                        phase = next;
                    }
                    None => {
                        warn!("{section}: theory {} session unplaced", subject.code);
                        diagnostics.push(Diagnostic {
                            kind: DiagnosticKind::UnscheduledSubject,
                            section: section.clone(),
                            subject: Some(subject.code.clone()),
                            detail: "no feasible slot in any phase".into(),
                        });
                        break;
                    }
                }
            }
        }
    }

    entries
}

#[allow(clippy::too_many_arguments)]
fn place_practical(
    config: &ScheduleConfig,
    subjects: &[Subject],
    teachers: &[Teacher],
    allocator: &mut RoomAllocator,
    index: &mut AvailabilityIndex,
    rng: &mut StdRng,
    section: &Section,
    subject: &Subject,
    entries: &mut Vec<TimetableEntry>,
) -> bool {
    let len = 3;
    for day in practical_day_order(config, entries, section) {
        let maxp = config.max_period();
        if maxp < len {
            return false;
        }
        for start in 1..=maxp - len + 1 {
            let pctx = PlacementCtx {
                config,
                subjects,
                teachers,
                index,
            };
            if !can_place_block(pctx, entries, section, subject, day, start, len) {
                continue;
            }
            let Some(lab) =
                allocator.allocate_practical(index, section, &subject.code, day, start, len)
            else {
                continue;
            };
            let Some(teacher) =
                pick_teacher(teachers, index, rng, &subject.code, day, start, len, false)
            else {
                continue;
            };
            for p in start..start + len {
                let e = TimetableEntry::new(section.clone(), subject.code.as_str(), day, p)
                    .with_teacher(teacher)
                    .with_room(lab)
                    .practical();
                index.mark_entry(&e);
                entries.push(e);
            }
            debug!("{section}: practical {} at {day} {start}-{}", subject.code, start + len - 1);
            return true;
        }
    }
    false
}

#[allow(clippy::too_many_arguments)]
fn place_theory_session(
    config: &ScheduleConfig,
    subjects: &[Subject],
    teachers: &[Teacher],
    allocator: &mut RoomAllocator,
    index: &mut AvailabilityIndex,
    batches: &[String],
    rng: &mut StdRng,
    section: &Section,
    subject: &Subject,
    entries: &mut Vec<TimetableEntry>,
    phase: Phase,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let cutoff = friday_theory_cutoff(entries, section);
    let friday_practical = entries
        .iter()
        .any(|e| e.section == *section && e.day.is_friday() && e.is_practical && !e.is_extra);

    // Within a phase, substitute teachers are the last lever pulled.
    let substitute_steps: &[bool] = match phase {
        Phase::Normal => &[false],
        Phase::Aggressive | Phase::Emergency => &[false, true],
    };

    for &allow_substitute in substitute_steps {
        let mut cands: Vec<SlotCand> = Vec::new();
        for &day in &config.days {
            for period in allowed_periods(config, phase, day, cutoff) {
                let teacher_ok = if allow_substitute {
                    teachers.iter().any(|t| {
                        t.is_available(day, period) && index.teacher_free(t.id, day, period)
                    })
                } else {
                    some_teacher_available(teachers, index, &subject.code, day, period, 1)
                };
                if teacher_ok
                    && section_slot_free(entries, section, day, period)
                    && thesis_day_ok(config, subjects, section, subject, day)
                    && no_duplicate_theory(entries, section, subject, day)
                {
                    cands.push(SlotCand {
                        day,
                        period,
                        score: slot_score(day, period, cutoff, friday_practical),
                    });
                }
            }
        }
        if cands.is_empty() {
            continue;
        }
        order_candidates(&mut cands, rng);
        let slot = &cands[0];

        let Some(teacher) = pick_teacher(
            teachers,
            index,
            rng,
            &subject.code,
            slot.day,
            slot.period,
            1,
            allow_substitute,
        ) else {
            continue;
        };
        let room = allocator.allocate_theory(index, section, batches, slot.day, slot.period);
        if room.is_none() {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::NoResourceAvailable,
                section: section.clone(),
                subject: Some(subject.code.clone()),
                detail: format!("no room free at {} period {}", slot.day, slot.period),
            });
        }

        let mut e = TimetableEntry::new(section.clone(), subject.code.as_str(), slot.day, slot.period)
            .with_teacher(teacher);
        if let Some(r) = room {
            e = e.with_room(r);
        }
        index.mark_entry(&e);
        entries.push(e);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn grid_rooms() -> Vec<Classroom> {
        vec![
            Classroom::new(1, "CR-1").with_building("Main Building"),
            Classroom::new(2, "CR-2").with_building("Main Building"),
            Classroom::new(3, "CR-5").with_building("Academic Building"),
            Classroom::lab(4, "Software Lab 1").with_building("Lab Block"),
        ]
    }

    fn standard_inputs() -> (Vec<Subject>, Vec<Teacher>) {
        let subjects = vec![
            Subject::new("SW-316", "Software Project Management", 3).with_batch("21SW"),
            Subject::new("SW-318", "Operating Systems", 2).with_batch("21SW"),
            Subject::new("SW-320", "Computer Networks", 2).with_batch("21SW"),
            Subject::new("SW-317", "Database Systems Lab", 1)
                .practical()
                .with_batch("21SW"),
        ];
        let teachers = vec![
            Teacher::new(1, "Dr. Shah").with_subject("SW-316"),
            Teacher::new(2, "Ms. Memon").with_subject("SW-318"),
            Teacher::new(3, "Dr. Qureshi").with_subject("SW-320"),
            Teacher::new(4, "Mr. Baloch").with_subject("SW-317"),
            Teacher::new(5, "Ms. Soomro").with_subject("SW-316").with_subject("SW-318"),
        ];
        (subjects, teachers)
    }

    fn generate_standard(seed: u64) -> GenerationResult {
        let _ = env_logger::builder().is_test(true).try_init();
        let (subjects, teachers) = standard_inputs();
        TimetableScheduler::new(
            ScheduleConfig::default(),
            subjects,
            teachers,
            grid_rooms(),
            vec![Section::new("21SW", "I")],
        )
        .with_seed(seed)
        .generate()
        .unwrap()
    }

    #[test]
    fn test_single_section_meets_credit_quota() {
        let result = generate_standard(42);
        let count = |code: &str| {
            result
                .entries
                .iter()
                .filter(|e| e.subject_code == code && !e.is_extra && !e.is_practical)
                .count()
        };
        assert_eq!(count("SW-316"), 3);
        assert_eq!(count("SW-318"), 2);
        assert_eq!(count("SW-320"), 2);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_practical_block_integrity() {
        let result = generate_standard(7);
        let block: Vec<&TimetableEntry> = result
            .entries
            .iter()
            .filter(|e| e.subject_code == "SW-317" && !e.is_extra)
            .collect();
        assert_eq!(block.len(), 3);
        let day = block[0].day;
        assert!(block.iter().all(|e| e.day == day && e.is_practical));
        let room = block[0].room_id;
        assert!(room.is_some());
        assert!(block.iter().all(|e| e.room_id == room));
        let mut periods: Vec<u32> = block.iter().map(|e| e.period).collect();
        periods.sort_unstable();
        assert_eq!(periods[2] - periods[0], 2);
        // Only the lab can host it.
        assert_eq!(room, Some(4));
    }

    #[test]
    fn test_no_duplicate_theory_per_day() {
        let result = generate_standard(3);
        let mut seen: HashMap<(String, Weekday), usize> = HashMap::new();
        for e in result.entries.iter().filter(|e| !e.is_practical && !e.is_extra) {
            *seen.entry((e.subject_code.clone(), e.day)).or_insert(0) += 1;
        }
        assert!(seen.values().all(|&n| n == 1));
    }

    #[test]
    fn test_two_sections_share_staff_and_rooms_cleanly() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (subjects, teachers) = standard_inputs();
        let result = TimetableScheduler::new(
            ScheduleConfig::default(),
            subjects,
            teachers,
            grid_rooms(),
            vec![Section::new("21SW", "I"), Section::new("21SW", "II")],
        )
        .with_seed(13)
        .generate()
        .unwrap();

        assert!(result.conflicts.is_empty());
        for letter in ["I", "II"] {
            let section = Section::new("21SW", letter);
            let block = result
                .entries
                .iter()
                .filter(|e| e.section == section && e.is_practical && !e.is_extra)
                .count();
            assert_eq!(block, 3, "section {section} missing its lab block");
        }

        // Both sections draw on the same staff and rooms, so every
        // (teacher, slot) and (room, slot) pair must be unique.
        let mut teacher_slots = HashSet::new();
        let mut room_slots = HashSet::new();
        for e in &result.entries {
            if let Some(t) = e.teacher_id {
                assert!(
                    teacher_slots.insert((t, e.day, e.period)),
                    "teacher {t} double-booked on {} period {}",
                    e.day,
                    e.period
                );
            }
            if let Some(r) = e.room_id {
                assert!(
                    room_slots.insert((r, e.day, e.period)),
                    "room {r} double-booked on {} period {}",
                    e.day,
                    e.period
                );
            }
        }
    }

    #[test]
    fn test_unavailability_respected_under_pressure() {
        // One teacher, blocked all Wednesday, teaching a 2-credit subject.
        let subjects = vec![Subject::new("SW-316", "SPM", 2).with_batch("21SW")];
        let teachers = vec![Teacher::new(1, "Dr. Shah")
            .with_subject("SW-316")
            .with_unavailable_day(Weekday::Wednesday)];
        let result = TimetableScheduler::new(
            ScheduleConfig::default(),
            subjects,
            teachers,
            grid_rooms(),
            vec![Section::new("21SW", "I")],
        )
        .with_seed(11)
        .generate()
        .unwrap();

        assert!(result
            .entries
            .iter()
            .filter(|e| e.teacher_id == Some(1))
            .all(|e| e.day != Weekday::Wednesday));
        assert_eq!(
            result
                .entries
                .iter()
                .filter(|e| e.subject_code == "SW-316" && !e.is_extra)
                .count(),
            2
        );
    }

    #[test]
    fn test_thesis_batch_owns_wednesday() {
        let subjects = vec![
            Subject::new("SW-499", "Thesis", 0).with_batch("21SW"),
            Subject::new("SW-316", "SPM", 3).with_batch("21SW"),
        ];
        let teachers = vec![
            Teacher::new(1, "Dr. Shah").with_subject("SW-316"),
            Teacher::new(2, "Coordinator").with_subject("SW-499"),
        ];
        let config = ScheduleConfig::default();
        let periods = config.periods.clone();
        let result = TimetableScheduler::new(
            config,
            subjects,
            teachers,
            grid_rooms(),
            vec![Section::new("21SW", "I")],
        )
        .with_seed(5)
        .generate()
        .unwrap();

        // Every Wednesday period is a thesis placeholder without staff/room.
        for p in periods {
            let cell: Vec<&TimetableEntry> = result
                .entries
                .iter()
                .filter(|e| e.day == Weekday::Wednesday && e.period == p)
                .collect();
            assert_eq!(cell.len(), 1, "period {p}");
            assert_eq!(cell[0].subject_code, "SW-499");
            assert_eq!(cell[0].teacher_id, None);
            assert_eq!(cell[0].room_id, None);
        }
        // Thesis never leaks to other days; theory never lands on Wednesday.
        assert!(result
            .entries
            .iter()
            .filter(|e| e.subject_code == "SW-499")
            .all(|e| e.day == Weekday::Wednesday));
        assert!(result
            .entries
            .iter()
            .filter(|e| e.subject_code == "SW-316")
            .all(|e| e.day != Weekday::Wednesday));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = generate_standard(99);
        let b = generate_standard(99);
        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn test_committed_entries_block_shared_teacher() {
        let (subjects, teachers) = standard_inputs();
        let committed: Vec<TimetableEntry> = Weekday::ALL
            .iter()
            .flat_map(|&day| {
                (1..=5).map(move |p| {
                    TimetableEntry::new(Section::new("20SW", "I"), "SW-216", day, p).with_teacher(1)
                })
            })
            .collect();
        let result = TimetableScheduler::new(
            ScheduleConfig::default(),
            subjects,
            teachers,
            grid_rooms(),
            vec![Section::new("21SW", "I")],
        )
        .with_seed(2)
        .with_committed_entries(committed)
        .generate()
        .unwrap();

        // Teacher 1 is fully booked periods 1-5 elsewhere; any use of them
        // must sit in periods 6-7.
        assert!(result
            .entries
            .iter()
            .filter(|e| e.teacher_id == Some(1))
            .all(|e| e.period > 5));
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_friday_cutoff_derivation() {
        let section = Section::new("21SW", "I");
        let mk = |p: u32| {
            TimetableEntry::new(section.clone(), "SW-317", Weekday::Friday, p).practical()
        };
        assert_eq!(friday_theory_cutoff(&[], &section), 3);
        assert_eq!(friday_theory_cutoff(&[mk(5), mk(6), mk(7)], &section), 4);
        assert_eq!(friday_theory_cutoff(&[mk(4), mk(5), mk(6)], &section), 3);
        assert_eq!(friday_theory_cutoff(&[mk(3), mk(4), mk(5)], &section), 2);
    }

    #[test]
    fn test_friday_scoring_flat_penalty_past_practical() {
        // With a lab block pinning the cutoff at 4, period 5 is just as
        // unusable as period 6.
        assert_eq!(slot_score(Weekday::Friday, 5, 4, true), 105.0);
        assert_eq!(slot_score(Weekday::Friday, 6, 4, true), 106.0);
        assert_eq!(slot_score(Weekday::Friday, 4, 4, true), 4.0);
        // Without a practical the first period over the line gets the
        // softer band before the full penalty kicks in.
        assert_eq!(slot_score(Weekday::Friday, 4, 3, false), 54.0);
        assert_eq!(slot_score(Weekday::Friday, 5, 3, false), 105.0);
        assert_eq!(slot_score(Weekday::Friday, 3, 3, false), 3.0);
    }

    #[test]
    fn test_phase_escalation_is_one_way() {
        assert_eq!(Phase::Normal.escalate(), Some(Phase::Aggressive));
        assert_eq!(Phase::Aggressive.escalate(), Some(Phase::Emergency));
        assert_eq!(Phase::Emergency.escalate(), None);
        assert!(Phase::Normal < Phase::Emergency);
    }
}
