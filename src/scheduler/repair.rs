//! Post-placement repair passes.
//!
//! Six passes run in fixed order over one section's entries:
//!
//! 1. Minimum daily duration: extend truncated days by pulling over-credit
//!    theory sessions from elsewhere
//! 2. Friday time limit: relocate theory past the Friday cutoff to Mon-Thu
//! 3. Minimum daily classes: fix single-class and practical-only days with
//!    escalating strategies
//! 4. Credit-hour correction: add missing sessions, remove excess ones
//! 5. Duplicate-theory elimination: redistribute same-day repeats
//! 6. Thesis-day cleanup: make the thesis day exactly thesis, wall to wall
//!
//! Every mutation keeps the availability index in lockstep, and no pass
//! may put a teacher into a declared-unavailable slot.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use rand::rngs::StdRng;

use crate::allocator::RoomAllocator;
use crate::availability::AvailabilityIndex;
use crate::constraints::{batch_has_thesis, can_place, thesis_day_ok, PlacementCtx};
use crate::models::{ScheduleConfig, Section, Subject, Teacher, TimetableEntry, Weekday};
use crate::scheduler::engine::{
    friday_theory_cutoff, pick_teacher, Diagnostic, DiagnosticKind,
};

/// Shared mutable state for a section's repair run.
pub(crate) struct RepairCtx<'a> {
    pub config: &'a ScheduleConfig,
    pub subjects: &'a [Subject],
    pub teachers: &'a [Teacher],
    pub allocator: &'a mut RoomAllocator,
    pub index: &'a mut AvailabilityIndex,
    pub batches: &'a [String],
    pub rng: &'a mut StdRng,
}

/// Runs all six passes in order.
pub(crate) fn run_section(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    pass_min_daily_duration(ctx, section, entries);
    pass_friday_limit(ctx, section, entries, diagnostics);
    pass_min_daily_classes(ctx, section, entries, diagnostics);
    pass_credit_correction(ctx, section, entries, diagnostics);
    pass_duplicate_elimination(ctx, section, entries, diagnostics);
    pass_thesis_cleanup(ctx, section, entries);
}

fn subject_by_code<'a>(subjects: &'a [Subject], code: &str) -> Option<&'a Subject> {
    subjects
        .iter()
        .find(|s| s.code == code && !s.is_practical)
        .or_else(|| subjects.iter().find(|s| s.code == code))
}

fn is_thesis_code(subjects: &[Subject], code: &str) -> bool {
    subject_by_code(subjects, code).is_some_and(|s| s.is_thesis())
}

/// Non-extra theory session count for a subject in this section's entries.
fn theory_count(entries: &[TimetableEntry], code: &str) -> usize {
    entries
        .iter()
        .filter(|e| e.subject_code == code && !e.is_practical && !e.is_extra)
        .count()
}

fn over_credit(subjects: &[Subject], entries: &[TimetableEntry], code: &str) -> bool {
    subject_by_code(subjects, code)
        .is_some_and(|s| theory_count(entries, code) > s.credits as usize)
}

/// Whether an entry may legally land at (day, period), ignoring itself.
fn move_ok(
    ctx: &RepairCtx<'_>,
    entries: &[TimetableEntry],
    idx: usize,
    day: Weekday,
    period: u32,
) -> bool {
    let e = &entries[idx];
    if e.is_practical || e.is_extra {
        return false;
    }
    let Some(subject) = subject_by_code(ctx.subjects, &e.subject_code) else {
        return false;
    };
    if subject.is_thesis() {
        return false;
    }
    if period > ctx.config.max_period() {
        return false;
    }
    let slot_taken = entries
        .iter()
        .enumerate()
        .any(|(i, o)| i != idx && o.day == day && o.period == period);
    if slot_taken {
        return false;
    }
    if !thesis_day_ok(ctx.config, ctx.subjects, &e.section, subject, day) {
        return false;
    }
    let duplicate = entries.iter().enumerate().any(|(i, o)| {
        i != idx && o.day == day && !o.is_practical && o.subject_code == e.subject_code
    });
    !duplicate
}

/// Moves a theory entry to (day, period) when a teacher and the rules allow
/// it, keeping the original teacher where possible and the index in sync.
fn try_move_entry(
    ctx: &mut RepairCtx<'_>,
    entries: &mut [TimetableEntry],
    idx: usize,
    day: Weekday,
    period: u32,
) -> bool {
    if !move_ok(ctx, entries, idx, day, period) {
        return false;
    }
    let old = entries[idx].clone();
    let same_teacher_fits = old.teacher_id.is_some_and(|t| {
        ctx.teachers
            .iter()
            .find(|c| c.id == t)
            .is_some_and(|c| c.is_available(day, period))
            && ctx.index.teacher_free(t, day, period)
    });
    let teacher = if same_teacher_fits {
        old.teacher_id
    } else {
        pick_teacher(
            ctx.teachers,
            ctx.index,
            ctx.rng,
            &old.subject_code,
            day,
            period,
            1,
            false,
        )
    };
    let Some(teacher) = teacher else {
        return false;
    };

    ctx.index.release_entry(&old);
    let room = match old.room_id {
        Some(r) if ctx.index.room_free(r, day, period) => Some(r),
        _ => ctx
            .allocator
            .allocate_theory(ctx.index, &old.section, ctx.batches, day, period),
    };
    let e = &mut entries[idx];
    e.day = day;
    e.period = period;
    e.teacher_id = Some(teacher);
    e.room_id = room;
    let moved = entries[idx].clone();
    ctx.index.mark_entry(&moved);
    debug!(
        "{}: moved {} to {day} period {period}",
        moved.section, moved.subject_code
    );
    true
}

/// Theory cap for a day when repairing: Friday obeys its cutoff, other days
/// run to period 5.
fn repair_period_cap(ctx: &RepairCtx<'_>, entries: &[TimetableEntry], section: &Section, day: Weekday) -> u32 {
    if day.is_friday() {
        friday_theory_cutoff(entries, section)
    } else {
        5.min(ctx.config.max_period())
    }
}

// Pass 1
fn pass_min_daily_duration(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut [TimetableEntry],
) {
    let thesis = batch_has_thesis(ctx.subjects, &section.batch);
    let days: Vec<Weekday> = ctx.config.days.to_vec();
    for day in days {
        if thesis && day == ctx.config.thesis_day {
            continue;
        }
        let Some(last) = entries
            .iter()
            .filter(|e| e.day == day && !e.is_extra)
            .map(|e| e.period)
            .max()
        else {
            continue;
        };
        let min_final = ctx.config.min_final_period(day);
        if last >= min_final {
            continue;
        }
        for period in (last + 1)..=min_final {
            let donors: Vec<usize> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| {
                    e.day != day
                        && !e.is_practical
                        && !e.is_extra
                        && over_credit(ctx.subjects, entries, &e.subject_code)
                })
                .map(|(i, _)| i)
                .collect();
            for i in donors {
                if try_move_entry(ctx, entries, i, day, period) {
                    break;
                }
            }
        }
    }
}

// Pass 2
fn pass_friday_limit(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut [TimetableEntry],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let cutoff = friday_theory_cutoff(entries, section);
    let violators: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.day.is_friday()
                && !e.is_practical
                && !e.is_extra
                && e.period > cutoff
                && !is_thesis_code(ctx.subjects, &e.subject_code)
        })
        .map(|(i, _)| i)
        .collect();

    let weekdays = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
    ];
    for idx in violators {
        let mut moved = false;
        'search: for day in weekdays {
            for period in 1..=5.min(ctx.config.max_period()) {
                if try_move_entry(ctx, entries, idx, day, period) {
                    moved = true;
                    break 'search;
                }
            }
        }
        if !moved {
            let e = &entries[idx];
            warn!(
                "{section}: {} stays at Friday period {} past cutoff {cutoff}",
                e.subject_code, e.period
            );
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::FridayLimitKept,
                section: section.clone(),
                subject: Some(e.subject_code.clone()),
                detail: format!("kept at Friday period {} (cutoff {cutoff})", e.period),
            });
        }
    }
}

// Pass 3
fn day_is_sparse(entries: &[TimetableEntry], day: Weekday) -> bool {
    let day_entries: Vec<&TimetableEntry> = entries
        .iter()
        .filter(|e| e.day == day && !e.is_extra)
        .collect();
    match day_entries.len() {
        0 => false,
        1 => true,
        _ => day_entries.iter().all(|e| e.is_practical),
    }
}

fn pass_min_daily_classes(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let thesis = batch_has_thesis(ctx.subjects, &section.batch);
    let days: Vec<Weekday> = ctx.config.days.to_vec();
    for day in days {
        if thesis && day == ctx.config.thesis_day {
            continue;
        }
        if !day_is_sparse(entries, day) {
            continue;
        }
        let fixed = strategy_move_over_credit(ctx, entries, day)
            || strategy_split_duplicate(ctx, entries, day)
            || strategy_force_move(ctx, entries, day)
            || strategy_duplicate_session(ctx, section, entries, day)
            || strategy_emergency_fill(ctx, section, entries, day);
        if !fixed && day_is_sparse(entries, day) {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::MinimumDailyUnresolved,
                section: section.clone(),
                subject: None,
                detail: format!("{day} still below the minimum class count"),
            });
        }
    }
}

fn donor_move(
    ctx: &mut RepairCtx<'_>,
    entries: &mut [TimetableEntry],
    donors: Vec<usize>,
    day: Weekday,
) -> bool {
    let section = match entries.first() {
        Some(e) => e.section.clone(),
        None => return false,
    };
    let cap = repair_period_cap(ctx, entries, &section, day);
    for i in donors {
        for period in 1..=cap {
            if try_move_entry(ctx, entries, i, day, period) {
                return true;
            }
        }
    }
    false
}

fn strategy_move_over_credit(
    ctx: &mut RepairCtx<'_>,
    entries: &mut [TimetableEntry],
    day: Weekday,
) -> bool {
    let donors: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.day != day
                && !e.is_practical
                && !e.is_extra
                && over_credit(ctx.subjects, entries, &e.subject_code)
        })
        .map(|(i, _)| i)
        .collect();
    donor_move(ctx, entries, donors, day)
}

fn strategy_split_duplicate(
    ctx: &mut RepairCtx<'_>,
    entries: &mut [TimetableEntry],
    day: Weekday,
) -> bool {
    let mut per_day: HashMap<(Weekday, &str), usize> = HashMap::new();
    for e in entries.iter().filter(|e| !e.is_practical && !e.is_extra) {
        *per_day.entry((e.day, e.subject_code.as_str())).or_insert(0) += 1;
    }
    let donors: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.day != day
                && !e.is_practical
                && !e.is_extra
                && per_day
                    .get(&(e.day, e.subject_code.as_str()))
                    .is_some_and(|&n| n >= 2)
        })
        .map(|(i, _)| i)
        .collect();
    donor_move(ctx, entries, donors, day)
}

fn strategy_force_move(
    ctx: &mut RepairCtx<'_>,
    entries: &mut [TimetableEntry],
    day: Weekday,
) -> bool {
    let mut day_load: HashMap<Weekday, usize> = HashMap::new();
    for e in entries.iter().filter(|e| !e.is_extra) {
        *day_load.entry(e.day).or_insert(0) += 1;
    }
    let donors: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.day != day
                && !e.is_practical
                && !e.is_extra
                && day_load.get(&e.day).is_some_and(|&n| n >= 3)
        })
        .map(|(i, _)| i)
        .collect();
    donor_move(ctx, entries, donors, day)
}

/// Adds an extra session of some subject on the sparse day. The credit
/// correction pass reconciles the surplus afterwards, preferring to trim
/// from Friday and late periods, so the net effect favors this day.
fn strategy_duplicate_session(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    day: Weekday,
) -> bool {
    let candidates: Vec<Subject> = ctx
        .subjects
        .iter()
        .filter(|s| s.applies_to(&section.batch) && !s.is_practical && !s.is_thesis())
        .cloned()
        .collect();
    let cap = repair_period_cap(ctx, entries, section, day);
    for subject in &candidates {
        for period in 1..=cap {
            if place_session(ctx, section, entries, subject, day, period, false) {
                return true;
            }
        }
    }
    false
}

fn strategy_emergency_fill(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    day: Weekday,
) -> bool {
    let candidates: Vec<Subject> = ctx
        .subjects
        .iter()
        .filter(|s| s.applies_to(&section.batch) && !s.is_practical && !s.is_thesis())
        .cloned()
        .collect();
    for subject in &candidates {
        for period in 1..=ctx.config.max_period() {
            if place_session(ctx, section, entries, subject, day, period, true) {
                return true;
            }
        }
    }
    false
}

/// Places one theory session at an exact slot, if the full rule set allows.
fn place_session(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    subject: &Subject,
    day: Weekday,
    period: u32,
    allow_substitute: bool,
) -> bool {
    {
        let pctx = PlacementCtx {
            config: ctx.config,
            subjects: ctx.subjects,
            teachers: ctx.teachers,
            index: ctx.index,
        };
        let feasible = if allow_substitute {
            // Relaxed teacher rule, everything else identical.
            crate::constraints::section_slot_free(entries, section, day, period)
                && thesis_day_ok(ctx.config, ctx.subjects, section, subject, day)
                && crate::constraints::no_duplicate_theory(entries, section, subject, day)
                && ctx.teachers.iter().any(|t| {
                    t.is_available(day, period) && ctx.index.teacher_free(t.id, day, period)
                })
        } else {
            can_place(pctx, entries, section, subject, day, period)
        };
        if !feasible {
            return false;
        }
    }
    let Some(teacher) = pick_teacher(
        ctx.teachers,
        ctx.index,
        ctx.rng,
        &subject.code,
        day,
        period,
        1,
        allow_substitute,
    ) else {
        return false;
    };
    let room = ctx
        .allocator
        .allocate_theory(ctx.index, section, ctx.batches, day, period);
    let mut e = TimetableEntry::new(section.clone(), subject.code.as_str(), day, period)
        .with_teacher(teacher);
    if let Some(r) = room {
        e = e.with_room(r);
    }
    ctx.index.mark_entry(&e);
    entries.push(e);
    true
}

// Pass 4
fn removal_day_rank(day: Weekday) -> u8 {
    match day {
        Weekday::Friday => 0,
        Weekday::Thursday => 1,
        Weekday::Wednesday => 2,
        Weekday::Tuesday => 3,
        Weekday::Monday => 4,
    }
}

fn pass_credit_correction(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let theory_subjects: Vec<Subject> = ctx
        .subjects
        .iter()
        .filter(|s| s.applies_to(&section.batch) && !s.is_practical && !s.is_thesis())
        .cloned()
        .collect();

    for subject in &theory_subjects {
        let target = subject.credits as usize;
        let mut actual = theory_count(entries, &subject.code);

        while actual < target {
            if add_missing_session(ctx, section, entries, subject) {
                actual += 1;
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::CreditCorrection,
                    section: section.clone(),
                    subject: Some(subject.code.clone()),
                    detail: "added a missing session".into(),
                });
            } else {
                warn!("{section}: {} short of credit hours", subject.code);
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::CreditCorrection,
                    section: section.clone(),
                    subject: Some(subject.code.clone()),
                    detail: "missing session could not be added".into(),
                });
                break;
            }
        }

        while actual > target {
            let Some(idx) = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| {
                    e.subject_code == subject.code && !e.is_practical && !e.is_extra
                })
                .min_by_key(|(_, e)| (removal_day_rank(e.day), std::cmp::Reverse(e.period)))
                .map(|(i, _)| i)
            else {
                break;
            };
            let removed = entries.remove(idx);
            ctx.index.release_entry(&removed);
            actual -= 1;
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::CreditCorrection,
                section: section.clone(),
                subject: Some(subject.code.clone()),
                detail: format!("removed excess session at {} period {}", removed.day, removed.period),
            });
        }
    }
}

fn add_missing_session(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
    subject: &Subject,
) -> bool {
    let days: Vec<Weekday> = ctx.config.days.to_vec();
    // Normal window first.
    for &day in &days {
        let cap = repair_period_cap(ctx, entries, section, day);
        for period in 1..=cap {
            if place_session(ctx, section, entries, subject, day, period, false) {
                return true;
            }
        }
    }
    // Emergency window: late periods, Friday afternoon included.
    let maxp = ctx.config.max_period();
    for &day in &days {
        let range = if day.is_friday() { 5..=maxp } else { 6..=maxp };
        for period in range {
            if place_session(ctx, section, entries, subject, day, period, true) {
                return true;
            }
        }
    }
    false
}

// Pass 5
fn pass_duplicate_elimination(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut [TimetableEntry],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut safety = 0;
    let mut stuck: HashSet<(Weekday, String)> = HashSet::new();
    loop {
        safety += 1;
        if safety >= 10 {
            break;
        }
        let mut groups: HashMap<(Weekday, String), Vec<usize>> = HashMap::new();
        for (i, e) in entries.iter().enumerate() {
            if !e.is_practical && !e.is_extra && !is_thesis_code(ctx.subjects, &e.subject_code) {
                groups
                    .entry((e.day, e.subject_code.clone()))
                    .or_default()
                    .push(i);
            }
        }
        let Some(((day, code), mut idxs)) = groups
            .into_iter()
            .filter(|(key, idxs)| idxs.len() >= 2 && !stuck.contains(key))
            .min_by_key(|(key, _)| (key.0, key.1.clone()))
        else {
            break;
        };

        // Keep the earliest occurrence, redistribute the rest.
        idxs.sort_by_key(|&i| entries[i].period);
        let days: Vec<Weekday> = ctx.config.days.to_vec();
        let mut any_moved = false;
        for &i in &idxs[1..] {
            'target: for &target in days.iter().filter(|&&d| d != day) {
                let cap = repair_period_cap(ctx, entries, section, target);
                for period in 1..=cap {
                    if try_move_entry(ctx, entries, i, target, period) {
                        any_moved = true;
                        break 'target;
                    }
                }
            }
        }
        if !any_moved {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::DuplicateTheoryUnresolved,
                section: section.clone(),
                subject: Some(code.clone()),
                detail: format!("duplicate on {day} could not be redistributed"),
            });
            stuck.insert((day, code));
        }
    }
}

// Pass 6
fn pass_thesis_cleanup(
    ctx: &mut RepairCtx<'_>,
    section: &Section,
    entries: &mut Vec<TimetableEntry>,
) {
    let Some(thesis) = ctx
        .subjects
        .iter()
        .find(|s| s.applies_to(&section.batch) && s.is_thesis())
    else {
        return;
    };
    let code = thesis.code.clone();
    let thesis_day = ctx.config.thesis_day;

    let mut i = 0;
    while i < entries.len() {
        let e = &entries[i];
        let strayed_thesis = e.subject_code == code && e.day != thesis_day;
        let foreign_class = e.subject_code != code && e.day == thesis_day;
        if strayed_thesis || foreign_class {
            let removed = entries.remove(i);
            ctx.index.release_entry(&removed);
        } else {
            i += 1;
        }
    }

    for &period in &ctx.config.periods {
        let filled = entries
            .iter()
            .any(|e| e.day == thesis_day && e.period == period);
        if !filled {
            entries.push(TimetableEntry::new(
                section.clone(),
                code.as_str(),
                thesis_day,
                period,
            ));
        }
    }
}
