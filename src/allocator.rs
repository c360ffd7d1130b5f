//! Room allocation.
//!
//! Practical blocks go to labs only; a hard safety check keeps every other
//! room out even when the grid is saturated. Once a lab has hosted a
//! (section, subject) practical it is remembered, and later sessions of the
//! same pair return to the same lab whenever it is still free.
//!
//! Theory sessions walk the regular rooms in building-priority order, with
//! a batch routing preference: second-year sections lean on the Academic
//! Building, everyone else on the Main Building. Labs serve as the fallback
//! of last resort for theory when every regular room is taken.

use std::collections::HashMap;

use crate::availability::AvailabilityIndex;
use crate::models::{Classroom, Section, Weekday};

/// Stateful room allocator for one generation run.
#[derive(Debug, Clone)]
pub struct RoomAllocator {
    labs: Vec<Classroom>,
    regular: Vec<Classroom>,
    lab_memo: HashMap<(Section, String), u32>,
}

/// Whether a batch is in its second year relative to the other batches in
/// the run. Batches are ranked by intake year; the second-newest intake is
/// the second-year batch.
pub fn is_second_year(batch: &str, all_batches: &[String]) -> bool {
    let year_of = |b: &str| -> Option<u32> {
        let digits: String = b.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    };
    let Some(year) = year_of(batch) else {
        return false;
    };
    let mut years: Vec<u32> = all_batches.iter().filter_map(|b| year_of(b)).collect();
    years.sort_unstable();
    years.dedup();
    years.iter().rev().nth(1) == Some(&year)
}

impl RoomAllocator {
    /// Builds an allocator over the run's rooms.
    pub fn new(rooms: &[Classroom]) -> Self {
        let mut labs: Vec<Classroom> = rooms.iter().filter(|r| r.is_lab).cloned().collect();
        let mut regular: Vec<Classroom> = rooms.iter().filter(|r| !r.is_lab).cloned().collect();
        labs.sort_by(|a, b| {
            (a.building_priority(), a.name.as_str()).cmp(&(b.building_priority(), b.name.as_str()))
        });
        regular.sort_by(|a, b| {
            (a.building_priority(), a.name.as_str()).cmp(&(b.building_priority(), b.name.as_str()))
        });
        Self {
            labs,
            regular,
            lab_memo: HashMap::new(),
        }
    }

    /// Allocates a lab for a practical block.
    ///
    /// Prefers the lab this (section, subject) pair has used before; when
    /// that lab is taken for any period of the block, searches all labs
    /// fresh and re-memoizes the result. Never returns a non-lab.
    pub fn allocate_practical(
        &mut self,
        index: &AvailabilityIndex,
        section: &Section,
        subject_code: &str,
        day: Weekday,
        start: u32,
        len: u32,
    ) -> Option<u32> {
        let key = (section.clone(), subject_code.to_string());
        if let Some(&lab_id) = self.lab_memo.get(&key) {
            if index.room_free_block(lab_id, day, start, len) {
                return Some(lab_id);
            }
        }
        let found = self
            .labs
            .iter()
            .find(|lab| index.room_free_block(lab.id, day, start, len))
            .map(|lab| lab.id)?;
        self.lab_memo.insert(key, found);
        Some(found)
    }

    /// Allocates a room for one theory period.
    ///
    /// Regular rooms first, reordered so the batch's preferred building
    /// leads; labs only when no regular room is free.
    pub fn allocate_theory(
        &self,
        index: &AvailabilityIndex,
        section: &Section,
        all_batches: &[String],
        day: Weekday,
        period: u32,
    ) -> Option<u32> {
        let preferred = if is_second_year(&section.batch, all_batches) {
            "Academic Building"
        } else {
            "Main Building"
        };

        let in_preferred = self
            .regular
            .iter()
            .filter(|r| r.building == preferred)
            .find(|r| index.room_free(r.id, day, period));
        if let Some(r) = in_preferred {
            return Some(r.id);
        }

        if let Some(r) = self
            .regular
            .iter()
            .filter(|r| r.building != preferred)
            .find(|r| index.room_free(r.id, day, period))
        {
            return Some(r.id);
        }

        self.labs
            .iter()
            .find(|r| index.room_free(r.id, day, period))
            .map(|r| r.id)
    }

    /// Looks up a room by id.
    pub fn room(&self, id: u32) -> Option<&Classroom> {
        self.labs
            .iter()
            .chain(self.regular.iter())
            .find(|r| r.id == id)
    }
}
