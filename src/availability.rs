//! Resource availability index.
//!
//! Tracks teacher and room occupancy across the whole run with composite-key
//! sets, giving O(1) membership checks regardless of how many sections have
//! been scheduled. The index is seeded from committed entries of other
//! semesters so that cross-semester clashes are impossible by construction,
//! and must be updated alongside every entry placement, move, or removal.

use std::collections::HashSet;

use crate::models::{TimetableEntry, Weekday};

/// Occupancy index for teachers and rooms.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    teacher_busy: HashSet<(u32, Weekday, u32)>,
    room_busy: HashSet<(u32, Weekday, u32)>,
}

impl AvailabilityIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the index from already-committed entries, typically a
    /// previously generated semester sharing the same staff and rooms.
    pub fn seed_from_entries(&mut self, entries: &[TimetableEntry]) {
        for e in entries {
            if let Some(t) = e.teacher_id {
                self.teacher_busy.insert((t, e.day, e.period));
            }
            if let Some(r) = e.room_id {
                self.room_busy.insert((r, e.day, e.period));
            }
        }
    }

    /// Marks a teacher busy at a slot.
    pub fn mark_teacher(&mut self, teacher_id: u32, day: Weekday, period: u32) {
        self.teacher_busy.insert((teacher_id, day, period));
    }

    /// Marks a room busy at a slot.
    pub fn mark_room(&mut self, room_id: u32, day: Weekday, period: u32) {
        self.room_busy.insert((room_id, day, period));
    }

    /// Releases a teacher at a slot.
    pub fn release_teacher(&mut self, teacher_id: u32, day: Weekday, period: u32) {
        self.teacher_busy.remove(&(teacher_id, day, period));
    }

    /// Releases a room at a slot.
    pub fn release_room(&mut self, room_id: u32, day: Weekday, period: u32) {
        self.room_busy.remove(&(room_id, day, period));
    }

    /// Whether a teacher has no booking at a slot.
    pub fn teacher_free(&self, teacher_id: u32, day: Weekday, period: u32) -> bool {
        !self.teacher_busy.contains(&(teacher_id, day, period))
    }

    /// Whether a room has no booking at a slot.
    pub fn room_free(&self, room_id: u32, day: Weekday, period: u32) -> bool {
        !self.room_busy.contains(&(room_id, day, period))
    }

    /// Whether a teacher is free across a consecutive block.
    pub fn teacher_free_block(&self, teacher_id: u32, day: Weekday, start: u32, len: u32) -> bool {
        (start..start + len).all(|p| self.teacher_free(teacher_id, day, p))
    }

    /// Whether a room is free across a consecutive block.
    pub fn room_free_block(&self, room_id: u32, day: Weekday, start: u32, len: u32) -> bool {
        (start..start + len).all(|p| self.room_free(room_id, day, p))
    }

    /// Records the teacher and room of an entry, if present.
    pub fn mark_entry(&mut self, entry: &TimetableEntry) {
        if let Some(t) = entry.teacher_id {
            self.mark_teacher(t, entry.day, entry.period);
        }
        if let Some(r) = entry.room_id {
            self.mark_room(r, entry.day, entry.period);
        }
    }

    /// Releases the teacher and room of an entry, if present.
    pub fn release_entry(&mut self, entry: &TimetableEntry) {
        if let Some(t) = entry.teacher_id {
            self.release_teacher(t, entry.day, entry.period);
        }
        if let Some(r) = entry.room_id {
            self.release_room(r, entry.day, entry.period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    #[test]
    fn test_mark_and_release() {
        let mut idx = AvailabilityIndex::new();
        idx.mark_teacher(1, Weekday::Monday, 3);
        assert!(!idx.teacher_free(1, Weekday::Monday, 3));
        assert!(idx.teacher_free(1, Weekday::Monday, 4));
        assert!(idx.teacher_free(2, Weekday::Monday, 3));

        idx.release_teacher(1, Weekday::Monday, 3);
        assert!(idx.teacher_free(1, Weekday::Monday, 3));
    }

    #[test]
    fn test_block_queries() {
        let mut idx = AvailabilityIndex::new();
        idx.mark_room(5, Weekday::Tuesday, 2);
        assert!(!idx.room_free_block(5, Weekday::Tuesday, 1, 3));
        assert!(idx.room_free_block(5, Weekday::Tuesday, 3, 3));
    }

    #[test]
    fn test_seeding_from_committed_entries() {
        let committed = vec![
            TimetableEntry::new(Section::new("20SW", "I"), "SW-216", Weekday::Monday, 1)
                .with_teacher(4)
                .with_room(2),
        ];
        let mut idx = AvailabilityIndex::new();
        idx.seed_from_entries(&committed);
        assert!(!idx.teacher_free(4, Weekday::Monday, 1));
        assert!(!idx.room_free(2, Weekday::Monday, 1));
        assert!(idx.teacher_free(4, Weekday::Monday, 2));
    }

    #[test]
    fn test_entry_round_trip() {
        let e = TimetableEntry::new(Section::new("21SW", "I"), "SW-316", Weekday::Friday, 2)
            .with_teacher(9)
            .with_room(7);
        let mut idx = AvailabilityIndex::new();
        idx.mark_entry(&e);
        assert!(!idx.teacher_free(9, Weekday::Friday, 2));
        idx.release_entry(&e);
        assert!(idx.teacher_free(9, Weekday::Friday, 2));
        assert!(idx.room_free(7, Weekday::Friday, 2));
    }
}
