//! Classroom model.
//!
//! Rooms fall into two kinds: labs, which are the only rooms that may host
//! practical blocks, and regular classrooms ranked by building desirability
//! for theory allocation.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique room identifier.
    pub id: u32,
    /// Display name, e.g. "CR-2" or "Software Lab 1".
    pub name: String,
    /// Building the room belongs to.
    pub building: String,
    /// Labs are the only rooms eligible for practical blocks.
    pub is_lab: bool,
}

impl Classroom {
    /// Creates a regular classroom.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            building: String::new(),
            is_lab: false,
        }
    }

    /// Creates a lab.
    pub fn lab(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            building: String::new(),
            is_lab: true,
        }
    }

    /// Sets the building name.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Allocation rank of this room's building. Lower sorts first.
    ///
    /// Named buildings get fixed ranks; anything unrecognized sorts last.
    pub fn building_priority(&self) -> u8 {
        match self.building.as_str() {
            "Lab Block" => 1,
            "Main Building" => 2,
            "Academic Building" => 3,
            "Admin Block" => 4,
            _ => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_kinds() {
        let cr = Classroom::new(1, "CR-2").with_building("Main Building");
        assert!(!cr.is_lab);
        assert_eq!(cr.building_priority(), 2);

        let lab = Classroom::lab(2, "Software Lab 1").with_building("Lab Block");
        assert!(lab.is_lab);
        assert_eq!(lab.building_priority(), 1);
    }

    #[test]
    fn test_unknown_building_sorts_last() {
        let r = Classroom::new(3, "Annex-1").with_building("Old Annex");
        assert_eq!(r.building_priority(), 5);
    }
}
