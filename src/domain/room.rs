use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::course::Course;
use super::day::DayNumber;

/// Room names that are never real bookable lab space and are dropped at
/// load time.
pub const EXCLUDED_ROOMS: [&str; 2] = ["007", "AITS"];

/// One row of the room allowlist: a (building, room) pair this course's
/// subject/catalog may book a lab in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub building: String,
    pub room: String,
    pub subject: String,
    pub allowed_catalogs: Vec<String>,
}

impl RoomAssignment {
    pub fn is_excluded(&self) -> bool {
        EXCLUDED_ROOMS.contains(&self.room.as_str())
    }

    pub fn allows(&self, subject: &str, catalog: &str) -> bool {
        self.subject == subject && self.allowed_catalogs.iter().any(|c| c == catalog)
    }
}

#[derive(Debug, Clone)]
pub struct RoomSlot {
    pub day: DayNumber,
    pub start: u32,
    pub end: u32,
    pub subject: String,
    pub catalog_nbr: String,
    pub class_nbr: String,
    pub lab_index: usize,
}

/// Per-(building, room) ordered booking table. No two slots in the same
/// timetable may share a day with overlapping `[start, end)` intervals.
#[derive(Debug, Clone, Default)]
pub struct RoomTimetable {
    slots: HashMap<(String, String), Vec<RoomSlot>>,
}

impl RoomTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_conflict(&self, building: &str, room: &str, day: DayNumber, start: u32, end: u32) -> bool {
        match self.slots.get(&(building.to_string(), room.to_string())) {
            None => false,
            Some(existing) => existing
                .iter()
                .any(|s| s.day == day && start < s.end && s.start < end),
        }
    }

    pub fn book(&mut self, building: &str, room: &str, slot: RoomSlot) {
        self.slots
            .entry((building.to_string(), room.to_string()))
            .or_default()
            .push(slot);
    }

    /// Builds a timetable from every room-bearing lab already placed in
    /// `courses`, skipping the course at `excluded_idx` (if any). Used to
    /// re-derive room occupancy for an offspring or mutation candidate
    /// without threading a running timetable through every call site.
    pub fn from_courses(courses: &[Course], excluded_idx: Option<usize>) -> Self {
        let mut timetable = Self::new();
        for (i, course) in courses.iter().enumerate() {
            if Some(i) == excluded_idx {
                continue;
            }
            for lab in course.labs() {
                if let (Some(b), Some(r)) = (&lab.building, &lab.room) {
                    for &d in &lab.day {
                        timetable.book(
                            b,
                            r,
                            RoomSlot {
                                day: d,
                                start: lab.start,
                                end: lab.end,
                                subject: course.subject.clone(),
                                catalog_nbr: course.catalog_nbr.clone(),
                                class_nbr: course.class_nbr.clone(),
                                lab_index: 0,
                            },
                        );
                    }
                }
            }
        }
        timetable
    }

    /// All pairs of bookings across every room that clash on day and time.
    /// A well-formed timetable produces none; used by the conflict
    /// enumerator as a defensive double-check and in tests.
    pub fn internal_conflicts(&self) -> Vec<((String, String), RoomSlot, RoomSlot)> {
        let mut out = Vec::new();
        for (key, slots) in &self.slots {
            for i in 0..slots.len() {
                for j in (i + 1)..slots.len() {
                    let a = &slots[i];
                    let b = &slots[j];
                    if a.day == b.day && a.start < b.end && b.start < a.end {
                        out.push((key.clone(), a.clone(), b.clone()));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_sentinel_rooms() {
        let r = RoomAssignment {
            building: "H".into(),
            room: "007".into(),
            subject: "COEN".into(),
            allowed_catalogs: vec!["212".into()],
        };
        assert!(r.is_excluded());
    }

    #[test]
    fn detects_same_room_overlap() {
        let mut t = RoomTimetable::new();
        t.book(
            "H",
            "929",
            RoomSlot {
                day: 1,
                start: 525,
                end: 690,
                subject: "COEN".into(),
                catalog_nbr: "212".into(),
                class_nbr: "1".into(),
                lab_index: 0,
            },
        );
        assert!(t.has_conflict("H", "929", 1, 600, 765));
        assert!(!t.has_conflict("H", "929", 1, 690, 855));
        assert!(!t.has_conflict("H", "929", 2, 525, 690));
    }
}
