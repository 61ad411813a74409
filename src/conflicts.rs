//! Categorized conflict diagnostics for a finished schedule.

use serde::Serialize;

use crate::domain::element::clashes;
use crate::domain::room::RoomTimetable;
use crate::domain::{AcademicPlanTerm, Course};
use crate::fitness::{get_course_by_code, has_valid_sequence_combination, SequenceFeasibilityCache};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum ConflictKind {
    LectureTutorial,
    LectureLab,
    SequenceMissingCourse,
    SequenceTutorialOverlap,
    SequenceLabOverlap,
    SequenceTutorialLabOverlap,
    SequenceNoValidCombination,
    RoomConflict,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConflictKind::LectureTutorial => "Lecture-Tutorial",
            ConflictKind::LectureLab => "Lecture-Lab",
            ConflictKind::SequenceMissingCourse => "Sequence-Missing Course",
            ConflictKind::SequenceTutorialOverlap => "Sequence-Tutorial Overlap",
            ConflictKind::SequenceLabOverlap => "Sequence-Lab Overlap",
            ConflictKind::SequenceTutorialLabOverlap => "Sequence-Tutorial/Lab Overlap",
            ConflictKind::SequenceNoValidCombination => "Sequence-No Valid Combination",
            ConflictKind::RoomConflict => "Room Conflict",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictRecord {
    pub kind: ConflictKind,
    pub course1: String,
    pub course2: Option<String>,
    pub class_nbr1: String,
    pub class_nbr2: Option<String>,
    pub component1: Option<String>,
    pub component1_index: Option<usize>,
    pub component2: Option<String>,
    pub component2_index: Option<usize>,
    pub day: Option<u8>,
    pub time1: Option<(u32, u32)>,
    pub time2: Option<(u32, u32)>,
    pub building: Option<String>,
    pub room: Option<String>,
}

/// Walks the finished schedule producing every lecture clash, every
/// infeasible plan term (with the specific overlapping pair when one can
/// be isolated), and every room double-booking.
pub fn enumerate_conflicts(schedule: &[Course], terms: &[AcademicPlanTerm]) -> Vec<ConflictRecord> {
    let mut out = Vec::new();

    for course in schedule {
        for (idx, t) in course.tutorials().iter().enumerate() {
            if clashes(t, course.lecture()) {
                out.push(ConflictRecord {
                    kind: ConflictKind::LectureTutorial,
                    course1: course.code(),
                    course2: None,
                    class_nbr1: course.class_nbr.clone(),
                    class_nbr2: None,
                    component1: Some("Lecture".into()),
                    component1_index: None,
                    component2: Some("Tutorial".into()),
                    component2_index: Some(idx),
                    day: shared_day(course.lecture(), t),
                    time1: Some((course.lecture().start, course.lecture().end)),
                    time2: Some((t.start, t.end)),
                    building: None,
                    room: None,
                });
            }
        }
        for (idx, l) in course.labs().iter().enumerate() {
            if clashes(l, course.lecture()) {
                out.push(ConflictRecord {
                    kind: ConflictKind::LectureLab,
                    course1: course.code(),
                    course2: None,
                    class_nbr1: course.class_nbr.clone(),
                    class_nbr2: None,
                    component1: Some("Lecture".into()),
                    component1_index: None,
                    component2: Some("Lab".into()),
                    component2_index: Some(idx),
                    day: shared_day(course.lecture(), l),
                    time1: Some((course.lecture().start, course.lecture().end)),
                    time2: Some((l.start, l.end)),
                    building: l.building.clone(),
                    room: l.room.clone(),
                });
            }
        }
    }

    let mut cache = SequenceFeasibilityCache::new();
    for term in terms {
        out.extend(enumerate_term_conflicts(schedule, term, &mut cache));
    }

    out.extend(enumerate_room_conflicts(schedule));

    out
}

fn shared_day(a: &crate::domain::CourseElement, b: &crate::domain::CourseElement) -> Option<u8> {
    a.day.iter().find(|d| b.day.contains(d)).copied()
}

fn enumerate_term_conflicts(schedule: &[Course], term: &AcademicPlanTerm, cache: &mut SequenceFeasibilityCache) -> Vec<ConflictRecord> {
    let mut missing = Vec::new();
    let mut present = Vec::new();
    for code in &term.courses {
        match get_course_by_code(schedule, code) {
            Some(c) => present.push(c),
            None => missing.push(code.clone()),
        }
    }

    if !missing.is_empty() {
        return missing
            .into_iter()
            .map(|code| ConflictRecord {
                kind: ConflictKind::SequenceMissingCourse,
                course1: code,
                course2: None,
                class_nbr1: String::new(),
                class_nbr2: None,
                component1: None,
                component1_index: None,
                component2: None,
                component2_index: None,
                day: None,
                time1: None,
                time2: None,
                building: None,
                room: None,
            })
            .collect();
    }

    if has_valid_sequence_combination(schedule, &term.courses, cache) {
        return Vec::new();
    }

    // Term is infeasible; try to isolate a specific overlapping pair for a
    // more useful diagnosis before falling back to the generic record.
    for i in 0..present.len() {
        for j in (i + 1)..present.len() {
            for (ti, t1) in present[i].tutorials().iter().enumerate() {
                for (tj, t2) in present[j].tutorials().iter().enumerate() {
                    if clashes(t1, t2) {
                        return vec![pair_record(
                            ConflictKind::SequenceTutorialOverlap,
                            present[i], present[j], "Tutorial", ti, "Tutorial", tj, t1, t2,
                        )];
                    }
                }
            }
            for (li, l1) in present[i].labs().iter().enumerate() {
                for (lj, l2) in present[j].labs().iter().enumerate() {
                    if clashes(l1, l2) {
                        return vec![pair_record(
                            ConflictKind::SequenceLabOverlap,
                            present[i], present[j], "Lab", li, "Lab", lj, l1, l2,
                        )];
                    }
                }
            }
            for (ti, t1) in present[i].tutorials().iter().enumerate() {
                for (lj, l2) in present[j].labs().iter().enumerate() {
                    if clashes(t1, l2) {
                        return vec![pair_record(
                            ConflictKind::SequenceTutorialLabOverlap,
                            present[i], present[j], "Tutorial", ti, "Lab", lj, t1, l2,
                        )];
                    }
                }
            }
        }
    }

    vec![ConflictRecord {
        kind: ConflictKind::SequenceNoValidCombination,
        course1: term.courses.join(","),
        course2: None,
        class_nbr1: String::new(),
        class_nbr2: None,
        component1: None,
        component1_index: None,
        component2: None,
        component2_index: None,
        day: None,
        time1: None,
        time2: None,
        building: None,
        room: None,
    }]
}

#[allow(clippy::too_many_arguments)]
fn pair_record(
    kind: ConflictKind,
    c1: &Course,
    c2: &Course,
    comp1: &str,
    idx1: usize,
    comp2: &str,
    idx2: usize,
    e1: &crate::domain::CourseElement,
    e2: &crate::domain::CourseElement,
) -> ConflictRecord {
    ConflictRecord {
        kind,
        course1: c1.code(),
        course2: Some(c2.code()),
        class_nbr1: c1.class_nbr.clone(),
        class_nbr2: Some(c2.class_nbr.clone()),
        component1: Some(comp1.into()),
        component1_index: Some(idx1),
        component2: Some(comp2.into()),
        component2_index: Some(idx2),
        day: shared_day(e1, e2),
        time1: Some((e1.start, e1.end)),
        time2: Some((e2.start, e2.end)),
        building: e2.building.clone(),
        room: e2.room.clone(),
    }
}

fn enumerate_room_conflicts(schedule: &[Course]) -> Vec<ConflictRecord> {
    let mut timetable = RoomTimetable::new();
    let mut out = Vec::new();

    for course in schedule {
        for lab in course.labs() {
            if lab.is_empty() {
                continue;
            }
            let (Some(b), Some(r)) = (&lab.building, &lab.room) else {
                continue;
            };
            for &d in &lab.day {
                if timetable.has_conflict(b, r, d, lab.start, lab.end) {
                    out.push(ConflictRecord {
                        kind: ConflictKind::RoomConflict,
                        course1: course.code(),
                        course2: None,
                        class_nbr1: course.class_nbr.clone(),
                        class_nbr2: None,
                        component1: Some("Lab".into()),
                        component1_index: None,
                        component2: None,
                        component2_index: None,
                        day: Some(d),
                        time1: Some((lab.start, lab.end)),
                        time2: None,
                        building: Some(b.clone()),
                        room: Some(r.clone()),
                    });
                }
                timetable.book(
                    b,
                    r,
                    crate::domain::room::RoomSlot {
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
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseElement;

    #[test]
    fn missing_course_produces_one_record() {
        let c = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 705, 780), 0, 0, 0, 0, 0, 0);
        let term = AcademicPlanTerm::new(vec!["COEN212".into(), "COEN231".into()]);
        let records = enumerate_conflicts(&[c], &[term]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ConflictKind::SequenceMissingCourse);
        assert_eq!(records[0].course1, "COEN231");
    }

    #[test]
    fn tutorial_overlap_is_isolated() {
        let mut c1 = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 705, 780), 1, 1, 50, 0, 0, 0);
        c1.assign_non_lecture(vec![CourseElement::new(vec![1], 525, 575)], vec![]);
        let mut c2 = Course::new("COEN", "231", "1", CourseElement::new(vec![2, 9], 705, 780), 1, 1, 50, 0, 0, 0);
        c2.assign_non_lecture(vec![CourseElement::new(vec![1], 550, 600)], vec![]);
        let term = AcademicPlanTerm::new(vec!["COEN212".into(), "COEN231".into()]);
        let records = enumerate_conflicts(&[c1, c2], &[term]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ConflictKind::SequenceTutorialOverlap);
    }

    #[test]
    fn room_double_booking_detected() {
        let mut c1 = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 0, 0), 0, 0, 0, 1, 1, 165);
        c1.assign_non_lecture(vec![], vec![CourseElement::new(vec![1], 525, 690).with_room("H", "929")]);
        let mut c2 = Course::new("COEN", "231", "1", CourseElement::new(vec![2, 9], 0, 0), 0, 0, 0, 1, 1, 165);
        c2.assign_non_lecture(vec![], vec![CourseElement::new(vec![1], 525, 690).with_room("H", "929")]);
        let records = enumerate_conflicts(&[c1, c2], &[]);
        assert_eq!(records.iter().filter(|r| r.kind == ConflictKind::RoomConflict).count(), 1);
    }
}
