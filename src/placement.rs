//! Discrete time-slot placement for tutorials and labs.
//!
//! The catalog of legal start times is keyed by duration and mirrors the
//! fixed period grid a real timetable draws from; lectures are never
//! placed here, only read back for clash checks.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::domain::day::{both_weeks, WEEKDAYS_BOTH_WEEKS, WEEKDAYS_WEEK1};
use crate::domain::element::{clashes, CourseElement};
use crate::domain::room::RoomTimetable;
use crate::domain::Course;

const TUT_ATTEMPTS: usize = 120;
const LAB_ATTEMPTS: usize = 100;
const COURSE_ATTEMPTS: usize = 100;

fn starts_for_duration(duration: u32) -> &'static [u32] {
    match duration {
        50 => &[525, 640, 705, 820, 885, 1000, 1065, 1180],
        100 => &[525, 590, 705, 770, 885, 950, 1065, 1150],
        165 => &[525, 705, 885, 1065],
        _ => &[525, 705, 885, 1065],
    }
}

/// Running count of placements that exhausted their retry budget and fell
/// back to the last-tried candidate rather than a verified clash-free one.
/// Threaded explicitly rather than kept as module-global state so the GA
/// loop stays deterministic and reentrant under an injected RNG.
#[derive(Debug, Default)]
pub struct PlacementStats {
    pub fallback_count: u64,
}

/// Proposes one tutorial meeting for `course`, retrying until it clears the
/// course's own lecture or until the retry budget is exhausted, in which
/// case the last candidate is returned anyway (see placement fallback
/// semantics).
pub fn propose_tutorial(course: &Course, rng: &mut impl Rng, stats: &mut PlacementStats) -> CourseElement {
    let starts = starts_for_duration(course.tut_duration);
    let mut candidate = CourseElement::unplaced();
    for attempt in 0..TUT_ATTEMPTS {
        let weekday = *WEEKDAYS_WEEK1.choose(rng).unwrap();
        let start = *starts.choose(rng).unwrap();
        let end = start + course.tut_duration;
        let days = both_weeks(&[weekday]);
        candidate = CourseElement::new(days, start, end);
        if !clashes(&candidate, course.lecture()) {
            return candidate;
        }
        if attempt == TUT_ATTEMPTS - 1 {
            stats.fallback_count += 1;
        }
    }
    candidate
}

/// Computes the fortnight day set for a lab given its biweekly base weekday
/// and frequency, per the frequency rule: frequency 1 meets once, frequency
/// 2 meets on the same weekday both weeks.
fn lab_days_for_frequency(base: u8, freq: u8) -> Vec<u8> {
    match freq {
        1 => vec![base],
        2 => {
            let monday_week1 = if base > 7 { base - 7 } else { base };
            vec![monday_week1, monday_week1 + 7]
        }
        _ => vec![base],
    }
}

/// Proposes one lab meeting for `course`, rejecting candidates that clash
/// with its lecture or with bookings already present in `room_timetable`
/// (when a room has been assigned). Falls back to a lecture-only-checked
/// candidate after the retry budget is exhausted.
pub fn propose_lab(
    course: &Course,
    building: Option<&str>,
    room: Option<&str>,
    room_timetable: &RoomTimetable,
    rng: &mut impl Rng,
    stats: &mut PlacementStats,
) -> CourseElement {
    let starts = starts_for_duration(course.lab_duration);
    let mut candidate = CourseElement::unplaced();
    for _attempt in 0..LAB_ATTEMPTS {
        let base = *WEEKDAYS_BOTH_WEEKS.choose(rng).unwrap();
        let days = lab_days_for_frequency(base, course.biweekly_lab_freq);
        let start = *starts.choose(rng).unwrap();
        let end = start + course.lab_duration;
        candidate = CourseElement::new(days.clone(), start, end);

        if clashes(&candidate, course.lecture()) {
            continue;
        }
        if let (Some(b), Some(r)) = (building, room) {
            let room_clash = days.iter().any(|&d| room_timetable.has_conflict(b, r, d, start, end));
            if room_clash {
                continue;
            }
        }
        if let (Some(b), Some(r)) = (building, room) {
            return candidate.with_room(b, r);
        }
        return candidate;
    }
    stats.fallback_count += 1;
    match (building, room) {
        (Some(b), Some(r)) => candidate.with_room(b, r),
        _ => candidate,
    }
}

/// Re-places every tutorial and lab of `course`, retrying the whole course
/// up to [`COURSE_ATTEMPTS`] times until no internal clash remains (lecture
/// vs. tutorial/lab, and tutorial/lab vs. each other). On exhaustion the
/// best attempted placement is kept — this function never fails.
pub fn initialize_course(
    course: &Course,
    building: Option<&str>,
    room: Option<&str>,
    room_timetable: &RoomTimetable,
    rng: &mut impl Rng,
    stats: &mut PlacementStats,
) -> (Vec<CourseElement>, Vec<CourseElement>) {
    let mut best: Option<(Vec<CourseElement>, Vec<CourseElement>)> = None;
    let mut best_conflicts = usize::MAX;

    for _ in 0..COURSE_ATTEMPTS {
        let tutorials: Vec<CourseElement> = (0..course.tut_count)
            .map(|_| propose_tutorial(course, rng, stats))
            .collect();
        let labs: Vec<CourseElement> = (0..course.lab_count)
            .map(|_| propose_lab(course, building, room, room_timetable, rng, stats))
            .collect();

        let conflicts = internal_conflicts(course, &tutorials, &labs);
        if conflicts == 0 {
            return (tutorials, labs);
        }
        if conflicts < best_conflicts {
            best_conflicts = conflicts;
            best = Some((tutorials, labs));
        }
    }

    best.unwrap_or_else(|| {
        (
            (0..course.tut_count).map(|_| CourseElement::unplaced()).collect(),
            (0..course.lab_count).map(|_| CourseElement::unplaced()).collect(),
        )
    })
}

fn internal_conflicts(course: &Course, tutorials: &[CourseElement], labs: &[CourseElement]) -> usize {
    let mut count = 0;
    for t in tutorials {
        if clashes(t, course.lecture()) {
            count += 1;
        }
    }
    for l in labs {
        if clashes(l, course.lecture()) {
            count += 1;
        }
    }
    for i in 0..tutorials.len() {
        for j in (i + 1)..tutorials.len() {
            if clashes(&tutorials[i], &tutorials[j]) {
                count += 1;
            }
        }
    }
    for i in 0..labs.len() {
        for j in (i + 1)..labs.len() {
            if clashes(&labs[i], &labs[j]) {
                count += 1;
            }
        }
    }
    for t in tutorials {
        for l in labs {
            if clashes(t, l) {
                count += 1;
            }
        }
    }
    count
}
