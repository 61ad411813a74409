//! Variety scoring, conflict counting, and plan-term feasibility.

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::domain::element::{clashes, CourseElement};
use crate::domain::room::{RoomSlot, RoomTimetable};
use crate::domain::{AcademicPlanTerm, Course};

/// `variety_score` averages over every tutorial bundle and lab bundle in
/// the schedule. A bundle of size <= 1 always contributes the maximum 1.0;
/// larger bundles are rewarded for spreading across distinct days and
/// start times.
pub fn calculate_variety_score(elements: &[CourseElement]) -> f64 {
    if elements.len() <= 1 {
        return 1.0;
    }
    let total_day_marks: usize = elements.iter().map(|e| e.day.len()).sum();
    if total_day_marks == 0 {
        return 1.0;
    }
    let unique_days: HashSet<u8> = elements.iter().flat_map(|e| e.day.iter().copied()).collect();
    let unique_starts: HashSet<u32> = elements.iter().map(|e| e.start).collect();

    0.5 * (unique_days.len() as f64 / total_day_marks as f64) + 0.5 * (unique_starts.len() as f64 / elements.len() as f64)
}

fn course_variety(course: &Course) -> f64 {
    let tut_score = calculate_variety_score(course.tutorials());
    let lab_score = calculate_variety_score(course.labs());
    (tut_score + lab_score) / 2.0
}

/// Counts lecture-vs-tutorial and lecture-vs-lab clashes for one course.
pub fn count_lecture_conflicts(course: &Course) -> usize {
    let mut count = 0;
    for t in course.tutorials() {
        if clashes(t, course.lecture()) {
            count += 1;
        }
    }
    for l in course.labs() {
        if clashes(l, course.lecture()) {
            count += 1;
        }
    }
    count
}

pub fn get_course_by_code<'a>(schedule: &'a [Course], code: &str) -> Option<&'a Course> {
    schedule.iter().find(|c| c.code() == code)
}

/// Cache key for one term's feasibility check: the term's course codes
/// together with every tutorial/lab placement currently assigned to those
/// courses. Two calls with the same fingerprint must return the same
/// answer, so the cache never needs invalidating within its scope.
pub type SequenceFeasibilityCache = HashMap<String, bool>;

fn fingerprint_elements(elements: &[CourseElement]) -> String {
    elements.iter().map(|e| format!("{:?}/{}-{}", e.day, e.start, e.end)).collect::<Vec<_>>().join(",")
}

fn term_fingerprint(schedule: &[Course], term: &[String]) -> String {
    term.iter()
        .map(|code| match get_course_by_code(schedule, code) {
            Some(c) => format!("{code}:{}:{}", fingerprint_elements(c.tutorials()), fingerprint_elements(c.labs())),
            None => format!("{code}:MISSING"),
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Cartesian search for one clash-free pick of one tutorial and one lab per
/// course in `term`. Pruned aggressively: a partial tutorial tuple is
/// rejected the moment any pair within it clashes, and likewise for labs;
/// cross tutorial/lab clashes are only checked on fully-formed tuples.
///
/// Results are memoized in `cache`, keyed by a fingerprint of the term's
/// course placements, since the same term is frequently re-checked against
/// an unchanged (or only partially changed) schedule within one fitness
/// evaluation or one crossover/repair call.
pub fn has_valid_sequence_combination(schedule: &[Course], term: &[String], cache: &mut SequenceFeasibilityCache) -> bool {
    let key = term_fingerprint(schedule, term);
    if let Some(&cached) = cache.get(&key) {
        return cached;
    }

    let courses: Vec<&Course> = match term.iter().map(|code| get_course_by_code(schedule, code)).collect::<Option<_>>() {
        Some(c) => c,
        None => {
            cache.insert(key, false);
            return false;
        }
    };

    fn search_tutorials(
        courses: &[&Course],
        idx: usize,
        chosen: &mut Vec<CourseElement>,
        f: &mut dyn FnMut(&[CourseElement]) -> bool,
    ) -> bool {
        if idx == courses.len() {
            return f(chosen);
        }
        let bundle = courses[idx].tutorials();
        if bundle.is_empty() {
            chosen.push(CourseElement::unplaced());
            let r = search_tutorials(courses, idx + 1, chosen, f);
            chosen.pop();
            return r;
        }
        for elem in bundle {
            if chosen.iter().any(|c| clashes(c, elem)) {
                continue;
            }
            chosen.push(elem.clone());
            if search_tutorials(courses, idx + 1, chosen, f) {
                chosen.pop();
                return true;
            }
            chosen.pop();
        }
        false
    }

    fn search_labs(
        courses: &[&Course],
        idx: usize,
        tutorials: &[CourseElement],
        chosen: &mut Vec<CourseElement>,
    ) -> bool {
        if idx == courses.len() {
            for i in 0..chosen.len() {
                for t in tutorials {
                    if clashes(&chosen[i], t) {
                        return false;
                    }
                }
            }
            return true;
        }
        let bundle = courses[idx].labs();
        if bundle.is_empty() {
            chosen.push(CourseElement::unplaced());
            let r = search_labs(courses, idx + 1, tutorials, chosen);
            chosen.pop();
            return r;
        }
        for elem in bundle {
            if chosen.iter().any(|c| clashes(c, elem)) {
                continue;
            }
            chosen.push(elem.clone());
            if search_labs(courses, idx + 1, tutorials, chosen) {
                chosen.pop();
                return true;
            }
            chosen.pop();
        }
        false
    }

    let mut found = false;
    let mut tut_chosen = Vec::new();
    search_tutorials(&courses, 0, &mut tut_chosen, &mut |tuts| {
        let mut lab_chosen = Vec::new();
        if search_labs(&courses, 0, tuts, &mut lab_chosen) {
            found = true;
            true
        } else {
            false
        }
    });
    cache.insert(key, found);
    found
}

/// Counts the academic-plan terms for which no clash-free combination
/// exists, including a missing-course as one conflict for its term.
/// Shares one feasibility cache across every term checked in this pass.
pub fn count_sequence_conflicts(schedule: &[Course], terms: &[Vec<String>]) -> usize {
    let mut cache = SequenceFeasibilityCache::new();
    terms
        .iter()
        .filter(|term| {
            let all_present = term.iter().all(|code| get_course_by_code(schedule, code).is_some());
            !all_present || !has_valid_sequence_combination(schedule, term, &mut cache)
        })
        .count()
}

/// Builds a fresh room timetable from every lab assignment in the
/// schedule and counts pairs of lab slots mapped to the same
/// (building, room) that clash.
pub fn count_room_conflicts(schedule: &[Course]) -> usize {
    let mut timetable = RoomTimetable::new();
    let mut pending: Vec<(String, String, RoomSlot)> = Vec::new();

    for course in schedule {
        for (idx, lab) in course.labs().iter().enumerate() {
            if lab.is_empty() {
                continue;
            }
            if let (Some(b), Some(r)) = (&lab.building, &lab.room) {
                for &d in &lab.day {
                    pending.push((
                        b.clone(),
                        r.clone(),
                        RoomSlot {
                            day: d,
                            start: lab.start,
                            end: lab.end,
                            subject: course.subject.clone(),
                            catalog_nbr: course.catalog_nbr.clone(),
                            class_nbr: course.class_nbr.clone(),
                            lab_index: idx,
                        },
                    ));
                }
            }
        }
    }

    let mut conflicts = 0;
    for (b, r, slot) in pending {
        if timetable.has_conflict(&b, &r, slot.day, slot.start, slot.end) {
            conflicts += 1;
        }
        timetable.book(&b, &r, slot);
    }
    conflicts
}

/// `fitness = variety_score - 2 * total_conflicts`.
pub fn fitness_function(schedule: &[Course], terms: &[AcademicPlanTerm]) -> f64 {
    if schedule.is_empty() {
        return 0.0;
    }

    let variety: f64 = schedule.iter().map(course_variety).sum::<f64>() / schedule.len() as f64;
    let lecture_conflicts: usize = schedule.iter().map(count_lecture_conflicts).sum();

    let term_course_lists: Vec<Vec<String>> = terms.iter().map(|t| t.courses.clone()).collect();
    let sequence_conflicts = count_sequence_conflicts(schedule, &term_course_lists);
    let room_conflicts = count_room_conflicts(schedule);

    let total_conflicts = lecture_conflicts + sequence_conflicts + room_conflicts;
    variety - 2.0 * total_conflicts as f64
}

/// Evaluates every individual's fitness in parallel; each evaluation is a
/// pure function of its schedule, so there's no shared mutable state to
/// coordinate across the pool.
pub fn evaluate_population(population: &[Vec<Course>], terms: &[AcademicPlanTerm]) -> Vec<f64> {
    population.par_iter().map(|schedule| fitness_function(schedule, terms)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseElement;

    fn make_course(
        lecture_days: Vec<u8>,
        lec_start: u32,
        lec_end: u32,
        tut_count: usize,
        lab_count: usize,
        tut_duration: u32,
        lab_duration: u32,
    ) -> Course {
        Course::new(
            "COEN", "311", "00001",
            CourseElement::new(lecture_days, lec_start, lec_end),
            tut_count, 1, tut_duration,
            lab_count, 1, lab_duration,
        )
    }

    #[test]
    fn variety_score_single_element() {
        let elements = vec![CourseElement::new(vec![1], 525, 690)];
        assert_eq!(calculate_variety_score(&elements), 1.0);
    }

    #[test]
    fn variety_score_empty() {
        assert_eq!(calculate_variety_score(&[]), 1.0);
    }

    #[test]
    fn variety_score_identical_is_lower_than_varied() {
        let identical = vec![
            CourseElement::new(vec![1], 525, 690),
            CourseElement::new(vec![1], 525, 690),
        ];
        let varied = vec![
            CourseElement::new(vec![1], 525, 690),
            CourseElement::new(vec![2], 705, 870),
        ];
        assert!(calculate_variety_score(&identical) < calculate_variety_score(&varied));
        assert!(calculate_variety_score(&identical) < 1.0);
    }

    #[test]
    fn no_lecture_conflicts_when_disjoint() {
        let mut c = make_course(vec![1, 8], 705, 780, 1, 0, 50, 0);
        c.assign_non_lecture(vec![CourseElement::new(vec![2, 9], 525, 575)], vec![]);
        assert_eq!(count_lecture_conflicts(&c), 0);
    }

    #[test]
    fn lecture_tut_conflict_detected() {
        let mut c = make_course(vec![1, 8], 705, 780, 1, 0, 50, 0);
        c.assign_non_lecture(vec![CourseElement::new(vec![1], 720, 770)], vec![]);
        assert_eq!(count_lecture_conflicts(&c), 1);
    }

    #[test]
    fn fitness_empty_schedule_is_zero() {
        assert_eq!(fitness_function(&[], &[]), 0.0);
    }

    #[test]
    fn fitness_with_conflicts_is_negative() {
        let mut c = make_course(vec![1, 8], 525, 690, 1, 0, 50, 0);
        c.assign_non_lecture(vec![CourseElement::new(vec![1], 600, 650)], vec![]);
        let score = fitness_function(&[c], &[]);
        assert!(score < 0.0);
    }

    #[test]
    fn sequence_combo_detects_missing_course() {
        let c = make_course(vec![1, 8], 705, 780, 0, 0, 0, 0);
        let conflicts = count_sequence_conflicts(&[c], &[vec!["COEN311".into(), "COEN231".into()]]);
        assert_eq!(conflicts, 1);
    }

    #[test]
    fn sequence_combo_non_overlapping_is_valid() {
        let mut c1 = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 705, 780), 1, 1, 50, 0, 0, 0);
        c1.assign_non_lecture(vec![CourseElement::new(vec![1], 525, 575)], vec![]);
        let mut c2 = Course::new("COEN", "231", "1", CourseElement::new(vec![2, 9], 705, 780), 1, 1, 50, 0, 0, 0);
        c2.assign_non_lecture(vec![CourseElement::new(vec![2], 525, 575)], vec![]);
        assert!(has_valid_sequence_combination(&[c1, c2], &["COEN212".into(), "COEN231".into()], &mut SequenceFeasibilityCache::new()));
    }

    #[test]
    fn sequence_combo_overlapping_tuts_is_invalid() {
        let mut c1 = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 705, 780), 1, 1, 50, 0, 0, 0);
        c1.assign_non_lecture(vec![CourseElement::new(vec![1], 525, 575)], vec![]);
        let mut c2 = Course::new("COEN", "231", "1", CourseElement::new(vec![2, 9], 705, 780), 1, 1, 50, 0, 0, 0);
        c2.assign_non_lecture(vec![CourseElement::new(vec![1], 550, 600)], vec![]);
        assert!(!has_valid_sequence_combination(&[c1, c2], &["COEN212".into(), "COEN231".into()], &mut SequenceFeasibilityCache::new()));
    }

    #[test]
    fn evaluate_population_length_matches_input() {
        let c1 = make_course(vec![1, 8], 705, 780, 0, 0, 0, 0);
        let c2 = make_course(vec![2, 9], 705, 780, 0, 0, 0, 0);
        let population = vec![vec![c1.clone()], vec![c2.clone()], vec![c1, c2]];
        let scores = evaluate_population(&population, &[]);
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn room_conflict_counted_for_shared_room() {
        let mut c1 = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 0, 0), 0, 0, 0, 1, 1, 165);
        c1.assign_non_lecture(vec![], vec![CourseElement::new(vec![1], 525, 690).with_room("H", "929")]);
        let mut c2 = Course::new("COEN", "231", "1", CourseElement::new(vec![2, 9], 0, 0), 0, 0, 0, 1, 1, 165);
        c2.assign_non_lecture(vec![], vec![CourseElement::new(vec![1], 525, 690).with_room("H", "929")]);
        assert_eq!(count_room_conflicts(&[c1, c2]), 1);
    }
}
