//! Uniform crossover with core-course protection and repair.

use hashbrown::HashSet;
use rand::Rng;

use crate::domain::element::clashes;
use crate::domain::room::RoomTimetable;
use crate::domain::{AcademicPlanTerm, Course, RoomAssignment};
use crate::error::{Result, TimetableError};
use crate::fitness::{has_valid_sequence_combination, SequenceFeasibilityCache};
use crate::placement::{initialize_course, PlacementStats};

const REPAIR_ATTEMPTS: usize = 50;

/// Course codes that appear in at least one academic-plan term. These are
/// never mutated and are protected during crossover by the repair loop
/// below, since replacing them risks destroying a delicately feasible
/// plan-term assignment.
pub fn core_course_codes(terms: &[AcademicPlanTerm]) -> HashSet<String> {
    terms.iter().flat_map(|t| t.courses.iter().cloned()).collect()
}

fn room_for(course: &Course, rooms: &[RoomAssignment]) -> Option<(String, String)> {
    rooms
        .iter()
        .find(|r| r.allows(&course.subject, &course.catalog_nbr))
        .map(|r| (r.building.clone(), r.room.clone()))
}

/// Terms where every listed course is already present in `offspring_so_far`
/// (a course placed later in canonical order is vacuously ignored until
/// it's built).
fn resolvable_terms<'a>(terms: &'a [AcademicPlanTerm], offspring_so_far: &[Course]) -> Vec<&'a AcademicPlanTerm> {
    terms
        .iter()
        .filter(|t| t.courses.iter().all(|code| offspring_so_far.iter().any(|c| c.code() == *code)))
        .collect()
}

fn all_resolvable_terms_feasible(terms: &[AcademicPlanTerm], offspring_so_far: &[Course], cache: &mut SequenceFeasibilityCache) -> bool {
    resolvable_terms(terms, offspring_so_far)
        .iter()
        .all(|t| has_valid_sequence_combination(offspring_so_far, &t.courses, cache))
}

/// Every course already in `offspring_so_far` that shares a plan-term with
/// `course`, excluding `course` itself.
fn same_term_siblings<'a>(course: &Course, offspring_so_far: &'a [Course], terms: &[AcademicPlanTerm]) -> Vec<&'a Course> {
    let code = course.code();
    let sibling_codes: HashSet<String> = terms
        .iter()
        .filter(|t| t.courses.iter().any(|c| *c == code))
        .flat_map(|t| t.courses.iter().cloned())
        .filter(|c| *c != code)
        .collect();
    offspring_so_far.iter().filter(|c| sibling_codes.contains(&c.code())).collect()
}

/// Counts pairwise `clashes()` hits between every tutorial/lab element of
/// `candidate` and every tutorial/lab element of `siblings`, matching the
/// literal pairwise-overlap metric `minimize_overlap_placement` minimizes.
fn count_element_overlaps(candidate: &Course, siblings: &[&Course]) -> usize {
    let candidate_elems: Vec<&crate::domain::CourseElement> = candidate.tutorials().iter().chain(candidate.labs()).collect();
    let mut count = 0;
    for sibling in siblings {
        for sibling_elem in sibling.tutorials().iter().chain(sibling.labs()) {
            for &own_elem in &candidate_elems {
                if clashes(own_elem, sibling_elem) {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Produces one offspring by choosing each course from `parent_a` or
/// `parent_b` with equal probability. Both parents must carry the same
/// course identity at every index (enforced by the shared canonical
/// ordering); a mismatch is a structural bug, not a recoverable condition.
pub fn uniform_crossover(
    parent_a: &[Course],
    parent_b: &[Course],
    terms: &[AcademicPlanTerm],
    rooms: &[RoomAssignment],
    rng: &mut impl Rng,
) -> Result<Vec<Course>> {
    if parent_a.len() != parent_b.len() {
        return Err(TimetableError::Structural {
            detail: "crossover parents have different lengths".into(),
        });
    }

    let core = core_course_codes(terms);
    let mut offspring: Vec<Course> = Vec::with_capacity(parent_a.len());
    let mut stats = PlacementStats::default();
    let mut cache = SequenceFeasibilityCache::new();

    for i in 0..parent_a.len() {
        let (a, b) = (&parent_a[i], &parent_b[i]);
        if a.code() != b.code() {
            return Err(TimetableError::Structural {
                detail: format!("crossover parents disagree on course identity at index {i}: {} vs {}", a.code(), b.code()),
            });
        }

        let pick_a = rng.random_bool(0.5);
        let mut chosen = if pick_a { a.clone() } else { b.clone() };

        if core.contains(&chosen.code()) {
            offspring.push(chosen.clone());
            if !all_resolvable_terms_feasible(terms, &offspring, &mut cache) {
                offspring.pop();
                // try the other parent's version first
                chosen = if pick_a { b.clone() } else { a.clone() };
                offspring.push(chosen.clone());
                if !all_resolvable_terms_feasible(terms, &offspring, &mut cache) {
                    offspring.pop();
                    chosen = repair_by_replacement(&chosen, &offspring, terms, rooms, rng, &mut stats);
                    offspring.push(chosen);
                }
            }
        } else {
            offspring.push(chosen);
        }
    }

    Ok(offspring)
}

/// Attempts up to [`REPAIR_ATTEMPTS`] random re-placements of `course`,
/// keeping the replacement that minimizes the count of pairwise tutorial/lab
/// overlaps against the same-term courses already placed in
/// `offspring_so_far`, mirroring `minimize_overlap_placement`'s literal
/// overlap-count metric.
fn repair_by_replacement(
    course: &Course,
    offspring_so_far: &[Course],
    terms: &[AcademicPlanTerm],
    rooms: &[RoomAssignment],
    rng: &mut impl Rng,
    stats: &mut PlacementStats,
) -> Course {
    let room = room_for(course, rooms);
    let room_timetable = RoomTimetable::from_courses(offspring_so_far, None);
    let siblings = same_term_siblings(course, offspring_so_far, terms);

    let mut best = course.clone();
    let mut best_overlaps = usize::MAX;

    for _ in 0..REPAIR_ATTEMPTS {
        let (tutorials, labs) = initialize_course(
            course,
            room.as_ref().map(|(b, _)| b.as_str()),
            room.as_ref().map(|(_, r)| r.as_str()),
            &room_timetable,
            rng,
            stats,
        );
        let mut candidate = course.clone();
        candidate.assign_non_lecture(tutorials, labs);

        let overlaps = count_element_overlaps(&candidate, &siblings);

        if overlaps == 0 {
            return candidate;
        }
        if overlaps < best_overlaps {
            best_overlaps = overlaps;
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseElement;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn course(subject: &str, catalog: &str) -> Course {
        Course::new(subject, catalog, "1", CourseElement::new(vec![1, 8], 705, 780), 1, 1, 50, 0, 0, 0)
    }

    #[test]
    fn crossover_preserves_length_and_identity_order() {
        let a = vec![course("COEN", "212"), course("COEN", "231")];
        let b = a.clone();
        let mut rng = StdRng::seed_from_u64(3);
        let offspring = uniform_crossover(&a, &b, &[], &[], &mut rng).unwrap();
        assert_eq!(offspring.len(), 2);
        assert_eq!(offspring[0].code(), "COEN212");
        assert_eq!(offspring[1].code(), "COEN231");
    }

    #[test]
    fn crossover_rejects_mismatched_identity() {
        let a = vec![course("COEN", "212")];
        let b = vec![course("COEN", "231")];
        let mut rng = StdRng::seed_from_u64(4);
        assert!(uniform_crossover(&a, &b, &[], &[], &mut rng).is_err());
    }

    #[test]
    fn element_overlap_count_scales_with_number_of_clashing_pairs() {
        let mut candidate = Course::new("COEN", "212", "1", CourseElement::new(vec![1, 8], 705, 780), 2, 1, 50, 0, 0, 0);
        candidate.assign_non_lecture(
            vec![CourseElement::new(vec![1], 525, 575), CourseElement::new(vec![2], 525, 575)],
            vec![],
        );

        let mut sibling = Course::new("COEN", "231", "1", CourseElement::new(vec![3, 10], 705, 780), 1, 1, 50, 0, 0, 0);
        sibling.assign_non_lecture(vec![CourseElement::new(vec![1], 550, 600)], vec![]);
        let none_overlap = count_element_overlaps(&candidate, &[&sibling]);
        assert_eq!(none_overlap, 1, "only the first tutorial overlaps the sibling's single tutorial");

        let mut sibling2 = Course::new("COEN", "243", "1", CourseElement::new(vec![4, 11], 705, 780), 1, 1, 50, 0, 0, 0);
        sibling2.assign_non_lecture(vec![CourseElement::new(vec![2], 550, 600)], vec![]);
        let two_overlaps = count_element_overlaps(&candidate, &[&sibling, &sibling2]);
        assert_eq!(two_overlaps, 2, "adding a second clashing sibling increases the count, unlike a 0/1 proxy");
    }
}
