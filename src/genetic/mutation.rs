//! Mutation: re-placement of a few non-core courses.

use hashbrown::HashSet;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::room::RoomTimetable;
use crate::domain::{Course, RoomAssignment};
use crate::placement::{initialize_course, PlacementStats};

/// Re-proposes the tutorials and labs of `mutation_count` non-core courses
/// chosen uniformly at random. Core courses (those listed in some
/// academic-plan term) are never mutated. A no-op (and a debug log line)
/// when there are no eligible non-core courses.
pub fn mutate(
    individual: &mut [Course],
    core: &HashSet<String>,
    rooms: &[RoomAssignment],
    mutation_count: usize,
    rng: &mut impl Rng,
    stats: &mut PlacementStats,
) {
    let eligible: Vec<usize> = (0..individual.len())
        .filter(|&i| !core.contains(&individual[i].code()))
        .collect();

    if eligible.is_empty() {
        debug!("mutation skipped: no non-core courses available");
        return;
    }

    let chosen: Vec<usize> = eligible
        .choose_multiple(rng, mutation_count.min(eligible.len()))
        .copied()
        .collect();

    for idx in chosen {
        let room_timetable = RoomTimetable::from_courses(individual, Some(idx));
        let room = rooms
            .iter()
            .find(|r| r.allows(&individual[idx].subject, &individual[idx].catalog_nbr))
            .map(|r| (r.building.clone(), r.room.clone()));

        let (tutorials, labs) = initialize_course(
            &individual[idx],
            room.as_ref().map(|(b, _)| b.as_str()),
            room.as_ref().map(|(_, r)| r.as_str()),
            &room_timetable,
            rng,
            stats,
        );
        individual[idx].assign_non_lecture(tutorials, labs);
    }
}
