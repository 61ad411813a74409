//! GA loop driver: tying placement, fitness, and the genetic operators
//! together into one deterministic run.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::Config;
use crate::domain::room::{RoomSlot, RoomTimetable};
use crate::domain::{AcademicPlanTerm, Course, RoomAssignment};
use crate::fitness::evaluate_population;
use crate::genetic::{core_course_codes, mutate, replace_worst, select_parents, should_terminate, uniform_crossover, TerminationReason};
use crate::placement::{initialize_course, PlacementStats};

pub struct RunReport {
    pub best_schedule: Vec<Course>,
    pub best_fitness: f64,
    pub generations_run: usize,
    pub termination: TerminationReason,
    pub fallback_count: u64,
}

fn room_for<'a>(course: &Course, rooms: &'a [RoomAssignment]) -> Option<&'a RoomAssignment> {
    rooms.iter().find(|r| r.allows(&course.subject, &course.catalog_nbr))
}

/// Builds one fresh, internally clash-free-as-possible schedule from the
/// template courses, placing each course's tutorials and labs in
/// canonical order so later courses see earlier ones' room bookings.
fn initialize_individual(template: &[Course], rooms: &[RoomAssignment], rng: &mut StdRng, stats: &mut PlacementStats) -> Vec<Course> {
    let mut schedule = Vec::with_capacity(template.len());
    let mut room_timetable = RoomTimetable::new();

    for course in template {
        let room = room_for(course, rooms);
        let (tutorials, labs) = initialize_course(
            course,
            room.map(|r| r.building.as_str()),
            room.map(|r| r.room.as_str()),
            &room_timetable,
            rng,
            stats,
        );
        let mut placed = course.clone();
        placed.assign_non_lecture(tutorials, labs);

        if let Some(r) = room {
            for lab in placed.labs() {
                for &d in &lab.day {
                    room_timetable.book(
                        &r.building,
                        &r.room,
                        RoomSlot {
                            day: d,
                            start: lab.start,
                            end: lab.end,
                            subject: placed.subject.clone(),
                            catalog_nbr: placed.catalog_nbr.clone(),
                            class_nbr: placed.class_nbr.clone(),
                            lab_index: 0,
                        },
                    );
                }
            }
        }
        schedule.push(placed);
    }
    schedule
}

/// Runs the full genetic loop to termination and returns the fittest
/// schedule found along with the reason the run stopped.
pub fn run(template: &[Course], rooms: &[RoomAssignment], terms: &[AcademicPlanTerm], config: &Config) -> RunReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = PlacementStats::default();
    let core = core_course_codes(terms);

    let mut population: Vec<Vec<Course>> = (0..config.population_size)
        .map(|_| initialize_individual(template, rooms, &mut rng, &mut stats))
        .collect();
    let mut fitness = evaluate_population(&population, terms);

    let best_so_far = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut history = vec![best_so_far];
    let mut generation = 0usize;

    let termination = loop {
        generation += 1;

        let mut offspring = Vec::with_capacity(config.offspring_per_gen);
        for _ in 0..config.offspring_per_gen {
            let (p1, p2) = select_parents(&fitness, config.alpha, &mut rng);
            let mut child = match uniform_crossover(&population[p1], &population[p2], terms, rooms, &mut rng) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("crossover failed: {e}");
                    population[p1].clone()
                }
            };
            mutate(&mut child, &core, rooms, config.mutation_count, &mut rng, &mut stats);
            offspring.push(child);
        }

        let offspring_fitness = evaluate_population(&offspring, terms);
        replace_worst(&mut population, &mut fitness, offspring, offspring_fitness);

        let max_fitness = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean_fitness = fitness.iter().sum::<f64>() / fitness.len() as f64;
        history.push(max_fitness);

        info!(generation, max_fitness, mean_fitness, "generation complete");

        if let Some(reason) = should_terminate(generation, &fitness, &history, config.generation_cap, config.stagnation_limit, config.ratio_threshold) {
            break reason;
        }
    };

    let best_idx = fitness
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);

    RunReport {
        best_schedule: population[best_idx].clone(),
        best_fitness: fitness[best_idx],
        generations_run: generation,
        termination,
        fallback_count: stats.fallback_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseElement;

    fn course(subject: &str, catalog: &str) -> Course {
        Course::new(
            subject, catalog, "1",
            CourseElement::new(vec![2, 9], 705, 780),
            1, 1, 50,
            0, 0, 0,
        )
    }

    #[test]
    fn run_terminates_and_returns_a_schedule() {
        let template = vec![course("COEN", "212"), course("COEN", "231")];
        let config = Config {
            population_size: 4,
            generation_cap: 10,
            seed: 99,
            ..Config::default()
        };
        let report = run(&template, &[], &[], &config);
        assert_eq!(report.best_schedule.len(), 2);
        assert!(report.generations_run <= 10);
    }

    #[test]
    fn deterministic_under_fixed_seed() {
        let template = vec![course("COEN", "212"), course("COEN", "231")];
        let config = Config {
            population_size: 4,
            generation_cap: 5,
            seed: 123,
            ..Config::default()
        };
        let a = run(&template, &[], &[], &config);
        let b = run(&template, &[], &[], &config);
        assert_eq!(a.best_fitness, b.best_fitness);
        for (ca, cb) in a.best_schedule.iter().zip(b.best_schedule.iter()) {
            assert_eq!(ca.tutorials(), cb.tutorials());
        }
    }

    #[test]
    fn stagnation_terminates_quickly_with_zero_mutation() {
        let template = vec![course("COEN", "212")];
        let config = Config {
            population_size: 2,
            generation_cap: 100,
            stagnation_limit: 5,
            mutation_count: 0,
            offspring_per_gen: 1,
            seed: 1,
            ..Config::default()
        };
        let report = run(&template, &[], &[], &config);
        assert_eq!(report.termination, TerminationReason::Stagnation);
        assert!(report.generations_run < 100);
    }
}
