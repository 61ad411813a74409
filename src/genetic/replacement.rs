//! Replace-worst generational replacement.

use crate::domain::Course;

/// Overwrites the `offspring.len()` worst-fitness individuals in
/// `population` with `offspring`, regardless of the offspring's own
/// fitness — this is not elitist. Population size is invariant.
pub fn replace_worst(
    population: &mut Vec<Vec<Course>>,
    fitness: &mut Vec<f64>,
    offspring: Vec<Vec<Course>>,
    offspring_fitness: Vec<f64>,
) {
    assert_eq!(offspring.len(), offspring_fitness.len());
    let before_len = population.len();

    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].partial_cmp(&fitness[b]).unwrap());

    for (slot, (child, child_fitness)) in order.into_iter().zip(offspring.into_iter().zip(offspring_fitness)) {
        population[slot] = child;
        fitness[slot] = child_fitness;
    }

    assert_eq!(population.len(), before_len, "replace-worst must preserve population size");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseElement;

    fn course(catalog: &str) -> Course {
        Course::new("COEN", catalog, "1", CourseElement::new(vec![1, 8], 705, 780), 0, 0, 0, 0, 0, 0)
    }

    #[test]
    fn replaces_worst_and_keeps_population_size() {
        let mut population = vec![vec![course("1")], vec![course("2")], vec![course("3")]];
        let mut fitness = vec![0.5, -1.0, 0.9];
        let offspring = vec![vec![course("9")]];
        let offspring_fitness = vec![10.0];

        replace_worst(&mut population, &mut fitness, offspring, offspring_fitness);

        assert_eq!(population.len(), 3);
        // index 1 had the lowest fitness (-1.0) and should have been replaced
        assert_eq!(population[1][0].catalog_nbr, "9");
        assert_eq!(fitness[1], 10.0);
    }
}
