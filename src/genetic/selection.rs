//! Exponential-ranking parent selection.

use rand::Rng;

/// Ranks individuals by fitness descending and draws two distinct parent
/// indices with probability proportional to `alpha^(rank-1)`, rank
/// 1-indexed from the fittest.
pub fn select_parents(fitness: &[f64], alpha: f64, rng: &mut impl Rng) -> (usize, usize) {
    let n = fitness.len();
    assert!(n >= 2, "need at least two individuals to select parents");

    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| fitness[b].partial_cmp(&fitness[a]).unwrap());

    let weights: Vec<f64> = (0..n).map(|rank| alpha.powi(rank as i32)).collect();
    let total: f64 = weights.iter().sum();

    let mut draw_one = |exclude: Option<usize>| -> usize {
        loop {
            let mut r = rng.random_range(0.0..total);
            for (rank, &w) in weights.iter().enumerate() {
                if r < w {
                    let idx = ranked[rank];
                    if Some(idx) != exclude {
                        return idx;
                    }
                    break;
                }
                r -= w;
            }
        }
    };

    let first = draw_one(None);
    let second = draw_one(Some(first));
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn selects_two_distinct_parents() {
        let fitness = vec![0.1, 0.9, 0.5, -0.3];
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let (a, b) = select_parents(&fitness, 0.75, &mut rng);
            assert_ne!(a, b);
            assert!(a < fitness.len() && b < fitness.len());
        }
    }

    #[test]
    fn fittest_individual_is_selected_more_often() {
        let fitness = vec![0.1, 10.0, 0.2, -5.0];
        let mut rng = StdRng::seed_from_u64(2);
        let mut best_count = 0;
        for _ in 0..200 {
            let (a, b) = select_parents(&fitness, 0.75, &mut rng);
            if a == 1 || b == 1 {
                best_count += 1;
            }
        }
        assert!(best_count > 100);
    }
}
