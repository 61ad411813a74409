//! Three-rule termination: generation cap, ratio convergence, stagnation.

const STAGNATION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    GenerationCap,
    RatioConvergence,
    Stagnation,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (tag, text) = match self {
            TerminationReason::GenerationCap => ("(i)", "generation cap reached"),
            TerminationReason::RatioConvergence => ("(ii)", "mean/max fitness ratio converged"),
            TerminationReason::Stagnation => ("(iii)", "best fitness stagnated"),
        };
        write!(f, "{tag} {text}")
    }
}

/// Evaluates the three termination rules in order; the first to fire wins.
pub fn should_terminate(
    generation: usize,
    fitness: &[f64],
    history: &[f64],
    generation_cap: usize,
    stagnation_limit: usize,
    ratio_threshold: f64,
) -> Option<TerminationReason> {
    if generation >= generation_cap {
        return Some(TerminationReason::GenerationCap);
    }

    let max_fitness = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max_fitness > 0.0 {
        let mean_fitness = fitness.iter().sum::<f64>() / fitness.len() as f64;
        if mean_fitness / max_fitness >= ratio_threshold {
            return Some(TerminationReason::RatioConvergence);
        }
    }

    if history.len() >= stagnation_limit {
        let window = &history[history.len() - stagnation_limit..];
        let first = window[0];
        if window.iter().all(|v| (v - first).abs() < STAGNATION_EPSILON) {
            return Some(TerminationReason::Stagnation);
        }
    }

    None
}
