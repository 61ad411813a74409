use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TimetableError};

/// Tunable knobs for the genetic loop and the season this run targets.
///
/// Layering, low to high precedence: compiled defaults, an optional TOML
/// file, environment variables prefixed `TIMETABLE_`, then CLI flags. The
/// CLI binary is responsible for applying the last layer; [`Config::load`]
/// applies the first three.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub population_size: usize,
    pub alpha: f64,
    pub mutation_count: usize,
    pub generation_cap: usize,
    pub stagnation_limit: usize,
    pub ratio_threshold: f64,
    pub target_season: u8,
    pub academic_year: u32,
    pub seed: u64,
    pub offspring_per_gen: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 4,
            alpha: 0.75,
            mutation_count: 1,
            generation_cap: 100,
            stagnation_limit: 15,
            ratio_threshold: 0.9,
            target_season: 2,
            academic_year: 2026,
            seed: 0,
            offspring_per_gen: 2,
        }
    }
}

impl Config {
    /// Builds a config from compiled defaults overlaid with an optional TOML
    /// file and then with `TIMETABLE_*` environment variables.
    pub fn load(toml_path: Option<&Path>) -> Result<Self> {
        let mut cfg = match toml_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text)
                    .map_err(|e| TimetableError::Config(format!("{path:?}: {e}")))?
            }
            None => Config::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        macro_rules! env_override {
            ($field:ident, $name:literal, $parse:ty) => {
                if let Ok(raw) = std::env::var(concat!("TIMETABLE_", $name)) {
                    if let Ok(v) = raw.parse::<$parse>() {
                        self.$field = v;
                    }
                }
            };
        }
        env_override!(population_size, "POPULATION_SIZE", usize);
        env_override!(alpha, "ALPHA", f64);
        env_override!(mutation_count, "MUTATION_COUNT", usize);
        env_override!(generation_cap, "GENERATION_CAP", usize);
        env_override!(stagnation_limit, "STAGNATION_LIMIT", usize);
        env_override!(ratio_threshold, "RATIO_THRESHOLD", f64);
        env_override!(target_season, "TARGET_SEASON", u8);
        env_override!(academic_year, "ACADEMIC_YEAR", u32);
        env_override!(seed, "SEED", u64);
        env_override!(offspring_per_gen, "OFFSPRING_PER_GEN", usize);
    }

    /// Term-code arithmetic: `"2" + yy + season_code`, e.g. 2026 fall -> "2262".
    pub fn term_code(&self) -> String {
        format!("2{:02}{}", self.academic_year % 100, self.target_season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.population_size, 4);
        assert!((cfg.alpha - 0.75).abs() < 1e-9);
        assert_eq!(cfg.generation_cap, 100);
        assert_eq!(cfg.stagnation_limit, 15);
    }

    #[test]
    fn term_code_arithmetic() {
        let cfg = Config {
            academic_year: 2026,
            target_season: 2,
            ..Config::default()
        };
        assert_eq!(cfg.term_code(), "2262");
    }

    #[test]
    fn env_override_beats_default() {
        std::env::set_var("TIMETABLE_POPULATION_SIZE", "9");
        let cfg = Config::load(None).unwrap();
        std::env::remove_var("TIMETABLE_POPULATION_SIZE");
        assert_eq!(cfg.population_size, 9);
    }
}
