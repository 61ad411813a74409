//! Genetic-algorithm optimizer for fortnightly course timetables.
//!
//! The entry point most callers want is [`engine::run`]: given a template
//! of courses (lectures fixed, tutorials/labs empty), a room allowlist,
//! and the academic-plan terms that must stay feasible, it runs the GA
//! loop to one of the three termination rules and returns the fittest
//! schedule found.

pub mod adapters;
pub mod config;
pub mod conflicts;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod genetic;
pub mod placement;

pub use config::Config;
pub use domain::Course;
pub use engine::{run, RunReport};
pub use error::{Result, TimetableError};
