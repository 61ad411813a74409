pub mod crossover;
pub mod mutation;
pub mod replacement;
pub mod selection;
pub mod termination;

pub use crossover::{core_course_codes, uniform_crossover};
pub use mutation::mutate;
pub use replacement::replace_worst;
pub use selection::select_parents;
pub use termination::{should_terminate, TerminationReason};
