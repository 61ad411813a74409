pub mod course;
pub mod day;
pub mod element;
pub mod plan;
pub mod room;

pub use course::Course;
pub use day::DayNumber;
pub use element::CourseElement;
pub use plan::{AcademicPlanTerm, SequencePlan, SequenceTerm};
pub use room::{RoomAssignment, RoomTimetable};
