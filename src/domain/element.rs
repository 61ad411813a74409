use serde::{Deserialize, Serialize};

use super::day::DayNumber;

/// One physical meeting pattern: the lecture, a tutorial section, or a lab
/// section. `day` holds every fortnight day number this element meets on
/// (both Week-1 and Week-2 copies for weekly-recurring patterns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseElement {
    pub day: Vec<DayNumber>,
    pub start: u32,
    pub end: u32,
    pub building: Option<String>,
    pub room: Option<String>,
}

impl CourseElement {
    pub fn new(day: Vec<DayNumber>, start: u32, end: u32) -> Self {
        Self {
            day,
            start,
            end,
            building: None,
            room: None,
        }
    }

    pub fn unplaced() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    pub fn with_room(mut self, building: impl Into<String>, room: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self.room = Some(room.into());
        self
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }
}

/// Two elements clash iff they share a fortnight day and their time
/// intervals overlap under half-open-interval semantics: `[10:00,11:00)`
/// does not clash with `[11:00,12:00)`.
pub fn clashes(a: &CourseElement, b: &CourseElement) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let shares_day = a.day.iter().any(|d| b.day.contains(d));
    shares_day && a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_clash_on_different_days() {
        let a = CourseElement::new(vec![1], 525, 690);
        let b = CourseElement::new(vec![2], 525, 690);
        assert!(!clashes(&a, &b));
    }

    #[test]
    fn clash_on_overlap_same_day() {
        let a = CourseElement::new(vec![1], 525, 690);
        let b = CourseElement::new(vec![1], 600, 765);
        assert!(clashes(&a, &b));
    }

    #[test]
    fn adjacent_intervals_do_not_clash() {
        let a = CourseElement::new(vec![1], 525, 690);
        let b = CourseElement::new(vec![1], 690, 855);
        assert!(!clashes(&a, &b));
    }

    #[test]
    fn empty_element_never_clashes() {
        let a = CourseElement::unplaced();
        let b = CourseElement::new(vec![1], 525, 690);
        assert!(!clashes(&a, &b));
    }
}
