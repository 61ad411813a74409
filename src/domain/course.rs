use serde::{Deserialize, Serialize};

use super::element::CourseElement;

/// A course offering: one fixed lecture plus the tutorial and lab sections
/// the placement engine is free to place. `lecture` is never rewritten
/// after construction; only [`Course::assign_non_lecture`] may replace the
/// tutorial/lab sequences, and it does so atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub subject: String,
    pub catalog_nbr: String,
    pub class_nbr: String,

    lecture: CourseElement,
    tutorials: Vec<CourseElement>,
    labs: Vec<CourseElement>,

    pub tut_count: usize,
    pub weekly_tut_freq: u8,
    pub tut_duration: u32,

    pub lab_count: usize,
    pub biweekly_lab_freq: u8,
    pub lab_duration: u32,
}

impl Course {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject: impl Into<String>,
        catalog_nbr: impl Into<String>,
        class_nbr: impl Into<String>,
        lecture: CourseElement,
        tut_count: usize,
        weekly_tut_freq: u8,
        tut_duration: u32,
        lab_count: usize,
        biweekly_lab_freq: u8,
        lab_duration: u32,
    ) -> Self {
        Self {
            subject: subject.into(),
            catalog_nbr: catalog_nbr.into(),
            class_nbr: class_nbr.into(),
            lecture,
            tutorials: (0..tut_count).map(|_| CourseElement::unplaced()).collect(),
            labs: (0..lab_count).map(|_| CourseElement::unplaced()).collect(),
            tut_count,
            weekly_tut_freq,
            tut_duration,
            lab_count,
            biweekly_lab_freq,
            lab_duration,
        }
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.subject, self.catalog_nbr)
    }

    pub fn lecture(&self) -> &CourseElement {
        &self.lecture
    }

    pub fn tutorials(&self) -> &[CourseElement] {
        &self.tutorials
    }

    pub fn labs(&self) -> &[CourseElement] {
        &self.labs
    }

    /// Atomically replaces the tutorial and lab sequences. The lengths must
    /// match `tut_count`/`lab_count`; a mismatch is a structural bug in a
    /// caller, not a recoverable input error, so this panics rather than
    /// silently truncating.
    pub fn assign_non_lecture(&mut self, tutorials: Vec<CourseElement>, labs: Vec<CourseElement>) {
        assert_eq!(tutorials.len(), self.tut_count, "tutorial count mismatch for {}", self.code());
        assert_eq!(labs.len(), self.lab_count, "lab count mismatch for {}", self.code());
        self.tutorials = tutorials;
        self.labs = labs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Course {
        Course::new(
            "COEN", "212", "00001",
            CourseElement::new(vec![2, 9], 705, 780),
            1, 1, 50,
            1, 1, 165,
        )
    }

    #[test]
    fn lecture_is_fixed_at_construction() {
        let c = sample();
        assert_eq!(c.lecture().day, vec![2, 9]);
    }

    #[test]
    fn assign_non_lecture_replaces_atomically() {
        let mut c = sample();
        c.assign_non_lecture(
            vec![CourseElement::new(vec![1, 8], 525, 575)],
            vec![CourseElement::new(vec![3], 525, 690)],
        );
        assert_eq!(c.tutorials()[0].day, vec![1, 8]);
        assert_eq!(c.labs()[0].day, vec![3]);
        // lecture untouched
        assert_eq!(c.lecture().day, vec![2, 9]);
    }

    #[test]
    #[should_panic]
    fn assign_non_lecture_rejects_wrong_length() {
        let mut c = sample();
        c.assign_non_lecture(Vec::new(), Vec::new());
    }
}
