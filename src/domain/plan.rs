use serde::{Deserialize, Serialize};

/// One semester of one academic plan: a set of course codes that must
/// admit a clash-free pick of one tutorial and one lab per course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicPlanTerm {
    pub courses: Vec<String>,
}

impl AcademicPlanTerm {
    pub fn new(courses: Vec<String>) -> Self {
        Self { courses }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceTerm {
    pub sequence_term_id: u32,
    pub plan_id: u32,
    pub plan_name: String,
    pub program: String,
    pub year_number: u32,
    pub season: String,
    pub season_code: u8,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencePlan {
    pub plan_id: u32,
    pub plan_name: String,
    pub program: String,
    pub terms: Vec<SequenceTerm>,
}

impl SequencePlan {
    pub fn terms_for_season(&self, season_code: u8) -> Vec<AcademicPlanTerm> {
        self.terms
            .iter()
            .filter(|t| t.season_code == season_code)
            .map(|t| AcademicPlanTerm::new(t.courses.clone()))
            .collect()
    }
}

/// Flattens every loaded plan's terms for one season into the plain list
/// the engine consumes; the richer plan/program grouping stays available
/// for reporting.
pub fn terms_for_season(plans: &[SequencePlan], season_code: u8) -> Vec<AcademicPlanTerm> {
    plans
        .iter()
        .flat_map(|p| p.terms_for_season(season_code))
        .collect()
}
