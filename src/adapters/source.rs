//! CSV source adapter for Input A (courses), Input B (room allowlist), and
//! Input C (academic-plan terms). Rows that fail to parse are skipped and
//! reported rather than aborting the whole load.

use serde::Deserialize;
use std::path::Path;

use crate::domain::day::{both_weeks, parse_day_pattern};
use crate::domain::room::EXCLUDED_ROOMS;
use crate::domain::{Course, CourseElement, RoomAssignment, SequencePlan, SequenceTerm};
use crate::error::{RejectedRow, Result};

const ALLOWED_SUBJECTS: [(&str, Option<&str>); 3] = [("COEN", None), ("ELEC", None), ("ENGR", Some("290"))];

fn subject_allowed(subject: &str, catalog: &str) -> bool {
    ALLOWED_SUBJECTS
        .iter()
        .any(|(s, c)| *s == subject && c.map_or(true, |c| c == catalog))
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    subject: String,
    catalog: String,
    class_number: String,
    day_of_week: String,
    start_time: String,
    end_time: String,
    lab_count: usize,
    biweekly_lab_freq: u8,
    lab_duration: u32,
    tut_count: usize,
    weekly_tut_freq: u8,
    tut_duration: u32,
}

/// Parses `HH:MM`, `HH:MM:SS`, or `HH.MM.SS` into minutes since midnight.
fn parse_time(raw: &str) -> std::result::Result<u32, String> {
    let normalized = raw.replace('.', ":");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() < 2 {
        return Err(format!("malformed time '{raw}'"));
    }
    let hours: u32 = parts[0].parse().map_err(|_| format!("malformed time '{raw}'"))?;
    let minutes: u32 = parts[1].parse().map_err(|_| format!("malformed time '{raw}'"))?;
    Ok(hours * 60 + minutes)
}

/// Reads Input A and returns the successfully-parsed courses plus a record
/// of every row that was rejected.
pub fn load_courses(csv_text: &str) -> Result<(Vec<Course>, Vec<RejectedRow>)> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut courses = Vec::new();
    let mut rejected = Vec::new();

    for (i, result) in reader.deserialize::<CourseRow>().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                rejected.push(RejectedRow { row: i, reason: e.to_string() });
                continue;
            }
        };

        if !subject_allowed(&row.subject, &row.catalog) {
            continue;
        }

        let week1_days = match parse_day_pattern(&row.day_of_week) {
            Ok(d) => d,
            Err(e) => {
                rejected.push(RejectedRow { row: i, reason: e });
                continue;
            }
        };
        let start = match parse_time(&row.start_time) {
            Ok(t) => t,
            Err(e) => {
                rejected.push(RejectedRow { row: i, reason: e });
                continue;
            }
        };
        let end = match parse_time(&row.end_time) {
            Ok(t) => t,
            Err(e) => {
                rejected.push(RejectedRow { row: i, reason: e });
                continue;
            }
        };
        if start >= end {
            rejected.push(RejectedRow { row: i, reason: format!("start {start} >= end {end}") });
            continue;
        }

        let lecture = CourseElement::new(both_weeks(&week1_days), start, end);
        courses.push(Course::new(
            row.subject,
            row.catalog,
            row.class_number,
            lecture,
            row.tut_count,
            row.weekly_tut_freq,
            row.tut_duration,
            row.lab_count,
            row.biweekly_lab_freq,
            row.lab_duration,
        ));
    }

    Ok((courses, rejected))
}

/// Reads Input B. Variable trailing `course1, course2, ...` columns are
/// read positionally via `StringRecord` rather than a fixed struct.
/// Rooms named `007` or `AITS` are dropped.
pub fn load_rooms(csv_text: &str) -> Result<Vec<RoomAssignment>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader.headers()?.clone();
    let course_col_start = headers.iter().position(|h| h == "subject").map(|i| i + 1).unwrap_or(3);

    let mut rooms = Vec::new();
    for result in reader.records() {
        let record = result?;
        let building = record.get(0).unwrap_or_default().to_string();
        let room = record.get(1).unwrap_or_default().to_string();
        let subject = record.get(2).unwrap_or_default().to_string();
        if EXCLUDED_ROOMS.contains(&room.as_str()) {
            continue;
        }
        let allowed_catalogs: Vec<String> = record
            .iter()
            .skip(course_col_start)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();
        rooms.push(RoomAssignment { building, room, subject, allowed_catalogs });
    }
    Ok(rooms)
}

#[derive(Debug, Deserialize)]
struct SequenceRow {
    plan_id: u32,
    plan_name: String,
    program: String,
    term_id: u32,
    year_number: u32,
    season: String,
    season_code: u8,
    courses: String,
}

/// Reads Input C, grouping rows by `plan_id` into [`SequencePlan`]s.
pub fn load_sequence_plans(csv_text: &str) -> Result<Vec<SequencePlan>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut by_plan: hashbrown::HashMap<u32, SequencePlan> = hashbrown::HashMap::new();

    for result in reader.deserialize::<SequenceRow>() {
        let row = result?;
        let courses: Vec<String> = row.courses.split(',').map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect();
        let term = SequenceTerm {
            sequence_term_id: row.term_id,
            plan_id: row.plan_id,
            plan_name: row.plan_name.clone(),
            program: row.program.clone(),
            year_number: row.year_number,
            season: row.season,
            season_code: row.season_code,
            courses,
        };
        by_plan
            .entry(row.plan_id)
            .or_insert_with(|| SequencePlan {
                plan_id: row.plan_id,
                plan_name: row.plan_name,
                program: row.program,
                terms: Vec::new(),
            })
            .terms
            .push(term);
    }

    Ok(by_plan.into_values().collect())
}

pub fn load_courses_from_path(path: &Path) -> Result<(Vec<Course>, Vec<RejectedRow>)> {
    load_courses(&std::fs::read_to_string(path)?)
}

pub fn load_rooms_from_path(path: &Path) -> Result<Vec<RoomAssignment>> {
    load_rooms(&std::fs::read_to_string(path)?)
}

pub fn load_sequence_plans_from_path(path: &Path) -> Result<Vec<SequencePlan>> {
    load_sequence_plans(&std::fs::read_to_string(path)?)
}
