//! CSV presentation adapter: writes Output D (final schedule) and
//! Output E (conflict report).

use serde::Serialize;
use std::path::Path;

use crate::conflicts::ConflictRecord;
use crate::domain::day::week1_weekday;
use crate::domain::Course;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ScheduleRow {
    subject: String,
    catalog_nbr: String,
    class_nbr: String,
    term_code: String,
    component: String,
    component_index: usize,
    building: String,
    room: String,
    start_time: String,
    end_time: String,
    week_pattern: String,
    monday: bool,
    tuesday: bool,
    wednesday: bool,
    thursday: bool,
    friday: bool,
    saturday: bool,
    sunday: bool,
}

fn minutes_to_hhmm(m: u32) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}

fn day_flags(days: &[u8]) -> [bool; 7] {
    let mut flags = [false; 7];
    for &d in days {
        let weekday = week1_weekday(d);
        if (1..=7).contains(&weekday) {
            flags[(weekday - 1) as usize] = true;
        }
    }
    flags
}

/// Distinguishes a meeting that only falls in the fortnight's first week
/// (days 1..=7), only its second week (days 8..=14), or both, since
/// `day_flags` folds the two weeks onto one weekly pattern and would
/// otherwise make a biweekly-frequency-1 lab indistinguishable from a
/// frequency-2 one.
fn week_pattern(days: &[u8]) -> &'static str {
    let week1 = days.iter().any(|&d| (1..=7).contains(&d));
    let week2 = days.iter().any(|&d| (8..=14).contains(&d));
    match (week1, week2) {
        (true, true) => "Both",
        (true, false) => "Week1",
        (false, true) => "Week2",
        (false, false) => "None",
    }
}

#[allow(clippy::too_many_arguments)]
fn schedule_row(
    course: &Course,
    term_code: &str,
    component: &str,
    component_index: usize,
    building: String,
    room: String,
    start: u32,
    end: u32,
    days: &[u8],
) -> ScheduleRow {
    let flags = day_flags(days);
    ScheduleRow {
        subject: course.subject.clone(),
        catalog_nbr: course.catalog_nbr.clone(),
        class_nbr: course.class_nbr.clone(),
        term_code: term_code.to_string(),
        component: component.to_string(),
        component_index,
        building,
        room,
        start_time: minutes_to_hhmm(start),
        end_time: minutes_to_hhmm(end),
        week_pattern: week_pattern(days).to_string(),
        monday: flags[0], tuesday: flags[1], wednesday: flags[2], thursday: flags[3],
        friday: flags[4], saturday: flags[5], sunday: flags[6],
    }
}

fn rows_for_course(course: &Course, term_code: &str) -> Vec<ScheduleRow> {
    let mut rows = Vec::new();

    let lecture = course.lecture();
    rows.push(schedule_row(
        course, term_code, "LEC", 0, String::new(), String::new(), lecture.start, lecture.end, &lecture.day,
    ));

    for (i, t) in course.tutorials().iter().enumerate() {
        rows.push(schedule_row(course, term_code, "TUT", i, String::new(), String::new(), t.start, t.end, &t.day));
    }

    for (i, l) in course.labs().iter().enumerate() {
        rows.push(schedule_row(
            course,
            term_code,
            "LAB",
            i,
            l.building.clone().unwrap_or_default(),
            l.room.clone().unwrap_or_default(),
            l.start,
            l.end,
            &l.day,
        ));
    }

    rows
}

pub fn write_schedule(schedule: &[Course], term_code: &str) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for course in schedule {
        for row in rows_for_course(course, term_code) {
            writer.serialize(row)?;
        }
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_schedule_to_path(schedule: &[Course], term_code: &str, path: &Path) -> Result<()> {
    std::fs::write(path, write_schedule(schedule, term_code)?)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ConflictRow {
    conflict_type: String,
    course1: String,
    course2: String,
    class_nbr1: String,
    class_nbr2: String,
    component1: String,
    component1_index: String,
    component2: String,
    component2_index: String,
    day: String,
    time1: String,
    time2: String,
    building: String,
    room: String,
}

fn opt_to_string<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(|x| x.to_string()).unwrap_or_default()
}

fn time_to_string(v: &Option<(u32, u32)>) -> String {
    match v {
        Some((s, e)) => format!("{}-{}", minutes_to_hhmm(*s), minutes_to_hhmm(*e)),
        None => String::new(),
    }
}

pub fn write_conflicts(records: &[ConflictRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for r in records {
        writer.serialize(ConflictRow {
            conflict_type: r.kind.to_string(),
            course1: r.course1.clone(),
            course2: r.course2.clone().unwrap_or_default(),
            class_nbr1: r.class_nbr1.clone(),
            class_nbr2: r.class_nbr2.clone().unwrap_or_default(),
            component1: r.component1.clone().unwrap_or_default(),
            component1_index: opt_to_string(&r.component1_index),
            component2: r.component2.clone().unwrap_or_default(),
            component2_index: opt_to_string(&r.component2_index),
            day: opt_to_string(&r.day),
            time1: time_to_string(&r.time1),
            time2: time_to_string(&r.time2),
            building: r.building.clone().unwrap_or_default(),
            room: r.room.clone().unwrap_or_default(),
        })?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_conflicts_to_path(records: &[ConflictRecord], path: &Path) -> Result<()> {
    std::fs::write(path, write_conflicts(records)?)?;
    Ok(())
}
