use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use timetable_ga::adapters::{presentation, source};
use timetable_ga::conflicts::enumerate_conflicts;
use timetable_ga::domain::plan::terms_for_season;
use timetable_ga::Config;

#[derive(Parser, Debug)]
#[command(name = "timetable", about = "Genetic-algorithm timetable optimizer")]
struct Cli {
    /// Input A: course list CSV
    #[arg(long)]
    courses: PathBuf,

    /// Input B: room allowlist CSV
    #[arg(long)]
    rooms: PathBuf,

    /// Input C: academic-plan terms CSV
    #[arg(long)]
    sequences: PathBuf,

    /// Output D: final schedule CSV
    #[arg(long, default_value = "schedule.csv")]
    schedule_out: PathBuf,

    /// Output E: conflict report CSV
    #[arg(long, default_value = "conflicts.csv")]
    conflicts_out: PathBuf,

    /// Optional TOML config file layered under env vars and flags
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    population_size: Option<usize>,

    #[arg(long)]
    generation_cap: Option<usize>,

    #[arg(long)]
    target_season: Option<u8>,
}

/// Summary of one CLI run, used by `main` to print a one-line report and by
/// tests to assert on outcome shape without parsing stdout.
#[derive(Debug)]
struct RunSummary {
    generations_run: usize,
    termination: timetable_ga::genetic::TerminationReason,
    best_fitness: f64,
    conflicts: usize,
    fallback_count: u64,
    rejected_rows: usize,
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(v) = cli.seed {
        config.seed = v;
    }
    if let Some(v) = cli.population_size {
        config.population_size = v;
    }
    if let Some(v) = cli.generation_cap {
        config.generation_cap = v;
    }
    if let Some(v) = cli.target_season {
        config.target_season = v;
    }
}

/// Loads Inputs A/B/C, runs the genetic loop, and writes Outputs D/E to the
/// paths named in `cli`. Split out of `main` so it can be driven directly in
/// tests without going through `Cli::parse`'s process-argv plumbing.
fn execute(cli: &Cli) -> anyhow::Result<RunSummary> {
    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(cli, &mut config);

    let (courses, rejected) = source::load_courses_from_path(&cli.courses)?;
    for row in &rejected {
        tracing::warn!(row = row.row, reason = %row.reason, "input row rejected");
    }
    let rooms = source::load_rooms_from_path(&cli.rooms)?;
    let plans = source::load_sequence_plans_from_path(&cli.sequences)?;
    let terms = terms_for_season(&plans, config.target_season);

    let progress = ProgressBar::new(config.generation_cap as u64);
    progress.set_style(ProgressStyle::with_template("{bar:40} gen {pos}/{len} best={msg}").unwrap());

    let report = timetable_ga::run(&courses, &rooms, &terms, &config);
    progress.finish_with_message(format!("{:.3}", report.best_fitness));

    presentation::write_schedule_to_path(&report.best_schedule, &config.term_code(), &cli.schedule_out)?;
    let conflicts = enumerate_conflicts(&report.best_schedule, &terms);
    presentation::write_conflicts_to_path(&conflicts, &cli.conflicts_out)?;

    Ok(RunSummary {
        generations_run: report.generations_run,
        termination: report.termination,
        best_fitness: report.best_fitness,
        conflicts: conflicts.len(),
        fallback_count: report.fallback_count,
        rejected_rows: rejected.len(),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let summary = execute(&cli)?;

    println!(
        "generations={} termination={} best_fitness={:.3} conflicts={} fallback_count={} rejected_rows={}",
        summary.generations_run,
        summary.termination,
        summary.best_fitness,
        summary.conflicts,
        summary.fallback_count,
        summary.rejected_rows,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    /// End-to-end: fixture Input A/B/C CSVs in, Output D/E CSVs out with the
    /// expected row counts, run via the same `execute` path `main` uses.
    #[test]
    fn cli_end_to_end_produces_schedule_and_conflicts_csvs() {
        let dir = tempfile::tempdir().unwrap();

        let courses_csv = "subject,catalog,class_number,day_of_week,start_time,end_time,lab_count,biweekly_lab_freq,lab_duration,tut_count,weekly_tut_freq,tut_duration\n\
                            COEN,212,1,TuTh,11:45,13:00,1,1,165,1,1,50\n\
                            COEN,231,2,MoWe,09:00,10:15,0,0,0,0,0,0\n";
        let rooms_csv = "building,room,subject,course1,course2\nH,929,COEN,212,231\n";
        let sequences_csv = "plan_id,plan_name,program,term_id,year_number,season,season_code,courses\n\
                              1,COEN Plan,COEN,10,2,fall,2,\"COEN212, COEN231\"\n";

        let courses = write_fixture(dir.path(), "courses.csv", courses_csv);
        let rooms = write_fixture(dir.path(), "rooms.csv", rooms_csv);
        let sequences = write_fixture(dir.path(), "sequences.csv", sequences_csv);
        let schedule_out = dir.path().join("schedule.csv");
        let conflicts_out = dir.path().join("conflicts.csv");

        let cli = Cli {
            courses,
            rooms,
            sequences,
            schedule_out: schedule_out.clone(),
            conflicts_out: conflicts_out.clone(),
            config: None,
            seed: Some(1),
            population_size: Some(2),
            generation_cap: Some(3),
            target_season: Some(2),
        };

        let summary = execute(&cli).unwrap();
        assert_eq!(summary.rejected_rows, 0);

        let schedule_text = std::fs::read_to_string(&schedule_out).unwrap();
        // header + LEC/TUT/LAB rows for 2 courses (COEN212: LEC+TUT+LAB, COEN231: LEC only)
        assert_eq!(schedule_text.lines().count(), 1 + 3 + 1);
        assert!(schedule_text.lines().next().unwrap().contains("term_code"));

        assert!(conflicts_out.exists());
    }

    #[test]
    fn cli_flag_beats_env_var() {
        std::env::set_var("TIMETABLE_SEED", "42");
        let cli = Cli {
            courses: PathBuf::new(),
            rooms: PathBuf::new(),
            sequences: PathBuf::new(),
            schedule_out: PathBuf::new(),
            conflicts_out: PathBuf::new(),
            config: None,
            seed: Some(7),
            population_size: None,
            generation_cap: None,
            target_season: None,
        };
        let mut config = Config::load(cli.config.as_deref()).unwrap();
        apply_overrides(&cli, &mut config);
        std::env::remove_var("TIMETABLE_SEED");
        assert_eq!(config.seed, 7);
    }
}
