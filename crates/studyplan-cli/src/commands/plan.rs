//! Study plan generation command.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use clap::Args;
use serde::Deserialize;
use studyplan_core::schedule::time::parse_instant;
use studyplan_core::{
    expand_weekly_classes, RawClassOccurrence, ScheduleResult, SchedulerOptions, StudyScheduler,
    TaskDescriptor, WeeklyClass,
};
use tracing::debug;

use super::load_config;

#[derive(Args)]
pub struct PlanArgs {
    /// JSON file with `classes`, `weeklyClasses` and `tasks`
    #[arg(long, short)]
    input: PathBuf,
    /// Current time (e.g. 2026-10-19T08:00); defaults to the local clock
    #[arg(long)]
    now: Option<String>,
    /// Days to plan, starting today
    #[arg(long)]
    days: Option<u32>,
    /// Travel buffer before the first class (minutes)
    #[arg(long)]
    travel_before: Option<i64>,
    /// Travel buffer after the last class (minutes)
    #[arg(long)]
    travel_after: Option<i64>,
    /// Shortest usable free slot (minutes)
    #[arg(long)]
    min_block: Option<i64>,
    /// Daily study cap (hours)
    #[arg(long)]
    max_hours: Option<f64>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Input document of the `plan` command.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    #[serde(default)]
    pub classes: Vec<RawClassOccurrence>,
    #[serde(default)]
    pub weekly_classes: Vec<WeeklyClass>,
    #[serde(default)]
    pub tasks: Vec<TaskDescriptor>,
}

impl PlanArgs {
    fn apply_overrides(&self, options: &mut SchedulerOptions) {
        if let Some(days) = self.days {
            options.days_to_schedule = days;
        }
        if let Some(minutes) = self.travel_before {
            options.travel_time_before_minutes = minutes;
        }
        if let Some(minutes) = self.travel_after {
            options.travel_time_after_minutes = minutes;
        }
        if let Some(minutes) = self.min_block {
            options.min_free_time_block_minutes = minutes;
        }
        if let Some(hours) = self.max_hours {
            options.max_daily_study_hours = hours;
        }
    }

    fn now(&self) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
        match &self.now {
            Some(raw) => parse_instant(raw).ok_or_else(|| format!("invalid --now value: {raw}").into()),
            None => Ok(Local::now().naive_local()),
        }
    }
}

fn read_input(path: &Path) -> Result<PlanInput, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

pub fn run(args: PlanArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = load_config(config_path)?.scheduler;
    args.apply_overrides(&mut options);
    options.validate()?;

    let now = args.now()?;
    let input = read_input(&args.input)?;

    let mut classes = input.classes;
    classes.extend(expand_weekly_classes(
        &input.weekly_classes,
        now.date(),
        options.days_to_schedule,
    ));
    debug!(classes = classes.len(), tasks = input.tasks.len(), %now, "planning");

    let result = StudyScheduler::new(options).generate(&classes, &input.tasks, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_text(&result));
    }
    Ok(())
}

/// Day-grouped, human-readable listing of a result.
pub fn render_text(result: &ScheduleResult) -> String {
    let mut out = String::new();

    if let Some(message) = &result.message {
        out.push_str(message);
        out.push('\n');
    }

    for (day, suggestions) in result.by_day() {
        out.push_str(&format!("{}\n", day.format("%a %Y-%m-%d")));
        for s in suggestions {
            out.push_str(&format!(
                "  {}-{}  {} ({} min, {:?})",
                s.start_time.format("%H:%M"),
                s.end_time.format("%H:%M"),
                s.title,
                s.duration_minutes,
                s.priority,
            ));
            if let Some(subject) = &s.subject {
                out.push_str(&format!(" [{subject}]"));
            }
            out.push('\n');
        }
    }

    if !result.unscheduled_tasks.is_empty() {
        out.push_str("Unscheduled:\n");
        for task in &result.unscheduled_tasks {
            out.push_str(&format!(
                "  - {} ({} min)\n",
                task.title, task.estimated_time_minutes
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_input_fields_are_optional() {
        let input: PlanInput = serde_json::from_str("{}").unwrap();
        assert!(input.classes.is_empty());
        assert!(input.weekly_classes.is_empty());
        assert!(input.tasks.is_empty());
    }

    #[test]
    fn test_render_text_groups_by_day() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let tasks = vec![
            TaskDescriptor::new("t1", "Proofs", 60).with_subject("math"),
            TaskDescriptor::new("t2", "Marathon", 2000),
        ];

        let result = StudyScheduler::default().generate(&[], &tasks, now);
        let text = render_text(&result);

        assert!(text.contains("Mon 2026-10-19"));
        assert!(text.contains("06:00-07:00  Proofs (60 min, Medium) [math]"));
        assert!(text.contains("Unscheduled:\n  - Marathon (2000 min)"));
    }
}
