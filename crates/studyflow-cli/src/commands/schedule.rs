use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use studyflow_core::{compose_day, compose_week, TimeBlock};

use super::{load_class_blocks, load_routine_config};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Compose one day's blocks and gaps
    Day {
        /// Date to compose (YYYY-MM-DD)
        date: NaiveDate,
        /// Routine config TOML file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Class blocks JSON file
        #[arg(long)]
        classes: Option<PathBuf>,
    },
    /// Compose seven days starting at a date
    Week {
        /// First day of the week (YYYY-MM-DD)
        start: NaiveDate,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        classes: Option<PathBuf>,
    },
    /// List deep work opportunities for a day
    Deepwork {
        /// Date to inspect (YYYY-MM-DD)
        date: NaiveDate,
        /// Minimum duration in minutes
        #[arg(long, default_value_t = 90)]
        min_minutes: i64,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        classes: Option<PathBuf>,
    },
}

fn classes_on(blocks: &[TimeBlock], date: NaiveDate) -> Vec<TimeBlock> {
    blocks
        .iter()
        .filter(|b| b.start.date_naive() == date)
        .copied()
        .collect()
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Day {
            date,
            config,
            classes,
        } => {
            let routine = load_routine_config(config.as_deref())?;
            let class_blocks = load_class_blocks(classes.as_deref())?;

            let schedule = compose_day(date, &routine, &classes_on(&class_blocks, date));
            let output = json!({
                "date": schedule.date,
                "blocks": schedule.blocks,
                "gaps": schedule.gaps,
                "stats": schedule.stats(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ScheduleAction::Week {
            start,
            config,
            classes,
        } => {
            let routine = load_routine_config(config.as_deref())?;
            let class_blocks = load_class_blocks(classes.as_deref())?;

            let week = compose_week(start, &routine, |date| classes_on(&class_blocks, date));
            let days: Vec<serde_json::Value> = week
                .iter()
                .map(|day| {
                    json!({
                        "date": day.date,
                        "blocks": day.blocks,
                        "gaps": day.gaps,
                        "stats": day.stats(),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "start_date": start, "days": days }))?
            );
        }
        ScheduleAction::Deepwork {
            date,
            min_minutes,
            config,
            classes,
        } => {
            let routine = load_routine_config(config.as_deref())?;
            let class_blocks = load_class_blocks(classes.as_deref())?;

            let schedule = compose_day(date, &routine, &classes_on(&class_blocks, date));
            let slots = schedule.deep_work_opportunities(min_minutes);
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
    }
    Ok(())
}
