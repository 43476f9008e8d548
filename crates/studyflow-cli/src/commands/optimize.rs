use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use clap::Args;
use studyflow_core::{
    fixed_slots_for_window, OptimizerBridge, TaskInput, TimeBlock, WorkItem,
};

use super::{load_class_blocks, load_routine_config};

#[derive(Args)]
pub struct OptimizeArgs {
    /// Path to the optimizer engine executable
    #[arg(long)]
    pub engine: PathBuf,
    /// Pending work items JSON file
    pub tasks: PathBuf,
    /// First day of the optimization window (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,
    /// Number of days to optimize
    #[arg(long, default_value_t = 7)]
    pub num_days: i64,
    /// Engine time limit in seconds
    #[arg(long, default_value_t = 5.0)]
    pub timeout_secs: f64,
    /// Routine config TOML file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Class blocks JSON file
    #[arg(long)]
    pub classes: Option<PathBuf>,
}

pub fn run(args: OptimizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let routine = load_routine_config(args.config.as_deref())?;
    let class_blocks = load_class_blocks(args.classes.as_deref())?;

    let items: Vec<WorkItem> = serde_json::from_str(&std::fs::read_to_string(&args.tasks)?)?;
    let now = Utc::now();
    let task_inputs: Vec<TaskInput> = items
        .iter()
        .map(|item| TaskInput::from_work_item(item, args.start, args.num_days, now))
        .collect();

    let fixed_slots = fixed_slots_for_window(args.start, args.num_days, &routine, |date| {
        class_blocks
            .iter()
            .filter(|b: &&TimeBlock| b.start.date_naive() == date)
            .copied()
            .collect()
    });

    let bridge =
        OptimizerBridge::new(&args.engine).with_timeout(Duration::from_secs_f64(args.timeout_secs));

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(bridge.optimize(task_inputs, fixed_slots, args.num_days)) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("optimization failed: {err}");
            eprintln!("suggestion: {}", err.suggestion());
            std::process::exit(1);
        }
    }
}
