use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "studyflow", version, about = "Studyflow schedule composer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose day and week schedules
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Run the external optimizer over pending tasks
    Optimize(commands::optimize::OptimizeArgs),
    /// Routine configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Optimize(args) => commands::optimize::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
