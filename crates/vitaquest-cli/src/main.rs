use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "vitaquest-cli", version, about = "VitaQuest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current level, XP, and goal overview
    Status,
    /// XP management
    Xp {
        #[command(subcommand)]
        action: commands::xp::XpAction,
    },
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Supplement plan management
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Meal logging
    Meal {
        #[command(subcommand)]
        action: commands::meal::MealAction,
    },
    /// Clear all stored data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::status::run().await,
        Commands::Xp { action } => commands::xp::run(action).await,
        Commands::Goal { action } => commands::goal::run(action).await,
        Commands::Plan { action } => commands::plan::run(action).await,
        Commands::Meal { action } => commands::meal::run(action).await,
        Commands::Reset { yes } => commands::reset::run(yes).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
