use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusjuju", version, about = "FocusJuju body-doubling focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Progress statistics
    Stats,
    /// Mood check-ins
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Micro-goal breakdowns
    Goals {
        #[command(subcommand)]
        action: commands::goals::GoalsAction,
    },
    /// Standalone task list
    Tasks {
        #[command(subcommand)]
        action: commands::tasks::TasksAction,
    },
    /// Personal advice from your mood and recent sessions
    Advice,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr, filtered by FOCUSJUJU_LOG (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSJUJU_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Goals { action } => commands::goals::run(action),
        Commands::Tasks { action } => commands::tasks::run(action),
        Commands::Advice => commands::advice::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
