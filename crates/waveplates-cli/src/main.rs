use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use waveplates_core::{ConfigError, CoreError};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "waveplates", version, about = "Track regenerating stamina across gacha accounts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a tracker from the stamina shown in game
    Add(commands::tracker::AddArgs),
    /// Show all trackers
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show one tracker
    Show {
        /// Tracker id or unique id prefix
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Spend stamina
    Spend {
        id: String,
        amount: u32,
        #[arg(long)]
        json: bool,
    },
    /// Record regenerated or refilled stamina
    Gain {
        id: String,
        amount: u32,
        #[arg(long)]
        json: bool,
    },
    /// Delete a tracker
    Delete { id: String },
    /// Redraw all trackers every tick until Ctrl-C
    Watch(commands::watch::WatchArgs),
    /// List built-in game presets
    Presets {
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WAVEPLATES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Add(args) => commands::tracker::add(args),
        Commands::List { json } => commands::tracker::list(json),
        Commands::Show { id, json } => commands::tracker::show(&id, json),
        Commands::Spend { id, amount, json } => commands::tracker::spend(&id, amount, json),
        Commands::Gain { id, amount, json } => commands::tracker::gain(&id, amount, json),
        Commands::Delete { id } => commands::tracker::delete(&id),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "waveplates", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        match e.downcast_ref::<CoreError>() {
            Some(
                CoreError::Database(_)
                | CoreError::Io(_)
                | CoreError::Config(ConfigError::LoadFailed { .. } | ConfigError::SaveFailed { .. }),
            ) => {
                eprintln!("error: loading/saving failed: {e}");
                eprintln!("Nothing was retried; run the command again.");
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
