use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spend_goals::cli::{
    handle_audit_command, handle_category_command, handle_goal_command,
    handle_transaction_command, CategoryCommands, GoalCommands, TransactionCommands,
};
use spend_goals::config::{paths::GoalPaths, settings::Settings};
use spend_goals::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "goals",
    version,
    about = "Track monthly spending goals per category",
    long_about = "Set a spending limit for a category and see how much of it this \
                  month's expenses have used. Progress is recomputed from the local \
                  transaction ledger every time goals are read."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Spending goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Transaction ledger commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directory and starter categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    // RUST_LOG overrides; stdout stays clean for command output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = GoalPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Init) => {
            println!("Initializing spend-goals at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if created > 0 {
                println!("Created {} starter categories.", created);
            }
            println!();
            println!("Run 'goals category list' to see all categories.");
            println!("Run 'goals goal add <category> <limit>' to set your first goal.");
        }
        Some(Commands::Config) => {
            println!("spend-goals Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Warning threshold: {}%", settings.warning_threshold_percent);
            println!("  Query limit:       {}", settings.transaction_query_limit);
            println!("  Default period:    {}", settings.default_period);
        }
        None => {
            println!("spend-goals - monthly spending goals per category");
            println!();
            println!("Run 'goals --help' for usage information.");
            if !storage.is_initialized() {
                println!("Run 'goals init' to get started.");
            }
        }
    }

    Ok(())
}
