use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use backoffice::cli::{
    handle_audit_command, handle_backup_command, handle_client_command,
    handle_dashboard_command, handle_export_command, handle_import_command,
    handle_order_command, handle_purchase_command, handle_report_command,
};
use backoffice::config::{paths::BackofficePaths, settings::Settings};
use backoffice::storage::Storage;

#[derive(Parser)]
#[command(
    name = "backoffice",
    version,
    about = "Back office for small service businesses",
    long_about = "Keeps clients, service orders and supplier purchases in local \
                  JSON files, and reports revenue, expenses and balance per month, \
                  year or custom range. Data can be exported to Excel or JSON and \
                  restored from JSON backups."
)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, settings and empty collections
    Init,

    /// Show current configuration and paths
    Config,

    /// Client management commands
    #[command(subcommand)]
    Client(backoffice::cli::ClientCommands),

    /// Service order management commands
    #[command(subcommand, alias = "os")]
    Order(backoffice::cli::OrderCommands),

    /// Purchase management commands
    #[command(subcommand)]
    Purchase(backoffice::cli::PurchaseCommands),

    /// Revenue, expenses and balance (monthly, annual, custom range)
    Report(backoffice::cli::ReportArgs),

    /// Order counts by status and the latest orders
    Dashboard {
        /// Number of recent orders to show (default from settings)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export data to JSON or Excel
    #[command(subcommand)]
    Export(backoffice::cli::ExportCommands),

    /// Replace all data with the contents of a JSON backup file
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(backoffice::cli::BackupCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Print raw JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("backoffice={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = BackofficePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing backoffice at: {}", paths.base_dir().display());
            let created = backoffice::storage::init::initialize_storage(&paths)?;
            if created {
                println!("Initialization complete!");
            } else {
                println!("Already initialized; nothing to do.");
            }
            println!();
            println!("Run 'backoffice client add NAME DOCUMENT' to register your first client.");
        }
        Some(Commands::Config) => {
            println!("Backoffice Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Backup before import: {}", settings.backup_before_import);
            println!("  Backups kept:         {}", settings.backup_retention.keep);
            println!("  Recent orders shown:  {}", settings.recent_orders_limit);
            println!();
            println!("Data: {}", storage.counts()?);
        }
        Some(Commands::Client(cmd)) => {
            handle_client_command(&storage, cmd)?;
        }
        Some(Commands::Order(cmd)) => {
            handle_order_command(&storage, cmd)?;
        }
        Some(Commands::Purchase(cmd)) => {
            handle_purchase_command(&storage, cmd)?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&storage, args)?;
        }
        Some(Commands::Dashboard { limit }) => {
            handle_dashboard_command(&storage, &settings, limit)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Import { file, force }) => {
            handle_import_command(&storage, &settings, &file, force)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Audit { limit, json }) => {
            handle_audit_command(&storage, limit, json)?;
        }
        None => {
            println!("backoffice - clients, service orders and purchases");
            println!();
            println!("Run 'backoffice --help' for usage information.");
            println!("Run 'backoffice dashboard' for an overview of open orders.");
        }
    }

    Ok(())
}
