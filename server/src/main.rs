use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use platform_db::{Store, StoreSettings};
use platform_obs::{ObsConfig, init_tracing};

use server::commands::{self, ImportSource};
use server::config::AppConfig;
use server::http::{self, AppState, ServeConfig};

#[derive(Parser, Debug)]
#[command(name = "staffdesk", version, about = "Staffdesk internal admin portal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP REST server.
    Serve(ServeCommand),
    /// Reconcile the roster against a CSV export.
    Import(ImportCommand),
    /// Restore the snapshot taken before the last import.
    #[command(name = "undo-import")]
    UndoImport,
    /// Report records sharing an email, last name, or full name.
    Duplicates,
    /// Merge every record sharing an email into one.
    Merge(MergeCommand),
    /// Load demo data into the local store.
    Seed,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[derive(Args, Debug)]
struct ImportCommand {
    /// CSV file exported from the roster sheet.
    file: Option<PathBuf>,
    /// Fetch the configured sheet CSV-export URL instead of a local file.
    #[arg(long)]
    from_sheet: bool,
}

#[derive(Args, Debug)]
struct MergeCommand {
    /// Email address whose records should be combined.
    #[arg(long)]
    email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load());

    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Import(cmd) => {
            let source = if cmd.from_sheet {
                ImportSource::Sheet
            } else {
                let file = cmd
                    .file
                    .ok_or_else(|| anyhow!("pass a CSV file or --from-sheet"))?;
                ImportSource::File(file)
            };
            commands::run_import(&config, source).await
        }
        Command::UndoImport => commands::run_undo(&config).await,
        Command::Duplicates => commands::run_duplicates(&config).await,
        Command::Merge(cmd) => commands::run_merge(&config, &cmd.email).await,
        Command::Seed => commands::run_seed(&config).await,
    }
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let store = Store::open(&StoreSettings::from_env())?;
    let state = AppState { store, config };
    http::serve(ServeConfig::new(cmd.host, cmd.port), state).await
}
