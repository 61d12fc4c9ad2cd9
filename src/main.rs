use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use medixscan_backend::app_data::AppData;
use medixscan_backend::cli::{self, Cli};
use medixscan_backend::config::database::{init_database, migrate_database};
use medixscan_backend::config::{BootstrapSettings, SecretManager, init_logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    let secret_manager = SecretManager::init()?;
    tracing::debug!("Loaded secrets: {}", secret_manager);

    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, secret_manager));

    cli::execute_command(cli, app_data, &settings).await
}
