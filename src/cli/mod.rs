// CLI module for the server and administrative operations requiring server access

pub mod accounts;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::config::BootstrapSettings;

/// MediXScan CLI
#[derive(Parser, Debug)]
#[command(name = "medixscan")]
#[command(about = "MediXScan authentication and user administration backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create a super-admin account, or promote an existing account
    CreateSuperuser {
        /// Email address of the account
        #[arg(long)]
        email: String,

        /// Password; generated and printed once when omitted
        #[arg(long)]
        password: Option<String>,

        /// Username; defaults to the email address
        #[arg(long)]
        username: Option<String>,
    },

    /// Set a new password and revoke the account's token
    ResetPassword {
        #[arg(long)]
        email: String,

        /// New password; generated and printed once when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Approve a pending account
    ApproveUser {
        #[arg(long)]
        email: String,
    },

    /// Print every account with its flags and roles
    ListUsers,
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
/// No subcommand means `serve`.
pub async fn execute_command(
    cli: Cli,
    app_data: Arc<AppData>,
    settings: &BootstrapSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_server(app_data, settings).await?,
        Commands::CreateSuperuser {
            email,
            password,
            username,
        } => accounts::create_superuser(app_data, &email, password, username).await?,
        Commands::ResetPassword { email, password } => {
            accounts::reset_password(app_data, &email, password).await?
        }
        Commands::ApproveUser { email } => accounts::approve_user(app_data, &email).await?,
        Commands::ListUsers => accounts::list_users(app_data).await?,
    }

    Ok(())
}
