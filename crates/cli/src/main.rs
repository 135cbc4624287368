//! Marigold CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mg-cli migrate
//!
//! # Seed the demo catalog
//! mg-cli seed
//!
//! # Grant superuser status (optionally at CEO level)
//! mg-cli superuser grant -e ops@example.com
//! mg-cli superuser grant -e ceo@example.com -l ceo
//!
//! # Revoke superuser status
//! mg-cli superuser revoke -e former-ops@example.com
//!
//! # Provision an account for an external identity (idempotent)
//! mg-cli user ensure -e shopper@example.com -n "Demo Shopper"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mg-cli")]
#[command(author, version, about = "Marigold CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a demo catalog
    Seed,
    /// Manage superuser accounts
    Superuser {
        #[command(subcommand)]
        action: SuperuserAction,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Provision an account for an external identity (idempotent)
    Ensure {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Avatar URL
        #[arg(short, long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand)]
enum SuperuserAction {
    /// Grant superuser status to an existing account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Superuser tier (`standard` or `ceo`)
        #[arg(short, long, default_value = "standard")]
        level: String,
    },
    /// Revoke superuser status from an account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Superuser { action } => match action {
            SuperuserAction::Grant { email, level } => {
                commands::superuser::grant(&email, &level).await?;
            }
            SuperuserAction::Revoke { email } => {
                commands::superuser::revoke(&email).await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Ensure {
                email,
                name,
                avatar,
            } => {
                commands::user::ensure(&email, &name, avatar.as_deref()).await?;
            }
        },
    }
    Ok(())
}
