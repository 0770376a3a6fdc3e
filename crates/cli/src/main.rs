//! Harborview CLI - Database migrations and role management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! hv-cli migrate
//!
//! # Grant an admin role to a member (by email)
//! hv-cli role set -e curator@harborviewmuseum.org -r editor
//!
//! # Revoke a member's admin role
//! hv-cli role clear -e curator@harborviewmuseum.org
//! ```
//!
//! Roles are only ever written here; the website reads them per request
//! but has no endpoint to change them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hv-cli")]
#[command(author, version, about = "Harborview Museum CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage member admin roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Grant or replace a member's admin role
    Set {
        /// Member email address
        #[arg(short, long)]
        email: String,

        /// Role to grant (`editor`, `super_admin`)
        #[arg(short, long, default_value = "editor")]
        role: String,
    },
    /// Revoke a member's admin role
    Clear {
        /// Member email address
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
        Commands::Role { action } => match action {
            RoleAction::Set { email, role } => {
                commands::role::set(&email, &role).await?;
            }
            RoleAction::Clear { email } => {
                commands::role::clear(&email).await?;
            }
        },
    }
    Ok(())
}
