use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod error;

pub mod api;
pub mod auth;
pub mod catalog;
pub mod directory;
pub mod mail;
pub mod ui;

use cli::{CafesAction, Cli, Commands, UsersAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brewdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Serve { host, port } => cli::commands::serve(&host, port).await,
        Commands::Users { action } => match action {
            UsersAction::Add {
                username,
                email,
                phone,
                role,
                cafe,
                password,
            } => cli::commands::add_user(&username, &email, &phone, role, cafe, password).await,
            UsersAction::List => cli::commands::list_users().await,
        },
        Commands::Cafes { action } => match action {
            CafesAction::Add {
                name,
                address,
                phone,
                email,
            } => cli::commands::add_cafe(&name, &address, &phone, &email).await,
            CafesAction::List => cli::commands::list_cafes().await,
        },
    }
}
