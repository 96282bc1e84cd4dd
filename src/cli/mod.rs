//! CLI interface for Brewdesk

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::auth::models::Role;

#[derive(Parser)]
#[command(name = "brewdesk")]
#[command(version = "1.0.0")]
#[command(about = "Run a café: staff roles, dashboards, and catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new brewdesk.toml configuration file
    Init,

    /// Start the HTTP server and web UI
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3456")]
        port: u16,
    },

    /// Manage staff accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage cafés
    Cafes {
        #[command(subcommand)]
        action: CafesAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a staff account
    Add {
        /// Username for login
        #[arg(short, long)]
        username: String,

        /// Email address, used for password resets
        #[arg(short, long)]
        email: String,

        /// Contact phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Role of the account
        #[arg(short, long)]
        role: RoleArg,

        /// Café the account belongs to (must exist)
        #[arg(short, long)]
        cafe: Option<String>,

        /// Password; prompted interactively when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// List all staff accounts
    List,
}

#[derive(Subcommand)]
pub enum CafesAction {
    /// Create a café
    Add {
        /// Café name
        #[arg(short, long)]
        name: String,

        /// Street address
        #[arg(short, long, default_value = "")]
        address: String,

        /// Contact phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Contact email
        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// List all cafés
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    ShopOwner,
    ShopManager,
    Chef,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::ShopOwner => Role::ShopOwner,
            RoleArg::ShopManager => Role::ShopManager,
            RoleArg::Chef => Role::Chef,
        }
    }
}
