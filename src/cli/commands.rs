//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::auth::models::User;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::cli::{error, info, print_cafe_table, print_user_table, success, warn, RoleArg};
use crate::config::{self, Config};
use crate::directory::{Cafe, Directory};

/// Initialize a new brewdesk.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("brewdesk.toml");

    if config_path.exists() {
        warn("brewdesk.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created brewdesk.toml");
    info("Edit the configuration file, add a café and staff with 'brewdesk cafes add' and 'brewdesk users add', then run 'brewdesk serve'");

    Ok(())
}

/// Start the HTTP server
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let config = load_config()?;

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, host, port).await?;
    Ok(())
}

/// Create a staff account
pub async fn add_user(
    username: &str,
    email: &str,
    phone: &str,
    role: RoleArg,
    cafe: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let directory = Directory::open(config.directory_path())?;

    if let Some(cafe_name) = &cafe {
        if directory.find_cafe(cafe_name).await.is_none() {
            let err = crate::error::Error::CafeNotFound(cafe_name.clone());
            error(&err.to_string());
            return Err(err.into());
        }
    }

    let password = match password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    if let Err(err) = validate_password_strength(&password, Some(username)) {
        error(&err.to_string());
        return Err(err.into());
    }

    let password_hash = hash_password(&password)?;
    let user = User::new(
        username.to_string(),
        email.to_string(),
        phone.to_string(),
        password_hash,
        role.into(),
        cafe,
    );

    match directory.insert_user(user).await {
        Ok(()) => {
            success(&format!("Created user: {}", username));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create user: {}", e));
            Err(e.into())
        }
    }
}

/// List all staff accounts
pub async fn list_users() -> Result<()> {
    let config = load_config()?;
    let directory = Directory::open(config.directory_path())?;

    let users = directory.list_users().await;
    print_user_table(&users);

    Ok(())
}

/// Create a café
pub async fn add_cafe(name: &str, address: &str, phone: &str, email: &str) -> Result<()> {
    let config = load_config()?;
    let directory = Directory::open(config.directory_path())?;

    let cafe = Cafe::new(
        name.to_string(),
        address.to_string(),
        phone.to_string(),
        email.to_string(),
    );

    match directory.insert_cafe(cafe).await {
        Ok(()) => {
            success(&format!("Created cafe: {}", name));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create cafe: {}", e));
            Err(e.into())
        }
    }
}

/// List all cafés
pub async fn list_cafes() -> Result<()> {
    let config = load_config()?;
    let directory = Directory::open(config.directory_path())?;

    let cafes = directory.list_cafes().await;
    print_cafe_table(&cafes);

    Ok(())
}

// Helper functions

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| anyhow::anyhow!("{}", e))
}
