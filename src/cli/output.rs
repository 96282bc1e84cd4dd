//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::models::User;
use crate::directory::Cafe;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a table of staff accounts
pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        info("No users found. Create one with 'brewdesk users add'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Phone").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Café").fg(Color::Cyan),
            Cell::new("Staff").fg(Color::Cyan),
            Cell::new("Superuser").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            Cell::new(&user.username),
            Cell::new(&user.email),
            Cell::new(&user.phone_number),
            Cell::new(user.role.label()),
            Cell::new(user.cafe.as_deref().unwrap_or("-")),
            Cell::new(if user.is_staff { "yes" } else { "no" }),
            Cell::new(if user.is_superuser { "yes" } else { "no" }),
        ]);
    }

    println!("{}", table);
}

/// Print a table of cafés
pub fn print_cafe_table(cafes: &[Cafe]) {
    if cafes.is_empty() {
        info("No cafés found. Create one with 'brewdesk cafes add'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Address").fg(Color::Cyan),
            Cell::new("Phone").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
        ]);

    for cafe in cafes {
        table.add_row(vec![
            Cell::new(&cafe.cafe_name),
            Cell::new(&cafe.address),
            Cell::new(&cafe.phone_number),
            Cell::new(&cafe.email),
        ]);
    }

    println!("{}", table);
}
