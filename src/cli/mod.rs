//! CLI module for Realit.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Dispatch of commands to the typed services
//!
//! # Usage
//!
//! ```ignore
//! use realit::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &services).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use serde::Serialize;

use crate::models::{FeedQuery, LoginRequest, PaginationQuery, SignupRequest};
use crate::services::notifications::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::services::Services;

/// Run a CLI command against the services.
///
/// # Note
///
/// `Version` never returns as it calls `std::process::exit(0)`.
pub async fn run_cli_command(command: CliCommand, services: &Services) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
        }
        CliCommand::Invalid(message) => {
            eprintln!("{}\n", message);
            eprintln!("{}", USAGE);
            bail!("invalid arguments");
        }
        CliCommand::Login { identifier } => {
            let password = prompt_password()?;
            services
                .auth
                .login(&LoginRequest::new(identifier, password))
                .await?;
            println!("Signed in.");
        }
        CliCommand::Signup {
            email,
            username,
            display_name,
        } => {
            let mut request = SignupRequest::new(email).with_password(prompt_password()?);
            if let Some(username) = username {
                request = request.with_username(username);
            }
            if let Some(display_name) = display_name {
                request = request.with_display_name(display_name);
            }
            services.auth.signup(&request).await?;
            println!("Account created and signed in.");
        }
        CliCommand::Logout => {
            services.auth.logout().await;
            println!("Signed out.");
        }
        CliCommand::Status => {
            print_status(services).await;
        }
        CliCommand::Profile => {
            print_json(&services.profile.get_profile().await?)?;
        }
        CliCommand::Posts { page, limit } => {
            let posts = services
                .profile
                .get_user_posts(PaginationQuery { page, limit })
                .await?;
            print_json(&posts)?;
        }
        CliCommand::Feed { cursor, limit } => {
            let query = FeedQuery { cursor, limit };
            print_json(&services.feed.get_feed(&query).await?)?;
        }
        CliCommand::Notifications { page, limit } => {
            let notifications = services
                .notifications
                .get_notifications(
                    page.unwrap_or(DEFAULT_PAGE),
                    limit.unwrap_or(DEFAULT_LIMIT),
                )
                .await?;
            print_json(&notifications)?;
        }
        CliCommand::ReadAll => {
            services.notifications.mark_all_as_read().await?;
            println!("All notifications marked as read.");
        }
        CliCommand::Search { query } => {
            print_json(&services.search.search_users(&query).await?)?;
        }
    }
    Ok(())
}

async fn print_status(services: &Services) {
    let client = &services.client;
    println!("API: {}", client.base_url());

    match client.store().load().await {
        None => println!("Not signed in."),
        Some(pair) => match pair.access_expires_in() {
            Some(0) => println!("Signed in; access token expired (will refresh on next request)."),
            Some(secs) => println!("Signed in; access token expires in {}s.", secs),
            None => println!("Signed in."),
        },
    }
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ").wrap_err("failed to read password")?;
    if password.is_empty() {
        return Err(eyre!("password must not be empty"));
    }
    Ok(password)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{}", text);
    Ok(())
}
