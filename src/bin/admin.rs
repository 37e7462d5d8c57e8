//! CLI administration tool for snaplink.
//!
//! Manages accounts and inspects mappings directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register an account (password is prompted)
//! cargo run --bin admin -- user register --username alice
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Show where a code points
//! cargo run --bin admin -- link show aB3xY9
//!
//! # Counts
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! The database URL is resolved the same way as for the server: `DATABASE_URL`,
//! then `SECRETS_FILE`, then the `DB_*` components.

use snaplink::application::services::account_service::{
    PASSWORD_MIN_LENGTH, PASSWORD_SPECIALS, check_password_complexity,
};
use snaplink::config::database_url_from_env;
use snaplink::domain::entities::NewUser;
use snaplink::domain::repositories::{MappingRepository, StoreError, UserRepository};
use snaplink::infrastructure::auth::password::hash_password;
use snaplink::infrastructure::persistence::{PgMappingRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage accounts of the built-in credential service
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect mappings
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new account
    Register {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// List all accounts
    List,
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show the mapping for a short code
    Show { code: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = database_url_from_env().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Register { username } => register_user(&repo, username).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Registers an account after prompting for the password twice.
///
/// The same complexity rules as `POST /auth/register` apply.
async fn register_user(repo: &PgUserRepository, username: Option<String>) -> Result<()> {
    println!("{}", "Register account".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if !check_password_complexity(&password) {
        println!(
            "{}",
            format!(
                "Password needs at least {} characters, an uppercase letter, a lowercase letter, a digit and one of {}",
                PASSWORD_MIN_LENGTH, PASSWORD_SPECIALS
            )
            .red()
        );
        return Ok(());
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    match repo
        .create(NewUser {
            username: username.clone(),
            password_hash,
        })
        .await
    {
        Ok(user) => {
            println!();
            println!("{}", "Account created".green().bold());
            println!("  ID:       {}", user.id.to_string().bright_black());
            println!("  Username: {}", user.username.cyan());
            println!();
            Ok(())
        }
        Err(StoreError::Duplicate { .. }) => {
            println!("{}", format!("Username '{}' is already taken", username).yellow());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create account: {}", e)),
    }
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "Accounts".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user register",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<6} {:<30} {:<20}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Created".bright_white().bold(),
    );
    println!("  {}", "-".repeat(58).bright_black());

    for user in &users {
        println!(
            "  {:<6} {:<30} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = PgMappingRepository::new(Arc::new(pool.clone()));

    match action {
        LinkAction::Show { code } => {
            let mapping = repo
                .find_by_code(&code)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            let Some(mapping) = mapping else {
                println!("{}", format!("No mapping for '{}'", code).yellow());
                return Ok(());
            };

            println!("{}", "Mapping".bright_blue().bold());
            println!();
            println!("  Code:     {}", mapping.code.cyan());
            println!("  Long URL: {}", mapping.long_url.bright_white());
            println!(
                "  Owner:    {}",
                mapping.owner.as_deref().unwrap_or("-").bright_black()
            );
            println!(
                "  Created:  {}",
                mapping
                    .created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays mapping and account counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let mappings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mappings")
        .fetch_one(pool)
        .await?;

    let owners_count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT owner) FROM mappings")
        .fetch_one(pool)
        .await?;

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    println!(
        "  Mappings: {}",
        mappings_count.to_string().bright_green().bold()
    );
    println!(
        "  Owners:   {}",
        owners_count.to_string().bright_green().bold()
    );
    println!(
        "  Accounts: {}",
        users_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = TRUE",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
