//! CLI administration tool for the tourism portal.
//!
//! Provides commands for bootstrapping administrator accounts, inspecting
//! users and collections, and checking the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create the first administrator
//! cargo run --bin admin -- user create-admin
//!
//! # Grant admin rights to an existing account
//! cargo run --bin admin -- user promote dewi@example.com
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Document counts per collection
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the server (`DATABASE_URL` or `DB_*`,
//! `JWT_SECRET`). Only `STORAGE=postgres` is supported.

use tourism_portal::application::services::{AuthService, NewAccount};
use tourism_portal::config::{self, StorageBackend};
use tourism_portal::domain::repositories::DocumentQuery;
use tourism_portal::error::AppError;
use tourism_portal::infrastructure::persistence::PgDocumentRepository;
use tourism_portal::server::connect_database;
use tourism_portal::utils::jwt::JwtCodec;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

type Accounts = AuthService<PgDocumentRepository>;

/// CLI tool for managing the tourism portal.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show document counts per collection
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Login email
        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Grant the admin role to an existing account
    Promote {
        /// Email the account was registered with
        email: String,
    },

    /// List accounts, newest first
    List {
        /// Maximum number of accounts to show
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage != StorageBackend::Postgres {
        bail!("The admin tool requires STORAGE=postgres");
    }

    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::User { action } => {
            let accounts = AuthService::new(
                Arc::new(PgDocumentRepository::new(Arc::new(pool))),
                JwtCodec::new(&config.jwt_secret, config.jwt_ttl_seconds),
            );
            handle_user_action(action, &accounts).await?
        }
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Turns a service error into a CLI error, keeping the details.
fn describe(context: &str, e: AppError) -> anyhow::Error {
    let info = e.to_error_info();
    if info.details.is_null() || info.details == Value::Object(Default::default()) {
        anyhow::anyhow!("{}: {}", context, info.message)
    } else {
        anyhow::anyhow!("{}: {} {}", context, info.message, info.details)
    }
}

fn field<'a>(user: &'a Value, name: &str) -> &'a str {
    user.get(name).and_then(Value::as_str).unwrap_or("-")
}

/// Dispatches account commands.
async fn handle_user_action(action: UserAction, accounts: &Accounts) -> Result<()> {
    match action {
        UserAction::CreateAdmin { name, email, yes } => {
            create_admin(accounts, name, email, yes).await?;
        }
        UserAction::Promote { email } => {
            promote(accounts, &email).await?;
        }
        UserAction::List { limit } => {
            list_users(accounts, limit).await?;
        }
    }

    Ok(())
}

/// Creates an administrator with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for name and email (or use provided)
/// 2. Prompt for the password twice, hidden
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Store the account with the `admin` role
async fn create_admin(
    accounts: &Accounts,
    name: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create Administrator".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Name")
            .with_initial_text("Administrator")
            .interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password (8-128 characters)")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!("  Role:  {}", "admin".bright_yellow().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this administrator?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = accounts
        .create_admin(NewAccount {
            name,
            email,
            password,
            phone: None,
        })
        .await
        .map_err(|e| describe("Failed to create administrator", e))?;

    println!();
    println!("{}", "✅ Administrator created successfully!".green().bold());
    println!(
        "  ID: {}",
        user.get("id").map(Value::to_string).unwrap_or_default().bright_black()
    );
    println!();
    println!("{}", "Sign in with:".bright_white());
    println!(
        "  curl -X POST -H \"Content-Type: application/json\" -d '{{\"email\":\"{}\",\"password\":\"...\"}}' http://localhost:3000/api/auth/login",
        field(&user, "email").bright_yellow()
    );
    println!();

    Ok(())
}

/// Grants the admin role to an existing account after confirmation.
async fn promote(accounts: &Accounts, email: &str) -> Result<()> {
    println!("{}", "⬆️  Promote Account".bright_blue().bold());
    println!();
    println!("  Email: {}", email.cyan());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Grant the admin role to this account?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let user = accounts
        .promote(email)
        .await
        .map_err(|e| describe("Failed to promote account", e))?;

    println!();
    println!(
        "{} {} is now an administrator",
        "✅".green(),
        field(&user, "name").bright_white().bold()
    );
    println!();

    Ok(())
}

/// Lists accounts with role indicators.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   ID   Name                      Email                          Role
///   ───────────────────────────────────────────────────────────────────────────
///   12   Dewi Lestari              dewi@example.com               ADMIN
///   15   Budi                      budi@example.com               USER
/// ```
async fn list_users(accounts: &Accounts, limit: i64) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let listing = accounts
        .list_users(DocumentQuery::new(0, limit.max(1)))
        .await
        .map_err(|e| describe("Failed to list accounts", e))?;

    if listing.items.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create-admin",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<25} {:<30} {:<6}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &listing.items {
        let role = match field(user, "role") {
            "admin" => "ADMIN".yellow(),
            _ => "USER".green(),
        };

        println!(
            "  {:<4} {:<25} {:<30} {}",
            user.get("id")
                .map(Value::to_string)
                .unwrap_or_default()
                .bright_black(),
            field(user, "name").cyan(),
            field(user, "email"),
            role
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        listing.items.len().to_string().bright_white().bold(),
        listing.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays document counts per collection.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT collection, COUNT(*) FROM documents GROUP BY collection ORDER BY collection",
    )
    .fetch_all(pool)
    .await?;

    if counts.is_empty() {
        println!("{}", "  No documents yet".yellow());
    }

    for (collection, count) in &counts {
        println!(
            "  {:<16} {}",
            collection,
            count.to_string().bright_green().bold()
        );
    }

    let seats: Option<i64> = sqlx::query_scalar(
        "SELECT SUM((body ->> 'participants')::BIGINT)::BIGINT FROM documents \
         WHERE collection = 'bookings' AND body ->> 'status' IN ('pending', 'confirmed')",
    )
    .fetch_one(pool)
    .await?;

    println!();
    println!(
        "  Seats held by live bookings: {}",
        seats.unwrap_or(0).to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
