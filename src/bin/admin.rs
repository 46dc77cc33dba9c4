//! CLI administration tool for click-tracker.
//!
//! Manages the bad domain registry and inspects recorded clicks without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a bad domain (subdomains are flagged too)
//! cargo run --bin admin -- bad-domain add known-bad.tld --reason "click farm"
//!
//! # List registered domains
//! cargo run --bin admin -- bad-domain list
//!
//! # Remove a domain
//! cargo run --bin admin -- bad-domain remove known-bad.tld
//!
//! # Show a click
//! cargo run --bin admin -- click show 0193f1c2a4b5e6f708192a3b4c5d6e7f
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME`

use click_tracker::AppError;
use click_tracker::application::services::{BadDomainService, ClickService};
use click_tracker::config::Config;
use click_tracker::domain::reputation::DomainReputation;
use click_tracker::infrastructure::persistence::{PgBadDomainRepository, PgClickRepository};
use click_tracker::infrastructure::reputation::BadDomainRegistry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing click-tracker.
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
    /// Manage the bad domain registry
    BadDomain {
        #[command(subcommand)]
        action: BadDomainAction,
    },

    /// Inspect recorded clicks
    Click {
        #[command(subcommand)]
        action: ClickAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Bad domain registry subcommands.
#[derive(Subcommand)]
enum BadDomainAction {
    /// Register a domain (a URL is accepted; its host is used)
    Add {
        domain: String,

        /// Why the domain is considered bad
        #[arg(short, long)]
        reason: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List registered domains
    List,

    /// Remove a domain
    Remove {
        domain: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check whether a referrer would be flagged
    Check { referrer: String },
}

/// Click inspection subcommands.
#[derive(Subcommand)]
enum ClickAction {
    /// Show a click by id
    Show { id: String },
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
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::BadDomain { action } => handle_bad_domain_action(action, &pool).await?,
        Commands::Click { action } => handle_click_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches bad domain registry commands.
async fn handle_bad_domain_action(action: BadDomainAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgBadDomainRepository::new(Arc::new(pool.clone())));

    match action {
        BadDomainAction::Add {
            domain,
            reason,
            yes,
        } => add_domain(BadDomainService::new(repo), domain, reason, yes).await?,
        BadDomainAction::List => list_domains(BadDomainService::new(repo)).await?,
        BadDomainAction::Remove { domain, yes } => {
            remove_domain(BadDomainService::new(repo), domain, yes).await?
        }
        BadDomainAction::Check { referrer } => {
            check_referrer(BadDomainRegistry::new(repo), referrer).await?
        }
    }

    Ok(())
}

/// Registers a bad domain after confirmation.
async fn add_domain(
    service: BadDomainService<PgBadDomainRepository>,
    domain: String,
    reason: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🚫 Register Bad Domain".bright_blue().bold());
    println!();
    println!("  Domain: {}", domain.cyan());
    if let Some(ref reason) = reason {
        println!("  Reason: {}", reason.bright_white());
    }
    println!(
        "  {}",
        "Clicks referred by this domain or its subdomains will be flagged from now on."
            .bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Register this domain?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    match service.add_domain(&domain, reason).await {
        Ok(created) => {
            println!(
                "{} {}",
                "✅ Registered".green().bold(),
                created.domain.cyan()
            );
        }
        Err(AppError::Conflict { .. }) => {
            println!("{}", "⚠️  This domain is already registered".yellow());
        }
        Err(e) => anyhow::bail!("Failed to register domain: {}", e),
    }
    println!();

    Ok(())
}

/// Lists registered bad domains.
///
/// # Output Format
///
/// ```text
/// 📋 Bad Domains
///
///   Domain                         Added                Reason
///   ──────────────────────────────────────────────────────────────
///   known-bad.tld                  2024-01-15 10:30     click farm
/// ```
async fn list_domains(service: BadDomainService<PgBadDomainRepository>) -> Result<()> {
    println!("{}", "📋 Bad Domains".bright_blue().bold());
    println!();

    let domains = service
        .list_domains()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list domains: {}", e))?;

    if domains.is_empty() {
        println!("{}", "  No domains registered".yellow());
        println!();
        println!(
            "  Register one with: {} admin bad-domain add <domain>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<30} {:<20} {}",
        "Domain".bright_white().bold(),
        "Added".bright_white().bold(),
        "Reason".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for entry in &domains {
        println!(
            "  {:<30} {:<20} {}",
            entry.domain.cyan(),
            entry
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            entry.reason.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!(
        "  Total: {}",
        domains.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Removes a bad domain after confirmation (default: No).
async fn remove_domain(
    service: BadDomainService<PgBadDomainRepository>,
    domain: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Remove Bad Domain".bright_blue().bold());
    println!();
    println!("  Domain: {}", domain.cyan());
    println!(
        "  {}",
        "Already recorded clicks keep their flag.".bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this domain?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    match service.remove_domain(&domain).await {
        Ok(()) => println!("{}", "✅ Domain removed".green().bold()),
        Err(AppError::NotFound { .. }) => {
            println!("{}", "⚠️  This domain is not registered".yellow())
        }
        Err(e) => anyhow::bail!("Failed to remove domain: {}", e),
    }
    println!();

    Ok(())
}

/// Runs the reputation check the ingestion path would run for a referrer.
async fn check_referrer(
    registry: BadDomainRegistry<PgBadDomainRepository>,
    referrer: String,
) -> Result<()> {
    let flagged = registry
        .is_bad_domain(&referrer)
        .await
        .map_err(|e| anyhow::anyhow!("Reputation check failed: {}", e))?;

    if flagged {
        println!("  {} {}", referrer.cyan(), "BAD DOMAIN".red().bold());
    } else {
        println!("  {} {}", referrer.cyan(), "OK".green().bold());
    }

    Ok(())
}

/// Dispatches click inspection commands.
async fn handle_click_action(action: ClickAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let service = ClickService::new(
        Arc::new(PgClickRepository::new(pool.clone())),
        Arc::new(BadDomainRegistry::new(Arc::new(PgBadDomainRepository::new(pool)))),
    );

    match action {
        ClickAction::Show { id } => {
            let click = match service.get_click(&id).await {
                Ok(click) => click,
                Err(AppError::NotFound { .. }) => {
                    println!("{}", "⚠️  Click not found".yellow());
                    return Ok(());
                }
                Err(e) => anyhow::bail!("Failed to load click: {}", e),
            };

            println!("{}", "🖱️  Click".bright_blue().bold());
            println!();
            println!("  ID:          {}", click.id.bright_white().bold());
            println!(
                "  Recorded:    {}",
                click.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("  User agent:  {}", click.user_agent);
            println!("  User IP:     {}", click.user_ip);
            println!("  Referrer:    {}", click.referrer.cyan());
            println!("  Param1:      {}", click.param1);
            println!("  Param2:      {}", click.param2);
            println!(
                "  Bad domain:  {}",
                if click.is_bad_domain {
                    "YES".red().bold()
                } else {
                    "no".green()
                }
            );
            println!(
                "  Error:       {}",
                if click.has_error {
                    "YES".yellow().bold()
                } else {
                    "no".green()
                }
            );
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of clicks
/// - Clicks flagged as coming from a bad domain
/// - Clicks recorded with an error
/// - Number of registered bad domains
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await?;

    let flagged_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE is_bad_domain")
            .fetch_one(pool)
            .await?;

    let error_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE has_error")
        .fetch_one(pool)
        .await?;

    let domains_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bad_domains")
        .fetch_one(pool)
        .await?;

    println!(
        "  Clicks:              {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Bad domain clicks:   {}",
        flagged_count.to_string().bright_red().bold()
    );
    println!(
        "  Clicks with errors:  {}",
        error_count.to_string().yellow().bold()
    );
    println!(
        "  Registered domains:  {}",
        domains_count.to_string().bright_white().bold()
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

            let applied: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
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
