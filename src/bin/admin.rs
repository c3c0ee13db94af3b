//! CLI administration tool for the URL shortener.
//!
//! Works directly against the PostgreSQL mapping store, without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show mapping count and highest short URL
//! cargo run --bin admin -- stats
//!
//! # Look up a short URL
//! cargo run --bin admin -- lookup 42
//!
//! # Shorten a URL (syntax check only, no DNS lookup)
//! cargo run --bin admin -- resolve https://example.com
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Delete every mapping
//! cargo run --bin admin -- db reset
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)

use url_shortener_microservice::application::services::ShortenService;
use url_shortener_microservice::config::{Config, mask_connection_string};
use url_shortener_microservice::domain::repositories::MappingRepository;
use url_shortener_microservice::infrastructure::persistence::PgMappingRepository;
use url_shortener_microservice::infrastructure::validation::SyntaxUrlValidator;
use url_shortener_microservice::server::connect_database;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the URL shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show statistics
    Stats,

    /// Show the original URL behind a short URL
    Lookup {
        /// Numeric short URL
        short_url: i64,
    },

    /// Shorten a URL, reusing its short URL if it exists
    Resolve {
        /// URL to shorten
        url: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Delete every mapping (short URLs restart at 1)
    Reset {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_database(&config).await?;
    let repository = Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Stats => handle_stats(repository).await?,
        Commands::Lookup { short_url } => handle_lookup(repository, short_url).await?,
        Commands::Resolve { url } => handle_resolve(repository, &url).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config, repository).await?,
    }

    Ok(())
}

async fn handle_stats(repository: Arc<PgMappingRepository>) -> Result<()> {
    let count = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;
    let max = repository
        .max_identifier()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read highest short URL: {}", e))?;

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!("  {:<20} {}", "Mappings:".bright_white(), count.to_string().cyan());
    println!("  {:<20} {}", "Highest short URL:".bright_white(), max.to_string().cyan());
    println!();

    Ok(())
}

async fn handle_lookup(repository: Arc<PgMappingRepository>, short_url: i64) -> Result<()> {
    let mapping = repository
        .get_by_identifier(short_url)
        .await
        .map_err(|e| anyhow::anyhow!("Lookup failed: {}", e))?;

    match mapping {
        Some(mapping) => println!(
            "  {} → {}",
            mapping.identifier.to_string().bright_yellow().bold(),
            mapping.original_url.cyan()
        ),
        None => println!("{}", format!("  No short URL {}", short_url).yellow()),
    }

    Ok(())
}

async fn handle_resolve(repository: Arc<PgMappingRepository>, url: &str) -> Result<()> {
    let service = ShortenService::new(repository, Arc::new(SyntaxUrlValidator::new()));

    let mapping = service
        .shorten(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten {}: {}", url, e))?;

    println!(
        "{} {} → {}",
        "✅".green(),
        mapping.original_url.cyan(),
        mapping.identifier.to_string().bright_yellow().bold()
    );

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(
    action: DbAction,
    pool: &PgPool,
    config: &Config,
    repository: Arc<PgMappingRepository>,
) -> Result<()> {
    match action {
        DbAction::Check => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await
                .context("Database query failed")?;

            println!("{}", "✅ Database connection OK".green().bold());
            if let Some(ref url) = config.database_url {
                println!("  {} {}", "URL:".bright_white(), mask_connection_string(url));
            }
            println!("  {} {}", "Server:".bright_white(), version.bright_black());
        }
        DbAction::Reset { yes } => {
            let count = repository
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

            println!(
                "{}",
                format!("⚠️  This deletes all {} mappings.", count).red().bold()
            );

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Reset the mapping store?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let removed = repository
                .reset()
                .await
                .map_err(|e| anyhow::anyhow!("Reset failed: {}", e))?;

            println!(
                "{}",
                format!("✅ Removed {} mappings", removed).green().bold()
            );
        }
    }

    Ok(())
}
