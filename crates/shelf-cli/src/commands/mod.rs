//! CLI command definitions and dispatch.

pub mod collection;
pub mod config;
pub mod migrate;
pub mod serve;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use shelf_core::config::AppConfig;
use shelf_core::error::AppError;
use shelf_database::{StoreManager, StoreProvider};

use crate::output::{self, OutputFormat};

/// comic-shelf: hierarchical comic library tracker
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "SHELF_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Mint a bearer token for development
    Token(token::TokenArgs),
    /// Inspect and manage a user's collections
    Collection(collection::CollectionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Config(args) => config::execute(args, &self.config, config, self.format),
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Collection(args) => collection::execute(args, &config, self.format).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.config, self.env.as_deref())
    }
}

/// Helper: open the configured store
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn StoreProvider>, AppError> {
    if config.database.provider == "memory" {
        output::print_warning("Using the in-memory store; nothing persists past this command");
    }
    let manager = StoreManager::new(&config.database, &config.tree).await?;
    Ok(Arc::new(manager))
}
