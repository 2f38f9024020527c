//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use shelf_core::config::AppConfig;
use shelf_core::error::AppError;
use shelf_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(&redacted(config), format);
        }
        ConfigCommand::Validate => {
            validate(&config)?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv(
                "Server",
                &format!("{}:{}", config.server.host, config.server.port),
            );
            output::print_kv("Store", &config.database.provider);
            if !config.database.url.is_empty() {
                output::print_kv("Database", &mask_password(&config.database.url));
            }
            output::print_kv("Read scope", &config.tree.read_scope.to_string());
            output::print_kv(
                "Atomic operations",
                &config.tree.atomic_operations.to_string(),
            );
            if !config.tree.atomic_operations {
                output::print_warning("Multi-step failures may leave partial state");
            }
        }
    }

    Ok(())
}

/// Checks the cross-field rules that deserialization cannot.
pub fn validate(config: &AppConfig) -> Result<(), AppError> {
    match config.database.provider.as_str() {
        "memory" => {}
        "postgres" if config.database.url.is_empty() => {
            return Err(AppError::configuration(
                "database.url is required for the postgres provider",
            ));
        }
        "postgres" => {}
        other => {
            return Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: postgres, memory"
            )));
        }
    }
    if config.auth.jwt_secret.is_empty() {
        return Err(AppError::configuration("auth.jwt_secret cannot be empty"));
    }
    if config.database.min_connections > config.database.max_connections {
        return Err(AppError::configuration(
            "database.min_connections exceeds database.max_connections",
        ));
    }
    Ok(())
}

fn redacted(mut config: AppConfig) -> AppConfig {
    config.database.url = mask_password(&config.database.url);
    config.auth.jwt_secret = "****".to_string();
    config
}
