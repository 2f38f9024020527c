//! Development token minting.

use clap::Args;
use uuid::Uuid;

use shelf_auth::JwtEncoder;
use shelf_core::config::AppConfig;
use shelf_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Subject user id; a random one when omitted
    #[arg(short, long)]
    pub user: Option<Uuid>,

    /// Email claim
    #[arg(long)]
    pub email: Option<String>,

    /// Override the token lifetime in minutes
    #[arg(long)]
    pub ttl_minutes: Option<i64>,
}

/// Execute the token command
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let mut encoder = JwtEncoder::new(&config.auth);
    if let Some(ttl) = args.ttl_minutes {
        if ttl <= 0 {
            return Err(AppError::validation("--ttl-minutes must be positive"));
        }
        encoder = encoder.with_ttl_minutes(ttl);
    }

    let user_id = args.user.unwrap_or_else(Uuid::new_v4);
    let issued = encoder.mint(user_id, args.email.clone())?;

    match format {
        OutputFormat::Json => output::print_item(&issued, format),
        OutputFormat::Table => {
            output::print_kv("User", &issued.user_id.to_string());
            output::print_kv("Expires", &issued.expires_at.to_rfc3339());
            println!("{}", issued.token);
        }
    }

    Ok(())
}
