//! CLI argument parsing, validation, and startup helpers.

use std::time::Duration;

use crate::ServerConfig;
use crate::db::Database;
use crate::hash::DEFAULT_COST;
use crate::jwt::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use crate::service::{DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_ROLE, PasswordPolicy};
use clap::Parser;
use tracing::{error, info, warn};

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Signing key used only when `--dev` is set and no secret was provided.
const INSECURE_DEV_SECRET: &str = "insecure-development-secret-do-not-use";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "authgate",
    about = "Token authentication and access control API"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "authgate.db")]
    pub database: String,

    /// Path to file containing the JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Token lifetime: plain seconds or a number with an s/m/h/d suffix (e.g. 24h)
    #[arg(long, env = "JWT_EXPIRES_IN", default_value_t = DEFAULT_TOKEN_TTL_SECS,
        value_parser = parse_ttl)]
    pub token_ttl: u64,

    /// bcrypt work factor for password hashes
    #[arg(long, default_value_t = DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// Minimum password length accepted at registration
    #[arg(long, default_value_t = DEFAULT_MIN_PASSWORD_LENGTH)]
    pub min_password_length: usize,

    /// Role assigned to newly registered users
    #[arg(long, default_value = DEFAULT_ROLE)]
    pub default_role: String,

    /// Development mode: allow starting without a JWT secret (insecure)
    #[arg(long, env = "AUTHGATE_DEV")]
    pub dev: bool,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Parse a token lifetime into seconds. Accepts `3600`, `90s`, `15m`, `24h`
/// and `7d`; the result must be between one second and ten years.
fn parse_ttl(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&value[..i], c.to_ascii_lowercase()),
        _ => (value, 's'),
    };
    let scale: u64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        other => return Err(format!("unknown time unit '{}', use s, m, h or d", other)),
    };
    let count: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{}'", value))?;

    match count.checked_mul(scale) {
        Some(secs) if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) => Ok(secs),
        _ => Err(format!(
            "duration must be between 1 second and {} seconds",
            MAX_TOKEN_TTL_SECS
        )),
    }
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load the JWT secret from the environment or a file.
///
/// Returns None and logs an error if no usable secret is available. In
/// development mode a missing secret falls back to a fixed insecure key.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>, dev: bool) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else if dev {
        warn!("JWT_SECRET not set. Using an insecure development key; never run like this in production");
        return Some(INSECURE_DEV_SECRET.to_string());
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        if dev {
            warn!(
                "JWT secret is shorter than {} characters. Accepted in development mode only",
                MIN_JWT_SECRET_LENGTH
            );
        } else {
            error!(
                "JWT secret is shorter than {} characters. Use a longer secret",
                MIN_JWT_SECRET_LENGTH
            );
            return None;
        }
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(args: &Args, db: Database, jwt_secret: String) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        token_ttl: Duration::from_secs(args.token_ttl),
        bcrypt_cost: args.bcrypt_cost,
        password_policy: PasswordPolicy {
            min_length: args.min_password_length,
        },
        default_role: args.default_role.clone(),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
