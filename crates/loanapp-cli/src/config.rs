//! Runtime configuration
//!
//! Each setting resolves as command-line flag, then environment variable,
//! then `.env` file, then default. clap reads the first two; `main` loads
//! `.env` into the environment before parsing without overriding variables
//! that are already set.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use loanapp_core::errors::{ExError, ExErrorKind};
use loanapp_core::logging_facility::Profile;
use loanapp_store::db::DEFAULT_BUSY_TIMEOUT;

pub const DEFAULT_DB_PATH: &str = ".loanapp/store.db";
pub const DEFAULT_LOG_PROFILE: Profile = Profile::Development;

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Database path; its parent directory is created when missing
    #[arg(long, global = true, env = "LOANAPP_DB")]
    pub db: Option<PathBuf>,

    /// `development` or `production`
    #[arg(long, global = true, env = "LOANAPP_LOG_PROFILE")]
    pub log_profile: Option<String>,

    /// SQLite busy timeout in milliseconds
    #[arg(long, global = true, env = "LOANAPP_BUSY_TIMEOUT_MS")]
    pub busy_timeout_ms: Option<String>,
}

/// Resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_profile: Profile,
    pub busy_timeout: Duration,
}

impl Config {
    /// # Errors
    /// `ERR_INVALID_INPUT` for an unknown log profile or a busy timeout that
    /// is not a whole number of milliseconds.
    pub fn from_args(args: &ConfigArgs) -> Result<Self, ExError> {
        let db_path = match &args.db {
            Some(path) if path.as_os_str().is_empty() => {
                return Err(invalid("LOANAPP_DB", "Database path must not be empty"));
            }
            Some(path) => path.clone(),
            None => PathBuf::from(DEFAULT_DB_PATH),
        };

        let log_profile = match &args.log_profile {
            Some(value) => value
                .parse::<Profile>()
                .map_err(|e| e.with_field("LOANAPP_LOG_PROFILE"))?,
            None => DEFAULT_LOG_PROFILE,
        };

        let busy_timeout = match &args.busy_timeout_ms {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| {
                    invalid(
                        "LOANAPP_BUSY_TIMEOUT_MS",
                        format!("'{}' is not a number of milliseconds", value),
                    )
                })?,
            None => DEFAULT_BUSY_TIMEOUT,
        };

        Ok(Self {
            db_path,
            log_profile,
            busy_timeout,
        })
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_field(field)
        .with_message(message)
}
