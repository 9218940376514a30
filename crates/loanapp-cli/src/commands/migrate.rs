//! Schema migration command

use clap::Args;
use loanapp_core::errors::ExError;
use serde_json::json;

use crate::commands::{open_store, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct MigrateArgs {}

pub fn execute(_args: MigrateArgs, config: &Config) -> Result<(), ExError> {
    let conn = open_store(config)?;
    let applied = loanapp_store::migrations::applied_migrations(&conn)?;
    print_json(&json!({
        "db": config.db_path.display().to_string(),
        "applied": applied,
        "latest": loanapp_store::migrations::latest_migration_id(),
    }))
}
