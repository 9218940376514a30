//! Subcommands
//!
//! Every command opens the configured database, brings its schema up to
//! date, runs one engine call and prints the result as JSON on stdout.

pub mod create;
pub mod delete;
pub mod list;
pub mod migrate;
pub mod show;
pub mod stats;
pub mod submit;
pub mod update;

use std::path::Path;

use loanapp_core::errors::{ExError, ExErrorKind};
use loanapp_core::model::ApplicationPayload;
use loanapp_core_types::{Caller, RequestContext};
use loanapp_store::errors::io_error;
use rusqlite::Connection;
use serde::Serialize;

use crate::config::Config;

pub(crate) fn open_store(config: &Config) -> Result<Connection, ExError> {
    let mut conn = loanapp_store::db::open_with_timeout(&config.db_path, config.busy_timeout)?;
    loanapp_store::migrations::apply_migrations(&mut conn)?;
    tracing::debug!(db = %config.db_path.display(), "store ready");
    Ok(conn)
}

pub(crate) fn context(caller: &str) -> RequestContext {
    RequestContext::new(Caller::new(caller))
}

/// Read a payload file, or stdin when the path is `-`
pub(crate) fn read_payload(path: &Path) -> Result<ApplicationPayload, ExError> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).map_err(|e| io_error("read_payload", e))?
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            io_error("read_payload", e).with_entity_id(path.display().to_string())
        })?
    };
    Ok(ApplicationPayload::from_json(&text)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), ExError> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("print_json")
            .with_message(e.to_string())
    })?;
    println!("{}", rendered);
    Ok(())
}

fn unexpected_result(command: &str, result: &loanapp_engine::AggregateCommandResult) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(command)
        .with_message(format!("Unexpected engine result: {:?}", result))
}

fn unexpected_query_result(command: &str, result: &loanapp_engine::AggregateQueryResult) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(command)
        .with_message(format!("Unexpected query result: {:?}", result))
}
