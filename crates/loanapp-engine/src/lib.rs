//! loanapp engine - Orchestration layer
//!
//! Runs every aggregate operation inside one SQLite transaction, using the
//! policy table from loanapp-core to reconcile sections against a payload
//! and the store to read the result back before commit.

pub mod commands;

pub use commands::aggregate::{
    create_aggregate, delete_aggregate, read_aggregate, read_for_owner, submit_aggregate,
    update_aggregate,
};
pub use commands::engine_command::{
    apply_aggregate_command, AggregateCommand, AggregateCommandResult,
};
pub use commands::engine_query::{
    apply_aggregate_query, count_by_status, list_by_owner, AggregateQuery, AggregateQueryResult,
};
