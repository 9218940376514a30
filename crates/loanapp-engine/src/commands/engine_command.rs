//! Engine-level write commands.

#![allow(clippy::result_large_err)]

use loanapp_core::model::{ApplicationAggregate, ApplicationId, ApplicationPayload, SubmissionReceipt};
use loanapp_core_types::RequestContext;
use loanapp_store::errors::Result;
use rusqlite::Connection;

use crate::commands::aggregate;

/// Commands that change (or finalize) an application.
#[derive(Debug, Clone)]
pub enum AggregateCommand {
    /// Create an application owned by the calling identity.
    Create { payload: ApplicationPayload },
    /// Synchronize an existing application with a partial payload.
    Update {
        application_id: ApplicationId,
        payload: ApplicationPayload,
    },
    /// Delete an application with all of its sections.
    Delete { application_id: ApplicationId },
    /// Finalize review; requires a conclusion.
    Submit { application_id: ApplicationId },
}

/// Result of applying an aggregate command.
#[derive(Debug, Clone)]
pub enum AggregateCommandResult {
    Created(ApplicationAggregate),
    Updated(ApplicationAggregate),
    Deleted(ApplicationId),
    Submitted(SubmissionReceipt),
}

/// Apply an aggregate command on behalf of `ctx.caller`.
pub fn apply_aggregate_command(
    cmd: AggregateCommand,
    conn: &mut Connection,
    ctx: &RequestContext,
) -> Result<AggregateCommandResult> {
    match cmd {
        AggregateCommand::Create { payload } => {
            aggregate::create_aggregate(conn, ctx, payload).map(AggregateCommandResult::Created)
        }
        AggregateCommand::Update {
            application_id,
            payload,
        } => aggregate::update_aggregate(conn, ctx, application_id, payload)
            .map(AggregateCommandResult::Updated),
        AggregateCommand::Delete { application_id } => {
            aggregate::delete_aggregate(conn, ctx, application_id)
                .map(AggregateCommandResult::Deleted)
        }
        AggregateCommand::Submit { application_id } => {
            aggregate::submit_aggregate(conn, ctx, application_id)
                .map(AggregateCommandResult::Submitted)
        }
    }
}
