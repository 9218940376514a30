//! Aggregate writer and reader
//!
//! Each operation is one transaction. Writers take the write lock up front
//! (`BEGIN IMMEDIATE`) and read the aggregate back before committing, so the
//! returned value is exactly what was stored. Readers use a deferred
//! transaction, which gives one consistent snapshot across all sections.
//!
//! Everything addressed by id is scoped to `ctx.caller`: an application
//! created by someone else is reported as not found.

#![allow(clippy::result_large_err)]

use chrono::Utc;
use loanapp_core::errors::{ExError, ExErrorKind, LoanAppError};
use loanapp_core::model::{
    ApplicationAggregate, ApplicationId, ApplicationPayload, SubmissionReceipt,
};
use loanapp_core::rules::validation::{
    validate_new_profile, validate_owner, validate_profile_patch,
};
use loanapp_core_types::schema::ops;
use loanapp_core_types::RequestContext;
use loanapp_store::errors::{from_rusqlite, Result};
use loanapp_store::repo::hydration::{
    load_aggregate, load_aggregates_for_owner, load_owned_aggregate,
};
use loanapp_store::SqliteRepo;
use rusqlite::{Connection, TransactionBehavior};

use crate::commands::logged;
use crate::commands::sync::{sync_sections, Phase};

fn not_found(id: ApplicationId) -> ExError {
    LoanAppError::ApplicationNotFound {
        application_id: id.get(),
    }
    .into()
}

fn read_back(conn: &Connection, id: ApplicationId) -> Result<ApplicationAggregate> {
    load_aggregate(conn, id)?.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op("read_back")
            .with_entity_id(id.to_string())
            .with_message("Application vanished inside its own transaction")
    })
}

/// Create an application owned by the calling identity
///
/// Only sections present with content are written. Nothing persists when
/// any step fails.
///
/// # Errors
/// - `ERR_MISSING_FIELD` / `ERR_INVALID_INPUT` for a missing or blank
///   mandatory root field (raised before the transaction opens)
/// - `ERR_ALREADY_EXISTS` when `file_no` is taken
/// - storage errors from SQLite
pub fn create_aggregate(
    conn: &mut Connection,
    ctx: &RequestContext,
    mut payload: ApplicationPayload,
) -> Result<ApplicationAggregate> {
    logged(ops::CREATE_AGGREGATE, ctx, || {
        let owner = ctx.caller.as_str();
        validate_owner(owner)?;
        let profile = validate_new_profile(std::mem::take(&mut payload.profile))?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let id = SqliteRepo::insert_application(&tx, owner, &profile, Utc::now())?;
        sync_sections(&tx, id, &payload, Phase::Create)?;
        let aggregate = read_back(&tx, id)?;

        tx.commit().map_err(from_rusqlite)?;
        tracing::info!(application_id = id.get(), file_no = %aggregate.file_no(), "application created");
        Ok(aggregate)
    })
}

/// Synchronize an existing application with a partial payload
///
/// Root fields that are supplied overwrite the stored ones; each section
/// key is reconciled according to its policy (see `loanapp_core::policy`).
///
/// # Errors
/// - `ERR_NOT_FOUND` for an unknown id or one owned by another caller
/// - `ERR_INVALID_INPUT` for a blanked mandatory root field
/// - `ERR_ALREADY_EXISTS` when changing `file_no` to one in use
/// - storage errors from SQLite; the whole update is rolled back
pub fn update_aggregate(
    conn: &mut Connection,
    ctx: &RequestContext,
    id: ApplicationId,
    mut payload: ApplicationPayload,
) -> Result<ApplicationAggregate> {
    logged(ops::UPDATE_AGGREGATE, ctx, || {
        let patch = std::mem::take(&mut payload.profile);
        validate_profile_patch(&patch)?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let mut application = SqliteRepo::get_owned_application(&tx, id, ctx.caller.as_str())?
            .ok_or_else(|| not_found(id))?;
        patch.apply_to(&mut application.profile);
        SqliteRepo::update_application(&tx, id, &application.profile, Utc::now())?;

        sync_sections(&tx, id, &payload, Phase::Update)?;
        let aggregate = read_back(&tx, id)?;

        tx.commit().map_err(from_rusqlite)?;
        Ok(aggregate)
    })
}

/// Load one full aggregate
///
/// # Errors
/// `ERR_NOT_FOUND` for an unknown id or one owned by another caller.
pub fn read_aggregate(
    conn: &mut Connection,
    ctx: &RequestContext,
    id: ApplicationId,
) -> Result<ApplicationAggregate> {
    logged(ops::READ_AGGREGATE, ctx, || {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let aggregate =
            load_owned_aggregate(&tx, id, ctx.caller.as_str())?.ok_or_else(|| not_found(id))?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(aggregate)
    })
}

/// Load every aggregate attributed to `owner`, newest first
pub fn read_for_owner(
    conn: &mut Connection,
    ctx: &RequestContext,
    owner: &str,
) -> Result<Vec<ApplicationAggregate>> {
    logged(ops::READ_FOR_OWNER, ctx, || {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let aggregates = load_aggregates_for_owner(&tx, owner)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(aggregates)
    })
}

/// Delete an application and, by cascade, every section below it
///
/// # Errors
/// `ERR_NOT_FOUND` for an unknown id or one owned by another caller.
pub fn delete_aggregate(
    conn: &mut Connection,
    ctx: &RequestContext,
    id: ApplicationId,
) -> Result<ApplicationId> {
    logged(ops::DELETE_AGGREGATE, ctx, || {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;
        if !SqliteRepo::delete_application(&tx, id, ctx.caller.as_str())? {
            return Err(not_found(id));
        }
        tx.commit().map_err(from_rusqlite)?;
        tracing::info!(application_id = id.get(), "application deleted");
        Ok(id)
    })
}

/// Finalize review of an application
///
/// Submission only checks that the visit was concluded; it does not change
/// stored state.
///
/// # Errors
/// - `ERR_NOT_FOUND` for an unknown id or one owned by another caller
/// - `ERR_CONCLUSION_REQUIRED` when no conclusion section exists
pub fn submit_aggregate(
    conn: &mut Connection,
    ctx: &RequestContext,
    id: ApplicationId,
) -> Result<SubmissionReceipt> {
    logged(ops::SUBMIT_AGGREGATE, ctx, || {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let aggregate =
            load_owned_aggregate(&tx, id, ctx.caller.as_str())?.ok_or_else(|| not_found(id))?;
        tx.commit().map_err(from_rusqlite)?;

        let Some(conclusion) = aggregate.conclusion.as_ref() else {
            return Err(LoanAppError::ConclusionRequired {
                application_id: id.get(),
            }
            .into());
        };

        let receipt = SubmissionReceipt {
            application_id: id,
            file_no: aggregate.file_no().to_string(),
            overall_status: conclusion.overall_status,
        };
        tracing::info!(
            application_id = id.get(),
            overall_status = receipt.overall_status.map(|s| s.as_str()).unwrap_or("pending"),
            "application submitted"
        );
        Ok(receipt)
    })
}
