//! Engine-level read-only query surface.
//!
//! `apply_aggregate_query` is the single entry point for reads. Every query
//! runs in one deferred transaction and never writes.

#![allow(clippy::result_large_err)]

use loanapp_core::model::{ApplicationAggregate, ApplicationId, ApplicationSummary, StatusTally};
use loanapp_core_types::schema::ops;
use loanapp_core_types::RequestContext;
use loanapp_store::errors::{from_rusqlite, Result};
use loanapp_store::query;
use rusqlite::Connection;

use crate::commands::{aggregate, logged};

/// Read-only queries over applications.
#[derive(Debug, Clone)]
pub enum AggregateQuery {
    /// One full aggregate.
    Get { application_id: ApplicationId },
    /// Every full aggregate of one owner, newest first.
    ForOwner { owner: String },
    /// Summary rows of one owner, newest first.
    ListByOwner { owner: String },
    /// Outcome counts for one owner.
    CountByStatus { owner: String },
}

/// Result of an aggregate query.
#[derive(Debug, Clone)]
pub enum AggregateQueryResult {
    Aggregate(ApplicationAggregate),
    Aggregates(Vec<ApplicationAggregate>),
    Summaries(Vec<ApplicationSummary>),
    Tally(StatusTally),
}

/// Summary rows of one owner's applications
pub fn list_by_owner(
    conn: &mut Connection,
    ctx: &RequestContext,
    owner: &str,
) -> Result<Vec<ApplicationSummary>> {
    logged(ops::LIST_BY_OWNER, ctx, || {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let summaries = query::list_by_owner(&tx, owner)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(summaries)
    })
}

/// Outcome counts of one owner's applications
pub fn count_by_status(
    conn: &mut Connection,
    ctx: &RequestContext,
    owner: &str,
) -> Result<StatusTally> {
    logged(ops::COUNT_BY_STATUS, ctx, || {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let tally = query::count_by_status(&tx, owner)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(tally)
    })
}

/// Apply a read-only query.
pub fn apply_aggregate_query(
    query: AggregateQuery,
    conn: &mut Connection,
    ctx: &RequestContext,
) -> Result<AggregateQueryResult> {
    match query {
        AggregateQuery::Get { application_id } => {
            aggregate::read_aggregate(conn, ctx, application_id).map(AggregateQueryResult::Aggregate)
        }
        AggregateQuery::ForOwner { owner } => {
            aggregate::read_for_owner(conn, ctx, &owner).map(AggregateQueryResult::Aggregates)
        }
        AggregateQuery::ListByOwner { owner } => {
            list_by_owner(conn, ctx, &owner).map(AggregateQueryResult::Summaries)
        }
        AggregateQuery::CountByStatus { owner } => {
            count_by_status(conn, ctx, &owner).map(AggregateQueryResult::Tally)
        }
    }
}
