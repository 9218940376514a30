//! Query Service - listings and counts over application roots
//!
//! Both queries read the outcome through a LEFT JOIN on `conclusions`, so an
//! application without a conclusion (or with a blanked one) is pending.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::sqlite_repo::timestamp;
use loanapp_core::model::{ApplicationId, ApplicationSummary, OverallStatus, StatusTally};
use rusqlite::types::Type;
use rusqlite::Connection;

/// Summaries of one owner's applications, newest first
pub fn list_by_owner(conn: &Connection, owner: &str) -> Result<Vec<ApplicationSummary>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT a.id, a.applicant_name, a.file_no, a.telephone, a.allocation_date,
                    a.visit_date, a.owner, c.overall_status, a.created_at, a.updated_at
             FROM applications a
             LEFT JOIN conclusions c ON c.application_id = a.id
             WHERE a.owner = ?1
             ORDER BY a.created_at DESC, a.id DESC",
        )
        .map_err(from_rusqlite)?;

    let summaries = stmt
        .query_map([owner], |row| {
            let status: Option<String> = row.get(7)?;
            let overall_status = status
                .map(|s| s.parse::<OverallStatus>())
                .transpose()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, e.into()))?;

            Ok(ApplicationSummary {
                id: ApplicationId(row.get(0)?),
                applicant_name: row.get(1)?,
                file_no: row.get(2)?,
                telephone: row.get(3)?,
                allocation_date: row.get(4)?,
                visit_date: row.get(5)?,
                owner: row.get(6)?,
                overall_status,
                created_at: timestamp(row.get(8)?),
                updated_at: timestamp(row.get(9)?),
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(summaries)
}

/// Count one owner's applications per outcome
pub fn count_by_status(conn: &Connection, owner: &str) -> Result<StatusTally> {
    let (total, positive, negative, refer): (i64, i64, i64, i64) = conn
        .prepare_cached(
            "SELECT COUNT(*),
                    COALESCE(SUM(c.overall_status = 'Positive'), 0),
                    COALESCE(SUM(c.overall_status = 'Negative'), 0),
                    COALESCE(SUM(c.overall_status = 'Refer to credit'), 0)
             FROM applications a
             LEFT JOIN conclusions c ON c.application_id = a.id
             WHERE a.owner = ?1",
        )
        .map_err(from_rusqlite)?
        .query_row([owner], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .map_err(from_rusqlite)?;

    let count = |n: i64| u64::try_from(n).unwrap_or_default();
    Ok(StatusTally::from_counts(
        count(total),
        count(positive),
        count(negative),
        count(refer),
    ))
}
