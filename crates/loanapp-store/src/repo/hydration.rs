//! Hydration layer - assembles full aggregates from SQLite rows
//!
//! Singleton sections come back as `None` when no row exists and
//! collections in insertion order. Nothing here writes.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::repo::SqliteRepo;
use loanapp_core::model::{
    Application, ApplicationAggregate, ApplicationId, BankAccount, BusinessDetails, BusinessOwner,
    BusinessSection, CoApplicant, Conclusion, Loan, OtherBusiness, PersonMet, SecurityDetails,
};
use rusqlite::Connection;

/// Load one aggregate; `None` when the application does not exist
///
/// Run it inside a transaction to read every section from one snapshot.
pub fn load_aggregate(conn: &Connection, id: ApplicationId) -> Result<Option<ApplicationAggregate>> {
    match SqliteRepo::get_application(conn, id)? {
        Some(application) => assemble(conn, application).map(Some),
        None => Ok(None),
    }
}

/// Load one aggregate created by `owner`
///
/// An application that exists but belongs to someone else reads as `None`.
pub fn load_owned_aggregate(
    conn: &Connection,
    id: ApplicationId,
    owner: &str,
) -> Result<Option<ApplicationAggregate>> {
    match SqliteRepo::get_owned_application(conn, id, owner)? {
        Some(application) => assemble(conn, application).map(Some),
        None => Ok(None),
    }
}

/// Load every aggregate of one owner, newest first
pub fn load_aggregates_for_owner(conn: &Connection, owner: &str) -> Result<Vec<ApplicationAggregate>> {
    SqliteRepo::list_applications_for_owner(conn, owner)?
        .into_iter()
        .map(|application| assemble(conn, application))
        .collect()
}

fn load_business_section(conn: &Connection, id: ApplicationId) -> Result<Option<BusinessSection>> {
    let Some(details) = SqliteRepo::load_singleton::<BusinessDetails>(conn, id)? else {
        return Ok(None);
    };
    let details_id = details.id.unwrap_or_default();

    Ok(Some(BusinessSection {
        owners: SqliteRepo::load_rows::<BusinessOwner>(conn, details_id)?,
        persons_met: SqliteRepo::load_rows::<PersonMet>(conn, details_id)?,
        details,
    }))
}

fn assemble(conn: &Connection, application: Application) -> Result<ApplicationAggregate> {
    let id = application.id;
    Ok(ApplicationAggregate {
        business_details: load_business_section(conn, id)?,
        co_applicant: SqliteRepo::load_singleton::<CoApplicant>(conn, id)?,
        other_businesses: SqliteRepo::load_rows::<OtherBusiness>(conn, id.get())?,
        loans: SqliteRepo::load_rows::<Loan>(conn, id.get())?,
        bank_accounts: SqliteRepo::load_rows::<BankAccount>(conn, id.get())?,
        security_details: SqliteRepo::load_singleton::<SecurityDetails>(conn, id)?,
        conclusion: SqliteRepo::load_singleton::<Conclusion>(conn, id)?,
        application,
    })
}
