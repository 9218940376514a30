//! Section reconciliation for one synchronization call
//!
//! Walks the sections in write order and applies whatever the policy table
//! answers for each key's state. Must run inside the caller's transaction.

#![allow(clippy::result_large_err)]

use loanapp_core::errors::{ExError, ExErrorKind};
use loanapp_core::model::{
    ApplicationId, ApplicationPayload, BankAccount, BusinessDetailsPayload, BusinessOwner,
    CoApplicant, Conclusion, Field, Loan, OtherBusiness, PersonMet, SecurityDetails,
};
use loanapp_core::policy::{SectionAction, SectionKind};
use loanapp_store::errors::Result;
use loanapp_store::repo::SectionRow;
use loanapp_store::SqliteRepo;
use rusqlite::Connection;

/// Whether the root was just inserted or already existed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Create,
    Update,
}

impl Phase {
    fn action<T>(self, kind: SectionKind, field: &Field<T>) -> SectionAction {
        match self {
            Phase::Create => kind.on_create(field.state()),
            Phase::Update => kind.on_update(field.state()),
        }
    }
}

fn unexpected(kind: SectionKind, action: SectionAction) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("sync_sections")
        .with_field(kind.payload_key())
        .with_message(format!("{:?} cannot be applied to {:?}", action, kind))
}

/// Reconcile every section of `payload` against application `id`
pub(crate) fn sync_sections(
    conn: &Connection,
    id: ApplicationId,
    payload: &ApplicationPayload,
    phase: Phase,
) -> Result<()> {
    sync_business_details(conn, id, &payload.business_details, phase)?;
    sync_co_applicant(conn, id, &payload.co_applicant, phase)?;
    sync_collection::<OtherBusiness>(
        conn,
        id.get(),
        SectionKind::OtherBusinesses,
        &payload.other_businesses,
        phase,
    )?;
    sync_collection::<Loan>(conn, id.get(), SectionKind::Loans, &payload.loans, phase)?;
    sync_collection::<BankAccount>(
        conn,
        id.get(),
        SectionKind::BankAccounts,
        &payload.bank_accounts,
        phase,
    )?;
    sync_upsert_singleton::<SecurityDetails>(
        conn,
        id,
        SectionKind::SecurityDetails,
        &payload.security_details,
        phase,
    )?;
    sync_upsert_singleton::<Conclusion>(
        conn,
        id,
        SectionKind::Conclusion,
        &payload.conclusion,
        phase,
    )?;
    Ok(())
}

/// Business details plus the two collections nested under its row
///
/// A blanked business section keeps its owners and persons met, since an
/// empty payload carries no `owners` or `persons_met` key.
fn sync_business_details(
    conn: &Connection,
    id: ApplicationId,
    field: &Field<BusinessDetailsPayload>,
    phase: Phase,
) -> Result<()> {
    let kind = SectionKind::BusinessDetails;
    match phase.action(kind, field) {
        SectionAction::Keep => Ok(()),
        SectionAction::Upsert | SectionAction::UpsertBlank => {
            let blank = BusinessDetailsPayload::default();
            let section = field.as_set().unwrap_or(&blank);
            let details_id = SqliteRepo::upsert_singleton(conn, id, &section.details)?;

            sync_collection::<BusinessOwner>(
                conn,
                details_id,
                SectionKind::BusinessOwners,
                &section.owners,
                phase,
            )?;
            sync_collection::<PersonMet>(
                conn,
                details_id,
                SectionKind::PersonsMet,
                &section.persons_met,
                phase,
            )
        }
        other => Err(unexpected(kind, other)),
    }
}

fn sync_co_applicant(
    conn: &Connection,
    id: ApplicationId,
    field: &Field<CoApplicant>,
    phase: Phase,
) -> Result<()> {
    let kind = SectionKind::CoApplicant;
    match phase.action(kind, field) {
        SectionAction::Keep => Ok(()),
        SectionAction::Delete => {
            let removed = SqliteRepo::delete_rows::<CoApplicant>(conn, id.get())?;
            tracing::debug!(application_id = id.get(), removed, "removed co-applicant");
            Ok(())
        }
        SectionAction::Upsert => {
            let co_applicant = field
                .as_set()
                .ok_or_else(|| unexpected(kind, SectionAction::Upsert))?;
            SqliteRepo::upsert_singleton(conn, id, co_applicant).map(|_| ())
        }
        other => Err(unexpected(kind, other)),
    }
}

/// A singleton without a delete path: empty means overwrite with defaults
fn sync_upsert_singleton<T>(
    conn: &Connection,
    id: ApplicationId,
    kind: SectionKind,
    field: &Field<T>,
    phase: Phase,
) -> Result<()>
where
    T: SectionRow + Default,
{
    match phase.action(kind, field) {
        SectionAction::Keep => Ok(()),
        SectionAction::Upsert | SectionAction::UpsertBlank => {
            let blank = T::default();
            let row = field.as_set().unwrap_or(&blank);
            SqliteRepo::upsert_singleton(conn, id, row).map(|_| ())
        }
        other => Err(unexpected(kind, other)),
    }
}

fn sync_collection<T: SectionRow>(
    conn: &Connection,
    parent_id: i64,
    kind: SectionKind,
    field: &Field<Vec<T>>,
    phase: Phase,
) -> Result<()> {
    match phase.action(kind, field) {
        SectionAction::Keep => Ok(()),
        SectionAction::Replace => SqliteRepo::replace_rows(conn, parent_id, field.items()),
        other => Err(unexpected(kind, other)),
    }
}
