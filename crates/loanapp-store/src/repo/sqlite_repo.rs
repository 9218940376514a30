//! SQLite repository implementation
//!
//! Row-level writes for the application root and its sections. Every
//! function takes a plain `&Connection`; callers pass a `Transaction`
//! (which derefs to one) when the writes must land atomically.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::rows::{parse_json_list, SectionRow};
use chrono::{DateTime, Utc};
use loanapp_core::errors::{ExError, ExErrorKind, LoanAppError};
use loanapp_core::model::{ApplicantProfile, Application, ApplicationId};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

const APPLICATION_COLUMNS: &str = "id, owner, applicant_name, gender, file_no, allocation_date, \
     visit_date, dob, age, qualification, other_qualification, prof_qualification, \
     other_prof_qualification, telephone, tel_owner, other_tel_owner, residential_address, \
     family_members, created_at, updated_at";

/// SQLite repository for applications and their sections
pub struct SqliteRepo;

impl SqliteRepo {
    // ---------- Root ----------

    /// Insert a new application root and return its generated id
    ///
    /// A `file_no` already in use yields `ERR_ALREADY_EXISTS`.
    pub fn insert_application(
        conn: &Connection,
        owner: &str,
        profile: &ApplicantProfile,
        now: DateTime<Utc>,
    ) -> Result<ApplicationId> {
        let family_members = serde_json::to_string(&profile.family_members)
            .map_err(|e| crate::errors::json_error("family_members", e))?;

        conn.execute(
            "INSERT INTO applications (owner, applicant_name, gender, file_no, allocation_date,
                visit_date, dob, age, qualification, other_qualification, prof_qualification,
                other_prof_qualification, telephone, tel_owner, other_tel_owner,
                residential_address, family_members, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?18)",
            rusqlite::params![
                owner,
                profile.applicant_name,
                profile.gender,
                profile.file_no,
                profile.allocation_date,
                profile.visit_date,
                profile.dob,
                profile.age,
                profile.qualification,
                profile.other_qualification,
                profile.prof_qualification,
                profile.other_prof_qualification,
                profile.telephone,
                profile.tel_owner,
                profile.other_tel_owner,
                profile.residential_address,
                family_members,
                now.timestamp_millis(),
            ],
        )
        .map_err(|e| file_no_conflict(e, &profile.file_no))?;

        let id = ApplicationId(conn.last_insert_rowid());
        tracing::debug!(application_id = id.get(), "inserted application");
        Ok(id)
    }

    /// Overwrite every profile column of an existing root and refresh `updated_at`
    pub fn update_application(
        conn: &Connection,
        id: ApplicationId,
        profile: &ApplicantProfile,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let family_members = serde_json::to_string(&profile.family_members)
            .map_err(|e| crate::errors::json_error("family_members", e))?;

        let changed = conn
            .execute(
                "UPDATE applications SET
                    applicant_name = ?2, gender = ?3, file_no = ?4, allocation_date = ?5,
                    visit_date = ?6, dob = ?7, age = ?8, qualification = ?9,
                    other_qualification = ?10, prof_qualification = ?11,
                    other_prof_qualification = ?12, telephone = ?13, tel_owner = ?14,
                    other_tel_owner = ?15, residential_address = ?16, family_members = ?17,
                    updated_at = ?18
                 WHERE id = ?1",
                rusqlite::params![
                    id.get(),
                    profile.applicant_name,
                    profile.gender,
                    profile.file_no,
                    profile.allocation_date,
                    profile.visit_date,
                    profile.dob,
                    profile.age,
                    profile.qualification,
                    profile.other_qualification,
                    profile.prof_qualification,
                    profile.other_prof_qualification,
                    profile.telephone,
                    profile.tel_owner,
                    profile.other_tel_owner,
                    profile.residential_address,
                    family_members,
                    now.timestamp_millis(),
                ],
            )
            .map_err(|e| file_no_conflict(e, &profile.file_no))?;

        if changed == 0 {
            return Err(LoanAppError::ApplicationNotFound {
                application_id: id.get(),
            }
            .into());
        }
        Ok(())
    }

    /// Load one root row
    pub fn get_application(conn: &Connection, id: ApplicationId) -> Result<Option<Application>> {
        let sql = format!("SELECT {} FROM applications WHERE id = ?1", APPLICATION_COLUMNS);
        conn.prepare_cached(&sql)
            .map_err(from_rusqlite)?
            .query_row([id.get()], application_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// Root rows of one owner, newest first
    pub fn list_applications_for_owner(conn: &Connection, owner: &str) -> Result<Vec<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE owner = ?1 ORDER BY created_at DESC, id DESC",
            APPLICATION_COLUMNS
        );
        let mut stmt = conn.prepare_cached(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([owner], application_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    /// Load one root row, but only when `owner` created it
    pub fn get_owned_application(
        conn: &Connection,
        id: ApplicationId,
        owner: &str,
    ) -> Result<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE id = ?1 AND owner = ?2",
            APPLICATION_COLUMNS
        );
        conn.prepare_cached(&sql)
            .map_err(from_rusqlite)?
            .query_row(rusqlite::params![id.get(), owner], application_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// Delete a root owned by `owner`; foreign keys cascade to every section
    ///
    /// Returns false when no such application exists for that owner.
    pub fn delete_application(conn: &Connection, id: ApplicationId, owner: &str) -> Result<bool> {
        let deleted = conn
            .execute(
                "DELETE FROM applications WHERE id = ?1 AND owner = ?2",
                rusqlite::params![id.get(), owner],
            )
            .map_err(from_rusqlite)?;
        tracing::debug!(application_id = id.get(), deleted, "deleted application");
        Ok(deleted > 0)
    }

    // ---------- Sections ----------

    /// Insert one section row under `parent_id` and return its id
    pub fn insert_row<T: SectionRow>(conn: &Connection, parent_id: i64, row: &T) -> Result<i64> {
        let values = row.values()?;
        let placeholders = (2..=T::COLUMNS.len() + 1)
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, {})",
            T::TABLE,
            T::PARENT_COLUMN,
            T::COLUMNS.join(", "),
            placeholders
        );

        let mut stmt = conn.prepare_cached(&sql).map_err(from_rusqlite)?;
        let parent: Box<dyn rusqlite::ToSql> = Box::new(parent_id);
        stmt.execute(params_from_iter(std::iter::once(&parent).chain(values.iter())))
            .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Create or overwrite the singleton row of an application
    ///
    /// The row keeps its id when it already existed, so rows nested under
    /// it survive. Returns the row id.
    pub fn upsert_singleton<T: SectionRow>(
        conn: &Connection,
        application_id: ApplicationId,
        row: &T,
    ) -> Result<i64> {
        let values = row.values()?;
        let placeholders = (2..=T::COLUMNS.len() + 1)
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = T::COLUMNS
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} ({parent}, {columns}) VALUES (?1, {placeholders})
             ON CONFLICT({parent}) DO UPDATE SET {assignments}",
            table = T::TABLE,
            parent = T::PARENT_COLUMN,
            columns = T::COLUMNS.join(", "),
            placeholders = placeholders,
            assignments = assignments,
        );

        let parent: Box<dyn rusqlite::ToSql> = Box::new(application_id.get());
        conn.prepare_cached(&sql)
            .map_err(from_rusqlite)?
            .execute(params_from_iter(std::iter::once(&parent).chain(values.iter())))
            .map_err(from_rusqlite)?;

        let select = format!(
            "SELECT id FROM {} WHERE {} = ?1",
            T::TABLE,
            T::PARENT_COLUMN
        );
        let id = conn
            .query_row(&select, [application_id.get()], |r| r.get(0))
            .map_err(from_rusqlite)?;
        tracing::debug!(table = T::TABLE, application_id = application_id.get(), "upserted section");
        Ok(id)
    }

    /// Delete every row of one section under `parent_id`; returns the count
    pub fn delete_rows<T: SectionRow>(conn: &Connection, parent_id: i64) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", T::TABLE, T::PARENT_COLUMN);
        conn.prepare_cached(&sql)
            .map_err(from_rusqlite)?
            .execute([parent_id])
            .map_err(from_rusqlite)
    }

    /// Delete every row under `parent_id`, then insert `rows` in order
    pub fn replace_rows<T: SectionRow>(conn: &Connection, parent_id: i64, rows: &[T]) -> Result<()> {
        let removed = Self::delete_rows::<T>(conn, parent_id)?;
        for row in rows {
            Self::insert_row(conn, parent_id, row)?;
        }
        tracing::debug!(
            table = T::TABLE,
            parent_id,
            removed,
            inserted = rows.len(),
            "replaced section rows"
        );
        Ok(())
    }

    /// Rows of one section under `parent_id` in insertion order
    pub fn load_rows<T: SectionRow>(conn: &Connection, parent_id: i64) -> Result<Vec<T>> {
        let sql = format!(
            "SELECT id, {} FROM {} WHERE {} = ?1 ORDER BY id",
            T::COLUMNS.join(", "),
            T::TABLE,
            T::PARENT_COLUMN
        );
        let mut stmt = conn.prepare_cached(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([parent_id], |row| T::from_row(row))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    /// The singleton row of an application, if one was ever written
    pub fn load_singleton<T: SectionRow>(
        conn: &Connection,
        application_id: ApplicationId,
    ) -> Result<Option<T>> {
        let mut rows = Self::load_rows::<T>(conn, application_id.get())?;
        if rows.len() > 1 {
            return Err(ExError::new(ExErrorKind::Internal)
                .with_op("load_singleton")
                .with_entity_id(application_id.to_string())
                .with_message(format!("{} holds {} rows", T::TABLE, rows.len())));
        }
        Ok(rows.pop())
    }
}

fn file_no_conflict(err: rusqlite::Error, file_no: &str) -> ExError {
    let ex_err = from_rusqlite(err);
    if ex_err.kind() == ExErrorKind::AlreadyExists && ex_err.message().contains("file_no") {
        return LoanAppError::DuplicateFileNo {
            file_no: file_no.to_string(),
        }
        .into();
    }
    ex_err
}

/// Stored epoch milliseconds back to a UTC timestamp
pub(crate) fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(
        millis.div_euclid(1000),
        (millis.rem_euclid(1000) * 1_000_000) as u32,
    )
    .unwrap_or_default()
}

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: ApplicationId(row.get("id")?),
        owner: row.get("owner")?,
        profile: ApplicantProfile {
            applicant_name: row.get("applicant_name")?,
            gender: row.get("gender")?,
            file_no: row.get("file_no")?,
            allocation_date: row.get("allocation_date")?,
            visit_date: row.get("visit_date")?,
            dob: row.get("dob")?,
            age: row.get("age")?,
            qualification: row.get("qualification")?,
            other_qualification: row.get("other_qualification")?,
            prof_qualification: row.get("prof_qualification")?,
            other_prof_qualification: row.get("other_prof_qualification")?,
            telephone: row.get("telephone")?,
            tel_owner: row.get("tel_owner")?,
            other_tel_owner: row.get("other_tel_owner")?,
            residential_address: row.get("residential_address")?,
            family_members: parse_json_list(row, "family_members")?,
        },
        created_at: timestamp(row.get("created_at")?),
        updated_at: timestamp(row.get("updated_at")?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use loanapp_core::model::{BusinessDetails, BusinessOwner, Loan};

    fn setup_test_db() -> Connection {
        let mut conn = crate::db::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    fn profile(file_no: &str) -> ApplicantProfile {
        ApplicantProfile {
            applicant_name: "Ravi Kumar".to_string(),
            gender: "Male".to_string(),
            file_no: file_no.to_string(),
            allocation_date: "01/02/2024".to_string(),
            visit_date: "03/02/2024".to_string(),
            dob: None,
            age: 41,
            qualification: "Graduate".to_string(),
            other_qualification: None,
            prof_qualification: "None".to_string(),
            other_prof_qualification: None,
            telephone: "9800000000".to_string(),
            tel_owner: "Applicant".to_string(),
            other_tel_owner: None,
            residential_address: "12 MG Road".to_string(),
            family_members: vec!["Spouse".to_string()],
        }
    }

    #[test]
    fn test_insert_and_get_application() {
        let conn = setup_test_db();
        let now = timestamp(Utc::now().timestamp_millis());

        let id = SqliteRepo::insert_application(&conn, "agent-1", &profile("F-1"), now).unwrap();
        let app = SqliteRepo::get_application(&conn, id).unwrap().unwrap();

        assert_eq!(app.owner, "agent-1");
        assert_eq!(app.profile, profile("F-1"));
        assert_eq!(app.created_at, now);
        assert_eq!(app.updated_at, now);
    }

    #[test]
    fn test_owned_lookup_and_delete_filter_by_owner() {
        let conn = setup_test_db();
        let id = SqliteRepo::insert_application(&conn, "agent-1", &profile("F-9"), Utc::now())
            .unwrap();

        assert!(SqliteRepo::get_owned_application(&conn, id, "agent-2")
            .unwrap()
            .is_none());
        assert!(!SqliteRepo::delete_application(&conn, id, "agent-2").unwrap());

        let app = SqliteRepo::get_owned_application(&conn, id, "agent-1")
            .unwrap()
            .unwrap();
        assert_eq!(app.id, id);
        assert!(SqliteRepo::delete_application(&conn, id, "agent-1").unwrap());
    }

    #[test]
    fn test_duplicate_file_no_is_conflict() {
        let conn = setup_test_db();
        let now = Utc::now();
        SqliteRepo::insert_application(&conn, "a", &profile("F-1"), now).unwrap();

        let err = SqliteRepo::insert_application(&conn, "b", &profile("F-1"), now).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
        assert_eq!(err.field(), Some("file_no"));
    }

    #[test]
    fn test_upsert_singleton_keeps_row_id() {
        let conn = setup_test_db();
        let app = SqliteRepo::insert_application(&conn, "a", &profile("F-1"), Utc::now()).unwrap();

        let first = BusinessDetails {
            business_name: "First".to_string(),
            ..Default::default()
        };
        let id1 = SqliteRepo::upsert_singleton(&conn, app, &first).unwrap();
        SqliteRepo::insert_row(&conn, id1, &BusinessOwner::named("A")).unwrap();

        let second = BusinessDetails {
            business_name: "Second".to_string(),
            ..Default::default()
        };
        let id2 = SqliteRepo::upsert_singleton(&conn, app, &second).unwrap();

        assert_eq!(id1, id2);
        let stored: BusinessDetails = SqliteRepo::load_singleton(&conn, app).unwrap().unwrap();
        assert_eq!(stored.business_name, "Second");
        let owners: Vec<BusinessOwner> = SqliteRepo::load_rows(&conn, id1).unwrap();
        assert_eq!(owners.len(), 1);
    }

    #[test]
    fn test_replace_rows_preserves_payload_order() {
        let conn = setup_test_db();
        let app = SqliteRepo::insert_application(&conn, "a", &profile("F-1"), Utc::now()).unwrap();
        let loan = |t: &str| Loan {
            loan_type: t.to_string(),
            ..Default::default()
        };

        SqliteRepo::replace_rows(&conn, app.get(), &[loan("x"), loan("y")]).unwrap();
        SqliteRepo::replace_rows(&conn, app.get(), &[loan("c"), loan("a"), loan("b")]).unwrap();

        let stored: Vec<Loan> = SqliteRepo::load_rows(&conn, app.get()).unwrap();
        let types: Vec<_> = stored.iter().map(|l| l.loan_type.as_str()).collect();
        assert_eq!(types, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_update_missing_application_is_not_found() {
        let conn = setup_test_db();
        let err = SqliteRepo::update_application(&conn, ApplicationId(404), &profile("F"), Utc::now())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }
}
