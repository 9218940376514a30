#![allow(dead_code)]

use loanapp_core::model::{ApplicationAggregate, ApplicationPayload};
use loanapp_core_types::{Caller, RequestContext};
use rusqlite::Connection;
use serde_json::{json, Value};

/// Fresh in-memory database with the schema applied
pub fn setup_test_db() -> Connection {
    let mut conn = loanapp_store::db::open_in_memory().unwrap();
    loanapp_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

pub fn ctx(owner: &str) -> RequestContext {
    RequestContext::new(Caller::new(owner))
}

/// Mandatory root fields for a create payload
pub fn root(file_no: &str) -> Value {
    json!({
        "applicant_name": "Ravi Kumar",
        "gender": "Male",
        "file_no": file_no,
        "allocation_date": "01/02/2024",
        "visit_date": "03/02/2024",
        "age": 41,
        "qualification": "Graduate",
        "prof_qualification": "None",
        "telephone": "9800000000",
        "tel_owner": "Applicant",
        "residential_address": "12 MG Road"
    })
}

/// Root fields merged with the given section keys
pub fn with_sections(file_no: &str, sections: Value) -> Value {
    let mut value = root(file_no);
    if let (Some(target), Some(extra)) = (value.as_object_mut(), sections.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    value
}

pub fn payload(value: Value) -> ApplicationPayload {
    serde_json::from_value(value).unwrap()
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

pub fn loan_types(aggregate: &ApplicationAggregate) -> Vec<String> {
    aggregate.loans.iter().map(|l| l.loan_type.clone()).collect()
}

pub fn owner_names(aggregate: &ApplicationAggregate) -> Vec<String> {
    aggregate
        .business_details
        .as_ref()
        .map(|b| b.owners.iter().map(|o| o.name.clone()).collect())
        .unwrap_or_default()
}
