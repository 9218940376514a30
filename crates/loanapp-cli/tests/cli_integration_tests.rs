//! End-to-end tests running the `loanapp` binary against a temporary database

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &Path, db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_loanapp"))
        .current_dir(dir)
        .env_remove("LOANAPP_DB")
        .env_remove("LOANAPP_BUSY_TIMEOUT_MS")
        .env("LOANAPP_LOG_PROFILE", "production")
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn write_payload(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, value.to_string()).unwrap();
    path
}

fn create_payload(file_no: &str) -> Value {
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
        "residential_address": "12 MG Road",
        "loans": [{"loan_type": "Car loan"}]
    })
}

#[test]
fn test_cli_migrate_creates_database_in_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("nested").join("store.db");

    let out = stdout_json(&run(temp_dir.path(), &db, &["migrate"]));

    assert!(db.exists());
    assert_eq!(out["latest"], "002_query_indexes");
    assert_eq!(out["applied"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_full_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let db = dir.join("store.db");

    // Create
    let create = write_payload(dir, "create.json", &create_payload("APP-001"));
    let created = stdout_json(&run(
        dir,
        &db,
        &["create", "--owner", "agent-1", "--file", create.to_str().unwrap()],
    ));
    let id = created["id"].as_i64().unwrap().to_string();
    assert_eq!(created["owner"], "agent-1");
    assert_eq!(created["loans"].as_array().unwrap().len(), 1);

    // Submit before a conclusion exists fails with its code
    let rejected = run(dir, &db, &["submit", &id, "--owner", "agent-1"]);
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("ERR_CONCLUSION_REQUIRED"));

    // Another agent cannot see it
    let foreign = run(dir, &db, &["show", &id, "--owner", "agent-2"]);
    assert!(!foreign.status.success());
    assert!(String::from_utf8_lossy(&foreign.stderr).contains("ERR_NOT_FOUND"));

    // Update: clear loans, add a conclusion
    let update = write_payload(
        dir,
        "update.json",
        &json!({"loans": [], "conclusion": {"overall_status": "Positive"}}),
    );
    let updated = stdout_json(&run(
        dir,
        &db,
        &["update", &id, "--owner", "agent-1", "--file", update.to_str().unwrap()],
    ));
    assert!(updated["loans"].as_array().unwrap().is_empty());
    assert_eq!(updated["conclusion"]["overall_status"], "Positive");

    // Show, list, stats, submit
    let shown = stdout_json(&run(dir, &db, &["show", &id, "--owner", "agent-1"]));
    assert_eq!(shown, updated);

    let listed = stdout_json(&run(dir, &db, &["list", "--owner", "agent-1"]));
    assert_eq!(listed[0]["file_no"], "APP-001");

    let stats = stdout_json(&run(dir, &db, &["stats", "--owner", "agent-1"]));
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["positive"], 1);

    let receipt = stdout_json(&run(dir, &db, &["submit", &id, "--owner", "agent-1"]));
    assert_eq!(receipt["file_no"], "APP-001");

    // Delete, then it is gone
    let deleted = stdout_json(&run(dir, &db, &["delete", &id, "--owner", "agent-1"]));
    assert_eq!(deleted["deleted"].to_string(), id);
    let missing = run(dir, &db, &["show", &id, "--owner", "agent-1"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("ERR_NOT_FOUND"));
}

#[test]
fn test_cli_duplicate_file_no_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let db = dir.join("store.db");
    let create = write_payload(dir, "create.json", &create_payload("APP-009"));
    let args = ["create", "--owner", "agent-1", "--file", create.to_str().unwrap()];

    stdout_json(&run(dir, &db, &args));
    let second = run(dir, &db, &args);

    assert_eq!(second.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&second.stderr).contains("ERR_ALREADY_EXISTS"));
}

#[test]
fn test_cli_rejects_invalid_busy_timeout() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");

    let output = Command::new(env!("CARGO_BIN_EXE_loanapp"))
        .current_dir(temp_dir.path())
        .env("LOANAPP_BUSY_TIMEOUT_MS", "soon")
        .arg("--db")
        .arg(&db)
        .arg("migrate")
        .output()
        .expect("Failed to execute CLI");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_INPUT"));
}
