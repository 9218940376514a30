// Integration tests for delete, submit and the command/query dispatch

mod common;

use common::*;
use loanapp_core::errors::ExErrorKind;
use loanapp_core::model::{OverallStatus, StatusTally};
use loanapp_engine::{
    apply_aggregate_command, apply_aggregate_query, create_aggregate, delete_aggregate,
    read_aggregate, read_for_owner, submit_aggregate, update_aggregate, AggregateCommand,
    AggregateCommandResult, AggregateQuery, AggregateQueryResult,
};
use serde_json::json;

#[test]
fn test_delete_cascades_two_levels_down() {
    // Given: An aggregate with business details, its owners and persons met, and loans
    let mut conn = setup_test_db();
    let ctx = ctx("agent-1");
    let id = create_aggregate(
        &mut conn,
        &ctx,
        payload(with_sections(
            "APP-400",
            json!({
                "business_details": {
                    "owners": [{"name": "A"}, {"name": "B"}],
                    "persons_met": [{"name": "P", "phone": "1"}]
                },
                "loans": [{"loan_type": "Car loan"}],
                "conclusion": {"overall_status": "Positive"}
            }),
        )),
    )
    .unwrap()
    .id();

    // When: The root is deleted
    assert_eq!(delete_aggregate(&mut conn, &ctx, id).unwrap(), id);

    // Then: No row referencing it survives at any depth
    for table in [
        "applications",
        "business_details",
        "business_owners",
        "persons_met",
        "loans",
        "conclusions",
    ] {
        assert_eq!(count(&conn, table), 0, "{} should be empty", table);
    }

    // And: It can no longer be read or deleted
    let err = read_aggregate(&mut conn, &ctx, id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    let err = delete_aggregate(&mut conn, &ctx, id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_submit_requires_conclusion() {
    let mut conn = setup_test_db();
    let ctx = ctx("agent-1");
    let id = create_aggregate(&mut conn, &ctx, payload(root("APP-401")))
        .unwrap()
        .id();

    let err = submit_aggregate(&mut conn, &ctx, id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConclusionRequired);
    assert_eq!(err.code(), "ERR_CONCLUSION_REQUIRED");
}

#[test]
fn test_submit_returns_receipt_with_outcome() {
    let mut conn = setup_test_db();
    let ctx = ctx("agent-1");
    let id = create_aggregate(
        &mut conn,
        &ctx,
        payload(with_sections(
            "APP-402",
            json!({"conclusion": {"overall_status": "Negative"}}),
        )),
    )
    .unwrap()
    .id();

    let receipt = submit_aggregate(&mut conn, &ctx, id).unwrap();

    assert_eq!(receipt.application_id, id);
    assert_eq!(receipt.file_no, "APP-402");
    assert_eq!(receipt.overall_status, Some(OverallStatus::Negative));
}

#[test]
fn test_other_callers_cannot_touch_an_application() {
    // Given: An application created by agent-1
    let mut conn = setup_test_db();
    let owner = ctx("agent-1");
    let intruder = ctx("agent-2");
    let id = create_aggregate(
        &mut conn,
        &owner,
        payload(with_sections(
            "APP-406",
            json!({"conclusion": {"overall_status": "Positive"}}),
        )),
    )
    .unwrap()
    .id();

    // When: agent-2 addresses it by id
    // Then: Every operation reports it as not found
    let read = read_aggregate(&mut conn, &intruder, id).unwrap_err();
    assert_eq!(read.kind(), ExErrorKind::NotFound);

    let update = update_aggregate(
        &mut conn,
        &intruder,
        id,
        payload(json!({"applicant_name": "Someone Else", "loans": []})),
    )
    .unwrap_err();
    assert_eq!(update.kind(), ExErrorKind::NotFound);

    let submit = submit_aggregate(&mut conn, &intruder, id).unwrap_err();
    assert_eq!(submit.kind(), ExErrorKind::NotFound);

    let delete = delete_aggregate(&mut conn, &intruder, id).unwrap_err();
    assert_eq!(delete.kind(), ExErrorKind::NotFound);

    // And: The owner still sees it unchanged
    let kept = read_aggregate(&mut conn, &owner, id).unwrap();
    assert_eq!(kept.application.profile.applicant_name, "Ravi Kumar");
    assert_eq!(kept.overall_status(), Some(OverallStatus::Positive));
    assert_eq!(count(&conn, "applications"), 1);
}

#[test]
fn test_read_for_owner_only_returns_own_aggregates() {
    let mut conn = setup_test_db();
    let mine = ctx("agent-1");
    let theirs = ctx("agent-2");
    let first = create_aggregate(&mut conn, &mine, payload(root("APP-403"))).unwrap();
    let second = create_aggregate(&mut conn, &mine, payload(root("APP-404"))).unwrap();
    create_aggregate(&mut conn, &theirs, payload(root("APP-405"))).unwrap();

    let aggregates = read_for_owner(&mut conn, &mine, "agent-1").unwrap();

    let ids: Vec<_> = aggregates.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec![second.id(), first.id()]);
}

#[test]
fn test_command_dispatch_create_update_submit_delete() {
    let mut conn = setup_test_db();
    let ctx = ctx("agent-9");

    let created = match apply_aggregate_command(
        AggregateCommand::Create {
            payload: payload(root("APP-500")),
        },
        &mut conn,
        &ctx,
    )
    .unwrap()
    {
        AggregateCommandResult::Created(aggregate) => aggregate,
        other => panic!("Expected Created, got {:?}", other),
    };

    let updated = apply_aggregate_command(
        AggregateCommand::Update {
            application_id: created.id(),
            payload: payload(json!({"conclusion": {"overall_status": "Positive"}})),
        },
        &mut conn,
        &ctx,
    )
    .unwrap();
    assert!(matches!(
        updated,
        AggregateCommandResult::Updated(ref a) if a.overall_status() == Some(OverallStatus::Positive)
    ));

    let submitted = apply_aggregate_command(
        AggregateCommand::Submit {
            application_id: created.id(),
        },
        &mut conn,
        &ctx,
    )
    .unwrap();
    assert!(matches!(submitted, AggregateCommandResult::Submitted(_)));

    let deleted = apply_aggregate_command(
        AggregateCommand::Delete {
            application_id: created.id(),
        },
        &mut conn,
        &ctx,
    )
    .unwrap();
    assert!(matches!(deleted, AggregateCommandResult::Deleted(id) if id == created.id()));
}

#[test]
fn test_query_dispatch_lists_and_counts() {
    let mut conn = setup_test_db();
    let ctx = ctx("agent-1");
    create_aggregate(
        &mut conn,
        &ctx,
        payload(with_sections("APP-600", json!({"conclusion": {"overall_status": "Positive"}}))),
    )
    .unwrap();
    create_aggregate(&mut conn, &ctx, payload(root("APP-601"))).unwrap();

    let summaries = match apply_aggregate_query(
        AggregateQuery::ListByOwner {
            owner: "agent-1".to_string(),
        },
        &mut conn,
        &ctx,
    )
    .unwrap()
    {
        AggregateQueryResult::Summaries(rows) => rows,
        other => panic!("Expected Summaries, got {:?}", other),
    };
    assert_eq!(summaries.len(), 2);

    let tally = apply_aggregate_query(
        AggregateQuery::CountByStatus {
            owner: "agent-1".to_string(),
        },
        &mut conn,
        &ctx,
    )
    .unwrap();
    match tally {
        AggregateQueryResult::Tally(t) => assert_eq!(
            t,
            StatusTally {
                total: 2,
                positive: 1,
                negative: 0,
                refer_to_credit: 0,
                pending: 1,
            }
        ),
        other => panic!("Expected Tally, got {:?}", other),
    }
}
