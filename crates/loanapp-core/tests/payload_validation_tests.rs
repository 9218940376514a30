//! Payloads as a client sends them, through parsing and root validation

use loanapp_core::errors::LoanAppError;
use loanapp_core::model::{ApplicationPayload, FieldState, InvolvementType, OverallStatus};
use loanapp_core::policy::{SectionAction, SectionKind};
use loanapp_core::rules::validation::{validate_new_profile, validate_profile_patch};

const FULL_FORM: &str = r#"{
    "applicant_name": "Ravi Kumar",
    "gender": "Male",
    "file_no": "APP-001",
    "allocation_date": "01/02/2024",
    "visit_date": "03/02/2024",
    "dob": "14/05/1983",
    "age": 41,
    "qualification": "Graduate",
    "prof_qualification": "None",
    "telephone": "9800000000",
    "tel_owner": "Applicant",
    "residential_address": "12 MG Road",
    "family_members": ["Spouse", "Children"],
    "business_details": {
        "business_name": "Kumar Kirana",
        "ownership_type": "Proprietor",
        "rent_amount": 8000,
        "owners": [{"name": "Ravi Kumar"}],
        "persons_met": [{"name": "Suresh", "phone": "9811111111"}]
    },
    "co_applicant": {"involvement_type": "Same Business"},
    "loans": [
        {"loan_type": "Car loan", "bank_name": "SBI", "loan_amount": "500000", "emi": "12000.50"}
    ],
    "bank_accounts": [],
    "security_details": {"house_address": "12 MG Road", "house_area": 900, "amount_required": "300000"},
    "conclusion": {"general_observation": "Busy shop", "overall_status": "Refer to credit"}
}"#;

#[test]
fn test_full_form_parses_and_validates() {
    let payload = ApplicationPayload::from_json(FULL_FORM).unwrap();

    let business = payload.business_details.as_set().unwrap();
    assert_eq!(business.details.rent_amount.as_deref(), Some("8000"));
    assert_eq!(business.owners.items().len(), 1);
    assert_eq!(
        payload.co_applicant.as_set().unwrap().involvement_type,
        InvolvementType::SameBusiness
    );
    assert_eq!(payload.loans.items()[0].emi, "12000.50");
    assert_eq!(payload.bank_accounts.state(), FieldState::Empty);
    assert_eq!(
        payload.conclusion.as_set().unwrap().overall_status,
        Some(OverallStatus::ReferToCredit)
    );

    let profile = validate_new_profile(payload.profile).unwrap();
    assert_eq!(profile.family_members, vec!["Spouse", "Children"]);
    assert_eq!(profile.dob.as_deref(), Some("14/05/1983"));
}

#[test]
fn test_create_without_mandatory_root_field_fails() {
    let payload =
        ApplicationPayload::from_json(r#"{"applicant_name": "Ravi", "loans": []}"#).unwrap();

    let err = validate_new_profile(payload.profile).unwrap_err();
    assert!(matches!(err, LoanAppError::MissingField { .. }));
}

#[test]
fn test_section_only_update_passes_root_validation() {
    // Given: an update that touches only the co-applicant
    let payload = ApplicationPayload::from_json(r#"{"co_applicant": null}"#).unwrap();

    // Then: root validation has nothing to reject
    assert!(payload.profile.is_empty());
    assert!(validate_profile_patch(&payload.profile).is_ok());

    // And: the policy table deletes the co-applicant and keeps the rest
    assert_eq!(
        SectionKind::CoApplicant.on_update(payload.co_applicant.state()),
        SectionAction::Delete
    );
    assert_eq!(
        SectionKind::Loans.on_update(payload.loans.state()),
        SectionAction::Keep
    );
}

#[test]
fn test_empty_conclusion_blanks_instead_of_deleting() {
    let payload = ApplicationPayload::from_json(r#"{"conclusion": {}}"#).unwrap();

    assert_eq!(payload.conclusion.state(), FieldState::Empty);
    assert_eq!(
        SectionKind::Conclusion.on_update(payload.conclusion.state()),
        SectionAction::UpsertBlank
    );
}

#[test]
fn test_unknown_status_is_malformed() {
    let result =
        ApplicationPayload::from_json(r#"{"conclusion": {"overall_status": "Maybe"}}"#);
    assert!(result.is_err());
}
