//! Structural validation run before any write begins
//!
//! Only presence is checked here: a mandatory root field must be supplied and
//! must not be blank. Format and range rules belong to the caller.

use crate::errors::{LoanAppError, Result};
use crate::model::{ApplicantProfile, ProfilePatch};

/// Root text fields that must be present on create and never blanked
pub const MANDATORY_TEXT_FIELDS: [&str; 10] = [
    "applicant_name",
    "gender",
    "file_no",
    "allocation_date",
    "visit_date",
    "qualification",
    "prof_qualification",
    "telephone",
    "tel_owner",
    "residential_address",
];

fn require_text(field: &str, value: Option<String>) -> Result<String> {
    match value {
        None => Err(LoanAppError::MissingField {
            field: field.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(LoanAppError::BlankField {
            field: field.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn reject_blank(field: &str, value: Option<&String>) -> Result<()> {
    match value {
        Some(v) if v.trim().is_empty() => Err(LoanAppError::BlankField {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Turn the root fields of a create payload into a complete profile
///
/// # Errors
/// `MissingField` for the first mandatory field that is absent,
/// `BlankField` for the first one that is whitespace only.
pub fn validate_new_profile(patch: ProfilePatch) -> Result<ApplicantProfile> {
    let applicant_name = require_text("applicant_name", patch.applicant_name)?;
    let gender = require_text("gender", patch.gender)?;
    let file_no = require_text("file_no", patch.file_no)?;
    let allocation_date = require_text("allocation_date", patch.allocation_date)?;
    let visit_date = require_text("visit_date", patch.visit_date)?;
    let age = patch.age.ok_or_else(|| LoanAppError::MissingField {
        field: "age".to_string(),
    })?;

    Ok(ApplicantProfile {
        applicant_name,
        gender,
        file_no,
        allocation_date,
        visit_date,
        dob: patch.dob.into_set(),
        age,
        qualification: require_text("qualification", patch.qualification)?,
        other_qualification: patch.other_qualification.into_set(),
        prof_qualification: require_text("prof_qualification", patch.prof_qualification)?,
        other_prof_qualification: patch.other_prof_qualification.into_set(),
        telephone: require_text("telephone", patch.telephone)?,
        tel_owner: require_text("tel_owner", patch.tel_owner)?,
        other_tel_owner: patch.other_tel_owner.into_set(),
        residential_address: require_text("residential_address", patch.residential_address)?,
        family_members: patch.family_members.unwrap_or_default(),
    })
}

/// Check the root fields of an update payload
///
/// Absent fields are fine (they stay unchanged); a mandatory field that is
/// supplied must not be blank.
///
/// # Errors
/// `BlankField` for the first mandatory field supplied as whitespace only.
pub fn validate_profile_patch(patch: &ProfilePatch) -> Result<()> {
    let supplied = [
        ("applicant_name", patch.applicant_name.as_ref()),
        ("gender", patch.gender.as_ref()),
        ("file_no", patch.file_no.as_ref()),
        ("allocation_date", patch.allocation_date.as_ref()),
        ("visit_date", patch.visit_date.as_ref()),
        ("qualification", patch.qualification.as_ref()),
        ("prof_qualification", patch.prof_qualification.as_ref()),
        ("telephone", patch.telephone.as_ref()),
        ("tel_owner", patch.tel_owner.as_ref()),
        ("residential_address", patch.residential_address.as_ref()),
    ];
    debug_assert_eq!(supplied.len(), MANDATORY_TEXT_FIELDS.len());

    for (field, value) in supplied {
        reject_blank(field, value)?;
    }
    Ok(())
}

/// The owner attribution must name someone
///
/// # Errors
/// `BlankField` on `owner` when the identity is empty.
pub fn validate_owner(owner: &str) -> Result<()> {
    if owner.trim().is_empty() {
        return Err(LoanAppError::BlankField {
            field: "owner".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_patch() -> ProfilePatch {
        ProfilePatch {
            applicant_name: Some("Ravi Kumar".to_string()),
            gender: Some("Male".to_string()),
            file_no: Some("APP-001".to_string()),
            allocation_date: Some("01/02/2024".to_string()),
            visit_date: Some("03/02/2024".to_string()),
            age: Some(41),
            qualification: Some("Graduate".to_string()),
            prof_qualification: Some("Other".to_string()),
            telephone: Some("9800000000".to_string()),
            tel_owner: Some("Applicant".to_string()),
            residential_address: Some("12 MG Road".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_patch_becomes_profile() {
        let profile = validate_new_profile(complete_patch()).unwrap();
        assert_eq!(profile.file_no, "APP-001");
        assert_eq!(profile.age, 41);
        assert!(profile.family_members.is_empty());
        assert!(profile.dob.is_none());
    }

    #[test]
    fn test_missing_file_no_is_rejected() {
        let patch = ProfilePatch {
            file_no: None,
            ..complete_patch()
        };
        assert_eq!(
            validate_new_profile(patch),
            Err(LoanAppError::MissingField {
                field: "file_no".to_string()
            })
        );
    }

    #[test]
    fn test_missing_age_is_rejected() {
        let patch = ProfilePatch {
            age: None,
            ..complete_patch()
        };
        assert!(matches!(
            validate_new_profile(patch),
            Err(LoanAppError::MissingField { field }) if field == "age"
        ));
    }

    #[test]
    fn test_first_missing_field_in_declaration_order_is_reported() {
        let patch = ProfilePatch {
            applicant_name: None,
            age: None,
            ..complete_patch()
        };
        assert_eq!(
            validate_new_profile(patch),
            Err(LoanAppError::MissingField {
                field: "applicant_name".to_string()
            })
        );

        let patch = ProfilePatch {
            age: None,
            qualification: None,
            ..complete_patch()
        };
        assert_eq!(
            validate_new_profile(patch),
            Err(LoanAppError::MissingField {
                field: "age".to_string()
            })
        );
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let patch = ProfilePatch {
            applicant_name: Some("   ".to_string()),
            ..complete_patch()
        };
        assert!(matches!(
            validate_new_profile(patch),
            Err(LoanAppError::BlankField { field }) if field == "applicant_name"
        ));
    }

    #[test]
    fn test_update_patch_allows_absent_but_not_blank() {
        assert!(validate_profile_patch(&ProfilePatch::default()).is_ok());

        let blanked = ProfilePatch {
            telephone: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            validate_profile_patch(&blanked),
            Err(LoanAppError::BlankField { field }) if field == "telephone"
        ));
    }

    #[test]
    fn test_owner_must_not_be_blank() {
        assert!(validate_owner("agent-1").is_ok());
        assert!(validate_owner(" ").is_err());
    }
}
