use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::Field;

/// Generated identity of an Application root row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub i64);

impl ApplicationId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client particulars captured on the first step of the form
///
/// Dates are display strings exactly as entered (`DD/MM/YYYY` on the
/// client); they are never parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub applicant_name: String,
    pub gender: String,
    pub file_no: String,
    pub allocation_date: String,
    pub visit_date: String,
    pub dob: Option<String>,
    pub age: u32,
    pub qualification: String,
    pub other_qualification: Option<String>,
    pub prof_qualification: String,
    pub other_prof_qualification: Option<String>,
    pub telephone: String,
    pub tel_owner: String,
    pub other_tel_owner: Option<String>,
    pub residential_address: String,
    /// Household members selected on the form (`Spouse`, `Children`, ...)
    pub family_members: Vec<String>,
}

/// Root fields as they arrive in a payload
///
/// Every field is optional: on create the mandatory ones are enforced by
/// `rules::validation`, on update a `None` leaves the stored value alone.
/// The nullable fields are tri-state instead, so that an explicit `null`
/// clears them while a missing key still leaves them alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfilePatch {
    pub applicant_name: Option<String>,
    pub gender: Option<String>,
    pub file_no: Option<String>,
    pub allocation_date: Option<String>,
    pub visit_date: Option<String>,
    #[serde(default)]
    pub dob: Field<String>,
    pub age: Option<u32>,
    pub qualification: Option<String>,
    #[serde(default)]
    pub other_qualification: Field<String>,
    pub prof_qualification: Option<String>,
    #[serde(default)]
    pub other_prof_qualification: Field<String>,
    pub telephone: Option<String>,
    pub tel_owner: Option<String>,
    #[serde(default)]
    pub other_tel_owner: Field<String>,
    pub residential_address: Option<String>,
    pub family_members: Option<Vec<String>>,
}

impl ProfilePatch {
    /// Overwrite every field of `profile` that this patch supplies
    pub fn apply_to(self, profile: &mut ApplicantProfile) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        fn set_nullable<T>(slot: &mut Option<T>, value: Field<T>) {
            match value {
                Field::Absent => {}
                Field::Empty => *slot = None,
                Field::Set(v) => *slot = Some(v),
            }
        }

        set(&mut profile.applicant_name, self.applicant_name);
        set(&mut profile.gender, self.gender);
        set(&mut profile.file_no, self.file_no);
        set(&mut profile.allocation_date, self.allocation_date);
        set(&mut profile.visit_date, self.visit_date);
        set_nullable(&mut profile.dob, self.dob);
        set(&mut profile.age, self.age);
        set(&mut profile.qualification, self.qualification);
        set_nullable(&mut profile.other_qualification, self.other_qualification);
        set(&mut profile.prof_qualification, self.prof_qualification);
        set_nullable(
            &mut profile.other_prof_qualification,
            self.other_prof_qualification,
        );
        set(&mut profile.telephone, self.telephone);
        set(&mut profile.tel_owner, self.tel_owner);
        set_nullable(&mut profile.other_tel_owner, self.other_tel_owner);
        set(&mut profile.residential_address, self.residential_address);
        set(&mut profile.family_members, self.family_members);
    }

    pub fn is_empty(&self) -> bool {
        self == &ProfilePatch::default()
    }
}

/// Root record of the aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    pub id: ApplicationId,
    /// Caller identity that created the application
    pub owner: String,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
