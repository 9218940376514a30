//! Section records of an application
//!
//! Each record carries the generated row `id` on the way out. It is never
//! read from a payload: sections are matched to their application, not to a
//! client-supplied row id.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::decimal::{opt_string_or_number, string_or_number};
use super::field::Field;

// ---------- Business details (singleton) ----------

/// Business and financial details of the applicant's main business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessDetails {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub business_name: String,
    pub ownership_type: String,
    pub business_address: String,
    pub visit_address: String,
    pub gst_number: String,
    pub business_location: String,
    pub gps_location: Option<String>,
    pub shop_ownership: String,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub rent_amount: Option<String>,
    pub business_relates_to: Option<String>,
    pub business_since_year: Option<u32>,
    pub turnover: Option<String>,
    pub net_income: Option<String>,
    pub stock_value: Option<String>,
    pub txn_type: String,
    pub staff_count: Option<u32>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub monthly_salary: Option<String>,
    pub creditors_payment_time: Option<String>,
    pub debtors_payment_time: Option<String>,
    pub payment_modes: Vec<String>,
    pub purchase_area: Option<String>,
    pub sale_area: Option<String>,
}

impl Default for BusinessDetails {
    fn default() -> Self {
        Self {
            id: None,
            business_name: String::new(),
            ownership_type: String::new(),
            business_address: String::new(),
            visit_address: String::new(),
            gst_number: String::new(),
            business_location: String::new(),
            gps_location: None,
            shop_ownership: String::new(),
            rent_amount: None,
            business_relates_to: None,
            business_since_year: None,
            turnover: None,
            net_income: None,
            stock_value: None,
            txn_type: "CASH".to_string(),
            staff_count: None,
            monthly_salary: None,
            creditors_payment_time: None,
            debtors_payment_time: None,
            payment_modes: Vec::new(),
            purchase_area: None,
            sale_area: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessOwner {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl BusinessOwner {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Person met during the business visit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonMet {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub phone: String,
}

/// Business details as read back, with their nested collections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessSection {
    #[serde(flatten)]
    pub details: BusinessDetails,
    pub owners: Vec<BusinessOwner>,
    pub persons_met: Vec<PersonMet>,
}

/// Business details as they arrive in a payload
///
/// `owners` and `persons_met` are tri-state on their own: leaving them out
/// keeps the stored rows, sending them replaces the stored rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BusinessDetailsPayload {
    #[serde(flatten)]
    pub details: BusinessDetails,
    #[serde(default)]
    pub owners: Field<Vec<BusinessOwner>>,
    #[serde(default)]
    pub persons_met: Field<Vec<PersonMet>>,
}

// ---------- Co-applicant (singleton) ----------

/// How the co-applicant is involved with the applicant's livelihood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvolvementType {
    #[serde(rename = "Same Business")]
    SameBusiness,
    #[serde(rename = "Other Business")]
    OtherBusiness,
    Employment,
    Other,
}

impl InvolvementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvolvementType::SameBusiness => "Same Business",
            InvolvementType::OtherBusiness => "Other Business",
            InvolvementType::Employment => "Employment",
            InvolvementType::Other => "Other",
        }
    }
}

impl FromStr for InvolvementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Same Business" => Ok(InvolvementType::SameBusiness),
            "Other Business" => Ok(InvolvementType::OtherBusiness),
            "Employment" => Ok(InvolvementType::Employment),
            "Other" => Ok(InvolvementType::Other),
            other => Err(format!("unknown involvement type '{}'", other)),
        }
    }
}

/// Co-applicant details
///
/// Only `involvement_type` is required. Which of the remaining fields are
/// meaningful depends on it: the business fields for `Other Business`, the
/// employer fields for `Employment`, `other_details` for `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoApplicant {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub involvement_type: InvolvementType,

    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub registered_name: Option<String>,
    pub business_relates_to: Option<String>,
    pub business_since_year: Option<u32>,
    pub turnover: Option<String>,
    pub net_income: Option<String>,
    pub stock_value: Option<String>,
    pub txn_type: Option<String>,
    pub staff_count: Option<u32>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub monthly_salary: Option<String>,

    pub employer_name: Option<String>,
    pub position: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub yearly_salary: Option<String>,
    pub duration: Option<String>,

    pub other_details: Option<String>,
}

impl CoApplicant {
    /// A co-applicant with only the classification filled in
    pub fn new(involvement_type: InvolvementType) -> Self {
        Self {
            id: None,
            involvement_type,
            business_name: None,
            business_address: None,
            registered_name: None,
            business_relates_to: None,
            business_since_year: None,
            turnover: None,
            net_income: None,
            stock_value: None,
            txn_type: None,
            staff_count: None,
            monthly_salary: None,
            employer_name: None,
            position: None,
            yearly_salary: None,
            duration: None,
            other_details: None,
        }
    }
}

// ---------- Collections ----------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherBusiness {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub business_name: String,
    pub owner_name: String,
    pub address: String,
    pub relationship: String,
    pub yearly_income: String,
    pub vintage_year: u32,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loan {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub loan_type: String,
    pub bank_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub loan_amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub emi: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccount {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub bank_name: String,
    pub branch: String,
    pub account_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cc_limit: String,
}

// ---------- Security (singleton) ----------

/// Collateral offered and the amount requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityDetails {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub house_address: String,
    /// Square feet
    #[serde(deserialize_with = "string_or_number")]
    pub house_area: String,
    #[serde(deserialize_with = "string_or_number")]
    pub house_market_value: String,
    pub house_ownership: String,
    pub other_house_owner: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_required: String,
    pub end_use: String,
    pub other_end_use: Option<String>,
}

// ---------- Conclusion (singleton) ----------

/// Final outcome of the site visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallStatus {
    Positive,
    Negative,
    #[serde(rename = "Refer to credit")]
    ReferToCredit,
}

impl OverallStatus {
    pub const ALL: [OverallStatus; 3] = [
        OverallStatus::Positive,
        OverallStatus::Negative,
        OverallStatus::ReferToCredit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Positive => "Positive",
            OverallStatus::Negative => "Negative",
            OverallStatus::ReferToCredit => "Refer to credit",
        }
    }
}

impl FromStr for OverallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OverallStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown overall status '{}'", s))
    }
}

/// Site-visit findings and the final outcome
///
/// `overall_status` is `None` only for a conclusion that was blanked by an
/// empty update; such an application still counts as pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conclusion {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub general_observation: String,
    pub nearby_person1: String,
    pub nearby_person2: String,
    pub sale_invoices: String,
    pub purchase_invoices: String,
    pub business_setup: String,
    pub stock_pictures: String,
    pub signboard: String,
    pub biz_registration: String,
    pub education_proof: String,
    pub true_caller_name: String,
    pub qr_availability: String,
    pub qr_other_owner: Option<String>,
    pub signboard_contact: String,
    pub signboard_contact_other: Option<String>,
    pub electricity_bill: String,
    pub rent_agreement: String,
    pub commercial_vehicle: String,
    pub other_findings: Option<String>,
    pub overall_status: Option<OverallStatus>,
    pub status_remark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_details_defaults_to_cash() {
        let details: BusinessDetails =
            serde_json::from_str(r#"{"business_name": "Sharma Traders"}"#).unwrap();
        assert_eq!(details.business_name, "Sharma Traders");
        assert_eq!(details.txn_type, "CASH");
        assert!(details.payment_modes.is_empty());
    }

    #[test]
    fn test_payload_ids_are_ignored() {
        let loan: Loan = serde_json::from_str(
            r#"{"id": 99, "loan_type": "Car loan", "bank_name": "SBI", "loan_amount": "500000", "emi": 12000}"#,
        )
        .unwrap();
        assert_eq!(loan.id, None);
        assert_eq!(loan.emi, "12000");
    }

    #[test]
    fn test_co_applicant_requires_involvement_type() {
        let result: Result<CoApplicant, _> =
            serde_json::from_str(r#"{"employer_name": "Acme"}"#);
        assert!(result.is_err());

        let co: CoApplicant = serde_json::from_str(
            r#"{"involvement_type": "Employment", "employer_name": "Acme", "yearly_salary": 600000}"#,
        )
        .unwrap();
        assert_eq!(co.involvement_type, InvolvementType::Employment);
        assert_eq!(co.yearly_salary.as_deref(), Some("600000"));
    }

    #[test]
    fn test_status_labels_round_trip_through_from_str() {
        for status in OverallStatus::ALL {
            assert_eq!(status.as_str().parse::<OverallStatus>(), Ok(status));
        }
        assert!("Maybe".parse::<OverallStatus>().is_err());
        assert_eq!(
            "Same Business".parse::<InvolvementType>(),
            Ok(InvolvementType::SameBusiness)
        );
    }

    #[test]
    fn test_business_payload_keeps_nested_states_apart() {
        let payload: BusinessDetailsPayload =
            serde_json::from_str(r#"{"business_name": "X"}"#).unwrap();
        assert!(payload.owners.is_absent());
        assert!(payload.persons_met.is_absent());

        let bare_names: Result<BusinessDetailsPayload, _> =
            serde_json::from_str(r#"{"business_name": "X", "owners": ["A"]}"#);
        assert!(bare_names.is_err());

        let payload: BusinessDetailsPayload = serde_json::from_str(
            r#"{"business_name": "X", "owners": [{"name": "A"}], "persons_met": []}"#,
        )
        .unwrap();
        assert_eq!(payload.details.business_name, "X");
        assert_eq!(payload.owners.items(), [BusinessOwner::named("A")]);
        assert_eq!(payload.persons_met.state(), crate::model::FieldState::Empty);
    }
}
