use serde::{Deserialize, Serialize};

use super::application::{Application, ApplicationId, ProfilePatch};
use super::field::Field;
use super::sections::{
    BankAccount, BusinessDetailsPayload, BusinessSection, CoApplicant, Conclusion, Loan,
    OtherBusiness, OverallStatus, SecurityDetails,
};

/// One application with every section, as stored
///
/// Singleton sections that were never written are `None`; collections that
/// were never written are empty. A read never fabricates a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationAggregate {
    #[serde(flatten)]
    pub application: Application,
    pub business_details: Option<BusinessSection>,
    pub co_applicant: Option<CoApplicant>,
    pub other_businesses: Vec<OtherBusiness>,
    pub loans: Vec<Loan>,
    pub bank_accounts: Vec<BankAccount>,
    pub security_details: Option<SecurityDetails>,
    pub conclusion: Option<Conclusion>,
}

impl ApplicationAggregate {
    pub fn id(&self) -> ApplicationId {
        self.application.id
    }

    pub fn file_no(&self) -> &str {
        &self.application.profile.file_no
    }

    /// Outcome recorded in the conclusion, `None` while pending
    pub fn overall_status(&self) -> Option<OverallStatus> {
        self.conclusion.as_ref().and_then(|c| c.overall_status)
    }
}

/// Inbound create/update payload
///
/// Root fields sit at the top level next to the section keys, mirroring the
/// form submission. Unknown keys (`id`, `owner`, timestamps echoed back by a
/// client) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplicationPayload {
    #[serde(flatten)]
    pub profile: ProfilePatch,
    #[serde(default)]
    pub business_details: Field<BusinessDetailsPayload>,
    #[serde(default)]
    pub co_applicant: Field<CoApplicant>,
    #[serde(default)]
    pub other_businesses: Field<Vec<OtherBusiness>>,
    #[serde(default)]
    pub loans: Field<Vec<Loan>>,
    #[serde(default)]
    pub bank_accounts: Field<Vec<BankAccount>>,
    #[serde(default)]
    pub security_details: Field<SecurityDetails>,
    #[serde(default)]
    pub conclusion: Field<Conclusion>,
}

impl ApplicationPayload {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
