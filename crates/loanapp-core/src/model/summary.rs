use chrono::{DateTime, Utc};
use serde::Serialize;

use super::application::ApplicationId;
use super::sections::OverallStatus;

/// Row of an owner's application list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    pub applicant_name: String,
    pub file_no: String,
    pub telephone: String,
    pub allocation_date: String,
    pub visit_date: String,
    pub owner: String,
    /// Read through to the conclusion; `None` while pending
    pub overall_status: Option<OverallStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application counts per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub refer_to_credit: u64,
    pub pending: u64,
}

impl StatusTally {
    /// Build a tally from the total and the per-outcome counts
    ///
    /// `pending` is whatever is not accounted for by a known outcome, which
    /// covers both a missing conclusion and a conclusion without outcome.
    pub fn from_counts(total: u64, positive: u64, negative: u64, refer_to_credit: u64) -> Self {
        let known = positive + negative + refer_to_credit;
        Self {
            total,
            positive,
            negative,
            refer_to_credit,
            pending: total.saturating_sub(known),
        }
    }
}

/// Acknowledgement returned when an application is submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
    pub file_no: String,
    pub overall_status: Option<OverallStatus>,
}
