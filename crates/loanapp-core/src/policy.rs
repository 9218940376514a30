//! Per-section synchronization policies
//!
//! The writer never decides ad hoc what to do with a section. It looks up the
//! section's [`SectionPolicy`] and asks it for a [`SectionAction`] given the
//! key's [`FieldState`]. The whole contract is the table in
//! [`SectionPolicy::on_update`].
//!
//! | Policy               | Absent | Empty          | Set             |
//! |----------------------|--------|----------------|-----------------|
//! | `DeletableSingleton` | Keep   | Delete         | Upsert          |
//! | `UpsertSingleton`    | Keep   | UpsertBlank    | Upsert          |
//! | `ReplaceCollection`  | Keep   | Replace (none) | Replace         |
//!
//! Only the co-applicant is a `DeletableSingleton`. Business details,
//! security details and the conclusion have no delete path: an empty payload
//! overwrites them with blank values instead.

use crate::model::FieldState;

/// Every section of the aggregate below the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    BusinessDetails,
    BusinessOwners,
    PersonsMet,
    CoApplicant,
    OtherBusinesses,
    Loans,
    BankAccounts,
    SecurityDetails,
    Conclusion,
}

/// How a section is reconciled against a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionPolicy {
    /// Singleton that an empty payload removes
    DeletableSingleton,
    /// Singleton that an empty payload blanks but keeps
    UpsertSingleton,
    /// Collection that is always replaced wholesale
    ReplaceCollection,
}

/// What the writer does to one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionAction {
    /// Leave stored rows untouched
    Keep,
    /// Remove the singleton row if there is one
    Delete,
    /// Insert or overwrite the singleton row with the payload values
    Upsert,
    /// Insert or overwrite the singleton row with blank values
    UpsertBlank,
    /// Delete every row, then insert the payload elements (possibly none)
    Replace,
}

impl SectionKind {
    /// Write order inside one synchronization transaction
    pub const WRITE_ORDER: [SectionKind; 9] = [
        SectionKind::BusinessDetails,
        SectionKind::BusinessOwners,
        SectionKind::PersonsMet,
        SectionKind::CoApplicant,
        SectionKind::OtherBusinesses,
        SectionKind::Loans,
        SectionKind::BankAccounts,
        SectionKind::SecurityDetails,
        SectionKind::Conclusion,
    ];

    pub fn policy(self) -> SectionPolicy {
        match self {
            SectionKind::CoApplicant => SectionPolicy::DeletableSingleton,
            SectionKind::BusinessDetails | SectionKind::SecurityDetails | SectionKind::Conclusion => {
                SectionPolicy::UpsertSingleton
            }
            SectionKind::BusinessOwners
            | SectionKind::PersonsMet
            | SectionKind::OtherBusinesses
            | SectionKind::Loans
            | SectionKind::BankAccounts => SectionPolicy::ReplaceCollection,
        }
    }

    /// Key of the section in a payload
    pub fn payload_key(self) -> &'static str {
        match self {
            SectionKind::BusinessDetails => "business_details",
            SectionKind::BusinessOwners => "business_details.owners",
            SectionKind::PersonsMet => "business_details.persons_met",
            SectionKind::CoApplicant => "co_applicant",
            SectionKind::OtherBusinesses => "other_businesses",
            SectionKind::Loans => "loans",
            SectionKind::BankAccounts => "bank_accounts",
            SectionKind::SecurityDetails => "security_details",
            SectionKind::Conclusion => "conclusion",
        }
    }

    pub fn on_create(self, state: FieldState) -> SectionAction {
        self.policy().on_create(state)
    }

    pub fn on_update(self, state: FieldState) -> SectionAction {
        self.policy().on_update(state)
    }
}

impl SectionPolicy {
    /// Action on a freshly inserted root
    ///
    /// Nothing exists yet, so only populated keys produce rows. An empty
    /// section is never fabricated on create.
    pub fn on_create(self, state: FieldState) -> SectionAction {
        match (self, state) {
            (_, FieldState::Absent | FieldState::Empty) => SectionAction::Keep,
            (SectionPolicy::ReplaceCollection, FieldState::Set) => SectionAction::Replace,
            (_, FieldState::Set) => SectionAction::Upsert,
        }
    }

    /// Action against an existing aggregate
    pub fn on_update(self, state: FieldState) -> SectionAction {
        match (self, state) {
            (_, FieldState::Absent) => SectionAction::Keep,
            (SectionPolicy::DeletableSingleton, FieldState::Empty) => SectionAction::Delete,
            (SectionPolicy::UpsertSingleton, FieldState::Empty) => SectionAction::UpsertBlank,
            (SectionPolicy::ReplaceCollection, _) => SectionAction::Replace,
            (_, FieldState::Set) => SectionAction::Upsert,
        }
    }
}
