pub mod aggregate;
pub mod application;
pub mod decimal;
pub mod field;
pub mod sections;
pub mod summary;

pub use aggregate::{ApplicationAggregate, ApplicationPayload};
pub use application::{ApplicantProfile, Application, ApplicationId, ProfilePatch};
pub use field::{Field, FieldState};
pub use sections::{
    BankAccount, BusinessDetails, BusinessDetailsPayload, BusinessOwner, BusinessSection,
    CoApplicant, Conclusion, InvolvementType, Loan, OtherBusiness, OverallStatus, PersonMet,
    SecurityDetails,
};
pub use summary::{ApplicationSummary, StatusTally, SubmissionReceipt};
