//! loanapp core - aggregate model and synchronization rules
//!
//! This crate holds everything about a loan application that does not need
//! a database:
//! - The aggregate model (root application plus singleton and collection sections)
//! - The tri-state payload model (`Field<T>`) used by create/update
//! - The per-section policy table that drives the writer
//! - Structural validation of payloads
//! - The error facility and the structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod rules;

// Re-export commonly used types
pub use errors::{ErrorClass, ExError, ExErrorKind, LoanAppError, Result};
pub use model::{ApplicationAggregate, ApplicationId, ApplicationPayload, Field, FieldState};
pub use policy::{SectionAction, SectionKind, SectionPolicy};
