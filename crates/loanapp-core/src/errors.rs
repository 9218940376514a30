use loanapp_core_types::RequestId;
use thiserror::Error;

/// Result type alias using LoanAppError
pub type Result<T> = std::result::Result<T, LoanAppError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and responses produced by outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    MissingField,
    MalformedPayload,
    ConclusionRequired,

    // Conflict
    AlreadyExists,
    ConstraintViolation,

    // Lookup
    NotFound,

    // Storage
    Io,
    Serialization,
    Persistence,
    Concurrency,

    // Internal
    Internal,
}

/// Coarse classification of error kinds
///
/// Callers that only need to decide on presentation (reject the input, report a
/// clash, report a missing record, or offer a retry) match on this instead of
/// the individual kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Conflict,
    NotFound,
    Storage,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::MalformedPayload => "ERR_MALFORMED_PAYLOAD",
            ExErrorKind::ConclusionRequired => "ERR_CONCLUSION_REQUIRED",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ExErrorKind::InvalidInput
            | ExErrorKind::MissingField
            | ExErrorKind::MalformedPayload
            | ExErrorKind::ConclusionRequired => ErrorClass::Validation,
            ExErrorKind::AlreadyExists | ExErrorKind::ConstraintViolation => ErrorClass::Conflict,
            ExErrorKind::NotFound => ErrorClass::NotFound,
            ExErrorKind::Io
            | ExErrorKind::Serialization
            | ExErrorKind::Persistence
            | ExErrorKind::Concurrency => ErrorClass::Storage,
            ExErrorKind::Internal => ErrorClass::Internal,
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, entity, offending field, request) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the payload field the error refers to
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Storage failures may succeed on a later attempt; everything else will
    /// fail the same way again. A stored value that does not decode stays
    /// undecodable, so serialization failures are excluded.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Storage && self.kind != ExErrorKind::Serialization
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by the aggregate model and its validation rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanAppError {
    /// A mandatory field was not supplied
    #[error("Missing mandatory field: {field}")]
    MissingField { field: String },

    /// A mandatory text field was supplied but blank
    #[error("Field must not be blank: {field}")]
    BlankField { field: String },

    /// The payload does not have the expected structure
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// No application with this identifier exists
    #[error("Application not found: {application_id}")]
    ApplicationNotFound { application_id: i64 },

    /// Another application already uses this file number
    #[error("File number already in use: {file_no}")]
    DuplicateFileNo { file_no: String },

    /// Submission attempted before the conclusion section was recorded
    #[error("Application {application_id} must have a conclusion before submission")]
    ConclusionRequired { application_id: i64 },
}

impl From<LoanAppError> for ExError {
    fn from(err: LoanAppError) -> Self {
        let message = err.to_string();
        match err {
            LoanAppError::MissingField { field } => ExError::new(ExErrorKind::MissingField)
                .with_field(field)
                .with_message(message),
            LoanAppError::BlankField { field } => ExError::new(ExErrorKind::InvalidInput)
                .with_field(field)
                .with_message(message),
            LoanAppError::MalformedPayload { .. } => {
                ExError::new(ExErrorKind::MalformedPayload).with_message(message)
            }
            LoanAppError::ApplicationNotFound { application_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(application_id.to_string())
                    .with_message(message)
            }
            LoanAppError::DuplicateFileNo { .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_field("file_no")
                .with_message(message),
            LoanAppError::ConclusionRequired { application_id } => {
                ExError::new(ExErrorKind::ConclusionRequired)
                    .with_entity_id(application_id.to_string())
                    .with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::MalformedPayload)
            .with_op("deserialize_payload")
            .with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_builder_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("read_aggregate")
            .with_entity_id("42")
            .with_message("no such application");

        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.op(), Some("read_aggregate"));
        assert_eq!(err.entity_id(), Some("42"));
        assert_eq!(err.message(), "no such application");
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::MissingField)
            .with_op("create_aggregate")
            .with_field("file_no")
            .with_message("Missing mandatory field: file_no");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_MISSING_FIELD]"));
        assert!(text.contains("create_aggregate"));
        assert!(text.contains("(field: file_no)"));
    }

    #[test]
    fn test_only_storage_errors_are_retryable() {
        assert!(ExError::new(ExErrorKind::Persistence).is_retryable());
        assert!(ExError::new(ExErrorKind::Concurrency).is_retryable());
        assert!(!ExError::new(ExErrorKind::AlreadyExists).is_retryable());
        assert!(!ExError::new(ExErrorKind::NotFound).is_retryable());
        assert!(!ExError::new(ExErrorKind::MissingField).is_retryable());
        assert!(!ExError::new(ExErrorKind::Serialization).is_retryable());
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error as _;

        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
        let outer = ExError::new(ExErrorKind::Persistence)
            .with_op("update_aggregate")
            .with_source(inner);

        assert!(outer.source().is_some());
        assert_eq!(
            outer.source_error().map(|e| e.message()),
            Some("disk I/O error")
        );
    }
}
