//! Correlation types for request tracking
//!
//! A `RequestContext` travels with every engine command so that log events and
//! errors emitted while serving one caller can be tied back together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated caller identity
///
/// Authentication happens outside this workspace; by the time a `Caller`
/// exists the identity has already been established. On create it becomes
/// the owner attribution of the new application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller(String);

impl Caller {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request context: who is calling and under which request id
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub caller: Caller,
}

impl RequestContext {
    /// Create a context for `caller` with a fresh RequestId
    pub fn new(caller: Caller) -> Self {
        Self {
            request_id: RequestId::new(),
            caller,
        }
    }

    /// Reuse an existing RequestId (e.g. one propagated by an upstream layer)
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_request_context_carries_caller() {
        let ctx = RequestContext::new(Caller::new("agent-7"));
        assert_eq!(ctx.caller.as_str(), "agent-7");
        assert!(!ctx.request_id.as_str().is_empty());
    }

    #[test]
    fn test_request_context_with_existing_request_id() {
        let rid = RequestId::from_string("req-fixed".to_string());
        let ctx = RequestContext::new(Caller::new("agent-7")).with_request_id(rid.clone());
        assert_eq!(ctx.request_id, rid);
    }
}
