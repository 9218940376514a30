//! loanapp store - SQLite persistence for the application aggregate
//!
//! Provides:
//! - Connection management (foreign keys, WAL, busy timeout)
//! - Embedded, checksummed schema migrations
//! - Row-level repository for the root and every section
//! - Hydration of full aggregates (Aggregate Reader)
//! - Listing and counting queries (Query Service)

pub mod db;
pub mod errors;
pub mod migrations;
pub mod query;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteRepo;
