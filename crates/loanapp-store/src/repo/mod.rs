//! Repository layer for persisting the application aggregate to SQLite

pub mod hydration;
pub mod rows;
pub mod sqlite_repo;

pub use rows::SectionRow;
pub use sqlite_repo::SqliteRepo;
