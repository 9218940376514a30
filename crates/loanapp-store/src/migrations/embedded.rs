//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_initial_schema",
            sql: include_str!("../../migrations/001_initial_schema.sql"),
        },
        Migration {
            id: "002_query_indexes",
            sql: include_str!("../../migrations/002_query_indexes.sql"),
        },
    ]
}

/// Identifier of the newest embedded migration
pub fn latest_migration_id() -> &'static str {
    get_migrations().last().map(|m| m.id).unwrap_or_default()
}
