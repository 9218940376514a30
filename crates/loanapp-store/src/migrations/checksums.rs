//! Migration checksums
//!
//! The SHA-256 of each migration's SQL is recorded when it is applied and
//! compared on every later run. Line endings are normalized first so a CRLF
//! checkout hashes the same as the file it was made from.

use sha2::{Digest, Sha256};

use crate::errors::{checksum_mismatch, Result};

/// Hex SHA-256 of `sql` with `\r\n` folded to `\n`
pub fn migration_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    for line in sql.split_inclusive('\n') {
        match line.strip_suffix("\r\n") {
            Some(body) => {
                hasher.update(body.as_bytes());
                hasher.update(b"\n");
            }
            None => hasher.update(line.as_bytes()),
        }
    }
    hex::encode(hasher.finalize())
}

/// Compare a recorded checksum with the embedded SQL
///
/// Rows written without a checksum are accepted as is.
pub fn verify_recorded(migration_id: &str, recorded: Option<&str>, sql: &str) -> Result<()> {
    let Some(expected) = recorded else {
        return Ok(());
    };
    let actual = migration_checksum(sql);
    if expected != actual {
        return Err(checksum_mismatch(migration_id, expected, &actual));
    }
    Ok(())
}
