use rusqlite::Connection;

use crate::error::StoreError;

/// Initialise the key-value schema in `conn`.
///
/// Creates the `kv` table (idempotent). One row per key; last write wins.
pub fn init_db(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key         TEXT    NOT NULL PRIMARY KEY,
            value       TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL    -- ISO-8601
        ) STRICT;
        ",
    )?;
    Ok(())
}
