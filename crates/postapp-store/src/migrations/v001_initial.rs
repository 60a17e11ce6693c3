//! v001 -- Initial schema creation.
//!
//! Creates the `kv_store` table (client-local blobs such as reading goal
//! progress) and the `posts` table (post collection served by the backend).

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Key-value blobs
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY NOT NULL,
    value      BLOB NOT NULL,
    updated_at TEXT NOT NULL                  -- RFC-3339
);

-- ----------------------------------------------------------------
-- Posts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS posts (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    title      TEXT NOT NULL,
    subtitle   TEXT NOT NULL,
    body       TEXT NOT NULL,
    html_body  TEXT,                          -- opaque rich text, nullable
    created_at TEXT NOT NULL                  -- RFC-3339, fixed-width UTC
);

CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
