//! CRUD operations for [`PostRecord`] rows.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;
use uuid::Uuid;

use postapp_shared::{PostId, PostRecord};

use crate::database::Database;
use crate::error::{Result, StoreError};

const POST_COLUMNS: &str = "id, title, subtitle, body, html_body, created_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new post. Fails with [`StoreError::Conflict`] if the id is taken.
    pub fn insert_post(&self, post: &PostRecord) -> Result<()> {
        if self.post_exists(post.id)? {
            return Err(StoreError::Conflict);
        }
        self.conn().execute(
            "INSERT INTO posts (id, title, subtitle, body, html_body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                post.id.to_string(),
                post.title,
                post.subtitle,
                post.body,
                post.html_body,
                timestamp(&post.created_at),
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single post by id.
    pub fn get_post(&self, id: PostId) -> Result<PostRecord> {
        self.conn()
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id.to_string()],
                row_to_post,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all posts, newest first.
    pub fn list_posts(&self) -> Result<Vec<PostRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map([], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    pub fn post_exists(&self, id: PostId) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM posts WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace the mutable fields of an existing post. `created_at` is kept.
    /// Returns `true` if a row was updated.
    pub fn update_post(&self, post: &PostRecord) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE posts SET title = ?2, subtitle = ?3, body = ?4, html_body = ?5
             WHERE id = ?1",
            params![
                post.id.to_string(),
                post.title,
                post.subtitle,
                post.body,
                post.html_body,
            ],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a post by id. Returns `true` if a row was deleted.
    pub fn delete_post(&self, id: PostId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM posts WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// Fixed-width UTC so lexical order in SQLite matches chronological order.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRecord> {
    let id_str: String = row.get(0)?;
    let title: String = row.get(1)?;
    let subtitle: String = row.get(2)?;
    let body: String = row.get(3)?;
    let html_body: Option<String> = row.get(4)?;
    let created_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(PostRecord {
        id: PostId(id),
        title,
        subtitle,
        body,
        html_body,
        created_at,
    })
}
