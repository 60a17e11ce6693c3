//! Post records as they exist in memory and on the wire.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BODY_LEN, MAX_SUBTITLE_LEN, MAX_TITLE_LEN};
use crate::error::ValidationError;
use crate::types::PostId;

/// A single published post.
///
/// `id` and `created_at` are assigned once by [`PostRecord::new`] and never
/// change afterwards. Field names are already snake_case, which is also the
/// wire format expected by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub subtitle: String,
    /// Plain-text content, always present.
    pub body: String,
    /// Rich-text rendering of `body`. Opaque HTML; never parsed here.
    /// Records written before rich text existed decode with `None`.
    #[serde(default)]
    pub html_body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostRecord {
    /// Build a new record with a fresh identifier and the current time,
    /// truncated to microseconds so it survives storage unchanged.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
        html_body: Option<String>,
    ) -> Self {
        Self {
            id: PostId::new(),
            title: title.into(),
            subtitle: subtitle.into(),
            body: body.into(),
            html_body,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// First `max_chars` characters of the body, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.body.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}…", head.trim_end())
        } else {
            head
        }
    }

    pub fn has_rich_text(&self) -> bool {
        self.html_body.as_deref().is_some_and(|html| !html.is_empty())
    }
}

/// Content for a post that has not been created yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    #[serde(default)]
    pub html_body: Option<String>,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            body: body.into(),
            html_body: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Trim surrounding whitespace from the text fields. The HTML body is
    /// forwarded untouched.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            body: self.body.trim().to_string(),
            html_body: self.html_body,
        }
    }

    /// Check that every text field is non-blank and within length limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.subtitle.trim().is_empty() {
            return Err(ValidationError::EmptySubtitle);
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        check_len("Title", &self.title, MAX_TITLE_LEN)?;
        check_len("Subtitle", &self.subtitle, MAX_SUBTITLE_LEN)?;
        check_len("Body", &self.body, MAX_BODY_LEN)?;
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let post = PostRecord::new("Title", "Sub", "Body", Some("<p>Body</p>".into()));
        let value = serde_json::to_value(&post).unwrap();

        assert_eq!(value["id"], post.id.to_string());
        assert_eq!(value["html_body"], "<p>Body</p>");
        assert!(value["created_at"].as_str().unwrap().contains('T'));
        assert!(value.get("createdAt").is_none());
        assert!(value.get("htmlBody").is_none());
    }

    #[test]
    fn test_plain_body_schema_decodes() {
        let json = r#"{
            "id": "8a5f1f3e-6b7c-4d7e-9f00-1234567890ab",
            "title": "Welcome",
            "subtitle": "First post",
            "body": "Hello",
            "created_at": "2025-05-23T10:00:00Z"
        }"#;

        let post: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(post.html_body, None);
        assert!(!post.has_rich_text());
        assert_eq!(post.title, "Welcome");
    }

    #[test]
    fn test_null_html_body_decodes() {
        let json = r#"{
            "id": "8a5f1f3e-6b7c-4d7e-9f00-1234567890ab",
            "title": "t", "subtitle": "s", "body": "b",
            "html_body": null,
            "created_at": "2025-05-23T10:00:00+02:00"
        }"#;

        let post: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(post.html_body, None);
        assert_eq!(post.created_at.to_rfc3339(), "2025-05-23T08:00:00+00:00");
    }

    #[test]
    fn test_new_assigns_distinct_ids() {
        let a = PostRecord::new("a", "a", "a", None);
        let b = PostRecord::new("a", "a", "a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let post = PostRecord::new("t", "s", "héllo wörld, this is long", None);
        assert_eq!(post.preview(5), "héllo…");
        assert_eq!(post.preview(100), "héllo wörld, this is long");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert_eq!(
            NewPost::new("  ", "sub", "body").validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            NewPost::new("title", "\n", "body").validate(),
            Err(ValidationError::EmptySubtitle)
        );
        assert_eq!(
            NewPost::new("title", "sub", " \t ").validate(),
            Err(ValidationError::EmptyBody)
        );
        assert!(NewPost::new("title", "sub", "body").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_long_title() {
        let title = "x".repeat(MAX_TITLE_LEN + 1);
        let err = NewPost::new(title, "sub", "body").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "Title",
                max: MAX_TITLE_LEN,
                actual: MAX_TITLE_LEN + 1,
            }
        );
    }

    #[test]
    fn test_normalized_trims_text_but_not_html() {
        let post = NewPost::new("  Title ", " Sub\n", "\n Body ").with_html("  <b>Body</b> ");
        let post = post.normalized();
        assert_eq!(post.title, "Title");
        assert_eq!(post.subtitle, "Sub");
        assert_eq!(post.body, "Body");
        assert_eq!(post.html_body.as_deref(), Some("  <b>Body</b> "));
    }
}
