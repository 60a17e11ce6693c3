use serde::Serialize;
use tracing::info;

use postapp_shared::constants::PREVIEW_LEN;
use postapp_shared::{NewPost, PostId, PostRecord};

use crate::error::ClientError;
use crate::events::ClientEvent;
use crate::reading_goal_repository::MarkReadOutcome;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub html_body: Option<String>,
    pub created_at: String,
    pub preview: String,
    pub is_read: bool,
}

impl PostDto {
    pub fn from_record(post: PostRecord, is_read: bool) -> Self {
        Self {
            id: post.id.to_string(),
            preview: post.preview(PREVIEW_LEN),
            created_at: post.created_at.to_rfc3339(),
            title: post.title,
            subtitle: post.subtitle,
            body: post.body,
            html_body: post.html_body,
            is_read,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListDto {
    pub posts: Vec<PostDto>,
    /// Message of the last failed operation. The list still holds the
    /// previous posts when this is set.
    pub error: Option<String>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedPost {
    pub post: PostDto,
    /// `true` when opening this post completed today's goal.
    pub goal_reached: bool,
}

/// Refresh the post list from the backend and return it with read markers.
///
/// A failed refresh is not an error here: the previous list is returned with
/// `error` set.
pub async fn list_posts(state: &AppState) -> PostListDto {
    state.posts.fetch_all().await.ok();
    snapshot(state)
}

/// Current cached list without contacting the backend.
pub fn snapshot(state: &AppState) -> PostListDto {
    let goal = state.reading_goal();
    PostListDto {
        posts: state
            .posts
            .posts()
            .into_iter()
            .map(|p| {
                let is_read = goal.has_read_post(p.id);
                PostDto::from_record(p, is_read)
            })
            .collect(),
        error: state.posts.last_error().map(|e| e.to_string()),
        is_loading: state.posts.is_loading(),
    }
}

/// Validate and publish a new post.
pub async fn create_post(state: &AppState, new_post: NewPost) -> Result<PostDto, ClientError> {
    let new_post = new_post.normalized();
    new_post.validate()?;

    let NewPost {
        title,
        subtitle,
        body,
        html_body,
    } = new_post;
    let post = state.posts.create(title, subtitle, body, html_body).await?;

    info!(id = %post.id, "Post created");
    state.events.emit(ClientEvent::PostCreated { post_id: post.id });
    Ok(PostDto::from_record(post, false))
}

/// Load a post for reading and count it toward today's goal once it has
/// stayed open for the configured dwell delay.
///
/// Dropping the returned future before the delay elapses leaves the post
/// unread.
pub async fn open_post(state: &AppState, id: PostId) -> Result<OpenedPost, ClientError> {
    let post = state.posts.fetch_one(id).await?;

    tokio::time::sleep(state.config.read_dwell).await;

    let (outcome, daily_goal) = {
        let mut goal = state.reading_goal();
        (goal.mark_post_as_read(post.id), goal.state().daily_goal())
    };
    if let MarkReadOutcome::Marked { read_count, .. } = outcome {
        info!(id = %post.id, read_count, "Post read");
    }
    if outcome.goal_reached() {
        state.events.emit(ClientEvent::GoalReached { daily_goal });
    }

    Ok(OpenedPost {
        goal_reached: outcome.goal_reached(),
        post: PostDto::from_record(post, true),
    })
}

pub async fn delete_post(state: &AppState, id: PostId) -> Result<(), ClientError> {
    state.posts.delete(id).await?;
    info!(id = %id, "Post deleted");
    state.events.emit(ClientEvent::PostDeleted { post_id: id });
    Ok(())
}
