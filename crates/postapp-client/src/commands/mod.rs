//! Command handlers for the presentation layer.
//!
//! Each sub-module groups related commands by domain. Handlers take the
//! shared [`AppState`](crate::state::AppState) by reference and return
//! serializable camelCase DTOs, so any front end (the bundled CLI, a GUI
//! shell) can render them directly.

pub mod posts;
pub mod reading_goal;

pub use posts::{create_post, delete_post, list_posts, open_post, OpenedPost, PostDto, PostListDto};
pub use reading_goal::{reading_goal, ReadingGoalDto};
