//! The remote data service contract consumed by the posts repository.
//!
//! Two implementations ship with the client: [`MockDataService`] keeps
//! posts in memory, [`HttpDataService`] talks to a `postapp-server`
//! instance. Repositories receive the service as an
//! `Arc<dyn RemoteDataService>` at construction time.

mod http;
mod mock;

use async_trait::async_trait;

use postapp_shared::{PostId, PostRecord};

use crate::error::ServiceError;

pub use http::HttpDataService;
pub use mock::{MockDataService, GETTING_STARTED_POST_ID, WELCOME_POST_ID};

#[async_trait]
pub trait RemoteDataService: Send + Sync {
    /// All posts, newest first by `created_at`.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, ServiceError>;

    /// A single post, or `None` when no post has that id.
    async fn get_post(&self, id: PostId) -> Result<Option<PostRecord>, ServiceError>;

    async fn insert_post(&self, post: &PostRecord) -> Result<(), ServiceError>;

    async fn update_post(&self, post: &PostRecord) -> Result<(), ServiceError>;

    async fn delete_post(&self, id: PostId) -> Result<(), ServiceError>;
}
