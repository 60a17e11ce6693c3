use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use postapp_shared::{PostId, PostRecord};

use super::RemoteDataService;
use crate::error::ServiceError;

/// Id of the "Welcome to PostApp" sample post.
pub const WELCOME_POST_ID: PostId =
    PostId(Uuid::from_u128(0x5f1c_2a9e_7b44_4c0d_9a63_1e8f_0b2d_4c71));

/// Id of the "Getting Started with Rust" sample post.
pub const GETTING_STARTED_POST_ID: PostId =
    PostId(Uuid::from_u128(0x8d3e_6f10_2c57_4a8b_b1f4_7a09_c3e2_5d96));

/// In-memory stand-in for the hosted backend.
///
/// Optionally sleeps before every call to mimic network latency, and can be
/// switched offline to exercise failure paths.
#[derive(Debug)]
pub struct MockDataService {
    posts: RwLock<Vec<PostRecord>>,
    latency: Duration,
    available: AtomicBool,
}

impl MockDataService {
    /// Empty service with no latency.
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    pub fn with_posts(posts: Vec<PostRecord>) -> Self {
        Self {
            posts: RwLock::new(posts),
            latency: Duration::ZERO,
            available: AtomicBool::new(true),
        }
    }

    /// Service seeded with two welcome posts, one and two hours old. Their
    /// ids are fixed, so separate processes agree on them.
    pub fn with_sample_posts() -> Self {
        let now = Utc::now();
        let welcome = PostRecord {
            id: WELCOME_POST_ID,
            created_at: now - TimeDelta::hours(1),
            ..PostRecord::new(
                "Welcome to PostApp",
                "Your first blog post",
                "This is a sample blog post to demonstrate the app functionality. \
                 You can create, view, and manage your blog posts here.",
                None,
            )
        };
        let getting_started = PostRecord {
            id: GETTING_STARTED_POST_ID,
            created_at: now - TimeDelta::hours(2),
            ..PostRecord::new(
                "Getting Started with Rust",
                "Ownership without the garbage collector",
                "Rust gives you memory safety without a garbage collector. \
                 The borrow checker makes sure references never outlive the data they point to.",
                Some(
                    "<p>Rust gives you <b>memory safety</b> without a garbage collector.</p>"
                        .to_string(),
                ),
            )
        };
        Self::with_posts(vec![welcome, getting_started])
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// When `false`, every call fails with [`ServiceError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    async fn round_trip(&self) -> Result<(), ServiceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("mock service is offline".into()));
        }
        Ok(())
    }
}

impl Default for MockDataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteDataService for MockDataService {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, ServiceError> {
        self.round_trip().await?;
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<PostRecord>, ServiceError> {
        self.round_trip().await?;
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<(), ServiceError> {
        self.round_trip().await?;
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(ServiceError::Status {
                status: 409,
                message: format!("post {} already exists", post.id),
            });
        }
        posts.push(post.clone());
        debug!(id = %post.id, "mock: post inserted");
        Ok(())
    }

    async fn update_post(&self, post: &PostRecord) -> Result<(), ServiceError> {
        self.round_trip().await?;
        let mut posts = self.posts.write().await;
        if let Some(existing) = posts.iter_mut().find(|p| p.id == post.id) {
            *existing = PostRecord {
                created_at: existing.created_at,
                ..post.clone()
            };
        }
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ServiceError> {
        self.round_trip().await?;
        self.posts.write().await.retain(|p| p.id != id);
        debug!(id = %id, "mock: post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_posts_newest_first() {
        let service = MockDataService::with_sample_posts();
        let posts = service.list_posts().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Welcome to PostApp");
        assert!(posts[0].created_at > posts[1].created_at);
    }

    #[tokio::test]
    async fn test_sample_post_ids_stable_across_instances() {
        let first_run = MockDataService::with_sample_posts();
        let second_run = MockDataService::with_sample_posts();

        let listed = first_run.list_posts().await.unwrap();
        assert_eq!(listed[0].id, WELCOME_POST_ID);
        assert_eq!(listed[1].id, GETTING_STARTED_POST_ID);

        for post in listed {
            let found = second_run.get_post(post.id).await.unwrap();
            assert_eq!(found.map(|p| p.title), Some(post.title));
        }
    }

    #[tokio::test]
    async fn test_list_sorts_regardless_of_insert_order() {
        let service = MockDataService::new();
        let older = PostRecord {
            created_at: Utc::now() - TimeDelta::days(1),
            ..PostRecord::new("older", "s", "b", None)
        };
        let newer = PostRecord::new("newer", "s", "b", None);

        service.insert_post(&newer).await.unwrap();
        service.insert_post(&older).await.unwrap();

        let titles: Vec<_> = service
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let service = MockDataService::new();
        let post = PostRecord::new("t", "s", "b", None);
        service.insert_post(&post).await.unwrap();

        let err = service.insert_post(&post).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let post = PostRecord::new("t", "s", "b", None);
        let service = MockDataService::with_posts(vec![post.clone()]);

        let edited = PostRecord {
            title: "edited".into(),
            created_at: post.created_at + TimeDelta::days(1),
            ..post.clone()
        };
        service.update_post(&edited).await.unwrap();

        let stored = service.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "edited");
        assert_eq!(stored.created_at, post.created_at);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let service = MockDataService::with_sample_posts();
        service.set_available(false);

        assert!(matches!(
            service.list_posts().await,
            Err(ServiceError::Unavailable(_))
        ));
        assert!(service.get_post(PostId::new()).await.is_err());
        assert!(service.delete_post(PostId::new()).await.is_err());

        service.set_available(true);
        assert_eq!(service.list_posts().await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let service = MockDataService::new().with_latency(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        service.list_posts().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
