//! Client-side source of truth for the visible post list.
//!
//! The repository owns a newest-first cache of [`PostRecord`]s and mediates
//! every remote CRUD call. Local updates are applied only after the remote
//! call succeeds; a failed call leaves the cache exactly as it was.
//!
//! Operations take `&self` and do not serialize against each other. The
//! cache lock is only held for the final replace / insert / remove, never
//! across a remote call, so readers always see a committed snapshot. When two
//! mutating calls race, whichever completes last applies its change last.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use postapp_shared::{PostId, PostRecord};

use crate::error::PostsError;
use crate::remote::RemoteDataService;

pub struct PostsRepository {
    service: Arc<dyn RemoteDataService>,
    posts: Mutex<Vec<PostRecord>>,
    in_flight_fetches: AtomicUsize,
    last_error: Mutex<Option<PostsError>>,
}

impl PostsRepository {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Self {
        Self {
            service,
            posts: Mutex::new(Vec::new()),
            in_flight_fetches: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Copy of the cached posts, newest first.
    pub fn posts(&self) -> Vec<PostRecord> {
        lock(&self.posts).clone()
    }

    /// Look a post up in the cache without touching the network.
    pub fn cached_post(&self, id: PostId) -> Option<PostRecord> {
        lock(&self.posts).iter().find(|p| p.id == id).cloned()
    }

    /// Whether a full-list fetch is currently outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight_fetches.load(Ordering::SeqCst) > 0
    }

    /// The outcome of the most recently completed operation, if it failed.
    pub fn last_error(&self) -> Option<PostsError> {
        lock(&self.last_error).clone()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Reload the whole list from the remote service.
    ///
    /// On success the cache is replaced, sorted newest first. On failure
    /// the previous cache is kept so the UI never flashes an empty list.
    pub async fn fetch_all(&self) -> Result<(), PostsError> {
        let _loading = LoadingGuard::enter(&self.in_flight_fetches);

        match self.service.list_posts().await {
            Ok(mut posts) => {
                posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                info!(count = posts.len(), "posts refreshed");
                *lock(&self.posts) = posts;
                self.record(None);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch posts");
                Err(self.fail(e.into()))
            }
        }
    }

    /// Fetch a single post by id. The cached list is not modified.
    pub async fn fetch_one(&self, id: PostId) -> Result<PostRecord, PostsError> {
        match self.service.get_post(id).await {
            Ok(Some(post)) => {
                self.record(None);
                Ok(post)
            }
            Ok(None) => {
                warn!(id = %id, "post not found");
                self.record(None);
                Err(PostsError::NotFound(id))
            }
            Err(e) => {
                error!(id = %id, error = %e, "failed to fetch post");
                Err(self.fail(e.into()))
            }
        }
    }

    /// Create a post and, once the remote service has accepted it, put it at
    /// the head of the cache. The cache is not re-sorted.
    pub async fn create(
        &self,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
        html_body: Option<String>,
    ) -> Result<PostRecord, PostsError> {
        let post = PostRecord::new(title, subtitle, body, html_body);

        if let Err(e) = self.service.insert_post(&post).await {
            error!(id = %post.id, error = %e, "failed to create post");
            return Err(self.fail(e.into()));
        }

        lock(&self.posts).insert(0, post.clone());
        self.record(None);
        info!(id = %post.id, "post created");
        Ok(post)
    }

    /// Delete a post remotely, then drop it from the cache.
    pub async fn delete(&self, id: PostId) -> Result<(), PostsError> {
        if let Err(e) = self.service.delete_post(id).await {
            error!(id = %id, error = %e, "failed to delete post");
            return Err(self.fail(e.into()));
        }

        lock(&self.posts).retain(|p| p.id != id);
        self.record(None);
        info!(id = %id, "post deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn record(&self, error: Option<PostsError>) {
        *lock(&self.last_error) = error;
    }

    fn fail(&self, error: PostsError) -> PostsError {
        self.record(Some(error.clone()));
        error
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Counts an outstanding fetch for as long as it lives, including when the
/// fetch future is dropped mid-flight.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
