//! Application state shared by every command handler.
//!
//! [`AppState`] is constructed once at startup and passed by reference to the
//! functions in [`crate::commands`]. It owns both repositories, so there is
//! exactly one post cache and one reading goal per process.

use std::sync::{Arc, Mutex, MutexGuard};

use postapp_store::Database;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{Backend, ClientConfig};
use crate::error::ClientError;
use crate::events::EventBus;
use crate::kv_store::{KeyValueStore, SqliteKeyValueStore};
use crate::posts_repository::PostsRepository;
use crate::reading_goal_repository::ReadingGoalRepository;
use crate::remote::{HttpDataService, MockDataService, RemoteDataService};

/// Central application state.
pub struct AppState {
    /// Cached post list and remote CRUD.
    pub posts: Arc<PostsRepository>,

    /// Today's reading progress. Only ever locked for synchronous work.
    pub reading_goal: Arc<Mutex<ReadingGoalRepository>>,

    /// Notifications for whatever is presenting the state.
    pub events: EventBus,

    pub config: ClientConfig,
}

impl AppState {
    /// Wire up the real collaborators described by `config`: the selected
    /// backend, a SQLite-backed key-value store and the system clock.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let service: Arc<dyn RemoteDataService> = match config.backend {
            Backend::Mock => {
                Arc::new(MockDataService::with_sample_posts().with_latency(config.mock_latency))
            }
            Backend::Http => Arc::new(HttpDataService::new(
                &config.server_url,
                config.http_timeout,
            )?),
        };

        let db = match &config.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        if let Some(path) = db.path() {
            info!(path = %path.display(), "Using local database");
        }

        let store = Arc::new(SqliteKeyValueStore::new(db));
        Ok(Self::new(config, service, store, Arc::new(SystemClock)))
    }

    /// Build state around explicit collaborators.
    pub fn new(
        config: ClientConfig,
        service: Arc<dyn RemoteDataService>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(backend = ?config.backend, daily_goal = config.daily_goal, "Initializing client state");
        let reading_goal = ReadingGoalRepository::load(store, clock, config.daily_goal);
        Self {
            posts: Arc::new(PostsRepository::new(service)),
            reading_goal: Arc::new(Mutex::new(reading_goal)),
            events: EventBus::new(),
            config,
        }
    }

    /// Lock the reading goal, recovering from a poisoned lock.
    pub fn reading_goal(&self) -> MutexGuard<'_, ReadingGoalRepository> {
        self.reading_goal.lock().unwrap_or_else(|e| e.into_inner())
    }
}
