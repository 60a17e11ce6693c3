//! # postapp-client
//!
//! Client-side core of PostApp: the posts repository with its in-memory
//! cache, the daily reading goal repository with local persistence, and the
//! collaborators they are constructed with (remote data service, key-value
//! store, clock).

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod kv_store;
pub mod posts_repository;
pub mod reading_goal_repository;
pub mod remote;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use error::{ClientError, PostsError, ServiceError};
pub use posts_repository::PostsRepository;
pub use reading_goal_repository::{MarkReadOutcome, ReadingGoalRepository};
pub use state::AppState;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("postapp_client=info,postapp_store=warn,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
