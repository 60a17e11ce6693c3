//! Owner of the process-wide [`ReadingGoalState`].
//!
//! State is loaded once from the key-value store and written back at the
//! end of every operation that changes it. Storage problems never reach the
//! caller: a bad or missing blob falls back to a fresh goal, and a failed
//! write only logs, leaving the in-memory state authoritative until the next
//! successful write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use postapp_shared::constants::READING_GOAL_KEY;
use postapp_shared::{PostId, ReadingGoalState};

use crate::clock::Clock;
use crate::kv_store::KeyValueStore;

/// Result of [`ReadingGoalRepository::mark_post_as_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The post was already in today's read-set. Nothing changed.
    AlreadyRead,
    /// The post was added to today's read-set.
    Marked {
        read_count: usize,
        /// `true` only for the post that completes today's goal.
        goal_reached: bool,
    },
}

impl MarkReadOutcome {
    pub fn goal_reached(&self) -> bool {
        matches!(self, Self::Marked { goal_reached: true, .. })
    }
}

pub struct ReadingGoalRepository {
    state: ReadingGoalState,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ReadingGoalRepository {
    /// Load the persisted state, or start fresh with `default_goal` when
    /// nothing usable is stored. A loaded state is rolled over immediately
    /// if it belongs to an earlier day.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, default_goal: u32) -> Self {
        let now = clock.now();

        let stored = match store.read(READING_GOAL_KEY) {
            Ok(Some(bytes)) => match ReadingGoalState::from_bytes(&bytes) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable reading goal");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read reading goal, starting fresh");
                None
            }
        };

        let Some(state) = stored else {
            debug!(daily_goal = default_goal, "initializing reading goal");
            return Self {
                state: ReadingGoalState::new(default_goal, now.with_timezone(&Utc)),
                store,
                clock,
            };
        };

        let mut repo = Self {
            state,
            store,
            clock,
        };
        if repo.state.reset_if_needed(&now) {
            info!("reading goal rolled over to a new day");
            repo.persist();
        }
        repo
    }

    pub fn state(&self) -> &ReadingGoalState {
        &self.state
    }

    /// Whether `id` is in today's read-set, as currently held in memory.
    /// Does not check for a day rollover.
    pub fn has_read_post(&self, id: PostId) -> bool {
        self.state.contains(&id)
    }

    /// Apply a pending day rollover. Returns `true` if the read-set was
    /// cleared.
    pub fn refresh(&mut self) -> bool {
        let now = self.clock.now();
        if !self.state.reset_if_needed(&now) {
            return false;
        }
        info!("reading goal rolled over to a new day");
        self.persist();
        true
    }

    /// Record that `id` was read today.
    ///
    /// Re-marking a post already read today is a no-op: nothing is written
    /// and no goal signal is produced.
    pub fn mark_post_as_read(&mut self, id: PostId) -> MarkReadOutcome {
        let rolled_over = self.refresh();

        if !self.state.mark_post_as_read(id) {
            debug!(id = %id, rolled_over, "post already read today");
            return MarkReadOutcome::AlreadyRead;
        }

        self.persist();

        let read_count = self.state.read_count();
        let goal_reached = read_count == self.state.daily_goal() as usize;
        if goal_reached {
            info!(daily_goal = self.state.daily_goal(), "daily reading goal reached");
        } else {
            debug!(id = %id, read_count, "post marked as read");
        }

        MarkReadOutcome::Marked {
            read_count,
            goal_reached,
        }
    }

    fn persist(&self) {
        let bytes = match self.state.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to encode reading goal");
                return;
            }
        };
        if let Err(e) = self.store.write(READING_GOAL_KEY, &bytes) {
            warn!(error = %e, "failed to persist reading goal");
        }
    }
}
