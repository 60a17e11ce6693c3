use serde::Serialize;
use tokio::sync::broadcast;

use postapp_shared::PostId;

pub const EVENT_GOAL_REACHED: &str = "goal-reached";
pub const EVENT_POST_CREATED: &str = "post-created";
pub const EVENT_POST_DELETED: &str = "post-deleted";

const CHANNEL_CAPACITY: usize = 64;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Today's read count just reached the daily goal.
    #[serde(rename_all = "camelCase")]
    GoalReached { daily_goal: u32 },
    #[serde(rename_all = "camelCase")]
    PostCreated { post_id: PostId },
    #[serde(rename_all = "camelCase")]
    PostDeleted { post_id: PostId },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoalReached { .. } => EVENT_GOAL_REACHED,
            Self::PostCreated { .. } => EVENT_POST_CREATED,
            Self::PostDeleted { .. } => EVENT_POST_DELETED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: ClientEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            tracing::debug!(event = name, "No subscribers for event");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
