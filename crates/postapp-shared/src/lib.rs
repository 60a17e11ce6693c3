//! # postapp-shared
//!
//! Domain types shared by the PostApp client and server: post records, the
//! daily reading-goal state machine, validation errors and constants.

pub mod constants;
pub mod error;
pub mod post;
pub mod reading_goal;
pub mod types;

pub use error::{GoalStateError, ValidationError};
pub use post::{NewPost, PostRecord};
pub use reading_goal::ReadingGoalState;
pub use types::PostId;
