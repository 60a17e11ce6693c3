use serde::Serialize;

use postapp_shared::ReadingGoalState;

use crate::state::AppState;

/// What the reading goal widget shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGoalDto {
    pub daily_goal: u32,
    pub read_count: usize,
    /// Fraction in `[0.0, 1.0]`.
    pub progress: f64,
    /// `progress` as a whole percentage, truncated.
    pub percent: u8,
    pub is_goal_reached: bool,
    pub remaining: usize,
    pub message: String,
}

impl From<&ReadingGoalState> for ReadingGoalDto {
    fn from(state: &ReadingGoalState) -> Self {
        let remaining = state.remaining();
        let message = if state.is_goal_reached() {
            "Goal Reached!".to_string()
        } else {
            let plural = if remaining == 1 { "" } else { "s" };
            format!("Read {remaining} more post{plural} to reach your goal!")
        };
        Self {
            daily_goal: state.daily_goal(),
            read_count: state.read_count(),
            progress: state.progress(),
            percent: (state.progress() * 100.0) as u8,
            is_goal_reached: state.is_goal_reached(),
            remaining,
            message,
        }
    }
}

/// Today's progress. Applies a pending day rollover first so a widget shown
/// after midnight starts from zero.
pub fn reading_goal(state: &AppState) -> ReadingGoalDto {
    let mut goal = state.reading_goal();
    goal.refresh();
    ReadingGoalDto::from(goal.state())
}
