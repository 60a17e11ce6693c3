//! Daily reading goal state machine.
//!
//! The state tracks which posts were read since the last daily reset. A
//! reset happens lazily, when the calendar day of the check differs from
//! the calendar day of the previous reset (both seen in the caller's
//! timezone). Elapsed time is irrelevant: 23:59 -> 00:01 resets, a 20 hour
//! gap inside one day does not.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalStateError;
use crate::types::PostId;

/// Persisted reading goal progress.
///
/// Serialized as a JSON object with `dailyGoal`, `postsReadToday` and
/// `lastResetDate` keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGoalState {
    daily_goal: u32,
    posts_read_today: HashSet<PostId>,
    last_reset_date: DateTime<Utc>,
}

impl ReadingGoalState {
    /// Fresh state with no progress, whose day starts at `now`.
    pub fn new(daily_goal: u32, now: DateTime<Utc>) -> Self {
        Self {
            daily_goal,
            posts_read_today: HashSet::new(),
            last_reset_date: now,
        }
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    pub fn last_reset_date(&self) -> DateTime<Utc> {
        self.last_reset_date
    }

    pub fn posts_read_today(&self) -> &HashSet<PostId> {
        &self.posts_read_today
    }

    pub fn read_count(&self) -> usize {
        self.posts_read_today.len()
    }

    /// Fraction of the goal completed, clamped to `[0.0, 1.0]`.
    /// A zero goal reports `0.0`.
    pub fn progress(&self) -> f64 {
        if self.daily_goal == 0 {
            return 0.0;
        }
        (self.read_count() as f64 / f64::from(self.daily_goal)).min(1.0)
    }

    pub fn is_goal_reached(&self) -> bool {
        self.read_count() >= self.daily_goal as usize
    }

    /// Posts still needed today.
    pub fn remaining(&self) -> usize {
        (self.daily_goal as usize).saturating_sub(self.read_count())
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.posts_read_today.contains(id)
    }

    /// Add `id` to today's read-set. Returns `false` if it was already there.
    pub fn mark_post_as_read(&mut self, id: PostId) -> bool {
        self.posts_read_today.insert(id)
    }

    /// Clear today's read-set when `now` falls on a different calendar day
    /// than the last reset, as seen in `now`'s timezone. Returns `true` when
    /// a reset happened.
    pub fn reset_if_needed<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let last_day = self
            .last_reset_date
            .with_timezone(&now.timezone())
            .date_naive();
        if last_day == now.date_naive() {
            return false;
        }
        self.posts_read_today.clear();
        self.last_reset_date = now.with_timezone(&Utc);
        true
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GoalStateError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GoalStateError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 5, day, hour, min, 0)
            .unwrap()
    }

    fn state(goal: u32) -> ReadingGoalState {
        ReadingGoalState::new(goal, at(23, 9, 0).with_timezone(&Utc))
    }

    #[test]
    fn test_progress_and_signal_scenario() {
        let mut goal = state(2);
        let (a, b, c) = (PostId::new(), PostId::new(), PostId::new());

        assert!(goal.mark_post_as_read(a));
        assert_eq!(goal.read_count(), 1);
        assert_eq!(goal.progress(), 0.5);
        assert!(!goal.is_goal_reached());

        assert!(!goal.mark_post_as_read(a));
        assert_eq!(goal.read_count(), 1);

        assert!(goal.mark_post_as_read(b));
        assert_eq!(goal.progress(), 1.0);
        assert!(goal.is_goal_reached());
        assert_eq!(goal.remaining(), 0);

        assert!(goal.mark_post_as_read(c));
        assert_eq!(goal.read_count(), 3);
        assert_eq!(goal.progress(), 1.0);
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let mut goal = state(3);
        let mut last = goal.progress();
        for _ in 0..6 {
            goal.mark_post_as_read(PostId::new());
            let p = goal.progress();
            assert!(p >= last);
            assert!(p <= 1.0);
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_zero_goal_reports_zero_progress() {
        let mut goal = state(0);
        goal.mark_post_as_read(PostId::new());
        assert_eq!(goal.progress(), 0.0);
        assert!(goal.is_goal_reached());
        assert_eq!(goal.remaining(), 0);
    }

    #[test]
    fn test_reset_same_day_is_noop() {
        let mut goal = state(5);
        goal.mark_post_as_read(PostId::new());

        assert!(!goal.reset_if_needed(&at(23, 23, 59)));
        assert!(!goal.reset_if_needed(&at(23, 23, 59)));
        assert_eq!(goal.read_count(), 1);
        assert_eq!(goal.last_reset_date(), at(23, 9, 0).with_timezone(&Utc));
    }

    #[test]
    fn test_reset_across_midnight() {
        let mut goal = ReadingGoalState::new(5, at(23, 23, 59).with_timezone(&Utc));
        goal.mark_post_as_read(PostId::new());

        let after_midnight = at(24, 0, 1);
        assert!(goal.reset_if_needed(&after_midnight));
        assert_eq!(goal.read_count(), 0);
        assert_eq!(goal.last_reset_date(), after_midnight.with_timezone(&Utc));

        assert!(!goal.reset_if_needed(&at(24, 18, 0)));
    }

    #[test]
    fn test_reset_uses_callers_timezone() {
        // 23:30 UTC on the 22nd is already the 23rd at UTC+2.
        let reset = Utc.with_ymd_and_hms(2025, 5, 22, 23, 30, 0).unwrap();
        let mut goal = ReadingGoalState::new(5, reset);
        goal.mark_post_as_read(PostId::new());

        assert!(!goal.reset_if_needed(&at(23, 10, 0)));
        assert!(goal.reset_if_needed(&Utc.with_ymd_and_hms(2025, 5, 23, 10, 0, 0).unwrap()));
    }

    #[test]
    fn test_blob_field_names() {
        let mut goal = state(2);
        let id = PostId::new();
        goal.mark_post_as_read(id);

        let value: serde_json::Value = serde_json::from_slice(&goal.to_bytes().unwrap()).unwrap();
        assert_eq!(value["dailyGoal"], 2);
        assert_eq!(value["postsReadToday"][0], id.to_string());
        assert!(value["lastResetDate"].is_string());

        let decoded = ReadingGoalState::from_bytes(&goal.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, goal);
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        assert!(ReadingGoalState::from_bytes(b"{not json").is_err());
        assert!(ReadingGoalState::from_bytes(br#"{"dailyGoal": "five"}"#).is_err());
    }
}
