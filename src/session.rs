use crate::clock::{Clock, SystemClock};
use crate::goal::{Client, Goal};
use crate::stats::{self, CueLevelBreakdown, GoalStatistic};
use crate::trial::{CueLevel, TrialEntry};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session requires at least one goal")]
    NoGoals,
}

/// In-memory state of a running session: which goal is up, every trial logged
/// so far, and derived metrics computed on demand.
///
/// Single-owner by design. The goal list is fixed for the session's lifetime;
/// the trial sequence grows only through [`add_trial`](Self::add_trial) and
/// shrinks only through the LIFO [`remove_last_trial`](Self::remove_last_trial).
#[derive(Debug)]
pub struct ActiveSession {
    pub id: Uuid,
    pub client: Client,
    goals: Vec<Goal>,
    current_goal_index: usize,
    trials: Vec<TrialEntry>,
    started_at: DateTime<Utc>,
    clock: Box<dyn Clock>,
}

impl ActiveSession {
    pub fn new(client: Client, goals: Vec<Goal>) -> Result<Self, SessionError> {
        Self::with_clock(client, goals, Box::new(SystemClock))
    }

    pub fn with_clock(
        client: Client,
        goals: Vec<Goal>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SessionError> {
        if goals.is_empty() {
            return Err(SessionError::NoGoals);
        }
        let started_at = clock.now();
        Ok(Self {
            id: Uuid::new_v4(),
            client,
            goals,
            current_goal_index: 0,
            trials: Vec::new(),
            started_at,
            clock,
        })
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn trials(&self) -> &[TrialEntry] {
        &self.trials
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_goal_index(&self) -> usize {
        self.current_goal_index
    }

    /// The goal subsequent trials will be attributed to.
    pub fn current_goal(&self) -> Option<&Goal> {
        self.goals.get(self.current_goal_index)
    }

    /// Advance to the next goal; clamped at the last goal, no wraparound.
    pub fn move_to_next_goal(&mut self) {
        if self.current_goal_index < self.goals.len() - 1 {
            self.current_goal_index += 1;
        }
    }

    /// Step back one goal; clamped at the first.
    pub fn move_to_previous_goal(&mut self) {
        if self.current_goal_index > 0 {
            self.current_goal_index -= 1;
        }
    }

    /// Jump straight to a goal. An out-of-range index is ignored, keeping the
    /// index invariant without an error channel (see DESIGN.md).
    pub fn set_goal_index(&mut self, index: usize) {
        if index < self.goals.len() {
            self.current_goal_index = index;
        }
    }

    /// Log one trial against the current goal, snapshotting its description.
    pub fn add_trial(&mut self, success: bool, cue_level: CueLevel) {
        // current_goal_index is always in range, so the goal exists.
        let goal = &self.goals[self.current_goal_index];
        self.trials.push(TrialEntry {
            goal_id: goal.id,
            goal_description: goal.description.clone(),
            success,
            cue_level,
            timestamp: self.clock.now(),
        });
    }

    /// Undo the most recent trial. `None` means there was nothing to undo;
    /// callers treat that as a normal outcome, not a failure.
    pub fn remove_last_trial(&mut self) -> Option<TrialEntry> {
        self.trials.pop()
    }

    pub fn session_duration(&self) -> Duration {
        self.clock.now() - self.started_at
    }

    pub fn total_trials(&self) -> usize {
        self.trials.len()
    }

    pub fn success_count(&self) -> usize {
        self.trials.iter().filter(|t| t.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.trials.iter().filter(|t| !t.success).count()
    }

    /// 0.0..=1.0 across all goals; 0.0 before any trials are logged.
    pub fn success_rate(&self) -> f64 {
        if self.trials.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.trials.len() as f64
        }
    }

    /// Whole-number percentage, rounded down, for performance-band lookup.
    pub fn success_rate_percent(&self) -> i64 {
        (self.success_rate() * 100.0).floor() as i64
    }

    pub fn all_goal_statistics(&self) -> Vec<GoalStatistic> {
        stats::all_statistics(&self.goals, &self.trials)
    }

    pub fn cue_level_breakdown(&self) -> CueLevelBreakdown {
        stats::cue_level_breakdown(&self.trials)
    }
}
