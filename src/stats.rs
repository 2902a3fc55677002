use crate::goal::Goal;
use crate::trial::{CueLevel, TrialEntry};
use itertools::Itertools;
use uuid::Uuid;

/// Per-goal aggregate derived from the trial sequence. Never stored;
/// recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalStatistic {
    pub goal_id: Uuid,
    pub success_count: usize,
    pub total_count: usize,
    /// 0.0..=1.0, defined as 0.0 for a goal with no trials.
    pub success_rate: f64,
}

/// Trial counts per cue level across the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CueLevelBreakdown {
    pub independent: usize,
    pub minimal: usize,
    pub moderate: usize,
    pub maximal: usize,
}

impl CueLevelBreakdown {
    pub fn count_for(&self, level: CueLevel) -> usize {
        match level {
            CueLevel::Independent => self.independent,
            CueLevel::Minimal => self.minimal,
            CueLevel::Moderate => self.moderate,
            CueLevel::Maximal => self.maximal,
        }
    }
}

/// Coarse band for a success-rate percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    NeedsWork,
}

pub fn statistics_for_goal(goal_id: Uuid, trials: &[TrialEntry]) -> GoalStatistic {
    let total_count = trials.iter().filter(|t| t.goal_id == goal_id).count();
    let success_count = trials
        .iter()
        .filter(|t| t.goal_id == goal_id && t.success)
        .count();
    let success_rate = if total_count > 0 {
        success_count as f64 / total_count as f64
    } else {
        0.0
    };

    GoalStatistic {
        goal_id,
        success_count,
        total_count,
        success_rate,
    }
}

/// Statistics in goal display order, not trial insertion order.
pub fn all_statistics(goals: &[Goal], trials: &[TrialEntry]) -> Vec<GoalStatistic> {
    goals
        .iter()
        .map(|g| statistics_for_goal(g.id, trials))
        .collect()
}

pub fn cue_level_breakdown(trials: &[TrialEntry]) -> CueLevelBreakdown {
    let counts = trials.iter().map(|t| t.cue_level).counts();
    CueLevelBreakdown {
        independent: counts.get(&CueLevel::Independent).copied().unwrap_or(0),
        minimal: counts.get(&CueLevel::Minimal).copied().unwrap_or(0),
        moderate: counts.get(&CueLevel::Moderate).copied().unwrap_or(0),
        maximal: counts.get(&CueLevel::Maximal).copied().unwrap_or(0),
    }
}

/// Band lookup over an integer percentage. Out-of-range input is clamped
/// rather than rejected.
pub fn performance_level(success_rate_percent: i64) -> PerformanceLevel {
    match success_rate_percent.clamp(0, 100) {
        85..=100 => PerformanceLevel::Excellent,
        70..=84 => PerformanceLevel::Good,
        _ => PerformanceLevel::NeedsWork,
    }
}
