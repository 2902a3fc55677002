use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Degree of prompting a client needed for a trial, in decreasing
/// independence.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum CueLevel {
    Independent,
    Minimal,
    Moderate,
    Maximal,
}

impl CueLevel {
    /// Fixed display order, most independent first.
    pub const ALL: [CueLevel; 4] = [
        CueLevel::Independent,
        CueLevel::Minimal,
        CueLevel::Moderate,
        CueLevel::Maximal,
    ];
}

/// One attempt at a goal. Immutable once logged; removable only via the
/// session's LIFO undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialEntry {
    pub goal_id: Uuid,
    /// Description frozen at logging time, so later template edits do not
    /// rewrite history.
    pub goal_description: String,
    pub success: bool,
    pub cue_level: CueLevel,
    pub timestamp: DateTime<Utc>,
}
