// Library surface for the session core and its storage collaborators.
// Keep this lean; frontends compose their own stack on top.
pub mod clock;
pub mod config;
pub mod export;
pub mod finalize;
pub mod goal;
pub mod session;
pub mod stats;
pub mod store;
pub mod trial;

pub use finalize::{finalize, GoalLogRecord, PersistableSession, SessionOrigin};
pub use goal::{Client, Goal, GoalStatus};
pub use session::{ActiveSession, SessionError};
pub use stats::{
    all_statistics, cue_level_breakdown, performance_level, statistics_for_goal,
    CueLevelBreakdown, GoalStatistic, PerformanceLevel,
};
pub use store::{SessionStore, SqliteSessionStore, StoreError};
pub use trial::{CueLevel, TrialEntry};
