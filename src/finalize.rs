use crate::session::ActiveSession;
use crate::trial::CueLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which device recorded the session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum SessionOrigin {
    Phone,
    Watch,
}

/// One persisted trial, tied to the stored session's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalLogRecord {
    pub session_id: Uuid,
    pub goal_id: Uuid,
    pub goal_description: String,
    pub success: bool,
    pub cue_level: CueLevel,
    pub timestamp: DateTime<Utc>,
}

/// Durable form of a finished session, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistableSession {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub origin: SessionOrigin,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub logs: Vec<GoalLogRecord>,
}

/// Freeze an active session into its durable form. Pure transformation; the
/// caller hands the bundle to a [`SessionStore`](crate::store::SessionStore).
///
/// The stored session gets a freshly minted id; the in-memory id was only
/// ever provisional and is dropped here.
pub fn finalize(session: &ActiveSession, origin: SessionOrigin) -> PersistableSession {
    let id = Uuid::new_v4();
    let logs = session
        .trials()
        .iter()
        .map(|t| GoalLogRecord {
            session_id: id,
            goal_id: t.goal_id,
            goal_description: t.goal_description.clone(),
            success: t.success,
            cue_level: t.cue_level,
            timestamp: t.timestamp,
        })
        .collect();

    PersistableSession {
        id,
        client_id: session.client.id,
        client_name: session.client.display_name.clone(),
        origin,
        started_at: session.started_at(),
        ended_at: session.started_at() + session.session_duration(),
        logs,
    }
}
