use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a goal template is offered for new sessions. Templates are never
/// hard-deleted; retiring one keeps its history attributable.
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
pub enum GoalStatus {
    Active,
    Inactive,
}

/// A therapeutic objective tracked during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub description: String,
    pub status: GoalStatus,
}

impl Goal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            status: GoalStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

/// The client a session is run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub display_name: String,
}

impl Client {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
        }
    }
}
