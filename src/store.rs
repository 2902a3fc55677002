use crate::finalize::{GoalLogRecord, PersistableSession, SessionOrigin};
use crate::goal::{Goal, GoalStatus};
use crate::trial::CueLevel;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Errors surfaced by session stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One line in a session listing; the full bundle is a separate load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: Uuid,
    pub client_name: String,
    pub origin: SessionOrigin,
    pub started_at: DateTime<Utc>,
    pub log_count: usize,
}

/// Storage collaborator: durably writes finalized session bundles and serves
/// as the goal-template catalog. Backends are interchangeable behind this
/// trait; the composition root owns the instance and passes it down.
pub trait SessionStore {
    fn save_session(&mut self, bundle: &PersistableSession) -> Result<()>;
    fn load_session(&self, id: Uuid) -> Result<Option<PersistableSession>>;
    /// Newest first.
    fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    fn save_goal_template(&mut self, goal: &Goal) -> Result<()>;
    fn set_goal_status(&mut self, goal_id: Uuid, status: GoalStatus) -> Result<()>;
    /// Active templates only, in description order.
    fn active_goals(&self) -> Result<Vec<Goal>>;
}

/// SQLite-backed store shared by every frontend.
#[derive(Debug)]
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    /// Open (or create) the database at the default location.
    pub fn new() -> Result<Self> {
        let db_path = Self::default_db_path().unwrap_or_else(|| PathBuf::from("trialog.db"));
        Self::with_path(db_path)
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Database file path, preferring `$HOME/.local/state/trialog`.
    fn default_db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("trialog");
            Some(state_dir.join("sessions.db"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "trialog") {
            Some(proj_dirs.data_local_dir().join("sessions.db"))
        } else {
            None
        }
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                client_id TEXT NOT NULL,
                client_name TEXT NOT NULL,
                origin TEXT NOT NULL,
                started_at TEXT NOT NULL,
                ended_at TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS goal_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                goal_id TEXT NOT NULL,
                goal_description TEXT NOT NULL,
                success BOOLEAN NOT NULL,
                cue_level TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS goal_templates (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                status TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_goal_logs_session ON goal_logs(session_id)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at)",
            [],
        )?;

        Ok(())
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| StoreError::CorruptRow(format!("bad timestamp: {}", raw)))
    }

    fn parse_uuid(raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw).map_err(|_| StoreError::CorruptRow(format!("bad uuid: {}", raw)))
    }

    fn load_logs(&self, session_id: Uuid) -> Result<Vec<GoalLogRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT goal_id, goal_description, success, cue_level, timestamp
            FROM goal_logs
            WHERE session_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([session_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let (goal_id, goal_description, success, cue_level, timestamp) = row?;
            logs.push(GoalLogRecord {
                session_id,
                goal_id: Self::parse_uuid(&goal_id)?,
                goal_description,
                success,
                cue_level: cue_level
                    .parse::<CueLevel>()
                    .map_err(|_| StoreError::CorruptRow(format!("bad cue level: {}", cue_level)))?,
                timestamp: Self::parse_timestamp(&timestamp)?,
            });
        }
        Ok(logs)
    }
}

impl SessionStore for SqliteSessionStore {
    fn save_session(&mut self, bundle: &PersistableSession) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO sessions (id, client_id, client_name, origin, started_at, ended_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                bundle.id.to_string(),
                bundle.client_id.to_string(),
                bundle.client_name,
                bundle.origin.to_string(),
                bundle.started_at.to_rfc3339(),
                bundle.ended_at.to_rfc3339(),
            ],
        )?;

        for log in &bundle.logs {
            tx.execute(
                r#"
                INSERT INTO goal_logs
                (session_id, goal_id, goal_description, success, cue_level, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    log.session_id.to_string(),
                    log.goal_id.to_string(),
                    log.goal_description,
                    log.success,
                    log.cue_level.to_string(),
                    log.timestamp.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        debug!(session = %bundle.id, logs = bundle.logs.len(), "session saved");
        Ok(())
    }

    fn load_session(&self, id: Uuid) -> Result<Option<PersistableSession>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT client_id, client_name, origin, started_at, ended_at
            FROM sessions
            WHERE id = ?1
            "#,
        )?;

        let row = stmt
            .query_map([id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .next();

        let Some(row) = row else {
            return Ok(None);
        };
        let (client_id, client_name, origin, started_at, ended_at) = row?;

        Ok(Some(PersistableSession {
            id,
            client_id: Self::parse_uuid(&client_id)?,
            client_name,
            origin: origin
                .parse::<SessionOrigin>()
                .map_err(|_| StoreError::CorruptRow(format!("bad origin: {}", origin)))?,
            started_at: Self::parse_timestamp(&started_at)?,
            ended_at: Self::parse_timestamp(&ended_at)?,
            logs: self.load_logs(id)?,
        }))
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.id, s.client_name, s.origin, s.started_at,
                   (SELECT COUNT(*) FROM goal_logs g WHERE g.session_id = s.id)
            FROM sessions s
            ORDER BY s.started_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, client_name, origin, started_at, log_count) = row?;
            summaries.push(SessionSummary {
                id: Self::parse_uuid(&id)?,
                client_name,
                origin: origin
                    .parse::<SessionOrigin>()
                    .map_err(|_| StoreError::CorruptRow(format!("bad origin: {}", origin)))?,
                started_at: Self::parse_timestamp(&started_at)?,
                log_count: log_count as usize,
            });
        }
        Ok(summaries)
    }

    fn save_goal_template(&mut self, goal: &Goal) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO goal_templates (id, description, status)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET description = ?2, status = ?3
            "#,
            params![
                goal.id.to_string(),
                goal.description,
                goal.status.to_string()
            ],
        )?;
        debug!(goal = %goal.id, "goal template saved");
        Ok(())
    }

    fn set_goal_status(&mut self, goal_id: Uuid, status: GoalStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE goal_templates SET status = ?2 WHERE id = ?1",
            params![goal_id.to_string(), status.to_string()],
        )?;
        Ok(())
    }

    fn active_goals(&self) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, description, status
            FROM goal_templates
            WHERE status = 'Active'
            ORDER BY description
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut goals = Vec::new();
        for row in rows {
            let (id, description) = row?;
            goals.push(Goal {
                id: Self::parse_uuid(&id)?,
                description,
                status: GoalStatus::Active,
            });
        }
        Ok(goals)
    }
}
