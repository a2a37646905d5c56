//! Date-driven status tasks.
//!
//! The host runs these on a schedule; here they are plain functions over a
//! slice of sessions and an explicit `now`, so a run is reproducible.

use catalog_types::SessionConfig;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::session::status::{Session, SessionId, SessionStatus};

/// One of the scheduled status tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Start sessions whose start date has come.
    Open,
    /// Complete sessions whose end date has passed.
    Close,
    /// Archive sessions completed long enough ago.
    Archive,
}

impl Task {
    /// Task name, as logged.
    pub const fn name(self) -> &'static str {
        match self {
            Task::Open => "open_sessions",
            Task::Close => "close_sessions",
            Task::Archive => "archive_sessions",
        }
    }

    /// Status a session must be in to be considered.
    pub const fn from(self) -> SessionStatus {
        match self {
            Task::Open => SessionStatus::OpenedRegistration,
            Task::Close => SessionStatus::InProgress,
            Task::Archive => SessionStatus::Completed,
        }
    }

    /// Status a due session moves to.
    pub const fn to(self) -> SessionStatus {
        match self {
            Task::Open => SessionStatus::InProgress,
            Task::Close => SessionStatus::Completed,
            Task::Archive => SessionStatus::Archived,
        }
    }
}

/// Outcome of one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Task that ran
    pub task: Task,
    /// Sessions moved, in slice order
    pub transitioned: Vec<SessionId>,
}

/// Runs the status tasks with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTasks {
    config: SessionConfig,
}

impl SessionTasks {
    /// Creates the task runner.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Moves registration-open sessions whose start is at or before `now` to in progress.
    pub fn open_sessions(&self, sessions: &mut [Session], now: DateTime<Utc>) -> TaskReport {
        self.run(Task::Open, sessions, now)
    }

    /// Moves in-progress sessions whose end is at or before `now` to completed.
    pub fn close_sessions(&self, sessions: &mut [Session], now: DateTime<Utc>) -> TaskReport {
        self.run(Task::Close, sessions, now)
    }

    /// Moves completed sessions to archived once `archive_delay_days` have
    /// elapsed since their end.
    pub fn archive_sessions(&self, sessions: &mut [Session], now: DateTime<Utc>) -> TaskReport {
        self.run(Task::Archive, sessions, now)
    }

    /// Runs open, close then archive, so overdue sessions catch up in one pass.
    pub fn run_all(&self, sessions: &mut [Session], now: DateTime<Utc>) -> [TaskReport; 3] {
        [
            self.open_sessions(sessions, now),
            self.close_sessions(sessions, now),
            self.archive_sessions(sessions, now),
        ]
    }

    fn run(&self, task: Task, sessions: &mut [Session], now: DateTime<Utc>) -> TaskReport {
        let mut transitioned = Vec::new();

        for session in sessions.iter_mut() {
            if session.status != task.from() || !self.is_due(task, session, now) {
                continue;
            }

            match session.transition(task.to()) {
                Ok(from) => {
                    info!(task = task.name(), id = session.id, %from, to = %session.status, "session transitioned");
                    transitioned.push(session.id);
                }
                Err(err) => warn!(task = task.name(), %err, "session left unchanged"),
            }
        }

        debug!(task = task.name(), moved = transitioned.len(), "task finished");
        TaskReport { task, transitioned }
    }

    fn is_due(&self, task: Task, session: &Session, now: DateTime<Utc>) -> bool {
        match task {
            Task::Open => session.start.is_some_and(|start| start <= now),
            Task::Close => session.end.is_some_and(|end| end <= now),
            Task::Archive => session
                .end
                .and_then(|end| {
                    end.checked_add_signed(Duration::days(i64::from(self.config.archive_delay_days)))
                })
                .is_some_and(|due| due <= now),
        }
    }
}
