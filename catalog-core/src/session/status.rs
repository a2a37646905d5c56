//! Session status machine.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session identifier as assigned by the host platform.
pub type SessionId = u64;

/// Lifecycle stage of a training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Being drafted, invisible to learners.
    InPreparation,
    /// Learners may register.
    OpenedRegistration,
    /// Started.
    InProgress,
    /// Ended.
    Completed,
    /// Ended long enough ago to leave the catalog.
    Archived,
    /// Called off.
    Cancelled,
}

impl SessionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SessionStatus; 6] = [
        SessionStatus::InPreparation,
        SessionStatus::OpenedRegistration,
        SessionStatus::InProgress,
        SessionStatus::Completed,
        SessionStatus::Archived,
        SessionStatus::Cancelled,
    ];

    /// Status key as stored by the host platform.
    pub const fn key(self) -> &'static str {
        match self {
            SessionStatus::InPreparation => "inpreparation",
            SessionStatus::OpenedRegistration => "openedregistration",
            SessionStatus::InProgress => "inprogress",
            SessionStatus::Completed => "completed",
            SessionStatus::Archived => "archived",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one step.
    pub const fn successors(self) -> &'static [SessionStatus] {
        match self {
            SessionStatus::InPreparation => {
                &[SessionStatus::OpenedRegistration, SessionStatus::Cancelled]
            }
            SessionStatus::OpenedRegistration => {
                &[SessionStatus::InProgress, SessionStatus::Cancelled]
            }
            SessionStatus::InProgress => &[SessionStatus::Completed, SessionStatus::Cancelled],
            SessionStatus::Completed => &[SessionStatus::Archived],
            SessionStatus::Archived | SessionStatus::Cancelled => &[],
        }
    }

    /// Whether `to` is reachable in one step.
    pub fn can_transition_to(self, to: SessionStatus) -> bool {
        self.successors().contains(&to)
    }

    /// No way out.
    pub const fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SessionStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.key() == s)
            .ok_or_else(|| TransitionError::UnknownStatus(s.to_string()))
    }
}

/// Errors raised by status changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The requested move is not an edge of the status machine.
    #[error("session {id}: cannot move from {from} to {to}")]
    NotAllowed {
        /// Session being moved
        id: SessionId,
        /// Current status
        from: SessionStatus,
        /// Requested status
        to: SessionStatus,
    },
    /// A status key that names no status.
    #[error("unknown session status `{0}`")]
    UnknownStatus(String),
}

/// A training session as far as its lifecycle is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier
    pub id: SessionId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Current status
    pub status: SessionStatus,
    /// First day of the session
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Last day of the session
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session in preparation with no dates.
    pub fn new(id: SessionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: SessionStatus::InPreparation,
            start: None,
            end: None,
        }
    }

    /// Moves to `to`, returning the previous status.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotAllowed`] when `to` is not a successor of
    /// the current status; the session is left unchanged.
    pub fn transition(&mut self, to: SessionStatus) -> Result<SessionStatus, TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError::NotAllowed {
                id: self.id,
                from: self.status,
                to,
            });
        }
        Ok(std::mem::replace(&mut self.status, to))
    }
}
