//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant maps to a stable machine-readable code so transports can
/// surface the kind, not only the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown player: {0}")]
    InvalidPlayer(String),

    #[error("'{0}' is not a card of the deck")]
    InvalidCard(String),

    #[error("the backlog is fully estimated")]
    TaskFinished,

    #[error("votes are still hidden; reveal them before scoring the round")]
    NotRevealed,

    #[error("invalid session id: {0}")]
    InvalidSessionId(String),
}

impl DomainError {
    /// Stable wire code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidPlayer(_) => "invalid_player",
            DomainError::InvalidCard(_) => "invalid_card",
            DomainError::TaskFinished => "task_finished",
            DomainError::NotRevealed => "not_revealed",
            DomainError::InvalidSessionId(_) => "invalid_session_id",
        }
    }
}
