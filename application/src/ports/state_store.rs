//! Session state store port
//!
//! Persistence is an external responsibility. The store keeps one session
//! document per id and makes read-then-write safe through a version stamp:
//! every save names the version it read, and a save against a stale version
//! is refused instead of silently overwriting the other writer.

use async_trait::async_trait;
use poker_domain::{GameState, SessionId};
use thiserror::Error;

/// Monotonic per-session version stamp.
pub type Version = u64;

/// Errors from store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or read. Transient; callers
    /// re-issue the whole operation.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// The compare-and-swap lost: the document changed underneath the
    /// write. Callers retry from a fresh load, never from a stale delta.
    #[error("session state changed underneath the write")]
    VersionConflict,
}

/// A loaded session document together with its version stamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedState {
    pub version: Version,
    pub state: GameState,
}

/// Port for session state persistence
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the session document, if one exists.
    async fn load(&self, sid: &SessionId) -> Result<Option<VersionedState>, StoreError>;

    /// Publish a new document version.
    ///
    /// `expected` is the version the caller read (`None` to create). A
    /// mismatch fails with [`StoreError::VersionConflict`] and leaves the
    /// stored document untouched. Returns the new version.
    async fn save(
        &self,
        sid: &SessionId,
        state: GameState,
        expected: Option<Version>,
    ) -> Result<Version, StoreError>;
}
