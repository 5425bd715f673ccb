//! Session directory port
//!
//! Roster, backlog and configuration are owned by external collaborators
//! (the pages that bootstrap a session); this core only reads them, except
//! for recording the accepted estimate per item.

use super::state_store::StoreError;
use async_trait::async_trait;
use poker_domain::{Backlog, Card, ItemId, Roster, SessionConfig, SessionId};

/// Port for the externally-owned session fixtures
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// The session's player roster (ordered, unique ids).
    async fn roster(&self, sid: &SessionId) -> Result<Roster, StoreError>;

    /// The session's ordered backlog.
    async fn backlog(&self, sid: &SessionId) -> Result<Backlog, StoreError>;

    /// The session's play mode and secondary rule.
    async fn config(&self, sid: &SessionId) -> Result<SessionConfig, StoreError>;

    /// Record the accepted estimate against a backlog item. Overwriting an
    /// earlier record with the same value must be harmless.
    async fn record_estimate(
        &self,
        sid: &SessionId,
        item: &ItemId,
        estimate: Card,
    ) -> Result<(), StoreError>;
}
