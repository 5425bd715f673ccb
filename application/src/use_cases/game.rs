//! Game use case
//!
//! Maps the transport-facing operations (vote, reveal, advance, coffee
//! break, state read) onto the domain state machine, serializing the
//! writes of each session so that consensus is scored at most once per
//! round and near-simultaneous votes never tear the document.

use crate::ports::directory::SessionDirectory;
use crate::ports::state_store::{StateStore, StoreError, Version};
use chrono::Utc;
use poker_domain::{
    AdvanceOutcome, Card, CoffeeBreak, DomainError, GameState, PlayerId, SessionId,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced to transports
///
/// Every variant carries a stable machine-readable code. `ConcurrentConflict`
/// and `StoreUnavailable` are retryable by re-issuing the whole operation
/// against fresh state; the domain kinds are terminal for the call. A
/// no-consensus verdict is not an error; it comes back as a regular
/// [`AdvanceReport`].
#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("lost a concurrent update race; retry the operation")]
    ConcurrentConflict,
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => GameError::StoreUnavailable(message),
            StoreError::VersionConflict => GameError::ConcurrentConflict,
        }
    }
}

impl GameError {
    /// Stable wire code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::Domain(inner) => inner.code(),
            GameError::StoreUnavailable(_) => "store_unavailable",
            GameError::ConcurrentConflict => "conflict",
        }
    }

    /// Whether re-issuing the operation from scratch can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GameError::StoreUnavailable(_) | GameError::ConcurrentConflict
        )
    }
}

/// Result of an advance: the updated state, the verdict, and the message
/// shown to the table (the no-consensus reason is never swallowed).
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceReport {
    pub state: GameState,
    pub outcome: AdvanceOutcome,
    pub message: String,
}

/// One async mutex per live session id; writes take it, polling reads skip
/// it. The store's version stamp backs the lock up across processes.
#[derive(Default)]
struct SessionLocks {
    inner: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    fn for_session(&self, sid: &SessionId) -> Arc<tokio::sync::Mutex<()>> {
        // A poisoned map only means another thread panicked between two
        // map operations; the map itself is still usable.
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(map.entry(sid.clone()).or_default())
    }
}

/// Use case exposing the estimation operations of a session
pub struct GameUseCase<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
    locks: SessionLocks,
}

impl<S: StateStore, D: SessionDirectory> GameUseCase<S, D> {
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self {
            store,
            directory,
            locks: SessionLocks::default(),
        }
    }

    /// Idempotent state read, safe to poll. Bootstraps the initial document
    /// the first time a session is seen.
    pub async fn state(&self, sid: &SessionId) -> Result<GameState, GameError> {
        if let Some(found) = self.store.load(sid).await? {
            return Ok(found.state);
        }

        // First sight of this session: publish the initial document. Losing
        // the creation race to another poller is fine; theirs is identical.
        let state = GameState::new();
        match self.store.save(sid, state.clone(), None).await {
            Ok(_) => {
                info!(session = %sid, "initialized session state");
                Ok(state)
            }
            Err(StoreError::VersionConflict) => self.reload(sid).await,
            Err(e) => Err(e.into()),
        }
    }

    /// Record a player's vote for the current round and return the updated
    /// state. Re-votes overwrite; reveal status is untouched.
    pub async fn submit_vote(
        &self,
        sid: &SessionId,
        player: PlayerId,
        card: Card,
    ) -> Result<GameState, GameError> {
        let lock = self.locks.for_session(sid);
        let _guard = lock.lock().await;

        let roster = self.directory.roster(sid).await?;
        let backlog = self.directory.backlog(sid).await?;
        let (mut state, expected) = self.load_or_init(sid).await?;

        state
            .round
            .submit_vote(&roster, backlog.len(), player.clone(), card)?;

        self.store.save(sid, state.clone(), expected).await?;
        debug!(session = %sid, player = %player, card = %card, "vote recorded");
        Ok(state)
    }

    /// Make the round's votes visible to everyone. Idempotent.
    pub async fn reveal(&self, sid: &SessionId) -> Result<GameState, GameError> {
        let lock = self.locks.for_session(sid);
        let _guard = lock.lock().await;

        let backlog = self.directory.backlog(sid).await?;
        let (mut state, expected) = self.load_or_init(sid).await?;

        state.round.reveal(backlog.len())?;

        self.store.save(sid, state.clone(), expected).await?;
        info!(session = %sid, votes = state.round.votes.len(), "votes revealed");
        Ok(state)
    }

    /// Score the revealed round: advance the cursor on consensus, open a
    /// fresh voting round otherwise.
    pub async fn advance(&self, sid: &SessionId) -> Result<AdvanceReport, GameError> {
        let lock = self.locks.for_session(sid);
        let _guard = lock.lock().await;

        let config = self.directory.config(sid).await?;
        let backlog = self.directory.backlog(sid).await?;
        let (mut state, expected) = self.load_or_init(sid).await?;

        let outcome = state.round.advance(config.secondary_rule, backlog.len())?;

        // Record the estimate before publishing the advanced state: if the
        // save loses the version race, a retry re-records the same value,
        // which the directory treats as harmless.
        if let AdvanceOutcome::ItemEstimated {
            item_index,
            estimate,
            ..
        } = &outcome
        {
            let item = backlog.get(*item_index).ok_or_else(|| {
                GameError::StoreUnavailable(format!(
                    "backlog item {item_index} missing for session {sid}"
                ))
            })?;
            self.directory
                .record_estimate(sid, &item.id, *estimate)
                .await?;
        }

        self.store.save(sid, state.clone(), expected).await?;

        let message = outcome.message();
        info!(session = %sid, %message, "round scored");
        Ok(AdvanceReport {
            state,
            outcome,
            message,
        })
    }

    /// Start a coffee break ending `minutes` from now. Round state, votes
    /// in flight included, is left exactly as it was.
    pub async fn coffee_break(
        &self,
        sid: &SessionId,
        minutes: i64,
    ) -> Result<CoffeeBreak, GameError> {
        let lock = self.locks.for_session(sid);
        let _guard = lock.lock().await;

        let (mut state, expected) = self.load_or_init(sid).await?;
        state.coffee.begin(Utc::now(), minutes);

        self.store.save(sid, state.clone(), expected).await?;
        info!(session = %sid, minutes, "coffee break started");
        Ok(state.coffee)
    }

    async fn load_or_init(
        &self,
        sid: &SessionId,
    ) -> Result<(GameState, Option<Version>), GameError> {
        match self.store.load(sid).await? {
            Some(found) => Ok((found.state, Some(found.version))),
            None => Ok((GameState::new(), None)),
        }
    }

    async fn reload(&self, sid: &SessionId) -> Result<GameState, GameError> {
        self.store
            .load(sid)
            .await?
            .map(|found| found.state)
            .ok_or_else(|| {
                GameError::StoreUnavailable(format!("session {sid} document vanished"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::state_store::VersionedState;
    use async_trait::async_trait;
    use poker_domain::{
        Backlog, BacklogItem, ItemId, NoConsensusReason, Player, Roster, SecondaryRule,
        SessionConfig,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-test store + directory backed by plain maps.
    #[derive(Default)]
    struct FakeBackend {
        states: Mutex<HashMap<SessionId, VersionedState>>,
        rosters: Mutex<HashMap<SessionId, Roster>>,
        backlogs: Mutex<HashMap<SessionId, Backlog>>,
        configs: Mutex<HashMap<SessionId, SessionConfig>>,
        estimates: Mutex<Vec<(ItemId, Card)>>,
    }

    #[async_trait]
    impl StateStore for FakeBackend {
        async fn load(&self, sid: &SessionId) -> Result<Option<VersionedState>, StoreError> {
            Ok(self.states.lock().unwrap().get(sid).cloned())
        }

        async fn save(
            &self,
            sid: &SessionId,
            state: GameState,
            expected: Option<Version>,
        ) -> Result<Version, StoreError> {
            let mut states = self.states.lock().unwrap();
            let current = states.get(sid).map(|v| v.version);
            if current != expected {
                return Err(StoreError::VersionConflict);
            }
            let version = current.unwrap_or(0) + 1;
            states.insert(sid.clone(), VersionedState { version, state });
            Ok(version)
        }
    }

    #[async_trait]
    impl SessionDirectory for FakeBackend {
        async fn roster(&self, sid: &SessionId) -> Result<Roster, StoreError> {
            self.rosters
                .lock()
                .unwrap()
                .get(sid)
                .cloned()
                .ok_or_else(|| StoreError::Unavailable("no roster".to_string()))
        }

        async fn backlog(&self, sid: &SessionId) -> Result<Backlog, StoreError> {
            self.backlogs
                .lock()
                .unwrap()
                .get(sid)
                .cloned()
                .ok_or_else(|| StoreError::Unavailable("no backlog".to_string()))
        }

        async fn config(&self, sid: &SessionId) -> Result<SessionConfig, StoreError> {
            self.configs
                .lock()
                .unwrap()
                .get(sid)
                .cloned()
                .ok_or_else(|| StoreError::Unavailable("no config".to_string()))
        }

        async fn record_estimate(
            &self,
            _sid: &SessionId,
            item: &ItemId,
            estimate: Card,
        ) -> Result<(), StoreError> {
            self.estimates.lock().unwrap().push((item.clone(), estimate));
            Ok(())
        }
    }

    fn sid() -> SessionId {
        SessionId::parse("sprint-7").unwrap()
    }

    fn backend(rule: SecondaryRule, items: usize) -> Arc<FakeBackend> {
        let backend = Arc::new(FakeBackend::default());
        backend.rosters.lock().unwrap().insert(
            sid(),
            Roster::new(vec![
                Player::new("a", "Alice"),
                Player::new("b", "Bob"),
                Player::new("c", "Carol"),
            ]),
        );
        backend.backlogs.lock().unwrap().insert(
            sid(),
            Backlog::new(
                (0..items)
                    .map(|i| BacklogItem::new(format!("i{i}"), format!("Item {i}")))
                    .collect(),
            ),
        );
        backend
            .configs
            .lock()
            .unwrap()
            .insert(sid(), SessionConfig::new(rule));
        backend
    }

    fn use_case(backend: &Arc<FakeBackend>) -> GameUseCase<FakeBackend, FakeBackend> {
        GameUseCase::new(Arc::clone(backend), Arc::clone(backend))
    }

    async fn cast(
        game: &GameUseCase<FakeBackend, FakeBackend>,
        player: &str,
        value: &str,
    ) -> GameState {
        game.submit_vote(&sid(), PlayerId::from(player), value.parse().unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_state_bootstraps_the_initial_document() {
        let backend = backend(SecondaryRule::Median, 1);
        let game = use_case(&backend);

        let state = game.state(&sid()).await.unwrap();
        assert_eq!(state, GameState::new());
        // and the document is now persisted
        assert!(backend.states.lock().unwrap().contains_key(&sid()));
    }

    #[tokio::test]
    async fn test_end_to_end_median_scenario() {
        // Roster [A,B,C], one item, rule = median.
        let backend = backend(SecondaryRule::Median, 1);
        let game = use_case(&backend);

        // Round 1: 3 / 5 / 8, unanimity fails.
        cast(&game, "a", "3").await;
        cast(&game, "b", "5").await;
        cast(&game, "c", "8").await;
        game.reveal(&sid()).await.unwrap();

        let report = game.advance(&sid()).await.unwrap();
        assert_eq!(
            report.outcome,
            AdvanceOutcome::Revote {
                round: 2,
                reason: NoConsensusReason::Divergent,
            }
        );
        assert_eq!(report.state.round.round, 2);
        assert!(report.state.round.votes.is_empty());
        assert!(!report.state.round.revealed);

        // Round 2: 5 / 5 / 5, the median rule settles it.
        cast(&game, "a", "5").await;
        cast(&game, "b", "5").await;
        cast(&game, "c", "5").await;
        game.reveal(&sid()).await.unwrap();

        let report = game.advance(&sid()).await.unwrap();
        assert_eq!(
            report.outcome,
            AdvanceOutcome::ItemEstimated {
                item_index: 0,
                estimate: Card::Number(5),
                finished: true,
            }
        );
        assert_eq!(report.state.round.cursor, 1);

        let estimates = backend.estimates.lock().unwrap();
        assert_eq!(estimates.as_slice(), &[(ItemId::new("i0"), Card::Number(5))]);
    }

    #[tokio::test]
    async fn test_advance_before_reveal_is_rejected_and_state_kept() {
        let backend = backend(SecondaryRule::Average, 1);
        let game = use_case(&backend);

        cast(&game, "a", "5").await;
        let before = game.state(&sid()).await.unwrap();

        let err = game.advance(&sid()).await.unwrap_err();
        assert_eq!(err.code(), "not_revealed");
        assert!(!err.is_retryable());
        assert_eq!(game.state(&sid()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_vote_from_off_roster_player_is_rejected() {
        let backend = backend(SecondaryRule::Average, 1);
        let game = use_case(&backend);

        let err = game
            .submit_vote(&sid(), PlayerId::from("zz"), Card::Number(5))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_player");
    }

    #[tokio::test]
    async fn test_operations_fail_after_the_backlog_is_done() {
        let backend = backend(SecondaryRule::Median, 1);
        let game = use_case(&backend);

        cast(&game, "a", "8").await;
        game.reveal(&sid()).await.unwrap();
        game.advance(&sid()).await.unwrap(); // unanimous single vote

        let err = game
            .submit_vote(&sid(), PlayerId::from("a"), Card::Number(5))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "task_finished");
        let err = game.reveal(&sid()).await.unwrap_err();
        assert_eq!(err.code(), "task_finished");
    }

    #[tokio::test]
    async fn test_coffee_break_leaves_round_state_untouched() {
        let backend = backend(SecondaryRule::Median, 2);
        let game = use_case(&backend);

        cast(&game, "a", "13").await;
        let before = game.state(&sid()).await.unwrap().round;

        let brk = game.coffee_break(&sid(), 5).await.unwrap();
        assert!(brk.active);
        assert!(brk.is_paused(Utc::now()));

        let after = game.state(&sid()).await.unwrap();
        assert_eq!(after.round, before);
        // and voting keeps working while paused
        cast(&game, "b", "20").await;
    }

    #[tokio::test]
    async fn test_version_conflict_surfaces_as_concurrent_conflict() {
        let backend = backend(SecondaryRule::Median, 1);
        let game = use_case(&backend);
        game.state(&sid()).await.unwrap(); // version 1 exists

        // Another writer bumps the version underneath us.
        backend
            .save(&sid(), GameState::new(), Some(1))
            .await
            .unwrap();

        // Simulate a stale write the way a second process would produce one.
        let err = backend
            .save(&sid(), GameState::new(), Some(1))
            .await
            .unwrap_err();
        let err: GameError = err.into();
        assert_eq!(err.code(), "conflict");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_concurrent_votes_are_both_recorded() {
        let backend = backend(SecondaryRule::Median, 1);
        let game = Arc::new(use_case(&backend));

        let g1 = Arc::clone(&game);
        let g2 = Arc::clone(&game);
        let t1 = tokio::spawn(async move {
            g1.submit_vote(&sid(), PlayerId::from("a"), Card::Number(5))
                .await
        });
        let t2 = tokio::spawn(async move {
            g2.submit_vote(&sid(), PlayerId::from("b"), Card::Number(8))
                .await
        });
        t1.await.unwrap().unwrap();
        t2.await.unwrap().unwrap();

        let state = game.state(&sid()).await.unwrap();
        assert_eq!(state.round.votes.len(), 2);
    }
}
