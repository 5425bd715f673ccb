//! JSON file session store
//!
//! One document per session under a data directory: `game_<sid>.json` for
//! the mutable state, `config_<sid>.json`, `players_<sid>.json` and
//! `backlog_<sid>.json` for the externally-owned fixtures. Writes land in a
//! temp file first and are published by rename, and the game document
//! carries a version stamp so a stale save is refused instead of clobbering
//! a concurrent writer.

use async_trait::async_trait;
use poker_application::ports::directory::SessionDirectory;
use poker_application::ports::state_store::{StateStore, StoreError, Version, VersionedState};
use poker_domain::{
    Backlog, BacklogItem, Card, GameState, ItemId, Player, Roster, SessionConfig, SessionId,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of `game_<sid>.json`
#[derive(Debug, Serialize, Deserialize)]
struct StoredGame {
    version: Version,
    #[serde(flatten)]
    state: GameState,
}

/// File-per-session store rooted at a data directory
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`, creating the directory if
    /// needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            StoreError::Unavailable(format!(
                "could not create data directory {}: {e}",
                data_dir.display()
            ))
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, kind: &str, sid: &SessionId) -> PathBuf {
        // SessionId is validated to [A-Za-z0-9_-], so it is path-safe.
        self.data_dir.join(format!("{kind}_{sid}.json"))
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "could not read {}: {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Unavailable(format!("corrupt document {}: {e}", path.display())))
    }

    /// Write to a sibling temp file, then publish by rename.
    async fn write_json<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Unavailable(format!("could not serialize: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await.map_err(|e| {
            StoreError::Unavailable(format!("could not write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            StoreError::Unavailable(format!("could not publish {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), "document written");
        Ok(())
    }

    fn require<T>(found: Option<T>, what: &str, sid: &SessionId) -> Result<T, StoreError> {
        found.ok_or_else(|| StoreError::Unavailable(format!("no {what} for session {sid}")))
    }

    // --- session bootstrap (thin glue used by the CLI setup command) ---

    pub async fn write_config(
        &self,
        sid: &SessionId,
        config: &SessionConfig,
    ) -> Result<(), StoreError> {
        self.write_json(&self.path_for("config", sid), config).await
    }

    pub async fn write_roster(&self, sid: &SessionId, roster: &Roster) -> Result<(), StoreError> {
        self.write_json(&self.path_for("players", sid), roster.players())
            .await
    }

    pub async fn write_backlog(
        &self,
        sid: &SessionId,
        backlog: &Backlog,
    ) -> Result<(), StoreError> {
        self.write_json(&self.path_for("backlog", sid), backlog.items())
            .await
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self, sid: &SessionId) -> Result<Option<VersionedState>, StoreError> {
        let stored: Option<StoredGame> = self.read_json(&self.path_for("game", sid)).await?;
        Ok(stored.map(|s| VersionedState {
            version: s.version,
            state: s.state,
        }))
    }

    async fn save(
        &self,
        sid: &SessionId,
        state: GameState,
        expected: Option<Version>,
    ) -> Result<Version, StoreError> {
        let path = self.path_for("game", sid);

        let current: Option<StoredGame> = self.read_json(&path).await?;
        if current.map(|s| s.version) != expected {
            return Err(StoreError::VersionConflict);
        }

        let version = expected.unwrap_or(0) + 1;
        self.write_json(&path, &StoredGame { version, state }).await?;
        Ok(version)
    }
}

#[async_trait]
impl SessionDirectory for JsonFileStore {
    async fn roster(&self, sid: &SessionId) -> Result<Roster, StoreError> {
        let players: Option<Vec<Player>> = self.read_json(&self.path_for("players", sid)).await?;
        Ok(Roster::new(Self::require(players, "roster", sid)?))
    }

    async fn backlog(&self, sid: &SessionId) -> Result<Backlog, StoreError> {
        let items: Option<Vec<BacklogItem>> = self.read_json(&self.path_for("backlog", sid)).await?;
        Ok(Backlog::new(Self::require(items, "backlog", sid)?))
    }

    async fn config(&self, sid: &SessionId) -> Result<SessionConfig, StoreError> {
        let config: Option<SessionConfig> = self.read_json(&self.path_for("config", sid)).await?;
        Self::require(config, "config", sid)
    }

    async fn record_estimate(
        &self,
        sid: &SessionId,
        item: &ItemId,
        estimate: Card,
    ) -> Result<(), StoreError> {
        let path = self.path_for("backlog", sid);
        let items: Option<Vec<BacklogItem>> = self.read_json(&path).await?;
        let mut items = Self::require(items, "backlog", sid)?;

        let target = items.iter_mut().find(|i| &i.id == item).ok_or_else(|| {
            StoreError::Unavailable(format!("backlog item {item} missing for session {sid}"))
        })?;
        target.estimate = Some(estimate);

        self.write_json(&path, &items).await
    }
}
