//! Session configuration
//!
//! Read-only input to the core: who plays from where and which fallback
//! rule scores rounds two and up. Round 1 is always strict unanimity and is
//! not configurable.

use crate::consensus::SecondaryRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How players share the table.
///
/// Affects only whose identity submits a vote (each device its own player
/// vs. one device passed around), never the scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Distributed: every player votes from their own device
    #[default]
    Remote,
    /// Co-located: one shared device, players take turns
    Local,
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayMode::Remote => write!(f, "remote"),
            PlayMode::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" | "distributed" => Ok(PlayMode::Remote),
            "local" | "colocated" => Ok(PlayMode::Local),
            _ => Err(format!("Invalid play mode: {}. Valid: remote, local", s)),
        }
    }
}

/// Per-session configuration (read-only to the core)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub play_mode: PlayMode,
    pub secondary_rule: SecondaryRule,
}

impl SessionConfig {
    pub fn new(secondary_rule: SecondaryRule) -> Self {
        Self {
            project_name: None,
            play_mode: PlayMode::default(),
            secondary_rule,
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_play_mode(mut self, mode: PlayMode) -> Self {
        self.play_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_mode_parse() {
        assert_eq!("remote".parse::<PlayMode>().ok(), Some(PlayMode::Remote));
        assert_eq!("local".parse::<PlayMode>().ok(), Some(PlayMode::Local));
        assert!("hybrid".parse::<PlayMode>().is_err());
    }

    #[test]
    fn test_config_serde_uses_snake_case_rule_names() {
        let config = SessionConfig::new(SecondaryRule::AbsoluteMajority)
            .with_project_name("apollo")
            .with_play_mode(PlayMode::Local);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"absolute_majority\""));
        assert!(json.contains("\"local\""));

        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
