//! Application configuration
//!
//! File-level settings for running the table: where session documents live
//! and how long a coffee break runs by default. Merged from defaults, the
//! user's global config and a project-local file.

pub mod loader;

use poker_domain::DEFAULT_BREAK_MINUTES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::ConfigLoader;

/// Settings loaded from `poker.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Directory holding the per-session JSON documents.
    pub data_dir: PathBuf,
    /// Default coffee-break length in minutes.
    pub pause_minutes: i64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            pause_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}
