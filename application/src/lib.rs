//! Application layer for planning-poker
//!
//! This crate contains the use case that serializes a session's operations
//! and the port definitions its collaborators implement. It depends only on
//! the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{SessionDirectory, StateStore, StoreError, Version, VersionedState};
pub use use_cases::{AdvanceReport, GameError, GameUseCase};
