//! Domain layer for planning-poker
//!
//! This crate contains the core estimation logic and value objects. It has
//! no dependencies on infrastructure or transport concerns.
//!
//! # Core Concepts
//!
//! ## Blind-then-reveal rounds
//!
//! Players vote hidden cards on the current backlog item, the table reveals
//! them simultaneously, and an explicit advance scores the round. Consensus
//! is never evaluated on hidden votes.
//!
//! ## Two-phase consensus policy
//!
//! - **Round 1**: strict unanimity, always. Disagreement forces discussion.
//! - **Round 2+**: the configured secondary rule (average, median, absolute
//!   or relative majority) may resolve the spread.
//!
//! ## Coffee card and coffee break
//!
//! The deck carries a "cannot estimate" sentinel that numeric rules ignore
//! but majority rules count as a value of its own. Independently, a session
//! can take a timed break that never touches vote or round data.

pub mod consensus;
pub mod core;
pub mod deck;
pub mod pause;
pub mod round;
pub mod session;

// Re-export commonly used types
pub use consensus::{NoConsensusReason, Outcome, SecondaryRule, evaluate};
pub use core::error::DomainError;
pub use deck::{Card, nearest_card};
pub use pause::{CoffeeBreak, DEFAULT_BREAK_MINUTES};
pub use round::{AdvanceOutcome, GameState, RoundState, VoteLedger};
pub use session::{
    Backlog, BacklogItem, ItemId, PlayMode, Player, PlayerId, Roster, SessionConfig, SessionId,
};
