//! Round state: the vote ledger and the round/task state machine

pub mod ledger;
pub mod state;

pub use ledger::{Ballot, VoteLedger};
pub use state::{AdvanceOutcome, GameState, RoundState};
