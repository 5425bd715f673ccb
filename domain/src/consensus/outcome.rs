//! Evaluator verdicts

use crate::deck::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a round's votes did not settle the item
///
/// Surfaced to the table as a human-facing message, never swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoConsensusReason {
    /// Nobody voted
    NoVotes,
    /// Votes spread under strict unanimity
    Divergent,
    /// Every vote was the coffee card
    AllCoffee,
    /// The numeric projection is empty
    NoNumericVotes,
    /// No value was cast by more than half the voters
    NoAbsoluteMajority,
    /// Two or more values tied for the highest count
    Tie,
}

impl fmt::Display for NoConsensusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoConsensusReason::NoVotes => write!(f, "no votes were cast"),
            NoConsensusReason::Divergent => write!(f, "votes diverge, unanimity required"),
            NoConsensusReason::AllCoffee => write!(f, "every vote was the coffee card"),
            NoConsensusReason::NoNumericVotes => write!(f, "no numeric votes"),
            NoConsensusReason::NoAbsoluteMajority => write!(f, "no absolute majority"),
            NoConsensusReason::Tie => write!(f, "tie for the highest count"),
        }
    }
}

/// Verdict of the consensus evaluator for one round
///
/// A consensus on the coffee card is a valid outcome: the enum keeps it
/// distinguished from every numeric estimate, and callers surface it as a
/// process exception ("the table cannot estimate this item") rather than a
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The round's votes are decisive; the card is the agreed estimate.
    Consensus(Card),
    /// The round failed; the reason feeds the re-vote message.
    NoConsensus(NoConsensusReason),
}

impl Outcome {
    pub fn is_consensus(&self) -> bool {
        matches!(self, Outcome::Consensus(_))
    }

    /// The agreed estimate, if any.
    pub fn estimate(&self) -> Option<Card> {
        match self {
            Outcome::Consensus(card) => Some(*card),
            Outcome::NoConsensus(_) => None,
        }
    }
}
