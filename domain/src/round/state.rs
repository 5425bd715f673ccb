//! Round/task state machine
//!
//! The mutable heart of a session: which backlog item is on the table, which
//! round of voting it is in, the ballots cast so far and whether they have
//! been revealed. Transitions are driven exclusively by the three
//! operations below; the consensus evaluator decides advance vs. re-vote.

use crate::consensus::{NoConsensusReason, Outcome, SecondaryRule, evaluate};
use crate::core::error::DomainError;
use crate::deck::Card;
use crate::pause::CoffeeBreak;
use crate::round::ledger::VoteLedger;
use crate::session::{PlayerId, Roster};
use serde::{Deserialize, Serialize};

/// Voting state for the current backlog item
///
/// - `cursor` indexes the backlog, `0..=len`; `len` means finished.
/// - `round` resets to 1 whenever the cursor advances and increments while
///   votes keep failing to agree on the same item.
/// - `votes` holds the current round's ballots; changing rounds discards it.
/// - `revealed` is false at the start of every round and set only by an
///   explicit reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub cursor: usize,
    pub round: u32,
    pub votes: VoteLedger,
    pub revealed: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

/// What `advance` decided, alongside the already-updated state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
    /// Consensus: the item at `item_index` got `estimate`; the cursor moved
    /// on (`finished` when it ran off the end of the backlog).
    ItemEstimated {
        item_index: usize,
        estimate: Card,
        finished: bool,
    },
    /// No consensus: a fresh voting round (`round`) opened on the same item.
    Revote {
        round: u32,
        reason: NoConsensusReason,
    },
}

impl AdvanceOutcome {
    /// Human-facing message for the table.
    pub fn message(&self) -> String {
        match self {
            AdvanceOutcome::ItemEstimated {
                estimate: Card::Coffee,
                ..
            } => "the table cannot estimate this item; recorded as coffee".to_string(),
            AdvanceOutcome::ItemEstimated {
                estimate, finished, ..
            } => {
                if *finished {
                    format!("consensus on {estimate}; backlog complete")
                } else {
                    format!("consensus on {estimate}; next item")
                }
            }
            AdvanceOutcome::Revote { round, reason } => {
                format!("no consensus ({reason}); re-vote, round {round}")
            }
        }
    }
}

impl RoundState {
    /// Fresh state at session start: first item, round 1, no votes, hidden.
    pub fn new() -> Self {
        Self {
            cursor: 0,
            round: 1,
            votes: VoteLedger::new(),
            revealed: false,
        }
    }

    /// Whether every backlog item has been estimated.
    pub fn is_finished(&self, backlog_len: usize) -> bool {
        self.cursor >= backlog_len
    }

    /// Record a player's ballot for the current round.
    ///
    /// Overwrites a prior ballot by the same player; stays legal after
    /// reveal so a revealed mis-click can be corrected before the round is
    /// scored. Never touches `revealed`.
    pub fn submit_vote(
        &mut self,
        roster: &Roster,
        backlog_len: usize,
        player: PlayerId,
        card: Card,
    ) -> Result<(), DomainError> {
        if self.is_finished(backlog_len) {
            return Err(DomainError::TaskFinished);
        }
        if !roster.contains(&player) {
            return Err(DomainError::InvalidPlayer(player.to_string()));
        }
        if !card.is_in_deck() {
            return Err(DomainError::InvalidCard(card.to_string()));
        }

        self.votes.record(player, card);
        Ok(())
    }

    /// Make the cast votes visible. Unconditional (zero ballots allowed)
    /// and idempotent.
    pub fn reveal(&mut self, backlog_len: usize) -> Result<(), DomainError> {
        if self.is_finished(backlog_len) {
            return Err(DomainError::TaskFinished);
        }

        self.revealed = true;
        Ok(())
    }

    /// Score the revealed round and apply the verdict.
    ///
    /// Fails with `NotRevealed` while votes are hidden; consensus is never
    /// evaluated on a blind round. On error nothing changes; on success the
    /// ledger is cleared and `revealed` drops back to false whatever the
    /// verdict was.
    pub fn advance(
        &mut self,
        rule: SecondaryRule,
        backlog_len: usize,
    ) -> Result<AdvanceOutcome, DomainError> {
        if self.is_finished(backlog_len) {
            return Err(DomainError::TaskFinished);
        }
        if !self.revealed {
            return Err(DomainError::NotRevealed);
        }

        let outcome = match evaluate(rule, self.round, &self.votes.cards()) {
            Outcome::Consensus(estimate) => {
                let item_index = self.cursor;
                self.cursor += 1;
                self.round = 1;
                AdvanceOutcome::ItemEstimated {
                    item_index,
                    estimate,
                    finished: self.cursor >= backlog_len,
                }
            }
            Outcome::NoConsensus(reason) => {
                self.round += 1;
                AdvanceOutcome::Revote {
                    round: self.round,
                    reason,
                }
            }
        };

        self.votes.clear();
        self.revealed = false;
        Ok(outcome)
    }
}

/// The persisted session document: round state plus the orthogonal
/// coffee-break overlay, stored together but never mutated by the same
/// operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub round: RoundState,
    #[serde(default)]
    pub coffee: CoffeeBreak,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }
}
