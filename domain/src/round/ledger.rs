//! Per-round vote ledger
//!
//! An insertion-ordered map from player to card: one ballot per player per
//! round, last vote wins. The majority rules resolve first-seen order from
//! it, so a re-vote updates the ballot in place and keeps the player's
//! original position.

use crate::deck::Card;
use crate::session::PlayerId;
use serde::{Deserialize, Serialize};

/// One cast ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub player: PlayerId,
    pub card: Card,
}

/// The votes of the current round, in cast order
///
/// Validation (roster membership, deck membership, finished backlog) is the
/// round state machine's job; the ledger is a dumb ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteLedger {
    ballots: Vec<Ballot>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ballot, overwriting any prior one by the same player.
    pub fn record(&mut self, player: PlayerId, card: Card) {
        match self.ballots.iter_mut().find(|b| b.player == player) {
            Some(ballot) => ballot.card = card,
            None => self.ballots.push(Ballot { player, card }),
        }
    }

    /// The card a player has cast, if any.
    pub fn card_for(&self, player: &PlayerId) -> Option<Card> {
        self.ballots
            .iter()
            .find(|b| &b.player == player)
            .map(|b| b.card)
    }

    /// All cast cards, in ballot order.
    pub fn cards(&self) -> Vec<Card> {
        self.ballots.iter().map(|b| b.card).collect()
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn clear(&mut self) {
        self.ballots.clear();
    }
}
