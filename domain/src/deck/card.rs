//! The estimation deck
//!
//! The deck is the fixed, ordered set of values a player can vote with:
//! ten numeric cards plus the coffee card ("cannot estimate / needs a
//! break"). The numeric subset is totally ordered; the coffee card takes
//! part in literal-value rules but never in numeric ones.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric card values, ascending. The deck order is this list followed by
/// the coffee card.
pub const NUMERIC_DECK: [u16; 10] = [0, 1, 2, 3, 5, 8, 13, 20, 40, 100];

/// Display form of the coffee card.
pub const COFFEE_SYMBOL: &str = "☕";

/// One card of the deck
///
/// Serialized as its display string (`"8"`, `"☕"`), which is also the shape
/// votes take in the stored session document.
///
/// # Example
///
/// ```
/// use poker_domain::deck::Card;
///
/// let card: Card = "8".parse().unwrap();
/// assert_eq!(card.numeric_value(), Some(8));
///
/// let coffee: Card = "☕".parse().unwrap();
/// assert!(coffee.is_coffee());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    /// A numeric estimate card
    Number(u16),
    /// The "cannot estimate / needs a break" sentinel
    Coffee,
}

impl Card {
    /// Check that this card actually belongs to the deck.
    ///
    /// `Card::Number` can be built with an arbitrary value; vote submission
    /// rejects anything off-deck.
    pub fn is_in_deck(&self) -> bool {
        match self {
            Card::Number(n) => NUMERIC_DECK.contains(n),
            Card::Coffee => true,
        }
    }

    /// The numeric value, or `None` for the coffee card.
    pub fn numeric_value(&self) -> Option<u16> {
        match self {
            Card::Number(n) => Some(*n),
            Card::Coffee => None,
        }
    }

    /// Check if this is the coffee card.
    pub fn is_coffee(&self) -> bool {
        matches!(self, Card::Coffee)
    }

    /// The full deck, in display order.
    pub fn deck() -> impl Iterator<Item = Card> {
        NUMERIC_DECK
            .into_iter()
            .map(Card::Number)
            .chain(std::iter::once(Card::Coffee))
    }
}

/// Map an arbitrary real number onto the closest numeric card.
///
/// Ties break toward the smaller card: the ascending numeric deck is scanned
/// and only a strictly smaller distance replaces the current best. The
/// coffee card is never returned. Used by the average and median rules,
/// which work on continuous intermediate values before projecting back onto
/// the deck.
///
/// # Example
///
/// ```
/// use poker_domain::deck::{nearest_card, Card};
///
/// assert_eq!(nearest_card(2.5), Card::Number(2)); // tie: 2 vs 3
/// assert_eq!(nearest_card(8.0), Card::Number(8)); // idempotent on exact values
/// ```
pub fn nearest_card(x: f64) -> Card {
    let mut best = NUMERIC_DECK[0];
    let mut best_distance = (f64::from(NUMERIC_DECK[0]) - x).abs();

    for &value in &NUMERIC_DECK[1..] {
        let distance = (f64::from(value) - x).abs();
        if distance < best_distance {
            best_distance = distance;
            best = value;
        }
    }

    Card::Number(best)
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number(n) => write!(f, "{}", n),
            Card::Coffee => write!(f, "{}", COFFEE_SYMBOL),
        }
    }
}

impl std::str::FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == COFFEE_SYMBOL || s.eq_ignore_ascii_case("coffee") {
            return Ok(Card::Coffee);
        }

        match s.parse::<u16>() {
            Ok(n) if NUMERIC_DECK.contains(&n) => Ok(Card::Number(n)),
            _ => Err(DomainError::InvalidCard(s.to_string())),
        }
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
