//! Card deck: vote values and projection of continuous estimates

pub mod card;

pub use card::{COFFEE_SYMBOL, Card, NUMERIC_DECK, nearest_card};
