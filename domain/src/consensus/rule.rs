//! Secondary rules for consensus determination
//!
//! Round 1 always demands strict unanimity; these rules only apply from
//! round 2 on, once the table has failed to agree at least once. The set is
//! closed: there is no "unknown rule" path, by construction.

use serde::{Deserialize, Serialize};

/// Fallback rule scoring rounds two and up
///
/// - `Average`: arithmetic mean of the numeric votes, projected onto the deck
/// - `Median`: median of the numeric votes, projected onto the deck
/// - `AbsoluteMajority`: a literal value cast by strictly more than half
/// - `RelativeMajority`: the literal value with the strictly highest count
///
/// The numeric rules ignore the coffee card; the majority rules count it as
/// an ordinary value of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryRule {
    Average,
    Median,
    AbsoluteMajority,
    RelativeMajority,
}

impl SecondaryRule {
    /// Get a human-readable description of this rule
    pub fn description(&self) -> &'static str {
        match self {
            SecondaryRule::Average => "average of the numeric votes",
            SecondaryRule::Median => "median of the numeric votes",
            SecondaryRule::AbsoluteMajority => "absolute majority (more than half)",
            SecondaryRule::RelativeMajority => "relative majority (highest count)",
        }
    }
}

impl std::fmt::Display for SecondaryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecondaryRule::Average => write!(f, "average"),
            SecondaryRule::Median => write!(f, "median"),
            SecondaryRule::AbsoluteMajority => write!(f, "absolute_majority"),
            SecondaryRule::RelativeMajority => write!(f, "relative_majority"),
        }
    }
}

impl std::str::FromStr for SecondaryRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" | "mean" => Ok(SecondaryRule::Average),
            "median" => Ok(SecondaryRule::Median),
            "absolute_majority" | "absolute" => Ok(SecondaryRule::AbsoluteMajority),
            "relative_majority" | "relative" => Ok(SecondaryRule::RelativeMajority),
            _ => Err(format!(
                "Unknown secondary rule: {}. Valid: average, median, absolute_majority, relative_majority",
                s
            )),
        }
    }
}
