//! Pure consensus evaluation
//!
//! One function decides whether a round's votes settle the current item.
//! Round 1 is always strict unanimity regardless of configuration; the
//! configured secondary rule takes over from round 2. The two-phase policy
//! forces a genuine discussion before any statistical fallback may resolve
//! the disagreement.

use super::outcome::{NoConsensusReason, Outcome};
use super::rule::SecondaryRule;
use crate::deck::{Card, nearest_card};

/// Evaluate a round's votes under the rule active for that round.
///
/// Votes are the cast cards in ballot order; players who did not vote are
/// simply absent from the slice.
///
/// # Example
///
/// ```
/// use poker_domain::consensus::{evaluate, Outcome, SecondaryRule};
/// use poker_domain::deck::Card;
///
/// // Round 1: unanimity, whatever the configured rule.
/// let votes = [Card::Number(3), Card::Number(3)];
/// let outcome = evaluate(SecondaryRule::Median, 1, &votes);
/// assert_eq!(outcome, Outcome::Consensus(Card::Number(3)));
/// ```
pub fn evaluate(secondary: SecondaryRule, round: u32, votes: &[Card]) -> Outcome {
    if round <= 1 {
        evaluate_unanimity(votes)
    } else {
        evaluate_secondary(secondary, votes)
    }
}

/// Strict unanimity: non-empty and every vote identical.
///
/// A table unanimous on the coffee card is a consensus too: the agreed
/// verdict is "cannot estimate".
pub fn evaluate_unanimity(votes: &[Card]) -> Outcome {
    let Some(first) = votes.first() else {
        return Outcome::NoConsensus(NoConsensusReason::NoVotes);
    };

    if votes.iter().all(|v| v == first) {
        Outcome::Consensus(*first)
    } else {
        Outcome::NoConsensus(NoConsensusReason::Divergent)
    }
}

/// Apply the configured secondary rule.
///
/// A table entirely on coffee never passes a secondary rule; the guard runs
/// before any rule-specific counting.
pub fn evaluate_secondary(rule: SecondaryRule, votes: &[Card]) -> Outcome {
    if votes.is_empty() {
        return Outcome::NoConsensus(NoConsensusReason::NoVotes);
    }
    if votes.iter().all(Card::is_coffee) {
        return Outcome::NoConsensus(NoConsensusReason::AllCoffee);
    }

    match rule {
        SecondaryRule::Average => numeric_rule(votes, |nums| {
            nums.iter().sum::<f64>() / nums.len() as f64
        }),
        SecondaryRule::Median => numeric_rule(votes, median),
        SecondaryRule::AbsoluteMajority => absolute_majority(votes),
        SecondaryRule::RelativeMajority => relative_majority(votes),
    }
}

/// Shared shape of average and median: project the numeric votes to a
/// continuous value, then back onto the deck. The coffee card is excluded
/// here and only here.
fn numeric_rule(votes: &[Card], reduce: impl Fn(&[f64]) -> f64) -> Outcome {
    let nums: Vec<f64> = votes
        .iter()
        .filter_map(Card::numeric_value)
        .map(f64::from)
        .collect();

    if nums.is_empty() {
        return Outcome::NoConsensus(NoConsensusReason::NoNumericVotes);
    }

    Outcome::Consensus(nearest_card(reduce(&nums)))
}

fn median(nums: &[f64]) -> f64 {
    let mut sorted = nums.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Count literal values over the full vote list, in first-seen order.
/// The coffee card counts as its own value here.
fn tally(votes: &[Card]) -> Vec<(Card, usize)> {
    let mut counts: Vec<(Card, usize)> = Vec::new();
    for vote in votes {
        match counts.iter_mut().find(|(card, _)| card == vote) {
            Some((_, count)) => *count += 1,
            None => counts.push((*vote, 1)),
        }
    }
    counts
}

fn absolute_majority(votes: &[Card]) -> Outcome {
    let total = votes.len();
    tally(votes)
        .into_iter()
        .find(|(_, count)| count * 2 > total)
        .map(|(card, _)| Outcome::Consensus(card))
        .unwrap_or(Outcome::NoConsensus(NoConsensusReason::NoAbsoluteMajority))
}

fn relative_majority(votes: &[Card]) -> Outcome {
    let counts = tally(votes);
    let best = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut leaders = counts.iter().filter(|(_, count)| *count == best);

    match (leaders.next(), leaders.next()) {
        (Some((card, _)), None) => Outcome::Consensus(*card),
        _ => Outcome::NoConsensus(NoConsensusReason::Tie),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[u16]) -> Vec<Card> {
        values.iter().map(|&n| Card::Number(n)).collect()
    }

    #[test]
    fn test_unanimity_consensus_iff_non_empty_and_all_equal() {
        assert_eq!(
            evaluate_unanimity(&numbers(&[3, 3, 3])),
            Outcome::Consensus(Card::Number(3))
        );
        assert_eq!(
            evaluate_unanimity(&numbers(&[3, 5])),
            Outcome::NoConsensus(NoConsensusReason::Divergent)
        );
        assert_eq!(
            evaluate_unanimity(&[]),
            Outcome::NoConsensus(NoConsensusReason::NoVotes)
        );
    }

    #[test]
    fn test_unanimity_on_coffee_is_a_consensus() {
        let votes = [Card::Coffee, Card::Coffee];
        assert_eq!(evaluate_unanimity(&votes), Outcome::Consensus(Card::Coffee));
    }

    #[test]
    fn test_round_one_ignores_the_configured_rule() {
        // 2 of 3 on the same value would pass any majority rule
        let votes = numbers(&[5, 5, 8]);
        assert_eq!(
            evaluate(SecondaryRule::RelativeMajority, 1, &votes),
            Outcome::NoConsensus(NoConsensusReason::Divergent)
        );
        assert_eq!(
            evaluate(SecondaryRule::RelativeMajority, 2, &votes),
            Outcome::Consensus(Card::Number(5))
        );
    }

    #[test]
    fn test_average_projects_onto_the_deck() {
        // mean(1, 1, 2) = 1.33 -> card 1
        assert_eq!(
            evaluate_secondary(SecondaryRule::Average, &numbers(&[1, 1, 2])),
            Outcome::Consensus(Card::Number(1))
        );
    }

    #[test]
    fn test_average_ignores_coffee_votes() {
        let votes = vec![Card::Number(5), Card::Number(5), Card::Coffee];
        assert_eq!(
            evaluate_secondary(SecondaryRule::Average, &votes),
            Outcome::Consensus(Card::Number(5))
        );
    }

    #[test]
    fn test_median_odd_count() {
        // median(2, 3, 5) = 3
        assert_eq!(
            evaluate_secondary(SecondaryRule::Median, &numbers(&[2, 3, 5])),
            Outcome::Consensus(Card::Number(3))
        );
    }

    #[test]
    fn test_median_even_count_takes_midpoint() {
        // median(1, 2, 3, 5) = 2.5 -> nearest card 2 (tie breaks low)
        assert_eq!(
            evaluate_secondary(SecondaryRule::Median, &numbers(&[1, 2, 3, 5])),
            Outcome::Consensus(Card::Number(2))
        );
    }

    #[test]
    fn test_absolute_majority_needs_strictly_more_than_half() {
        // 3 of 4 > 2
        assert_eq!(
            evaluate_secondary(SecondaryRule::AbsoluteMajority, &numbers(&[5, 5, 5, 8])),
            Outcome::Consensus(Card::Number(5))
        );
        // 2 of 4 is not strictly more than half
        assert_eq!(
            evaluate_secondary(SecondaryRule::AbsoluteMajority, &numbers(&[5, 5, 8, 8])),
            Outcome::NoConsensus(NoConsensusReason::NoAbsoluteMajority)
        );
    }

    #[test]
    fn test_absolute_majority_counts_coffee_as_a_value() {
        let votes = vec![Card::Coffee, Card::Coffee, Card::Number(8)];
        assert_eq!(
            evaluate_secondary(SecondaryRule::AbsoluteMajority, &votes),
            Outcome::Consensus(Card::Coffee)
        );
    }

    #[test]
    fn test_relative_majority_highest_count_wins() {
        assert_eq!(
            evaluate_secondary(SecondaryRule::RelativeMajority, &numbers(&[5, 5, 8])),
            Outcome::Consensus(Card::Number(5))
        );
    }

    #[test]
    fn test_relative_majority_tie_fails() {
        assert_eq!(
            evaluate_secondary(SecondaryRule::RelativeMajority, &numbers(&[5, 5, 8, 8])),
            Outcome::NoConsensus(NoConsensusReason::Tie)
        );
    }

    #[test]
    fn test_all_coffee_fails_every_secondary_rule() {
        let votes = vec![Card::Coffee, Card::Coffee, Card::Coffee];
        for rule in [
            SecondaryRule::Average,
            SecondaryRule::Median,
            SecondaryRule::AbsoluteMajority,
            SecondaryRule::RelativeMajority,
        ] {
            assert_eq!(
                evaluate_secondary(rule, &votes),
                Outcome::NoConsensus(NoConsensusReason::AllCoffee),
                "rule {rule} should not pass on an all-coffee table"
            );
        }
    }

    #[test]
    fn test_empty_votes_fail_every_rule() {
        for rule in [
            SecondaryRule::Average,
            SecondaryRule::Median,
            SecondaryRule::AbsoluteMajority,
            SecondaryRule::RelativeMajority,
        ] {
            assert_eq!(
                evaluate_secondary(rule, &[]),
                Outcome::NoConsensus(NoConsensusReason::NoVotes)
            );
        }
        assert_eq!(
            evaluate_unanimity(&[]),
            Outcome::NoConsensus(NoConsensusReason::NoVotes)
        );
    }
}
