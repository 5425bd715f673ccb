//! Consensus evaluation: rules, verdicts and the pure evaluator

pub mod evaluate;
pub mod outcome;
pub mod rule;

pub use evaluate::{evaluate, evaluate_secondary, evaluate_unanimity};
pub use outcome::{NoConsensusReason, Outcome};
pub use rule::SecondaryRule;
