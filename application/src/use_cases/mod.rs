//! Use cases: the operations a transport layer maps onto its protocol

pub mod game;

pub use game::{AdvanceReport, GameError, GameUseCase};
