//! Error types for lottery operations.

use displaydoc::Display;
use thiserror::Error;

use crate::player::PlayerId;

/// Errors that can occur while running the lottery.
///
/// Insufficient funds and empty prize pools are not errors: purchases clamp
/// to the balance and unclaimed prizes go to the house.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum LotteryError {
    /// Invalid input: {0}
    InvalidInput(String),

    /// Player not found: {0}
    PlayerNotFound(PlayerId),

    /// Player already exists: {0}
    DuplicatePlayer(PlayerId),

    /// Invalid configuration: {0}
    InvalidConfig(String),
}

/// Result type for lottery operations.
pub type LotteryResult<T> = Result<T, LotteryError>;
