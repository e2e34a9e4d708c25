//! Error taxonomy for the numeric parsing boundary

use thiserror::Error;

/// Why a string could not be turned into a usable amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty or whitespace only
    #[error("empty numeric input")]
    Empty,
    /// Input is not a decimal number
    #[error("invalid numeric input: {0:?}")]
    Invalid(String),
    /// Input parsed to NaN or an infinity
    #[error("non-finite numeric input: {0:?}")]
    NonFinite(String),
    /// Integer does not fit in a uint256
    #[error("numeric input exceeds uint256: {0:?}")]
    Overflow(String),
    /// Amounts and chain reads are never negative
    #[error("negative numeric input: {0:?}")]
    Negative(String),
    /// Unknown trade direction
    #[error("unknown trade direction: {0:?} (expected buy or sell)")]
    Direction(String),
}

/// The receiving side of a trade feed has gone away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("trade feed closed")]
pub struct FeedClosed;
