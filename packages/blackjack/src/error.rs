use thiserror::Error;

use crate::GamePhase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("bet amount must be positive")]
    EmptyBet,
    #[error("bet of {amount} exceeds balance of {balance}")]
    InsufficientBalance { amount: u64, balance: u64 },
    #[error("{command} is not allowed during {phase:?}")]
    WrongPhase {
        command: &'static str,
        phase: GamePhase,
    },
    #[error("hand is closed at {0}")]
    HandClosed(u8),
    #[error("shoe exhausted")]
    ShoeExhausted,
    #[error("invalid rules: {0}")]
    InvalidRules(String),
}

impl TableError {
    /// A fatal error means the table invariants no longer hold and the session must end.
    /// Every other variant is a rejected command that left the table untouched.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TableError::ShoeExhausted)
    }
}
