use thiserror::Error;

/// Rejected round operations. None of them change any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Round already in progress")]
    RoundInProgress,
    #[error("Set a bet greater than 0")]
    InvalidBet,
    #[error("Insufficient funds. Borrow or lower your bet.")]
    InsufficientFunds { bet: u64, balance: u64 },
    #[error("No round in progress")]
    NoActiveRound,
}

/// Rejected wallet operations. None of them change any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Borrow amount must be greater than 0")]
    InvalidBorrowAmount,
    #[error("No outstanding debt to repay.")]
    NoDebt,
    #[error("Insufficient balance to repay.")]
    NothingToRepay,
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },
}

/// Table rules that cannot be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid ratio {numerator}:0, denominator cannot be zero")]
    ZeroDenominator { numerator: u64 },
}
