use blackjack::{RoundError, WalletError};
use thiserror::Error;

use crate::state::StoreError;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("{0}")]
    Round(#[from] RoundError),

    #[error("{0}")]
    Wallet(#[from] WalletError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl TableError {
    /// True when the table refused the operation, false when the wallet could
    /// not be saved. Neither case changes the session.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TableError::Store(_))
    }
}
