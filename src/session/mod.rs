//! Session controller for a single player at a single table.
//!
//! A [`Session`] owns the round, the wallet, the counters, the card source and
//! the store. Callers drive it one operation at a time:
//!   - `instantiate` - load the wallet and open the table
//!   - `execute` - deal, hit, stand, borrow, repay
//!   - `query` - read-only snapshots for rendering
//!
//! Nothing here is shared: a caller that serves several threads must put the
//! whole session behind a single lock.

pub mod execute;
pub mod instantiate;
pub mod query;

pub use execute::execute;
pub use instantiate::instantiate;
pub use query::query;

use blackjack::{CardSource, Round, SessionStats, Wallet};

use crate::msg::{Ack, ExecuteMsg, TableResponse};
use crate::state::Storage;

pub struct Session {
    pub(crate) round: Round,
    pub(crate) wallet: Wallet,
    pub(crate) stats: SessionStats,
    pub(crate) message: String,
    pub(crate) deck: Box<dyn CardSource>,
    pub(crate) store: Box<dyn Storage>,
}

impl Session {
    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn wallet(&self) -> Wallet {
        self.wallet
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn store(&self) -> &dyn Storage {
        self.store.as_ref()
    }

    /// Current snapshot for rendering.
    pub fn table(&self) -> TableResponse {
        query::query_table(self)
    }

    /// Run `msg` and report it the way a renderer wants it: accepted or not,
    /// the rejection reason, and the resulting table.
    pub fn handle(&mut self, msg: ExecuteMsg) -> Ack {
        match execute(self, msg) {
            Ok(response) => Ack {
                accepted: true,
                reason: None,
                table: response.table,
            },
            Err(err) => Ack {
                accepted: false,
                reason: Some(err.to_string()),
                table: self.table(),
            },
        }
    }
}

#[cfg(test)]
mod tests;
