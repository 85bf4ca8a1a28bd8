use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::TableRules;

/// Player chips and outstanding debt. Neither can go negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: u64,
    pub debt: u64,
}

/// What a successful borrow added to the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub principal: u64,
    pub fee: u64,
}

impl Wallet {
    pub fn new(balance: u64, debt: u64) -> Self {
        Self { balance, debt }
    }

    /// Remove a stake from the balance for the length of a round.
    pub fn lock_bet(&mut self, bet: u64) -> Result<(), WalletError> {
        if bet > self.balance {
            return Err(WalletError::InsufficientBalance {
                needed: bet,
                available: self.balance,
            });
        }
        self.balance -= bet;
        Ok(())
    }

    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Credit `amount` and add principal plus fee to the debt.
    pub fn borrow(&mut self, amount: u64, rules: &TableRules) -> Result<Loan, WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidBorrowAmount);
        }
        let owed = rules.borrow_debt(amount);
        self.balance = self.balance.saturating_add(amount);
        self.debt = self.debt.saturating_add(owed);
        Ok(Loan {
            principal: amount,
            fee: owed - amount,
        })
    }

    /// Pay down debt from the balance. `None` repays as much as possible;
    /// an explicit amount is clamped to the balance and the debt.
    pub fn repay(&mut self, amount: Option<u64>) -> Result<u64, WalletError> {
        if self.debt == 0 {
            return Err(WalletError::NoDebt);
        }
        let requested = amount.unwrap_or(self.balance);
        let repaid = requested.min(self.balance).min(self.debt);
        if repaid == 0 {
            return Err(WalletError::NothingToRepay);
        }
        self.balance -= repaid;
        self.debt = self.debt.saturating_sub(repaid);
        Ok(repaid)
    }
}
