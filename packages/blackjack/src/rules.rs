use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// Multiplier expressed as a ratio, applied to whole chips. The denominator
/// is never zero, including for deserialized rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRatio")]
pub struct Ratio {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct RawRatio {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RawRatio> for Ratio {
    type Error = RulesError;

    fn try_from(raw: RawRatio) -> Result<Self, Self::Error> {
        Ratio::new(raw.numerator, raw.denominator)
    }
}

impl Ratio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };
    pub const TEN_PERCENT: Self = Self {
        numerator: 1,
        denominator: 10,
    };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self, RulesError> {
        if denominator == 0 {
            return Err(RulesError::ZeroDenominator { numerator });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `amount * numerator / denominator`, rounded half up.
    pub fn apply(&self, amount: u64) -> u64 {
        let denominator = self.denominator as u128;
        let scaled = amount as u128 * self.numerator as u128 + denominator / 2;
        let result = scaled / denominator;
        result.min(u64::MAX as u128) as u64
    }
}

/// Table configuration for a single-player, single-hand game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Dealer draws while below this total
    pub dealer_stands_on: u32,

    /// Winnings on a natural, on top of the returned stake
    pub blackjack_payout: Ratio,

    /// Winnings on a regular win, on top of the returned stake
    pub win_payout: Ratio,

    /// Fee added to debt when borrowing
    pub borrow_fee: Ratio,

    /// Balance for a wallet with nothing persisted
    pub starting_balance: u64,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            dealer_stands_on: 17,
            blackjack_payout: Ratio::THREE_TO_TWO,
            win_payout: Ratio::ONE_TO_ONE,
            borrow_fee: Ratio::TEN_PERCENT,
            starting_balance: 1000,
        }
    }
}

impl TableRules {
    /// Total credited for a natural: the stake plus its 3:2 winnings.
    pub fn blackjack_return(&self, bet: u64) -> u64 {
        bet.saturating_add(self.blackjack_payout.apply(bet))
    }

    /// Total credited for a regular win.
    pub fn win_return(&self, bet: u64) -> u64 {
        bet.saturating_add(self.win_payout.apply(bet))
    }

    /// Debt incurred by borrowing `amount`: principal plus fee.
    pub fn borrow_debt(&self, amount: u64) -> u64 {
        amount.saturating_add(self.borrow_fee.apply(amount))
    }
}
