mod card;
mod dealer;
pub mod deck;
mod error;
mod game_state;
mod hand;
mod rules;
mod wallet;

pub use card::{Card, Rank, Suit};
pub use dealer::{dealer_should_hit, play_dealer_hand};
pub use deck::{CardSource, RandomDeck, ScriptedDeck};
pub use error::{RoundError, RulesError, WalletError};
pub use game_state::{Round, RoundPhase, RoundStatus, SessionStats, Settlement, SettlementReason};
pub use hand::{calculate_hand_value, is_blackjack, is_busted, Hand, Outcome};
pub use rules::{Ratio, TableRules};
pub use wallet::{Loan, Wallet};
