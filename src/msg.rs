use blackjack::{Card, Outcome, RoundPhase, SessionStats, Settlement, TableRules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    /// Balance used when nothing is persisted. Defaults to the rules' starting balance.
    pub starting_balance: Option<u64>,
    pub rules: Option<TableRules>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    StartRound { bet: u64 },
    Hit {},
    Stand {},
    Borrow { amount: u64 },
    /// `None` repays as much as the balance allows
    Repay { amount: Option<u64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Table {},
    Wallet {},
    Stats {},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Table(TableResponse),
    Wallet(WalletResponse),
    Stats(StatsResponse),
}

/// Everything a renderer needs. The dealer hole card is only ever reported
/// as `dealer_hidden_card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResponse {
    /// `Idle` again as soon as a round settles; a settled round shows up as
    /// `Idle` with `outcome` set, and the operation that settled it carries
    /// the `Settlement` in `Response::settlement`.
    pub phase: RoundPhase,
    pub outcome: Outcome,
    pub message: String,
    pub player_hand: Vec<Card>,
    pub player_value: u32,
    pub dealer_cards: Vec<Card>,
    pub dealer_value: u32,
    pub dealer_hidden_card: bool,
    pub balance: u64,
    pub debt: u64,
    pub locked_bet: Option<u64>,
    pub stats: StatsResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub balance: u64,
    pub debt: u64,
    pub locked_bet: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub player_wins: u64,
    pub dealer_wins: u64,
    pub ties: u64,
}

impl From<SessionStats> for StatsResponse {
    fn from(stats: SessionStats) -> Self {
        Self {
            player_wins: stats.player_wins,
            dealer_wins: stats.dealer_wins,
            ties: stats.ties,
        }
    }
}

/// Result of an accepted operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub attributes: Vec<(String, String)>,
    /// Present when the operation finished a round
    pub settlement: Option<Settlement>,
    pub table: TableResponse,
}

impl Response {
    pub fn new(table: TableResponse) -> Self {
        Self {
            attributes: Vec::new(),
            settlement: None,
            table,
        }
    }

    pub fn add_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    pub fn with_settlement(mut self, settlement: Option<Settlement>) -> Self {
        self.settlement = settlement;
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Accepted/rejected answer handed to a renderer, always with a fresh snapshot.
/// `accepted` is false only when nothing changed: the table refused the
/// operation or the wallet could not be saved, and `reason` says which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub accepted: bool,
    pub reason: Option<String>,
    pub table: TableResponse,
}
