use blackjack::{CardSource, Round, SessionStats};
use log::info;

use crate::error::TableError;
use crate::msg::InstantiateMsg;
use crate::session::Session;
use crate::state::{load_wallet, Storage};

/// Open a table, restoring balance and debt from `store`.
pub fn instantiate(
    msg: InstantiateMsg,
    store: Box<dyn Storage>,
    deck: Box<dyn CardSource>,
) -> Result<Session, TableError> {
    let rules = msg.rules.unwrap_or_default();
    let starting_balance = msg.starting_balance.unwrap_or(rules.starting_balance);
    let wallet = load_wallet(store.as_ref(), starting_balance)?;

    info!(
        "table opened: balance={} debt={} dealer_stands_on={}",
        wallet.balance, wallet.debt, rules.dealer_stands_on
    );

    Ok(Session {
        round: Round::new(rules),
        wallet,
        stats: SessionStats::default(),
        message: String::new(),
        deck,
        store,
    })
}
