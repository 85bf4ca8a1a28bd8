use blackjack::calculate_hand_value;

use crate::msg::{QueryMsg, QueryResponse, StatsResponse, TableResponse, WalletResponse};
use crate::session::Session;

pub fn query(session: &Session, msg: QueryMsg) -> QueryResponse {
    match msg {
        QueryMsg::Table {} => QueryResponse::Table(query_table(session)),
        QueryMsg::Wallet {} => QueryResponse::Wallet(query_wallet(session)),
        QueryMsg::Stats {} => QueryResponse::Stats(query_stats(session)),
    }
}

pub fn query_table(session: &Session) -> TableResponse {
    let round = &session.round;
    let dealer_cards = round.dealer_visible_cards().to_vec();

    TableResponse {
        phase: round.phase(),
        outcome: round.outcome(),
        message: session.message.clone(),
        player_hand: round.player_hand().cards.clone(),
        player_value: round.player_hand().value(),
        dealer_value: calculate_hand_value(&dealer_cards),
        dealer_cards,
        dealer_hidden_card: round.has_hidden_card(),
        balance: session.wallet.balance,
        debt: session.wallet.debt,
        locked_bet: round.locked_bet(),
        stats: query_stats(session),
    }
}

fn query_wallet(session: &Session) -> WalletResponse {
    WalletResponse {
        balance: session.wallet.balance,
        debt: session.wallet.debt,
        locked_bet: session.round.locked_bet(),
    }
}

fn query_stats(session: &Session) -> StatsResponse {
    session.stats.into()
}
