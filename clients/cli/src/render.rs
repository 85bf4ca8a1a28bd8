use blackjack::{Card, RoundPhase};
use blackjack_table::msg::TableResponse;

fn cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_display)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text view of a snapshot. The hole card shows as `??`.
pub fn render_table(table: &TableResponse) -> String {
    let mut out = String::new();

    if !table.player_hand.is_empty() {
        let mut dealer = cards(&table.dealer_cards);
        if table.dealer_hidden_card {
            dealer.push_str(" ??");
        }
        out.push_str(&format!("Dealer: {dealer} ({})\n", table.dealer_value));
        out.push_str(&format!(
            "You:    {} ({})\n",
            cards(&table.player_hand),
            table.player_value
        ));
    }
    if !table.message.is_empty() {
        out.push_str(&format!("{}\n", table.message));
    }

    let mut wallet = format!("Balance: {}  Debt: {}", table.balance, table.debt);
    if let Some(bet) = table.locked_bet {
        wallet.push_str(&format!("  Bet: {bet}"));
    }
    out.push_str(&wallet);
    out.push('\n');
    out.push_str(&format!(
        "Wins: {}  Losses: {}  Ties: {}",
        table.stats.player_wins, table.stats.dealer_wins, table.stats.ties
    ));
    if table.phase == RoundPhase::InProgress {
        out.push_str("\n> hit or stand");
    }
    out
}
