use crate::deck::CardSource;
use crate::{calculate_hand_value, Card, Hand};

/// Dealer draws while strictly below `stands_on`, soft totals included.
pub fn dealer_should_hit(cards: &[Card], stands_on: u32) -> bool {
    calculate_hand_value(cards) < stands_on
}

/// Reveal the hole card and play the dealer hand out.
///
/// Every draw adds at least one point to the hard total, so the loop always
/// ends: once all aces are hard the total only grows.
pub fn play_dealer_hand<D: CardSource + ?Sized>(
    up_card: Card,
    hole_card: Card,
    stands_on: u32,
    deck: &mut D,
) -> Hand {
    let mut hand = Hand::from_cards(vec![up_card, hole_card]);
    while dealer_should_hit(&hand.cards, stands_on) {
        hand.add_card(deck.draw());
    }
    hand
}
