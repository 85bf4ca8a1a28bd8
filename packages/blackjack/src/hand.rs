use crate::Card;
use serde::{Deserialize, Serialize};

/// Result of a settled round, seen from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    None,
    PlayerWin,
    DealerWin,
    Push,
}

/// Calculate the value of a blackjack hand
pub fn calculate_hand_value(cards: &[Card]) -> u32 {
    let mut total = 0;
    let mut soft_aces = 0;

    for card in cards {
        if card.is_ace() {
            soft_aces += 1;
        }
        total += card.value();
    }

    // Count aces as 1 instead of 11 until the hand is back under 22
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }

    total
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

/// Ordered, append-only sequence of cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn value(&self) -> u32 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn c(rank: Rank) -> Card {
        Card::new(rank, Suit::Hearts)
    }

    #[test]
    fn test_calculate_hand_value_simple() {
        assert_eq!(calculate_hand_value(&[c(Rank::Two), c(Rank::Three)]), 5);
    }

    #[test]
    fn test_calculate_hand_value_with_face_cards() {
        assert_eq!(calculate_hand_value(&[c(Rank::King), c(Rank::Queen)]), 20);
    }

    #[test]
    fn test_calculate_hand_value_blackjack() {
        assert_eq!(calculate_hand_value(&[c(Rank::Ace), c(Rank::Ten)]), 21);
    }

    #[test]
    fn test_calculate_hand_value_pair_of_aces() {
        assert_eq!(calculate_hand_value(&[c(Rank::Ace), c(Rank::Ace)]), 12);
    }

    #[test]
    fn test_calculate_hand_value_multiple_aces() {
        let cards = [c(Rank::Ace), c(Rank::Ace), c(Rank::Nine)];
        assert_eq!(calculate_hand_value(&cards), 21);
    }

    #[test]
    fn test_calculate_hand_value_all_aces_reduced() {
        let cards = [c(Rank::Ace), c(Rank::Ace), c(Rank::Ace), c(Rank::King), c(Rank::Nine)];
        // 1 + 1 + 1 + 10 + 9
        assert_eq!(calculate_hand_value(&cards), 22);
    }

    #[test]
    fn test_bust_total_is_not_capped() {
        let cards = [c(Rank::Ten), c(Rank::Ten), c(Rank::Five)];
        assert_eq!(calculate_hand_value(&cards), 25);
    }

    #[test]
    fn test_empty_hand_is_zero() {
        assert_eq!(calculate_hand_value(&[]), 0);
        assert_eq!(Hand::new().value(), 0);
    }

    #[test]
    fn test_value_is_rederivable() {
        let mut hand = Hand::new();
        hand.add_card(c(Rank::Ace));
        hand.add_card(c(Rank::Six));
        assert_eq!(hand.value(), 17);
        assert_eq!(hand.value(), 17);
        hand.add_card(c(Rank::Nine));
        assert_eq!(hand.value(), 16);
        assert_eq!(hand.value(), 16);
    }

    #[test]
    fn test_is_busted() {
        assert!(is_busted(&[c(Rank::King), c(Rank::Queen), c(Rank::Five)]));
        assert!(!is_busted(&[c(Rank::King), c(Rank::Queen)]));
    }

    #[test]
    fn test_is_blackjack() {
        assert!(is_blackjack(&[c(Rank::Ace), c(Rank::King)]));
        assert!(!is_blackjack(&[c(Rank::Seven), c(Rank::Seven), c(Rank::Seven)]));
    }
}
