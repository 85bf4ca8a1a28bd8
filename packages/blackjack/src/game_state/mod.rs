use crate::dealer::play_dealer_hand;
use crate::deck::CardSource;
use crate::error::RoundError;
use crate::{Card, Hand, Outcome, TableRules, Wallet};
use serde::{Deserialize, Serialize};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Before the first deal, or after a settlement and before the next deal
    #[default]
    Idle,
    /// Between the deal and a stand or bust
    InProgress,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementReason {
    /// Player was dealt 21; paid 3:2 without the dealer playing
    Blackjack,
    PlayerBust,
    DealerBust,
    PlayerHigher,
    DealerHigher,
    Push,
}

impl SettlementReason {
    pub fn outcome(&self) -> Outcome {
        match self {
            SettlementReason::Blackjack
            | SettlementReason::DealerBust
            | SettlementReason::PlayerHigher => Outcome::PlayerWin,
            SettlementReason::PlayerBust | SettlementReason::DealerHigher => Outcome::DealerWin,
            SettlementReason::Push => Outcome::Push,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SettlementReason::Blackjack => "Blackjack! You win!",
            SettlementReason::PlayerBust => "Bust! Dealer wins!",
            SettlementReason::DealerBust => "Dealer bust! You win!",
            SettlementReason::PlayerHigher => "You win!",
            SettlementReason::DealerHigher => "Dealer wins!",
            SettlementReason::Push => "It's a tie!",
        }
    }
}

/// Result of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub reason: SettlementReason,
    pub outcome: Outcome,
    pub bet: u64,
    /// Chips returned to the balance, stake included
    pub credited: u64,
    pub player_value: u32,
    /// `None` when the dealer never played
    pub dealer_value: Option<u32>,
}

/// What a round operation left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    InProgress,
    Settled(Settlement),
}

/// Win/loss/tie counters, bumped once per settled round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub player_wins: u64,
    pub dealer_wins: u64,
    pub ties: u64,
}

impl SessionStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWin => self.player_wins += 1,
            Outcome::DealerWin => self.dealer_wins += 1,
            Outcome::Push => self.ties += 1,
            Outcome::None => {}
        }
    }

    pub fn rounds(&self) -> u64 {
        self.player_wins + self.dealer_wins + self.ties
    }
}

/// Single-hand round against the dealer.
///
/// The hole card is kept private: nothing outside the round can read it until
/// `stand` plays the dealer hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    rules: TableRules,
    phase: RoundPhase,
    player_hand: Hand,
    dealer_up_card: Option<Card>,
    dealer_hole_card: Option<Card>,
    dealer_hand: Hand,
    locked_bet: Option<u64>,
    outcome: Outcome,
}

impl Default for Round {
    fn default() -> Self {
        Self::new(TableRules::default())
    }
}

impl Round {
    pub fn new(rules: TableRules) -> Self {
        Self {
            rules,
            phase: RoundPhase::Idle,
            player_hand: Hand::new(),
            dealer_up_card: None,
            dealer_hole_card: None,
            dealer_hand: Hand::new(),
            locked_bet: None,
            outcome: Outcome::None,
        }
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == RoundPhase::InProgress
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer_up_card
    }

    /// Dealer cards that are face up: the up card, or the whole hand after a stand.
    pub fn dealer_visible_cards(&self) -> &[Card] {
        &self.dealer_hand.cards
    }

    pub fn has_hidden_card(&self) -> bool {
        self.dealer_hole_card.is_some()
    }

    pub fn locked_bet(&self) -> Option<u64> {
        self.locked_bet
    }

    /// Outcome of the last settled round; `Outcome::None` while one is being played.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Lock the bet and deal. A dealt 21 settles on the spot at 3:2 and the
    /// dealer hand is never checked, even if the dealer holds a natural too.
    pub fn start<D: CardSource + ?Sized>(
        &mut self,
        bet: u64,
        wallet: &mut Wallet,
        stats: &mut SessionStats,
        deck: &mut D,
    ) -> Result<RoundStatus, RoundError> {
        if self.is_in_progress() {
            return Err(RoundError::RoundInProgress);
        }
        if bet == 0 {
            return Err(RoundError::InvalidBet);
        }
        let balance = wallet.balance;
        wallet
            .lock_bet(bet)
            .map_err(|_| RoundError::InsufficientFunds { bet, balance })?;

        let mut player_hand = Hand::new();
        player_hand.add_card(deck.draw());
        player_hand.add_card(deck.draw());
        let up_card = deck.draw();
        let hole_card = deck.draw();

        self.player_hand = player_hand;
        self.dealer_up_card = Some(up_card);
        self.dealer_hole_card = Some(hole_card);
        self.dealer_hand = Hand::from_cards(vec![up_card]);
        self.locked_bet = Some(bet);
        self.outcome = Outcome::None;
        self.phase = RoundPhase::InProgress;

        if self.player_hand.is_blackjack() {
            let credited = self.rules.blackjack_return(bet);
            let settlement =
                self.settle(SettlementReason::Blackjack, credited, None, wallet, stats);
            return Ok(RoundStatus::Settled(settlement));
        }

        Ok(RoundStatus::InProgress)
    }

    /// Draw one card for the player. Going over 21 forfeits the stake.
    pub fn hit<D: CardSource + ?Sized>(
        &mut self,
        wallet: &mut Wallet,
        stats: &mut SessionStats,
        deck: &mut D,
    ) -> Result<RoundStatus, RoundError> {
        if !self.is_in_progress() {
            return Err(RoundError::NoActiveRound);
        }

        self.player_hand.add_card(deck.draw());
        if self.player_hand.is_busted() {
            let settlement = self.settle(SettlementReason::PlayerBust, 0, None, wallet, stats);
            return Ok(RoundStatus::Settled(settlement));
        }

        Ok(RoundStatus::InProgress)
    }

    /// Reveal the hole card, play the dealer out and settle.
    pub fn stand<D: CardSource + ?Sized>(
        &mut self,
        wallet: &mut Wallet,
        stats: &mut SessionStats,
        deck: &mut D,
    ) -> Result<RoundStatus, RoundError> {
        if !self.is_in_progress() {
            return Err(RoundError::NoActiveRound);
        }
        let (Some(up_card), Some(hole_card), Some(bet)) =
            (self.dealer_up_card, self.dealer_hole_card, self.locked_bet)
        else {
            return Err(RoundError::NoActiveRound);
        };

        self.dealer_hole_card = None;
        self.dealer_hand = play_dealer_hand(up_card, hole_card, self.rules.dealer_stands_on, deck);

        let player_value = self.player_hand.value();
        let dealer_value = self.dealer_hand.value();

        let (reason, credited) = if dealer_value > 21 {
            (SettlementReason::DealerBust, self.rules.win_return(bet))
        } else if player_value > dealer_value {
            (SettlementReason::PlayerHigher, self.rules.win_return(bet))
        } else if dealer_value > player_value {
            (SettlementReason::DealerHigher, 0)
        } else {
            (SettlementReason::Push, bet)
        };

        let settlement = self.settle(reason, credited, Some(dealer_value), wallet, stats);
        Ok(RoundStatus::Settled(settlement))
    }

    fn settle(
        &mut self,
        reason: SettlementReason,
        credited: u64,
        dealer_value: Option<u32>,
        wallet: &mut Wallet,
        stats: &mut SessionStats,
    ) -> Settlement {
        let outcome = reason.outcome();
        let bet = self.locked_bet.take().unwrap_or_default();

        wallet.credit(credited);
        stats.record(outcome);
        self.outcome = outcome;
        self.phase = RoundPhase::Idle;

        Settlement {
            reason,
            outcome,
            bet,
            credited,
            player_value: self.player_hand.value(),
            dealer_value,
        }
    }
}
