//! Card sources for the table.
//!
//! The table plays from an infinite shoe: every draw picks a rank and a suit
//! independently, with replacement, so there is no shuffle state to track.
//! Rounds take any [`CardSource`], which lets tests replay exact sequences.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Card, Rank, Suit};

pub trait CardSource {
    fn draw(&mut self) -> Card;
}

impl<T: CardSource + ?Sized> CardSource for &mut T {
    fn draw(&mut self) -> Card {
        (**self).draw()
    }
}

impl<T: CardSource + ?Sized> CardSource for Box<T> {
    fn draw(&mut self) -> Card {
        (**self).draw()
    }
}

/// Uniform draws from an RNG.
#[derive(Debug, Clone)]
pub struct RandomDeck {
    rng: ChaCha8Rng,
}

impl RandomDeck {
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible deck for replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl CardSource for RandomDeck {
    fn draw(&mut self) -> Card {
        let rank = Rank::ALL[self.rng.gen_range(0..Rank::ALL.len())];
        let suit = Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())];
        Card::new(rank, suit)
    }
}

/// Replays a fixed sequence, then keeps going with a seeded random deck.
#[derive(Debug, Clone)]
pub struct ScriptedDeck {
    script: VecDeque<Card>,
    fallback: RandomDeck,
}

impl ScriptedDeck {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            script: cards.into_iter().collect(),
            fallback: RandomDeck::seeded(0),
        }
    }

    /// Cards still queued before the fallback kicks in.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl CardSource for ScriptedDeck {
    fn draw(&mut self) -> Card {
        match self.script.pop_front() {
            Some(card) => card,
            None => self.fallback.draw(),
        }
    }
}
