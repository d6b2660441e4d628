use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Returns the 52 cards in uniformly random order (Fisher–Yates).
pub fn shuffle_new_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut cards = full_deck();
    cards.shuffle(rng);
    cards
}

/// Remaining undealt cards. Opening hands come off the front, draws off the back.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: VecDeque<Card>,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep canonical order until shuffle is called explicitly
        Self {
            cards: full_deck().into(),
            rng,
        }
    }

    pub fn shuffle(&mut self) {
        self.cards = shuffle_new_deck(&mut self.rng).into();
    }

    /// Removes the first `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n > self.cards.len() {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..n).collect())
    }

    /// Pops the top card from the draw end.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }
}
