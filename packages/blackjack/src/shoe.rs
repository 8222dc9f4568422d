use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Card, TableError};

/// The undealt cards of one or more shuffled decks. Cards are dealt from the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: u8,
}

impl Shoe {
    /// Build `num_decks` ordered decks and apply a uniform permutation.
    pub fn new<R: Rng>(num_decks: u8, rng: &mut R) -> Self {
        let mut cards: Vec<Card> = (0..52 * num_decks as usize).map(Card::from_index).collect();
        // Fisher-Yates
        cards.shuffle(rng);
        log::debug!("Shuffled {num_decks}-deck shoe");
        Self { cards, num_decks }
    }

    /// A shoe in a fixed order; the last card is dealt first.
    pub fn from_cards(cards: Vec<Card>, num_decks: u8) -> Self {
        Self { cards, num_decks }
    }

    pub fn draw(&mut self) -> Result<Card, TableError> {
        self.cards.pop().ok_or_else(|| {
            log::error!("Draw from an empty {}-deck shoe", self.num_decks);
            TableError::ShoeExhausted
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    pub fn capacity(&self) -> usize {
        52 * self.num_decks as usize
    }

    /// Cards dealt since the shoe was built.
    pub fn dealt(&self) -> usize {
        self.capacity().saturating_sub(self.cards.len())
    }

    pub fn decks_remaining(&self) -> f64 {
        self.cards.len() as f64 / 52.0
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn needs_reshuffle(&self, threshold: f64) -> bool {
        (self.cards.len() as f64) < self.capacity() as f64 * threshold
    }
}
