use serde::{Deserialize, Serialize};

use crate::{Card, Rank};

/// Hi-Lo weight of a rank.
pub fn hi_lo_weight(rank: Rank) -> i32 {
    match rank {
        Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
        Rank::Seven | Rank::Eight | Rank::Nine => 0,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
    }
}

/// Remaining cards per rank across the whole undealt shoe, as seen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckComposition {
    counts: [u16; 13],
}

impl DeckComposition {
    pub fn full(num_decks: u8) -> Self {
        Self {
            counts: [4 * num_decks as u16; 13],
        }
    }

    pub fn remaining(&self, rank: Rank) -> u16 {
        self.counts[rank.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, u16)> + '_ {
        Rank::ALL.iter().map(move |&rank| (rank, self.counts[rank.index()]))
    }

    /// Counts folded by blackjack value: index 0 is the ace, 1..=8 are two
    /// through nine, 9 holds every ten-valued rank.
    pub fn by_value(&self) -> [u16; 10] {
        let mut out = [0u16; 10];
        for (rank, count) in self.iter() {
            let idx = match rank {
                Rank::Ace => 0,
                other => (other.value() - 1) as usize,
            };
            out[idx] += count;
        }
        out
    }

    fn remove(&mut self, rank: Rank) {
        let slot = &mut self.counts[rank.index()];
        if *slot == 0 {
            log::error!("Composition underflow for rank {rank}");
            return;
        }
        *slot -= 1;
    }
}

/// Running Hi-Lo count and remaining composition since the last shuffle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCounter {
    running_count: i32,
    composition: DeckComposition,
    num_decks: u8,
    seen: u32,
}

impl CardCounter {
    pub fn new(num_decks: u8) -> Self {
        Self {
            running_count: 0,
            composition: DeckComposition::full(num_decks),
            num_decks,
            seen: 0,
        }
    }

    /// Record a card the moment it becomes visible. Must be called exactly once per card.
    pub fn register_visible(&mut self, card: Card) {
        self.running_count += hi_lo_weight(card.rank);
        self.composition.remove(card.rank);
        self.seen += 1;
        log::debug!("Counted {card}: running count {}", self.running_count);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.num_decks);
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    pub fn composition(&self) -> &DeckComposition {
        &self.composition
    }

    pub fn cards_seen(&self) -> u32 {
        self.seen
    }

    /// Running count per deck left in a shoe of `shoe_len` cards. Zero once the shoe is empty.
    pub fn true_count(&self, shoe_len: usize) -> f64 {
        if shoe_len == 0 {
            return 0.0;
        }
        self.running_count as f64 / (shoe_len as f64 / 52.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shoe, Suit};
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hi_lo_weights_sum_to_zero_per_deck() {
        let sum: i32 = (0..52).map(|i| hi_lo_weight(Card::from_index(i).rank)).sum();
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_full_shoe_counts_back_to_zero() {
        let mut shoe = Shoe::new(6, &mut ChaCha8Rng::seed_from_u64(11));
        let mut counter = CardCounter::new(6);
        while let Ok(card) = shoe.draw() {
            counter.register_visible(card);
        }
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.composition().total(), 0);
        assert_eq!(counter.cards_seen(), 312);
    }

    #[test]
    fn test_register_updates_count_and_composition() {
        let mut counter = CardCounter::new(2);
        counter.register_visible(Card::new(Rank::Five, Suit::Clubs));
        counter.register_visible(Card::new(Rank::Six, Suit::Clubs));
        counter.register_visible(Card::new(Rank::Eight, Suit::Clubs));
        counter.register_visible(Card::new(Rank::King, Suit::Clubs));

        assert_eq!(counter.running_count(), 1);
        assert_eq!(counter.composition().remaining(Rank::Five), 7);
        assert_eq!(counter.composition().remaining(Rank::King), 7);
        assert_eq!(counter.composition().remaining(Rank::Queen), 8);
        assert_eq!(counter.composition().total(), 100);
    }

    #[test]
    fn test_reset_restores_full_composition() {
        let mut counter = CardCounter::new(6);
        counter.register_visible(Card::new(Rank::Two, Suit::Hearts));
        counter.reset();
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.cards_seen(), 0);
        assert!(counter.composition().iter().all(|(_, n)| n == 24));
    }

    #[test]
    fn test_true_count() {
        let mut counter = CardCounter::new(6);
        for _ in 0..4 {
            counter.register_visible(Card::new(Rank::Four, Suit::Spades));
        }
        assert_eq!(counter.true_count(104), 2.0);
        assert_eq!(counter.true_count(26), 8.0);
        assert_eq!(counter.true_count(0), 0.0);
    }

    #[test]
    fn test_by_value_folds_tens() {
        let composition = DeckComposition::full(1);
        assert_eq!(composition.by_value(), [4, 4, 4, 4, 4, 4, 4, 4, 4, 16]);
    }
}
