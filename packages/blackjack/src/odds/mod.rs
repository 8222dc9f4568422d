use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Card, DeckComposition, TableRules};

/// Remaining cards by blackjack value index.
/// Index 0=Ace, 1=Two, ..., 8=Nine, 9=Ten/J/Q/K.
type Counts = [u16; 10];

/// Dealer final-result distribution.
/// [P(bust), P(17), P(18), P(19), P(20), P(21)]
type DealerProbs = [f64; 6];

/// Probability of each final dealer result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DealerOdds {
    pub bust: f64,
    /// Chance of finishing on 17, 18, 19, 20 and 21, in that order.
    pub totals: [f64; 5],
}

impl DealerOdds {
    fn from_probs(probs: DealerProbs) -> Self {
        Self {
            bust: probs[0],
            totals: [probs[1], probs[2], probs[3], probs[4], probs[5]],
        }
    }

    pub fn probability_of(&self, total: u8) -> f64 {
        match total {
            17..=21 => self.totals[(total - 17) as usize],
            _ => 0.0,
        }
    }

    /// Expected return per unit for a player standing on `player_total`,
    /// ignoring naturals.
    pub fn stand_ev(&self, player_total: u8) -> f64 {
        if player_total > 21 {
            return -1.0;
        }
        let mut ev = self.bust;
        for dealer_total in 17u8..=21 {
            let p = self.probability_of(dealer_total);
            if player_total > dealer_total {
                ev += p;
            } else if player_total < dealer_total {
                ev -= p;
            }
        }
        ev
    }

    /// One-off calculation without keeping a cache around.
    pub fn from_composition(
        up_card: Card,
        composition: &DeckComposition,
        rules: &TableRules,
    ) -> Self {
        DealerOddsCalculator::new(*rules).outcomes(up_card, composition)
    }
}

/// Exhaustive dealer outcome calculator over a known remaining composition.
///
/// The hole card is treated as unknown and drawn from the same composition,
/// since there is no peek at this table.
pub struct DealerOddsCalculator {
    rules: TableRules,
    cache: HashMap<(Counts, u8, bool), DealerProbs>,
}

impl DealerOddsCalculator {
    pub fn new(rules: TableRules) -> Self {
        Self {
            rules,
            cache: HashMap::new(),
        }
    }

    pub fn outcomes(&mut self, up_card: Card, composition: &DeckComposition) -> DealerOdds {
        let counts = composition.by_value();
        let (value, soft) = Self::add_to_hand(0, false, Self::card_points(up_card));
        DealerOdds::from_probs(self.dealer_probs(counts, value, soft))
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    // ── Composition helpers ──

    fn counts_total(counts: &Counts) -> u32 {
        counts.iter().map(|&c| c as u32).sum()
    }

    fn remove_card(counts: &Counts, idx: usize) -> Counts {
        let mut c = *counts;
        debug_assert!(c[idx] > 0);
        c[idx] -= 1;
        c
    }

    /// Points for a value index; aces return 1 and are promoted by `add_to_hand`.
    fn index_points(idx: usize) -> u8 {
        if idx == 0 {
            1
        } else {
            (idx + 1) as u8
        }
    }

    fn card_points(card: Card) -> u8 {
        if card.is_ace() {
            1
        } else {
            card.value()
        }
    }

    /// Add a card to a hand, returning new (value, is_soft).
    fn add_to_hand(value: u8, is_soft: bool, card: u8) -> (u8, bool) {
        if card == 1 {
            if value + 11 <= 21 {
                (value + 11, true)
            } else {
                (value + 1, is_soft)
            }
        } else {
            let new_val = value + card;
            if new_val > 21 && is_soft {
                (new_val - 10, false)
            } else {
                (new_val, is_soft)
            }
        }
    }

    fn must_stand(&self, value: u8, is_soft: bool) -> bool {
        match value {
            v if v >= 18 => true,
            17 => !(is_soft && self.rules.dealer_hits_soft_17),
            _ => false,
        }
    }

    fn settled(value: u8) -> DealerProbs {
        let mut r = [0.0; 6];
        if (17..=21).contains(&value) {
            r[(value - 16) as usize] = 1.0;
        } else {
            r[0] = 1.0;
        }
        r
    }

    fn dealer_probs(&mut self, counts: Counts, value: u8, is_soft: bool) -> DealerProbs {
        if value > 21 || self.must_stand(value, is_soft) {
            return Self::settled(value);
        }
        if let Some(&cached) = self.cache.get(&(counts, value, is_soft)) {
            return cached;
        }

        let total = Self::counts_total(&counts);
        let result = if total == 0 {
            // Nothing left to draw; the hand stays where it is.
            Self::settled(value)
        } else {
            let mut r = [0.0; 6];
            for i in 0..10 {
                if counts[i] == 0 {
                    continue;
                }
                let p = counts[i] as f64 / total as f64;
                let (nv, ns) = Self::add_to_hand(value, is_soft, Self::index_points(i));
                if nv > 21 {
                    r[0] += p;
                } else {
                    let sub = self.dealer_probs(Self::remove_card(&counts, i), nv, ns);
                    for j in 0..6 {
                        r[j] += p * sub[j];
                    }
                }
            }
            r
        };

        self.cache.insert((counts, value, is_soft), result);
        result
    }
}

#[cfg(test)]
mod tests;
