use serde::{Deserialize, Serialize};

use crate::TableError;

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, TableError> {
        if denominator == 0 {
            return Err(TableError::InvalidRules(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Profit on `bet`, rounded down to whole minor units.
    pub fn calculate_payout(&self, bet: u64) -> u64 {
        (bet as u128 * self.numerator as u128 / self.denominator as u128) as u64
    }
}

/// House rules and session settings for one table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRules {
    /// Number of decks in the shoe
    pub num_decks: u8,

    /// Fraction of the shoe below which the next deal reshuffles
    pub reshuffle_threshold: f64,

    /// Balance the session opens with, in minor units
    pub starting_balance: u64,

    /// Blackjack profit ratio (3:2 returns 2.5x the stake)
    pub blackjack_payout: PayoutRatio,

    /// Dealer hits soft 17
    pub dealer_hits_soft_17: bool,
}

/// Cards the reshuffle point must leave in the shoe: the two player cards plus
/// the longest possible dealer hand.
pub const ROUND_RESERVE: usize = 13;

/// Largest accepted starting balance. Every payout on a bet of this size still
/// fits in a `u64` balance.
pub const MAX_STARTING_BALANCE: u64 = u64::MAX / 4;

impl Default for TableRules {
    fn default() -> Self {
        Self {
            num_decks: 6,
            reshuffle_threshold: 0.25,
            starting_balance: 170_000,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            dealer_hits_soft_17: true,
        }
    }
}

impl TableRules {
    pub fn single_deck() -> Self {
        Self {
            num_decks: 1,
            ..Self::default()
        }
    }

    pub fn double_deck() -> Self {
        Self {
            num_decks: 2,
            ..Self::default()
        }
    }

    pub fn eight_deck() -> Self {
        Self {
            num_decks: 8,
            ..Self::default()
        }
    }

    pub fn shoe_size(&self) -> usize {
        52 * self.num_decks as usize
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.num_decks == 0 {
            return Err(TableError::InvalidRules(
                "shoe needs at least one deck".to_string(),
            ));
        }
        if !(self.reshuffle_threshold > 0.0 && self.reshuffle_threshold < 1.0) {
            return Err(TableError::InvalidRules(format!(
                "reshuffle threshold {} is outside (0, 1)",
                self.reshuffle_threshold
            )));
        }
        if (self.shoe_size() as f64 * self.reshuffle_threshold) < ROUND_RESERVE as f64 {
            return Err(TableError::InvalidRules(format!(
                "reshuffle threshold {} leaves fewer than {ROUND_RESERVE} cards for a round",
                self.reshuffle_threshold
            )));
        }
        if self.starting_balance > MAX_STARTING_BALANCE {
            return Err(TableError::InvalidRules(format!(
                "starting balance {} exceeds {MAX_STARTING_BALANCE}",
                self.starting_balance
            )));
        }
        if self.blackjack_payout.denominator == 0 {
            return Err(TableError::InvalidRules(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandOutcome;

    #[test]
    fn test_payout_ratio_three_to_two() {
        let ratio = PayoutRatio::THREE_TO_TWO;
        assert_eq!(ratio.calculate_payout(100), 150);
        assert_eq!(ratio.calculate_payout(10), 15);
        assert_eq!(ratio.calculate_payout(50), 75);
    }

    #[test]
    fn test_payout_ratio_floors_odd_units() {
        assert_eq!(PayoutRatio::THREE_TO_TWO.calculate_payout(5), 7);
        assert_eq!(PayoutRatio::SIX_TO_FIVE.calculate_payout(3), 3);
    }

    #[test]
    fn test_payout_ratio_one_to_one() {
        assert_eq!(PayoutRatio::ONE_TO_ONE.calculate_payout(25), 25);
    }

    #[test]
    fn test_payout_ratio_zero_denominator() {
        assert!(PayoutRatio::new(3, 0).is_err());
        assert_eq!(PayoutRatio::new(2, 1).unwrap().calculate_payout(100), 200);
    }

    #[test]
    fn test_default_rules() {
        let rules = TableRules::default();
        assert_eq!(rules.num_decks, 6);
        assert_eq!(rules.shoe_size(), 312);
        assert!(rules.dealer_hits_soft_17);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_rules() {
        let mut rules = TableRules::default();
        rules.num_decks = 0;
        assert!(rules.validate().is_err());

        let mut rules = TableRules::single_deck();
        rules.reshuffle_threshold = 1.0;
        assert!(rules.validate().is_err());

        let mut rules = TableRules::eight_deck();
        rules.blackjack_payout.denominator = 0;
        assert!(matches!(rules.validate(), Err(TableError::InvalidRules(_))));
    }

    #[test]
    fn test_validate_requires_a_round_reserve() {
        let mut rules = TableRules::single_deck();
        rules.reshuffle_threshold = 0.0;
        assert!(rules.validate().is_err());

        // 52 * 0.2 leaves 10 cards
        rules.reshuffle_threshold = 0.2;
        assert!(rules.validate().is_err());

        rules.reshuffle_threshold = 0.25;
        assert!(rules.validate().is_ok());

        let mut rules = TableRules::eight_deck();
        rules.reshuffle_threshold = 0.05;
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_starting_balance() {
        let mut rules = TableRules::default();
        rules.starting_balance = u64::MAX;
        assert!(matches!(rules.validate(), Err(TableError::InvalidRules(_))));

        rules.starting_balance = MAX_STARTING_BALANCE;
        assert!(rules.validate().is_ok());
        let bet = rules.starting_balance;
        assert_eq!(
            HandOutcome::PlayerBlackjack.payout(bet, &rules),
            (bet as u128 * 5 / 2) as u64
        );
        assert_eq!(HandOutcome::PlayerWin.payout(bet, &rules), bet * 2);
    }
}
