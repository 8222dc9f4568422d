use serde::{Deserialize, Serialize};

use crate::{HandValue, Rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Hit,
    Stand,
}

impl Move {
    pub fn label(&self) -> &'static str {
        match self {
            Move::Hit => "Hit",
            Move::Stand => "Stand",
        }
    }
}

/// Hit/stand basic strategy for a shoe where the dealer hits soft 17
pub fn basic_move(value: HandValue, dealer_up: Rank) -> Move {
    let dealer_value = dealer_up.value();

    if value.soft {
        // Soft hands
        if value.total >= 19 {
            Move::Stand
        } else if value.total == 18 {
            if dealer_value >= 9 {
                Move::Hit
            } else {
                Move::Stand
            }
        } else {
            Move::Hit
        }
    } else {
        // Hard hands
        if value.total >= 17 {
            Move::Stand
        } else if (13..=16).contains(&value.total) {
            if (2..=6).contains(&dealer_value) {
                Move::Stand
            } else {
                Move::Hit
            }
        } else if value.total == 12 {
            if (4..=6).contains(&dealer_value) {
                Move::Stand
            } else {
                Move::Hit
            }
        } else {
            Move::Hit
        }
    }
}

/// Basic strategy adjusted by the Hi-Lo true count for the hard-hand index plays.
pub fn counted_move(value: HandValue, dealer_up: Rank, true_count: f64) -> Move {
    let dealer_value = dealer_up.value();

    if !value.soft {
        let deviation = match (value.total, dealer_value) {
            (16, 10) => Some(true_count >= 0.0),
            (15, 10) => Some(true_count >= 4.0),
            (12, 2) => Some(true_count >= 3.0),
            (12, 3) => Some(true_count >= 2.0),
            (13, 2) => Some(true_count > -1.0),
            _ => None,
        };
        if let Some(stand) = deviation {
            return if stand { Move::Stand } else { Move::Hit };
        }
    }

    basic_move(value, dealer_up)
}

/// Betting units for a true count: one unit until the count turns positive,
/// then one unit per point above 1, capped at `spread`.
pub fn bet_units(true_count: f64, spread: u32) -> u32 {
    let units = (true_count.floor() - 1.0).max(1.0) as u32;
    units.clamp(1, spread.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::evaluate;
    use crate::{Card, Suit};

    fn hand(ranks: &[Rank]) -> HandValue {
        let cards: Vec<Card> = ranks.iter().map(|&r| Card::new(r, Suit::Spades)).collect();
        evaluate(&cards)
    }

    #[test]
    fn test_hard_totals() {
        assert_eq!(basic_move(hand(&[Rank::Ten, Rank::Seven]), Rank::Ace), Move::Stand);
        assert_eq!(basic_move(hand(&[Rank::Ten, Rank::Six]), Rank::Six), Move::Stand);
        assert_eq!(basic_move(hand(&[Rank::Ten, Rank::Six]), Rank::Seven), Move::Hit);
        assert_eq!(basic_move(hand(&[Rank::Ten, Rank::Two]), Rank::Three), Move::Hit);
        assert_eq!(basic_move(hand(&[Rank::Ten, Rank::Two]), Rank::Four), Move::Stand);
        assert_eq!(basic_move(hand(&[Rank::Five, Rank::Six]), Rank::Six), Move::Hit);
    }

    #[test]
    fn test_soft_totals() {
        assert_eq!(basic_move(hand(&[Rank::Ace, Rank::Seven]), Rank::Eight), Move::Stand);
        assert_eq!(basic_move(hand(&[Rank::Ace, Rank::Seven]), Rank::Nine), Move::Hit);
        assert_eq!(basic_move(hand(&[Rank::Ace, Rank::Six]), Rank::Two), Move::Hit);
        assert_eq!(basic_move(hand(&[Rank::Ace, Rank::Eight]), Rank::Ace), Move::Stand);
    }

    #[test]
    fn test_index_plays() {
        let sixteen = hand(&[Rank::Ten, Rank::Six]);
        assert_eq!(counted_move(sixteen, Rank::King, -0.5), Move::Hit);
        assert_eq!(counted_move(sixteen, Rank::King, 0.0), Move::Stand);

        let twelve = hand(&[Rank::Ten, Rank::Two]);
        assert_eq!(counted_move(twelve, Rank::Three, 1.0), Move::Hit);
        assert_eq!(counted_move(twelve, Rank::Three, 2.5), Move::Stand);

        let thirteen = hand(&[Rank::Ten, Rank::Three]);
        assert_eq!(counted_move(thirteen, Rank::Two, 0.0), Move::Stand);
        assert_eq!(counted_move(thirteen, Rank::Two, -1.5), Move::Hit);
    }

    #[test]
    fn test_soft_hands_ignore_index_plays() {
        let soft_sixteen = hand(&[Rank::Ace, Rank::Five]);
        assert_eq!(counted_move(soft_sixteen, Rank::Ten, 5.0), Move::Hit);
    }

    #[test]
    fn test_bet_units() {
        assert_eq!(bet_units(-3.0, 8), 1);
        assert_eq!(bet_units(1.9, 8), 1);
        assert_eq!(bet_units(3.2, 8), 2);
        assert_eq!(bet_units(6.0, 8), 5);
        assert_eq!(bet_units(20.0, 8), 8);
        assert_eq!(bet_units(20.0, 0), 1);
    }
}
