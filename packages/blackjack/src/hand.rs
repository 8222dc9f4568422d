use crate::Card;
use serde::{Deserialize, Serialize};

/// Total of a hand and whether an ace is still counted as 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandValue {
    pub total: u8,
    pub soft: bool,
}

/// Evaluate a blackjack hand
pub fn evaluate(cards: &[Card]) -> HandValue {
    let mut total: u8 = 0;
    let mut soft_aces = 0;

    for card in cards {
        if card.is_ace() {
            soft_aces += 1;
        }
        total = total.saturating_add(card.value());
    }

    // Count aces as 1 until the hand fits
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }

    HandValue {
        total,
        soft: soft_aces > 0 && total <= 21,
    }
}

/// Calculate the value of a blackjack hand
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    evaluate(cards).total
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    evaluate(cards).soft
}

pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn evaluate(&self) -> HandValue {
        evaluate(&self.cards)
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
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

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

/// The dealer's cards. The second card is dealt face down and stays hidden until revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerHand {
    hand: Hand,
    hole_revealed: bool,
}

impl DealerHand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.hand.cards
    }

    pub fn up_card(&self) -> Option<Card> {
        self.hand.cards.first().copied()
    }

    pub fn hole_card(&self) -> Option<Card> {
        self.hand.cards.get(1).copied()
    }

    pub fn hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.add_card(card);
    }

    /// Turn the hole card over. Returns it only the first time, so the
    /// caller can register it with the counter exactly once.
    pub fn reveal_hole(&mut self) -> Option<Card> {
        if self.hole_revealed {
            return None;
        }
        let hole = self.hole_card()?;
        self.hole_revealed = true;
        Some(hole)
    }

    /// Full value of the hand, hidden card included.
    pub fn evaluate(&self) -> HandValue {
        self.hand.evaluate()
    }

    /// Value of the cards a player can currently see.
    pub fn visible_value(&self) -> HandValue {
        if self.hole_revealed {
            self.hand.evaluate()
        } else {
            evaluate(&self.hand.cards[..self.hand.cards.len().min(1)])
        }
    }

    pub fn is_blackjack(&self) -> bool {
        self.hand.is_blackjack()
    }

    pub fn len(&self) -> usize {
        self.hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }

    pub fn clear(&mut self) {
        self.hand.clear();
        self.hole_revealed = false;
    }
}
