use serde::{Deserialize, Serialize};

use crate::{Card, CardCounter, DealerHand, HandValue, Shoe, TableError, TableRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerState {
    AwaitingReveal,
    Drawing,
    Done,
}

/// One observable step of the dealer's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerStep {
    Revealed(Card),
    Drew(Card),
    Stood(HandValue),
}

/// Whether the dealer takes another card on `value`.
pub fn dealer_should_hit(value: HandValue, rules: &TableRules) -> bool {
    if value.total < 17 {
        return true;
    }
    value.total == 17 && value.soft && rules.dealer_hits_soft_17
}

/// Plays the dealer's hand one step at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerPolicy {
    state: DealerState,
    player_busted: bool,
}

impl DealerPolicy {
    /// A busted player still sees the hole card, but the dealer draws nothing more.
    pub fn new(player_busted: bool) -> Self {
        Self {
            state: DealerState::AwaitingReveal,
            player_busted,
        }
    }

    pub fn state(&self) -> DealerState {
        self.state
    }

    /// Advance by one card. Returns `None` once the hand is finished.
    pub fn step(
        &mut self,
        dealer: &mut DealerHand,
        shoe: &mut Shoe,
        counter: &mut CardCounter,
        rules: &TableRules,
    ) -> Result<Option<DealerStep>, TableError> {
        match self.state {
            DealerState::AwaitingReveal => {
                self.state = if self.player_busted {
                    DealerState::Done
                } else {
                    DealerState::Drawing
                };
                match dealer.reveal_hole() {
                    Some(hole) => {
                        counter.register_visible(hole);
                        log::debug!("Dealer reveals {hole}");
                        Ok(Some(DealerStep::Revealed(hole)))
                    }
                    None => self.step(dealer, shoe, counter, rules),
                }
            }
            DealerState::Drawing => {
                let value = dealer.evaluate();
                if dealer_should_hit(value, rules) {
                    let card = shoe.draw()?;
                    counter.register_visible(card);
                    dealer.add_card(card);
                    log::debug!("Dealer draws {card} to {}", dealer.evaluate().total);
                    Ok(Some(DealerStep::Drew(card)))
                } else {
                    self.state = DealerState::Done;
                    log::debug!("Dealer stands on {}", value.total);
                    Ok(Some(DealerStep::Stood(value)))
                }
            }
            DealerState::Done => Ok(None),
        }
    }

    /// Run the policy to completion, collecting every step in order.
    pub fn play_out(
        &mut self,
        dealer: &mut DealerHand,
        shoe: &mut Shoe,
        counter: &mut CardCounter,
        rules: &TableRules,
    ) -> Result<Vec<DealerStep>, TableError> {
        let mut steps = Vec::new();
        while let Some(step) = self.step(dealer, shoe, counter, rules)? {
            steps.push(step);
        }
        Ok(steps)
    }
}
