use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::outcome::resolve;
use crate::probability::bust_probability;
use crate::view::{AdvisoryRequest, DealerView, HandView, SeenCard, TableView};
use crate::{
    Card, CardCounter, DealerHand, DealerPolicy, DealerStep, DeckComposition, Hand,
    HandHistoryEntry, HandOutcome, HandValue, SessionStats, Shoe, TableError, TableRules,
};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Betting,
    PlayerTurn,
    DealerTurn,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    Player,
    Dealer,
}

/// Something that happened at the table, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableEvent {
    Shuffled { decks: u8 },
    Reshuffled { decks: u8 },
    Dealt { seat: Seat, card: SeenCard },
    HoleRevealed(Card),
    DealerDrew(Card),
    DealerStood(HandValue),
    Settled { outcome: HandOutcome, payout: u64 },
}

impl From<DealerStep> for TableEvent {
    fn from(step: DealerStep) -> Self {
        match step {
            DealerStep::Revealed(card) => TableEvent::HoleRevealed(card),
            DealerStep::Drew(card) => TableEvent::DealerDrew(card),
            DealerStep::Stood(value) => TableEvent::DealerStood(value),
        }
    }
}

/// One player's session at a single-seat table.
///
/// The table owns the shoe, the count, both hands and the bankroll. Commands
/// that are not legal in the current phase are rejected with an error and
/// leave every field untouched.
///
/// Every command appends [`TableEvent`]s to an internal log that is only
/// emptied by [`Table::take_events`]. Callers must drain it regularly; a
/// table that is never drained keeps every event of the session.
#[derive(Debug, Clone)]
pub struct Table {
    rules: TableRules,
    rng: ChaCha8Rng,
    shoe: Shoe,
    counter: CardCounter,
    player: Hand,
    dealer: DealerHand,
    phase: GamePhase,
    balance: u64,
    bet: u64,
    last_outcome: Option<HandOutcome>,
    history: Vec<HandHistoryEntry>,
    advisory: Option<String>,
    events: Vec<TableEvent>,
}

impl Table {
    pub fn new(rules: TableRules) -> Result<Self, TableError> {
        Self::with_rng(rules, ChaCha8Rng::from_entropy())
    }

    /// A table whose shuffles are reproducible from `seed`.
    pub fn with_seed(rules: TableRules, seed: u64) -> Result<Self, TableError> {
        Self::with_rng(rules, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rules: TableRules, mut rng: ChaCha8Rng) -> Result<Self, TableError> {
        rules.validate()?;
        let shoe = Shoe::new(rules.num_decks, &mut rng);
        log::info!("Opened table with a {}-deck shoe", rules.num_decks);
        Ok(Self {
            rules,
            rng,
            shoe,
            counter: CardCounter::new(rules.num_decks),
            player: Hand::new(),
            dealer: DealerHand::new(),
            phase: GamePhase::Betting,
            balance: rules.starting_balance,
            bet: 0,
            last_outcome: None,
            history: Vec::new(),
            advisory: None,
            events: vec![TableEvent::Shuffled {
                decks: rules.num_decks,
            }],
        })
    }

    /// A table dealing from a prepared shoe, for scripted rounds.
    #[cfg(test)]
    pub(crate) fn with_shoe(rules: TableRules, shoe: Shoe) -> Self {
        let mut table = Self::with_seed(rules, 0).expect("valid rules");
        table.shoe = shoe;
        table.events.clear();
        table
    }

    // ── Commands ──

    pub fn place_bet(&mut self, amount: u64) -> Result<(), TableError> {
        self.require_phase("bet", GamePhase::Betting)?;
        if amount == 0 {
            return Err(self.reject(TableError::EmptyBet));
        }
        if amount > self.balance {
            return Err(self.reject(TableError::InsufficientBalance {
                amount,
                balance: self.balance,
            }));
        }
        self.balance -= amount;
        self.bet += amount;
        log::debug!("Bet {amount}, total bet {}", self.bet);
        Ok(())
    }

    pub fn clear_bet(&mut self) -> Result<(), TableError> {
        self.require_phase("clear", GamePhase::Betting)?;
        self.balance += self.bet;
        self.bet = 0;
        Ok(())
    }

    pub fn deal(&mut self) -> Result<(), TableError> {
        self.require_phase("deal", GamePhase::Betting)?;
        if self.bet == 0 {
            return Err(self.reject(TableError::EmptyBet));
        }

        if self.shoe.needs_reshuffle(self.rules.reshuffle_threshold) {
            self.reshuffle();
        }

        self.last_outcome = None;
        self.advisory = None;
        self.player.clear();
        self.dealer.clear();

        let first = self.shoe.draw()?;
        let second = self.shoe.draw()?;
        let up = self.shoe.draw()?;
        let hole = self.shoe.draw()?;

        self.player.add_card(first);
        self.player.add_card(second);
        self.dealer.add_card(up);
        self.dealer.add_card(hole);

        for card in [first, second] {
            self.counter.register_visible(card);
            self.events.push(TableEvent::Dealt {
                seat: Seat::Player,
                card: SeenCard::FaceUp(card),
            });
        }
        self.counter.register_visible(up);
        self.events.push(TableEvent::Dealt {
            seat: Seat::Dealer,
            card: SeenCard::FaceUp(up),
        });
        self.events.push(TableEvent::Dealt {
            seat: Seat::Dealer,
            card: SeenCard::FaceDown,
        });

        self.phase = GamePhase::PlayerTurn;
        log::debug!(
            "Dealt {first} {second} against {up}, {} cards left",
            self.shoe.len()
        );

        if self.player.is_blackjack() {
            log::debug!("Player natural, standing automatically");
            self.finish_player_turn()?;
        }
        Ok(())
    }

    pub fn hit(&mut self) -> Result<(), TableError> {
        self.require_phase("hit", GamePhase::PlayerTurn)?;
        let total = self.player.value();
        if total >= 21 {
            return Err(self.reject(TableError::HandClosed(total)));
        }

        let card = self.shoe.draw()?;
        self.counter.register_visible(card);
        self.player.add_card(card);
        self.events.push(TableEvent::Dealt {
            seat: Seat::Player,
            card: SeenCard::FaceUp(card),
        });
        log::debug!("Player hits {card} to {}", self.player.value());

        if self.player.is_busted() {
            self.finish_player_turn()?;
        }
        Ok(())
    }

    pub fn stand(&mut self) -> Result<(), TableError> {
        self.require_phase("stand", GamePhase::PlayerTurn)?;
        self.finish_player_turn()
    }

    pub fn reset(&mut self) -> Result<(), TableError> {
        self.require_phase("reset", GamePhase::Settled)?;
        self.player.clear();
        self.dealer.clear();
        self.bet = 0;
        self.last_outcome = None;
        self.advisory = None;
        self.phase = GamePhase::Betting;
        Ok(())
    }

    /// Store the text an advisor produced. The table never interprets it.
    pub fn set_advisory(&mut self, text: impl Into<String>) {
        self.advisory = Some(text.into());
    }

    pub fn clear_advisory(&mut self) {
        self.advisory = None;
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Transitions ──

    fn require_phase(&self, command: &'static str, phase: GamePhase) -> Result<(), TableError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.reject(TableError::WrongPhase {
                command,
                phase: self.phase,
            }))
        }
    }

    fn reject(&self, error: TableError) -> TableError {
        log::debug!("Ignoring command: {error}");
        error
    }

    /// Replace the shoe and restart the count together.
    fn reshuffle(&mut self) {
        log::info!(
            "Reshuffling with {} of {} cards left",
            self.shoe.len(),
            self.shoe.capacity()
        );
        self.shoe = Shoe::new(self.rules.num_decks, &mut self.rng);
        self.counter.reset();
        self.events.push(TableEvent::Reshuffled {
            decks: self.rules.num_decks,
        });
    }

    fn finish_player_turn(&mut self) -> Result<(), TableError> {
        self.phase = GamePhase::DealerTurn;
        let mut policy = DealerPolicy::new(self.player.is_busted());
        while let Some(step) =
            policy.step(&mut self.dealer, &mut self.shoe, &mut self.counter, &self.rules)?
        {
            self.events.push(step.into());
        }
        self.settle();
        Ok(())
    }

    fn settle(&mut self) {
        let player = self.player.evaluate();
        let dealer = self.dealer.evaluate();
        let outcome = resolve(
            player.total,
            dealer.total,
            self.player.is_blackjack(),
            self.dealer.is_blackjack(),
        );
        let payout = outcome.payout(self.bet, &self.rules);
        self.balance = self.balance.saturating_add(payout);

        self.history.push(HandHistoryEntry {
            outcome,
            player_cards: self.player.cards.clone(),
            dealer_cards: self.dealer.cards().to_vec(),
            player_total: player.total,
            dealer_total: dealer.total,
            bet: self.bet,
            payout,
        });
        self.last_outcome = Some(outcome);
        self.phase = GamePhase::Settled;
        self.events.push(TableEvent::Settled { outcome, payout });

        log::info!(
            "{outcome:?}: player {} vs dealer {}, bet {} returned {payout}, balance {}",
            player.total,
            dealer.total,
            self.bet,
            self.balance
        );
    }

    // ── Queries ──

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &DealerHand {
        &self.dealer
    }

    pub fn shoe_len(&self) -> usize {
        self.shoe.len()
    }

    pub fn running_count(&self) -> i32 {
        self.counter.running_count()
    }

    pub fn true_count(&self) -> f64 {
        self.counter.true_count(self.shoe.len())
    }

    pub fn composition(&self) -> &DeckComposition {
        self.counter.composition()
    }

    /// Chance, in percent, that one more card busts the player's current hand.
    pub fn bust_probability(&self) -> f64 {
        bust_probability(self.player.value(), self.shoe.cards())
    }

    pub fn last_outcome(&self) -> Option<HandOutcome> {
        self.last_outcome
    }

    pub fn history(&self) -> &[HandHistoryEntry] {
        &self.history
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_history(&self.history)
    }

    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// The payload for an advisor, available while the player is deciding.
    pub fn advisory_request(&self) -> Option<AdvisoryRequest> {
        if self.phase != GamePhase::PlayerTurn || self.player.len() < 2 {
            return None;
        }
        let up = self.dealer.up_card()?;
        Some(AdvisoryRequest {
            player_ranks: self.player.cards.iter().map(|c| c.rank).collect(),
            player_value: self.player.evaluate(),
            dealer_up_card: up.rank,
            true_count: self.true_count(),
        })
    }

    /// Final-result odds for the dealer given the cards seen so far.
    #[cfg(feature = "odds")]
    pub fn dealer_odds(&self) -> Option<crate::DealerOdds> {
        if self.phase != GamePhase::PlayerTurn {
            return None;
        }
        let up = self.dealer.up_card()?;
        Some(crate::DealerOdds::from_composition(
            up,
            self.counter.composition(),
            &self.rules,
        ))
    }

    pub fn view(&self) -> TableView {
        let player = self.player.evaluate();

        let dealer_cards = self
            .dealer
            .cards()
            .iter()
            .enumerate()
            .map(|(i, &card)| {
                if i == 1 && !self.dealer.hole_revealed() {
                    SeenCard::FaceDown
                } else {
                    SeenCard::FaceUp(card)
                }
            })
            .collect();
        let dealer = self.dealer.visible_value();

        TableView {
            phase: self.phase,
            player: HandView {
                cards: self.player.cards.clone(),
                total: player.total,
                soft: player.soft,
            },
            dealer: DealerView {
                cards: dealer_cards,
                total: dealer.total,
                soft: dealer.soft,
            },
            bet: self.bet,
            balance: self.balance,
            running_count: self.running_count(),
            true_count: self.true_count(),
            bust_probability: self.bust_probability(),
            composition: self.composition().iter().collect(),
            last_outcome: self.last_outcome,
            advisory: self.advisory.clone(),
            cards_remaining: self.shoe.len(),
            decks_remaining: self.shoe.decks_remaining(),
            hands_played: self.history.len(),
        }
    }
}
