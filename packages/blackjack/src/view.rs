use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Card, GamePhase, HandOutcome, HandValue, Rank};

/// A dealer card as the player sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeenCard {
    FaceUp(Card),
    FaceDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub total: u8,
    pub soft: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerView {
    pub cards: Vec<SeenCard>,
    /// Total of the face-up cards only.
    pub total: u8,
    pub soft: bool,
}

/// Everything a front end needs to draw the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub phase: GamePhase,
    pub player: HandView,
    pub dealer: DealerView,
    pub bet: u64,
    pub balance: u64,
    pub running_count: i32,
    pub true_count: f64,
    pub bust_probability: f64,
    pub composition: BTreeMap<Rank, u16>,
    pub last_outcome: Option<HandOutcome>,
    pub advisory: Option<String>,
    pub cards_remaining: usize,
    pub decks_remaining: f64,
    pub hands_played: usize,
}

/// Facts an outside advisor needs to suggest the next move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub player_ranks: Vec<Rank>,
    pub player_value: HandValue,
    pub dealer_up_card: Rank,
    pub true_count: f64,
}

impl AdvisoryRequest {
    pub fn player_total(&self) -> u8 {
        self.player_value.total
    }
}
