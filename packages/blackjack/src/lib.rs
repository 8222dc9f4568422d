mod card;
mod counter;
mod dealer;
mod error;
mod game_state;
mod hand;
mod outcome;
mod probability;
mod rules;
mod shoe;
mod strategy;
mod view;
#[cfg(feature = "odds")]
mod odds;

pub use card::{Card, Rank, Suit};
pub use counter::{hi_lo_weight, CardCounter, DeckComposition};
pub use dealer::{dealer_should_hit, DealerPolicy, DealerState, DealerStep};
pub use error::TableError;
pub use game_state::{GamePhase, Seat, Table, TableEvent};
pub use hand::{
    calculate_hand_value, evaluate, is_blackjack, is_busted, is_soft_hand, DealerHand, Hand,
    HandValue,
};
pub use outcome::{resolve, HandHistoryEntry, HandOutcome, SessionStats};
pub use probability::bust_probability;
pub use rules::{PayoutRatio, TableRules, MAX_STARTING_BALANCE, ROUND_RESERVE};
pub use shoe::Shoe;
pub use strategy::{basic_move, bet_units, counted_move, Move};
pub use view::{AdvisoryRequest, DealerView, HandView, SeenCard, TableView};
#[cfg(feature = "odds")]
pub use odds::{DealerOdds, DealerOddsCalculator};
