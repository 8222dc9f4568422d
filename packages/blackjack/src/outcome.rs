use serde::{Deserialize, Serialize};

use crate::{Card, TableRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandOutcome {
    PlayerBlackjack,
    PlayerBust,
    DealerBust,
    DealerWin,
    PlayerWin,
    Push,
}

impl HandOutcome {
    pub const ALL: [HandOutcome; 6] = [
        HandOutcome::PlayerBlackjack,
        HandOutcome::PlayerBust,
        HandOutcome::DealerBust,
        HandOutcome::DealerWin,
        HandOutcome::PlayerWin,
        HandOutcome::Push,
    ];

    /// Total return on the stake under a 3:2 blackjack payout.
    pub fn multiplier(&self) -> f64 {
        match self {
            HandOutcome::PlayerBlackjack => 2.5,
            HandOutcome::DealerBust | HandOutcome::PlayerWin => 2.0,
            HandOutcome::Push => 1.0,
            HandOutcome::PlayerBust | HandOutcome::DealerWin => 0.0,
        }
    }

    /// Amount handed back to the player for `bet`, stake included. Saturates at
    /// `u64::MAX`.
    pub fn payout(&self, bet: u64, rules: &TableRules) -> u64 {
        match self {
            HandOutcome::PlayerBlackjack => {
                bet.saturating_add(rules.blackjack_payout.calculate_payout(bet))
            }
            HandOutcome::DealerBust | HandOutcome::PlayerWin => bet.saturating_mul(2),
            HandOutcome::Push => bet,
            HandOutcome::PlayerBust | HandOutcome::DealerWin => 0,
        }
    }

    pub fn is_player_win(&self) -> bool {
        matches!(
            self,
            HandOutcome::PlayerBlackjack | HandOutcome::DealerBust | HandOutcome::PlayerWin
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandOutcome::PlayerBlackjack => "Blackjack!",
            HandOutcome::PlayerBust => "Bust!",
            HandOutcome::DealerBust => "Dealer busts!",
            HandOutcome::DealerWin => "Dealer wins",
            HandOutcome::PlayerWin => "You win!",
            HandOutcome::Push => "Push",
        }
    }
}

/// Decide a finished round. Rules are checked in order and the first match wins,
/// so two naturals fall through to a push.
pub fn resolve(
    player_total: u8,
    dealer_total: u8,
    player_blackjack: bool,
    dealer_blackjack: bool,
) -> HandOutcome {
    if player_blackjack && !dealer_blackjack {
        HandOutcome::PlayerBlackjack
    } else if player_total > 21 {
        HandOutcome::PlayerBust
    } else if dealer_total > 21 {
        HandOutcome::DealerBust
    } else if dealer_total > player_total {
        HandOutcome::DealerWin
    } else if player_total > dealer_total {
        HandOutcome::PlayerWin
    } else {
        HandOutcome::Push
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandHistoryEntry {
    pub outcome: HandOutcome,
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Card>,
    pub player_total: u8,
    pub dealer_total: u8,
    pub bet: u64,
    pub payout: u64,
}

impl HandHistoryEntry {
    /// Net change to the balance over the round.
    pub fn net(&self) -> i64 {
        self.payout as i64 - self.bet as i64
    }
}

/// Outcome tallies across a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub hands_played: u32,
    pub player_blackjacks: u32,
    pub player_busts: u32,
    pub dealer_busts: u32,
    pub dealer_wins: u32,
    pub player_wins: u32,
    pub pushes: u32,
    pub total_wagered: u64,
    pub net: i64,
}

impl SessionStats {
    pub fn from_history(history: &[HandHistoryEntry]) -> Self {
        let mut stats = Self::default();
        for entry in history {
            stats.hands_played += 1;
            stats.total_wagered += entry.bet;
            stats.net += entry.net();
            match entry.outcome {
                HandOutcome::PlayerBlackjack => stats.player_blackjacks += 1,
                HandOutcome::PlayerBust => stats.player_busts += 1,
                HandOutcome::DealerBust => stats.dealer_busts += 1,
                HandOutcome::DealerWin => stats.dealer_wins += 1,
                HandOutcome::PlayerWin => stats.player_wins += 1,
                HandOutcome::Push => stats.pushes += 1,
            }
        }
        stats
    }

    pub fn wins(&self) -> u32 {
        self.player_blackjacks + self.dealer_busts + self.player_wins
    }

    pub fn losses(&self) -> u32 {
        self.player_busts + self.dealer_wins
    }
}
