use std::collections::VecDeque;
use std::time::{Duration, Instant};

use hilo_blackjack::{
    evaluate, hi_lo_weight, Card, DealerOdds, GamePhase, SeenCard, Seat, Table, TableError,
    TableEvent, TableView,
};
use tokio::sync::mpsc;

use crate::advisor::{BasicStrategyAdvisor, Debouncer, Suggestion, THINKING};
use crate::command::Command;
use crate::config::Config;
use crate::tui_logger::LogBuffer;

const LOG_LINES: usize = 50;

pub struct App {
    table: Table,
    debouncer: Debouncer<BasicStrategyAdvisor>,
    suggestions: mpsc::UnboundedReceiver<Suggestion>,
    dealer_pause: Duration,
    replay: VecDeque<TableEvent>,
    next_step: Option<Instant>,
    odds: Option<DealerOdds>,
    pub status: String,
    pub logs: Vec<String>,
    log_buffer: Option<LogBuffer>,
    pub log_visible: bool,
}

impl App {
    /// Must be called inside a tokio runtime; the advisor runs on spawned tasks.
    pub fn new(table: Table, config: &Config, log_buffer: Option<LogBuffer>) -> App {
        let (debouncer, suggestions) = Debouncer::new(
            BasicStrategyAdvisor,
            config.advisor_delay(),
            config.advisor_timeout(),
        );
        let mut app = App {
            table,
            debouncer,
            suggestions,
            dealer_pause: config.dealer_pause(),
            replay: VecDeque::new(),
            next_step: None,
            odds: None,
            status: String::new(),
            logs: vec!["Welcome to the table. Place a bet to begin.".to_string()],
            log_buffer,
            log_visible: true,
        };
        app.absorb_events(Instant::now());
        app.status = app.prompt();
        app
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// True while dealer steps are still being shown.
    pub fn replaying(&self) -> bool {
        !self.replay.is_empty()
    }

    pub fn odds(&self) -> Option<&DealerOdds> {
        self.odds.as_ref()
    }

    /// The table as the player should currently see it.
    pub fn view(&self) -> TableView {
        staged(self.table.view(), &self.replay)
    }

    /// Run one command. Only a fatal error is returned; rejections are ignored.
    pub fn handle(&mut self, command: Command, now: Instant) -> Result<(), TableError> {
        if self.replaying() {
            self.status = "Dealer is playing...".to_string();
            return Ok(());
        }

        match command.apply(&mut self.table) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => {
                log::error!("Session over: {e}");
                self.status = format!("Session over: {e}");
                return Err(e);
            }
            Err(e) => {
                log::debug!("{e}");
                return Ok(());
            }
        }

        self.absorb_events(now);
        self.refresh_advice(command);
        self.odds = self.table.dealer_odds();
        self.status = self.prompt();
        Ok(())
    }

    /// Advance timers: pull log lines, apply advice, show the next dealer step.
    pub fn tick(&mut self, now: Instant) {
        self.sync_logs();

        while let Ok(suggestion) = self.suggestions.try_recv() {
            if self.debouncer.is_current(&suggestion)
                && self.table.phase() == GamePhase::PlayerTurn
            {
                self.table.set_advisory(suggestion.text);
            } else {
                log::debug!("Dropping stale advice from request {}", suggestion.generation);
            }
        }

        if let Some(due) = self.next_step {
            if now >= due {
                if let Some(event) = self.replay.pop_front() {
                    self.narrate(&event);
                }
                self.next_step = if self.replay.is_empty() {
                    self.status = self.prompt();
                    None
                } else {
                    Some(now + self.dealer_pause)
                };
            }
        }
    }

    pub fn toggle_log(&mut self) {
        self.log_visible = !self.log_visible;
    }

    fn absorb_events(&mut self, now: Instant) {
        for event in self.table.take_events() {
            match event {
                TableEvent::HoleRevealed(_)
                | TableEvent::DealerDrew(_)
                | TableEvent::DealerStood(_)
                | TableEvent::Settled { .. } => self.replay.push_back(event),
                other => self.narrate(&other),
            }
        }
        if !self.replay.is_empty() && self.next_step.is_none() {
            self.next_step = Some(now + self.dealer_pause);
        }
    }

    fn refresh_advice(&mut self, command: Command) {
        if self.table.phase() != GamePhase::PlayerTurn {
            self.debouncer.cancel();
            self.table.clear_advisory();
            return;
        }
        if command.changes_hand() {
            if let Some(request) = self.table.advisory_request() {
                self.debouncer.schedule(request);
                self.table.set_advisory(THINKING);
            }
        }
    }

    fn narrate(&mut self, event: &TableEvent) {
        let line = match event {
            TableEvent::Shuffled { decks } => format!("Fresh {decks}-deck shoe"),
            TableEvent::Reshuffled { decks } => {
                format!("Reshuffled {decks} decks, count starts over")
            }
            TableEvent::Dealt {
                seat: Seat::Player,
                card: SeenCard::FaceUp(card),
            } => format!("You get {card}"),
            TableEvent::Dealt {
                seat: Seat::Dealer,
                card: SeenCard::FaceUp(card),
            } => format!("Dealer shows {card}"),
            TableEvent::Dealt {
                card: SeenCard::FaceDown,
                ..
            } => "Dealer takes a hole card".to_string(),
            TableEvent::HoleRevealed(card) => format!("Dealer reveals {card}"),
            TableEvent::DealerDrew(card) => format!("Dealer draws {card}"),
            TableEvent::DealerStood(value) => format!("Dealer stands on {}", value.total),
            TableEvent::Settled { outcome, payout } => {
                format!("{}, {payout} returned", outcome.label())
            }
        };
        self.add_log(line);
    }

    fn sync_logs(&mut self) {
        let messages: Vec<String> = match &self.log_buffer {
            Some(buffer) => match buffer.lock() {
                Ok(mut buffer) => buffer.drain(..).collect(),
                Err(_) => Vec::new(),
            },
            None => Vec::new(),
        };
        for msg in messages {
            self.add_log(msg);
        }
    }

    fn add_log(&mut self, message: String) {
        self.logs.push(message);
        if self.logs.len() > LOG_LINES {
            self.logs.remove(0);
        }
    }

    fn prompt(&self) -> String {
        if self.replaying() {
            return "Dealer is playing...".to_string();
        }
        match self.table.phase() {
            GamePhase::Betting if self.table.bet() == 0 => {
                "Bet with [1]-[5], then [D]eal".to_string()
            }
            GamePhase::Betting => format!(
                "Bet {}: add chips with [1]-[5], [C]lear or [D]eal",
                self.table.bet()
            ),
            GamePhase::PlayerTurn => "[H]it or [S]tand".to_string(),
            GamePhase::DealerTurn => "Dealer is playing...".to_string(),
            GamePhase::Settled => "[N]ext hand".to_string(),
        }
    }
}

/// Hide the dealer steps that have not been shown yet.
///
/// The table settles the whole dealer turn at once; while its events are
/// still queued the hole card stays face down, undrawn cards are left out of
/// the hand and the count, and the payout is held back.
pub fn staged(mut view: TableView, pending: &VecDeque<TableEvent>) -> TableView {
    if pending.is_empty() {
        return view;
    }

    let mut hidden: Vec<Card> = Vec::new();
    let mut hole_pending = false;
    let mut unpaid = None;
    for event in pending {
        match event {
            TableEvent::HoleRevealed(card) => {
                hole_pending = true;
                hidden.push(*card);
            }
            TableEvent::DealerDrew(card) => hidden.push(*card),
            TableEvent::Settled { payout, .. } => unpaid = Some(*payout),
            _ => {}
        }
    }

    let draws = hidden.len() - usize::from(hole_pending);
    let keep = view.dealer.cards.len().saturating_sub(draws);
    view.dealer.cards.truncate(keep);
    if hole_pending {
        if let Some(hole) = view.dealer.cards.get_mut(1) {
            *hole = SeenCard::FaceDown;
        }
    }
    let shown: Vec<Card> = view
        .dealer
        .cards
        .iter()
        .filter_map(|c| match c {
            SeenCard::FaceUp(card) => Some(*card),
            SeenCard::FaceDown => None,
        })
        .collect();
    let value = evaluate(&shown);
    view.dealer.total = value.total;
    view.dealer.soft = value.soft;

    for card in &hidden {
        view.running_count -= hi_lo_weight(card.rank);
        *view.composition.entry(card.rank).or_default() += 1;
    }
    view.cards_remaining += draws;
    view.decks_remaining = view.cards_remaining as f64 / 52.0;
    view.true_count = if view.cards_remaining == 0 {
        0.0
    } else {
        view.running_count as f64 / view.decks_remaining
    };

    if let Some(payout) = unpaid {
        view.balance = view.balance.saturating_sub(payout);
        view.last_outcome = None;
        view.hands_played = view.hands_played.saturating_sub(1);
    }
    view.phase = GamePhase::DealerTurn;
    view
}
