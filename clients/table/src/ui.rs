use hilo_blackjack::{Card, GamePhase, HandOutcome, Rank, SeenCard, Suit, TableView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::command::CHIPS;

pub fn ui(f: &mut Frame, app: &App) {
    let view = app.view();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(12),   // Table
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    let rules = app.table().rules();
    let title = Paragraph::new(format!(
        "Hi-Lo Blackjack - {} decks, dealer {} soft 17, blackjack pays {}:{}",
        rules.num_decks,
        if rules.dealer_hits_soft_17 {
            "hits"
        } else {
            "stands on"
        },
        rules.blackjack_payout.numerator,
        rules.blackjack_payout.denominator
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, main_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_chunks[1]);

    let table_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(columns[0]);

    render_dealer(f, &view, table_area[0]);
    render_player(f, &view, table_area[1]);
    render_bankroll(f, &view, table_area[2]);

    let side = if app.log_visible {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(16), Constraint::Percentage(40)])
            .split(columns[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(16)])
            .split(columns[1])
    };
    render_count(f, app, &view, side[0]);
    if app.log_visible {
        render_log(f, app, side[1]);
    }

    let status = Paragraph::new(format!("{}    [L]og  [Q]uit", app.status))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, main_chunks[2]);
}

fn suit_color(suit: Suit) -> Color {
    match suit {
        Suit::Hearts => Color::Red,
        Suit::Diamonds => Color::from_u32(0xFF_A5_00), // Orange
        Suit::Clubs => Color::Magenta,
        Suit::Spades => Color::Black,
    }
}

fn card_span(card: Card) -> Span<'static> {
    Span::styled(
        format!("{} ", card.to_display()),
        Style::default().fg(suit_color(card.suit)).bg(Color::Gray),
    )
}

fn hidden_span() -> Span<'static> {
    Span::styled("?? ", Style::default().fg(Color::White).bg(Color::DarkGray))
}

fn centered(lines: Vec<Line<'static>>, area: Rect) -> Vec<Line<'static>> {
    let height = area.height.saturating_sub(2);
    let padding = height.saturating_sub(lines.len() as u16) / 2;
    let mut out = vec![Line::from(""); padding as usize];
    out.extend(lines);
    out
}

fn render_dealer(f: &mut Frame, view: &TableView, area: Rect) {
    let cards: Vec<Span> = view
        .dealer
        .cards
        .iter()
        .map(|seen| match seen {
            SeenCard::FaceUp(card) => card_span(*card),
            SeenCard::FaceDown => hidden_span(),
        })
        .collect();

    let title = if view.dealer.cards.is_empty() {
        " Dealer ".to_string()
    } else {
        format!(" Dealer ({}) ", total_label(view.dealer.total, view.dealer.soft))
    };

    let block = Paragraph::new(centered(vec![Line::from(cards)], area))
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(block, area);
}

fn render_player(f: &mut Frame, view: &TableView, area: Rect) {
    let cards: Vec<Span> = view.player.cards.iter().map(|c| card_span(*c)).collect();

    let mut lines = vec![Line::from(cards)];
    if view.phase == GamePhase::PlayerTurn {
        let advice = view.advisory.clone().unwrap_or_default();
        let hit_style = advice_style(&advice, "Hit");
        let stand_style = advice_style(&advice, "Stand");
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("↑", hit_style),
            Span::raw(" Hit  "),
            Span::styled("↓", stand_style),
            Span::raw(" Stand"),
        ]));
        lines.push(Line::from(vec![
            Span::raw("Advice: "),
            Span::styled(advice, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
        lines.push(Line::from(format!(
            "Bust on next card: {:.1}%",
            view.bust_probability
        )));
    }
    if let Some(outcome) = view.last_outcome {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            outcome.label(),
            outcome_style(outcome),
        )));
    }

    let border_style = match (view.phase, view.last_outcome) {
        (GamePhase::PlayerTurn, _) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (GamePhase::Settled, Some(outcome)) => outcome_style(outcome),
        _ => Style::default(),
    };
    let title = if view.player.cards.is_empty() {
        " You ".to_string()
    } else {
        format!(" You ({}) ", total_label(view.player.total, view.player.soft))
    };

    let block = Paragraph::new(centered(lines, area))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .alignment(Alignment::Center);
    f.render_widget(block, area);
}

fn render_bankroll(f: &mut Frame, view: &TableView, area: Rect) {
    let mut chips: Vec<Span> = Vec::new();
    for (i, chip) in CHIPS.iter().enumerate() {
        let style = if view.phase == GamePhase::Betting && *chip <= view.balance {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        chips.push(Span::styled(format!("[{}] {}  ", i + 1, money(*chip)), style));
    }

    let lines = vec![
        Line::from(format!(
            "Balance {}   Bet {}",
            money(view.balance),
            money(view.bet)
        )),
        Line::from(chips),
    ];
    let block = Paragraph::new(lines)
        .block(Block::default().title(" Bankroll ").borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(block, area);
}

fn render_count(f: &mut Frame, app: &App, view: &TableView, area: Rect) {
    let mut lines = vec![
        Line::from(format!("Running count: {:+}", view.running_count)),
        Line::from(format!("True count:    {:+.2}", view.true_count)),
        Line::from(format!(
            "Shoe:          {} cards ({:.1} decks)",
            view.cards_remaining, view.decks_remaining
        )),
        Line::from(""),
    ];

    // Ten-valued ranks share a bar
    let tens: u16 = [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King]
        .iter()
        .map(|r| view.composition.get(r).copied().unwrap_or_default())
        .sum();
    let mut bars: Vec<(&str, u16)> = Rank::ALL[..9]
        .iter()
        .map(|r| (r.label(), view.composition.get(r).copied().unwrap_or_default()))
        .collect();
    bars.push(("T", tens));
    let full = 4 * app.table().rules().num_decks as u16;
    for (label, left) in bars {
        let scale = if label == "T" { full * 4 } else { full };
        let width = (left as usize * 12).checked_div(scale as usize).unwrap_or(0);
        lines.push(Line::from(format!(
            "{label:>2} {:<12} {left}",
            "█".repeat(width)
        )));
    }

    if let Some(odds) = app.odds() {
        if view.phase == GamePhase::PlayerTurn {
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Dealer busts: {:.1}%", odds.bust * 100.0)));
            let finals: Vec<String> = (17..=21)
                .map(|t| format!("{t}:{:.0}%", odds.probability_of(t) * 100.0))
                .collect();
            lines.push(Line::from(finals.join(" ")));
            lines.push(Line::from(format!(
                "Stand EV: {:+.3}",
                odds.stand_ev(view.player.total)
            )));
        }
    }

    let stats = app.table().stats();
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Hands {}  W {}  L {}  P {}  Net {:+}",
        stats.hands_played,
        stats.wins(),
        stats.losses(),
        stats.pushes,
        stats.net
    )));

    let block = Paragraph::new(lines)
        .block(Block::default().title(" Count ").borders(Borders::ALL));
    f.render_widget(block, area);
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let skip = app.logs.len().saturating_sub(height);
    let lines: Vec<Line> = app
        .logs
        .iter()
        .skip(skip)
        .map(|msg| Line::from(msg.as_str()))
        .collect();

    let block = Paragraph::new(lines)
        .block(Block::default().title(" Log ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(block, area);
}

fn advice_style(advice: &str, choice: &str) -> Style {
    if advice == choice {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn outcome_style(outcome: HandOutcome) -> Style {
    match outcome {
        HandOutcome::Push => Style::default().fg(Color::DarkGray),
        o if o.is_player_win() => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn total_label(total: u8, soft: bool) -> String {
    if soft {
        format!("soft {total}")
    } else {
        total.to_string()
    }
}

/// Minor units as a decimal amount.
pub fn money(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(170_000), "1700.00");
        assert_eq!(money(250), "2.50");
        assert_eq!(money(5), "0.05");
    }

    #[test]
    fn test_total_label() {
        assert_eq!(total_label(17, true), "soft 17");
        assert_eq!(total_label(20, false), "20");
    }
}
