use std::str::FromStr;

use hilo_blackjack::{Table, TableError};
use thiserror::Error;

/// Chip denominations offered at the table, in minor units.
pub const CHIPS: [u64; 5] = [100, 500, 1_000, 10_000, 50_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bet(u64),
    Clear,
    Deal,
    Hit,
    Stand,
    Reset,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("bet needs a whole amount, got '{0}'")]
    BadAmount(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        match verb.as_str() {
            "bet" => {
                let amount = words.next().unwrap_or_default();
                amount
                    .parse()
                    .map(Command::Bet)
                    .map_err(|_| ParseCommandError::BadAmount(amount.to_string()))
            }
            "clear" => Ok(Command::Clear),
            "deal" => Ok(Command::Deal),
            "hit" => Ok(Command::Hit),
            "stand" => Ok(Command::Stand),
            "reset" | "next" => Ok(Command::Reset),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(ParseCommandError::Unknown(s.trim().to_string())),
        }
    }
}

impl Command {
    /// Apply to the table. `Quit` is handled by the caller and does nothing here.
    pub fn apply(self, table: &mut Table) -> Result<(), TableError> {
        match self {
            Command::Bet(amount) => table.place_bet(amount),
            Command::Clear => table.clear_bet(),
            Command::Deal => table.deal(),
            Command::Hit => table.hit(),
            Command::Stand => table.stand(),
            Command::Reset => table.reset(),
            Command::Quit => Ok(()),
        }
    }

    /// Whether the player's hand may have changed, so advice should be refreshed.
    pub fn changes_hand(self) -> bool {
        matches!(self, Command::Deal | Command::Hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_blackjack::{GamePhase, TableRules};

    #[test]
    fn test_parse_commands() {
        assert_eq!("bet 500".parse::<Command>(), Ok(Command::Bet(500)));
        assert_eq!("  DEAL ".parse::<Command>(), Ok(Command::Deal));
        assert_eq!("next".parse::<Command>(), Ok(Command::Reset));
        assert_eq!("hit".parse::<Command>(), Ok(Command::Hit));
        assert_eq!(
            "bet lots".parse::<Command>(),
            Err(ParseCommandError::BadAmount("lots".to_string()))
        );
        assert_eq!(
            "bet".parse::<Command>(),
            Err(ParseCommandError::BadAmount(String::new()))
        );
        assert_eq!(
            "split".parse::<Command>(),
            Err(ParseCommandError::Unknown("split".to_string()))
        );
    }

    #[test]
    fn test_apply_drives_the_table() {
        let mut table = Table::with_seed(TableRules::default(), 5).unwrap();
        Command::Bet(CHIPS[1]).apply(&mut table).unwrap();
        assert_eq!(table.bet(), 500);
        Command::Deal.apply(&mut table).unwrap();
        assert_ne!(table.phase(), GamePhase::Betting);
        assert!(Command::Deal.apply(&mut table).is_err());
    }
}
