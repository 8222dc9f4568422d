use std::time::Duration;

use clap::Parser;
use hilo_blackjack::{Table, TableError, TableRules};

#[derive(Parser, Debug, Clone)]
#[command(name = "hilo-table", about = "Single-seat blackjack with a live Hi-Lo count")]
pub struct Config {
    /// Decks in the shoe
    #[arg(long, env = "HILO_DECKS", default_value_t = 6)]
    pub decks: u8,

    /// Fraction of the shoe left when it is reshuffled
    #[arg(long, env = "HILO_RESHUFFLE_THRESHOLD", default_value_t = 0.25)]
    pub reshuffle_threshold: f64,

    /// Starting balance in minor currency units
    #[arg(long, env = "HILO_BALANCE", default_value_t = 170_000)]
    pub balance: u64,

    /// Seed for reproducible shuffles
    #[arg(long, env = "HILO_SEED")]
    pub seed: Option<u64>,

    /// Pause between dealer cards, in milliseconds
    #[arg(long, env = "HILO_DEALER_PAUSE_MS", default_value_t = 800)]
    pub dealer_pause_ms: u64,

    /// Quiet period before the advisor is asked, in milliseconds
    #[arg(long, env = "HILO_ADVISOR_DELAY_MS", default_value_t = 750)]
    pub advisor_delay_ms: u64,

    /// Longest wait for an advisor answer, in milliseconds
    #[arg(long, env = "HILO_ADVISOR_TIMEOUT_MS", default_value_t = 2_000)]
    pub advisor_timeout_ms: u64,

    /// Dealer stands on soft 17
    #[arg(long, env = "HILO_STAND_SOFT_17", default_value_t = false, action = clap::ArgAction::Set)]
    pub stand_soft_17: bool,

    /// Read commands from stdin and write the table as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl Config {
    pub fn rules(&self) -> TableRules {
        TableRules {
            num_decks: self.decks,
            reshuffle_threshold: self.reshuffle_threshold,
            starting_balance: self.balance,
            dealer_hits_soft_17: !self.stand_soft_17,
            ..TableRules::default()
        }
    }

    pub fn open_table(&self) -> Result<Table, TableError> {
        match self.seed {
            Some(seed) => Table::with_seed(self.rules(), seed),
            None => Table::new(self.rules()),
        }
    }

    pub fn dealer_pause(&self) -> Duration {
        Duration::from_millis(self.dealer_pause_ms)
    }

    pub fn advisor_delay(&self) -> Duration {
        Duration::from_millis(self.advisor_delay_ms)
    }

    pub fn advisor_timeout(&self) -> Duration {
        Duration::from_millis(self.advisor_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_table_rules() {
        let config = Config::parse_from(["hilo-table"]);
        assert_eq!(config.rules(), TableRules::default());
        assert_eq!(config.dealer_pause(), Duration::from_millis(800));
        assert_eq!(config.advisor_delay(), Duration::from_millis(750));
        assert!(!config.json);
    }

    #[test]
    fn test_flags_override_rules() {
        let config = Config::parse_from([
            "hilo-table",
            "--decks",
            "2",
            "--balance",
            "5000",
            "--stand-soft-17",
            "true",
            "--seed",
            "11",
        ]);
        let rules = config.rules();
        assert_eq!(rules.num_decks, 2);
        assert_eq!(rules.starting_balance, 5000);
        assert!(!rules.dealer_hits_soft_17);

        let table = config.open_table().unwrap();
        assert_eq!(table.shoe_len(), 104);
        assert_eq!(table.balance(), 5000);
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let config = Config::parse_from(["hilo-table", "--reshuffle-threshold", "1.5"]);
        assert!(matches!(
            config.open_table(),
            Err(TableError::InvalidRules(_))
        ));

        let config = Config::parse_from(["hilo-table", "--balance", "18446744073709551615"]);
        assert!(matches!(
            config.open_table(),
            Err(TableError::InvalidRules(_))
        ));
    }
}
