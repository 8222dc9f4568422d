use clap::Parser;
use hilo_blackjack::{bet_units, counted_move, GamePhase, Move, Table, TableError, TableRules};

#[derive(Parser)]
#[command(
    name = "shoe-sim",
    about = "Play a Hi-Lo counting strategy through a shoe and report the result"
)]
struct Args {
    /// Rounds to play
    #[arg(long, default_value_t = 10_000)]
    rounds: u32,

    /// Number of decks in the shoe
    #[arg(long, default_value_t = 6)]
    decks: u8,

    /// Seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Betting unit in minor currency units
    #[arg(long, default_value_t = 100)]
    unit: u64,

    /// Largest bet, in units, the ramp may reach
    #[arg(long, default_value_t = 8)]
    spread: u32,

    /// Fraction of the shoe left when it is reshuffled
    #[arg(long, default_value_t = 0.25)]
    reshuffle_threshold: f64,

    /// Starting bankroll in minor currency units
    #[arg(long, default_value_t = 10_000_000)]
    balance: u64,

    /// Dealer stands on soft 17
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    stand_soft_17: bool,
}

#[derive(Default)]
struct Tally {
    rounds: u32,
    wagered: u64,
    dealer_bust_odds: f64,
    odds_samples: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let rules = TableRules {
        num_decks: args.decks,
        reshuffle_threshold: args.reshuffle_threshold,
        starting_balance: args.balance,
        dealer_hits_soft_17: !args.stand_soft_17,
        ..TableRules::default()
    };

    let table = match args.seed {
        Some(seed) => Table::with_seed(rules, seed),
        None => Table::new(rules),
    };
    let mut table = table.unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    eprintln!("Configuration:");
    eprintln!("  Decks:          {}", rules.num_decks);
    eprintln!(
        "  Dealer soft 17: {}",
        if rules.dealer_hits_soft_17 {
            "hits"
        } else {
            "stands"
        }
    );
    eprintln!("  Reshuffle at:   {:.0}%", rules.reshuffle_threshold * 100.0);
    eprintln!("  Bet ramp:       1-{} x {}", args.spread.max(1), args.unit);
    eprintln!("Playing {} rounds...", args.rounds);

    let mut tally = Tally::default();
    for _ in 0..args.rounds {
        match play_round(&mut table, &args, &mut tally) {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("Bankroll exhausted after {} rounds", tally.rounds);
                break;
            }
            Err(e) => {
                eprintln!("Simulation stopped: {e}");
                std::process::exit(1);
            }
        }
    }

    let stats = table.stats();
    println!("Rounds:          {}", stats.hands_played);
    println!(
        "Wins:            {} ({} blackjacks, {} dealer busts)",
        stats.wins(),
        stats.player_blackjacks,
        stats.dealer_busts
    );
    println!(
        "Losses:          {} ({} player busts)",
        stats.losses(),
        stats.player_busts
    );
    println!("Pushes:          {}", stats.pushes);
    println!("Net:             {:+}", stats.net);
    if tally.wagered > 0 {
        println!(
            "Player return:   {:+.4}%",
            stats.net as f64 / tally.wagered as f64 * 100.0
        );
        println!(
            "Per unit:        {:+.4}",
            stats.net as f64 / (tally.wagered as f64 / args.unit as f64)
        );
    }
    if tally.odds_samples > 0 {
        println!(
            "Dealer bust odds at decision: {:.2}%",
            tally.dealer_bust_odds / tally.odds_samples as f64 * 100.0
        );
    }
}

/// Play one round. Returns `Ok(false)` when the bankroll cannot cover a unit.
fn play_round(table: &mut Table, args: &Args, tally: &mut Tally) -> Result<bool, TableError> {
    let bet = (bet_units(table.true_count(), args.spread) as u64 * args.unit).min(table.balance());
    if bet < args.unit || bet == 0 {
        return Ok(false);
    }

    table.place_bet(bet)?;
    table.deal()?;
    tally.rounds += 1;
    tally.wagered += bet;

    if let Some(odds) = table.dealer_odds() {
        tally.dealer_bust_odds += odds.bust;
        tally.odds_samples += 1;
    }

    while table.phase() == GamePhase::PlayerTurn {
        let Some(request) = table.advisory_request() else {
            break;
        };
        match counted_move(request.player_value, request.dealer_up_card, request.true_count) {
            Move::Hit => table.hit()?,
            Move::Stand => table.stand()?,
        }
    }

    // Dealer steps already ran inside stand; nothing to replay
    table.take_events();
    table.reset()?;
    Ok(true)
}
