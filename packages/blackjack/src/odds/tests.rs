use super::*;
use crate::{CardCounter, Rank, Suit};

fn card(rank: Rank) -> Card {
    Card::new(rank, Suit::Clubs)
}

fn sum(odds: &DealerOdds) -> f64 {
    odds.bust + odds.totals.iter().sum::<f64>()
}

#[test]
fn test_add_to_hand_basic() {
    assert_eq!(DealerOddsCalculator::add_to_hand(5, false, 3), (8, false));
    assert_eq!(DealerOddsCalculator::add_to_hand(0, false, 1), (11, true));
    assert_eq!(DealerOddsCalculator::add_to_hand(15, true, 8), (13, false));
    assert_eq!(DealerOddsCalculator::add_to_hand(10, false, 1), (21, true));
    assert_eq!(DealerOddsCalculator::add_to_hand(15, false, 1), (16, false));
}

#[test]
fn test_hard_17_stands() {
    let mut calc = DealerOddsCalculator::new(TableRules::single_deck());
    let probs = calc.dealer_probs(DeckComposition::full(1).by_value(), 17, false);
    assert!((probs[1] - 1.0).abs() < 1e-10);
}

#[test]
fn test_soft_17_hits_by_default() {
    let mut calc = DealerOddsCalculator::new(TableRules::single_deck());
    let probs = calc.dealer_probs(DeckComposition::full(1).by_value(), 17, true);
    assert!(probs[1] < 1.0);
    let total: f64 = probs.iter().sum();
    assert!((total - 1.0).abs() < 1e-10);
}

#[test]
fn test_soft_17_stands_when_rule_disabled() {
    let mut rules = TableRules::single_deck();
    rules.dealer_hits_soft_17 = false;
    let mut calc = DealerOddsCalculator::new(rules);
    let probs = calc.dealer_probs(DeckComposition::full(1).by_value(), 17, true);
    assert!((probs[1] - 1.0).abs() < 1e-10);
}

#[test]
fn test_distribution_sums_to_one_for_every_up_card() {
    let rules = TableRules::single_deck();
    for rank in Rank::ALL {
        let mut counter = CardCounter::new(1);
        counter.register_visible(card(rank));
        let odds = DealerOdds::from_composition(card(rank), counter.composition(), &rules);
        assert!((sum(&odds) - 1.0).abs() < 1e-9, "{rank:?}: {}", sum(&odds));
    }
}

#[test]
fn test_six_busts_more_than_ten() {
    let rules = TableRules::default();
    let mut six = CardCounter::new(6);
    six.register_visible(card(Rank::Six));
    let mut ten = CardCounter::new(6);
    ten.register_visible(card(Rank::Ten));

    let odds_six = DealerOdds::from_composition(card(Rank::Six), six.composition(), &rules);
    let odds_ten = DealerOdds::from_composition(card(Rank::Ten), ten.composition(), &rules);
    assert!(odds_six.bust > 0.38 && odds_six.bust < 0.46, "{}", odds_six.bust);
    assert!(odds_ten.bust < odds_six.bust);
}

#[test]
fn test_rich_in_tens_raises_bust_chance() {
    let rules = TableRules::single_deck();
    let mut neutral = CardCounter::new(1);
    neutral.register_visible(card(Rank::Six));
    let mut rich = neutral.clone();
    for _ in 0..4 {
        rich.register_visible(card(Rank::Two));
        rich.register_visible(card(Rank::Three));
    }
    let base = DealerOdds::from_composition(card(Rank::Six), neutral.composition(), &rules);
    let hot = DealerOdds::from_composition(card(Rank::Six), rich.composition(), &rules);
    assert!(hot.bust > base.bust);
}

#[test]
fn test_stand_ev() {
    let all_bust = DealerOdds::from_probs([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert!((all_bust.stand_ev(12) - 1.0).abs() < 1e-10);

    let twenty = DealerOdds::from_probs([0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assert!(twenty.stand_ev(20).abs() < 1e-10);
    assert!((twenty.stand_ev(19) + 1.0).abs() < 1e-10);
    assert!((twenty.stand_ev(23) + 1.0).abs() < 1e-10);
}

#[test]
fn test_cache_is_reused() {
    let rules = TableRules::single_deck();
    let mut calc = DealerOddsCalculator::new(rules);
    let mut counter = CardCounter::new(1);
    counter.register_visible(card(Rank::Five));
    let first = calc.outcomes(card(Rank::Five), counter.composition());
    let cached = calc.cache_len();
    let second = calc.outcomes(card(Rank::Five), counter.composition());
    assert_eq!(first, second);
    assert_eq!(calc.cache_len(), cached);
}

#[test]
fn test_empty_composition_leaves_dealer_short() {
    let rules = TableRules::single_deck();
    let empty = {
        let mut counter = CardCounter::new(1);
        for i in 0..52 {
            counter.register_visible(Card::from_index(i));
        }
        *counter.composition()
    };
    let odds = DealerOdds::from_composition(card(Rank::Ten), &empty, &rules);
    assert_eq!(odds.bust, 1.0);
}
