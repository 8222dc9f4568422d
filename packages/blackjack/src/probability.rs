use crate::Card;

/// Chance, in percent, that the next card from `remaining` busts a hand totalling `total`.
///
/// Each card counts at its highest value (an ace as 11), so this is the
/// single-draw probability over the actual remaining cards.
pub fn bust_probability(total: u8, remaining: &[Card]) -> f64 {
    if total >= 21 {
        return 100.0;
    }

    let threshold = 22 - total;
    if threshold <= 1 {
        return 100.0;
    }
    if threshold > 11 {
        return 0.0;
    }
    if remaining.is_empty() {
        return 0.0;
    }

    let busting = remaining.iter().filter(|c| c.value() >= threshold).count();
    busting as f64 / remaining.len() as f64 * 100.0
}
