//! Due-card selection and session ordering.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::Card;

/// Whether a card is due at `now`. A card that has never been
/// scheduled is always due.
pub fn is_due(next_review: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match next_review {
        Some(due) => due <= now,
        None => true,
    }
}

/// Number of cards due at `now`.
pub fn due_count(cards: &[Card], now: DateTime<Utc>) -> usize {
    cards
        .iter()
        .filter(|c| is_due(c.stats.next_review, now))
        .count()
}

/// All due cards in a randomized presentation order.
///
/// An empty result means nothing is due; callers present an empty
/// state rather than treating it as an error.
pub fn select_due<R>(cards: &[Card], now: DateTime<Utc>, rng: &mut R) -> Vec<Card>
where
    R: Rng + ?Sized,
{
    let mut due: Vec<Card> = cards
        .iter()
        .filter(|c| is_due(c.stats.next_review, now))
        .cloned()
        .collect();
    due.shuffle(rng);
    due
}

/// Single-deck ordering: the whole deck shuffled regardless of
/// due-ness, with the card that opened the session moved to the
/// front. If the lead id is not in the deck the shuffled order
/// stands.
pub fn deck_queue<R>(cards: &[Card], lead_card_id: i64, rng: &mut R) -> Vec<Card>
where
    R: Rng + ?Sized,
{
    let mut queue = cards.to_vec();
    queue.shuffle(rng);
    if let Some(pos) = queue.iter().position(|c| c.id == lead_card_id) {
        let lead = queue.remove(pos);
        queue.insert(0, lead);
    }
    queue
}
