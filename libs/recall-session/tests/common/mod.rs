//! Test fixtures and factory functions shared by session tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use recall_core::{Card, CardStats};
use recall_session::Clock;

/// Fixed reference instant for deterministic assertions.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// Seeded rng so orderings and jitter are reproducible.
pub fn rng() -> Box<StdRng> {
    Box::new(StdRng::seed_from_u64(17))
}

/// Clock that advances by a fixed step on every reading, so
/// reveal-to-response study time comes out as whole, known seconds.
pub struct TickingClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl TickingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().expect("clock lock");
        let reading = *current;
        *current = reading + self.step;
        reading
    }
}

/// A new card with default stats.
pub fn card(id: i64, deck_id: i64) -> Card {
    Card {
        id,
        deck_id,
        front: format!("Question {id}?"),
        back: format!("Answer {id}."),
        stats: CardStats::default(),
    }
}

/// A deck of `count` new cards with ids 1..=count.
pub fn deck(deck_id: i64, count: i64) -> Vec<Card> {
    (1..=count).map(|id| card(id, deck_id)).collect()
}

pub fn owner() -> Uuid {
    Uuid::new_v4()
}
