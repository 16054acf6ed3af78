//! In-memory card store for tests and embedders without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use recall_core::{Card, CardStats};
use uuid::Uuid;

use crate::store::{CardStore, ReviewRecord, StoreError};

/// Single-owner store backed by a Vec, so fetches keep insertion
/// order and tests stay deterministic.
pub struct MemoryStore {
    owner: Uuid,
    cards: Mutex<Vec<Card>>,
    reviews: Mutex<Vec<ReviewRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new(owner: Uuid, cards: Vec<Card>) -> Self {
        Self {
            owner,
            cards: Mutex::new(cards),
            reviews: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail, to exercise the session's
    /// write-failure policy.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored copy of a card.
    pub fn card(&self, card_id: i64) -> Option<Card> {
        let cards = self.cards.lock().expect("cards lock");
        cards.iter().find(|c| c.id == card_id).cloned()
    }

    /// Review log contents.
    pub fn reviews(&self) -> Vec<ReviewRecord> {
        self.reviews.lock().expect("reviews lock").clone()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn fetch_cards(&self, owner: Uuid, deck: Option<i64>) -> Result<Vec<Card>, StoreError> {
        if owner != self.owner {
            return Ok(Vec::new());
        }
        let cards = self.cards.lock().expect("cards lock");
        Ok(cards
            .iter()
            .filter(|c| deck.map_or(true, |d| c.deck_id == d))
            .cloned()
            .collect())
    }

    async fn update_card_stats(&self, card_id: i64, stats: &CardStats) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        let mut cards = self.cards.lock().expect("cards lock");
        let card = cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or(StoreError::CardNotFound(card_id))?;
        card.stats = stats.clone();
        Ok(())
    }

    async fn record_review(&self, record: &ReviewRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        self.reviews.lock().expect("reviews lock").push(record.clone());
        Ok(())
    }
}
