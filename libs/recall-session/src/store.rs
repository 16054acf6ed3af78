//! Card store boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recall_core::{Card, CardStats, Difficulty};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by a card store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("card {0} not found")]
    CardNotFound(i64),

    #[error("storage backend: {0}")]
    Backend(String),
}

/// One processed response, appended to the review log so an external
/// stats aggregator can consume study time and interval history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub card_id: i64,
    pub reviewed_at: DateTime<Utc>,
    pub response: Difficulty,
    /// Whole seconds between answer reveal and response, when known.
    pub time_taken_secs: Option<u32>,
    pub interval_before: u32,
    pub interval_after: u32,
    pub ease_before: f64,
    pub ease_after: f64,
}

/// Persistence boundary for cards and the review log.
///
/// `update_card_stats` must be idempotent: applying the same stats
/// twice yields the same stored state. Two concurrent sessions on
/// different devices may race on the same row; last write wins.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Cards owned by `owner`, optionally narrowed to one deck.
    async fn fetch_cards(&self, owner: Uuid, deck: Option<i64>) -> Result<Vec<Card>, StoreError>;

    /// Write through a card's updated scheduling state.
    async fn update_card_stats(&self, card_id: i64, stats: &CardStats) -> Result<(), StoreError>;

    /// Append one processed response to the review log.
    async fn record_review(&self, record: &ReviewRecord) -> Result<(), StoreError>;
}
