//! Renderer-facing session snapshots.

use chrono::{DateTime, Utc};
use recall_core::Mastery;
use serde::Serialize;

/// Snapshot of the card currently presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub card_id: i64,
    pub front: String,
    pub back: String,
    pub show_answer: bool,
    /// 1-based position within the working set.
    pub position: usize,
    pub total: usize,
    /// Consecutive non-hard reviews (win streak).
    pub streak: u32,
    /// Ease relative to the 2.5 baseline, in percent.
    pub ease_percent: i64,
    pub mastery: Mastery,
    pub lapses: u32,
}

/// Snapshot of the whole session for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Absent once the session has finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardView>,
    pub reviewed: u32,
    pub finished: bool,
    /// True when at least one write-through failed. Progress
    /// continued locally; the embedder decides how to surface it.
    pub save_failed: bool,
}

/// End-of-session summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub reviewed: u32,
    pub save_failed: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}
