//! Scheduling core for the recall spaced-repetition system.
//!
//! Provides:
//! - Modified SM-2 scheduling algorithm (interval/ease/streak update)
//! - Due-card selection and session ordering
//! - Shared types (Card, CardStats, Difficulty, Mastery)
//!
//! Everything here is pure computation; the only collaborator is an
//! injected random source driving shuffle order and due-date jitter.

pub mod algorithm;
pub mod queue;
pub mod types;

pub use algorithm::Sm2;
pub use queue::{deck_queue, due_count, is_due, select_due};
pub use types::{Card, CardStats, Difficulty, Mastery};
