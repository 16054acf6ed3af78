//! Core types for the review scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learner response to a revealed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
}

impl Difficulty {
    /// Convert to numeric value (1-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Hard => 1,
            Self::Medium => 2,
            Self::Easy => 3,
        }
    }

    /// Create from numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Hard),
            2 => Some(Self::Medium),
            3 => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Mastery band derived from a card's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mastery {
    New,
    Learning,
    Consolidating,
    Review,
    Mastered,
}

/// A mature card with more lapses than this is kept in the review
/// band by [`Mastery::classify_with_lapses`].
const MASTERY_LAPSE_LIMIT: u32 = 3;

impl Mastery {
    /// Classify a card from its streak and ease.
    pub fn classify(repetitions: u32, ease_factor: f64) -> Self {
        if repetitions == 0 {
            Self::New
        } else if repetitions < 3 {
            Self::Learning
        } else if repetitions < 6 {
            Self::Consolidating
        } else if ease_factor > 2.3 {
            Self::Mastered
        } else {
            Self::Review
        }
    }

    /// Lapse-aware classification used by the all-due review flow:
    /// a mature card that has lapsed often stays in the review band
    /// no matter how high its ease has climbed.
    pub fn classify_with_lapses(repetitions: u32, ease_factor: f64, lapses: u32) -> Self {
        let base = Self::classify(repetitions, ease_factor);
        if base == Self::Mastered && lapses > MASTERY_LAPSE_LIMIT {
            Self::Review
        } else {
            base
        }
    }

    /// Get the mastery label as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Consolidating => "consolidating",
            Self::Review => "review",
            Self::Mastered => "mastered",
        }
    }
}

/// Scheduling state carried by a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStats {
    /// Days until the next scheduled review; 0 means due within minutes.
    #[serde(default)]
    pub interval_days: u32,
    /// Consecutive non-hard reviews since the last reset.
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default = "default_ease")]
    pub ease_factor: f64,
    /// Hard responses recorded against the card over its lifetime.
    #[serde(default)]
    pub lapses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// When the card becomes due again. `None` means always due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

fn default_ease() -> f64 {
    2.5
}

impl Default for CardStats {
    fn default() -> Self {
        Self {
            interval_days: 0,
            repetitions: 0,
            ease_factor: default_ease(),
            lapses: 0,
            last_reviewed: None,
            next_review: None,
        }
    }
}

impl CardStats {
    /// Ease rendered as a percentage relative to the 2.5 baseline.
    pub fn ease_percent(&self) -> i64 {
        (self.ease_factor * 100.0 - 250.0).round() as i64
    }
}

/// A card together with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub stats: CardStats,
}
