//! Modified SM-2 spaced repetition algorithm.
//!
//! SuperMemo 2 with fixed early-repetition steps, a bounded maturity
//! bonus on the easy path, and a hard ceiling on interval growth.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::types::{CardStats, Difficulty};

/// Fixed intervals (days) for the first medium repetitions; the last
/// entry is the graduation interval.
const MEDIUM_STEPS: [u32; 3] = [1, 3, 7];

/// Fixed intervals (days) for the first easy repetitions.
const EASY_STEPS: [u32; 3] = [1, 4, 10];

/// Modified SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    pub maximum_interval_days: u32,
    /// Minutes until a hard card comes back.
    pub hard_delay_minutes: i64,
    pub hard_ease_penalty: f64,
    pub medium_ease_penalty: f64,
    pub easy_ease_bonus: f64,
    /// Damping applied to the ease multiplier on the mature medium path.
    pub medium_damping: f64,
    /// Ceiling on the ease multiplier used by the mature easy path.
    pub easy_multiplier_cap: f64,
    /// Per-repetition growth of the easy maturity bonus, and its cap.
    pub maturity_bonus_step: f64,
    pub maturity_bonus_cap: f64,
    /// A card past three repetitions never comes back sooner than this.
    pub mature_interval_floor: u32,
    /// Half-width of the due-date jitter, as a fraction of the interval.
    pub jitter_fraction: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            maximum_ease: 3.0,
            maximum_interval_days: 60,
            hard_delay_minutes: 5,
            hard_ease_penalty: 0.2,
            medium_ease_penalty: 0.15,
            easy_ease_bonus: 0.1,
            medium_damping: 0.85,
            easy_multiplier_cap: 2.8,
            maturity_bonus_step: 0.05,
            maturity_bonus_cap: 1.3,
            mature_interval_floor: 7,
            jitter_fraction: 0.1,
        }
    }
}

impl Sm2 {
    /// State for a card that has never been reviewed.
    pub fn initial_stats(&self) -> CardStats {
        CardStats {
            ease_factor: self.initial_ease,
            ..CardStats::default()
        }
    }

    /// Compute the card's next state after a response.
    ///
    /// Total over its domain: an out-of-range ease is clamped back
    /// into bounds before the response adjustment rather than
    /// rejected. `rng` drives the due-date jitter on day-scale
    /// intervals; the hard delay is exact.
    pub fn schedule<R>(
        &self,
        stats: &CardStats,
        response: Difficulty,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CardStats
    where
        R: Rng + ?Sized,
    {
        let ease = stats
            .ease_factor
            .clamp(self.minimum_ease, self.maximum_ease);

        match response {
            Difficulty::Hard => self.schedule_hard(stats, ease, now),
            Difficulty::Medium => {
                let ease = (ease - self.medium_ease_penalty).max(self.minimum_ease);
                let interval = match stats.repetitions {
                    r @ 0..=2 => MEDIUM_STEPS[r as usize],
                    _ => (stats.interval_days as f64 * ease * self.medium_damping).round() as u32,
                };
                self.schedule_graduated(stats, interval, ease, now, rng)
            }
            Difficulty::Easy => {
                let ease = (ease + self.easy_ease_bonus).min(self.maximum_ease);
                let interval = match stats.repetitions {
                    r @ 0..=2 => EASY_STEPS[r as usize],
                    r => {
                        let base = ease.min(self.easy_multiplier_cap);
                        let maturity = (1.0 + (r - 3) as f64 * self.maturity_bonus_step)
                            .min(self.maturity_bonus_cap);
                        (stats.interval_days as f64 * base * maturity).round() as u32
                    }
                };
                self.schedule_graduated(stats, interval, ease, now, rng)
            }
        }
    }

    /// Hard resets the streak and brings the card back within minutes.
    fn schedule_hard(&self, stats: &CardStats, ease: f64, now: DateTime<Utc>) -> CardStats {
        CardStats {
            interval_days: 0,
            repetitions: 0,
            ease_factor: (ease - self.hard_ease_penalty).max(self.minimum_ease),
            lapses: stats.lapses + 1,
            last_reviewed: Some(now),
            next_review: Some(now + Duration::minutes(self.hard_delay_minutes)),
        }
    }

    /// Shared tail for medium/easy: interval ceiling, maturity floor,
    /// jittered due date.
    fn schedule_graduated<R>(
        &self,
        stats: &CardStats,
        interval: u32,
        ease: f64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CardStats
    where
        R: Rng + ?Sized,
    {
        let repetitions = stats.repetitions + 1;
        let mut interval = interval.min(self.maximum_interval_days);
        if repetitions > 3 && interval < self.mature_interval_floor {
            interval = self.mature_interval_floor;
        }

        let due = now + Duration::days(interval as i64) + self.jitter(interval, rng);

        CardStats {
            interval_days: interval,
            repetitions,
            ease_factor: ease,
            lapses: stats.lapses,
            last_reviewed: Some(now),
            next_review: Some(due),
        }
    }

    /// Uniform offset within ±`jitter_fraction` of the interval,
    /// expressed in whole minutes, so a batch of cards reviewed
    /// together does not cluster on one due date.
    fn jitter<R>(&self, interval_days: u32, rng: &mut R) -> Duration
    where
        R: Rng + ?Sized,
    {
        let span = interval_days as f64 * 24.0 * 60.0 * self.jitter_fraction;
        if span <= 0.0 {
            return Duration::zero();
        }
        Duration::minutes(rng.gen_range(-span..=span).round() as i64)
    }
}
