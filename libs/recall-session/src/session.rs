//! Review session state machine.
//!
//! Drives one sequence of card presentations: reveal, respond, hard
//! retry, advance, finish. Each response is scheduled through
//! `recall-core` and written through to the card store before the
//! next event is accepted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::RngCore;
use recall_core::{deck_queue, select_due, Card, CardStats, Difficulty, Mastery, Sm2};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{Result, SessionError};
use crate::store::{CardStore, ReviewRecord};
use crate::view::{CardView, SessionSummary, SessionView};

/// What a session reviews, and which ordering and mastery policy
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Every due card the owner has, shuffled.
    AllDue,
    /// One whole deck shuffled (due or not), the opening card first.
    SingleDeck { deck_id: i64, lead_card_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Presenting,
    Finished,
}

/// Outcome of a [`ReviewSession::respond`] call.
///
/// `saved` is false when the write-through failed; navigation still
/// happened and the failure is flagged on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondOutcome {
    /// Hard: the same card is re-presented, answer hidden.
    Repeat { saved: bool },
    /// The cursor moved to the next card.
    Advanced { saved: bool },
    /// The last card was processed; the session is finished.
    Finished { saved: bool },
    /// No response is accepted in the current state.
    Ignored,
}

/// One active review session owning its working set.
pub struct ReviewSession {
    store: Arc<dyn CardStore>,
    clock: Arc<dyn Clock>,
    scheduler: Sm2,
    rng: Box<dyn RngCore + Send>,
    mode: SessionMode,
    cards: Vec<Card>,
    cursor: usize,
    show_answer: bool,
    revealed_at: Option<DateTime<Utc>>,
    reviewed: u32,
    save_failed: bool,
    started_at: DateTime<Utc>,
    phase: Phase,
}

impl ReviewSession {
    /// Load the owner's cards and start presenting.
    ///
    /// All-due mode filters to due cards and shuffles; single-deck
    /// mode takes the whole deck with the opening card forced to the
    /// front. An empty working set is the nothing-to-review
    /// condition, not a session.
    pub async fn begin(
        store: Arc<dyn CardStore>,
        clock: Arc<dyn Clock>,
        scheduler: Sm2,
        mut rng: Box<dyn RngCore + Send>,
        owner: Uuid,
        mode: SessionMode,
    ) -> Result<Self> {
        let started_at = clock.now();
        let cards = match mode {
            SessionMode::AllDue => {
                let all = store.fetch_cards(owner, None).await?;
                select_due(&all, started_at, &mut rng)
            }
            SessionMode::SingleDeck {
                deck_id,
                lead_card_id,
            } => {
                let deck = store.fetch_cards(owner, Some(deck_id)).await?;
                deck_queue(&deck, lead_card_id, &mut rng)
            }
        };
        if cards.is_empty() {
            return Err(SessionError::NothingToReview);
        }
        info!(total = cards.len(), ?mode, "review session started");
        Ok(Self {
            store,
            clock,
            scheduler,
            rng,
            mode,
            cards,
            cursor: 0,
            show_answer: false,
            revealed_at: None,
            reviewed: 0,
            save_failed: false,
            started_at,
            phase: Phase::Presenting,
        })
    }

    /// Reveal the current card's answer.
    ///
    /// Idempotent: a second call changes nothing and does not re-arm
    /// the study-time measurement.
    pub fn reveal_answer(&mut self) {
        if self.phase != Phase::Presenting || self.show_answer {
            return;
        }
        self.show_answer = true;
        self.revealed_at = Some(self.clock.now());
        debug!(card = self.cards[self.cursor].id, "answer revealed");
    }

    /// Process a difficulty response for the current card.
    ///
    /// Ignored unless the answer is revealed and the session is
    /// presenting. A completed call always hides the answer again, so
    /// duplicate or rapid-fire UI events fall through harmlessly, and
    /// the `&mut` receiver rules out overlapping responses.
    ///
    /// A failed write-through never blocks navigation: the session
    /// advances (or re-presents, for hard), reports `saved: false`,
    /// and keeps the failure flagged.
    pub async fn respond(&mut self, response: Difficulty) -> RespondOutcome {
        if self.phase != Phase::Presenting || !self.show_answer {
            return RespondOutcome::Ignored;
        }

        let now = self.clock.now();
        let time_taken_secs = self
            .revealed_at
            .map(|revealed| (now - revealed).num_seconds().max(0) as u32);

        let card_id = self.cards[self.cursor].id;
        let before = self.cards[self.cursor].stats.clone();
        let after = self
            .scheduler
            .schedule(&before, response, now, &mut self.rng);

        let record = ReviewRecord {
            card_id,
            reviewed_at: now,
            response,
            time_taken_secs,
            interval_before: before.interval_days,
            interval_after: after.interval_days,
            ease_before: before.ease_factor,
            ease_after: after.ease_factor,
        };
        let saved = self.write_through(card_id, &after, &record).await;

        self.cards[self.cursor].stats = after;
        self.reviewed += 1;
        self.show_answer = false;
        self.revealed_at = None;

        match response {
            Difficulty::Hard => {
                debug!(card = card_id, "hard response, re-presenting");
                RespondOutcome::Repeat { saved }
            }
            Difficulty::Medium | Difficulty::Easy => {
                self.cursor += 1;
                if self.cursor >= self.cards.len() {
                    self.phase = Phase::Finished;
                    info!(reviewed = self.reviewed, "working set exhausted");
                    RespondOutcome::Finished { saved }
                } else {
                    RespondOutcome::Advanced { saved }
                }
            }
        }
    }

    /// Write the new stats and the review record. A failure of either
    /// is absorbed into the session's failure flag.
    async fn write_through(
        &mut self,
        card_id: i64,
        stats: &CardStats,
        record: &ReviewRecord,
    ) -> bool {
        let result = match self.store.update_card_stats(card_id, stats).await {
            Ok(()) => self.store.record_review(record).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(card = card_id, error = %e, "write-through failed, session continues");
                self.save_failed = true;
                false
            }
        }
    }

    /// Restart a finished single-deck session over the same working
    /// set, reshuffled. No re-fetch: the in-memory copies, already
    /// updated by this session's responses, are reused. Returns false
    /// (and does nothing) in any other state or mode.
    pub fn continue_session(&mut self) -> bool {
        if self.phase != Phase::Finished || !matches!(self.mode, SessionMode::SingleDeck { .. }) {
            return false;
        }
        self.cards.shuffle(&mut self.rng);
        self.cursor = 0;
        self.show_answer = false;
        self.revealed_at = None;
        self.phase = Phase::Presenting;
        debug!(total = self.cards.len(), "session restarted");
        true
    }

    /// Close the session, whether finished or aborted mid-way, and
    /// yield the summary. The working set is released.
    pub fn end(self) -> SessionSummary {
        let ended_at = self.clock.now();
        info!(
            reviewed = self.reviewed,
            save_failed = self.save_failed,
            "review session ended"
        );
        SessionSummary {
            reviewed: self.reviewed,
            save_failed: self.save_failed,
            started_at: self.started_at,
            ended_at,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn reviewed(&self) -> u32 {
        self.reviewed
    }

    pub fn save_failed(&self) -> bool {
        self.save_failed
    }

    /// Renderer-facing snapshot of the current state.
    ///
    /// The all-due flow uses the lapse-aware mastery classification;
    /// the single-deck flow uses the base one.
    pub fn view(&self) -> SessionView {
        let card = (self.phase == Phase::Presenting).then(|| {
            let card = &self.cards[self.cursor];
            let stats = &card.stats;
            let mastery = match self.mode {
                SessionMode::AllDue => {
                    Mastery::classify_with_lapses(stats.repetitions, stats.ease_factor, stats.lapses)
                }
                SessionMode::SingleDeck { .. } => {
                    Mastery::classify(stats.repetitions, stats.ease_factor)
                }
            };
            CardView {
                card_id: card.id,
                front: card.front.clone(),
                back: card.back.clone(),
                show_answer: self.show_answer,
                position: self.cursor + 1,
                total: self.cards.len(),
                streak: stats.repetitions,
                ease_percent: stats.ease_percent(),
                mastery,
                lapses: stats.lapses,
            }
        });
        SessionView {
            card,
            reviewed: self.reviewed,
            finished: self.phase == Phase::Finished,
            save_failed: self.save_failed,
        }
    }
}
