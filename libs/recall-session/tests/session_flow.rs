//! End-to-end session tests: load, reveal, respond, retry, finish.

mod common;

use std::sync::Arc;

use chrono::Duration;
use pretty_assertions::assert_eq;
use recall_core::{Difficulty, Sm2};
use recall_session::{MemoryStore, RespondOutcome, ReviewSession, SessionMode};

use common::TickingClock;

const STEP_SECS: i64 = 2;

async fn begin(
    store: Arc<MemoryStore>,
    owner: uuid::Uuid,
    mode: SessionMode,
) -> ReviewSession {
    let clock = Arc::new(TickingClock::new(common::start(), Duration::seconds(STEP_SECS)));
    ReviewSession::begin(store, clock, Sm2::default(), common::rng(), owner, mode)
        .await
        .expect("session begins")
}

/// Responding easy to every card advances the cursor by exactly one
/// per response and finishes exactly after the last card.
#[tokio::test]
async fn easy_responses_walk_the_set_once() {
    let owner = common::owner();
    let store = Arc::new(MemoryStore::new(owner, common::deck(1, 5)));
    let mut session = begin(store, owner, SessionMode::AllDue).await;

    for position in 1..=5 {
        let view = session.view().card.expect("presenting");
        assert_eq!(view.position, position);
        assert_eq!(view.total, 5);
        assert!(!view.show_answer);

        session.reveal_answer();
        assert!(session.view().card.unwrap().show_answer);

        let outcome = session.respond(Difficulty::Easy).await;
        if position < 5 {
            assert_eq!(outcome, RespondOutcome::Advanced { saved: true });
        } else {
            assert_eq!(outcome, RespondOutcome::Finished { saved: true });
        }
    }

    assert!(session.is_finished());
    assert_eq!(session.view().card, None);
    assert_eq!(session.reviewed(), 5);
}

/// A hard response re-presents the same card before anything else is
/// shown; the retry then advances normally.
#[tokio::test]
async fn hard_retries_before_the_next_card() {
    let owner = common::owner();
    let store = Arc::new(MemoryStore::new(owner, common::deck(1, 3)));
    let mut session = begin(store, owner, SessionMode::AllDue).await;

    // Cursor trace: 0 -> 1 -> 1 (retry) -> 2 -> 3 = end.
    session.reveal_answer();
    assert_eq!(
        session.respond(Difficulty::Easy).await,
        RespondOutcome::Advanced { saved: true }
    );

    let second = session.view().card.unwrap().card_id;
    session.reveal_answer();
    assert_eq!(
        session.respond(Difficulty::Hard).await,
        RespondOutcome::Repeat { saved: true }
    );
    assert_eq!(session.view().card.unwrap().card_id, second);

    session.reveal_answer();
    assert_eq!(
        session.respond(Difficulty::Easy).await,
        RespondOutcome::Advanced { saved: true }
    );

    session.reveal_answer();
    assert_eq!(
        session.respond(Difficulty::Easy).await,
        RespondOutcome::Finished { saved: true }
    );

    assert_eq!(session.reviewed(), 4);
}

/// The write-through lands the scheduled stats and a review-log entry
/// carrying study time in whole seconds.
#[tokio::test]
async fn respond_writes_stats_and_review_log() {
    let owner = common::owner();
    let store = Arc::new(MemoryStore::new(owner, common::deck(1, 1)));
    let mut session = begin(store.clone(), owner, SessionMode::AllDue).await;

    session.reveal_answer();
    session.respond(Difficulty::Easy).await;

    let stored = store.card(1).expect("card persisted");
    assert_eq!(stored.stats.repetitions, 1);
    assert_eq!(stored.stats.interval_days, 1);

    let reviews = store.reviews();
    assert_eq!(reviews.len(), 1);
    let record = &reviews[0];
    assert_eq!(record.card_id, 1);
    assert_eq!(record.response, Difficulty::Easy);
    assert_eq!(record.interval_before, 0);
    assert_eq!(record.interval_after, 1);
    // Clock readings: begin, reveal, respond; reveal-to-respond is
    // one step.
    assert_eq!(record.time_taken_secs, Some(STEP_SECS as u32));
    assert_eq!(
        record.reviewed_at,
        common::start() + Duration::seconds(2 * STEP_SECS)
    );
}

/// A hard retry is stored due five minutes out, exactly.
#[tokio::test]
async fn hard_stores_a_five_minute_retry() {
    let owner = common::owner();
    let store = Arc::new(MemoryStore::new(owner, common::deck(1, 1)));
    let mut session = begin(store.clone(), owner, SessionMode::AllDue).await;

    session.reveal_answer();
    session.respond(Difficulty::Hard).await;

    let stored = store.card(1).unwrap();
    assert_eq!(stored.stats.interval_days, 0);
    assert_eq!(stored.stats.repetitions, 0);
    assert_eq!(stored.stats.lapses, 1);
    let reviewed_at = common::start() + Duration::seconds(2 * STEP_SECS);
    assert_eq!(
        stored.stats.next_review,
        Some(reviewed_at + Duration::minutes(5))
    );
}

/// A failing store never blocks navigation; the failure is reported,
/// not raised, and the learner keeps moving.
#[tokio::test]
async fn write_failure_keeps_the_session_moving() {
    let owner = common::owner();
    let store = Arc::new(MemoryStore::new(owner, common::deck(1, 2)));
    let mut session = begin(store.clone(), owner, SessionMode::AllDue).await;
    store.set_fail_writes(true);

    session.reveal_answer();
    let outcome = session.respond(Difficulty::Easy).await;
    assert_eq!(outcome, RespondOutcome::Advanced { saved: false });
    assert!(session.save_failed());
    assert!(session.view().save_failed);

    // Nothing landed in the store.
    assert_eq!(store.card(1).unwrap().stats.repetitions, 0);
    assert!(store.reviews().is_empty());

    // The session still finishes and owns up to the failure.
    session.reveal_answer();
    let outcome = session.respond(Difficulty::Easy).await;
    assert_eq!(outcome, RespondOutcome::Finished { saved: false });
    let summary = session.end();
    assert_eq!(summary.reviewed, 2);
    assert!(summary.save_failed);
}

/// The view exposes exactly what a renderer needs, in the documented
/// shape.
#[tokio::test]
async fn session_view_serializes_for_renderers() {
    let owner = common::owner();
    let store = Arc::new(MemoryStore::new(owner, common::deck(1, 2)));
    let session = begin(store, owner, SessionMode::AllDue).await;

    let view = serde_json::to_value(session.view()).unwrap();
    assert_eq!(view["finished"], false);
    assert_eq!(view["reviewed"], 0);
    assert_eq!(view["save_failed"], false);

    let card = &view["card"];
    assert_eq!(card["position"], 1);
    assert_eq!(card["total"], 2);
    assert_eq!(card["show_answer"], false);
    assert_eq!(card["streak"], 0);
    assert_eq!(card["ease_percent"], 0);
    assert_eq!(card["mastery"], "new");
    assert_eq!(card["lapses"], 0);
    assert!(card["front"].as_str().unwrap().starts_with("Question"));
}
