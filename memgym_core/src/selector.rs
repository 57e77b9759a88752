//! Session queue selection.
//!
//! Two selection modes share one mastery model:
//! - Spaced review: cards whose next eligible date has passed
//! - Level drill: cards sitting at exactly a target mastery level
//!
//! The filtered queue is shuffled exactly once; the order is fixed for
//! the session that consumes it.

use crate::Flashcard;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::thread_rng;
use rand::Rng;
use std::fmt;

/// How cards are picked from a subject's pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// Spaced review: `next_eligible <= now`
    Due,
    /// Level drill: `level == target`, ignoring dates
    Level(u8),
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Due => f.write_str("due"),
            SelectionMode::Level(level) => write!(f, "level{}", level),
        }
    }
}

/// Select and shuffle the cards eligible for one session.
///
/// The pool is not mutated and an empty result is a normal outcome, not
/// an error — the caller distinguishes "no cards at all" from "none
/// eligible" using subject metadata. Shuffling uses fresh, unseeded
/// randomness per call.
pub fn select(pool: &[Flashcard], mode: SelectionMode, now: DateTime<Utc>) -> Vec<Flashcard> {
    select_with_rng(pool, mode, now, &mut thread_rng())
}

/// Same as [`select`] but with a caller-supplied RNG.
///
/// Production paths go through [`select`]; seeded RNGs are for tests
/// that need a reproducible order.
pub fn select_with_rng<R: Rng + ?Sized>(
    pool: &[Flashcard],
    mode: SelectionMode,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Flashcard> {
    let mut queue: Vec<Flashcard> = pool
        .iter()
        .filter(|card| match mode {
            SelectionMode::Due => card.next_eligible <= now,
            SelectionMode::Level(level) => card.level == level,
        })
        .cloned()
        .collect();

    queue.shuffle(rng);

    tracing::debug!(
        "Selected {} of {} cards for mode {}",
        queue.len(),
        pool.len(),
        mode
    );

    queue
}
