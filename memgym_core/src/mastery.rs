//! Mastery progression for graded answers.
//!
//! Each graded answer moves a card through the five mastery levels:
//! - Correct: one level up, capped at 5; the card's next eligible date
//!   moves out by the interval for the *new* level
//! - Incorrect: full reset to level 1, eligible again immediately
//!
//! The operation is pure given `(card, was_correct, now)` and never fails
//! for a well-formed card.

use crate::{Error, Flashcard, Result, MAX_LEVEL, MIN_LEVEL};
use chrono::{DateTime, Duration, Utc};

/// Default days until a card is re-served, keyed by mastery level 1..=5
pub const DEFAULT_INTERVAL_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

/// Spaced-review interval table.
///
/// One entry per mastery level, in days. Built from `[review]` config or
/// via `Default`, which matches [`DEFAULT_INTERVAL_DAYS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewIntervals {
    days: [i64; 5],
}

impl ReviewIntervals {
    /// Validate and build an interval table.
    ///
    /// Entries must be positive and non-decreasing across levels.
    pub fn new(days: [i64; 5]) -> Result<Self> {
        if days[0] < 1 {
            return Err(Error::Config(format!(
                "Review interval for level 1 must be at least 1 day, got {}",
                days[0]
            )));
        }
        for window in days.windows(2) {
            if window[1] < window[0] {
                return Err(Error::Config(format!(
                    "Review intervals must not decrease: {:?}",
                    days
                )));
            }
        }
        Ok(Self { days })
    }

    /// Days until the next review for a card sitting at `level`.
    ///
    /// Out-of-range levels are clamped into [1,5] so externally supplied
    /// drift cannot index out of bounds.
    pub fn days_for_level(&self, level: u8) -> i64 {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        self.days[(level - 1) as usize]
    }
}

impl Default for ReviewIntervals {
    fn default() -> Self {
        Self {
            days: DEFAULT_INTERVAL_DAYS,
        }
    }
}

/// Apply one graded answer to a card.
///
/// Updates `level`, `next_eligible` and `review_count`; no other field is
/// touched. A level outside [1,5] supplied externally is absorbed back
/// into range here rather than propagated forward.
pub fn advance(
    card: &mut Flashcard,
    was_correct: bool,
    now: DateTime<Utc>,
    intervals: &ReviewIntervals,
) {
    if was_correct {
        card.level = card.level.saturating_add(1).clamp(MIN_LEVEL, MAX_LEVEL);
        // Interval keyed to the new level, not the old one
        card.next_eligible = now + Duration::days(intervals.days_for_level(card.level));
        tracing::debug!(
            "Card {} correct: level {}, next eligible {}",
            card.id,
            card.level,
            card.next_eligible
        );
    } else {
        card.level = MIN_LEVEL;
        card.next_eligible = now;
        tracing::debug!("Card {} incorrect: reset to level 1", card.id);
    }

    card.review_count += 1;
}
