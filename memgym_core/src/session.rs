//! Training session state machine.
//!
//! A session owns a fixed, pre-shuffled queue of flashcard snapshots and
//! walks it one question at a time:
//!
//! `InProgress --submit_answer--> AwaitingAdvance --advance--> InProgress`
//!
//! until the queue is exhausted, at which point the session freezes into
//! `Completed` with a final [`SessionResult`]. `AwaitingAdvance` is a
//! deliberate pause so the caller can show per-question feedback before
//! moving on.
//!
//! Sessions are exclusively owned by their creator; there is no internal
//! locking and no cancellation beyond dropping the value.

use crate::{grader, mastery, Error, Flashcard, Result, ReviewIntervals, SessionResult};
use chrono::{DateTime, Utc};

/// Lifecycle phase of a training session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// A question is being asked; `submit_answer` is valid
    InProgress,
    /// Feedback for the last answer is on display; `advance` is valid
    AwaitingAdvance,
    /// Queue exhausted; the result is frozen
    Completed,
}

/// Outcome of a single graded question, exposed during `AwaitingAdvance`
#[derive(Clone, Debug)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub submitted: String,
    pub canonical: String,
    /// Card snapshot after the mastery update. Hand this to the card sink
    /// right away — each graded card is final the moment `submit_answer`
    /// returns, independent of how the rest of the session goes.
    pub card: Flashcard,
}

/// One bounded run through an ordered subset of cards
#[derive(Debug)]
pub struct TrainingSession {
    queue: Vec<Flashcard>,
    position: usize,
    correct_count: usize,
    phase: Phase,
    result: Option<SessionResult>,
}

impl TrainingSession {
    /// Start a session over an already-selected, already-shuffled queue.
    ///
    /// An empty queue completes immediately with a zero-question result;
    /// callers should present that as "nothing to drill", not as a
    /// failing grade.
    pub fn new(queue: Vec<Flashcard>) -> Self {
        if queue.is_empty() {
            tracing::debug!("Session created with empty queue, completing immediately");
            return Self {
                queue,
                position: 0,
                correct_count: 0,
                phase: Phase::Completed,
                result: Some(SessionResult::new(0, 0)),
            };
        }

        tracing::debug!("Session created with {} cards", queue.len());
        Self {
            queue,
            position: 0,
            correct_count: 0,
            phase: Phase::InProgress,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of questions in the session
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Zero-based index of the current question
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// The card currently being asked (or awaiting feedback), if any
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.queue.get(self.position)
    }

    /// The frozen result, present once the session is `Completed`
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Grade an answer against the current card and apply its mastery
    /// update.
    ///
    /// Valid only in `InProgress`; calling it in any other phase returns
    /// `Error::StateViolation` and leaves the session untouched.
    pub fn submit_answer(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
        intervals: &ReviewIntervals,
    ) -> Result<AnswerOutcome> {
        if self.phase != Phase::InProgress {
            return Err(Error::StateViolation(format!(
                "submit_answer called in {:?}",
                self.phase
            )));
        }

        // Phase invariant guarantees position < queue.len() here
        let total = self.queue.len();
        let card = &mut self.queue[self.position];
        let correct = grader::grade(text, &card.back);
        mastery::advance(card, correct, now, intervals);

        if correct {
            self.correct_count += 1;
        }
        self.phase = Phase::AwaitingAdvance;

        tracing::debug!(
            "Question {}/{} answered {}",
            self.position + 1,
            total,
            if correct { "correctly" } else { "incorrectly" }
        );

        Ok(AnswerOutcome {
            correct,
            submitted: text.to_string(),
            canonical: card.back.clone(),
            card: card.clone(),
        })
    }

    /// Move past the feedback pause to the next question.
    ///
    /// Valid only in `AwaitingAdvance`. Returns the phase entered:
    /// `InProgress` if questions remain, `Completed` at exhaustion.
    pub fn advance(&mut self) -> Result<Phase> {
        if self.phase != Phase::AwaitingAdvance {
            return Err(Error::StateViolation(format!(
                "advance called in {:?}",
                self.phase
            )));
        }

        self.position += 1;
        if self.position == self.queue.len() {
            self.phase = Phase::Completed;
            self.result = Some(SessionResult::new(self.queue.len(), self.correct_count));
            tracing::debug!(
                "Session completed: {}/{} correct",
                self.correct_count,
                self.queue.len()
            );
        } else {
            self.phase = Phase::InProgress;
        }

        Ok(self.phase)
    }
}
