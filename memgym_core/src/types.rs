//! Core domain types for the Memgym flashcard trainer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Flashcards and the subjects that group them
//! - Session results and letter grades
//! - Persisted study records

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lowest mastery level: newly introduced, most in need of repetition
pub const MIN_LEVEL: u8 = 1;

/// Highest mastery level: long-term mastered
pub const MAX_LEVEL: u8 = 5;

// ============================================================================
// Flashcard and Subject
// ============================================================================

/// A unit of knowledge to be drilled
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Flashcard {
    pub id: Uuid,
    pub subject_id: Uuid,
    /// Prompt text shown to the user
    pub front: String,
    /// Canonical answer text
    pub back: String,
    /// Mastery level, always within [MIN_LEVEL, MAX_LEVEL]
    pub level: u8,
    /// The card may be re-served in spaced mode once this timestamp has passed
    pub next_eligible: DateTime<Utc>,
    /// Completed answer evaluations; increases by exactly 1 per graded answer
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    /// Create a new card at level 1, eligible immediately.
    ///
    /// Front and back must each be non-empty after trimming.
    pub fn new(
        subject_id: Uuid,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Result<Self> {
        let front = front.into();
        let back = back.into();

        if front.trim().is_empty() {
            return Err(Error::CardValidation("card front is empty".into()));
        }
        if back.trim().is_empty() {
            return Err(Error::CardValidation("card back is empty".into()));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            subject_id,
            front,
            back,
            level: MIN_LEVEL,
            next_eligible: now,
            review_count: 0,
            created_at: now,
        })
    }
}

/// A named grouping of flashcards.
///
/// Subjects carry no scheduling behavior and no cached card count; counts
/// are always recomputed from the actual member set (see `Library::card_count`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    /// Create a new subject. The name must be non-empty after trimming.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::CardValidation("subject name is empty".into()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: Utc::now(),
        })
    }
}

// ============================================================================
// Grades and Session Results
// ============================================================================

/// Letter grade derived from session accuracy
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    APlus,
    A,
    BPlus,
    B,
    C,
    F,
}

impl Grade {
    /// Map an accuracy percentage to a letter grade.
    ///
    /// Thresholds are closed on the lower end: 90.0 exactly is A+,
    /// 89.99 is A.
    pub fn from_accuracy(percent: f64) -> Self {
        if percent >= 90.0 {
            Grade::APlus
        } else if percent >= 80.0 {
            Grade::A
        } else if percent >= 70.0 {
            Grade::BPlus
        } else if percent >= 60.0 {
            Grade::B
        } else if percent >= 50.0 {
            Grade::C
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A+" => Ok(Grade::APlus),
            "A" => Ok(Grade::A),
            "B+" => Ok(Grade::BPlus),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "F" => Ok(Grade::F),
            other => Err(Error::Other(format!("Unknown grade: {}", other))),
        }
    }
}

/// Final, immutable outcome of a completed training session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub accuracy_percent: f64,
    pub grade: Grade,
}

impl SessionResult {
    /// Build a result from raw counts.
    ///
    /// A zero-question session scores 0% and grades F; callers should
    /// present that case as "nothing to drill" rather than as a failure.
    pub fn new(total_questions: usize, correct_answers: usize) -> Self {
        let accuracy_percent = if total_questions == 0 {
            0.0
        } else {
            correct_answers as f64 / total_questions as f64 * 100.0
        };

        Self {
            total_questions,
            correct_answers,
            accuracy_percent,
            grade: Grade::from_accuracy(accuracy_percent),
        }
    }
}

// ============================================================================
// Study Records
// ============================================================================

/// A persisted record of one completed training session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: Uuid,
    pub subject_id: Uuid,
    /// Selection mode label, e.g. "due" or "level3"
    pub mode: String,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub accuracy_percent: f64,
    pub grade: Grade,
    pub completed_at: DateTime<Utc>,
}

impl StudyRecord {
    /// Freeze a session result into a persistable record.
    pub fn from_result(
        subject_id: Uuid,
        mode: impl Into<String>,
        result: &SessionResult,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            mode: mode.into(),
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            accuracy_percent: result.accuracy_percent,
            grade: result.grade,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_starts_at_level_one() {
        let card = Flashcard::new(Uuid::new_v4(), "accomplish", "to achieve").unwrap();
        assert_eq!(card.level, MIN_LEVEL);
        assert_eq!(card.review_count, 0);
        assert!(card.next_eligible <= Utc::now());
    }

    #[test]
    fn test_card_rejects_blank_front() {
        let result = Flashcard::new(Uuid::new_v4(), "   ", "answer");
        assert!(matches!(result, Err(Error::CardValidation(_))));
    }

    #[test]
    fn test_card_rejects_blank_back() {
        let result = Flashcard::new(Uuid::new_v4(), "prompt", "\t\n");
        assert!(matches!(result, Err(Error::CardValidation(_))));
    }

    #[test]
    fn test_subject_rejects_blank_name() {
        assert!(Subject::new("  ", None).is_err());
        assert!(Subject::new("Vocabulary", None).is_ok());
    }

    #[test]
    fn test_grade_thresholds_closed_on_lower_bound() {
        assert_eq!(Grade::from_accuracy(100.0), Grade::APlus);
        assert_eq!(Grade::from_accuracy(90.0), Grade::APlus);
        assert_eq!(Grade::from_accuracy(89.99), Grade::A);
        assert_eq!(Grade::from_accuracy(80.0), Grade::A);
        assert_eq!(Grade::from_accuracy(70.0), Grade::BPlus);
        assert_eq!(Grade::from_accuracy(66.7), Grade::B);
        assert_eq!(Grade::from_accuracy(60.0), Grade::B);
        assert_eq!(Grade::from_accuracy(50.0), Grade::C);
        assert_eq!(Grade::from_accuracy(49.9), Grade::F);
        assert_eq!(Grade::from_accuracy(0.0), Grade::F);
    }

    #[test]
    fn test_grade_display_roundtrip() {
        for grade in [
            Grade::APlus,
            Grade::A,
            Grade::BPlus,
            Grade::B,
            Grade::C,
            Grade::F,
        ] {
            let parsed: Grade = grade.to_string().parse().unwrap();
            assert_eq!(parsed, grade);
        }
    }

    #[test]
    fn test_zero_question_result() {
        let result = SessionResult::new(0, 0);
        assert_eq!(result.accuracy_percent, 0.0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn test_two_of_three_is_b() {
        let result = SessionResult::new(3, 2);
        assert!((result.accuracy_percent - 66.6666).abs() < 0.01);
        assert_eq!(result.grade, Grade::B);
    }
}
