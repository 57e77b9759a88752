#![forbid(unsafe_code)]

//! Core domain model and training engine for Memgym, a flashcard-based
//! memorization trainer.
//!
//! This crate provides:
//! - Domain types (flashcards, subjects, grades, study records)
//! - Mastery progression and spaced-review intervals
//! - Session queue selection and answer grading
//! - The training session state machine
//! - Persistence (library store, study record WAL, CSV rollup)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod library;
pub mod starter;
pub mod mastery;
pub mod grader;
pub mod selector;
pub mod session;
pub mod journal;
pub mod rollup;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use library::{CardSink, CardSource, JsonStore, Library};
pub use starter::{build_starter_library, get_starter_library};
pub use mastery::ReviewIntervals;
pub use selector::{select, SelectionMode};
pub use session::{AnswerOutcome, Phase, TrainingSession};
pub use journal::{JsonlSink, RecordSink};
pub use history::load_recent_records;
