//! Built-in starter library.
//!
//! A small vocabulary deck so a fresh install has something to drill
//! before the user builds their own subjects.

use crate::{Flashcard, Library, Subject, MIN_LEVEL};
use chrono::Utc;
use once_cell::sync::Lazy;
use uuid::Uuid;

const STARTER_SUBJECT_NAME: &str = "Starter Vocabulary";

const STARTER_VOCABULARY: &[(&str, &str)] = &[
    ("accomplish", "to achieve"),
    ("adequate", "sufficient"),
    ("analyze", "to examine in detail"),
    ("assess", "to evaluate"),
    ("concept", "an abstract idea"),
    ("crucial", "decisively important"),
    ("demonstrate", "to show clearly"),
    ("distinguish", "to tell apart"),
    ("emphasize", "to stress"),
    ("establish", "to set up"),
    ("evidence", "proof"),
    ("identify", "to recognize"),
    ("indicate", "to point out"),
    ("interpret", "to explain the meaning of"),
    ("maintain", "to keep in existence"),
    ("obtain", "to get"),
    ("perspective", "a point of view"),
    ("procedure", "an established way of doing something"),
    ("significant", "important"),
    ("strategy", "a plan of action"),
];

/// Cached starter library - built once and reused across all operations
static STARTER_LIBRARY: Lazy<Library> = Lazy::new(build_starter_library);

/// Get a reference to the cached starter library.
pub fn get_starter_library() -> &'static Library {
    &STARTER_LIBRARY
}

/// Build the starter library: one subject with the seed vocabulary.
///
/// **Note**: Prefer `get_starter_library()` for read-only use; this
/// function is retained for tests and for seeding a fresh data dir.
pub fn build_starter_library() -> Library {
    let now = Utc::now();

    let subject = Subject {
        id: Uuid::new_v4(),
        name: STARTER_SUBJECT_NAME.into(),
        description: Some("Common academic vocabulary to try memgym with".into()),
        created_at: now,
    };

    let cards = STARTER_VOCABULARY
        .iter()
        .map(|(front, back)| Flashcard {
            id: Uuid::new_v4(),
            subject_id: subject.id,
            front: (*front).into(),
            back: (*back).into(),
            level: MIN_LEVEL,
            next_eligible: now,
            review_count: 0,
            created_at: now,
        })
        .collect();

    Library {
        subjects: vec![subject],
        cards,
    }
}
