//! Card library persistence with file locking.
//!
//! The library is the local stand-in for the document store: all subjects
//! and their flashcards in one JSON file, loaded with shared locks and
//! saved atomically via temp-file rename. It also hosts the two
//! collaborator contracts the engine depends on: a card source (pool
//! snapshots per subject) and a card sink (one durable write per graded
//! answer).

use crate::{Error, Flashcard, Result, Subject, MAX_LEVEL, MIN_LEVEL};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Supplies the card pool for a subject.
///
/// The pool is a snapshot, not a live subscription.
pub trait CardSource {
    fn load_pool(&self, subject_id: Uuid) -> Result<Vec<Flashcard>>;
}

/// Durably stores one updated card per graded answer.
///
/// Callers do not retry on failure; retry/backoff, if any, is the
/// sink's concern.
pub trait CardSink {
    fn persist_card(&mut self, card: &Flashcard) -> Result<()>;
}

/// All subjects and flashcards owned by the local user
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Library {
    pub subjects: Vec<Subject>,
    pub cards: Vec<Flashcard>,
}

impl Library {
    /// Load the library from a file with shared locking.
    ///
    /// Returns an empty library if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty one.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No library file found, starting empty");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open library file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock library file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read library file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<Library>(&contents) {
            Ok(library) => {
                tracing::debug!("Loaded library from {:?}", path);
                Ok(library)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse library file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the library to a file with exclusive locking.
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "library path missing parent")
        })?)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old library file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved library to {:?}", path);
        Ok(())
    }

    /// Load the library, modify it, and save it back atomically.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Library) -> Result<()>,
    {
        let mut library = Self::load(path)?;
        f(&mut library)?;
        library.save(path)?;
        Ok(library)
    }

    /// Add a new subject, returning its id.
    pub fn add_subject(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Uuid> {
        let subject = Subject::new(name, description)?;
        let id = subject.id;
        self.subjects.push(subject);
        Ok(id)
    }

    /// Add a new card to an existing subject, returning its id.
    pub fn add_card(
        &mut self,
        subject_id: Uuid,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Result<Uuid> {
        if !self.subjects.iter().any(|s| s.id == subject_id) {
            return Err(Error::CardValidation(format!(
                "No subject with id {}",
                subject_id
            )));
        }

        let card = Flashcard::new(subject_id, front, back)?;
        let id = card.id;
        self.cards.push(card);
        Ok(id)
    }

    /// Replace a card by id, or insert it if absent.
    pub fn upsert_card(&mut self, card: &Flashcard) {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => self.cards.push(card.clone()),
        }
    }

    /// Remove a card by id.
    pub fn delete_card(&mut self, id: Uuid) {
        self.cards.retain(|c| c.id != id);
    }

    /// Remove a subject and all of its cards.
    pub fn delete_subject(&mut self, id: Uuid) {
        self.subjects.retain(|s| s.id != id);
        self.cards.retain(|c| c.subject_id != id);
    }

    /// Snapshot of a subject's cards.
    pub fn cards_for_subject(&self, subject_id: Uuid) -> Vec<Flashcard> {
        self.cards
            .iter()
            .filter(|c| c.subject_id == subject_id)
            .cloned()
            .collect()
    }

    /// Number of cards in a subject, always recomputed from the member
    /// set. There is deliberately no cached count that could drift.
    pub fn card_count(&self, subject_id: Uuid) -> usize {
        self.cards
            .iter()
            .filter(|c| c.subject_id == subject_id)
            .count()
    }

    /// Look up a subject by name, case-insensitively.
    pub fn find_subject_by_name(&self, name: &str) -> Option<&Subject> {
        let needle = name.trim().to_lowercase();
        self.subjects
            .iter()
            .find(|s| s.name.to_lowercase() == needle)
    }

    /// Validate the library for consistency.
    ///
    /// Returns a list of validation errors, or an empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut subject_ids = HashSet::new();
        for subject in &self.subjects {
            if subject.name.trim().is_empty() {
                errors.push(format!("Subject {} has an empty name", subject.id));
            }
            if !subject_ids.insert(subject.id) {
                errors.push(format!("Duplicate subject id {}", subject.id));
            }
        }

        let mut card_ids = HashSet::new();
        for card in &self.cards {
            if !card_ids.insert(card.id) {
                errors.push(format!("Duplicate card id {}", card.id));
            }
            if !subject_ids.contains(&card.subject_id) {
                errors.push(format!(
                    "Card {} references non-existent subject {}",
                    card.id, card.subject_id
                ));
            }
            if card.front.trim().is_empty() {
                errors.push(format!("Card {} has an empty front", card.id));
            }
            if card.back.trim().is_empty() {
                errors.push(format!("Card {} has an empty back", card.id));
            }
            if card.level < MIN_LEVEL || card.level > MAX_LEVEL {
                errors.push(format!(
                    "Card {} has level {} outside [{}, {}]",
                    card.id, card.level, MIN_LEVEL, MAX_LEVEL
                ));
            }
        }

        errors
    }
}

/// File-backed store implementing both collaborator contracts over a
/// [`Library`] JSON file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CardSource for JsonStore {
    fn load_pool(&self, subject_id: Uuid) -> Result<Vec<Flashcard>> {
        let library = Library::load(&self.path)?;
        Ok(library.cards_for_subject(subject_id))
    }
}

impl CardSink for JsonStore {
    fn persist_card(&mut self, card: &Flashcard) -> Result<()> {
        Library::update(&self.path, |library| {
            library.upsert_card(card);
            Ok(())
        })?;
        tracing::debug!("Persisted card {} at level {}", card.id, card.level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_with_subject() -> (Library, Uuid) {
        let mut library = Library::default();
        let subject_id = library.add_subject("Vocabulary", None).unwrap();
        (library, subject_id)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("library.json");

        let (mut library, subject_id) = library_with_subject();
        library.add_card(subject_id, "accomplish", "to achieve").unwrap();
        library.save(&path).unwrap();

        let loaded = Library::load(&path).unwrap();
        assert_eq!(loaded.subjects.len(), 1);
        assert_eq!(loaded.cards.len(), 1);
        assert_eq!(loaded.cards[0].front, "accomplish");
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let library = Library::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(library.subjects.is_empty());
        assert!(library.cards.is_empty());
    }

    #[test]
    fn test_corrupted_file_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let library = Library::load(&path).unwrap();
        assert!(library.subjects.is_empty());
    }

    #[test]
    fn test_add_card_requires_existing_subject() {
        let mut library = Library::default();
        let result = library.add_card(Uuid::new_v4(), "front", "back");
        assert!(matches!(result, Err(Error::CardValidation(_))));
    }

    #[test]
    fn test_card_count_is_recomputed() {
        let (mut library, subject_id) = library_with_subject();
        assert_eq!(library.card_count(subject_id), 0);

        let card_id = library.add_card(subject_id, "a", "b").unwrap();
        library.add_card(subject_id, "c", "d").unwrap();
        assert_eq!(library.card_count(subject_id), 2);

        library.delete_card(card_id);
        assert_eq!(library.card_count(subject_id), 1);
    }

    #[test]
    fn test_delete_subject_cascades_to_cards() {
        let (mut library, subject_id) = library_with_subject();
        library.add_card(subject_id, "a", "b").unwrap();
        library.add_card(subject_id, "c", "d").unwrap();

        library.delete_subject(subject_id);
        assert!(library.subjects.is_empty());
        assert!(library.cards.is_empty());
    }

    #[test]
    fn test_find_subject_by_name_case_insensitive() {
        let (library, subject_id) = library_with_subject();
        assert_eq!(library.find_subject_by_name("vocabulary").unwrap().id, subject_id);
        assert_eq!(library.find_subject_by_name(" VOCABULARY ").unwrap().id, subject_id);
        assert!(library.find_subject_by_name("other").is_none());
    }

    #[test]
    fn test_validate_flags_orphan_cards() {
        let (mut library, subject_id) = library_with_subject();
        library.add_card(subject_id, "a", "b").unwrap();
        library.cards[0].subject_id = Uuid::new_v4();

        let errors = library.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("non-existent subject"));
    }

    #[test]
    fn test_validate_flags_out_of_range_level() {
        let (mut library, subject_id) = library_with_subject();
        library.add_card(subject_id, "a", "b").unwrap();
        library.cards[0].level = 7;

        let errors = library.validate();
        assert!(errors.iter().any(|e| e.contains("level 7")));
    }

    #[test]
    fn test_json_store_persist_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("library.json");

        let (mut library, subject_id) = library_with_subject();
        library.add_card(subject_id, "a", "b").unwrap();
        library.save(&path).unwrap();

        let mut card = library.cards[0].clone();
        card.level = 3;
        card.review_count = 4;

        let mut store = JsonStore::new(&path);
        store.persist_card(&card).unwrap();

        let pool = store.load_pool(subject_id).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].level, 3);
        assert_eq!(pool[0].review_count, 4);
    }

    #[test]
    fn test_atomic_save_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("library.json");

        Library::default().save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "library.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only library.json, found extras: {:?}",
            extras
        );
    }
}
