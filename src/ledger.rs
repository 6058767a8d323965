//! Missed-question ledger.
//!
//! Every mistake is tracked by question index until it has been answered
//! correctly [`MASTERY_THRESHOLD`] times, then it retires. The ledger is
//! flushed to a JSON file after every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{QuizError, Result};

pub const MASTERY_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeRecord {
    pub last_wrong: String,
    pub correct_count: u32,
}

pub type Ledger = BTreeMap<usize, MistakeRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectOutcome {
    Untracked,
    Improved(u32),
    Retired,
}

pub struct MistakeTracker {
    path: PathBuf,
    records: Ledger,
}

impl MistakeTracker {
    /// Opens the ledger at `path`. A missing or unreadable file yields an empty ledger.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let records = match load(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "mistake ledger unreadable, starting empty");
                Ledger::new()
            }
        };
        info!(path = %path.display(), tracked = records.len(), "opened mistake ledger");
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &Ledger {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&MistakeRecord> {
        self.records.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.records.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sorted_indices(&self) -> Vec<usize> {
        self.records.keys().copied().collect()
    }

    pub fn record_wrong(&mut self, index: usize, submitted: &str) -> Result<()> {
        let record = self.records.entry(index).or_default();
        // correct_count is kept; only the last answer changes
        record.last_wrong = submitted.to_string();
        self.flush()
    }

    pub fn record_correct(&mut self, index: usize) -> Result<CorrectOutcome> {
        let Some(record) = self.records.get_mut(&index) else {
            return Ok(CorrectOutcome::Untracked);
        };

        record.correct_count += 1;
        let outcome = if record.correct_count >= MASTERY_THRESHOLD {
            self.records.remove(&index);
            info!(index, "question retired from revision");
            CorrectOutcome::Retired
        } else {
            CorrectOutcome::Improved(record.correct_count)
        };

        self.flush()?;
        Ok(outcome)
    }

    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.records.len();
        self.records.clear();
        self.flush()?;
        Ok(removed)
    }

    fn flush(&self) -> Result<()> {
        save(&self.path, &self.records).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to flush mistake ledger");
            e
        })
    }
}

/// Reads a ledger file. A bare array of indices is the older format and
/// loads as fresh records with no wrong answer and no correct streak.
pub fn load(path: &Path) -> Result<Ledger> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Ledger::new()),
        Err(e) => return Err(e.into()),
    };

    let value: Value = serde_json::from_str(&content)?;
    if value.is_array() {
        let indices: Vec<usize> = serde_json::from_value(value)?;
        info!(path = %path.display(), count = indices.len(), "migrating index-list ledger");
        return Ok(indices
            .into_iter()
            .map(|index| (index, MistakeRecord::default()))
            .collect());
    }
    Ok(serde_json::from_value(value)?)
}

// Writes beside the target and renames so a crash never leaves a torn file
pub fn save(path: &Path, records: &Ledger) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, records)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| QuizError::Persist {
        path: path.display().to_string(),
        message: e.error.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, MistakeTracker) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let tracker = MistakeTracker::open(dir.path().join("wrong_questions.json"));
        (dir, tracker)
    }

    mod load_tests {
        use super::*;

        #[test]
        fn missing_file_is_empty() {
            let (_dir, tracker) = setup();
            assert!(tracker.is_empty());
            assert!(!tracker.path().exists());
        }

        #[test]
        fn corrupt_file_starts_empty() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("wrong_questions.json");
            fs::write(&path, "{ this is not json").unwrap();

            let mut tracker = MistakeTracker::open(&path);
            assert!(tracker.is_empty());

            // Next write replaces the corrupt file
            tracker.record_wrong(4, "A").unwrap();
            assert_eq!(load(&path).unwrap().len(), 1);
        }

        #[test]
        fn reads_stringified_keys() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("ledger.json");
            fs::write(
                &path,
                r#"{"12": {"last_wrong": "BC", "correct_count": 1}}"#,
            )
            .unwrap();

            let tracker = MistakeTracker::open(&path);
            assert_eq!(
                tracker.get(12),
                Some(&MistakeRecord {
                    last_wrong: "BC".to_string(),
                    correct_count: 1
                })
            );
        }

        #[test]
        fn index_list_file_is_migrated() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("wrong_questions.json");
            fs::write(&path, "[3, 7, 12]").unwrap();

            let mut tracker = MistakeTracker::open(&path);
            assert_eq!(tracker.sorted_indices(), vec![3, 7, 12]);
            assert_eq!(tracker.get(7), Some(&MistakeRecord::default()));

            // The first write keeps the migrated entries and switches to records
            tracker.record_wrong(1, "A").unwrap();
            let reloaded = load(&path).unwrap();
            assert_eq!(reloaded.keys().copied().collect::<Vec<_>>(), vec![1, 3, 7, 12]);
            assert_eq!(reloaded[&1].last_wrong, "A");

            let raw: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert!(raw.is_object());
        }

        #[test]
        fn index_list_with_bad_entries_starts_empty() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("wrong_questions.json");
            fs::write(&path, r#"[3, "seven"]"#).unwrap();

            assert!(load(&path).is_err());
            assert!(MistakeTracker::open(&path).is_empty());
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn record_wrong_creates_record() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(5, "C").unwrap();

            let record = tracker.get(5).unwrap();
            assert_eq!(record.last_wrong, "C");
            assert_eq!(record.correct_count, 0);
            assert!(tracker.path().exists());
        }

        #[test]
        fn record_wrong_overwrites_last_wrong_but_keeps_count() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(5, "C").unwrap();
            tracker.record_correct(5).unwrap();
            tracker.record_wrong(5, "AD").unwrap();

            let record = tracker.get(5).unwrap();
            assert_eq!(record.last_wrong, "AD");
            assert_eq!(record.correct_count, 1);
        }

        #[test]
        fn record_correct_untracked_is_noop() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(1, "B").unwrap();
            let before = tracker.records().clone();

            let outcome = tracker.record_correct(2).unwrap();
            assert_eq!(outcome, CorrectOutcome::Untracked);
            assert_eq!(tracker.records(), &before);
        }

        #[test]
        fn three_correct_answers_retire_question() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(9, "A").unwrap();

            assert_eq!(tracker.record_correct(9).unwrap(), CorrectOutcome::Improved(1));
            assert_eq!(tracker.record_correct(9).unwrap(), CorrectOutcome::Improved(2));
            assert_eq!(tracker.record_correct(9).unwrap(), CorrectOutcome::Retired);
            assert!(!tracker.contains(9));

            assert_eq!(tracker.record_correct(9).unwrap(), CorrectOutcome::Untracked);
            assert!(load(tracker.path()).unwrap().is_empty());
        }

        #[test]
        fn sorted_indices_ascending() {
            let (_dir, mut tracker) = setup();
            for index in [42, 3, 17] {
                tracker.record_wrong(index, "A").unwrap();
            }
            assert_eq!(tracker.sorted_indices(), vec![3, 17, 42]);
        }

        #[test]
        fn clear_empties_ledger() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(1, "A").unwrap();
            tracker.record_wrong(2, "B").unwrap();
            assert_eq!(tracker.clear().unwrap(), 2);
            assert!(tracker.is_empty());
            assert!(load(tracker.path()).unwrap().is_empty());
        }
    }

    mod persistence_tests {
        use super::*;

        #[test]
        fn write_then_read_round_trips() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(0, "A").unwrap();
            tracker.record_wrong(57, "BCE").unwrap();
            tracker.record_wrong(311, "D").unwrap();
            tracker.record_correct(57).unwrap();

            let reopened = MistakeTracker::open(tracker.path());
            assert_eq!(reopened.records(), tracker.records());
        }

        #[test]
        fn file_uses_string_keys() {
            let (_dir, mut tracker) = setup();
            tracker.record_wrong(7, "B").unwrap();

            let raw: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(tracker.path()).unwrap()).unwrap();
            assert_eq!(raw["7"]["last_wrong"], "B");
            assert_eq!(raw["7"]["correct_count"], 0);
        }

        #[test]
        fn flush_failure_is_reported() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing").join("ledger.json");
            let mut tracker = MistakeTracker::open(&path);

            assert!(tracker.record_wrong(1, "A").is_err());
            // In-memory state still reflects the mutation
            assert!(tracker.contains(1));
        }
    }
}
