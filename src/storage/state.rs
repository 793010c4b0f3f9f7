//! Persisted navigation state
//!
//! One JSON record per state key at `.dquiz/state/<key>.json`. Uses file
//! locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::{PersistedState, StateSlot};

use super::config::PROJECT_DIR;

/// Store for the navigation state record
pub struct FileStateSlot {
    path: PathBuf,
}

impl FileStateSlot {
    /// Creates a slot backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the slot for a state key in a project
    pub fn for_project(project_root: &Path, key: &str) -> Self {
        Self::new(
            project_root
                .join(PROJECT_DIR)
                .join("state")
                .join(format!("{}.json", key)),
        )
    }

    /// Returns the path to the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record, failing on I/O or parse errors
    pub fn read(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open state record: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on state record")?;

        let state = serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse state record: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(Some(state))
    }

    /// Writes the record (full rewrite)
    pub fn write(&self, state: &PersistedState) -> Result<()> {
        let content = serde_json::to_vec_pretty(state).context("Failed to serialize state")?;
        write_atomic(&self.path, &content)
    }
}

impl StateSlot for FileStateSlot {
    fn load(&self) -> Option<PersistedState> {
        match self.read() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "ignoring unreadable navigation state");
                None
            }
        }
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        self.write(state)
    }
}

/// Replaces `path` with `content` via a locked temp file and a rename
pub(super) fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock: {}", temp_path.display()))?;

        let mut writer = BufWriter::new(&file);
        writer
            .write_all(content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", temp_path.display()))?;
    }

    // Atomic rename
    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(current: &str) -> PersistedState {
        PersistedState {
            current_id: NodeId::from(current),
            history: vec!["start".into()],
            dataset: Some("00112233aabbccdd".to_string()),
            saved_at: Some(Utc::now()),
        }
    }

    #[test]
    fn read_missing_record() {
        let dir = TempDir::new().unwrap();
        let slot = FileStateSlot::new(dir.path().join("state.json"));

        assert!(slot.read().unwrap().is_none());
        assert!(slot.load().is_none());
    }

    #[test]
    fn write_and_read_record() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileStateSlot::new(dir.path().join("state.json"));

        let saved = record("end");
        slot.save(&saved).unwrap();

        assert_eq!(slot.load(), Some(saved));
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let slot = FileStateSlot::new(dir.path().join("state.json"));
        slot.write(&record("end")).unwrap();

        let raw = fs::read_to_string(slot.path()).unwrap();
        assert!(raw.contains("\"currentId\": \"end\""));
        assert!(raw.contains("\"savedAt\""));
    }

    #[test]
    fn corrupt_record_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let slot = FileStateSlot::new(dir.path().join("state.json"));
        fs::write(slot.path(), "{ not json").unwrap();

        assert!(slot.read().is_err());
        assert!(slot.load().is_none());
    }

    #[test]
    fn project_slot_location() {
        let dir = TempDir::new().unwrap();
        let slot = FileStateSlot::for_project(dir.path(), "decision_quiz_state_v1");

        assert!(slot
            .path()
            .ends_with(".dquiz/state/decision_quiz_state_v1.json"));
    }

    #[test]
    fn creates_parent_directories_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let slot = FileStateSlot::for_project(dir.path(), "k");
        slot.write(&record("a")).unwrap();

        assert!(slot.path().exists());
        assert!(!slot.path().with_extension("json.tmp").exists());
    }
}
