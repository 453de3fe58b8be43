//! Durable state storage
//!
//! A single typed repository interface (`load`/`save`) over the versioned
//! save record, so the storage medium is swappable without touching engine
//! logic. The file implementation writes the whole record atomically:
//! exclusive lock, temp file, fsync, rename. There are no partial writes.

mod record;

pub use record::{ChallengeProgress, SAVE_VERSION, SaveRecord};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use fs2::FileExt;

/// Repository for the engine's durable state.
pub trait StateStore {
    /// Load the persisted record, or `None` on first run.
    fn load(&self) -> Result<Option<SaveRecord>>;

    /// Persist the full record as one all-or-nothing write.
    fn save(&self, record: &SaveRecord) -> Result<()>;
}

// Shared handles work as stores, so a caller can keep a reference to the
// store it hands the engine.
impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<SaveRecord>> {
        (**self).load()
    }

    fn save(&self, record: &SaveRecord) -> Result<()> {
        (**self).save(record)
    }
}

/// JSON file store at `~/.codequest/progress.json` (or a custom path).
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Default state directory (~/.codequest/).
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codequest")
    }

    /// Store at the default location.
    pub fn open_default() -> Self {
        Self::new(Self::default_dir().join("progress.json"))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<SaveRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read save file: {}", self.path.display()))?;

        let record: SaveRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse save file: {}", self.path.display()))?;

        if record.version > SAVE_VERSION {
            bail!(
                "Save file version {} is newer than supported version {}",
                record.version,
                SAVE_VERSION
            );
        }

        Ok(Some(record))
    }

    fn save(&self, record: &SaveRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state dir: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(record).context("Failed to serialize save record")?;

        // Lock file is separate from the record to avoid issues with rename.
        let lock_path = self.path.with_extension("json.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

        lock_file
            .lock_exclusive()
            .context("Failed to acquire save lock")?;

        // Temp file + rename: readers see the old or the new record, never
        // a partial write.
        let temp_path = self.path.with_extension("json.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        temp_file
            .write_all(content.as_bytes())
            .context("Failed to write save record")?;

        temp_file.sync_all().context("Failed to sync save file")?;

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to rename save file: {}", self.path.display()))?;

        Ok(())
    }
}

/// In-memory store for tests and previews. `fail_saves` simulates a full
/// or rejected storage medium.
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<SaveRecord>>,
    fail_saves: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves
            .store(fail, std::sync::atomic::Ordering::Relaxed);
    }

    /// The last successfully saved record, if any.
    pub fn saved(&self) -> Option<SaveRecord> {
        self.record.lock().expect("store lock").clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<SaveRecord>> {
        Ok(self.record.lock().expect("store lock").clone())
    }

    fn save(&self, record: &SaveRecord) -> Result<()> {
        if self.fail_saves.load(std::sync::atomic::Ordering::Relaxed) {
            bail!("storage write rejected");
        }
        *self.record.lock().expect("store lock") = Some(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_first_run() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("progress.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("progress.json"));

        let mut record = SaveRecord::seeded();
        record.progression.total_xp = 120;
        record.challenges.completed.insert("js-arrays-2".to_string());
        store.save(&record).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("state").join("p.json"));
        store.save(&SaveRecord::seeded()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let store = JsonFileStore::new(&path);

        let mut record = SaveRecord::seeded();
        store.save(&record).unwrap();

        // Rewrite with a future version.
        record.version = SAVE_VERSION + 1;
        let content = serde_json::to_string(&record).unwrap();
        std::fs::write(&path, content).unwrap();

        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_failure_toggle() {
        let store = MemoryStore::new();
        let record = SaveRecord::seeded();
        store.set_fail_saves(true);
        assert!(store.save(&record).is_err());
        assert!(store.saved().is_none());

        store.set_fail_saves(false);
        store.save(&record).unwrap();
        assert_eq!(store.saved(), Some(record));
    }
}
