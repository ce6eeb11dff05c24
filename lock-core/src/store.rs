//! Persistence of the accepted pattern.
//!
//! The core never touches storage directly; it goes through [`PatternStore`].
//! [`MemoryStore`] backs tests and headless hosts, [`FileStore`] keeps the
//! record as a JSON file for native hosts.

use std::path::{Path, PathBuf};

use crate::{StoreError, StoredPattern};

/// File name used by [`FileStore`] inside its data directory.
pub const PATTERN_FILE: &str = "pattern.json";

/// Load/save/clear capability for the stored pattern.
pub trait PatternStore {
    /// Read the stored pattern, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or decoded.
    fn load(&self) -> Result<Option<StoredPattern>, StoreError>;

    /// Replace the stored pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn save(&mut self, record: &StoredPattern) -> Result<(), StoreError>;

    /// Remove the stored pattern. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: PatternStore + ?Sized> PatternStore for &mut S {
    fn load(&self) -> Result<Option<StoredPattern>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, record: &StoredPattern) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<S: PatternStore + ?Sized> PatternStore for Box<S> {
    fn load(&self) -> Result<Option<StoredPattern>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, record: &StoredPattern) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<StoredPattern>,
    unavailable: bool,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a record.
    #[must_use]
    pub fn with_record(record: StoredPattern) -> Self {
        Self {
            record: Some(record),
            unavailable: false,
        }
    }

    /// Make writes fail with [`StoreError::Unavailable`], as a full or
    /// revoked browser storage would.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// The current record.
    #[must_use]
    pub fn record(&self) -> Option<&StoredPattern> {
        self.record.as_ref()
    }
}

impl PatternStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredPattern>, StoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &StoredPattern) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store is read-only".into()));
        }
        self.record = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store is read-only".into()));
        }
        self.record = None;
        Ok(())
    }
}

/// JSON file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store in `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the pattern file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(PATTERN_FILE)
    }
}

impl PatternStore for FileStore {
    fn load(&self) -> Result<Option<StoredPattern>, StoreError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let record = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(record))
    }

    fn save(&mut self, record: &StoredPattern) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.path();
        // Write to a sibling temp file, then rename over the record
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &path)?;
        tracing::info!("Saved pattern to {}", path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::info!("Removed pattern file {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;

    fn record() -> StoredPattern {
        StoredPattern::new(3, Pattern::new(vec![1, 5, 9]))
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.load().expect("load").is_none());
        store.save(&record()).expect("save");
        assert_eq!(store.load().expect("load"), Some(record()));
        store.clear().expect("clear");
        assert!(store.record().is_none());
    }

    #[test]
    fn unavailable_memory_store_rejects_writes() {
        let mut store = MemoryStore::with_record(record());
        store.set_unavailable(true);
        assert!(matches!(
            store.save(&record()),
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.clear().is_err());
        assert_eq!(store.load().expect("reads still work"), Some(record()));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::with_data_dir(dir.path().join("nested")).expect("create");
        assert!(store.load().expect("load").is_none());
        store.save(&record()).expect("save");

        let reopened = FileStore::with_data_dir(dir.path().join("nested")).expect("reopen");
        assert_eq!(reopened.load().expect("load"), Some(record()));
    }

    #[test]
    fn file_store_replaces_record_without_leftovers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::with_data_dir(dir.path()).expect("create");
        store.save(&record()).expect("save");

        // an interrupted earlier write leaves only the temp file behind
        let temp_path = store.path().with_extension("json.tmp");
        std::fs::write(&temp_path, "{\"matrix\":3,\"pat").expect("write partial");
        assert_eq!(store.load().expect("load"), Some(record()));

        let longer = StoredPattern::new(4, Pattern::new(vec![1, 6, 11, 16, 12]));
        store.save(&longer).expect("save");
        assert_eq!(store.load().expect("load"), Some(longer));
        assert!(!temp_path.exists());
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::with_data_dir(dir.path()).expect("create");
        store.clear().expect("clear empty");
        store.save(&record()).expect("save");
        store.clear().expect("clear");
        assert!(!store.path().exists());
        store.clear().expect("clear again");
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::with_data_dir(dir.path()).expect("create");
        std::fs::write(store.path(), "{ not json").expect("write");
        assert!(matches!(store.load(), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn borrowed_store_writes_through() {
        fn save_through<S: PatternStore>(mut store: S) {
            store.save(&record()).expect("save");
        }

        let mut store = MemoryStore::new();
        save_through(&mut store);
        assert_eq!(store.record(), Some(&record()));
    }
}
