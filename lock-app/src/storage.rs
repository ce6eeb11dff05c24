//! `window.localStorage` persistence.
//!
//! The pattern is kept under `GestureLockPassword` as a JSON index array and
//! the grid size under `matrix`. Older pages stored the chosen points as
//! `{x, y, index}` objects; those still load.

use lock_core::{Pattern, PatternStore, StoreError, StoredPattern};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Key of the JSON-encoded pattern.
pub const PASSWORD_KEY: &str = "GestureLockPassword";

/// Key of the grid size the pattern was enrolled on.
pub const MATRIX_KEY: &str = "matrix";

/// Matrix assumed when only a pattern was stored.
const LEGACY_MATRIX: u32 = 3;

/// One stored entry: a bare index or a point object carrying one.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Index(u32),
    Point { index: u32 },
}

impl StoredEntry {
    fn index(&self) -> u32 {
        match self {
            Self::Index(index) | Self::Point { index } => *index,
        }
    }
}

/// Pattern store backed by the browser's local storage.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if there is no window or storage
    /// access is denied (e.g., private browsing).
    pub fn open() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window object".into()))?;
        let storage = window
            .local_storage()
            .map_err(js_unavailable)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl PatternStore for LocalStorageStore {
    fn load(&self) -> Result<Option<StoredPattern>, StoreError> {
        load_record(&self.storage)
    }

    fn save(&mut self, record: &StoredPattern) -> Result<(), StoreError> {
        write_record(&mut self.storage, record)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        clear_record(&mut self.storage)
    }
}

/// String key/value storage the record is split across.
trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl KeyValue for Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_item(key).map_err(js_unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_item(key, value).map_err(js_unavailable)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.remove_item(key).map_err(js_unavailable)
    }
}

fn load_record<K: KeyValue>(kv: &K) -> Result<Option<StoredPattern>, StoreError> {
    let password = kv.get(PASSWORD_KEY)?;
    let matrix = kv.get(MATRIX_KEY)?;
    decode_record(password.as_deref(), matrix.as_deref())
}

/// Write both keys. If either write fails, both are removed again so a
/// pattern is never left next to a stale or missing matrix.
fn write_record<K: KeyValue>(kv: &mut K, record: &StoredPattern) -> Result<(), StoreError> {
    let password = serde_json::to_string(&record.pattern)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    let written = kv
        .set(MATRIX_KEY, &record.matrix.to_string())
        .and_then(|()| kv.set(PASSWORD_KEY, &password));
    if written.is_err() {
        if let Err(e) = clear_record(kv) {
            tracing::warn!("Failed to roll back partial pattern write: {e}");
        }
    }
    written
}

fn clear_record<K: KeyValue>(kv: &mut K) -> Result<(), StoreError> {
    kv.remove(PASSWORD_KEY)?;
    kv.remove(MATRIX_KEY)?;
    Ok(())
}

/// Rebuild a record from the two storage values.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if either value is malformed.
pub fn decode_record(
    password: Option<&str>,
    matrix: Option<&str>,
) -> Result<Option<StoredPattern>, StoreError> {
    let Some(password) = password else {
        return Ok(None);
    };
    let entries: Vec<StoredEntry> =
        serde_json::from_str(password).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let pattern = Pattern::new(entries.iter().map(StoredEntry::index).collect());
    let matrix = match matrix {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| StoreError::Serialization(format!("bad matrix {raw:?}: {e}")))?,
        None => LEGACY_MATRIX,
    };
    Ok(Some(StoredPattern::new(matrix, pattern)))
}

#[allow(clippy::needless_pass_by_value)]
fn js_unavailable(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{err:?}"))
}
