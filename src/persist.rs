//! JSON file persistence shared by the record store and both indexes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::IndexError;

/// Load `path`, or the default value when it does not exist yet.
/// A corrupt file is logged and replaced by an empty store.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, IndexError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = std::fs::read_to_string(path)?;
    match serde_json::from_str(&data) {
        Ok(v) => Ok(v),
        Err(e) => {
            tracing::warn!("Ignoring unreadable store file {}: {e}", path.display());
            Ok(T::default())
        }
    }
}

/// Atomic write via temp file + rename.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), IndexError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string(value)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Make every later write to `path` fail at the rename step by putting a
/// directory where the file should go.
#[cfg(test)]
pub(crate) fn block_writes(path: &Path) {
    let _ = std::fs::remove_file(path);
    std::fs::create_dir(path).unwrap();
}

#[cfg(test)]
pub(crate) fn unblock_writes(path: &Path) {
    std::fs::remove_dir(path).unwrap();
}
