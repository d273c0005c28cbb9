use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::PreferenceStore;
use crate::error::Result;

/// Preferences kept as one flat JSON object on disk. Every write rewrites
/// the file so a crash never loses more than the write in flight.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// The in-memory entry only changes once the file write succeeded.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(&tmp.path().join("prefs.json")).unwrap();
        assert_eq!(store.get("lw_token"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("prefs.json");

        let store = FileStore::open(&path).unwrap();
        store.set("lw_sort_mode", "name_asc").unwrap();
        store.set("lw_token", "abc").unwrap();
        store.remove("lw_token").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("lw_sort_mode").as_deref(), Some("name_asc"));
        assert_eq!(reopened.get("lw_token"), None);
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        let store = FileStore::open(&path).unwrap();
        store.set("lw_sort_mode", "name_asc").unwrap();

        // a directory in place of the file makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.set("lw_sort_mode", "date_asc").is_err());
        assert!(store.set("lw_theme", "dark").is_err());
        assert!(store.remove("lw_sort_mode").is_err());
        assert_eq!(store.get("lw_sort_mode").as_deref(), Some("name_asc"));
        assert_eq!(store.get("lw_theme"), None);
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Json(_)));
    }
}
