// src/storage/file.rs
use log::{ debug, warn };
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{ Path, PathBuf };
use super::KeyValueStore;

type Entries = HashMap<String, HashMap<String, String>>;

/// JSON file store for keys that should survive restarts.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Opens the store, starting empty if the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) =>
                serde_json::from_str(&content).unwrap_or_else(|e| {
                    warn!("Ignoring corrupt preferences file {}: {}", path.display(), e);
                    Entries::new()
                }),
            Err(e) => {
                debug!("No preferences file at {}: {}", path.display(), e);
                Entries::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    // Write to a sibling temp file, then rename over the target.
    fn persist(path: &Path, entries: &Entries) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e);
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, visitor: &str, key: &str) -> Option<String> {
        self.entries
            .lock()
            .get(visitor)
            .and_then(|keys| keys.get(key))
            .cloned()
    }

    fn set(&self, visitor: &str, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock();
        entries
            .entry(visitor.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Self::persist(&self.path, &entries)
    }
}
