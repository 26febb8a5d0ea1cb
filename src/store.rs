//! Key-value persistence and the task store built on top of it.
//!
//! The garden keeps everything in one small key-value file: the task list is a
//! single JSON blob under [`TASKS_KEY`], next to a couple of personalisation
//! keys. [`TaskStore`] is handed a [`KeyValueStore`] rather than reaching for a
//! global, so tests run against [`MemoryStore`].

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::task::{assign_missing_ids, next_id, Task};

/// Key holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the display-name override.
pub const USER_NAME_KEY: &str = "user-name";
/// Key holding a tip that replaces the daily tip.
pub const OVERRIDE_TIP_KEY: &str = "override-tip";
/// Key holding the lowest id never handed out.
pub const NEXT_ID_KEY: &str = "next-id";

/// Name used when no display name has been stored.
pub const DEFAULT_USER_NAME: &str = "friend";

/// String key-value storage backing the task store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store, used by tests and as a scratch store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a JSON object in a single file.
///
/// Reads go to the file every time. A mutation re-reads the file, changes one
/// key and rewrites the whole object through a temp file and a rename, so keys
/// written by another process in the meantime are kept.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file reads as empty.
    pub fn open(path: &Path) -> Self {
        FileStore {
            path: path.to_path_buf(),
        }
    }

    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<()> {
        let mut entries = read_entries(&self.path);
        if change(&mut entries) {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(entries)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }
    let mut buf = String::new();
    match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
        Ok(_) => match serde_json::from_str(&buf) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Error parsing {}, starting fresh: {e}", path.display());
                BTreeMap::new()
            }
        },
        Err(e) => {
            log::warn!("Error reading {}, starting fresh: {e}", path.display());
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        read_entries(&self.path).remove(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

/// Ordered task list persisted as one blob in a [`KeyValueStore`].
#[derive(Debug)]
pub struct TaskStore<S> {
    kv: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(kv: S) -> Self {
        TaskStore { kv }
    }

    /// Read the task list. A missing key or a malformed blob yields an empty list.
    pub fn load(&self) -> Vec<Task> {
        let Some(blob) = self.kv.get(TASKS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Task>>(&blob) {
            Ok(mut tasks) => {
                if assign_missing_ids(&mut tasks) {
                    log::debug!("renumbered task records without a usable id");
                }
                tasks
            }
            Err(e) => {
                log::warn!("Stored task list is corrupt, treating it as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored list with `tasks` in one write.
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let blob = serde_json::to_string(tasks)?;
        self.kv.set(TASKS_KEY, blob)
    }

    /// Reserve an id for a new task. An id is never handed out twice, even
    /// after its task is deleted or the list is cleared.
    pub fn allocate_id(&mut self, tasks: &[Task]) -> Result<u64> {
        let mark = self
            .kv
            .get(NEXT_ID_KEY)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let id = mark.max(next_id(tasks));
        self.kv.set(NEXT_ID_KEY, (id + 1).to_string())?;
        Ok(id)
    }

    /// Drop the stored list entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.kv.remove(TASKS_KEY)
    }

    /// Display name used in spoken greetings.
    pub fn user_name(&self) -> String {
        self.kv
            .get(USER_NAME_KEY)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
    }

    pub fn set_user_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            self.kv.remove(USER_NAME_KEY)
        } else {
            self.kv.set(USER_NAME_KEY, name.to_string())
        }
    }

    pub fn override_tip(&self) -> Option<String> {
        self.kv.get(OVERRIDE_TIP_KEY).filter(|t| !t.trim().is_empty())
    }

    pub fn set_override_tip(&mut self, tip: Option<&str>) -> Result<()> {
        match tip.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => self.kv.set(OVERRIDE_TIP_KEY, t.to_string()),
            None => self.kv.remove(OVERRIDE_TIP_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn missing_key_loads_empty() {
        let store = TaskStore::new(MemoryStore::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let mut kv = MemoryStore::new();
        kv.set(TASKS_KEY, "{not json".to_string()).unwrap();
        let store = TaskStore::new(kv);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let mut store = TaskStore::new(MemoryStore::new());
        let tasks = vec![
            Task::new(1, "Sow carrots", d(2025, 3, 17)),
            Task::new(2, "Water beans", d(2025, 3, 2)),
        ];
        store.save(&tasks).unwrap();
        assert_eq!(store.load(), tasks);
    }

    #[test]
    fn clear_removes_the_blob() {
        let mut kv = MemoryStore::new();
        {
            let mut store = TaskStore::new(&mut kv);
            store.save(&[Task::new(1, "Weed", d(2025, 5, 5))]).unwrap();
            store.clear().unwrap();
            assert!(store.load().is_empty());
        }
        assert!(kv.get(TASKS_KEY).is_none());
    }

    #[test]
    fn allocated_ids_survive_delete_and_clear() {
        let mut store = TaskStore::new(MemoryStore::new());
        let first = store.allocate_id(&[]).unwrap();
        assert_eq!(first, 1);
        let tasks = vec![Task::new(first, "Weed", d(2025, 5, 5))];
        store.save(&tasks).unwrap();
        assert_eq!(store.allocate_id(&tasks).unwrap(), 2);
        store.clear().unwrap();
        assert_eq!(store.allocate_id(&[]).unwrap(), 3);

        let legacy = vec![Task::new(40, "Old", d(2025, 5, 5))];
        assert_eq!(store.allocate_id(&legacy).unwrap(), 41);
    }

    #[test]
    fn user_name_defaults_and_resets() {
        let mut store = TaskStore::new(MemoryStore::new());
        assert_eq!(store.user_name(), "friend");
        store.set_user_name("  Thandi ").unwrap();
        assert_eq!(store.user_name(), "Thandi");
        store.set_user_name("").unwrap();
        assert_eq!(store.user_name(), "friend");
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        {
            let mut store = TaskStore::new(FileStore::open(&path));
            store.save(&[Task::new(1, "Prune roses", d(2025, 7, 1))]).unwrap();
            store.set_override_tip(Some("Compost!")).unwrap();
        }
        let store = TaskStore::new(FileStore::open(&path));
        assert_eq!(store.load()[0].text, "Prune roses");
        assert_eq!(store.override_tip().as_deref(), Some("Compost!"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_sees_writes_from_other_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut first = TaskStore::new(FileStore::open(&path));
        let mut second = TaskStore::new(FileStore::open(&path));

        second.set_user_name("Thandi").unwrap();
        second.save(&[Task::new(1, "Mulch beds", d(2025, 6, 2))]).unwrap();
        assert_eq!(first.user_name(), "Thandi");
        assert_eq!(first.load()[0].text, "Mulch beds");

        first.save(&[]).unwrap();
        first.set_override_tip(Some("Rotate crops")).unwrap();
        let reopened = TaskStore::new(FileStore::open(&path));
        assert_eq!(reopened.user_name(), "Thandi");
        assert!(reopened.load().is_empty());
        assert_eq!(second.override_tip().as_deref(), Some("Rotate crops"));
    }

    #[test]
    fn unreadable_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = TaskStore::new(FileStore::open(&path));
        assert!(store.load().is_empty());
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (1u64..10_000, ".*", 0i32..3650, any::<bool>()).prop_map(|(id, text, offset, done)| {
            let date = d(2020, 1, 1) + chrono::Duration::days(offset as i64);
            Task { id, text, date, done }
        })
    }

    proptest! {
        #[test]
        fn load_returns_what_was_saved(tasks in prop::collection::vec(arb_task(), 0..20)) {
            // Ids must be unique for the list to be well formed.
            let mut tasks = tasks;
            for (i, t) in tasks.iter_mut().enumerate() {
                t.id = i as u64 + 1;
            }
            let mut store = TaskStore::new(MemoryStore::new());
            store.save(&tasks).unwrap();
            prop_assert_eq!(store.load(), tasks);
        }
    }
}
