use crate::index::AppIndex;
use crate::xdg;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

const HISTORY_VERSION: u32 = 2;
const LEGACY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub count: u32,
    /// Unix timestamp (seconds). 0 means unknown.
    pub last_used: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    map: HashMap<String, Usage>,
}

/// Launch-usage history, keyed by display name. Version 1 of the file
/// was keyed by desktop entry id instead; loading migrates it through
/// `AppIndex::lookup_by_id`.
#[derive(Debug, Default)]
pub struct UsageStore {
    map: HashMap<String, Usage>,
    dirty: bool,
    path: PathBuf,
}

impl UsageStore {
    pub fn load(index: &AppIndex) -> Self {
        Self::load_from_dir(&xdg::data_dir(), index)
    }

    pub fn load_from_dir(dir: &Path, index: &AppIndex) -> Self {
        let mut store = Self {
            map: HashMap::new(),
            dirty: false,
            path: history_path(dir, HISTORY_VERSION),
        };

        if let Ok(data) = fs::read(&store.path)
            && let Ok(file) = postcard::from_bytes::<HistoryFile>(&data)
            && file.version == HISTORY_VERSION
        {
            store.map = file.map;
            return store;
        }

        // Older id-keyed format: resolve each id to its current display
        // name and drop entries whose application is gone.
        let legacy = history_path(dir, LEGACY_VERSION);
        if let Ok(data) = fs::read(&legacy)
            && let Ok(file) = postcard::from_bytes::<HistoryFile>(&data)
            && file.version == LEGACY_VERSION
        {
            let total = file.map.len();
            for (id, usage) in file.map {
                match index.lookup_by_id(&id) {
                    Some(app) => {
                        store.map.insert(app.name.clone(), usage);
                    }
                    None => debug!("history migration: dropping unknown id `{id}`"),
                }
            }
            warn!(
                "migrated usage history v{LEGACY_VERSION} -> v{HISTORY_VERSION} ({}/{total} entries kept)",
                store.map.len()
            );
            store.dirty = true;
        }

        store
    }

    pub fn get(&self, name: &str) -> Usage {
        self.map.get(name).copied().unwrap_or_default()
    }

    pub fn increment(&mut self, name: &str) -> u32 {
        let now = unix_seconds_now();
        let v = self.map.entry(name.to_string()).or_default();
        v.count = v.count.saturating_add(1);
        v.last_used = now;
        self.dirty = true;
        v.count
    }

    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }

        let Some(dir) = self.path.parent() else {
            return;
        };
        if fs::create_dir_all(dir).is_err() {
            return;
        }

        let file = HistoryFile {
            version: HISTORY_VERSION,
            map: self.map.clone(),
        };

        let Ok(data) = postcard::to_stdvec(&file) else {
            return;
        };

        // Best-effort atomic-ish write.
        let tmp = self.path.with_extension("bin.tmp");
        if fs::write(&tmp, data).is_ok() {
            let _ = fs::rename(tmp, &self.path);
            self.dirty = false;
        }
    }
}

fn history_path(dir: &Path, version: u32) -> PathBuf {
    dir.join(format!("usage.v{version}.bin"))
}

pub fn unix_seconds_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop;
    use crate::models::SearchGroup;
    use tempfile::TempDir;

    fn test_index() -> (TempDir, AppIndex) {
        let dir = TempDir::new().expect("tempdir");
        fs::write(
            dir.path().join("firefox.desktop"),
            "[Desktop Entry]\nName=Firefox\nExec=firefox\n",
        )
        .expect("write desktop file");

        let groups: Vec<SearchGroup> = desktop::build_search_groups(&[dir.path().to_path_buf()]);
        let index = AppIndex::build(&groups).expect("build");
        (dir, index)
    }

    #[test]
    fn increment_then_reload_round_trips() {
        let (_apps, index) = test_index();
        let data = TempDir::new().expect("tempdir");

        let mut store = UsageStore::load_from_dir(data.path(), &index);
        assert_eq!(store.get("Firefox").count, 0);
        store.increment("Firefox");
        store.increment("Firefox");
        store.flush();

        let store = UsageStore::load_from_dir(data.path(), &index);
        let usage = store.get("Firefox");
        assert_eq!(usage.count, 2);
        assert!(usage.last_used > 0);
    }

    #[test]
    fn legacy_id_keyed_history_migrates_through_the_index() {
        let (_apps, index) = test_index();
        let data = TempDir::new().expect("tempdir");

        let mut legacy_map = HashMap::new();
        legacy_map.insert(
            "firefox.desktop".to_string(),
            Usage {
                count: 7,
                last_used: 123,
            },
        );
        legacy_map.insert("gone.desktop".to_string(), Usage::default());
        let legacy = HistoryFile {
            version: LEGACY_VERSION,
            map: legacy_map,
        };
        fs::write(
            history_path(data.path(), LEGACY_VERSION),
            postcard::to_stdvec(&legacy).expect("encode"),
        )
        .expect("write legacy history");

        let store = UsageStore::load_from_dir(data.path(), &index);
        assert_eq!(store.get("Firefox").count, 7);
        // The id with no live entry is dropped, not carried over.
        assert_eq!(store.map.len(), 1);
    }
}
