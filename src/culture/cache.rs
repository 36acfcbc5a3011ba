//! File-based culture list cache at ~/.art-explorer/cultures.json.
//!
//! TTL: 7 days, measured from the last successful write.
//! Best effort: unreadable files are treated as empty, write failures are ignored.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CULTURE_TTL_MS: i64 = 7 * 24 * 3600 * 1000; // 7 days in ms

#[derive(Serialize, Deserialize, Default)]
struct CacheFile {
    /// Kept undecoded so a bad list does not cost us the timestamp.
    #[serde(default)]
    cultures: Option<serde_json::Value>,
    #[serde(default)]
    last_fetch_ms: Option<i64>,
}

/// The culture cache. Construct once at startup and pass it to consumers.
pub struct CultureCache {
    path: PathBuf,
    file: CacheFile,
}

impl CultureCache {
    pub fn load(path: PathBuf) -> Self {
        let file = Self::read_file(&path).unwrap_or_default();
        Self { path, file }
    }

    fn read_file(path: &Path) -> Option<CacheFile> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached list, or None if absent or undecodable.
    pub fn get(&self) -> Option<Vec<String>> {
        let value = self.file.cultures.clone()?;
        serde_json::from_value(value).ok()
    }

    pub fn put(&mut self, cultures: &[String]) {
        self.put_at(cultures, Utc::now());
    }

    pub fn put_at(&mut self, cultures: &[String], now: DateTime<Utc>) {
        let Ok(value) = serde_json::to_value(cultures) else {
            return;
        };
        self.file.cultures = Some(value);
        self.file.last_fetch_ms = Some(now.timestamp_millis());
        self.persist();
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.file
            .last_fetch_ms
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    pub fn should_fetch(&self) -> bool {
        self.should_fetch_at(Utc::now())
    }

    /// True when nothing usable was ever written or the last write is older
    /// than the TTL. An out-of-range timestamp counts as never written.
    pub fn should_fetch_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetch() {
            None => true,
            Some(last) => now.signed_duration_since(last) > Duration::milliseconds(CULTURE_TTL_MS),
        }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.file) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    debug!(path = %self.path.display(), error = %e, "culture cache write failed");
                }
            }
            Err(e) => debug!(error = %e, "culture cache encode failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (CultureCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cultures.json");
        (CultureCache::load(path), dir)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_cache() {
        let (cache, _dir) = test_cache();
        assert!(cache.get().is_none());
        assert!(cache.last_fetch().is_none());
        assert!(cache.should_fetch());
    }

    #[test]
    fn test_should_fetch_ttl() {
        let (mut cache, _dir) = test_cache();
        let t0 = Utc.with_ymd_and_hms(2024, 9, 21, 12, 0, 0).unwrap();

        assert!(cache.should_fetch_at(t0));
        cache.put_at(&names(&["Chinese"]), t0);
        assert!(!cache.should_fetch_at(t0));
        assert!(!cache.should_fetch_at(t0 + Duration::days(7)));
        assert!(cache.should_fetch_at(t0 + Duration::days(7) + Duration::seconds(1)));
    }

    #[test]
    fn test_put_get() {
        let (mut cache, _dir) = test_cache();
        cache.put(&names(&["Aztec", "Maya"]));
        assert_eq!(cache.get().unwrap(), names(&["Aztec", "Maya"]));
        assert!(!cache.should_fetch());
    }

    #[test]
    fn test_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cultures.json");
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        {
            let mut cache = CultureCache::load(path.clone());
            cache.put_at(&names(&["Persian"]), t0);
        }

        let cache = CultureCache::load(path);
        assert_eq!(cache.get().unwrap(), names(&["Persian"]));
        assert_eq!(cache.last_fetch(), Some(t0));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cultures.json");
        fs::write(&path, "{ not json").unwrap();

        let cache = CultureCache::load(path);
        assert!(cache.get().is_none());
        assert!(cache.should_fetch());
    }

    #[test]
    fn test_undecodable_list_keeps_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cultures.json");
        fs::write(&path, r#"{"cultures": [1, 2, 3], "last_fetch_ms": 9999999999999}"#).unwrap();

        let cache = CultureCache::load(path);
        assert!(cache.get().is_none());
        assert!(!cache.should_fetch());
    }

    #[test]
    fn test_out_of_range_timestamp_counts_as_stale() {
        let dir = TempDir::new().unwrap();
        for ms in [i64::MIN, i64::MAX] {
            let path = dir.path().join(format!("cultures{}.json", ms.signum()));
            fs::write(&path, format!(r#"{{"cultures": ["A"], "last_fetch_ms": {}}}"#, ms)).unwrap();

            let cache = CultureCache::load(path);
            assert!(cache.last_fetch().is_none());
            assert!(cache.should_fetch());
            assert_eq!(cache.get().unwrap(), names(&["A"]));
        }
    }

    #[test]
    fn test_unwritable_path_is_silent() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("cultures.json");
        fs::create_dir_all(&path).unwrap();

        let mut cache = CultureCache::load(path);
        cache.put(&names(&["Egyptian"]));
        assert_eq!(cache.get().unwrap(), names(&["Egyptian"]));
    }
}
