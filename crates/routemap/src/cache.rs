use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::{PipelineError, PipelineResult};

/// Postal code to `(latitude, longitude)`. Ordered so the persisted
/// JSON is stable across runs.
pub type GeoCache = BTreeMap<String, (f64, f64)>;

/// Load the cache file; a missing file is an empty cache, unparsable
/// content is fatal.
pub fn load(path: &Path) -> PipelineResult<GeoCache> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(why) if why.kind() == io::ErrorKind::NotFound => {
            return Ok(GeoCache::new())
        }
        Err(source) => {
            return Err(PipelineError::Io {
                path: path.to_owned(),
                source,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|source| PipelineError::CacheCorrupt {
        path: path.to_owned(),
        source,
    })
}

/// Persist the cache, creating parent directories as needed. Writes to
/// a sibling temp file and renames it into place so a crash mid-write
/// never clobbers a previously valid cache.
pub fn save(path: &Path, cache: &GeoCache) -> PipelineResult<()> {
    let io_error = |source| PipelineError::Io {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }

    let encoded = serde_json::to_string_pretty(cache)
        .map_err(|why| io_error(io::Error::new(io::ErrorKind::InvalidData, why)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, encoded).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(io_error)
}

/// All of `existing` plus any keys of `fresh` not already present.
/// Existing entries always win; a fresh lookup never overwrites a
/// previously cached coordinate.
pub fn merge(existing: &GeoCache, fresh: &GeoCache) -> GeoCache {
    let mut merged = existing.clone();
    for (postal, coordinate) in fresh {
        merged.entry(postal.clone()).or_insert(*coordinate);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = load(&dir.path().join("geo_cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn save_creates_parents_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("geo_cache.json");

        let mut cache = GeoCache::new();
        cache.insert("207224".to_owned(), (1.30, 103.80));
        cache.insert("529538".to_owned(), (1.35, 103.85));

        save(&path, &cache).unwrap();
        assert_eq!(load(&path).unwrap(), cache);
    }

    #[test]
    fn corrupt_cache_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo_cache.json");
        fs::write(&path, "{not json").unwrap();

        match load(&path) {
            Err(PipelineError::CacheCorrupt { .. }) => {}
            other => panic!("expected CacheCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn merge_never_overwrites_existing_keys() {
        let mut existing = GeoCache::new();
        existing.insert("207224".to_owned(), (1.3, 103.8));

        let mut fresh = GeoCache::new();
        fresh.insert("207224".to_owned(), (9.9, 99.9));
        fresh.insert("529538".to_owned(), (1.35, 103.85));

        let merged = merge(&existing, &fresh);
        assert_eq!(merged["207224"], (1.3, 103.8));
        assert_eq!(merged["529538"], (1.35, 103.85));
    }
}
