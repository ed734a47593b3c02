use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::params::SearchParameters;
use crate::correction::fingerprint::{correction_filename, is_correction_filename};
use crate::correction::CorrectionTable;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read correction table: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to decode correction table: {0}")]
    DecodeError(#[from] bincode::Error),
}

/// Disk cache of correction tables, one artifact per parameter fingerprint.
///
/// All reads and writes stay within a single directory, by convention the
/// parent directory of the index file. Entries are never updated in place
/// (a changed parameter set produces a different fingerprint), and the engine
/// never deletes them. Concurrent invocations on the same parameter set are
/// not coordinated: entries are pure functions of their key, so a lost or
/// repeated write costs only recomputation.
#[derive(Debug)]
pub struct ThresholdCache {
    dir: PathBuf,
}

impl ThresholdCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the artifact for a parameter set lives.
    #[must_use]
    pub fn artifact_path(&self, arguments: &SearchParameters) -> PathBuf {
        self.dir.join(correction_filename(arguments))
    }

    /// Load the cached table for a parameter set, if one exists.
    ///
    /// A missing artifact is a cache miss, not an error.
    ///
    /// # Errors
    ///
    /// Returns a `CacheError` when an artifact is present but cannot be
    /// read or decoded; a corrupt entry is fatal for the request rather
    /// than silently recomputed.
    pub fn try_load(&self, arguments: &SearchParameters) -> Result<Option<CorrectionTable>, CacheError> {
        let path = self.artifact_path(arguments);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let table: CorrectionTable = bincode::deserialize(&bytes)?;
        Ok(Some(table))
    }

    /// Persist a table under the fingerprint of its parameter set,
    /// overwriting any existing artifact.
    ///
    /// Skipped entirely when `cache_thresholds` is not set. A failed write
    /// only loses the caching side effect: it is logged, and the in-memory
    /// table remains valid for the caller.
    pub fn store(&self, arguments: &SearchParameters, table: &CorrectionTable) {
        if !arguments.cache_thresholds {
            return;
        }
        let path = self.artifact_path(arguments);
        let result = bincode::serialize(table)
            .map_err(CacheError::from)
            .and_then(|bytes| fs::write(&path, bytes).map_err(CacheError::from));
        match result {
            Ok(()) => debug!("Cached correction table at {}", path.display()),
            Err(error) => warn!("Could not cache correction table at {}: {error}", path.display()),
        }
    }

    /// Correction artifacts currently present in the cache directory,
    /// sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns a `CacheError` if the directory cannot be listed.
    pub fn entries(&self) -> Result<Vec<PathBuf>, CacheError> {
        let mut artifacts = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if path.is_file() && is_correction_filename(name) {
                artifacts.push(path);
            }
        }
        artifacts.sort();
        Ok(artifacts)
    }

    /// The directory this cache operates in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::Shape;

    fn arguments_in(dir: &Path) -> SearchParameters {
        SearchParameters {
            pattern_size: 50,
            window_size: 23,
            shape: Shape::ungapped(19).unwrap(),
            fpr: 0.05,
            p_max: 0.01,
            index_file: dir.join("genomes.index"),
            threshold: None,
            cache_thresholds: true,
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let arguments = arguments_in(dir.path());
        let table = CorrectionTable::new(vec![2, 2, 3, 3, 4]);

        cache.store(&arguments, &table);
        let loaded = cache.try_load(&arguments).unwrap();
        assert_eq!(loaded, Some(table));
    }

    #[test]
    fn test_missing_artifact_is_a_miss_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        assert_eq!(cache.try_load(&arguments_in(dir.path())).unwrap(), None);
    }

    #[test]
    fn test_corrupt_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let arguments = arguments_in(dir.path());

        fs::write(cache.artifact_path(&arguments), b"xyz").unwrap();
        assert!(matches!(
            cache.try_load(&arguments),
            Err(CacheError::DecodeError(_))
        ));
    }

    #[test]
    fn test_store_respects_cache_flag() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let mut arguments = arguments_in(dir.path());
        arguments.cache_thresholds = false;

        cache.store(&arguments, &CorrectionTable::new(vec![1]));
        assert!(!cache.artifact_path(&arguments).exists());
    }

    #[test]
    fn test_store_overwrites_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let arguments = arguments_in(dir.path());

        cache.store(&arguments, &CorrectionTable::new(vec![1, 1, 1]));
        cache.store(&arguments, &CorrectionTable::new(vec![2, 2]));
        let loaded = cache.try_load(&arguments).unwrap().unwrap();
        assert_eq!(loaded.values(), &[2, 2]);
    }

    #[test]
    fn test_entries_lists_only_correction_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let arguments = arguments_in(dir.path());

        cache.store(&arguments, &CorrectionTable::new(vec![1]));
        fs::write(dir.path().join("genomes.index"), b"index").unwrap();
        fs::write(dir.path().join("notes.txt"), b"notes").unwrap();

        let entries = cache.entries().unwrap();
        assert_eq!(entries, vec![cache.artifact_path(&arguments)]);
    }

    #[test]
    fn test_wire_format_is_fixed_width_little_endian() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let arguments = arguments_in(dir.path());

        cache.store(&arguments, &CorrectionTable::new(vec![2, 3]));
        let bytes = fs::read(cache.artifact_path(&arguments)).unwrap();
        let mut expected = 2u64.to_le_bytes().to_vec(); // table size
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&3u64.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_distinct_parameters_use_distinct_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThresholdCache::new(dir.path());
        let first = arguments_in(dir.path());
        let mut second = arguments_in(dir.path());
        second.pattern_size = 100;

        cache.store(&first, &CorrectionTable::new(vec![1]));
        cache.store(&second, &CorrectionTable::new(vec![2]));
        assert_eq!(cache.entries().unwrap().len(), 2);
        assert_eq!(cache.try_load(&first).unwrap().unwrap().values(), &[1]);
        assert_eq!(cache.try_load(&second).unwrap().unwrap().values(), &[2]);
    }
}
