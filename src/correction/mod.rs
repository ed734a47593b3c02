//! Threshold correction for probabilistic minimizer lookups.
//!
//! Each lookup against a Bloom-filter-family index can report a match for a
//! k-mer that is not actually present. For a window observed with `m`
//! minimizers, the number of such spurious matches follows
//! `Binomial(m, fpr)`, so a naive "require t matching minimizers" threshold
//! accepts windows that only pass by chance. This module precomputes, per
//! possible minimizer count, how many matches the search layer should
//! discount before applying its threshold:
//!
//! - [`calculator`]: derives the table from the binomial tail
//! - [`fingerprint`]: names cache artifacts after the parameter set
//! - [`cache`]: loads and stores tables next to the index
//!
//! [`precompute_correction`] ties the three together: a manual threshold
//! bypasses everything, a cached table is reused, and a freshly computed
//! table is persisted best-effort.
//!
//! ## Example
//!
//! ```rust
//! use minthresh::{precompute_correction, SearchParameters, Shape};
//!
//! let arguments = SearchParameters {
//!     pattern_size: 50,
//!     window_size: 23,
//!     shape: Shape::ungapped(19).unwrap(),
//!     fpr: 0.05,
//!     p_max: 0.01,
//!     index_file: "genomes.index".into(),
//!     threshold: None,
//!     cache_thresholds: false,
//! };
//!
//! let table = precompute_correction(&arguments).unwrap();
//! assert_eq!(table.len(), 23); // one entry per minimizer count, 6..=28
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::params::{ParameterError, SearchParameters};

pub mod cache;
pub mod calculator;
pub mod fingerprint;

use cache::{CacheError, ThresholdCache};

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Per-minimizer-count correction values.
///
/// Entry `i` is the number of spurious minimizer matches to tolerate for a
/// window observed with `minimal_minimizers + i` minimizers. An empty table
/// signals "no correction, apply the caller-supplied threshold directly".
///
/// Serialized as a length-prefixed sequence of fixed-width little-endian
/// unsigned integers; cache artifacts contain exactly one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionTable(Vec<u64>);

impl CorrectionTable {
    #[must_use]
    pub fn new(values: Vec<u64>) -> Self {
        Self(values)
    }

    /// The empty table: no correction is to be applied.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.0
    }

    /// Correction for an observed minimizer count, given the minimal count
    /// of the parameter set the table was built for.
    ///
    /// Returns `None` when `observed` lies outside the tabulated range.
    #[must_use]
    pub fn correction_for(&self, observed: u64, minimal: u64) -> Option<u64> {
        let index = usize::try_from(observed.checked_sub(minimal)?).ok()?;
        self.0.get(index).copied()
    }
}

/// Obtain the correction table for a parameter set.
///
/// When a manual threshold is set, returns the empty table without touching
/// the cache or validating the probabilistic contract: the caller's value
/// is used as-is. Otherwise a cached table is loaded if one exists, or the
/// table is computed and persisted (best-effort, and only when
/// `cache_thresholds` is set).
///
/// # Errors
///
/// Returns `CorrectionError::Parameters` when the parameter set violates
/// the correction contract, and `CorrectionError::Cache` when a present
/// cache artifact cannot be read or decoded.
pub fn precompute_correction(arguments: &SearchParameters) -> Result<CorrectionTable, CorrectionError> {
    if arguments.threshold.is_some() {
        return Ok(CorrectionTable::none());
    }

    arguments.validate()?;

    let cache = ThresholdCache::new(arguments.cache_dir());
    if let Some(table) = cache.try_load(arguments)? {
        debug!(
            "Reusing cached correction table {}",
            cache.artifact_path(arguments).display()
        );
        return Ok(table);
    }

    let table = calculator::compute(arguments);
    cache.store(arguments, &table);

    Ok(table)
}
