use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::shape::Shape;

#[derive(Error, Debug)]
pub enum ParameterError {
    #[error("The false positive rate must lie in (0, 1), got {0}")]
    FprOutOfRange(f64),

    #[error("p_max must lie in (0, 1), got {0}")]
    PMaxOutOfRange(f64),

    #[error("The window size ({window}) must be at least the shape span ({span})")]
    WindowSmallerThanShape { window: u64, span: u32 },

    #[error("The pattern size ({pattern}) must be at least the window size ({window})")]
    PatternSmallerThanWindow { pattern: u64, window: u64 },

    #[error("The window size ({0}) must differ from the shape span: every k-mer would be its own minimizer and no correction applies")]
    WindowEqualsShape(u64),
}

/// Search parameters a correction table is derived from.
///
/// Owned by the caller and passed by reference; the engine never mutates it.
/// The table itself depends only on `pattern_size`, `window_size`, the shape
/// encoding, `p_max`, and `fpr`; the remaining fields steer caching and the
/// manual-override bypass.
#[derive(Debug, Clone)]
pub struct SearchParameters {
    /// Length of the query patterns.
    pub pattern_size: u64,

    /// Length of the window minimizers are sampled from.
    pub window_size: u64,

    /// The k-mer shape used for hashing.
    pub shape: Shape,

    /// Per-lookup false positive rate of the underlying index.
    pub fpr: f64,

    /// Maximum tolerated probability that an accepted match is spurious.
    pub p_max: f64,

    /// The index the thresholds are computed for. Only its parent directory
    /// is touched, as the location for cached correction tables.
    pub index_file: PathBuf,

    /// Manual threshold override. When set, the engine returns an empty
    /// table and the search layer applies this value directly.
    pub threshold: Option<u64>,

    /// Whether computed tables are persisted next to the index.
    pub cache_thresholds: bool,
}

impl SearchParameters {
    /// Validate the probabilistic-thresholding contract.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: `fpr` and `p_max` in (0, 1),
    /// `pattern_size >= window_size >= span`, and `window_size != span`
    /// (with equal sizes every k-mer is a minimizer and the correction is
    /// meaningless).
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.fpr > 0.0 && self.fpr < 1.0) {
            return Err(ParameterError::FprOutOfRange(self.fpr));
        }
        if !(self.p_max > 0.0 && self.p_max < 1.0) {
            return Err(ParameterError::PMaxOutOfRange(self.p_max));
        }
        let span = u64::from(self.shape.span());
        if self.window_size < span {
            return Err(ParameterError::WindowSmallerThanShape {
                window: self.window_size,
                span: self.shape.span(),
            });
        }
        if self.pattern_size < self.window_size {
            return Err(ParameterError::PatternSmallerThanWindow {
                pattern: self.pattern_size,
                window: self.window_size,
            });
        }
        if self.window_size == span {
            return Err(ParameterError::WindowEqualsShape(self.window_size));
        }
        Ok(())
    }

    /// Number of k-mers in one window.
    #[must_use]
    pub fn kmers_per_window(&self) -> u64 {
        self.window_size - u64::from(self.shape.span()) + 1
    }

    /// Number of k-mers in one pattern.
    #[must_use]
    pub fn kmers_per_pattern(&self) -> u64 {
        self.pattern_size - u64::from(self.shape.span()) + 1
    }

    /// Fewest minimizers a pattern can produce.
    #[must_use]
    pub fn minimal_minimizers(&self) -> u64 {
        self.kmers_per_pattern() / self.kmers_per_window()
    }

    /// Most minimizers a pattern can produce: one per window position.
    #[must_use]
    pub fn maximal_minimizers(&self) -> u64 {
        self.pattern_size - self.window_size + 1
    }

    /// Directory cached correction tables live in.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        self.index_file.parent().unwrap_or_else(|| Path::new("."))
    }
}
