//! # minthresh
//!
//! A library for correcting minimizer thresholds when searching probabilistic
//! k-mer indexes.
//!
//! Approximate membership search keeps a genomic index in a Bloom-filter
//! family structure keyed by minimizers. Every lookup carries a false
//! positive rate, so a window observed with `m` minimizers accumulates
//! spurious matches distributed as `Binomial(m, fpr)`, and a fixed "require
//! t matches" threshold quietly admits windows that only pass by chance.
//!
//! `minthresh` solves this by precomputing, for every possible minimizer
//! count of a parameter set, the largest number of false positives that is
//! still statistically plausible. The search layer subtracts that correction
//! before comparing against its threshold.
//!
//! ## Features
//!
//! - **Binomial-tail correction**: derived from first principles per
//!   minimizer count, with incrementally built Pascal rows
//! - **Deterministic disk cache**: tables are persisted next to the index
//!   under a fingerprint of the parameters and reused on identical requests
//! - **Manual override**: a caller-supplied threshold bypasses the
//!   correction (and all cache I/O) entirely
//! - **Gapped shapes**: k-mer masks given as `01`-patterns, not just plain
//!   k-mer sizes
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
//!
//! // One correction per possible minimizer count
//! assert_eq!(table.len(), 23);
//! let observed = 10;
//! let discount = table.correction_for(observed, arguments.minimal_minimizers());
//! assert!(discount.is_some());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Shapes and validated search parameters
//! - [`correction`]: The correction engine: calculator, fingerprint, cache
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod correction;

// Re-export commonly used types for convenience
pub use crate::core::params::{ParameterError, SearchParameters};
pub use crate::core::shape::{Shape, ShapeError};
pub use crate::correction::cache::{CacheError, ThresholdCache};
pub use crate::correction::{precompute_correction, CorrectionError, CorrectionTable};
