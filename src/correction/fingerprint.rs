//! Cache key derivation for correction artifacts.
//!
//! The table a parameter set produces depends on exactly five quantities:
//! pattern size, window size, the shape encoding, `p_max`, and `fpr`. The
//! artifact file name encodes each of them in its own field, so parameter
//! sets that would need different tables always map to different files.

use crate::core::params::SearchParameters;

/// Literal prefix of every correction artifact file name.
pub const FILENAME_PREFIX: &str = "correction_";

/// Literal suffix of every correction artifact file name.
pub const FILENAME_SUFFIX: &str = ".bin";

/// Artifact file name for a parameter set.
///
/// Integer fields are rendered in hexadecimal to keep names short; the two
/// probabilities use [`encode_probability`], so every field is unambiguous
/// on its own and the composite name needs no further surgery.
///
/// ```
/// use minthresh::correction::fingerprint::correction_filename;
/// use minthresh::{SearchParameters, Shape};
///
/// let arguments = SearchParameters {
///     pattern_size: 50,
///     window_size: 23,
///     shape: Shape::ungapped(19).unwrap(),
///     fpr: 0.05,
///     p_max: 0.01,
///     index_file: "genomes.index".into(),
///     threshold: None,
///     cache_thresholds: false,
/// };
/// assert_eq!(correction_filename(&arguments), "correction_32_17_7ffff_0p01_0p05.bin");
/// ```
#[must_use]
pub fn correction_filename(arguments: &SearchParameters) -> String {
    format!(
        "{FILENAME_PREFIX}{:x}_{:x}_{:x}_{}_{}{FILENAME_SUFFIX}",
        arguments.pattern_size,
        arguments.window_size,
        arguments.shape.encoding(),
        encode_probability(arguments.p_max),
        encode_probability(arguments.fpr),
    )
}

/// Render a probability for use inside a file name.
///
/// Starts from the shortest decimal rendering that round-trips to the same
/// f64 and maps `.` to `p` character-wise. The mapping is injective, so
/// distinct values never collide, and the result contains no separator that
/// could bleed into neighboring fields.
#[must_use]
pub fn encode_probability(value: f64) -> String {
    format!("{value}").replace('.', "p")
}

/// Whether a file name follows the correction-artifact convention.
#[must_use]
pub fn is_correction_filename(name: &str) -> bool {
    name.starts_with(FILENAME_PREFIX) && name.ends_with(FILENAME_SUFFIX)
}
