//! Numeric derivation of correction tables.
//!
//! For a window observed with `m` minimizers, the number of spurious index
//! matches is `X ~ Binomial(m, fpr)`. For `fpr < 0.5` the mass `P(X = fp)`
//! is unimodal and strictly decreasing past its peak, so scanning `fp`
//! upward from 1 until the mass drops below `p_max` finds the boundary
//! between "still plausible under chance alone" and "implausible, hence a
//! real signal". The value recorded per `m` is the number of spurious
//! matches the search layer should discount before applying its threshold.

use tracing::debug;

use crate::core::params::SearchParameters;
use crate::correction::CorrectionTable;

/// Safely convert a count to f64 for probability calculations
///
/// This function explicitly handles the precision loss that occurs when
/// converting u64 to f64. Minimizer counts are well within the safe range
/// of f64 mantissa precision.
#[inline]
fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Incrementally grown table of Pascal rows.
///
/// Row `n` holds the binomial coefficients `C(n, 0..=n)`, built from row
/// `n - 1` by the additive recurrence so that coefficients for consecutive
/// orders are cheap to derive. Cells are f64: central coefficients exceed
/// u64 for `n >= 68`, while f64 addition stays exact up to 2^53 and only
/// rounds beyond that, and the downstream probability arithmetic is f64
/// regardless.
#[derive(Debug)]
pub struct BinomialRows {
    rows: Vec<Vec<f64>>,
}

impl BinomialRows {
    #[must_use]
    pub fn new() -> Self {
        Self { rows: vec![vec![1.0]] }
    }

    /// The coefficients `C(n, 0..=n)`, growing the table as needed.
    pub fn row(&mut self, n: usize) -> &[f64] {
        while self.rows.len() <= n {
            let previous = &self.rows[self.rows.len() - 1];
            let mut next = vec![1.0; previous.len() + 1];
            for i in 1..previous.len() {
                next[i] = previous[i - 1] + previous[i];
            }
            self.rows.push(next);
        }
        &self.rows[n]
    }
}

impl Default for BinomialRows {
    fn default() -> Self {
        Self::new()
    }
}

/// `P(X = false_positives)` for `X ~ Binomial(minimizers, fpr)`.
fn binomial_mass(coefficients: &[f64], minimizers: u64, false_positives: u64, fpr: f64) -> f64 {
    let index = usize::try_from(false_positives).unwrap_or(usize::MAX);
    coefficients[index]
        * fpr.powf(count_to_f64(false_positives))
        * (1.0 - fpr).powf(count_to_f64(minimizers - false_positives))
}

/// Number of spurious matches to tolerate for one minimizer count.
///
/// Scans upward from a single false positive; the largest count whose mass
/// is still at least `p_max`, minus one, is the correction. Clamps to 0
/// when even one false positive is already implausible, and never exceeds
/// `minimizers` (for `fpr` close to 1 the mass may stay above `p_max` all
/// the way up).
pub fn correction_for(rows: &mut BinomialRows, minimizers: u64, fpr: f64, p_max: f64) -> u64 {
    let coefficients = rows.row(usize::try_from(minimizers).unwrap_or(usize::MAX));
    let mut false_positives = 1u64;
    while false_positives <= minimizers
        && binomial_mass(coefficients, minimizers, false_positives, fpr) >= p_max
    {
        false_positives += 1;
    }
    false_positives - 1
}

/// Derive the correction table for a validated parameter set.
///
/// One entry per possible minimizer count, from
/// [`SearchParameters::minimal_minimizers`] to
/// [`SearchParameters::maximal_minimizers`] inclusive. Parameter-contract
/// violations are programming errors on this path, not recoverable
/// failures; callers validate first.
#[must_use]
pub fn compute(arguments: &SearchParameters) -> CorrectionTable {
    debug_assert!(arguments.validate().is_ok());

    let minimal = arguments.minimal_minimizers();
    let maximal = arguments.maximal_minimizers();

    let mut rows = BinomialRows::new();
    let mut values = Vec::with_capacity(usize::try_from(maximal - minimal + 1).unwrap_or(0));
    let mut clamped = 0usize;

    for minimizers in minimal..=maximal {
        let correction = correction_for(&mut rows, minimizers, arguments.fpr, arguments.p_max);
        if correction == 0 {
            clamped += 1;
        }
        values.push(correction);
    }

    if clamped > 0 {
        debug!(
            "{clamped} of {} minimizer counts were already implausible at a single false positive; their correction is clamped to 0",
            values.len()
        );
    }
    assert!(!values.is_empty(), "a valid parameter range yields at least one entry");

    CorrectionTable::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::Shape;
    use std::path::PathBuf;

    fn example() -> SearchParameters {
        SearchParameters {
            pattern_size: 50,
            window_size: 23,
            shape: Shape::ungapped(19).unwrap(),
            fpr: 0.05,
            p_max: 0.01,
            index_file: PathBuf::from("genomes.index"),
            threshold: None,
            cache_thresholds: false,
        }
    }

    #[test]
    fn test_pascal_rows() {
        let mut rows = BinomialRows::new();
        assert_eq!(rows.row(0), &[1.0]);
        assert_eq!(rows.row(5), &[1.0, 5.0, 10.0, 10.0, 5.0, 1.0]);
        assert_eq!(rows.row(2), &[1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_table_covers_every_minimizer_count() {
        let arguments = example();
        let table = compute(&arguments);
        assert_eq!(table.len(), 23); // counts 6..=28
    }

    #[test]
    fn test_example_boundary_values() {
        // By hand for fpr = 0.05, p_max = 0.01:
        //   m =  6: P(X=2) = 15 * 0.05^2 * 0.95^4  ~ 0.031, P(X=3) ~ 0.0021 -> 2
        //   m = 28: P(X=4) ~ 0.037, P(X=5) ~ 0.0094              -> 4
        let table = compute(&example());
        assert_eq!(table.values().first(), Some(&2));
        assert_eq!(table.values().last(), Some(&4));
    }

    #[test]
    fn test_corrections_grow_with_minimizer_count() {
        // More lookups admit more chance matches; for fixed fpr and p_max
        // the correction should never decrease as m grows
        let table = compute(&example());
        assert!(table.values().windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_single_count_hand_computed() {
        // m = 6, fpr = 0.05, p_max = 0.15:
        // P(X=1) = 6 * 0.05 * 0.95^5 ~ 0.232, P(X=2) ~ 0.031 -> 1
        let mut rows = BinomialRows::new();
        assert_eq!(correction_for(&mut rows, 6, 0.05, 0.15), 1);
    }

    #[test]
    fn test_zero_minimizers_is_well_defined() {
        let mut rows = BinomialRows::new();
        assert_eq!(correction_for(&mut rows, 0, 0.05, 0.01), 0);
    }

    #[test]
    fn test_tiny_fpr_clamps_to_zero() {
        // Even a single false positive is implausible; the boundary case
        // clamps to 0 instead of wrapping
        let mut rows = BinomialRows::new();
        assert_eq!(correction_for(&mut rows, 10, 1e-9, 0.5), 0);
    }

    #[test]
    fn test_high_fpr_is_bounded_by_minimizer_count() {
        // With fpr close to 1 the mass stays above p_max up to fp = m; the
        // scan must stop there instead of running past the row
        let mut rows = BinomialRows::new();
        assert_eq!(correction_for(&mut rows, 5, 0.99, 1e-30), 5);
    }

    #[test]
    fn test_left_tail_clamps_for_long_patterns() {
        // For large m the mass at a single false positive sits in the left
        // tail of the distribution and can already be below p_max; the scan
        // stops immediately and the correction clamps to 0
        let mut rows = BinomialRows::new();
        assert_eq!(correction_for(&mut rows, 200, 0.05, 0.01), 0);
    }

    #[test]
    fn test_large_rows_do_not_overflow() {
        // With a small enough p_max the scan runs well past fp = 30, where
        // C(200, fp) is far beyond u64; the f64 cells keep the result sane
        let mut rows = BinomialRows::new();
        let correction = correction_for(&mut rows, 200, 0.05, 1e-9);
        assert!(correction > 10 && correction < 200);
    }
}
