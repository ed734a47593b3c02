use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of positions a shape may span.
///
/// Bounded so that a k-mer always fits a 64-bit hash value with two bits
/// per nucleotide.
pub const MAX_SPAN: u32 = 32;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Shape may only contain '0' and '1': {0}")]
    InvalidCharacter(String),

    #[error("Shape must span between 1 and {MAX_SPAN} positions, got {0}")]
    InvalidSpan(usize),

    #[error("Shape must begin and end with '1': {0}")]
    Unanchored(String),
}

/// A k-mer shape: which positions within a window of `span` consecutive
/// bases contribute to the hashed k-mer.
///
/// Shapes are written as `01`-patterns, e.g. `11011` spans 5 positions and
/// selects 4 of them. An all-`1` shape is an ordinary (ungapped) k-mer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    bits: u64,
    span: u32,
}

impl Shape {
    /// Parse a shape from its `01`-pattern representation.
    ///
    /// # Errors
    ///
    /// Returns a `ShapeError` if the pattern contains characters other than
    /// `0`/`1`, spans 0 or more than [`MAX_SPAN`] positions, or does not
    /// begin and end with `1`.
    pub fn parse(pattern: &str) -> Result<Self, ShapeError> {
        if pattern.is_empty() || pattern.len() > MAX_SPAN as usize {
            return Err(ShapeError::InvalidSpan(pattern.len()));
        }
        if !pattern.chars().all(|c| c == '0' || c == '1') {
            return Err(ShapeError::InvalidCharacter(pattern.to_string()));
        }
        if !pattern.starts_with('1') || !pattern.ends_with('1') {
            return Err(ShapeError::Unanchored(pattern.to_string()));
        }

        // Only 0/1 digits remain, so base-2 parsing cannot fail
        let bits = u64::from_str_radix(pattern, 2).map_err(|_| ShapeError::InvalidCharacter(pattern.to_string()))?;

        #[allow(clippy::cast_possible_truncation)] // length bounded by MAX_SPAN above
        let span = pattern.len() as u32;

        Ok(Self { bits, span })
    }

    /// An ungapped k-mer of size `k`: all positions selected.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::InvalidSpan` if `k` is 0 or exceeds [`MAX_SPAN`].
    pub fn ungapped(k: u32) -> Result<Self, ShapeError> {
        if k == 0 || k > MAX_SPAN {
            return Err(ShapeError::InvalidSpan(k as usize));
        }
        Ok(Self {
            bits: (1u64 << k) - 1,
            span: k,
        })
    }

    /// Total number of positions the shape covers.
    #[must_use]
    pub fn span(&self) -> u32 {
        self.span
    }

    /// Number of positions the shape selects (count of `1`s).
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Integer encoding of the pattern, `1`s as set bits.
    ///
    /// Used to key cache artifacts; two shapes with equal encodings and
    /// spans select the same positions.
    #[must_use]
    pub fn encoding(&self) -> u64 {
        self.bits
    }

    /// Whether every position is selected (a plain k-mer).
    #[must_use]
    pub fn is_ungapped(&self) -> bool {
        self.weight() == self.span
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.span as usize)
    }
}

impl FromStr for Shape {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gapped_shape() {
        let shape = Shape::parse("11011").unwrap();
        assert_eq!(shape.span(), 5);
        assert_eq!(shape.weight(), 4);
        assert_eq!(shape.encoding(), 0b11011);
        assert!(!shape.is_ungapped());
    }

    #[test]
    fn test_ungapped_shape() {
        let shape = Shape::ungapped(19).unwrap();
        assert_eq!(shape.span(), 19);
        assert_eq!(shape.weight(), 19);
        assert_eq!(shape.encoding(), 0x7ffff);
        assert!(shape.is_ungapped());
    }

    #[test]
    fn test_parse_rejects_invalid_patterns() {
        assert!(Shape::parse("").is_err());
        assert!(Shape::parse("102").is_err());
        assert!(Shape::parse("0101").is_err()); // leading zero
        assert!(Shape::parse("110").is_err()); // trailing zero
        assert!(Shape::parse(&"1".repeat(33)).is_err());
    }

    #[test]
    fn test_ungapped_rejects_invalid_sizes() {
        assert!(Shape::ungapped(0).is_err());
        assert!(Shape::ungapped(33).is_err());
        assert!(Shape::ungapped(32).is_ok());
    }

    #[test]
    fn test_display_round_trip() {
        for pattern in ["1", "11011", "101", &"1".repeat(32)] {
            let shape = Shape::parse(pattern).unwrap();
            assert_eq!(shape.to_string(), *pattern);
            assert_eq!(shape.to_string().parse::<Shape>().unwrap(), shape);
        }
    }

    #[test]
    fn test_from_str() {
        let shape: Shape = "11011".parse().unwrap();
        assert_eq!(shape.encoding(), 27);
    }
}
