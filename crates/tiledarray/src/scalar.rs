//! Scalar trait for tile element types.

use faer_traits::ComplexField;
use std::fmt::Debug;
use std::ops::{Add, Mul};

pub use faer::c64;

/// Trait for element types that can live in a dense tile.
///
/// Wraps faer's `ComplexField` so dense contractions can go straight to
/// faer's GEMM, plus the std arithmetic used by the structural kernels.
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Mul<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;
}

impl Scalar for f64 {
    fn one() -> Self {
        1.0
    }
}

impl Scalar for c64 {
    fn one() -> Self {
        c64::new(1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_is_real() {
        assert!(<f64 as ComplexField>::IS_REAL);
    }

    #[test]
    fn test_c64_is_not_real() {
        assert!(!<c64 as ComplexField>::IS_REAL);
    }

    #[test]
    fn test_zero_one() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(f64::one(), 1.0);
        assert_eq!(c64::zero(), c64::new(0.0, 0.0));
        assert_eq!(c64::one(), c64::new(1.0, 0.0));
    }

    #[test]
    fn test_c64_arithmetic() {
        let a = c64::new(1.0, 2.0);
        let b = c64::new(0.0, 1.0);
        assert_eq!(a * b, c64::new(-2.0, 1.0));
        assert_eq!(a + b, c64::new(1.0, 3.0));
    }
}
