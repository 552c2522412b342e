//! Random dense tiles.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::dense_tile::DenseTile;
use crate::range::Range;
use crate::scalar::{Scalar, c64};

/// Element types that can be sampled uniformly from `[0, 1)`.
pub trait RandomUniform: Scalar {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;
}

impl RandomUniform for f64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }
}

impl RandomUniform for c64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }
}

/// Element types that can be sampled from a standard normal distribution.
pub trait RandomNormal: Scalar {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

impl RandomNormal for f64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardNormal)
    }
}

impl RandomNormal for c64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        // independent N(0, 1/2) parts so that E|z|^2 = 1
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        c64::new(
            rng.sample::<f64, _>(StandardNormal) * scale,
            rng.sample::<f64, _>(StandardNormal) * scale,
        )
    }
}

impl<T: RandomUniform> DenseTile<T> {
    /// Tile over `range` with uniform values in `[0, 1)`.
    pub fn random(range: Range) -> Self {
        Self::random_with_rng(range, &mut rand::rng())
    }

    /// Like [`random`](Self::random), drawing from `rng` for reproducible tiles.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use tiledarray::{DenseTile, Range};
    ///
    /// let range = Range::from_extents(&[2, 3]);
    /// let t1: DenseTile<f64> = DenseTile::random_with_rng(range.clone(), &mut StdRng::seed_from_u64(7));
    /// let t2: DenseTile<f64> = DenseTile::random_with_rng(range, &mut StdRng::seed_from_u64(7));
    /// assert_eq!(t1, t2);
    /// ```
    pub fn random_with_rng<R: Rng>(range: Range, rng: &mut R) -> Self {
        Self::from_fn(range, |_| T::sample_uniform(rng))
    }
}

impl<T: RandomNormal> DenseTile<T> {
    /// Tile over `range` with standard normal values.
    pub fn randn(range: Range) -> Self {
        Self::randn_with_rng(range, &mut rand::rng())
    }

    pub fn randn_with_rng<R: Rng>(range: Range, rng: &mut R) -> Self {
        Self::from_fn(range, |_| T::sample_normal(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_f64_in_unit_interval() {
        let t: DenseTile<f64> = DenseTile::random(Range::new(vec![3, 0], vec![5, 4]).unwrap());
        assert_eq!(t.len(), 8);
        assert!(t.data().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_random_c64_parts_in_unit_interval() {
        let t: DenseTile<c64> = DenseTile::random(Range::from_extents(&[4]));
        for v in t.data() {
            assert!((0.0..1.0).contains(&v.re));
            assert!((0.0..1.0).contains(&v.im));
        }
    }

    #[test]
    fn test_seeded_randn_is_reproducible() {
        let range = Range::from_extents(&[3, 3]);
        let a: DenseTile<f64> = DenseTile::randn_with_rng(range.clone(), &mut StdRng::seed_from_u64(1));
        let b: DenseTile<f64> = DenseTile::randn_with_rng(range.clone(), &mut StdRng::seed_from_u64(1));
        let c: DenseTile<f64> = DenseTile::randn_with_rng(range, &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_random_empty_range() {
        let t: DenseTile<f64> = DenseTile::random(Range::from_extents(&[0, 3]));
        assert!(t.data().is_empty());
    }
}
