//! Generalized Kronecker delta tile.
//!
//! A product of `N` ordinary deltas over adjacent mode pairs:
//!
//! ```text
//! delta(b0, k0, b1, k1, ...) = [b0 == k0] * [b1 == k1] * ...
//! ```
//!
//! The tile stores nothing but its range; the diagonal is implied by the
//! global element coordinates. It is an in-memory structural tile and has no
//! serialized form.

use std::marker::PhantomData;

use crate::contraction::ContractionSpec;
use crate::dense_tile::DenseTile;
use crate::error::TiledArrayError;
use crate::permutation::{Permutation, Permute};
use crate::range::Range;
use crate::scalar::Scalar;
use crate::tile::Tile;

/// Delta tile over a range of even rank.
#[derive(Debug, Clone, PartialEq)]
pub struct KroneckerDeltaTile<T> {
    range: Range,
    empty: bool,
    _element: PhantomData<T>,
}

impl<T: Scalar> KroneckerDeltaTile<T> {
    /// Create a delta tile over `range`, whose modes pair up as `(0, 1), (2, 3), ...`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::RankMismatch`] unless the rank is even and nonzero.
    pub fn new(range: Range) -> Result<Self, TiledArrayError> {
        let rank = range.rank();
        if rank == 0 || rank % 2 != 0 {
            return Err(TiledArrayError::RankMismatch {
                expected: rank.max(1).next_multiple_of(2),
                actual: rank,
            });
        }
        let empty = !pair_intervals(&range).all(|(lo, up)| lo < up);
        Ok(Self {
            range,
            empty,
            _element: PhantomData,
        })
    }

    /// Number of delta factors.
    #[inline]
    pub fn npairs(&self) -> usize {
        self.range.rank() / 2
    }

    /// Value at global coordinate `coord`: one on the diagonal, zero elsewhere.
    pub fn get(&self, coord: &[usize]) -> Result<T, TiledArrayError> {
        self.range.ordinal(coord)?;
        let on_diagonal = coord.chunks_exact(2).all(|pair| pair[0] == pair[1]);
        Ok(if on_diagonal { T::one() } else { T::zero() })
    }

    /// Materialize as a dense tile.
    pub fn to_dense(&self) -> DenseTile<T> {
        DenseTile::from_fn(self.range.clone(), |c| {
            if c.chunks_exact(2).all(|pair| pair[0] == pair[1]) {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Global diagonal indices `g` with `(g, g)` inside each pair's box.
    fn diagonal(&self) -> Vec<std::ops::Range<usize>> {
        pair_intervals(&self.range).map(|(lo, up)| lo..up.max(lo)).collect()
    }
}

/// Overlap `[max(lo), min(up))` of the two intervals of each mode pair.
fn pair_intervals(range: &Range) -> impl Iterator<Item = (usize, usize)> + '_ {
    let lower = range.lower().chunks_exact(2);
    let upper = range.upper().chunks_exact(2);
    lower
        .zip(upper)
        .map(|(lo, up)| (lo[0].max(lo[1]), up[0].min(up[1])))
}

/// Succeeds only if the permutation moves whole mode pairs onto mode pairs.
impl<T: Scalar> Permute for KroneckerDeltaTile<T> {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        if perm.dim() != self.range.rank() {
            return Err(TiledArrayError::DimensionMismatch {
                expected: self.range.rank(),
                actual: perm.dim(),
            });
        }
        let keeps_pairs = perm
            .as_slice()
            .chunks_exact(2)
            .all(|pair| pair[0] / 2 == pair[1] / 2);
        if !keeps_pairs {
            return Err(TiledArrayError::UnsupportedPermutation {
                perm: perm.as_slice().to_vec(),
            });
        }
        Ok(Self {
            range: self.range.permute(perm)?,
            empty: self.empty,
            _element: PhantomData,
        })
    }
}

impl<T: Scalar> Tile for KroneckerDeltaTile<T> {
    type Element = T;

    fn range(&self) -> &Range {
        &self.range
    }

    fn is_empty(&self) -> bool {
        self.empty
    }

    /// Outer product only: writes `factor * right` at every diagonal position.
    ///
    /// # Panics
    ///
    /// Panics for more than two delta factors, before any other check; that
    /// case is not implemented and must not produce a result or an error.
    fn gemm(
        &self,
        right: &DenseTile<T>,
        factor: T,
        spec: &ContractionSpec,
    ) -> Result<DenseTile<T>, TiledArrayError> {
        let npairs = self.npairs();
        if npairs > 2 {
            unimplemented!("delta tile contraction with {npairs} delta factors");
        }
        if !spec.is_outer_product() {
            return Err(TiledArrayError::UnsupportedContraction {
                reason: format!(
                    "delta tile only supports outer products, got {} summed modes",
                    spec.contracted_pairs().len()
                ),
            });
        }
        let result_range = spec.make_result_range(&self.range, right.range())?;
        let mut result = DenseTile::zeros(result_range);

        if !self.empty {
            // left modes come first in GEMM order, in left order
            let left_order = spec.kept_left();
            let right_order = spec.kept_right();
            let right_coords: Vec<_> = right.range().iter().collect();
            let mut coord = vec![0; left_order.len() + right_order.len()];

            for diag in diagonal_points(&self.diagonal()) {
                for (pos, &mode) in left_order.iter().enumerate() {
                    coord[pos] = diag[mode / 2];
                }
                for (value, rc) in right.data().iter().zip(&right_coords) {
                    for (pos, &mode) in right_order.iter().enumerate() {
                        coord[left_order.len() + pos] = rc[mode];
                    }
                    result.set(&coord, factor * *value)?;
                }
            }
        }

        result.permute(spec.perm_result())
    }
}

/// All combinations of one diagonal index per pair, for up to two pairs.
fn diagonal_points(diag: &[std::ops::Range<usize>]) -> Vec<Vec<usize>> {
    match diag {
        [d0] => d0.clone().map(|g0| vec![g0]).collect(),
        [d0, d1] => d0
            .clone()
            .flat_map(|g0| d1.clone().map(move |g1| vec![g0, g1]))
            .collect(),
        _ => unreachable!("delta factor count checked by the caller"),
    }
}
