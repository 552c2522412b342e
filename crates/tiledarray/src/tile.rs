//! The operation set a tile payload must provide to take part in contraction.

use crate::contraction::ContractionSpec;
use crate::dense_tile::DenseTile;
use crate::error::TiledArrayError;
use crate::permutation::Permute;
use crate::range::Range;
use crate::scalar::Scalar;

/// A tile payload.
///
/// Tiles are plain values: `Clone` is a deep copy and every operation returns
/// a new tile.
pub trait Tile: Permute + Clone + Send + Sync {
    type Element: Scalar;

    /// Element box covered by the tile.
    fn range(&self) -> &Range;

    /// Deep copy.
    fn clone_tile(&self) -> Self {
        self.clone()
    }

    /// True if the tile holds no nonzero element.
    fn is_empty(&self) -> bool;

    /// Contract with a dense tile: `factor * self * right` per `spec`.
    ///
    /// `self` plays the left operand. The result is laid out in the order of
    /// `spec.result()`.
    fn gemm(
        &self,
        right: &DenseTile<Self::Element>,
        factor: Self::Element,
        spec: &ContractionSpec,
    ) -> Result<DenseTile<Self::Element>, TiledArrayError>;
}
