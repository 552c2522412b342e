//! Error types for tiledarray.

use thiserror::Error;

/// Errors raised by the index, permutation and sparsity algebra.
///
/// Every variant is reported synchronously at the boundary of the component
/// that detected it; no operation retries or coerces its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiledArrayError {
    /// Sequence is not a bijection on `0..n`.
    #[error("invalid permutation {perm:?}: entries must be a permutation of 0..{}", perm.len())]
    InvalidPermutation { perm: Vec<usize> },

    /// A permutation (or other n-slot operator) was applied to a container of a different length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Positional index out of range.
    #[error("index out of bounds: index {index} is out of range for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Composite key identity accessed while unset.
    #[error("{identity} key is not set")]
    KeyNotSet { identity: &'static str },

    /// Range bounds with `lower > upper` in some dimension, or of different rank.
    #[error("invalid range bounds: lower {lower:?}, upper {upper:?}")]
    InvalidBounds { lower: Vec<usize>, upper: Vec<usize> },

    /// Tile boundaries that are not strictly increasing.
    #[error("tile boundaries must be strictly increasing, got {boundaries:?}")]
    InvalidBoundaries { boundaries: Vec<usize> },

    /// Element coordinate outside a range.
    #[error("coordinate {coord:?} is outside range [{lower:?}, {upper:?})")]
    CoordinateOutOfBounds {
        coord: Vec<usize>,
        lower: Vec<usize>,
        upper: Vec<usize>,
    },

    /// Tile coordinate outside the tile grid.
    #[error("tile {tile:?} is outside the tile grid {grid:?}")]
    TileOutOfBounds { tile: Vec<usize>, grid: Vec<usize> },

    /// Empty token in a variable list.
    #[error("empty label at position {index}")]
    EmptyLabel { index: usize },

    /// Label with characters other than `[A-Za-z0-9]`.
    #[error("invalid label {label:?}: labels may only contain ASCII letters and digits")]
    InvalidLabel { label: String },

    /// Label that appears twice in one variable list.
    #[error("duplicate label {label:?}")]
    DuplicateLabel { label: String },

    /// Two variable lists that do not hold the same set of labels.
    #[error("label sets differ: {left} vs {right}")]
    LabelMismatch { left: String, right: String },

    /// Data length does not match a range volume.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Operation requires a specific rank.
    #[error("expected rank {expected}, got rank {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// A summed label spans different element bounds in the two operands.
    #[error("summed label {label:?} spans {left:?} on the left but {right:?} on the right")]
    ContractedBoundsMismatch {
        label: String,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Contraction pattern that the tile type does not support.
    #[error("unsupported contraction: {reason}")]
    UnsupportedContraction { reason: String },

    /// Permutation that the tile type cannot represent.
    #[error("unsupported permutation {perm:?} for this tile type")]
    UnsupportedPermutation { perm: Vec<usize> },
}
