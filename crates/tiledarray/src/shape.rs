//! Sparsity shapes over a tiled range.
//!
//! A shape decides which tiles (or elements) exist by evaluating a
//! [`Predicate`] on their coordinates. The predicate never sees values, only
//! coordinates, and must give the same answer every time it is asked.

use std::collections::HashSet;
use std::sync::Arc;

use crate::coordinate::Coordinate;
use crate::error::TiledArrayError;
use crate::key::IndexKey;
use crate::tile_offsets::TileOffsets;
use crate::tiled_range::{ElementIter, TileIter, TiledRange};

/// Existence test on a coordinate.
///
/// Implementations must be pure functions of the coordinate; shapes are
/// enumerated concurrently and may cache the answer.
pub trait Predicate: Send + Sync {
    fn accepts(&self, coord: &[usize]) -> bool;
}

impl<P: Predicate + ?Sized> Predicate for &P {
    fn accepts(&self, coord: &[usize]) -> bool {
        (**self).accepts(coord)
    }
}

impl<P: Predicate + ?Sized> Predicate for Arc<P> {
    fn accepts(&self, coord: &[usize]) -> bool {
        (**self).accepts(coord)
    }
}

/// Accepts every coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensePredicate;

impl Predicate for DensePredicate {
    fn accepts(&self, _coord: &[usize]) -> bool {
        true
    }
}

/// Accepts coordinates whose components are non-increasing: `c[0] >= c[1] >= ...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowerTrianglePredicate;

impl Predicate for LowerTrianglePredicate {
    fn accepts(&self, coord: &[usize]) -> bool {
        coord.windows(2).all(|w| w[0] >= w[1])
    }
}

/// Accepts an explicit list of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparsePredicate {
    nonzero: HashSet<Coordinate>,
}

impl SparsePredicate {
    pub fn new<I, C>(coords: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coordinate>,
    {
        Self {
            nonzero: coords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nonzero.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nonzero.is_empty()
    }
}

impl Predicate for SparsePredicate {
    fn accepts(&self, coord: &[usize]) -> bool {
        self.nonzero.contains(&Coordinate::new(coord))
    }
}

/// Adapts a closure to [`Predicate`].
#[derive(Clone, Copy)]
pub struct FnPredicate<F>(pub F);

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&[usize]) -> bool + Send + Sync,
{
    fn accepts(&self, coord: &[usize]) -> bool {
        (self.0)(coord)
    }
}

impl<F> std::fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnPredicate")
    }
}

/// Filters an iteration domain down to the entries a predicate accepts.
///
/// Entries without a coordinate are skipped.
#[derive(Debug, Clone)]
pub struct ShapeIter<I, P> {
    base: I,
    predicate: P,
}

impl<I, P> ShapeIter<I, P>
where
    I: Iterator<Item = IndexKey>,
    P: Predicate,
{
    pub fn new(base: I, predicate: P) -> Self {
        Self { base, predicate }
    }
}

impl<I, P> Iterator for ShapeIter<I, P>
where
    I: Iterator<Item = IndexKey>,
    P: Predicate,
{
    type Item = IndexKey;

    fn next(&mut self) -> Option<IndexKey> {
        let predicate = &self.predicate;
        self.base.find(|key| {
            key.first_opt()
                .is_some_and(|c| predicate.accepts(c.as_slice()))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.base.size_hint().1)
    }
}

/// A tiled range paired with a sparsity predicate.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tiledarray::{LowerTrianglePredicate, Shape, TiledRange, TiledRange1};
///
/// let dim = TiledRange1::uniform(0, 3, 2).unwrap();
/// let trange = Arc::new(TiledRange::new(vec![dim.clone(), dim]));
///
/// let lower = Shape::new(trange.clone(), LowerTrianglePredicate);
/// assert_eq!(lower.nnz_tiles(), 6);
/// assert!(lower.is_nonzero(&[2, 1]).unwrap());
/// assert!(!lower.is_nonzero(&[1, 2]).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Shape<P> {
    trange: Arc<TiledRange>,
    predicate: P,
}

impl Shape<DensePredicate> {
    pub fn dense(trange: Arc<TiledRange>) -> Self {
        Self::new(trange, DensePredicate)
    }
}

impl<P: Predicate> Shape<P> {
    pub fn new(trange: Arc<TiledRange>, predicate: P) -> Self {
        Self { trange, predicate }
    }

    #[inline]
    pub fn trange(&self) -> &Arc<TiledRange> {
        &self.trange
    }

    #[inline]
    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Existing tiles, in tile ordinal order.
    pub fn tiles(&self) -> ShapeIter<TileIter, &P> {
        ShapeIter::new(self.trange.tiles(), &self.predicate)
    }

    /// Existing elements, tile by tile.
    ///
    /// The predicate is evaluated on element coordinates.
    pub fn elements(&self) -> ShapeIter<ElementIter<'_>, &P> {
        ShapeIter::new(self.trange.elements(), &self.predicate)
    }

    /// Whether tile `tile` exists.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::TileOutOfBounds`] outside the tile grid.
    pub fn is_nonzero(&self, tile: &[usize]) -> Result<bool, TiledArrayError> {
        self.trange.tile_ordinal(tile)?;
        Ok(self.predicate.accepts(tile))
    }

    /// Number of existing tiles.
    pub fn nnz_tiles(&self) -> usize {
        self.tiles().count()
    }

    /// Storage offsets of the existing tiles, packed in tile ordinal order.
    pub fn tile_offsets(&self) -> TileOffsets {
        TileOffsets::from_shape(self)
    }
}
