//! Tiling of an n-dimensional index space.
//!
//! A [`TiledRange1`] splits one dimension into consecutive tiles; a
//! [`TiledRange`] is the cartesian product of those, addressed either at tile
//! granularity (the tile grid) or element granularity (the element box).
//!
//! ```text
//! boundaries [0, 2, 5, 6]  ->  tiles [0,2) [2,5) [5,6)
//! ```

use std::fmt;

use crate::coordinate::Coordinate;
use crate::error::TiledArrayError;
use crate::key::IndexKey;
use crate::permutation::{Permutation, Permute};
use crate::range::{Range, RangeIter};
use crate::strides::Order;

/// Tile structure of a single dimension.
///
/// # Example
/// ```
/// use tiledarray::TiledRange1;
///
/// let dim = TiledRange1::from_extents(0, &[2, 3, 4]).unwrap();
/// assert_eq!(dim.ntiles(), 3);
/// assert_eq!(dim.extent(), 9);
/// assert_eq!(dim.tile_bounds(1).unwrap(), (2, 5));
/// assert_eq!(dim.find_tile(4).unwrap(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TiledRange1 {
    /// `boundaries[i]..boundaries[i + 1]` is tile `i`.
    boundaries: Vec<usize>,
}

impl TiledRange1 {
    /// Create from explicit boundary points.
    ///
    /// A single boundary describes a dimension with zero tiles.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::InvalidBoundaries`] if `boundaries` is empty
    /// or not strictly increasing.
    pub fn from_boundaries(boundaries: Vec<usize>) -> Result<Self, TiledArrayError> {
        if boundaries.is_empty() || boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TiledArrayError::InvalidBoundaries { boundaries });
        }
        Ok(Self { boundaries })
    }

    /// Create from tile extents laid out consecutively from `start`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::InvalidBoundaries`] if any extent is zero or
    /// the last boundary overflows `usize`.
    pub fn from_extents(start: usize, extents: &[usize]) -> Result<Self, TiledArrayError> {
        let mut boundaries = Vec::with_capacity(extents.len() + 1);
        boundaries.push(start);
        let mut end = start;
        for &e in extents {
            end = end
                .checked_add(e)
                .ok_or_else(|| TiledArrayError::InvalidBoundaries {
                    boundaries: boundaries.clone(),
                })?;
            boundaries.push(end);
        }
        Self::from_boundaries(boundaries)
    }

    /// `ntiles` tiles of `tile_extent` elements each, starting at `start`.
    pub fn uniform(
        start: usize,
        ntiles: usize,
        tile_extent: usize,
    ) -> Result<Self, TiledArrayError> {
        Self::from_extents(start, &vec![tile_extent; ntiles])
    }

    #[inline]
    pub fn ntiles(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// First element of the dimension.
    #[inline]
    pub fn lower(&self) -> usize {
        self.boundaries[0]
    }

    /// One past the last element of the dimension.
    #[inline]
    pub fn upper(&self) -> usize {
        self.boundaries[self.boundaries.len() - 1]
    }

    #[inline]
    pub fn extent(&self) -> usize {
        self.upper() - self.lower()
    }

    #[inline]
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Element bounds `[lo, hi)` of tile `i`.
    pub fn tile_bounds(&self, i: usize) -> Result<(usize, usize), TiledArrayError> {
        if i >= self.ntiles() {
            return Err(TiledArrayError::IndexOutOfBounds {
                index: i,
                len: self.ntiles(),
            });
        }
        Ok((self.boundaries[i], self.boundaries[i + 1]))
    }

    /// Tile containing element `element`.
    pub fn find_tile(&self, element: usize) -> Result<usize, TiledArrayError> {
        if element < self.lower() || element >= self.upper() {
            return Err(TiledArrayError::CoordinateOutOfBounds {
                coord: vec![element],
                lower: vec![self.lower()],
                upper: vec![self.upper()],
            });
        }
        // first boundary strictly greater than `element` closes its tile
        Ok(self.boundaries[1..].partition_point(|&b| b <= element))
    }
}

impl fmt::Display for TiledRange1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, b) in self.boundaries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{b}")?;
        }
        write!(f, ")")
    }
}

/// Tiling of an n-dimensional box.
///
/// Immutable after construction; share it across threads as `Arc<TiledRange>`.
///
/// # Example
/// ```
/// use tiledarray::{TiledRange, TiledRange1};
///
/// let dim = TiledRange1::from_boundaries(vec![0, 2, 4, 6]).unwrap();
/// let trange = TiledRange::new(vec![dim.clone(), dim.clone(), dim]);
///
/// assert_eq!(trange.tiles().count(), 27);
/// assert_eq!(trange.elements().count(), 216);
/// assert_eq!(trange.tile_of(&[5, 0, 3]).unwrap().as_slice(), &[2, 0, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TiledRange {
    dims: Vec<TiledRange1>,
    tiles: Range,
    elements: Range,
}

impl TiledRange {
    /// Row-major tiling.
    pub fn new(dims: Vec<TiledRange1>) -> Self {
        Self::with_order(dims, Order::default())
    }

    /// Tiling whose tile and element ordinals follow `order`.
    pub fn with_order(dims: Vec<TiledRange1>, order: Order) -> Self {
        let grid: Vec<usize> = dims.iter().map(TiledRange1::ntiles).collect();
        let tiles = Range::from_extents_with_order(&grid, order);
        let lower: Vec<usize> = dims.iter().map(TiledRange1::lower).collect();
        let upper: Vec<usize> = dims.iter().map(TiledRange1::upper).collect();
        let elements = Range::with_order(lower, upper, order)
            .expect("tile boundaries are increasing, so lower <= upper");
        Self {
            dims,
            tiles,
            elements,
        }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dims(&self) -> &[TiledRange1] {
        &self.dims
    }

    #[inline]
    pub fn dim(&self, i: usize) -> Option<&TiledRange1> {
        self.dims.get(i)
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.tiles.order()
    }

    /// The tile grid: one coordinate per tile.
    #[inline]
    pub fn tiles_range(&self) -> &Range {
        &self.tiles
    }

    /// The overall element box.
    #[inline]
    pub fn elements_range(&self) -> &Range {
        &self.elements
    }

    /// Tile containing element coordinate `element`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::DimensionMismatch`] on a rank mismatch and
    /// [`TiledArrayError::CoordinateOutOfBounds`] outside the element box.
    pub fn tile_of(&self, element: &[usize]) -> Result<Coordinate, TiledArrayError> {
        self.check_rank(element.len())?;
        if !self.elements.contains(element) {
            return Err(self.elements.out_of_bounds(element));
        }
        let tile = self
            .dims
            .iter()
            .zip(element)
            .map(|(dim, &e)| dim.find_tile(e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Coordinate::from(tile))
    }

    /// Element box of tile `tile`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::DimensionMismatch`] on a rank mismatch and
    /// [`TiledArrayError::TileOutOfBounds`] outside the tile grid.
    pub fn element_box_of(&self, tile: &[usize]) -> Result<Range, TiledArrayError> {
        self.check_tile(tile)?;
        let (lower, upper): (Vec<usize>, Vec<usize>) = self
            .dims
            .iter()
            .zip(tile)
            .map(|(dim, &t)| (dim.boundaries[t], dim.boundaries[t + 1]))
            .unzip();
        Range::with_order(lower, upper, self.order())
    }

    /// Ordinal of a tile in the tile grid.
    pub fn tile_ordinal(&self, tile: &[usize]) -> Result<usize, TiledArrayError> {
        self.check_tile(tile)?;
        self.tiles.ordinal(tile)
    }

    /// Ordinal of an element in the overall element box.
    pub fn element_ordinal(&self, element: &[usize]) -> Result<usize, TiledArrayError> {
        self.elements.ordinal(element)
    }

    /// Tile coordinate named by a key holding a coordinate, an ordinal, or both.
    ///
    /// When both are set they must name the same tile.
    pub fn resolve_tile(&self, key: &IndexKey) -> Result<Coordinate, TiledArrayError> {
        match (key.first_opt(), key.second_opt()) {
            (Some(coord), Some(&ord)) => {
                if self.tile_ordinal(coord.as_slice())? != ord {
                    return Err(TiledArrayError::TileOutOfBounds {
                        tile: coord.to_vec(),
                        grid: self.tiles.extent().to_vec(),
                    });
                }
                Ok(coord.clone())
            }
            (Some(coord), None) => {
                self.check_tile(coord.as_slice())?;
                Ok(coord.clone())
            }
            (None, Some(&ord)) => self.tiles.coordinate(ord),
            (None, None) => key.coordinate().cloned(),
        }
    }

    /// Iterate over every tile in ordinal order.
    pub fn tiles(&self) -> TileIter {
        TileIter {
            coords: self.tiles.iter(),
            ordinal: 0,
        }
    }

    /// Iterate over every element, tile by tile.
    ///
    /// Each key carries the element coordinate and its ordinal in
    /// [`elements_range`](Self::elements_range).
    pub fn elements(&self) -> ElementIter<'_> {
        ElementIter {
            trange: self,
            tiles: self.tiles.iter(),
            current: None,
            remaining: self.elements.volume(),
        }
    }

    fn check_rank(&self, rank: usize) -> Result<(), TiledArrayError> {
        if rank != self.rank() {
            return Err(TiledArrayError::DimensionMismatch {
                expected: self.rank(),
                actual: rank,
            });
        }
        Ok(())
    }

    fn check_tile(&self, tile: &[usize]) -> Result<(), TiledArrayError> {
        self.check_rank(tile.len())?;
        if !self.tiles.contains(tile) {
            return Err(TiledArrayError::TileOutOfBounds {
                tile: tile.to_vec(),
                grid: self.tiles.extent().to_vec(),
            });
        }
        Ok(())
    }
}

impl Permute for TiledRange {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        Ok(Self::with_order(perm.apply(&self.dims)?, self.order()))
    }
}

impl fmt::Display for TiledRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, "]")
    }
}

/// Tile iteration domain of a [`TiledRange`].
#[derive(Debug, Clone)]
pub struct TileIter {
    coords: RangeIter,
    ordinal: usize,
}

impl Iterator for TileIter {
    type Item = IndexKey;

    fn next(&mut self) -> Option<IndexKey> {
        let coord = self.coords.next()?;
        let key = IndexKey::from_both(coord, self.ordinal);
        self.ordinal += 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coords.size_hint()
    }
}

impl ExactSizeIterator for TileIter {}

/// Element iteration domain of a [`TiledRange`].
#[derive(Debug, Clone)]
pub struct ElementIter<'a> {
    trange: &'a TiledRange,
    tiles: RangeIter,
    current: Option<RangeIter>,
    remaining: usize,
}

impl Iterator for ElementIter<'_> {
    type Item = IndexKey;

    fn next(&mut self) -> Option<IndexKey> {
        loop {
            if let Some(elem) = self.current.as_mut().and_then(Iterator::next) {
                let ordinal = self.trange.elements.ordinal_unchecked(elem.as_slice());
                self.remaining -= 1;
                return Some(IndexKey::from_both(elem, ordinal));
            }
            let tile = self.tiles.next()?;
            let tile_box = self
                .trange
                .element_box_of(tile.as_slice())
                .expect("tile iterator stays inside the grid");
            self.current = Some(tile_box.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

// tiles partition the element box, so the element volume is exact
impl ExactSizeIterator for ElementIter<'_> {}
