//! N-dimensional boxes of integer coordinates.

use std::fmt;

use crate::coordinate::Coordinate;
use crate::error::TiledArrayError;
use crate::permutation::{Permutation, Permute};
use crate::strides::{Order, cartesian_to_linear, compute_strides, linear_to_cartesian};

/// The half-open box `[lower, upper)` together with its ordinal layout.
///
/// # Example
///
/// ```
/// use tiledarray::Range;
///
/// let r = Range::new(vec![2, 0], vec![4, 3]).unwrap();
/// assert_eq!(r.extent(), &[2, 3]);
/// assert_eq!(r.volume(), 6);
/// assert_eq!(r.ordinal(&[3, 1]).unwrap(), 4);
/// assert_eq!(r.coordinate(4).unwrap().as_slice(), &[3, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    lower: Vec<usize>,
    upper: Vec<usize>,
    extent: Vec<usize>,
    strides: Vec<usize>,
    volume: usize,
    order: Order,
}

impl Range {
    /// Create a row-major range.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::InvalidBounds`] if the ranks differ or
    /// `lower[i] > upper[i]` for some `i`.
    pub fn new(lower: Vec<usize>, upper: Vec<usize>) -> Result<Self, TiledArrayError> {
        Self::with_order(lower, upper, Order::default())
    }

    pub fn with_order(
        lower: Vec<usize>,
        upper: Vec<usize>,
        order: Order,
    ) -> Result<Self, TiledArrayError> {
        if lower.len() != upper.len() || lower.iter().zip(&upper).any(|(l, u)| l > u) {
            return Err(TiledArrayError::InvalidBounds { lower, upper });
        }
        let extent: Vec<usize> = lower.iter().zip(&upper).map(|(l, u)| u - l).collect();
        let strides = compute_strides(&extent, order);
        let volume = extent.iter().product();
        Ok(Self {
            lower,
            upper,
            extent,
            strides,
            volume,
            order,
        })
    }

    /// A range starting at the origin.
    pub fn from_extents(extent: &[usize]) -> Self {
        Self::from_extents_with_order(extent, Order::default())
    }

    pub fn from_extents_with_order(extent: &[usize], order: Order) -> Self {
        let lower = vec![0; extent.len()];
        let upper = extent.to_vec();
        let strides = compute_strides(extent, order);
        Self {
            lower,
            upper,
            extent: extent.to_vec(),
            strides,
            volume: extent.iter().product(),
            order,
        }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.extent.len()
    }

    #[inline]
    pub fn lower(&self) -> &[usize] {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &[usize] {
        &self.upper
    }

    #[inline]
    pub fn extent(&self) -> &[usize] {
        &self.extent
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of coordinates in the box. A rank-0 range holds one (empty) coordinate.
    #[inline]
    pub fn volume(&self) -> usize {
        self.volume
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volume == 0
    }

    /// Whether `coord` lies inside the box.
    pub fn contains(&self, coord: &[usize]) -> bool {
        coord.len() == self.rank()
            && coord
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(c, (l, u))| l <= c && c < u)
    }

    /// Ordinal of `coord` in this range's order.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::DimensionMismatch`] on a rank mismatch and
    /// [`TiledArrayError::CoordinateOutOfBounds`] outside the box.
    pub fn ordinal(&self, coord: &[usize]) -> Result<usize, TiledArrayError> {
        if coord.len() != self.rank() {
            return Err(TiledArrayError::DimensionMismatch {
                expected: self.rank(),
                actual: coord.len(),
            });
        }
        if !self.contains(coord) {
            return Err(self.out_of_bounds(coord));
        }
        Ok(self.ordinal_unchecked(coord))
    }

    pub(crate) fn ordinal_unchecked(&self, coord: &[usize]) -> usize {
        let offset: Vec<usize> = coord.iter().zip(&self.lower).map(|(c, l)| c - l).collect();
        cartesian_to_linear(&offset, &self.strides)
    }

    /// Coordinate with the given ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::IndexOutOfBounds`] if `ordinal >= volume()`.
    pub fn coordinate(&self, ordinal: usize) -> Result<Coordinate, TiledArrayError> {
        if ordinal >= self.volume {
            return Err(TiledArrayError::IndexOutOfBounds {
                index: ordinal,
                len: self.volume,
            });
        }
        Ok(self.coordinate_unchecked(ordinal))
    }

    pub(crate) fn coordinate_unchecked(&self, ordinal: usize) -> Coordinate {
        let offset = linear_to_cartesian(ordinal, &self.extent, self.order);
        Coordinate::collect_from(offset.iter().zip(&self.lower).map(|(o, l)| o + l))
    }

    /// Iterate over all coordinates in ordinal order.
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            range: self.clone(),
            next: 0,
        }
    }

    pub(crate) fn out_of_bounds(&self, coord: &[usize]) -> TiledArrayError {
        TiledArrayError::CoordinateOutOfBounds {
            coord: coord.to_vec(),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
        }
    }
}

/// Moves bound `i` to dimension `perm[i]`; the order is kept.
impl Permute for Range {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        Self::with_order(perm.apply(&self.lower)?, perm.apply(&self.upper)?, self.order)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?})", self.lower, self.upper)
    }
}

impl<'a> IntoIterator for &'a Range {
    type Item = Coordinate;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Iterator over the coordinates of a [`Range`].
#[derive(Debug, Clone)]
pub struct RangeIter {
    range: Range,
    next: usize,
}

impl Iterator for RangeIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.next >= self.range.volume {
            return None;
        }
        let coord = self.range.coordinate_unchecked(self.next);
        self.next += 1;
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.volume - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bounds() {
        assert!(matches!(
            Range::new(vec![2], vec![1]),
            Err(TiledArrayError::InvalidBounds { .. })
        ));
        assert!(Range::new(vec![0, 0], vec![1]).is_err());
    }

    #[test]
    fn test_empty_and_scalar_ranges() {
        let empty = Range::new(vec![3, 0], vec![3, 4]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);

        let scalar = Range::from_extents(&[]);
        assert_eq!(scalar.volume(), 1);
        assert_eq!(scalar.iter().count(), 1);
    }

    #[test]
    fn test_ordinal_roundtrip_offset_lower() {
        let r = Range::new(vec![1, 2, 3], vec![3, 5, 4]).unwrap();
        assert_eq!(r.volume(), 6);
        for (i, c) in r.iter().enumerate() {
            assert_eq!(r.ordinal(c.as_slice()).unwrap(), i);
        }
    }

    #[test]
    fn test_row_major_iteration_order() {
        let r = Range::from_extents(&[2, 2]);
        let coords: Vec<Vec<usize>> = r.iter().map(|c| c.to_vec()).collect();
        assert_eq!(coords, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn test_column_major_iteration_order() {
        let r = Range::from_extents_with_order(&[2, 2], Order::ColumnMajor);
        let coords: Vec<Vec<usize>> = r.iter().map(|c| c.to_vec()).collect();
        assert_eq!(coords, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn test_ordinal_errors() {
        let r = Range::from_extents(&[2, 3]);
        assert!(matches!(
            r.ordinal(&[2, 0]),
            Err(TiledArrayError::CoordinateOutOfBounds { .. })
        ));
        assert!(matches!(
            r.ordinal(&[0]),
            Err(TiledArrayError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            r.coordinate(6),
            Err(TiledArrayError::IndexOutOfBounds { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_permute_range() {
        let r = Range::new(vec![0, 10, 20], vec![2, 13, 24]).unwrap();
        let p = Permutation::new(vec![2, 0, 1]).unwrap();
        let pr = r.permute(&p).unwrap();
        assert_eq!(pr.lower(), &[10, 20, 0]);
        assert_eq!(pr.extent(), &[3, 4, 2]);
        assert_eq!(pr.volume(), r.volume());
    }

    #[test]
    fn test_display() {
        let r = Range::new(vec![0, 1], vec![2, 3]).unwrap();
        assert_eq!(r.to_string(), "[[0, 1], [2, 3])");
    }
}
