//! Packed storage offsets for the tiles of a shape.

use std::collections::HashMap;
use std::fmt;

use crate::coordinate::Coordinate;
use crate::shape::{Predicate, Shape};

/// Maps each existing tile to its offset in a packed element buffer.
///
/// Tiles are laid out back to back in tile ordinal order, each occupying the
/// volume of its element box. This is a snapshot: it never changes after the
/// shape has been enumerated.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use tiledarray::{Coordinate, Shape, SparsePredicate, TiledRange, TiledRange1};
///
/// let rows = TiledRange1::from_extents(0, &[2, 3]).unwrap();
/// let cols = TiledRange1::from_extents(0, &[4, 5]).unwrap();
/// let trange = Arc::new(TiledRange::new(vec![rows, cols]));
/// let shape = Shape::new(trange, SparsePredicate::new([[0, 0], [1, 1]]));
///
/// let offsets = shape.tile_offsets();
/// assert_eq!(offsets.get(&Coordinate::new(&[0, 0])), Some(0));
/// assert_eq!(offsets.get(&Coordinate::new(&[1, 1])), Some(8));
/// assert_eq!(offsets.total_volume(), 23);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileOffsets {
    offsets: HashMap<Coordinate, usize>,
    total_volume: usize,
}

impl TileOffsets {
    /// Enumerate `shape` and pack its tiles.
    pub fn from_shape<P: Predicate>(shape: &Shape<P>) -> Self {
        let trange = shape.trange();
        let mut offsets = HashMap::new();
        let mut current = 0;

        for key in shape.tiles() {
            let Some(tile) = key.first_opt() else {
                continue;
            };
            let volume = trange
                .element_box_of(tile.as_slice())
                .expect("shape tiles come from the grid of its own tiled range")
                .volume();
            offsets.insert(tile.clone(), current);
            current += volume;
        }

        Self {
            offsets,
            total_volume: current,
        }
    }

    /// Offset of `tile`, or `None` if it does not exist.
    #[inline]
    pub fn get(&self, tile: &Coordinate) -> Option<usize> {
        self.offsets.get(tile).copied()
    }

    #[inline]
    pub fn contains(&self, tile: &Coordinate) -> bool {
        self.offsets.contains_key(tile)
    }

    #[inline]
    pub fn nnz_tiles(&self) -> usize {
        self.offsets.len()
    }

    /// Total number of stored elements.
    #[inline]
    pub fn total_volume(&self) -> usize {
        self.total_volume
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &usize)> {
        self.offsets.iter()
    }

    pub fn sorted_tiles(&self) -> Vec<Coordinate> {
        let mut tiles: Vec<_> = self.offsets.keys().cloned().collect();
        tiles.sort();
        tiles
    }
}

impl fmt::Display for TileOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TileOffsets with {} tiles, {} elements:",
            self.nnz_tiles(),
            self.total_volume
        )?;
        for tile in self.sorted_tiles() {
            writeln!(f, "  {} => {}", tile, self.offsets[&tile])?;
        }
        Ok(())
    }
}
