//! Tests for tiled ranges, composite keys and their iteration domains.
//!
//! # Coverage
//!
//! - Tile and element counts, ordering of both iteration domains
//! - Element <-> tile mapping and error reporting
//! - Resolving tiles through coordinate and ordinal keys
//! - Sharing one tiled range between threads

use std::collections::HashSet;
use std::sync::Arc;

use tiledarray::{
    Coordinate, IndexKey, Order, Shape, TiledArrayError, TiledRange, TiledRange1,
};

fn cube() -> TiledRange {
    let dim = TiledRange1::from_boundaries(vec![0, 2, 4, 6]).unwrap();
    TiledRange::new(vec![dim.clone(), dim.clone(), dim])
}

// ============================================================================
// Iteration domains
// ============================================================================

/// Test counts of a 3x3x3 grid of 2x2x2 tiles.
#[test]
fn test_tile_and_element_counts() {
    let tr = cube();
    assert_eq!(tr.tiles().count(), 27);
    assert_eq!(tr.elements().count(), 216);
    assert_eq!(tr.tiles_range().volume(), 27);
    assert_eq!(tr.elements_range().volume(), 216);
}

/// Test that tile iteration is dense and row-major.
#[test]
fn test_tile_ordinals_are_contiguous() {
    let tr = cube();
    for (expected, key) in tr.tiles().enumerate() {
        assert_eq!(key.ordinal().unwrap(), expected);
        assert_eq!(tr.tile_ordinal(key.coordinate().unwrap().as_slice()).unwrap(), expected);
    }
    let coords: Vec<Coordinate> = tr.tiles().take(4).map(|k| k.coordinate().unwrap().clone()).collect();
    assert_eq!(coords[1].as_slice(), &[0, 0, 1]);
    assert_eq!(coords[3].as_slice(), &[0, 1, 0]);
}

/// Test that element iteration visits each element once, tile by tile.
#[test]
fn test_elements_visited_once_grouped_by_tile() {
    let tr = cube();
    let keys: Vec<IndexKey> = tr.elements().collect();
    let unique: HashSet<Coordinate> = keys.iter().map(|k| k.coordinate().unwrap().clone()).collect();
    assert_eq!(unique.len(), 216);

    // the first tile's 8 elements come before anything else
    for key in &keys[..8] {
        let tile = tr.tile_of(key.coordinate().unwrap().as_slice()).unwrap();
        assert_eq!(tile.as_slice(), &[0, 0, 0]);
    }
    let ninth = keys[8].coordinate().unwrap();
    assert_eq!(tr.tile_of(ninth.as_slice()).unwrap().as_slice(), &[0, 0, 1]);

    for key in &keys {
        let coord = key.coordinate().unwrap();
        assert_eq!(key.ordinal().unwrap(), tr.element_ordinal(coord.as_slice()).unwrap());
    }
}

/// Test that a zero-extent dimension gives exhausted iteration domains.
#[test]
fn test_empty_dimension() {
    let empty = TiledRange1::from_boundaries(vec![5]).unwrap();
    let full = TiledRange1::uniform(0, 2, 3).unwrap();
    let tr = TiledRange::new(vec![full, empty]);
    assert_eq!(tr.tiles().next(), None);
    assert_eq!(tr.elements().next(), None);
    assert!(tr.tile_of(&[0, 5]).is_err());
}

// ============================================================================
// Element <-> tile mapping
// ============================================================================

/// Test that every element maps into the box of its tile.
#[test]
fn test_tile_of_roundtrip() {
    let a = TiledRange1::from_boundaries(vec![10, 14, 18, 22]).unwrap();
    let b = TiledRange1::from_extents(3, &[1, 4, 2]).unwrap();
    let tr = TiledRange::new(vec![a, b]);

    for key in tr.elements() {
        let element = key.coordinate().unwrap();
        let tile = tr.tile_of(element.as_slice()).unwrap();
        assert!(tr.element_box_of(tile.as_slice()).unwrap().contains(element.as_slice()));
    }
    assert_eq!(tr.tile_of(&[17, 4]).unwrap().as_slice(), &[1, 1]);
}

/// Test that out-of-bounds requests are errors, never clamped.
#[test]
fn test_out_of_bounds() {
    let tr = cube();
    assert!(matches!(
        tr.tile_of(&[0, 6, 0]),
        Err(TiledArrayError::CoordinateOutOfBounds { .. })
    ));
    assert!(matches!(
        tr.element_box_of(&[3, 0, 0]),
        Err(TiledArrayError::TileOutOfBounds { .. })
    ));
    assert!(matches!(
        tr.tile_of(&[0, 0]),
        Err(TiledArrayError::DimensionMismatch { expected: 3, actual: 2 })
    ));
}

/// Test column-major tile ordinals.
#[test]
fn test_column_major_ordinals() {
    let dim = TiledRange1::uniform(0, 2, 1).unwrap();
    let tr = TiledRange::with_order(vec![dim.clone(), dim], Order::ColumnMajor);
    assert_eq!(tr.tile_ordinal(&[1, 0]).unwrap(), 1);
    assert_eq!(tr.tile_ordinal(&[0, 1]).unwrap(), 2);
}

// ============================================================================
// Keys
// ============================================================================

/// Test resolving tiles from either identity.
#[test]
fn test_resolve_tile() {
    let tr = cube();
    let by_coord = IndexKey::from_first(Coordinate::from([1, 2, 0]));
    let by_ordinal = IndexKey::from_second(15);
    let both = IndexKey::from_both(Coordinate::from([1, 2, 0]), 15);
    let inconsistent = IndexKey::from_both(Coordinate::from([1, 2, 0]), 14);

    assert_eq!(tr.resolve_tile(&by_coord).unwrap().as_slice(), &[1, 2, 0]);
    assert_eq!(tr.resolve_tile(&by_ordinal).unwrap().as_slice(), &[1, 2, 0]);
    assert_eq!(tr.resolve_tile(&both).unwrap().as_slice(), &[1, 2, 0]);
    assert!(tr.resolve_tile(&inconsistent).is_err());
    assert!(matches!(
        tr.resolve_tile(&IndexKey::new()),
        Err(TiledArrayError::KeyNotSet { .. })
    ));
}

/// Test comparison over shared identities only.
#[test]
fn test_key_comparison() {
    let c = IndexKey::from_first(Coordinate::from([0, 1]));
    let o = IndexKey::from_second(1);
    let both = IndexKey::from_both(Coordinate::from([0, 1]), 1);
    let other = IndexKey::from_both(Coordinate::from([0, 1]), 2);

    assert_eq!(c, both);
    assert_eq!(o, both);
    assert_ne!(c, o);
    assert_ne!(both, other);
    assert!(both < other);
    assert_eq!(c.partial_cmp(&o), None);
    assert!(c.eq_first(&Coordinate::from([0, 1])).unwrap());
    assert!(c.eq_second(&1).is_err());
}

// ============================================================================
// Sharing
// ============================================================================

/// Test that one tiled range can back shapes on several threads.
#[test]
fn test_shared_between_threads() {
    let tr = Arc::new(cube());
    let counts: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tr = Arc::clone(&tr);
                s.spawn(move || {
                    let shape = Shape::new(tr, tiledarray::FnPredicate(move |c: &[usize]| c[0] >= t % 3));
                    shape.tiles().count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![27, 18, 9, 27]);
    assert_eq!(Arc::strong_count(&tr), 1);
}
