//! tiledarray - index, permutation and sparsity algebra for tiled tensors
//!
//! A large array is split into rectangular tiles, only some of which exist,
//! and contracted with other arrays whose modes may be ordered differently.
//! This crate provides the algebra underneath:
//!
//! ```text
//! TiledRange        tiles + elements, coordinate <-> ordinal
//!   -> Shape        predicate decides which tiles/elements exist
//! VariableList      "i,j,k" labels per operand
//!   -> Permutation  derived from labels, aligns operands
//!   -> Tile::gemm   contraction on aligned payloads
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tiledarray::{LowerTrianglePredicate, Permute, Shape, TiledRange, TiledRange1, VariableList};
//!
//! let dim = TiledRange1::from_boundaries(vec![0, 2, 4, 6]).unwrap();
//! let trange = Arc::new(TiledRange::new(vec![dim.clone(), dim.clone(), dim]));
//!
//! let shape = Shape::new(trange, LowerTrianglePredicate);
//! assert_eq!(shape.tiles().count(), 10);
//!
//! let ijk: VariableList = "i,j,k".parse().unwrap();
//! let kji: VariableList = "k,j,i".parse().unwrap();
//! let p = ijk.derive_permutation(&kji).unwrap();
//! assert_eq!(ijk.permute(&p).unwrap(), kji);
//! ```

pub mod contraction;
pub mod coordinate;
pub mod dense_tile;
pub mod error;
pub mod key;
pub mod kronecker_delta;
pub mod permutation;
pub mod random;
pub mod range;
pub mod scalar;
pub mod shape;
pub mod strides;
pub mod tile;
pub mod tile_offsets;
pub mod tiled_range;
pub mod variable_list;

pub use contraction::ContractionSpec;
pub use coordinate::Coordinate;
pub use dense_tile::DenseTile;
pub use error::TiledArrayError;
pub use key::{CompositeKey, IndexKey};
pub use kronecker_delta::KroneckerDeltaTile;
pub use permutation::{Permutation, Permute};
pub use random::{RandomNormal, RandomUniform};
pub use range::{Range, RangeIter};
pub use scalar::{Scalar, c64};
pub use shape::{
    DensePredicate, FnPredicate, LowerTrianglePredicate, Predicate, Shape, ShapeIter,
    SparsePredicate,
};
pub use strides::Order;
pub use tile::Tile;
pub use tile_offsets::TileOffsets;
pub use tiled_range::{ElementIter, TileIter, TiledRange, TiledRange1};
pub use variable_list::VariableList;
