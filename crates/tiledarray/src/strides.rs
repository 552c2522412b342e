//! Stride and ordinal arithmetic.
//!
//! Ordinals are row-major by default (last index fastest), matching the tile
//! ordering of the tiled index space. Column-major order is available for
//! payloads that want to hand their data to faer without a transpose.

use std::fmt;

/// Linearization order of a multidimensional index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Last index varies fastest.
    #[default]
    RowMajor,
    /// First index varies fastest.
    ColumnMajor,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::RowMajor => write!(f, "row-major"),
            Order::ColumnMajor => write!(f, "column-major"),
        }
    }
}

/// Compute strides from extents in the given order.
///
/// # Examples
///
/// ```
/// use tiledarray::strides::{Order, compute_strides};
///
/// assert_eq!(compute_strides(&[3, 4, 5], Order::RowMajor), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[3, 4, 5], Order::ColumnMajor), vec![1, 3, 12]);
/// assert_eq!(compute_strides(&[], Order::RowMajor), Vec::<usize>::new());
/// ```
pub fn compute_strides(extent: &[usize], order: Order) -> Vec<usize> {
    let mut strides = vec![0; extent.len()];
    let mut stride = 1;

    match order {
        Order::RowMajor => {
            for (s, &dim) in strides.iter_mut().zip(extent).rev() {
                *s = stride;
                stride *= dim;
            }
        }
        Order::ColumnMajor => {
            for (s, &dim) in strides.iter_mut().zip(extent) {
                *s = stride;
                stride *= dim;
            }
        }
    }

    strides
}

/// Convert zero-based cartesian offsets to a linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear index back to zero-based cartesian offsets.
pub fn linear_to_cartesian(mut linear: usize, extent: &[usize], order: Order) -> Vec<usize> {
    let mut indices = vec![0; extent.len()];

    match order {
        Order::RowMajor => {
            for (idx, &dim) in indices.iter_mut().zip(extent).rev() {
                *idx = linear % dim;
                linear /= dim;
            }
        }
        Order::ColumnMajor => {
            for (idx, &dim) in indices.iter_mut().zip(extent) {
                *idx = linear % dim;
                linear /= dim;
            }
        }
    }

    indices
}
