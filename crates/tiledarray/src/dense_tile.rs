//! Dense tile payload backed by a flat buffer.

use faer::linalg::matmul::matmul;
use faer::{Accum, MatMut, MatRef, Par};

use crate::contraction::ContractionSpec;
use crate::error::TiledArrayError;
use crate::permutation::{Permutation, Permute};
use crate::range::Range;
use crate::scalar::Scalar;
use crate::strides::Order;
use crate::tile::Tile;

/// A tile that stores every element of its range.
///
/// Data is laid out in the range's [`Order`].
///
/// # Example
/// ```
/// use tiledarray::{DenseTile, Range};
///
/// let range = Range::new(vec![2, 0], vec![4, 3]).unwrap();
/// let t = DenseTile::from_fn(range, |c| (c[0] * 10 + c[1]) as f64);
/// assert_eq!(t.get(&[3, 2]).unwrap(), 32.0);
/// assert_eq!(t.data()[0], 20.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTile<T> {
    range: Range,
    data: Vec<T>,
}

impl<T: Scalar> DenseTile<T> {
    pub fn zeros(range: Range) -> Self {
        let data = vec![T::zero(); range.volume()];
        Self { range, data }
    }

    /// Wrap `data`, laid out in `range`'s order.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::ShapeMismatch`] if `data.len() != range.volume()`.
    pub fn from_vec(range: Range, data: Vec<T>) -> Result<Self, TiledArrayError> {
        if data.len() != range.volume() {
            return Err(TiledArrayError::ShapeMismatch {
                expected: range.volume(),
                actual: data.len(),
            });
        }
        Ok(Self { range, data })
    }

    /// Fill by evaluating `f` on every element coordinate.
    pub fn from_fn<F>(range: Range, mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let data = range.iter().map(|c| f(c.as_slice())).collect();
        Self { range, data }
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Element at global coordinate `coord`.
    pub fn get(&self, coord: &[usize]) -> Result<T, TiledArrayError> {
        Ok(self.data[self.range.ordinal(coord)?])
    }

    pub fn set(&mut self, coord: &[usize], value: T) -> Result<(), TiledArrayError> {
        let ord = self.range.ordinal(coord)?;
        self.data[ord] = value;
        Ok(())
    }

    /// Same elements, laid out in `order`.
    pub fn to_order(&self, order: Order) -> Self {
        if self.range.order() == order {
            return self.clone();
        }
        let range = Range::with_order(self.range.lower().to_vec(), self.range.upper().to_vec(), order)
            .expect("bounds come from a valid range");
        Self::from_fn(range, |c| self.data[self.range.ordinal_unchecked(c)])
    }
}

/// Scatter: the element at `c` moves to `perm.apply(c)`.
impl<T: Scalar> Permute for DenseTile<T> {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        let range = self.range.permute(perm)?;
        if perm.is_identity() {
            return Ok(Self {
                range,
                data: self.data.clone(),
            });
        }
        let mut data = vec![T::zero(); self.data.len()];
        for (value, coord) in self.data.iter().zip(self.range.iter()) {
            let dest = perm.apply(coord.as_slice())?;
            data[range.ordinal_unchecked(&dest)] = *value;
        }
        Ok(Self { range, data })
    }
}

impl<T: Scalar> Tile for DenseTile<T> {
    type Element = T;

    fn range(&self) -> &Range {
        &self.range
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn gemm(
        &self,
        right: &DenseTile<T>,
        factor: T,
        spec: &ContractionSpec,
    ) -> Result<DenseTile<T>, TiledArrayError> {
        let result_range = spec.make_result_range(&self.range, &right.range)?;
        let (m, k, n) = spec.gemm_dims(&self.range, &right.range)?;

        let order = self.range.order();
        let a = self.permute(spec.perm_left())?;
        let b = right.to_order(order).permute(spec.perm_right())?;

        let mut c = DenseTile::zeros(result_range);
        if m > 0 && n > 0 && k > 0 {
            gemm_into(&mut c.data, &a.data, &b.data, (m, k, n), factor, order);
        }
        c.permute(spec.perm_result())
    }
}

/// `c (m x n) = factor * a (m x k) * b (k x n)` on buffers laid out in `order`.
fn gemm_into<T: Scalar>(
    c: &mut [T],
    a: &[T],
    b: &[T],
    (m, k, n): (usize, usize, usize),
    factor: T,
    order: Order,
) {
    match order {
        Order::ColumnMajor => {
            let a_mat = MatRef::from_column_major_slice(a, m, k);
            let b_mat = MatRef::from_column_major_slice(b, k, n);
            let mut c_mat = MatMut::from_column_major_slice_mut(c, m, n);
            matmul(c_mat.as_mut(), Accum::Replace, a_mat, b_mat, factor, Par::Seq);
        }
        Order::RowMajor => {
            // row-major X is column-major X^T, so compute C^T = B^T A^T
            let a_t = MatRef::from_column_major_slice(a, k, m);
            let b_t = MatRef::from_column_major_slice(b, n, k);
            let mut c_t = MatMut::from_column_major_slice_mut(c, n, m);
            matmul(c_t.as_mut(), Accum::Replace, b_t, a_t, factor, Par::Seq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;
    use crate::variable_list::VariableList;
    use approx::assert_relative_eq;

    fn spec(l: &str, r: &str, out: &str) -> ContractionSpec {
        let l: VariableList = l.parse().unwrap();
        let r: VariableList = r.parse().unwrap();
        let out: VariableList = out.parse().unwrap();
        ContractionSpec::compute(&l, &r, &out).unwrap()
    }

    #[test]
    fn test_from_vec_length_check() {
        let range = Range::from_extents(&[2, 3]);
        assert!(matches!(
            DenseTile::from_vec(range, vec![1.0; 5]),
            Err(TiledArrayError::ShapeMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_get_set() {
        let mut t = DenseTile::<f64>::zeros(Range::new(vec![1, 1], vec![3, 3]).unwrap());
        t.set(&[2, 1], 5.0).unwrap();
        assert_eq!(t.get(&[2, 1]).unwrap(), 5.0);
        assert_eq!(t.data()[2], 5.0);
        assert!(t.get(&[0, 0]).is_err());
    }

    #[test]
    fn test_permute_transpose() {
        let t = DenseTile::from_vec(Range::from_extents(&[2, 3]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let p = Permutation::new(vec![1, 0]).unwrap();
        let tt = t.permute(&p).unwrap();
        assert_eq!(tt.range().extent(), &[3, 2]);
        assert_eq!(tt.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        for c in t.range().iter() {
            let dest = p.apply(c.as_slice()).unwrap();
            assert_eq!(tt.get(&dest).unwrap(), t.get(c.as_slice()).unwrap());
        }
    }

    #[test]
    fn test_to_order() {
        let t = DenseTile::from_vec(Range::from_extents(&[2, 2]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let cm = t.to_order(Order::ColumnMajor);
        assert_eq!(cm.data(), &[1.0, 3.0, 2.0, 4.0]);
        assert_eq!(cm.get(&[0, 1]).unwrap(), 2.0);
    }

    #[test]
    fn test_gemm_matrix_multiply() {
        // [[1,2,3],[4,5,6]] * [[1,2],[3,4],[5,6]] = [[22,28],[49,64]]
        let a = DenseTile::from_vec(Range::from_extents(&[2, 3]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let b = DenseTile::from_vec(Range::from_extents(&[3, 2]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let c = a.gemm(&b, 1.0, &spec("i,k", "k,j", "i,j")).unwrap();
        assert_eq!(c.range().extent(), &[2, 2]);
        let expected = [22.0, 28.0, 49.0, 64.0];
        for (x, y) in c.data().iter().zip(expected) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gemm_column_major_matches_row_major() {
        let a = DenseTile::from_fn(Range::from_extents(&[2, 3]), |c| (c[0] + 2 * c[1]) as f64);
        let b = DenseTile::from_fn(Range::from_extents(&[3, 4]), |c| (3 * c[0] + c[1]) as f64 - 1.0);
        let s = spec("i,k", "k,j", "j,i");
        let row = a.gemm(&b, 2.0, &s).unwrap();
        let col = a.to_order(Order::ColumnMajor).gemm(&b, 2.0, &s).unwrap();
        for coord in row.range().iter() {
            assert_relative_eq!(
                row.get(coord.as_slice()).unwrap(),
                col.get(coord.as_slice()).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_gemm_outer_and_full() {
        let a = DenseTile::from_vec(Range::from_extents(&[2]), vec![1.0, 2.0]).unwrap();
        let b = DenseTile::from_vec(Range::from_extents(&[3]), vec![3.0, 4.0, 5.0]).unwrap();
        let outer = a.gemm(&b, 1.0, &spec("i", "j", "j,i")).unwrap();
        assert_eq!(outer.range().extent(), &[3, 2]);
        assert_eq!(outer.get(&[2, 1]).unwrap(), 10.0);

        let v = DenseTile::from_vec(Range::from_extents(&[3]), vec![4.0, 5.0, 6.0]).unwrap();
        let w = DenseTile::from_vec(Range::from_extents(&[3]), vec![1.0, 2.0, 3.0]).unwrap();
        let dot = w.gemm(&v, 1.0, &spec("i", "i", "")).unwrap();
        assert_eq!(dot.range().rank(), 0);
        assert_relative_eq!(dot.data()[0], 32.0);
    }

    #[test]
    fn test_gemm_complex() {
        let a = DenseTile::from_vec(
            Range::from_extents(&[2, 2]),
            vec![
                c64::new(1.0, 0.0),
                c64::new(2.0, 0.0),
                c64::new(3.0, 0.0),
                c64::new(4.0, 0.0),
            ],
        )
        .unwrap();
        let b = DenseTile::from_vec(
            Range::from_extents(&[2, 2]),
            vec![
                c64::new(1.0, 0.0),
                c64::new(0.0, 1.0),
                c64::new(0.0, -1.0),
                c64::new(1.0, 0.0),
            ],
        )
        .unwrap();
        let c = a.gemm(&b, c64::new(1.0, 0.0), &spec("i,k", "k,j", "i,j")).unwrap();
        // row 0: [1 - 2i, i + 2]
        let c00 = c.get(&[0, 0]).unwrap();
        let c01 = c.get(&[0, 1]).unwrap();
        assert_relative_eq!(c00.re, 1.0);
        assert_relative_eq!(c00.im, -2.0);
        assert_relative_eq!(c01.re, 2.0);
        assert_relative_eq!(c01.im, 1.0);
    }

    #[test]
    fn test_gemm_bounds_mismatch() {
        let a = DenseTile::<f64>::zeros(Range::from_extents(&[2, 3]));
        let b = DenseTile::<f64>::zeros(Range::from_extents(&[4, 5]));
        assert!(a.gemm(&b, 1.0, &spec("i,k", "k,j", "i,j")).is_err());
    }
}
