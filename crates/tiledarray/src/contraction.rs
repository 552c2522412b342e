//! Contraction layout derived from index labels.
//!
//! For `result(labels_r) = left(labels_l) * right(labels_q)`, a label that
//! appears in both operands but not in the result is summed. The operands are
//! aligned into a matrix product:
//!
//! ```text
//! left   -> [kept_left..., summed...]     (m x k)
//! right  -> [summed..., kept_right...]    (k x n)
//! gemm   =  [kept_left..., kept_right...] (m x n)  -> result order
//! ```

use crate::error::TiledArrayError;
use crate::permutation::{Permutation, Permute};
use crate::range::Range;
use crate::variable_list::VariableList;

/// Which modes are summed or kept, and how to align operands for GEMM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractionSpec {
    left: VariableList,
    right: VariableList,
    result: VariableList,
    /// Summed labels as (position in left, position in right), in left order.
    contracted_pairs: Vec<(usize, usize)>,
    kept_left: Vec<usize>,
    kept_right: Vec<usize>,
    perm_left: Permutation,
    perm_right: Permutation,
    perm_result: Permutation,
}

impl ContractionSpec {
    /// Analyze a contraction from operand and result labels.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::LabelMismatch`] if a result label is found
    /// in neither or both operands, or if an operand label is neither summed
    /// nor kept.
    ///
    /// # Example
    ///
    /// ```
    /// use tiledarray::{ContractionSpec, VariableList};
    ///
    /// let l: VariableList = "i,k".parse().unwrap();
    /// let r: VariableList = "j,k".parse().unwrap();
    /// let out: VariableList = "j,i".parse().unwrap();
    ///
    /// let spec = ContractionSpec::compute(&l, &r, &out).unwrap();
    /// assert_eq!(spec.contracted_pairs(), &[(1, 1)]);
    /// assert_eq!(spec.perm_right().as_slice(), &[1, 0]);
    /// assert_eq!(spec.perm_result().as_slice(), &[1, 0]);
    /// ```
    pub fn compute(
        left: &VariableList,
        right: &VariableList,
        result: &VariableList,
    ) -> Result<Self, TiledArrayError> {
        let mismatch = |a: &VariableList, b: &VariableList| TiledArrayError::LabelMismatch {
            left: a.to_string(),
            right: b.to_string(),
        };

        for label in result.iter() {
            if left.contains(label) == right.contains(label) {
                return Err(mismatch(left, result));
            }
        }

        let mut contracted_pairs = Vec::new();
        let mut kept_left = Vec::new();
        for (i, label) in left.iter().enumerate() {
            match (result.contains(label), right.position(label)) {
                (true, _) => kept_left.push(i),
                (false, Some(j)) => contracted_pairs.push((i, j)),
                (false, None) => return Err(mismatch(left, result)),
            }
        }
        let mut kept_right = Vec::new();
        for (j, label) in right.iter().enumerate() {
            if result.contains(label) {
                kept_right.push(j);
            } else if !left.contains(label) {
                return Err(mismatch(right, result));
            }
        }

        let summed: Vec<usize> = contracted_pairs.iter().map(|&(i, _)| i).collect();
        let kept_l = select(left, &kept_left)?;
        let kept_r = select(right, &kept_right)?;
        let summed_labels = select(left, &summed)?;
        let left_gemm = join(&kept_l, &summed_labels)?;
        let right_gemm = join(&summed_labels, &kept_r)?;
        let result_gemm = join(&kept_l, &kept_r)?;

        Ok(Self {
            perm_left: left.derive_permutation(&left_gemm)?,
            perm_right: right.derive_permutation(&right_gemm)?,
            perm_result: result_gemm.derive_permutation(result)?,
            left: left.clone(),
            right: right.clone(),
            result: result.clone(),
            contracted_pairs,
            kept_left,
            kept_right,
        })
    }

    #[inline]
    pub fn left(&self) -> &VariableList {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &VariableList {
        &self.right
    }

    #[inline]
    pub fn result(&self) -> &VariableList {
        &self.result
    }

    #[inline]
    pub fn contracted_pairs(&self) -> &[(usize, usize)] {
        &self.contracted_pairs
    }

    /// Left positions that survive into the result, in left order.
    #[inline]
    pub fn kept_left(&self) -> &[usize] {
        &self.kept_left
    }

    /// Right positions that survive into the result, in right order.
    #[inline]
    pub fn kept_right(&self) -> &[usize] {
        &self.kept_right
    }

    /// Reorders the left operand to `[kept_left..., summed...]`.
    #[inline]
    pub fn perm_left(&self) -> &Permutation {
        &self.perm_left
    }

    /// Reorders the right operand to `[summed..., kept_right...]`.
    #[inline]
    pub fn perm_right(&self) -> &Permutation {
        &self.perm_right
    }

    /// Reorders the GEMM result `[kept_left..., kept_right...]` to result label order.
    #[inline]
    pub fn perm_result(&self) -> &Permutation {
        &self.perm_result
    }

    pub fn left_rank(&self) -> usize {
        self.left.dim()
    }

    pub fn right_rank(&self) -> usize {
        self.right.dim()
    }

    pub fn result_rank(&self) -> usize {
        self.result.dim()
    }

    /// No mode is summed.
    pub fn is_outer_product(&self) -> bool {
        self.contracted_pairs.is_empty()
    }

    /// Range of the GEMM-ordered result for operands over `left` and `right`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::RankMismatch`] if a range's rank differs from
    /// its label count, and [`TiledArrayError::ContractedBoundsMismatch`] if a
    /// summed label spans different element bounds on each side.
    pub fn make_result_range(&self, left: &Range, right: &Range) -> Result<Range, TiledArrayError> {
        self.check_operands(left, right)?;
        let (lower, upper): (Vec<usize>, Vec<usize>) = self
            .kept_left
            .iter()
            .map(|&i| (left.lower()[i], left.upper()[i]))
            .chain(
                self.kept_right
                    .iter()
                    .map(|&j| (right.lower()[j], right.upper()[j])),
            )
            .unzip();
        Range::with_order(lower, upper, left.order())
    }

    /// GEMM sizes `(m, k, n)` for operands over `left` and `right`.
    pub fn gemm_dims(&self, left: &Range, right: &Range) -> Result<(usize, usize, usize), TiledArrayError> {
        self.check_operands(left, right)?;
        let m = self.kept_left.iter().map(|&i| left.extent()[i]).product();
        let k = self
            .contracted_pairs
            .iter()
            .map(|&(i, _)| left.extent()[i])
            .product();
        let n = self.kept_right.iter().map(|&j| right.extent()[j]).product();
        Ok((m, k, n))
    }

    /// Permute both operand ranges into GEMM order.
    pub fn align_ranges(&self, left: &Range, right: &Range) -> Result<(Range, Range), TiledArrayError> {
        self.check_operands(left, right)?;
        Ok((left.permute(&self.perm_left)?, right.permute(&self.perm_right)?))
    }

    fn check_operands(&self, left: &Range, right: &Range) -> Result<(), TiledArrayError> {
        if left.rank() != self.left_rank() {
            return Err(TiledArrayError::RankMismatch {
                expected: self.left_rank(),
                actual: left.rank(),
            });
        }
        if right.rank() != self.right_rank() {
            return Err(TiledArrayError::RankMismatch {
                expected: self.right_rank(),
                actual: right.rank(),
            });
        }
        for &(i, j) in &self.contracted_pairs {
            let l = (left.lower()[i], left.upper()[i]);
            let r = (right.lower()[j], right.upper()[j]);
            if l != r {
                return Err(TiledArrayError::ContractedBoundsMismatch {
                    label: self.left[i].to_string(),
                    left: l,
                    right: r,
                });
            }
        }
        Ok(())
    }
}

fn select(list: &VariableList, positions: &[usize]) -> Result<VariableList, TiledArrayError> {
    VariableList::from_labels(positions.iter().map(|&i| list[i].to_string()))
}

/// Concatenate two label lists; labels must stay distinct.
fn join(a: &VariableList, b: &VariableList) -> Result<VariableList, TiledArrayError> {
    VariableList::from_labels(a.iter().chain(b.iter()).map(str::to_string))
}
