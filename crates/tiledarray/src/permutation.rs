//! Permutation algebra.
//!
//! A [`Permutation`] of `n` slots moves the value in input slot `i` to output
//! slot `p[i]`:
//!
//! ```text
//! apply(p, s)[p[i]] = s[i]
//! compose(p, q)[i]  = p[q[i]]        apply(compose(p, q), s) == apply(p, apply(q, s))
//! inverse(p)[p[i]]  = i
//! ```
//!
//! Any container that can be reordered consistently implements [`Permute`].

use std::fmt;
use std::ops::{Index, Mul};

use crate::error::TiledArrayError;

/// A bijection on `0..n`.
///
/// Validated once at construction and immutable afterwards; composition and
/// inversion produce new values.
///
/// # Example
///
/// ```
/// use tiledarray::Permutation;
///
/// let p = Permutation::new(vec![1, 2, 0]).unwrap();
/// assert_eq!(p.apply(&['a', 'b', 'c']).unwrap(), vec!['c', 'a', 'b']);
/// assert!(p.compose(&p.inverse()).unwrap().is_identity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Permutation {
    p: Vec<usize>,
}

impl Permutation {
    /// Create a permutation, validating that `p` is a bijection on `0..p.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::InvalidPermutation`] for repeated or out-of-range entries.
    pub fn new(p: Vec<usize>) -> Result<Self, TiledArrayError> {
        validate_permutation(&p)?;
        Ok(Self { p })
    }

    /// Create a permutation from a slice.
    pub fn from_slice(p: &[usize]) -> Result<Self, TiledArrayError> {
        Self::new(p.to_vec())
    }

    /// The identity permutation on `n` slots.
    pub fn identity(n: usize) -> Self {
        Self {
            p: (0..n).collect(),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn dim(&self) -> usize {
        self.p.len()
    }

    /// The destination slot of every input slot.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.p
    }

    /// Iterate over destination slots.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.p.iter()
    }

    /// Check whether every slot maps to itself.
    pub fn is_identity(&self) -> bool {
        self.p.iter().enumerate().all(|(i, &pi)| i == pi)
    }

    /// The inverse permutation: `inverse().apply(apply(s)) == s`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.p.len()];
        for (i, &pi) in self.p.iter().enumerate() {
            inv[pi] = i;
        }
        Self { p: inv }
    }

    /// Source slot for every output slot.
    ///
    /// Dense kernels loop over the output and read `input[gather()[j]]`;
    /// this is the inverse of the scatter form stored here.
    pub fn gather(&self) -> Vec<usize> {
        self.inverse().p
    }

    /// Compose two permutations so that applying the result equals applying
    /// `other` first and then `self`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::DimensionMismatch`] if the dimensions differ.
    pub fn compose(&self, other: &Permutation) -> Result<Self, TiledArrayError> {
        check_dim(self.dim(), other.dim())?;
        Ok(Self {
            p: other.p.iter().map(|&qi| self.p[qi]).collect(),
        })
    }

    /// Apply to a sequence, returning a new reordered vector.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::DimensionMismatch`] if `seq.len() != self.dim()`.
    pub fn apply<T: Clone>(&self, seq: &[T]) -> Result<Vec<T>, TiledArrayError> {
        check_dim(self.dim(), seq.len())?;
        Ok(self.gather().into_iter().map(|src| seq[src].clone()).collect())
    }

    /// Apply in place by following the cycles of the permutation.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::DimensionMismatch`] if `seq.len() != self.dim()`;
    /// the sequence is left untouched in that case.
    pub fn apply_in_place<T>(&self, seq: &mut [T]) -> Result<(), TiledArrayError> {
        check_dim(self.dim(), seq.len())?;
        let mut visited = vec![false; seq.len()];
        for start in 0..seq.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            // slot `start` holds the value destined for `next`
            let mut next = self.p[start];
            while next != start {
                seq.swap(start, next);
                visited[next] = true;
                next = self.p[next];
            }
        }
        Ok(())
    }
}

fn check_dim(expected: usize, actual: usize) -> Result<(), TiledArrayError> {
    if expected != actual {
        return Err(TiledArrayError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Validate that `perm` is a permutation of `0..perm.len()`.
fn validate_permutation(perm: &[usize]) -> Result<(), TiledArrayError> {
    let n = perm.len();
    let mut seen = vec![false; n];
    for &p in perm {
        if p >= n || seen[p] {
            return Err(TiledArrayError::InvalidPermutation {
                perm: perm.to_vec(),
            });
        }
        seen[p] = true;
    }
    Ok(())
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = TiledArrayError;

    fn try_from(p: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl TryFrom<&[usize]> for Permutation {
    type Error = TiledArrayError;

    fn try_from(p: &[usize]) -> Result<Self, Self::Error> {
        Self::from_slice(p)
    }
}

impl<const N: usize> TryFrom<[usize; N]> for Permutation {
    type Error = TiledArrayError;

    fn try_from(p: [usize; N]) -> Result<Self, Self::Error> {
        Self::new(p.to_vec())
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    #[inline]
    fn index(&self, i: usize) -> &usize {
        &self.p[i]
    }
}

impl<'a> IntoIterator for &'a Permutation {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.p.iter()
    }
}

/// `&p * &q` is `p.compose(&q)`.
///
/// # Panics
///
/// Panics if the dimensions differ; use [`Permutation::compose`] to get an error instead.
impl Mul<&Permutation> for &Permutation {
    type Output = Permutation;

    fn mul(self, rhs: &Permutation) -> Permutation {
        match self.compose(rhs) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, &pi) in self.p.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{i}->{pi}")?;
        }
        write!(f, "}}")
    }
}

/// Containers that can be reordered by a [`Permutation`].
///
/// Implementations must agree with [`Permutation::apply`] on their modes:
/// whatever sits in mode `i` ends up in mode `perm[i]`.
pub trait Permute: Sized {
    /// Return a permuted copy.
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError>;
}

impl<T: Clone> Permute for Vec<T> {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        perm.apply(self)
    }
}
