//! Index labels of a tensor expression.
//!
//! A [`VariableList`] names each mode of a tensor, e.g. `"i,j,k"`. Matching
//! labels between operands is how a contraction finds which modes to sum and
//! which permutation aligns the operands.

use std::collections::HashSet;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::TiledArrayError;
use crate::permutation::{Permutation, Permute};

/// Ordered list of distinct, alphanumeric mode labels.
///
/// Parsing splits on `,`, trims each token and strips whitespace inside a
/// token, so `" e e "` becomes `"ee"`. A blank string is the rank-0 list.
///
/// # Example
/// ```
/// use tiledarray::{Permutation, Permute, VariableList};
///
/// let v: VariableList = " a , b, c ,d".parse().unwrap();
/// assert_eq!(v.to_string(), "(a, b, c, d)");
///
/// let p = Permutation::new(vec![1, 2, 3, 0]).unwrap();
/// let w = v.permute(&p).unwrap();
/// assert_eq!(w, "d,a,b,c".parse().unwrap());
/// assert_eq!(v.derive_permutation(&w).unwrap(), p);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VariableList {
    labels: Vec<String>,
}

impl VariableList {
    /// The empty (rank-0) list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated label list.
    ///
    /// # Errors
    ///
    /// - [`TiledArrayError::EmptyLabel`] for a token that is blank after trimming
    /// - [`TiledArrayError::InvalidLabel`] for characters outside `[A-Za-z0-9]`
    /// - [`TiledArrayError::DuplicateLabel`] if a label repeats
    pub fn parse(s: &str) -> Result<Self, TiledArrayError> {
        if s.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::from_labels(
            s.split(',')
                .map(|token| token.chars().filter(|c| !c.is_whitespace()).collect::<String>()),
        )
    }

    /// Build from explicit labels, applying the same validation as [`parse`](Self::parse).
    pub fn from_labels<I, S>(labels: I) -> Result<Self, TiledArrayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(TiledArrayError::EmptyLabel { index });
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(TiledArrayError::InvalidLabel {
                    label: label.clone(),
                });
            }
            if !seen.insert(label.as_str()) {
                return Err(TiledArrayError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }
        Ok(Self { labels })
    }

    /// Number of labels (the tensor rank).
    #[inline]
    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at position `i`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::IndexOutOfBounds`] if `i >= dim()`.
    pub fn at(&self, i: usize) -> Result<&str, TiledArrayError> {
        self.labels
            .get(i)
            .map(String::as_str)
            .ok_or(TiledArrayError::IndexOutOfBounds {
                index: i,
                len: self.dim(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Whether both lists hold the same set of labels.
    pub fn is_permutation_of(&self, other: &VariableList) -> bool {
        self.dim() == other.dim() && self.iter().all(|l| other.contains(l))
    }

    /// The permutation that reorders this list into `target`.
    ///
    /// `self.permute(&p) == target` for the returned `p`.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::LabelMismatch`] if the label sets differ.
    pub fn derive_permutation(&self, target: &VariableList) -> Result<Permutation, TiledArrayError> {
        let mismatch = || TiledArrayError::LabelMismatch {
            left: self.to_string(),
            right: target.to_string(),
        };
        if self.dim() != target.dim() {
            return Err(mismatch());
        }
        let p = self
            .iter()
            .map(|l| target.position(l).ok_or_else(mismatch))
            .collect::<Result<Vec<_>, _>>()?;
        Permutation::new(p)
    }

    /// Reorder the labels in place.
    pub fn permute_in_place(&mut self, perm: &Permutation) -> Result<(), TiledArrayError> {
        perm.apply_in_place(&mut self.labels)
    }
}

impl Permute for VariableList {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        Ok(Self {
            labels: perm.apply(&self.labels)?,
        })
    }
}

impl FromStr for VariableList {
    type Err = TiledArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for VariableList {
    type Error = TiledArrayError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl Index<usize> for VariableList {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.labels[i]
    }
}

impl fmt::Display for VariableList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.labels.join(", "))
    }
}
