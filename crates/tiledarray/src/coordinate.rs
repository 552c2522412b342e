//! Coordinate type for element and tile indices.

use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::TiledArrayError;
use crate::permutation::{Permutation, Permute};

/// A multidimensional coordinate with a precomputed hash.
///
/// Used both for element coordinates and for tile coordinates; stack
/// allocated for rank <= 8.
///
/// # Example
/// ```
/// use tiledarray::Coordinate;
///
/// let c = Coordinate::new(&[1, 2, 3]);
/// assert_eq!(c.rank(), 3);
/// assert_eq!(c[2], 3);
/// assert_eq!(c.to_string(), "(1, 2, 3)");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Coordinate {
    coords: SmallVec<[usize; 8]>,
    hash: u64,
}

impl Coordinate {
    pub fn new(coords: &[usize]) -> Self {
        Self::collect_from(coords.iter().copied())
    }

    pub fn collect_from<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let coords: SmallVec<[usize; 8]> = iter.into_iter().collect();
        let hash = fnv1a(&coords);
        Self { coords, hash }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.coords
    }

    #[inline]
    pub fn precomputed_hash(&self) -> u64 {
        self.hash
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.coords.iter()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.coords.to_vec()
    }
}

impl std::ops::Index<usize> for Coordinate {
    type Output = usize;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.coords == other.coords
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.coords.cmp(&other.coords)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, &c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

impl Permute for Coordinate {
    fn permute(&self, perm: &Permutation) -> Result<Self, TiledArrayError> {
        Ok(Self::collect_from(perm.apply(&self.coords)?))
    }
}

impl<const N: usize> From<[usize; N]> for Coordinate {
    fn from(coords: [usize; N]) -> Self {
        Self::new(&coords)
    }
}

impl From<&[usize]> for Coordinate {
    fn from(coords: &[usize]) -> Self {
        Self::new(coords)
    }
}

impl From<Vec<usize>> for Coordinate {
    fn from(coords: Vec<usize>) -> Self {
        Self::new(&coords)
    }
}

impl AsRef<[usize]> for Coordinate {
    fn as_ref(&self) -> &[usize] {
        &self.coords
    }
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a over whole integers.
fn fnv1a(coords: &[usize]) -> u64 {
    let mut hasher = FnvHasher::default();
    for &c in coords {
        hasher.write_u64(c as u64);
    }
    hasher.finish()
}

/// Streaming FNV-1a hasher mixing one `u64` word per write.
///
/// Also used to compute the cached hash of composite keys, so a key and its
/// bare first identity hash alike.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FnvHasher(u64);

impl Default for FnvHasher {
    fn default() -> Self {
        Self(FNV_OFFSET)
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_u64(b as u64);
        }
    }

    fn write_u64(&mut self, word: u64) {
        self.0 ^= word;
        self.0 = self.0.wrapping_mul(FNV_PRIME);
    }

    fn write_usize(&mut self, word: usize) {
        self.write_u64(word as u64);
    }
}
