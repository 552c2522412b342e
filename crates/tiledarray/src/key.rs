//! Two-identity keys.
//!
//! A [`CompositeKey`] names one object by either or both of two identities,
//! typically a tile coordinate and its ordinal. Either identity alone is
//! enough to locate the object, so keys compare only on the identities both
//! sides actually hold.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::coordinate::{Coordinate, FnvHasher};
use crate::error::TiledArrayError;

/// Which identities of a [`CompositeKey`] are set.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySlots<K1, K2> {
    Empty,
    First(K1),
    Second(K2),
    Both(K1, K2),
}

/// A key holding a first identity, a second identity, or both.
///
/// Equality and ordering are partial:
///
/// - keys with no identity in common are neither equal nor ordered;
/// - otherwise every shared identity takes part, and the keys are equal only
///   if all shared identities are equal;
/// - shared identities that order in opposite directions leave the keys
///   unordered.
///
/// The hash is derived from the first identity alone (0 when unset), so a
/// key without a first identity can never be found in a hashed container.
/// For that reason the type is deliberately not `Eq`.
///
/// # Example
///
/// ```
/// use tiledarray::{Coordinate, IndexKey};
///
/// let by_coord = IndexKey::from_first(Coordinate::new(&[1, 2]));
/// let by_ordinal = IndexKey::from_second(7);
/// let both = IndexKey::from_both(Coordinate::new(&[1, 2]), 7);
///
/// assert_eq!(both, by_coord);
/// assert_eq!(both, by_ordinal);
/// assert_ne!(by_coord, by_ordinal); // nothing in common
/// ```
#[derive(Debug, Clone)]
pub struct CompositeKey<K1, K2> {
    slots: KeySlots<K1, K2>,
    hash: u64,
}

/// Bit set in [`CompositeKey::keys`] when the first identity is present.
pub const FIRST_KEY: u8 = 1;
/// Bit set in [`CompositeKey::keys`] when the second identity is present.
pub const SECOND_KEY: u8 = 2;

impl<K1: Hash, K2> CompositeKey<K1, K2> {
    /// A key with neither identity set.
    pub fn new() -> Self {
        Self {
            slots: KeySlots::Empty,
            hash: 0,
        }
    }

    pub fn from_first(first: K1) -> Self {
        let hash = hash_first(&first);
        Self {
            slots: KeySlots::First(first),
            hash,
        }
    }

    pub fn from_second(second: K2) -> Self {
        Self {
            slots: KeySlots::Second(second),
            hash: 0,
        }
    }

    pub fn from_both(first: K1, second: K2) -> Self {
        let hash = hash_first(&first);
        Self {
            slots: KeySlots::Both(first, second),
            hash,
        }
    }

    /// Set only the first identity; any second identity is discarded.
    pub fn set_first(&mut self, first: K1) {
        *self = Self::from_first(first);
    }

    /// Set only the second identity; any first identity is discarded.
    pub fn set_second(&mut self, second: K2) {
        *self = Self::from_second(second);
    }

    pub fn set_both(&mut self, first: K1, second: K2) {
        *self = Self::from_both(first, second);
    }
}

impl<K1, K2> CompositeKey<K1, K2> {
    /// Bitmask of set identities ([`FIRST_KEY`] | [`SECOND_KEY`]).
    pub fn keys(&self) -> u8 {
        match self.slots {
            KeySlots::Empty => 0,
            KeySlots::First(_) => FIRST_KEY,
            KeySlots::Second(_) => SECOND_KEY,
            KeySlots::Both(..) => FIRST_KEY | SECOND_KEY,
        }
    }

    pub fn has_first(&self) -> bool {
        self.keys() & FIRST_KEY != 0
    }

    pub fn has_second(&self) -> bool {
        self.keys() & SECOND_KEY != 0
    }

    pub fn first_opt(&self) -> Option<&K1> {
        match &self.slots {
            KeySlots::First(k1) | KeySlots::Both(k1, _) => Some(k1),
            _ => None,
        }
    }

    pub fn second_opt(&self) -> Option<&K2> {
        match &self.slots {
            KeySlots::Second(k2) | KeySlots::Both(_, k2) => Some(k2),
            _ => None,
        }
    }

    /// The first identity.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::KeyNotSet`] if it is unset.
    pub fn first(&self) -> Result<&K1, TiledArrayError> {
        self.first_opt()
            .ok_or(TiledArrayError::KeyNotSet { identity: "first" })
    }

    /// The second identity.
    ///
    /// # Errors
    ///
    /// Returns [`TiledArrayError::KeyNotSet`] if it is unset.
    pub fn second(&self) -> Result<&K2, TiledArrayError> {
        self.second_opt()
            .ok_or(TiledArrayError::KeyNotSet { identity: "second" })
    }

    /// Cached hash of the first identity, 0 when unset.
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl<K1: PartialEq, K2> CompositeKey<K1, K2> {
    /// Compare the first identity against a bare value.
    pub fn eq_first(&self, other: &K1) -> Result<bool, TiledArrayError> {
        Ok(self.first()? == other)
    }
}

impl<K1, K2: PartialEq> CompositeKey<K1, K2> {
    /// Compare the second identity against a bare value.
    pub fn eq_second(&self, other: &K2) -> Result<bool, TiledArrayError> {
        Ok(self.second()? == other)
    }
}

impl<K1: Ord, K2> CompositeKey<K1, K2> {
    /// Order the first identity against a bare value.
    pub fn cmp_first(&self, other: &K1) -> Result<Ordering, TiledArrayError> {
        Ok(self.first()?.cmp(other))
    }
}

impl<K1, K2: Ord> CompositeKey<K1, K2> {
    /// Order the second identity against a bare value.
    pub fn cmp_second(&self, other: &K2) -> Result<Ordering, TiledArrayError> {
        Ok(self.second()?.cmp(other))
    }
}

impl<K1: Hash, K2> Default for CompositeKey<K1, K2> {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_first<K1: Hash>(first: &K1) -> u64 {
    let mut hasher = FnvHasher::default();
    first.hash(&mut hasher);
    hasher.finish()
}

/// Equal iff the keys share at least one identity and every shared identity
/// matches.
///
/// This relation is not transitive across keys holding different identities:
/// `[c, _] == [c, 1]` and `[c, 1] == [_, 1]`, yet `[c, _] != [_, 1]`. Do not
/// mix coordinate-only and ordinal-only keys in one hashed or sorted container.
impl<K1: PartialEq, K2: PartialEq> PartialEq for CompositeKey<K1, K2> {
    fn eq(&self, other: &Self) -> bool {
        let mut shared = false;
        if let (Some(a), Some(b)) = (self.first_opt(), other.first_opt()) {
            if a != b {
                return false;
            }
            shared = true;
        }
        if let (Some(a), Some(b)) = (self.second_opt(), other.second_opt()) {
            if a != b {
                return false;
            }
            shared = true;
        }
        shared
    }
}

impl<K1: PartialOrd, K2: PartialOrd> PartialOrd for CompositeKey<K1, K2> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let by_first = match (self.first_opt(), other.first_opt()) {
            (Some(a), Some(b)) => Some(a.partial_cmp(b)?),
            _ => None,
        };
        let by_second = match (self.second_opt(), other.second_opt()) {
            (Some(a), Some(b)) => Some(a.partial_cmp(b)?),
            _ => None,
        };
        match (by_first, by_second) {
            (None, None) => None,
            (Some(o), None) | (None, Some(o)) => Some(o),
            (Some(Ordering::Equal), Some(o)) | (Some(o), Some(Ordering::Equal)) => Some(o),
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        }
    }
}

impl<K1, K2> Hash for CompositeKey<K1, K2> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<K1: fmt::Display, K2: fmt::Display> fmt::Display for CompositeKey<K1, K2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slots {
            KeySlots::Empty => write!(f, "[_, _]"),
            KeySlots::First(k1) => write!(f, "[{k1}, _]"),
            KeySlots::Second(k2) => write!(f, "[_, {k2}]"),
            KeySlots::Both(k1, k2) => write!(f, "[{k1}, {k2}]"),
        }
    }
}

/// Key of a tile or element: its coordinate and/or its ordinal.
pub type IndexKey = CompositeKey<Coordinate, usize>;

impl IndexKey {
    /// Coordinate of the indexed object.
    pub fn coordinate(&self) -> Result<&Coordinate, TiledArrayError> {
        self.first()
    }

    /// Ordinal of the indexed object.
    pub fn ordinal(&self) -> Result<usize, TiledArrayError> {
        self.second().copied()
    }
}
