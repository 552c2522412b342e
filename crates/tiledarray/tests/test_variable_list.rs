//! Tests for label lists and label-derived permutations.
//!
//! # Coverage
//!
//! - Parsing, normalization and malformed input
//! - Indexed access
//! - Deriving the permutation between two orderings of the same labels

use tiledarray::{Permutation, Permute, TiledArrayError, VariableList};

/// Test basic accessors on a four-label list.
#[test]
fn test_accessors() {
    let v = VariableList::parse("a,b,c,d").unwrap();
    assert_eq!(v.dim(), 4);
    assert_eq!(v.at(0).unwrap(), "a");
    assert_eq!(v.at(3).unwrap(), "d");
    assert_eq!(&v[1], "b");
    assert!(matches!(
        v.at(4),
        Err(TiledArrayError::IndexOutOfBounds { index: 4, len: 4 })
    ));
}

/// Test that each malformed label string is rejected as malformed input.
#[test]
fn test_malformed_input() {
    for bad in [",a,b,c", "a,,b,c", " ,a,b", "a,b,a,c", "a,b,", "a-b,c"] {
        let err = VariableList::parse(bad).unwrap_err();
        assert!(
            matches!(
                err,
                TiledArrayError::EmptyLabel { .. }
                    | TiledArrayError::DuplicateLabel { .. }
                    | TiledArrayError::InvalidLabel { .. }
            ),
            "{bad:?} gave {err:?}"
        );
    }
}

/// Test whitespace normalization inside and around labels.
#[test]
fn test_whitespace_normalization() {
    let v = VariableList::parse(" a , b, c, d , e e ,f f, g10,h, i ").unwrap();
    let expected = ["a", "b", "c", "d", "ee", "ff", "g10", "h", "i"];
    assert_eq!(v.labels(), expected.map(String::from).as_slice());
}

/// Test that duplicates are detected after normalization.
#[test]
fn test_duplicate_after_normalization() {
    assert!(matches!(
        VariableList::parse("ab, a b"),
        Err(TiledArrayError::DuplicateLabel { .. })
    ));
}

#[test]
fn test_blank_is_rank_zero() {
    assert!(VariableList::parse("").unwrap().is_empty());
    assert!(VariableList::parse("   ").unwrap().is_empty());
}

/// Test that derive_permutation recovers the permutation used to reorder.
#[test]
fn test_derive_permutation_roundtrip() {
    let v = VariableList::parse("a,b,c,d").unwrap();
    let p = Permutation::new(vec![1, 2, 3, 0]).unwrap();
    let w = v.permute(&p).unwrap();
    assert_eq!(w, VariableList::parse("d,a,b,c").unwrap());

    let derived = v.derive_permutation(&w).unwrap();
    assert_eq!(derived, p);
    assert_eq!(v.permute(&derived).unwrap(), w);
}

/// Test matching "i,j,k" against "k,j,i".
#[test]
fn test_derive_reversal() {
    let ijk: VariableList = "i,j,k".parse().unwrap();
    let kji: VariableList = "k,j,i".parse().unwrap();
    let p = ijk.derive_permutation(&kji).unwrap();
    assert_eq!(p.as_slice(), &[2, 1, 0]);
    assert_eq!(kji.derive_permutation(&ijk).unwrap(), p.inverse());
}

/// Test that lists over different label sets have no permutation between them.
#[test]
fn test_derive_label_mismatch() {
    let a: VariableList = "i,j".parse().unwrap();
    let b: VariableList = "i,k".parse().unwrap();
    let c: VariableList = "i,j,k".parse().unwrap();
    assert!(!a.is_permutation_of(&b));
    assert!(matches!(
        a.derive_permutation(&b),
        Err(TiledArrayError::LabelMismatch { .. })
    ));
    assert!(a.derive_permutation(&c).is_err());
}

#[test]
fn test_permute_in_place() {
    let mut v: VariableList = "x,y,z".parse().unwrap();
    v.permute_in_place(&Permutation::new(vec![2, 0, 1]).unwrap())
        .unwrap();
    assert_eq!(v.to_string(), "(y, z, x)");
}
