//! Tests for the structural Kronecker delta tile.
//!
//! The delta tile's outer product is compared against contracting its
//! materialized dense form.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tiledarray::{
    ContractionSpec, DenseTile, KroneckerDeltaTile, Permutation, Permute, Range, Tile,
    VariableList,
};

fn spec(l: &str, r: &str, out: &str) -> ContractionSpec {
    let parse = |s: &str| s.parse::<VariableList>().unwrap();
    ContractionSpec::compute(&parse(l), &parse(r), &parse(out)).unwrap()
}

fn assert_tiles_close(a: &DenseTile<f64>, b: &DenseTile<f64>) {
    assert_eq!(a.range(), b.range());
    for (x, y) in a.data().iter().zip(b.data()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

/// Test one delta factor on an offset tile against the dense equivalent.
#[test]
fn test_single_pair_matches_dense() {
    let delta = KroneckerDeltaTile::<f64>::new(Range::new(vec![2, 1], vec![5, 4]).unwrap()).unwrap();
    let right: DenseTile<f64> =
        DenseTile::random_with_rng(Range::new(vec![0, 3], vec![2, 5]).unwrap(), &mut StdRng::seed_from_u64(9));
    let s = spec("a,b", "x,y", "a,x,b,y");

    let got = delta.gemm(&right, 0.5, &s).unwrap();
    let expected = delta.to_dense().gemm(&right, 0.5, &s).unwrap();
    assert_tiles_close(&got, &expected);
}

/// Test two delta factors with a permuted result order.
#[test]
fn test_two_pairs_match_dense() {
    let delta = KroneckerDeltaTile::<f64>::new(Range::from_extents(&[3, 3, 2, 2])).unwrap();
    let right: DenseTile<f64> =
        DenseTile::random_with_rng(Range::from_extents(&[2]), &mut StdRng::seed_from_u64(4));
    let s = spec("a,b,c,d", "x", "x,d,c,b,a");

    let got = delta.gemm(&right, 1.0, &s).unwrap();
    let expected = delta.to_dense().gemm(&right, 1.0, &s).unwrap();
    assert_tiles_close(&got, &expected);
}

/// Test that an empty delta tile contracts to zeros.
#[test]
fn test_empty_delta_gives_zero_tile() {
    let delta = KroneckerDeltaTile::<f64>::new(Range::new(vec![0, 3], vec![3, 6]).unwrap()).unwrap();
    assert!(delta.is_empty());
    let right = DenseTile::from_vec(Range::from_extents(&[2]), vec![1.0, 2.0]).unwrap();
    let out = delta.gemm(&right, 1.0, &spec("i,j", "k", "i,j,k")).unwrap();
    assert_eq!(out.range().extent(), &[3, 3, 2]);
    assert!(out.data().iter().all(|&v| v == 0.0));
}

/// Test that a pair-preserving permutation keeps the delta structure.
#[test]
fn test_permute_then_materialize() {
    let delta = KroneckerDeltaTile::<f64>::new(Range::from_extents(&[2, 2, 3, 3])).unwrap();
    let p = Permutation::new(vec![3, 2, 1, 0]).unwrap();
    let permuted = delta.permute(&p).unwrap();
    assert_eq!(permuted.to_dense(), delta.to_dense().permute(&p).unwrap());
}

/// Test that cloning yields an independent, equal tile.
#[test]
fn test_clone_tile() {
    let delta = KroneckerDeltaTile::<f64>::new(Range::from_extents(&[4, 4])).unwrap();
    let copy = delta.clone_tile();
    assert_eq!(copy, delta);
    assert_eq!(copy.npairs(), 1);
}
