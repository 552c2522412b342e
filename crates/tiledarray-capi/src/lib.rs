//! C API for tiledarray
//!
//! Exposes permutations, label lists and tiled ranges through opaque handles
//! so the index algebra can be driven from C, Julia or Python.
//!
//! All extern "C" functions work with raw pointers from foreign code. Every
//! call that can fail reports through a `status` out-pointer; panics are
//! caught at the boundary and reported as `TA_INTERNAL_ERROR`.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use libc::{c_char, c_int, size_t};
use std::ffi::{CStr, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use tiledarray::{Permutation, Permute, TiledArrayError, TiledRange, TiledRange1, VariableList};

// Status codes
pub type StatusCode = c_int;

pub const TA_SUCCESS: StatusCode = 0;
pub const TA_INVALID_ARGUMENT: StatusCode = -1;
pub const TA_DIMENSION_MISMATCH: StatusCode = -2;
pub const TA_INDEX_OUT_OF_BOUNDS: StatusCode = -3;
pub const TA_INTERNAL_ERROR: StatusCode = -4;
pub const TA_INVALID_PERMUTATION: StatusCode = -5;
pub const TA_MALFORMED_LABELS: StatusCode = -6;
pub const TA_LABEL_MISMATCH: StatusCode = -7;

fn status_of(err: &TiledArrayError) -> StatusCode {
    match err {
        TiledArrayError::InvalidPermutation { .. }
        | TiledArrayError::UnsupportedPermutation { .. } => TA_INVALID_PERMUTATION,
        TiledArrayError::DimensionMismatch { .. }
        | TiledArrayError::RankMismatch { .. }
        | TiledArrayError::ShapeMismatch { .. } => TA_DIMENSION_MISMATCH,
        TiledArrayError::IndexOutOfBounds { .. }
        | TiledArrayError::CoordinateOutOfBounds { .. }
        | TiledArrayError::TileOutOfBounds { .. } => TA_INDEX_OUT_OF_BOUNDS,
        TiledArrayError::EmptyLabel { .. }
        | TiledArrayError::InvalidLabel { .. }
        | TiledArrayError::DuplicateLabel { .. } => TA_MALFORMED_LABELS,
        TiledArrayError::LabelMismatch { .. } => TA_LABEL_MISMATCH,
        TiledArrayError::InvalidBounds { .. } | TiledArrayError::InvalidBoundaries { .. } => {
            TA_INVALID_ARGUMENT
        }
        _ => TA_INTERNAL_ERROR,
    }
}

/// Run `f` behind the FFI boundary, writing its status and returning its handle.
fn guarded<T>(
    status: *mut StatusCode,
    f: impl FnOnce() -> Result<*mut T, StatusCode>,
) -> *mut T {
    let (handle, code) = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(handle)) => (handle, TA_SUCCESS),
        Ok(Err(code)) => (ptr::null_mut(), code),
        Err(_) => (ptr::null_mut(), TA_INTERNAL_ERROR),
    };
    unsafe {
        *status = code;
    }
    handle
}

/// Like [`guarded`] for calls that only report a status.
fn guarded_status(f: impl FnOnce() -> Result<(), StatusCode>) -> StatusCode {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => TA_SUCCESS,
        Ok(Err(code)) => code,
        Err(_) => TA_INTERNAL_ERROR,
    }
}

macro_rules! opaque_handle {
    ($name:ident, $inner:ty) => {
        /// Opaque handle.
        #[repr(C)]
        pub struct $name {
            _private: *mut c_void,
        }

        impl $name {
            pub(crate) fn boxed(value: $inner) -> *mut Self {
                let inner = Box::into_raw(Box::new(value)) as *mut c_void;
                Box::into_raw(Box::new(Self { _private: inner }))
            }

            pub(crate) fn inner(&self) -> &$inner {
                unsafe { &*(self._private as *const $inner) }
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                if !self._private.is_null() {
                    unsafe {
                        let _ = Box::from_raw(self._private as *mut $inner);
                    }
                }
            }
        }
    };
}

#[allow(non_camel_case_types)]
mod handles {
    use super::*;

    opaque_handle!(ta_permutation, Permutation);
    opaque_handle!(ta_variable_list, VariableList);
    opaque_handle!(ta_tiled_range, TiledRange);
}

pub use handles::{ta_permutation, ta_tiled_range, ta_variable_list};

/// Borrow `len` elements from a C array, treating null as empty when `len == 0`.
unsafe fn slice_arg<'a, T>(data: *const T, len: size_t) -> Result<&'a [T], StatusCode> {
    if len == 0 {
        Ok(&[])
    } else if data.is_null() {
        Err(TA_INVALID_ARGUMENT)
    } else {
        Ok(unsafe { std::slice::from_raw_parts(data, len) })
    }
}

// ============================================================================
// Permutations
// ============================================================================

/// Create a permutation from its image array: `p[i]` is where position `i` moves.
///
/// # Returns
/// Handle, or null with `TA_INVALID_PERMUTATION` if `p` is not a bijection
#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_new(
    p: *const size_t,
    n: size_t,
    status: *mut StatusCode,
) -> *mut ta_permutation {
    if status.is_null() {
        return ptr::null_mut();
    }
    guarded(status, || {
        let p = unsafe { slice_arg(p, n)? };
        let perm = Permutation::from_slice(p).map_err(|e| status_of(&e))?;
        Ok(ta_permutation::boxed(perm))
    })
}

/// Identity permutation of dimension `n`.
#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_identity(n: size_t, status: *mut StatusCode) -> *mut ta_permutation {
    if status.is_null() {
        return ptr::null_mut();
    }
    guarded(status, || Ok(ta_permutation::boxed(Permutation::identity(n))))
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_release(perm: *mut ta_permutation) {
    if !perm.is_null() {
        unsafe {
            let _ = Box::from_raw(perm);
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_dim(perm: *const ta_permutation) -> size_t {
    if perm.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { (*perm).inner().dim() })).unwrap_or(0)
}

/// Copy the image array into `out`, which must hold `dim` elements.
#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_data(perm: *const ta_permutation, out: *mut size_t) -> StatusCode {
    if perm.is_null() || out.is_null() {
        return TA_INVALID_ARGUMENT;
    }
    guarded_status(|| {
        let p = unsafe { (*perm).inner() };
        unsafe { ptr::copy_nonoverlapping(p.as_slice().as_ptr(), out, p.dim()) };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_inverse(
    perm: *const ta_permutation,
    status: *mut StatusCode,
) -> *mut ta_permutation {
    if status.is_null() {
        return ptr::null_mut();
    }
    if perm.is_null() {
        unsafe {
            *status = TA_INVALID_ARGUMENT;
        }
        return ptr::null_mut();
    }
    guarded(status, || {
        Ok(ta_permutation::boxed(unsafe { (*perm).inner() }.inverse()))
    })
}

/// Composition `p * q`, applying `q` first.
#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_compose(
    p: *const ta_permutation,
    q: *const ta_permutation,
    status: *mut StatusCode,
) -> *mut ta_permutation {
    if status.is_null() {
        return ptr::null_mut();
    }
    if p.is_null() || q.is_null() {
        unsafe {
            *status = TA_INVALID_ARGUMENT;
        }
        return ptr::null_mut();
    }
    guarded(status, || {
        let (p, q) = unsafe { ((*p).inner(), (*q).inner()) };
        let pq = p.compose(q).map_err(|e| status_of(&e))?;
        Ok(ta_permutation::boxed(pq))
    })
}

/// Permute `len` values from `input` into `out` (`out[p[i]] = input[i]`).
#[unsafe(no_mangle)]
pub extern "C" fn ta_permutation_apply(
    perm: *const ta_permutation,
    input: *const size_t,
    len: size_t,
    out: *mut size_t,
) -> StatusCode {
    if perm.is_null() || out.is_null() {
        return TA_INVALID_ARGUMENT;
    }
    guarded_status(|| {
        let input = unsafe { slice_arg(input, len)? };
        let permuted = unsafe { (*perm).inner() }
            .apply(input)
            .map_err(|e| status_of(&e))?;
        unsafe { ptr::copy_nonoverlapping(permuted.as_ptr(), out, permuted.len()) };
        Ok(())
    })
}

// ============================================================================
// Variable lists
// ============================================================================

/// Parse a comma-separated, NUL-terminated label string such as `"i, j, k"`.
///
/// # Returns
/// Handle, or null with `TA_MALFORMED_LABELS` on an empty, invalid or duplicate label
#[unsafe(no_mangle)]
pub extern "C" fn ta_variable_list_parse(
    labels: *const c_char,
    status: *mut StatusCode,
) -> *mut ta_variable_list {
    if status.is_null() {
        return ptr::null_mut();
    }
    if labels.is_null() {
        unsafe {
            *status = TA_INVALID_ARGUMENT;
        }
        return ptr::null_mut();
    }
    guarded(status, || {
        let text = unsafe { CStr::from_ptr(labels) }
            .to_str()
            .map_err(|_| TA_MALFORMED_LABELS)?;
        let vars = VariableList::parse(text).map_err(|e| status_of(&e))?;
        Ok(ta_variable_list::boxed(vars))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_variable_list_release(vars: *mut ta_variable_list) {
    if !vars.is_null() {
        unsafe {
            let _ = Box::from_raw(vars);
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_variable_list_dim(vars: *const ta_variable_list) -> size_t {
    if vars.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { (*vars).inner().dim() })).unwrap_or(0)
}

/// Permutation taking the labels of `from` to the order of `to`.
#[unsafe(no_mangle)]
pub extern "C" fn ta_variable_list_derive_permutation(
    from: *const ta_variable_list,
    to: *const ta_variable_list,
    status: *mut StatusCode,
) -> *mut ta_permutation {
    if status.is_null() {
        return ptr::null_mut();
    }
    if from.is_null() || to.is_null() {
        unsafe {
            *status = TA_INVALID_ARGUMENT;
        }
        return ptr::null_mut();
    }
    guarded(status, || {
        let (from, to) = unsafe { ((*from).inner(), (*to).inner()) };
        let perm = from.derive_permutation(to).map_err(|e| status_of(&e))?;
        Ok(ta_permutation::boxed(perm))
    })
}

/// Check that `perm` reorders `from` into `to`, writing 1 or 0 to `out`.
#[unsafe(no_mangle)]
pub extern "C" fn ta_variable_list_permutes_to(
    from: *const ta_variable_list,
    perm: *const ta_permutation,
    to: *const ta_variable_list,
    out: *mut c_int,
) -> StatusCode {
    if from.is_null() || perm.is_null() || to.is_null() || out.is_null() {
        return TA_INVALID_ARGUMENT;
    }
    guarded_status(|| {
        let (from, perm, to) = unsafe { ((*from).inner(), (*perm).inner(), (*to).inner()) };
        let permuted = from.permute(perm).map_err(|e| status_of(&e))?;
        unsafe {
            *out = c_int::from(&permuted == to);
        }
        Ok(())
    })
}

// ============================================================================
// Tiled ranges
// ============================================================================

/// Tiled range with `rank` identical dimensions of `ntiles` tiles of `tile_extent` elements,
/// each starting at element 0.
#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_uniform(
    rank: size_t,
    ntiles: size_t,
    tile_extent: size_t,
    status: *mut StatusCode,
) -> *mut ta_tiled_range {
    if status.is_null() {
        return ptr::null_mut();
    }
    guarded(status, || {
        let dim = TiledRange1::uniform(0, ntiles, tile_extent).map_err(|e| status_of(&e))?;
        Ok(ta_tiled_range::boxed(TiledRange::new(vec![dim; rank])))
    })
}

/// Tiled range from per-dimension boundary arrays.
///
/// # Arguments
/// * `boundaries` - All dimensions' boundaries, concatenated
/// * `counts` - Number of boundaries of each dimension
/// * `rank` - Number of dimensions
#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_from_boundaries(
    boundaries: *const size_t,
    counts: *const size_t,
    rank: size_t,
    status: *mut StatusCode,
) -> *mut ta_tiled_range {
    if status.is_null() {
        return ptr::null_mut();
    }
    guarded(status, || {
        let counts = unsafe { slice_arg(counts, rank)? };
        let total = counts.iter().sum();
        let mut rest = unsafe { slice_arg(boundaries, total)? };
        let mut dims = Vec::with_capacity(rank);
        for &count in counts {
            let (head, tail) = rest.split_at(count);
            dims.push(TiledRange1::from_boundaries(head.to_vec()).map_err(|e| status_of(&e))?);
            rest = tail;
        }
        Ok(ta_tiled_range::boxed(TiledRange::new(dims)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_release(trange: *mut ta_tiled_range) {
    if !trange.is_null() {
        unsafe {
            let _ = Box::from_raw(trange);
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_rank(trange: *const ta_tiled_range) -> size_t {
    if trange.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { (*trange).inner().rank() })).unwrap_or(0)
}

/// Total number of tiles in the grid.
#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_ntiles(trange: *const ta_tiled_range) -> size_t {
    if trange.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { (*trange).inner().tiles_range().volume() })).unwrap_or(0)
}

/// Write into `out` the coordinate of the tile holding `element`.
///
/// Both arrays have `rank` entries.
#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_tile_of(
    trange: *const ta_tiled_range,
    element: *const size_t,
    rank: size_t,
    out: *mut size_t,
) -> StatusCode {
    if trange.is_null() || out.is_null() {
        return TA_INVALID_ARGUMENT;
    }
    guarded_status(|| {
        let element = unsafe { slice_arg(element, rank)? };
        let tile = unsafe { (*trange).inner() }
            .tile_of(element)
            .map_err(|e| status_of(&e))?;
        unsafe { ptr::copy_nonoverlapping(tile.as_slice().as_ptr(), out, tile.rank()) };
        Ok(())
    })
}

/// Ordinal of tile `tile` in the grid.
#[unsafe(no_mangle)]
pub extern "C" fn ta_tiled_range_tile_ordinal(
    trange: *const ta_tiled_range,
    tile: *const size_t,
    rank: size_t,
    out: *mut size_t,
) -> StatusCode {
    if trange.is_null() || out.is_null() {
        return TA_INVALID_ARGUMENT;
    }
    guarded_status(|| {
        let tile = unsafe { slice_arg(tile, rank)? };
        let ordinal = unsafe { (*trange).inner() }
            .tile_ordinal(tile)
            .map_err(|e| status_of(&e))?;
        unsafe {
            *out = ordinal;
        }
        Ok(())
    })
}
