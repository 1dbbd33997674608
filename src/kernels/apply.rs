// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under the Apache License, Version 2.0.

//! # Apply Module
//!
//! Entry points for applying an [`Op2`] element-wise, in place, into a target
//! aggregate.
//!
//! ## Dispatch
//! 1. [`apply_to`] reconciles shapes, broadcasting the source to the target shape
//! when they differ.
//! 2. It then hands over to the target's own [`NumericTarget::apply_op`]. Dense
//! vectors route to the buffer loop in [`apply_to_slice`], matrices walk their
//! column-major storage, scalars apply once, N-dimensional views route by rank.
//! 3. Representations without an override use [`apply_generic`], which only
//! relies on `unsafe_get`/`unsafe_set`.
//!
//! Every path produces bit-identical output for the same data, since each computes
//! `op.apply(target[i], source[i])` exactly once per element.
//!
//! ## Failure
//! Length and range checks run before the first write. A failure raised from
//! within an operator-agnostic loop cannot happen after that point, so targets
//! are either fully updated or untouched.

use crate::enums::error::{OpError, Result};
use crate::traits::aggregate::{DenseVector, NumericSource, NumericTarget};
use crate::traits::op2::Op2;

/// In place `target[i] = op.apply(target[i], source_broadcast[i])`.
///
/// The source is broadcast to the target's shape when the shapes differ,
/// failing with `ShapeMismatch` if that is impossible. The source is never mutated.
pub fn apply_to<O, T, S>(op: &O, target: &mut T, source: &S) -> Result<()>
where
    O: Op2 + ?Sized,
    T: NumericTarget + ?Sized,
    S: NumericSource + ?Sized,
{
    let target_shape = target.shape();
    if source.shape() == target_shape {
        tracing::trace!(op = op.name(), shape = ?target_shape, "apply_to");
        return target.apply_op(op, source);
    }
    let view = source.broadcast_like(&target_shape)?;
    target.apply_op(op, &view)
}

/// Applies `op` to `target[start..start + length]` only.
///
/// The whole-vector range applies directly. Any other range is applied through
/// a zero-copy sub-range view sharing the target's storage, so the rest of the
/// target is untouched. `source` is broadcast to `length` elements as in [`apply_to`].
///
/// Fails with `InvalidArgument` for a negative `start` and `IndexOutOfBounds`
/// when the range runs past the end of the target.
pub fn apply_to_range<O, V, S>(
    op: &O,
    target: &mut V,
    start: isize,
    length: usize,
    source: &S,
) -> Result<()>
where
    O: Op2 + ?Sized,
    V: DenseVector + ?Sized,
    S: NumericSource + ?Sized,
{
    if start < 0 {
        return Err(OpError::invalid(format!("Negative start position: {}", start)));
    }
    let start = start as usize;
    if start == 0 && length == NumericSource::len(&*target) {
        return apply_to(op, target, source);
    }
    let sub = target.sub_vector_mut(start, length)?;
    apply_to(op, sub, source)
}

/// Buffer-level fast path: `data[start + i] = op.apply(data[start + i], source[i])`
/// for `i in 0..length`.
///
/// `source` must hold exactly `length` elements. When it exposes a dense buffer
/// the two buffers are zipped directly.
pub fn apply_to_slice<O, S>(
    op: &O,
    data: &mut [f64],
    start: usize,
    length: usize,
    source: &S,
) -> Result<()>
where
    O: Op2 + ?Sized,
    S: NumericSource + ?Sized,
{
    source.check_length(length)?;
    let window = slice_window(data, start, length)?;

    match source.as_dense() {
        Some(b) => {
            tracing::trace!(op = op.name(), length, "apply_op: dense buffer path");
            for (x, &y) in window.iter_mut().zip(b) {
                *x = op.apply(*x, y);
            }
        }
        None => {
            tracing::trace!(op = op.name(), length, "apply_op: dense target, indexed source");
            for (i, x) in window.iter_mut().enumerate() {
                *x = op.apply(*x, source.unsafe_get(i));
            }
        }
    }
    Ok(())
}

/// [`apply_to_slice`] over the whole of `data`.
pub fn apply_to_buffer<O, S>(op: &O, data: &mut [f64], source: &S) -> Result<()>
where
    O: Op2 + ?Sized,
    S: NumericSource + ?Sized,
{
    let length = data.len();
    apply_to_slice(op, data, 0, length, source)
}

/// `data[start + i] = op.apply(data[start + i], b)` for `i in 0..length`.
pub fn apply_scalar_to_slice<O>(
    op: &O,
    data: &mut [f64],
    start: usize,
    length: usize,
    b: f64,
) -> Result<()>
where
    O: Op2 + ?Sized,
{
    let window = slice_window(data, start, length)?;
    apply_scalar(op, window, b);
    Ok(())
}

/// [`apply_scalar_to_slice`] over the whole of `data`.
pub fn apply_scalar_to_buffer<O>(op: &O, data: &mut [f64], b: f64)
where
    O: Op2 + ?Sized,
{
    apply_scalar(op, data, b);
}

/// Capability-only fallback used by targets without a specialised layout.
pub fn apply_generic<O, T, S>(op: &O, target: &mut T, source: &S) -> Result<()>
where
    O: Op2 + ?Sized,
    T: NumericTarget + ?Sized,
    S: NumericSource + ?Sized,
{
    let len = target.len();
    source.check_length(len)?;
    tracing::trace!(op = op.name(), len, "apply_op: generic path");
    for i in 0..len {
        let x = target.unsafe_get(i);
        target.unsafe_set(i, op.apply(x, source.unsafe_get(i)));
    }
    Ok(())
}

#[inline(always)]
fn apply_scalar<O: Op2 + ?Sized>(op: &O, data: &mut [f64], b: f64) {
    for x in data.iter_mut() {
        *x = op.apply(*x, b);
    }
}

#[inline]
fn slice_window(data: &mut [f64], start: usize, length: usize) -> Result<&mut [f64]> {
    let len = data.len();
    let end = start
        .checked_add(length)
        .ok_or(OpError::IndexOutOfBounds { index: usize::MAX, len })?;
    data.get_mut(start..end)
        .ok_or(OpError::IndexOutOfBounds { index: end, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnOp;
    use crate::enums::shape_dim::ShapeDim;
    use crate::traits::shape::Shape;

    /// Wraps a vector so only the generic capability path can be used.
    struct Opaque(Vec<f64>);

    impl Shape for Opaque {
        fn shape(&self) -> ShapeDim {
            ShapeDim::Rank1(self.0.len())
        }
    }

    impl NumericSource for Opaque {
        fn unsafe_get(&self, i: usize) -> f64 {
            self.0[i]
        }
    }

    impl NumericTarget for Opaque {
        fn unsafe_set(&mut self, i: usize, value: f64) {
            self.0[i] = value;
        }
    }

    #[test]
    fn test_apply_to_slice_window() {
        let add = FnOp::new(|x, y| x + y);
        let mut data = vec![1.0, 2.0, 3.0, 4.0];
        apply_to_slice(&add, &mut data, 1, 2, &vec![10.0, 20.0]).unwrap();
        assert_eq!(data, vec![1.0, 12.0, 23.0, 4.0]);
    }

    #[test]
    fn test_apply_to_slice_checks_length_before_writing() {
        let add = FnOp::new(|x, y| x + y);
        let mut data = vec![1.0, 2.0, 3.0];
        let err = apply_to_slice(&add, &mut data, 0, 3, &vec![1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            OpError::LengthMismatch {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(data, vec![1.0, 2.0, 3.0]);

        let err = apply_to_slice(&add, &mut data, 2, 2, &vec![1.0, 1.0]).unwrap_err();
        assert_eq!(err, OpError::IndexOutOfBounds { index: 4, len: 3 });
    }

    #[test]
    fn test_apply_to_slice_indexed_source() {
        let mul = FnOp::new(|x, y| x * y);
        let mut data = vec![1.0, 2.0, 3.0];
        apply_to_slice(&mul, &mut data, 0, 3, &Opaque(vec![2.0, 3.0, 4.0])).unwrap();
        assert_eq!(data, vec![2.0, 6.0, 12.0]);
    }

    #[test]
    fn test_apply_scalar_variants() {
        let sub = FnOp::new(|x, y| x - y);
        let mut data = vec![5.0, 6.0, 7.0, 8.0];
        apply_scalar_to_slice(&sub, &mut data, 2, 2, 1.0).unwrap();
        assert_eq!(data, vec![5.0, 6.0, 6.0, 7.0]);

        apply_scalar_to_buffer(&sub, &mut data, 5.0);
        assert_eq!(data, vec![0.0, 1.0, 1.0, 2.0]);

        assert!(apply_scalar_to_slice(&sub, &mut data, 3, 2, 1.0).is_err());
        assert_eq!(
            apply_scalar_to_slice(&sub, &mut data, 1, usize::MAX, 1.0),
            Err(OpError::IndexOutOfBounds {
                index: usize::MAX,
                len: 4
            })
        );
        assert_eq!(data, vec![0.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_apply_to_buffer() {
        let max = FnOp::new(f64::max);
        let mut data = vec![1.0, 5.0, 3.0];
        apply_to_buffer(&max, &mut data, &vec![4.0, 4.0, 4.0]).unwrap();
        assert_eq!(data, vec![4.0, 5.0, 4.0]);
    }

    #[test]
    fn test_generic_path_matches_fast_path() {
        let op = FnOp::new(|x: f64, y: f64| (x * 1.5 - y).sin());
        let a: Vec<f64> = (0..17).map(|i| i as f64 * 0.37).collect();
        let b: Vec<f64> = (0..17).map(|i| 3.0 - i as f64 * 0.11).collect();

        let mut fast = a.clone();
        apply_to(&op, &mut fast, &b).unwrap();

        let mut generic = Opaque(a);
        apply_to(&op, &mut generic, &Opaque(b)).unwrap();

        let fast_bits: Vec<u64> = fast.iter().map(|x| x.to_bits()).collect();
        let generic_bits: Vec<u64> = generic.0.iter().map(|x| x.to_bits()).collect();
        assert_eq!(fast_bits, generic_bits);
    }

    #[test]
    fn test_apply_to_range_negative_start() {
        let add = FnOp::new(|x, y| x + y);
        let mut v = vec![0.0; 4];
        let err = apply_to_range(&add, &mut v, -1, 2, &vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, OpError::InvalidArgument { .. }));
        assert_eq!(v, vec![0.0; 4]);
    }

    #[test]
    fn test_apply_to_range_sub_view() {
        let add = FnOp::new(|x, y| x + y);
        let mut v = vec![0.0; 5];
        apply_to_range(&add, &mut v, 1, 3, &vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v, vec![0.0, 1.0, 2.0, 3.0, 0.0]);

        // Whole range
        apply_to_range(&add, &mut v, 0, 5, &vec![1.0; 5]).unwrap();
        assert_eq!(v, vec![1.0, 2.0, 3.0, 4.0, 1.0]);

        // Scalar broadcast over a range
        apply_to_range(&add, &mut v, 3, 2, &10.0).unwrap();
        assert_eq!(v, vec![1.0, 2.0, 3.0, 14.0, 11.0]);

        assert!(matches!(
            apply_to_range(&add, &mut v, 4, 2, &vec![1.0, 1.0]),
            Err(OpError::IndexOutOfBounds { .. })
        ));

        // Lengths that overflow the end index are out of bounds too
        assert!(matches!(
            apply_to_range(&add, &mut v, 1, usize::MAX, &1.0),
            Err(OpError::IndexOutOfBounds { .. })
        ));
        assert_eq!(v, vec![1.0, 2.0, 3.0, 14.0, 11.0]);
    }
}
