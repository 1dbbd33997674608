//! # Aggregate Traits Module
//!
//! Capability contracts every numeric aggregate satisfies to take part in
//! element-wise operator application, either as the mutated *target* or the
//! read-only *source*.
//!
//! ## Indexing
//! Element access uses the *logical* row-major flat index regardless of the
//! physical layout, so a column-major matrix and a row-major N-dimensional view
//! of the same shape agree on what `unsafe_get(i)` means.
//!
//! ## Specialisation
//! [`NumericTarget::apply_op`] has a generic, always-correct default that walks
//! the flat index. Representations with a faster layout override it, so new
//! aggregate kinds only need the accessors to be correct, and an override to be fast.
//!
//! This module also implements the contracts for the standard containers that
//! already own contiguous `f64` storage: `[f64]`, `Vec<f64>`, `Vec64<f64>`,
//! and `f64` itself as a single-value scalar.

use vec64::Vec64;

use crate::enums::error::{OpError, Result};
use crate::enums::shape_dim::ShapeDim;
use crate::kernels::apply::{apply_generic, apply_to_slice};
use crate::kernels::broadcast::BroadcastV;
use crate::traits::op2::Op2;
use crate::traits::shape::Shape;

/// Read side of the aggregate contract.
pub trait NumericSource: Shape {
    /// Element count
    fn len(&self) -> usize {
        self.n_elements()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at logical row-major flat index `i`. May panic when out of range.
    fn unsafe_get(&self, i: usize) -> f64;

    /// Bounds-checked [`NumericSource::unsafe_get`]
    fn get(&self, i: usize) -> Result<f64> {
        let len = self.len();
        if i >= len {
            return Err(OpError::IndexOutOfBounds { index: i, len });
        }
        Ok(self.unsafe_get(i))
    }

    /// The backing buffer, if the elements are stored contiguously in logical order.
    fn as_dense(&self) -> Option<&[f64]> {
        None
    }

    /// The backing buffer, if the elements are stored contiguously in
    /// column-major order. Only meaningful for rank-2 aggregates.
    fn as_col_major(&self) -> Option<&[f64]> {
        None
    }

    /// Fails with `LengthMismatch` unless the aggregate holds exactly `len` elements.
    fn check_length(&self, len: usize) -> Result<()> {
        let found = self.len();
        if found != len {
            return Err(OpError::LengthMismatch {
                expected: len,
                found,
            });
        }
        Ok(())
    }

    /// Read-only view of this aggregate reinterpreted to `shape`.
    ///
    /// Dimensions align from the trailing end; size-1 dimensions stretch and
    /// missing leading dimensions are implied. Fails with `ShapeMismatch`
    /// when a non-1 dimension disagrees.
    fn broadcast_like(&self, shape: &ShapeDim) -> Result<BroadcastV<'_, Self>> {
        BroadcastV::new(self, shape)
    }
}

/// Write side of the aggregate contract.
pub trait NumericTarget: NumericSource {
    /// Writes `value` at logical row-major flat index `i`. May panic when out of range.
    fn unsafe_set(&mut self, i: usize, value: f64);

    /// Bounds-checked [`NumericTarget::unsafe_set`]
    fn set(&mut self, i: usize, value: f64) -> Result<()> {
        let len = self.len();
        if i >= len {
            return Err(OpError::IndexOutOfBounds { index: i, len });
        }
        self.unsafe_set(i, value);
        Ok(())
    }

    /// In place `self[i] = op.apply(self[i], source[i])` for every `i`.
    ///
    /// `source` already has this aggregate's element count; shapes are
    /// reconciled beforehand by [`crate::kernels::apply::apply_to`].
    fn apply_op<O, S>(&mut self, op: &O, source: &S) -> Result<()>
    where
        O: Op2 + ?Sized,
        S: NumericSource + ?Sized,
    {
        apply_generic(op, self, source)
    }
}

/// A target backed by one contiguous, logically ordered buffer.
///
/// Exposes the buffer for the buffer-level fast path and zero-copy sub-ranges.
pub trait DenseVector: NumericTarget {
    fn as_dense_mut(&mut self) -> &mut [f64];

    /// Mutable view of `[start, start + len)` sharing this vector's storage.
    fn sub_vector_mut(&mut self, start: usize, len: usize) -> Result<&mut [f64]> {
        let data = self.as_dense_mut();
        let total = data.len();
        let end = start.checked_add(len).ok_or(OpError::IndexOutOfBounds {
            index: usize::MAX,
            len: total,
        })?;
        data.get_mut(start..end).ok_or(OpError::IndexOutOfBounds {
            index: end,
            len: total,
        })
    }
}

// ===================== Dense vectors ======================

impl Shape for [f64] {
    #[inline]
    fn shape(&self) -> ShapeDim {
        ShapeDim::Rank1(<[f64]>::len(self))
    }
}

impl NumericSource for [f64] {
    #[inline]
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    #[inline]
    fn unsafe_get(&self, i: usize) -> f64 {
        self[i]
    }

    #[inline]
    fn as_dense(&self) -> Option<&[f64]> {
        Some(self)
    }
}

impl NumericTarget for [f64] {
    #[inline]
    fn unsafe_set(&mut self, i: usize, value: f64) {
        self[i] = value;
    }

    fn apply_op<O, S>(&mut self, op: &O, source: &S) -> Result<()>
    where
        O: Op2 + ?Sized,
        S: NumericSource + ?Sized,
    {
        let len = <[f64]>::len(self);
        apply_to_slice(op, self, 0, len, source)
    }
}

impl DenseVector for [f64] {
    #[inline]
    fn as_dense_mut(&mut self) -> &mut [f64] {
        self
    }
}

/// Forwards the dense vector contracts to the owned container's slice.
macro_rules! impl_dense_container {
    ($container:ty, $as_slice:ident, $as_mut_slice:ident) => {
        impl Shape for $container {
            #[inline]
            fn shape(&self) -> ShapeDim {
                ShapeDim::Rank1(self.$as_slice().len())
            }
        }

        impl NumericSource for $container {
            #[inline]
            fn len(&self) -> usize {
                self.$as_slice().len()
            }

            #[inline]
            fn unsafe_get(&self, i: usize) -> f64 {
                self.$as_slice()[i]
            }

            #[inline]
            fn as_dense(&self) -> Option<&[f64]> {
                Some(self.$as_slice())
            }
        }

        impl NumericTarget for $container {
            #[inline]
            fn unsafe_set(&mut self, i: usize, value: f64) {
                self.$as_mut_slice()[i] = value;
            }

            fn apply_op<O, S>(&mut self, op: &O, source: &S) -> Result<()>
            where
                O: Op2 + ?Sized,
                S: NumericSource + ?Sized,
            {
                self.$as_mut_slice().apply_op(op, source)
            }
        }

        impl DenseVector for $container {
            #[inline]
            fn as_dense_mut(&mut self) -> &mut [f64] {
                self.$as_mut_slice()
            }
        }
    };
}

impl_dense_container!(Vec<f64>, as_slice, as_mut_slice);
impl_dense_container!(Vec64<f64>, as_slice, as_mut_slice);

// ===================== Scalar ======================

impl Shape for f64 {
    #[inline]
    fn shape(&self) -> ShapeDim {
        ShapeDim::Rank0
    }
}

impl NumericSource for f64 {
    #[inline]
    fn len(&self) -> usize {
        1
    }

    #[inline]
    fn unsafe_get(&self, i: usize) -> f64 {
        debug_assert_eq!(i, 0, "scalar index out of bounds");
        *self
    }

    #[inline]
    fn as_dense(&self) -> Option<&[f64]> {
        Some(std::slice::from_ref(self))
    }
}

impl NumericTarget for f64 {
    #[inline]
    fn unsafe_set(&mut self, i: usize, value: f64) {
        debug_assert_eq!(i, 0, "scalar index out of bounds");
        *self = value;
    }

    fn apply_op<O, S>(&mut self, op: &O, source: &S) -> Result<()>
    where
        O: Op2 + ?Sized,
        S: NumericSource + ?Sized,
    {
        source.check_length(1)?;
        tracing::trace!(op = op.name(), "apply_op: scalar path");
        *self = op.apply(*self, source.unsafe_get(0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vec64::vec64;

    #[test]
    fn test_slice_contract() {
        let mut v = vec![1.0, 2.0, 3.0];
        assert_eq!(v.shape(), ShapeDim::Rank1(3));
        assert_eq!(NumericSource::len(&v), 3);
        assert_eq!(NumericSource::get(&v, 2).unwrap(), 3.0);
        assert_eq!(
            NumericSource::get(&v, 3),
            Err(OpError::IndexOutOfBounds { index: 3, len: 3 })
        );
        v.set(1, 9.0).unwrap();
        assert_eq!(v, vec![1.0, 9.0, 3.0]);
        assert!(v.set(5, 0.0).is_err());
        assert!(v.check_length(3).is_ok());
        assert_eq!(
            v.check_length(4),
            Err(OpError::LengthMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_vec64_contract() {
        let mut v: Vec64<f64> = vec64![4.0, 5.0];
        assert_eq!(v.shape(), ShapeDim::Rank1(2));
        assert_eq!(v.as_dense(), Some(&[4.0, 5.0][..]));
        v.unsafe_set(0, 1.5);
        assert_eq!(v.unsafe_get(0), 1.5);
    }

    #[test]
    fn test_sub_vector_shares_storage() {
        let mut v = vec![0.0; 5];
        {
            let sub = v.sub_vector_mut(1, 3).unwrap();
            sub[0] = 1.0;
            sub[2] = 3.0;
        }
        assert_eq!(v, vec![0.0, 1.0, 0.0, 3.0, 0.0]);
        assert!(v.sub_vector_mut(3, 3).is_err());
        assert_eq!(v.sub_vector_mut(5, 0).unwrap().len(), 0);
        assert_eq!(
            v.sub_vector_mut(1, usize::MAX),
            Err(OpError::IndexOutOfBounds {
                index: usize::MAX,
                len: 5
            })
        );
    }

    #[test]
    fn test_scalar_contract() {
        let mut s = 2.0f64;
        assert_eq!(s.shape(), ShapeDim::Rank0);
        assert_eq!(NumericSource::len(&s), 1);
        assert_eq!(s.get(0).unwrap(), 2.0);
        assert!(s.get(1).is_err());
        s.set(0, 7.0).unwrap();
        assert_eq!(s, 7.0);
    }
}
