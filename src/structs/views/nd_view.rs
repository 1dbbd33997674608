//! # **NdArrayView Module** - *Strided N-dimensional View*
//!
//! `NdArrayV` is a zero-copy, mutable view of a flat `f64` buffer as an
//! N-dimensional array with explicit strides.
//!
//! ## Behaviour
//! - Logical order is row-major over `shape`, whatever the strides.
//! - `new` lays the buffer out row-major. `with_strides` accepts permuted axes
//!   and padded rows, but rejects layouts where two logical elements share a slot.
//! - [`transposed`](NdArrayV::transposed), [`select`](NdArrayV::select) and
//!   [`move_axis_to_front`](NdArrayV::move_axis_to_front) reshape the view only.
//!
//! ## Operator application
//! `apply_op` routes by rank: scalars apply once, contiguous data uses the
//! buffer fast path, strided vectors and matrices walk their strides directly,
//! anything else falls back to the logical index walk.
//!
//! ## Invariants
//! - `shape.len() == strides.len()`
//! - every reachable physical offset is `< data.len()`
//! - distinct logical indices map to distinct physical offsets

use std::fmt;

use crate::enums::error::{OpError, Result};
use crate::enums::shape_dim::ShapeDim;
use crate::kernels::apply::{apply_generic, apply_to_slice};
use crate::traits::aggregate::{NumericSource, NumericTarget};
use crate::traits::op2::Op2;
use crate::traits::shape::Shape;
use crate::utils::{
    array_product, calc_strides, cons_array, dot_product, equals, remove_index, reverse,
};

/// # NdArrayView
///
/// Strided N-dimensional view over a mutable `f64` buffer.
///
/// ## Fields
/// - `data`: the borrowed buffer.
/// - `shape`: extent per dimension, outermost first.
/// - `strides`: physical step per dimension.
/// - `offset`: physical position of the first element.
pub struct NdArrayV<'a> {
    data: &'a mut [f64],
    shape: Vec<usize>,
    strides: Vec<usize>,
    offset: usize,
}

impl<'a> NdArrayV<'a> {
    /// Row-major view of the whole of `data` as `shape`.
    pub fn new(data: &'a mut [f64], shape: &[usize]) -> Result<Self> {
        let expected = array_product(shape) as usize;
        if data.len() != expected {
            return Err(OpError::LengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(NdArrayV {
            data,
            shape: shape.to_vec(),
            strides: calc_strides(shape),
            offset: 0,
        })
    }

    /// View with explicit strides and starting offset.
    ///
    /// Fails when the rank of `strides` differs from `shape`, when two logical
    /// elements would alias the same slot, or when the furthest reachable
    /// element falls outside `data`.
    pub fn with_strides(
        data: &'a mut [f64],
        shape: &[usize],
        strides: &[usize],
        offset: usize,
    ) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(OpError::invalid(format!(
                "Stride rank {} does not match shape rank {}",
                strides.len(),
                shape.len()
            )));
        }
        if array_product(shape) > 0 {
            let span = stride_span(shape, strides)?;
            let last = offset.checked_add(span).ok_or(OpError::IndexOutOfBounds {
                index: usize::MAX,
                len: data.len(),
            })?;
            if last >= data.len() {
                return Err(OpError::IndexOutOfBounds {
                    index: last,
                    len: data.len(),
                });
            }
        }
        Ok(NdArrayV {
            data,
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Physical position of the first element.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// True when the view covers a single row-major run of the buffer.
    pub fn is_contiguous(&self) -> bool {
        equals(&self.strides, &calc_strides(&self.shape))
    }

    /// Bounds-checked read at a per-dimension index.
    pub fn get_nd(&self, index: &[usize]) -> Result<f64> {
        let p = self.physical_nd(index)?;
        Ok(self.data[p])
    }

    /// Bounds-checked write at a per-dimension index.
    pub fn set_nd(&mut self, index: &[usize], value: f64) -> Result<()> {
        let p = self.physical_nd(index)?;
        self.data[p] = value;
        Ok(())
    }

    /// Reversed-axis view of the same storage.
    pub fn transposed(&mut self) -> NdArrayV<'_> {
        NdArrayV {
            data: &mut *self.data,
            shape: reverse(&self.shape),
            strides: reverse(&self.strides),
            offset: self.offset,
        }
    }

    /// Rank-reduced view fixing `axis` at `index`.
    pub fn select(&mut self, axis: usize, index: usize) -> Result<NdArrayV<'_>> {
        let extent = self.axis_extent(axis)?;
        if index >= extent {
            return Err(OpError::IndexOutOfBounds { index, len: extent });
        }
        Ok(NdArrayV {
            shape: remove_index(&self.shape, axis)?,
            strides: remove_index(&self.strides, axis)?,
            offset: self.offset + index * self.strides[axis],
            data: &mut *self.data,
        })
    }

    /// View with `axis` moved to the outermost position, others keeping their order.
    pub fn move_axis_to_front(&mut self, axis: usize) -> Result<NdArrayV<'_>> {
        self.axis_extent(axis)?;
        Ok(NdArrayV {
            shape: cons_array(self.shape[axis], &remove_index(&self.shape, axis)?),
            strides: cons_array(self.strides[axis], &remove_index(&self.strides, axis)?),
            offset: self.offset,
            data: &mut *self.data,
        })
    }

    fn axis_extent(&self, axis: usize) -> Result<usize> {
        self.shape
            .get(axis)
            .copied()
            .ok_or(OpError::IndexOutOfBounds {
                index: axis,
                len: self.rank(),
            })
    }

    fn physical_nd(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(OpError::invalid(format!(
                "Index rank {} does not match view rank {}",
                index.len(),
                self.rank()
            )));
        }
        if let Some((&i, &n)) = index.iter().zip(&self.shape).find(|(i, n)| *i >= *n) {
            return Err(OpError::IndexOutOfBounds { index: i, len: n });
        }
        Ok(self.offset + dot_product(index, &self.strides)?)
    }

    /// Physical offset of logical row-major flat index `i`
    #[inline]
    fn physical(&self, mut i: usize) -> usize {
        let mut p = self.offset;
        for d in (0..self.shape.len()).rev() {
            let n = self.shape[d];
            p += (i % n) * self.strides[d];
            i /= n;
        }
        p
    }
}

/// Distance from the first to the last reachable element of a non-empty layout.
///
/// Axes of extent 1 never step, so any stride is fine for them. The rest,
/// taken in increasing stride order, must each step past everything the
/// smaller axes can reach, otherwise two indices land on the same slot.
fn stride_span(shape: &[usize], strides: &[usize]) -> Result<usize> {
    let mut axes: Vec<(usize, usize)> = strides
        .iter()
        .copied()
        .zip(shape.iter().copied())
        .filter(|&(_, n)| n > 1)
        .collect();
    axes.sort_unstable();

    let overflow = || {
        OpError::invalid(format!(
            "Strides {:?} overflow for shape {:?}",
            strides, shape
        ))
    };
    let mut span = 0usize;
    for (stride, n) in axes {
        if stride <= span {
            return Err(OpError::invalid(format!(
                "Strides {:?} overlap for shape {:?}",
                strides, shape
            )));
        }
        let reach = (n - 1).checked_mul(stride).ok_or_else(overflow)?;
        span = span.checked_add(reach).ok_or_else(overflow)?;
    }
    Ok(span)
}

impl Shape for NdArrayV<'_> {
    fn shape(&self) -> ShapeDim {
        ShapeDim::from_dims(&self.shape)
    }
}

impl NumericSource for NdArrayV<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    fn unsafe_get(&self, i: usize) -> f64 {
        self.data[self.physical(i)]
    }

    fn as_dense(&self) -> Option<&[f64]> {
        if self.is_contiguous() {
            let len = NumericSource::len(self);
            Some(&self.data[self.offset..self.offset + len])
        } else {
            None
        }
    }
}

impl NumericTarget for NdArrayV<'_> {
    #[inline]
    fn unsafe_set(&mut self, i: usize, value: f64) {
        let p = self.physical(i);
        self.data[p] = value;
    }

    fn apply_op<O, S>(&mut self, op: &O, source: &S) -> Result<()>
    where
        O: Op2 + ?Sized,
        S: NumericSource + ?Sized,
    {
        let offset = self.offset;
        match self.shape() {
            ShapeDim::Rank0 => {
                source.check_length(1)?;
                tracing::trace!(op = op.name(), "apply_op: nd scalar path");
                self.data[offset] = op.apply(self.data[offset], source.unsafe_get(0));
                Ok(())
            }
            ShapeDim::Rank1(n) if self.strides[0] == 1 => {
                apply_to_slice(op, &mut *self.data, offset, n, source)
            }
            ShapeDim::Rank1(n) => {
                source.check_length(n)?;
                let stride = self.strides[0];
                tracing::trace!(op = op.name(), n, stride, "apply_op: nd strided vector");
                for i in 0..n {
                    let p = offset + i * stride;
                    self.data[p] = op.apply(self.data[p], source.unsafe_get(i));
                }
                Ok(())
            }
            ShapeDim::Rank2 { rows, cols } if !self.is_contiguous() => {
                source.check_length(rows * cols)?;
                let (rs, cs) = (self.strides[0], self.strides[1]);
                tracing::trace!(op = op.name(), rows, cols, "apply_op: nd strided matrix");
                let dense = source.as_dense();
                for r in 0..rows {
                    for c in 0..cols {
                        let i = r * cols + c;
                        let y = match dense {
                            Some(b) => b[i],
                            None => source.unsafe_get(i),
                        };
                        let p = offset + r * rs + c * cs;
                        self.data[p] = op.apply(self.data[p], y);
                    }
                }
                Ok(())
            }
            _ if self.is_contiguous() => {
                let len = NumericSource::len(self);
                apply_to_slice(op, &mut *self.data, offset, len, source)
            }
            _ => apply_generic(op, self, source),
        }
    }
}

impl fmt::Debug for NdArrayV<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NdArrayV: shape {:?}, strides {:?}, offset {}",
            self.shape, self.strides, self.offset
        )
    }
}
