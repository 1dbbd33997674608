// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under the Apache License, Version 2.0.

//! # Broadcast Module
//!
//! Reconciles a source aggregate with a differently shaped target, without copying.
//!
//! ## Rules
//! - Dimensions align from the trailing end.
//! - A source dimension of size 1 stretches to the target size (stride 0).
//! - Missing leading source dimensions are implied as size 1.
//! - Extra leading source dimensions are only accepted when they are size 1.
//! - Any other disagreement is `OpError::ShapeMismatch`.
//!
//! A rank-0 source (a scalar) therefore broadcasts to every shape.

use crate::enums::error::{OpError, Result};
use crate::enums::shape_dim::ShapeDim;
use crate::traits::aggregate::NumericSource;
use crate::traits::shape::Shape;
use crate::utils::calc_strides;

/// Per-target-dimension source strides for broadcasting `source` to `target`.
///
/// Both shapes are outermost dimension first. The returned strides index the
/// source's logical row-major flat layout and are `0` on stretched dimensions.
pub fn broadcast_strides(source: &[usize], target: &[usize]) -> Result<Vec<usize>> {
    let mismatch = || OpError::ShapeMismatch {
        source: source.to_vec(),
        target: target.to_vec(),
    };

    // Extra leading source dimensions must all be size 1
    let (lead, source_tail) = if source.len() > target.len() {
        source.split_at(source.len() - target.len())
    } else {
        (&source[..0], source)
    };
    if lead.iter().any(|&d| d != 1) {
        return Err(mismatch());
    }

    let source_strides = calc_strides(source_tail);
    let skip = target.len() - source_tail.len();
    let mut strides = vec![0usize; target.len()];

    for (d, &t) in target.iter().enumerate().skip(skip) {
        let sd = d - skip;
        let s = source_tail[sd];
        if s == t {
            strides[d] = source_strides[sd];
        } else if s == 1 {
            strides[d] = 0;
        } else {
            return Err(mismatch());
        }
    }
    Ok(strides)
}

/// Read-only view of a source aggregate reinterpreted to a target shape.
///
/// Logical flat index `i` of the view is decomposed over the target shape and
/// re-composed with the broadcast strides to find the source element.
pub struct BroadcastV<'a, S: ?Sized> {
    source: &'a S,
    shape: ShapeDim,
    dims: Vec<usize>,
    strides: Vec<usize>,
    /// True when the view is element-for-element the source
    identity: bool,
}

impl<'a, S: NumericSource + ?Sized> BroadcastV<'a, S> {
    pub fn new(source: &'a S, target: &ShapeDim) -> Result<Self> {
        let source_dims = source.shape().dims();
        let dims = target.dims();
        let strides = broadcast_strides(&source_dims, &dims)?;
        let identity = source.len() == target.n_elements();

        tracing::debug!(
            source = ?source_dims,
            target = ?dims,
            identity,
            "broadcast_like"
        );

        Ok(BroadcastV {
            source,
            shape: target.clone(),
            dims,
            strides,
            identity,
        })
    }

    /// The underlying source aggregate
    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Source flat offset for target flat index `i`
    #[inline]
    fn source_offset(&self, mut i: usize) -> usize {
        let mut offset = 0;
        for d in (0..self.dims.len()).rev() {
            let n = self.dims[d];
            offset += (i % n) * self.strides[d];
            i /= n;
        }
        offset
    }
}

impl<S: NumericSource + ?Sized> Shape for BroadcastV<'_, S> {
    fn shape(&self) -> ShapeDim {
        self.shape.clone()
    }
}

impl<S: NumericSource + ?Sized> NumericSource for BroadcastV<'_, S> {
    #[inline]
    fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    fn unsafe_get(&self, i: usize) -> f64 {
        if self.identity {
            return self.source.unsafe_get(i);
        }
        self.source.unsafe_get(self.source_offset(i))
    }

    fn as_dense(&self) -> Option<&[f64]> {
        if self.identity {
            self.source.as_dense()
        } else {
            None
        }
    }
}
