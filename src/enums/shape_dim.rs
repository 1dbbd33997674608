//! # ShapeDim Enum Module
//!
//! Companion to [crate::traits::shape::Shape];
//!
//! Contains all supported aggregate shape variants.

use crate::traits::shape::Shape;

/// Dimensional rank of a numeric aggregate.
///
/// Construct through [`ShapeDim::from_dims`] when the rank is not known statically,
/// so that equal shapes always compare equal: ranks 0, 1 and 2 use their dedicated
/// variants and `RankN` only ever holds three or more dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeDim {
    /// Single value
    Rank0,

    /// Vector length
    Rank1(usize),

    /// Matrix with row/column counts.
    Rank2 { rows: usize, cols: usize },

    /// N-dimensional array, outermost dimension first.
    RankN(Vec<usize>),
}

impl ShapeDim {
    /// Builds the canonical shape for a row-major dimension list.
    pub fn from_dims(dims: &[usize]) -> Self {
        match dims {
            [] => ShapeDim::Rank0,
            [n] => ShapeDim::Rank1(*n),
            [rows, cols] => ShapeDim::Rank2 {
                rows: *rows,
                cols: *cols,
            },
            _ => ShapeDim::RankN(dims.to_vec()),
        }
    }

    /// Dimension sizes, outermost first. Empty for a scalar.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            ShapeDim::Rank0 => Vec::new(),
            ShapeDim::Rank1(n) => vec![*n],
            ShapeDim::Rank2 { rows, cols } => vec![*rows, *cols],
            ShapeDim::RankN(dims) => dims.clone(),
        }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        match self {
            ShapeDim::Rank0 => 0,
            ShapeDim::Rank1(_) => 1,
            ShapeDim::Rank2 { .. } => 2,
            ShapeDim::RankN(dims) => dims.len(),
        }
    }
}

/// Implement `Shape` for `ShapeDim` so a bare shape can be handed
/// anywhere a shaped value is expected.
impl Shape for ShapeDim {
    fn shape(&self) -> ShapeDim {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dims_is_canonical() {
        assert_eq!(ShapeDim::from_dims(&[]), ShapeDim::Rank0);
        assert_eq!(ShapeDim::from_dims(&[4]), ShapeDim::Rank1(4));
        assert_eq!(
            ShapeDim::from_dims(&[2, 3]),
            ShapeDim::Rank2 { rows: 2, cols: 3 }
        );
        assert_eq!(
            ShapeDim::from_dims(&[2, 3, 4]),
            ShapeDim::RankN(vec![2, 3, 4])
        );
    }

    #[test]
    fn test_dims_roundtrip_and_rank() {
        for dims in [vec![], vec![7], vec![2, 5], vec![1, 2, 3, 4]] {
            let s = ShapeDim::from_dims(&dims);
            assert_eq!(s.dims(), dims);
            assert_eq!(s.rank(), dims.len());
        }
    }
}
