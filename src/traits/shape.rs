//! # Shape Trait Module
//!
//! Unified way to describe the dimensionality “shape” of any numeric aggregate.
//!
//! Includes standard accessors for 1d and 2d cases to avoid penalising you
//! with a match on `ShapeDim` in hot code.

use crate::enums::shape_dim::ShapeDim;

/// Shape trait.
///
/// Returns the `ShapeDim` for the receiver.
///
/// The accessors are automatic provided the implementor implements `shape`.
pub trait Shape {
    /// Returns the dimensional rank and sizes of the receiver
    fn shape(&self) -> ShapeDim;

    /// Returns the first dimension size
    ///
    /// A scalar reports `1`.
    fn shape_1d(&self) -> usize {
        match self.shape() {
            ShapeDim::Rank0 => 1,
            ShapeDim::Rank1(n) => n,
            ShapeDim::Rank2 { rows, .. } => rows,
            ShapeDim::RankN(dims) => *dims.first().unwrap_or(&1),
        }
    }

    /// Returns the first and second dimension sizes
    ///
    /// Missing trailing dimensions report `1`.
    fn shape_2d(&self) -> (usize, usize) {
        match self.shape() {
            ShapeDim::Rank0 => (1, 1),
            ShapeDim::Rank1(n) => (n, 1),
            ShapeDim::Rank2 { rows, cols } => (rows, cols),
            ShapeDim::RankN(dims) => (*dims.first().unwrap_or(&1), *dims.get(1).unwrap_or(&1)),
        }
    }

    /// Total number of elements described by the shape
    fn n_elements(&self) -> usize {
        match self.shape() {
            ShapeDim::Rank0 => 1,
            ShapeDim::Rank1(n) => n,
            ShapeDim::Rank2 { rows, cols } => rows * cols,
            ShapeDim::RankN(dims) => dims.iter().product(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let s = ShapeDim::RankN(vec![2, 3, 4]);
        assert_eq!(s.shape_1d(), 2);
        assert_eq!(s.shape_2d(), (2, 3));
        assert_eq!(s.n_elements(), 24);

        assert_eq!(ShapeDim::Rank0.n_elements(), 1);
        assert_eq!(ShapeDim::Rank1(5).shape_2d(), (5, 1));
        assert_eq!(ShapeDim::Rank2 { rows: 0, cols: 3 }.n_elements(), 0);
    }
}
