//! # Matrix View Module - *Column-major matrix over borrowed storage*
//!
//! Dense column-major matrix view for element-wise operator application.
//! BLAS/LAPACK compatible layout over a caller owned `f64` buffer.
//!
//! Logical indexing through the aggregate traits stays row-major, so the view
//! broadcasts and compares like every other aggregate. Its own `apply_op`
//! walks storage column by column.

use std::fmt;

use crate::enums::error::{OpError, Result};
use crate::enums::shape_dim::ShapeDim;
use crate::traits::aggregate::{NumericSource, NumericTarget};
use crate::traits::op2::Op2;
use crate::traits::shape::Shape;

/// # MatrixV
///
/// Column-major dense matrix view.
///
/// ### Description
/// Borrows a flat buffer of `nrows * ncols` values laid out column by column,
/// as BLAS, LAPACK and Arrow numeric routines expect. Writes through the view
/// are visible to the buffer's owner.
///
/// ### Properties
/// - `nrows`: Number of rows.
/// - `ncols`: Number of columns.
/// - `data`: Flat buffer in column-major order.
///
/// ### Null handling
/// - It is dense - nulls can be represented through `f64::NAN`
pub struct MatrixV<'a> {
    nrows: usize,
    ncols: usize,
    data: &'a mut [f64],
}

impl<'a> MatrixV<'a> {
    /// Wraps a column-major buffer. Fails if its length does not match the shape.
    pub fn new(data: &'a mut [f64], nrows: usize, ncols: usize) -> Result<Self> {
        let expected = nrows.checked_mul(ncols).ok_or_else(|| {
            OpError::invalid(format!("Matrix shape {} x {} overflows", nrows, ncols))
        })?;
        if data.len() != expected {
            return Err(OpError::LengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(MatrixV { nrows, ncols, data })
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Flat column-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &*self.data
    }

    /// Copies logical row `row` out of the column-major storage.
    pub fn row(&self, row: usize) -> Vec<f64> {
        debug_assert!(row < self.nrows, "Row out of bounds");
        self.data
            .iter()
            .skip(row)
            .step_by(self.nrows.max(1))
            .copied()
            .collect()
    }

    #[inline(always)]
    fn col_major_index(&self, i: usize) -> usize {
        let row = i / self.ncols;
        let col = i % self.ncols;
        col * self.nrows + row
    }
}

impl Shape for MatrixV<'_> {
    fn shape(&self) -> ShapeDim {
        ShapeDim::Rank2 {
            rows: self.nrows,
            cols: self.ncols,
        }
    }
}

impl NumericSource for MatrixV<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn unsafe_get(&self, i: usize) -> f64 {
        self.data[self.col_major_index(i)]
    }

    /// Row and column vectors are laid out identically in either order.
    fn as_dense(&self) -> Option<&[f64]> {
        if self.nrows <= 1 || self.ncols <= 1 {
            Some(&*self.data)
        } else {
            None
        }
    }

    fn as_col_major(&self) -> Option<&[f64]> {
        Some(&*self.data)
    }
}

impl NumericTarget for MatrixV<'_> {
    #[inline]
    fn unsafe_set(&mut self, i: usize, value: f64) {
        let p = self.col_major_index(i);
        self.data[p] = value;
    }

    fn apply_op<O, S>(&mut self, op: &O, source: &S) -> Result<()>
    where
        O: Op2 + ?Sized,
        S: NumericSource + ?Sized,
    {
        source.check_length(self.data.len())?;

        if source.shape() == self.shape() {
            if let Some(b) = source.as_col_major() {
                tracing::trace!(op = op.name(), nrows = self.nrows, ncols = self.ncols, "apply_op: matrix column-major path");
                for (x, &y) in self.data.iter_mut().zip(b) {
                    *x = op.apply(*x, y);
                }
                return Ok(());
            }
        }

        let (nrows, ncols) = (self.nrows, self.ncols);
        if nrows == 0 {
            return Ok(());
        }
        tracing::trace!(op = op.name(), nrows, ncols, "apply_op: matrix column walk");
        let dense = source.as_dense();
        for (col, column) in self.data.chunks_mut(nrows).enumerate() {
            for (row, x) in column.iter_mut().enumerate() {
                let i = row * ncols + col;
                let y = match dense {
                    Some(b) => b[i],
                    None => source.unsafe_get(i),
                };
                *x = op.apply(*x, y);
            }
        }
        Ok(())
    }
}

const DEBUG_ROWS: usize = 4;

impl fmt::Debug for MatrixV<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.nrows.min(DEBUG_ROWS);
        let rows: Vec<Vec<f64>> = (0..shown).map(|r| self.row(r)).collect();
        let mut d = f.debug_struct("MatrixV");
        d.field("nrows", &self.nrows)
            .field("ncols", &self.ncols)
            .field("rows", &rows);
        if shown < self.nrows {
            d.finish_non_exhaustive()
        } else {
            d.finish()
        }
    }
}
