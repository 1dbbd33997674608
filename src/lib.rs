//! Copyright © 2025 Peter Garfield Bower. All rights reserved.
//!
//! # **Minops** - *Element-wise binary operators over numeric aggregates*
//!
//! Applies a pure binary operator `op(a, b) -> f64` element-wise, in place, into
//! a target aggregate:
//!
//! ```text
//! target[i] = op.apply(target[i], source_broadcast[i])
//! ```
//!
//! ## Aggregates
//! - `f64` scalars, `[f64]`, `Vec<f64>` and [`Vec64<f64>`](Vec64) dense vectors
//! - [`MatrixV`]: column-major matrix view over a borrowed buffer
//! - [`NdArrayV`]: strided N-dimensional view over a borrowed buffer
//! - [`BroadcastV`]: read-only source reinterpreted to a larger shape
//!
//! Anything implementing [`NumericSource`] and [`NumericTarget`] takes part;
//! faster layouts override [`NumericTarget::apply_op`].
//!
//! ## Operators
//! Implement [`Op2`] for a type, or wrap a closure with [`FnOp`]. Besides
//! `apply`, operators describe their range and domain, which drives
//! [`Op2::validate_output`], [`Op2::constrain_values`] and the
//! [`Op2::reduce_zeros`] shortcut.
//!
//! ```
//! use minops::{FnOp, MatrixV, Op2};
//!
//! let add = FnOp::named("add", |a, b| a + b);
//!
//! // Dense vectors
//! let mut v = vec![1.0, 2.0, 3.0];
//! add.apply_to(&mut v, &vec![10.0, 20.0, 30.0]).unwrap();
//! assert_eq!(v, vec![11.0, 22.0, 33.0]);
//!
//! // Scalar broadcast into a sub-range
//! add.apply_to_range(&mut v, 1, 2, &1.0).unwrap();
//! assert_eq!(v, vec![11.0, 23.0, 34.0]);
//!
//! // Row broadcast over a column-major matrix
//! let mut data = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
//! let mut m = MatrixV::new(&mut data, 2, 3).unwrap();
//! add.apply_to(&mut m, &vec![100.0, 200.0, 300.0]).unwrap();
//! assert_eq!(m.row(1), vec![104.0, 205.0, 306.0]);
//! ```
//!
//! ## Index utilities
//! [`utils`] holds the small shape and index helpers N-dimensional code leans on:
//! strides, products, dot products, axis removal and random index generation.
//!
//! ## Logging
//! Dispatch decisions are emitted through `tracing` at `trace` level and broadcast
//! setup at `debug` level. Install any subscriber to see them.

pub mod enums {
    pub mod error;
    pub mod shape_dim;
}

pub mod kernels {
    pub mod apply;
    pub mod broadcast;
}

pub mod structs {
    pub mod views {
        pub mod matrix_view;
        pub mod nd_view;
    }
}

pub mod traits {
    pub mod aggregate;
    pub mod op2;
    pub mod shape;
    pub mod type_unions;
}

pub mod utils;

pub use enums::error::{OpError, Result};
pub use enums::shape_dim::ShapeDim;
pub use kernels::apply::{
    apply_generic, apply_scalar_to_buffer, apply_scalar_to_slice, apply_to, apply_to_buffer,
    apply_to_range, apply_to_slice,
};
pub use kernels::broadcast::{BroadcastV, broadcast_strides};
pub use structs::views::matrix_view::MatrixV;
pub use structs::views::nd_view::NdArrayV;
pub use traits::aggregate::{DenseVector, NumericSource, NumericTarget};
pub use traits::op2::{FnOp, Op2};
pub use traits::shape::Shape;
pub use traits::type_unions::Integer;
pub use vec64::Vec64;
