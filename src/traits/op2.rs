//! # Op2 Trait Module
//!
//! The binary scalar operator abstraction applied element-wise by the kernels.
//!
//! ## Contract
//! - `apply(x, y)` is the only required method. It must return bit-identical
//! output for identical inputs unless `is_stochastic()` returns true.
//! - Every capability (inverse, derivative, average value) is off by default.
//! Callers check the flag first; the `Result` returning methods report
//! `OpError::Unsupported` rather than substituting a value.
//! - Output range (`min_value`/`max_value`) and first-operand domain
//! (`min_domain`/`max_domain`) default to the whole real line.
//!
//! Operators are immutable values: `Send + Sync`, cheap to construct and
//! freely shared between call sites.
//!
//! ## Example
//! ```rust
//! use minops::{FnOp, Op2};
//!
//! let add = FnOp::named("add", |x, y| x + y);
//! let mut v = vec![1.0, 2.0, 3.0];
//! add.apply_to(&mut v, &vec![10.0, 20.0, 30.0]).unwrap();
//! assert_eq!(v, vec![11.0, 22.0, 33.0]);
//!
//! // Adding zero a hundred times is stable after the first step
//! assert_eq!(add.reduce_zeros(5.0, 100), 5.0);
//! ```

use std::fmt;

use crate::enums::error::{OpError, Result};
use crate::kernels::apply;
use crate::traits::aggregate::{DenseVector, NumericSource, NumericTarget};

/// Binary operator on `f64` values, `z = apply(x, y)`.
pub trait Op2: Send + Sync {
    fn apply(&self, x: f64, y: f64) -> f64;

    /// Applies the inverse of this operator.
    ///
    /// Returns `Ok(f64::NAN)` where an inverse exists in general but not for
    /// this particular `y`, and `OpError::Unsupported` when the operator has no inverse.
    fn apply_inverse(&self, y: f64) -> Result<f64> {
        let _ = y;
        Err(OpError::Unsupported {
            op: self.name().to_string(),
            what: "inverse",
        })
    }

    fn has_derivative(&self) -> bool {
        false
    }

    fn has_derivative_for_output(&self) -> bool {
        self.has_derivative()
    }

    fn has_inverse(&self) -> bool {
        false
    }

    /// True if the operator returns random values for at least some inputs
    fn is_stochastic(&self) -> bool {
        false
    }

    fn average_value(&self) -> Result<f64> {
        Err(OpError::Unsupported {
            op: self.name().to_string(),
            what: "average value",
        })
    }

    fn min_value(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn max_value(&self) -> f64 {
        f64::INFINITY
    }

    fn min_domain(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn max_domain(&self) -> f64 {
        f64::INFINITY
    }

    /// True if *either* end of the output range is finite.
    ///
    /// A half-open range such as `[0, +inf)` counts as bounded.
    fn is_bounded(&self) -> bool {
        (self.min_value() >= -f64::MAX) || (self.max_value() <= f64::MAX)
    }

    /// True if *either* end of the input domain is finite.
    fn is_domain_bounded(&self) -> bool {
        (self.min_domain() >= -f64::MAX) || (self.max_domain() <= f64::MAX)
    }

    /// Number of repeated zero applications within which `apply(·, 0)` is
    /// guaranteed to reach a fixed point, if it ever settles.
    ///
    /// [`Op2::reduce_zeros`] only looks for a fixed point inside this window.
    /// Operators with a longer transient must raise it.
    fn zero_stability_window(&self) -> usize {
        2
    }

    /// Display name used in errors and trace output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// True if every value of `output` lies in `[min_value, max_value]`
    fn validate_output(&self, output: &[f64]) -> bool {
        let min = self.min_value();
        let max = self.max_value();
        output.iter().all(|&d| !(d < min || d > max))
    }

    /// Copies `src[offset..offset + length]` into the same range of `dest`,
    /// clamping every value into the operator's output range.
    ///
    /// Unbounded operators copy the range verbatim.
    fn constrain_values(
        &self,
        src: &[f64],
        dest: &mut [f64],
        offset: usize,
        length: usize,
    ) -> Result<()> {
        let len = src.len().min(dest.len());
        let end = offset.checked_add(length).ok_or(OpError::IndexOutOfBounds {
            index: usize::MAX,
            len,
        })?;
        let (Some(src), Some(dest)) = (src.get(offset..end), dest.get_mut(offset..end)) else {
            return Err(OpError::IndexOutOfBounds { index: end, len });
        };

        if !self.is_bounded() {
            dest.copy_from_slice(src);
            return Ok(());
        }

        let min = self.min_value();
        let max = self.max_value();
        for (d, &v) in dest.iter_mut().zip(src) {
            *d = if v > max {
                max
            } else if v < min {
                min
            } else {
                v
            };
        }
        Ok(())
    }

    /// Folds `apply(·, 0.0)` over `length` zeros starting from `init`.
    ///
    /// For deterministic operators the recurrence usually settles quickly, so
    /// the fold stops at the first fixed point found within
    /// [`Op2::zero_stability_window`] steps. Outside the window it falls back
    /// to the full loop. Stochastic operators always run the full loop.
    fn reduce_zeros(&self, init: f64, length: usize) -> f64 {
        if length == 0 {
            return init;
        }
        if length == 1 {
            return self.apply(init, 0.0);
        }

        if self.is_stochastic() {
            let mut acc = init;
            for _ in 0..length {
                acc = self.apply(acc, 0.0);
            }
            return acc;
        }

        let window = self.zero_stability_window().clamp(1, length);
        let mut prev = init;
        for _ in 0..window {
            let next = self.apply(prev, 0.0);
            if next.to_bits() == prev.to_bits() {
                return next;
            }
            prev = next;
        }

        tracing::debug!(
            op = self.name(),
            window,
            length,
            "reduce_zeros: no fixed point inside window, running full loop"
        );
        for _ in window..length {
            prev = self.apply(prev, 0.0);
        }
        prev
    }

    /// Applies the operator element-wise into `target`, broadcasting `source`.
    ///
    /// See [`crate::kernels::apply::apply_to`].
    fn apply_to<T, S>(&self, target: &mut T, source: &S) -> Result<()>
    where
        Self: Sized,
        T: NumericTarget + ?Sized,
        S: NumericSource + ?Sized,
    {
        apply::apply_to(self, target, source)
    }

    /// Applies the operator to `target[start..start + length]` only.
    ///
    /// See [`crate::kernels::apply::apply_to_range`].
    fn apply_to_range<V, S>(&self, target: &mut V, start: isize, length: usize, source: &S) -> Result<()>
    where
        Self: Sized,
        V: DenseVector + ?Sized,
        S: NumericSource + ?Sized,
    {
        apply::apply_to_range(self, target, start, length, source)
    }

    /// Applies `apply(x, b)` to every element of `data`.
    fn apply_scalar_to_buffer(&self, data: &mut [f64], b: f64)
    where
        Self: Sized,
    {
        apply::apply_scalar_to_buffer(self, data, b)
    }
}

/// Adapts any `Fn(f64, f64) -> f64` closure into an [`Op2`].
///
/// Capabilities beyond `apply` keep their defaults, except that the adapter
/// can be marked stochastic for closures drawing random values.
#[derive(Clone)]
pub struct FnOp<F> {
    f: F,
    name: &'static str,
    stochastic: bool,
}

impl<F> FnOp<F>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self::named("FnOp", f)
    }

    pub fn named(name: &'static str, f: F) -> Self {
        FnOp {
            f,
            name,
            stochastic: false,
        }
    }

    /// Marks the operator stochastic, disabling the `reduce_zeros` shortcut.
    pub fn stochastic(mut self) -> Self {
        self.stochastic = true;
        self
    }
}

impl<F> Op2 for FnOp<F>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    #[inline(always)]
    fn apply(&self, x: f64, y: f64) -> f64 {
        (self.f)(x, y)
    }

    fn is_stochastic(&self) -> bool {
        self.stochastic
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<F> fmt::Debug for FnOp<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOp")
            .field("name", &self.name)
            .field("stochastic", &self.stochastic)
            .finish()
    }
}
