use std::fmt::Debug;

use num_traits::PrimInt;

/// Trait for types valid as elements of shape, stride and index sequences.
///
/// Useful when specifying `my_fn::<T: Integer>() {}`.
///
/// Extends and constrains the *num-traits* `PrimInt` implementation with the
/// widening conversions the shape utilities rely on.
pub trait Integer: PrimInt + Default + Debug + 'static {
    /// Widening cast to `i64`. Wraps for `u64`/`usize` values above `i64::MAX`.
    fn as_i64(self) -> i64;

    /// Narrowing cast from `i64`. Callers guarantee the value fits.
    fn from_i64(v: i64) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl Integer for $t {
                #[inline(always)]
                fn as_i64(self) -> i64 {
                    self as i64
                }

                #[inline(always)]
                fn from_i64(v: i64) -> Self {
                    v as $t
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
