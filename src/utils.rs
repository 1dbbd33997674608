//! # Utilities - *Shape, Stride and Index Sequence Helpers*
//!
//! Pure, side-effect free functions over small integer sequences describing
//! shapes, strides and N-dimensional indices.
//!
//! ## Conventions
//! - Shapes are outermost dimension first.
//! - Strides are row-major (C order): the last dimension is contiguous.
//! - Every function returns a fresh sequence and never mutates its inputs,
//! except the `_into` variants, which write into a caller supplied buffer.

#[cfg(feature = "random")]
use rand::Rng;

use crate::enums::error::{OpError, Result};
use crate::traits::type_unions::Integer;

/// Shape of a rank-0 aggregate.
pub const EMPTY_INT_ARRAY: [i32; 0] = [];

/// Returns a copy of `data` with the element at `index` removed.
pub fn remove_index<T: Copy>(data: &[T], index: usize) -> Result<Vec<T>> {
    let len = data.len();
    if index >= len {
        return Err(OpError::IndexOutOfBounds { index, len });
    }
    let mut result = Vec::with_capacity(len - 1);
    result.extend_from_slice(&data[..index]);
    result.extend_from_slice(&data[index + 1..]);
    Ok(result)
}

/// Returns a copy of `data` in reverse order.
pub fn reverse<T: Copy>(data: &[T]) -> Vec<T> {
    data.iter().rev().copied().collect()
}

/// Returns `[head] ++ tail`.
pub fn cons_array<T: Copy>(head: T, tail: &[T]) -> Vec<T> {
    let mut result = Vec::with_capacity(tail.len() + 1);
    result.push(head);
    result.extend_from_slice(tail);
    result
}

/// Widens `src` into the front of `dst`, returning `dst`.
///
/// Elements of `dst` past `src.len()` are left untouched.
pub fn copy_ints_to_longs_into<'a>(src: &[i32], dst: &'a mut [i64]) -> Result<&'a mut [i64]> {
    if dst.len() < src.len() {
        return Err(OpError::LengthMismatch {
            expected: src.len(),
            found: dst.len(),
        });
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d = i64::from(*s);
    }
    Ok(dst)
}

/// Widens `src` into a freshly allocated `i64` sequence of the same length.
pub fn copy_ints_to_longs(src: &[i32]) -> Vec<i64> {
    src.iter().map(|&x| i64::from(x)).collect()
}

/// Product of every element of `shape`, i.e. the element count it describes.
///
/// Accumulates in `i64` so large shapes of narrow integers do not overflow.
/// The empty shape has product `1`.
pub fn array_product<T: Integer>(shape: &[T]) -> i64 {
    shape.iter().fold(1i64, |acc, &x| acc * x.as_i64())
}

/// Product of `shape[from..to]`. An empty range has product `1`.
pub fn array_product_range<T: Integer>(shape: &[T], from: usize, to: usize) -> Result<i64> {
    if from >= to {
        return Ok(1);
    }
    match shape.get(from..to) {
        Some(dims) => Ok(array_product(dims)),
        None => Err(OpError::IndexOutOfBounds {
            index: to,
            len: shape.len(),
        }),
    }
}

/// Row-major strides for `shape`.
///
/// The last dimension has stride 1 and every preceding stride is the product
/// of all faster-varying dimension sizes, e.g. `[2, 3, 4] -> [12, 4, 1]`.
pub fn calc_strides<T: Integer>(shape: &[T]) -> Vec<T> {
    let mut strides = vec![T::zero(); shape.len()];
    let mut st = T::one();
    for j in (0..shape.len()).rev() {
        strides[j] = st;
        st = st * shape[j];
    }
    strides
}

/// Element-wise equality. Sequences of different length are unequal.
#[inline]
pub fn equals<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a == b
}

/// Random index inside `shape`, using the thread-local generator.
///
/// Component `i` is drawn uniformly from `[0, shape[i])`.
#[cfg(feature = "random")]
pub fn rand_index<T: Integer>(shape: &[T]) -> Result<Vec<T>> {
    rand_index_with(&mut rand::thread_rng(), shape)
}

/// Random index inside `shape`, drawing from `rng`.
///
/// Fails with `InvalidArgument` when any dimension is empty, since no
/// index exists inside it.
#[cfg(feature = "random")]
pub fn rand_index_with<R, T>(rng: &mut R, shape: &[T]) -> Result<Vec<T>>
where
    R: Rng,
    T: Integer,
{
    shape
        .iter()
        .map(|&dim| {
            let n = dim.as_i64();
            if n <= 0 {
                return Err(OpError::invalid(format!(
                    "cannot draw an index from empty dimension of size {}",
                    n
                )));
            }
            Ok(T::from_i64(rng.gen_range(0..n)))
        })
        .collect()
}

/// Sum of element-wise products.
pub fn dot_product<T: Integer>(xs: &[T], ys: &[T]) -> Result<T> {
    if xs.len() != ys.len() {
        return Err(OpError::invalid(format!(
            "Different array sizes: {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    Ok(xs
        .iter()
        .zip(ys)
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y))
}

/// Returns `xs` with one subtracted from every element.
///
/// Unsigned zero elements underflow, so use a signed type for sequences that may hold zeros.
pub fn decrement_all<T: Integer>(xs: &[T]) -> Vec<T> {
    xs.iter().map(|&x| x - T::one()).collect()
}

/// Returns `xs` with one added to every element.
pub fn increment_all<T: Integer>(xs: &[T]) -> Vec<T> {
    xs.iter().map(|&x| x + T::one()).collect()
}

/// Decomposes a row-major flat offset into a per-dimension index for `shape`.
///
/// `index` must have the same length as `shape`; the caller guarantees
/// `flat < array_product(shape)`.
#[inline]
pub fn unravel_index(mut flat: usize, shape: &[usize], index: &mut [usize]) {
    debug_assert_eq!(shape.len(), index.len());
    for d in (0..shape.len()).rev() {
        let n = shape[d];
        if n == 0 {
            index[d] = 0;
            continue;
        }
        index[d] = flat % n;
        flat /= n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_index() {
        assert_eq!(remove_index(&[1, 2, 3, 4], 0).unwrap(), vec![2, 3, 4]);
        assert_eq!(remove_index(&[1, 2, 3, 4], 2).unwrap(), vec![1, 2, 4]);
        assert_eq!(remove_index(&[1, 2, 3, 4], 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            remove_index(&[1, 2], 2),
            Err(OpError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert!(remove_index::<i32>(&[], 0).is_err());
    }

    #[test]
    fn test_reverse_and_cons() {
        assert_eq!(reverse(&[1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(reverse::<i32>(&[]), Vec::<i32>::new());
        assert_eq!(cons_array(9, &[1, 2]), vec![9, 1, 2]);
        assert_eq!(cons_array(9, &EMPTY_INT_ARRAY), vec![9]);
    }

    #[test]
    fn test_copy_ints_to_longs() {
        assert_eq!(copy_ints_to_longs(&[1, -2, i32::MAX]), vec![1, -2, i32::MAX as i64]);

        let mut dst = [0i64; 4];
        let out = copy_ints_to_longs_into(&[5, 6], &mut dst).unwrap();
        assert_eq!(out.to_vec(), vec![5, 6, 0, 0]);

        let mut short = [0i64; 1];
        assert_eq!(
            copy_ints_to_longs_into(&[5, 6], &mut short),
            Err(OpError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_array_product() {
        assert_eq!(array_product(&[2, 3, 4]), 24);
        assert_eq!(array_product::<i32>(&[]), 1);
        assert_eq!(array_product(&[5usize, 0, 7]), 0);
        // i32 elements whose product overflows i32 but not i64
        assert_eq!(array_product(&[100_000i32, 100_000]), 10_000_000_000);

        assert_eq!(array_product_range(&[2, 3, 4], 1, 3).unwrap(), 12);
        assert_eq!(array_product_range(&[2, 3, 4], 2, 2).unwrap(), 1);
        assert!(array_product_range(&[2, 3, 4], 1, 4).is_err());
    }

    #[test]
    fn test_calc_strides() {
        assert_eq!(calc_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(calc_strides(&[5usize]), vec![1]);
        assert_eq!(calc_strides::<i32>(&[]), Vec::<i32>::new());
        assert_eq!(calc_strides(&[3, 1, 2]), vec![2, 2, 1]);
    }

    #[test]
    fn test_equals() {
        assert!(equals(&[1, 2], &[1, 2]));
        assert!(!equals(&[1, 2], &[1, 3]));
        assert!(!equals(&[1, 2], &[1, 2, 3]));
        assert!(equals::<i32>(&[], &[]));
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1, 2, 3], &[4, 5, 6]).unwrap(), 32);
        assert_eq!(dot_product::<i32>(&[], &[]).unwrap(), 0);
        assert!(matches!(
            dot_product(&[1, 2], &[1]),
            Err(OpError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_increment_decrement() {
        assert_eq!(increment_all(&[0, 1, -1]), vec![1, 2, 0]);
        assert_eq!(decrement_all(&[0, 1, -1]), vec![-1, 0, -2]);
        assert_eq!(decrement_all(&increment_all(&[7, 8])), vec![7, 8]);
    }

    #[test]
    fn test_unravel_index() {
        let shape = [2, 3, 4];
        let mut idx = [0usize; 3];
        unravel_index(23, &shape, &mut idx);
        assert_eq!(idx, [1, 2, 3]);
        unravel_index(5, &shape, &mut idx);
        assert_eq!(idx, [0, 1, 1]);

        let strides = calc_strides(&shape);
        for flat in 0..24 {
            unravel_index(flat, &shape, &mut idx);
            assert_eq!(dot_product(&idx, &strides).unwrap(), flat);
        }
    }

    #[cfg(feature = "random")]
    #[test]
    fn test_rand_index_within_shape() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(42);
        let shape = [3i32, 1, 7];
        for _ in 0..200 {
            let idx = rand_index_with(&mut rng, &shape).unwrap();
            assert_eq!(idx.len(), 3);
            for (i, s) in idx.iter().zip(shape.iter()) {
                assert!(*i >= 0 && i < s);
            }
        }
        assert!(rand_index(&[2usize, 0]).is_err());
        assert_eq!(rand_index::<i32>(&[]).unwrap(), Vec::<i32>::new());
    }
}
