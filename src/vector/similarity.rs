//! Vector Similarity Functions
//!
//! Norm, dot product, cosine similarity and Euclidean distance, generic over
//! the float element type.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use crate::error::{QueryError, QueryResult};

/// Float element type usable by the vector functions
pub trait Scalar:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + Sum
    + std::fmt::Debug
{
    const ZERO: Self;

    fn sqrt(self) -> Self;

    fn from_usize(n: usize) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0.0;

                #[inline]
                fn sqrt(self) -> Self {
                    <$t>::sqrt(self)
                }

                #[inline]
                fn from_usize(n: usize) -> Self {
                    n as $t
                }
            }
        )*
    };
}

impl_scalar!(f32, f64);

#[inline]
pub(crate) fn check_dimensions<T>(a: &[T], b: &[T]) -> QueryResult<()> {
    if a.len() != b.len() {
        return Err(QueryError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Euclidean norm (square root of the sum of squares)
#[inline]
pub fn norm<T: Scalar>(v: &[T]) -> T {
    v.iter().map(|&x| x * x).sum::<T>().sqrt()
}

/// Compute dot product of two vectors
///
/// Uses unrolled loop for better CPU performance.
#[inline]
pub fn dot_product<T: Scalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let len = a.len().min(b.len());
    let mut sum = T::ZERO;

    // Process 4 elements at a time (manual unrolling)
    let chunks = len / 4;
    let remainder = len % 4;

    for i in 0..chunks {
        let idx = i * 4;
        sum += a[idx] * b[idx];
        sum += a[idx + 1] * b[idx + 1];
        sum += a[idx + 2] * b[idx + 2];
        sum += a[idx + 3] * b[idx + 3];
    }

    for i in (len - remainder)..len {
        sum += a[i] * b[i];
    }

    sum
}

/// Cosine similarity of two vectors of equal length.
///
/// Returns a value in `[-1, 1]`; 0 when either vector has zero magnitude.
#[inline]
pub fn cosine_similarity<T: Scalar>(a: &[T], b: &[T]) -> QueryResult<T> {
    check_dimensions(a, b)?;
    Ok(cosine_unchecked(a, b))
}

/// Euclidean distance between two vectors of equal length
#[inline]
pub fn euclidean_distance<T: Scalar>(a: &[T], b: &[T]) -> QueryResult<T> {
    check_dimensions(a, b)?;
    Ok(euclidean_unchecked(a, b))
}

/// Cosine similarity for callers that already validated the dimensions
#[inline]
pub(crate) fn cosine_unchecked<T: Scalar>(a: &[T], b: &[T]) -> T {
    let dot = dot_product(a, b);
    let denom = norm(a) * norm(b);
    if denom > T::ZERO {
        dot / denom
    } else {
        T::ZERO
    }
}

#[inline]
pub(crate) fn euclidean_unchecked<T: Scalar>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<T>()
        .sqrt()
}
