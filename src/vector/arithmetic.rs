//! Vector Arithmetic
//!
//! Element-wise addition, subtraction and averaging.

use super::similarity::{check_dimensions, Scalar};
use crate::error::{QueryError, QueryResult};

/// Element-wise sum of two vectors
pub fn add<T: Scalar>(a: &[T], b: &[T]) -> QueryResult<Vec<T>> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(&x, &y)| x + y).collect())
}

/// Subtracts `subtrahend` from `minuend` element-wise
pub fn subtract<T: Scalar>(minuend: &[T], subtrahend: &[T]) -> QueryResult<Vec<T>> {
    check_dimensions(minuend, subtrahend)?;
    Ok(minuend
        .iter()
        .zip(subtrahend)
        .map(|(&x, &y)| x - y)
        .collect())
}

/// Element-wise mean of two vectors
pub fn average<T: Scalar>(a: &[T], b: &[T]) -> QueryResult<Vec<T>> {
    let two = T::from_usize(2);
    Ok(add(a, b)?.into_iter().map(|x| x / two).collect())
}

/// Element-wise sum of any number of vectors
pub fn sum_all<T, V>(vectors: &[V]) -> QueryResult<Vec<T>>
where
    T: Scalar,
    V: AsRef<[T]>,
{
    let (first, rest) = vectors.split_first().ok_or(QueryError::EmptyInput)?;
    let mut sum = first.as_ref().to_vec();
    for v in rest {
        let v = v.as_ref();
        check_dimensions(&sum, v)?;
        for (acc, &x) in sum.iter_mut().zip(v) {
            *acc += x;
        }
    }
    Ok(sum)
}

/// Element-wise mean of any number of vectors
pub fn average_all<T, V>(vectors: &[V]) -> QueryResult<Vec<T>>
where
    T: Scalar,
    V: AsRef<[T]>,
{
    let count = T::from_usize(vectors.len());
    Ok(sum_all(vectors)?.into_iter().map(|x| x / count).collect())
}
