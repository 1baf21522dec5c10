//! Euclidean distance primitives.

use ndarray::ArrayView1;

use super::Scalar;

/// Sum of squared component differences, accumulated in `T`.
///
/// Callers guarantee equal lengths; the public entry points check shapes
/// before reaching this.
#[must_use]
pub(crate) fn squared_distance<T: Scalar>(a: ArrayView1<'_, T>, b: ArrayView1<'_, T>) -> T {
    a.iter().zip(b.iter()).fold(T::zero(), |acc, (&x, &y)| {
        let delta = x - y;
        acc + delta * delta
    })
}

/// Euclidean distance. Integer types truncate the square root.
#[must_use]
pub(crate) fn distance<T: Scalar>(a: ArrayView1<'_, T>, b: ArrayView1<'_, T>) -> T {
    sqrt(squared_distance(a, b))
}

pub(crate) fn sqrt<T: Scalar>(value: T) -> T {
    // every signed primitive converts to f64, and the root of a value fits back into its own type
    value
        .to_f64()
        .map(f64::sqrt)
        .and_then(T::from)
        .unwrap_or_else(T::zero)
}
