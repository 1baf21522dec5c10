//! Conversion of row-oriented point collections into a data matrix.

use ndarray::Array2;

use super::Scalar;
use crate::error::{KMeansError, Result};

/// Packs `points` into a matrix with one row per point.
///
/// Works for `Vec<Vec<T>>` as well as fixed-size arrays such as
/// `[[f32; 3]]`. The first point fixes the dimensionality; any point of a
/// different length is rejected rather than padded or truncated.
///
/// # Errors
/// Returns [`KMeansError::DimensionMismatch`] for ragged input.
pub fn points_to_array<T, P>(points: &[P]) -> Result<Array2<T>>
where
    T: Scalar,
    P: AsRef<[T]>,
{
    let dims = points.first().map_or(0, |point| point.as_ref().len());
    let mut flat = Vec::with_capacity(points.len() * dims);
    for point in points {
        let point = point.as_ref();
        if point.len() != dims {
            return Err(KMeansError::DimensionMismatch {
                expected: dims,
                found: point.len(),
            });
        }
        flat.extend_from_slice(point);
    }

    Array2::from_shape_vec((points.len(), dims), flat).map_err(|_| {
        KMeansError::DimensionMismatch {
            expected: dims,
            found: 0,
        }
    })
}
