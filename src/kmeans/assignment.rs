//! Nearest-center assignment.

use ndarray::{ArrayView1, ArrayView2};

use super::Scalar;
use super::distance::squared_distance;
use crate::error::{KMeansError, Result};

/// Index of the closest center and its squared distance, or `None` when
/// there are no centers. Ties keep the lowest index.
///
/// `point` must have as many components as each center has columns.
#[must_use]
pub(crate) fn nearest_center<T: Scalar>(
    point: ArrayView1<'_, T>,
    centers: ArrayView2<'_, T>,
) -> Option<(usize, T)> {
    let mut rows = centers.outer_iter().enumerate();
    let (_, first) = rows.next()?;
    let mut best = (0, squared_distance(point, first));
    for (index, center) in rows {
        let candidate = squared_distance(point, center);
        if candidate < best.1 {
            best = (index, candidate);
        }
    }
    Some(best)
}

fn check_dims<T>(data: ArrayView2<'_, T>, centers: ArrayView2<'_, T>) -> Result<()> {
    if data.ncols() == centers.ncols() {
        Ok(())
    } else {
        Err(KMeansError::DimensionMismatch {
            expected: centers.ncols(),
            found: data.ncols(),
        })
    }
}

/// Maps every row of `data` to the index of its nearest center.
///
/// # Errors
/// Returns [`KMeansError::DimensionMismatch`] when `data` and `centers`
/// differ in column count, and [`KMeansError::ZeroClusters`] when there are
/// no centers.
pub fn assign<T: Scalar>(
    data: ArrayView2<'_, T>,
    centers: ArrayView2<'_, T>,
) -> Result<Vec<usize>> {
    check_dims(data, centers)?;
    data.outer_iter()
        .map(|point| {
            nearest_center(point, centers)
                .map(|(index, _)| index)
                .ok_or(KMeansError::ZeroClusters)
        })
        .collect()
}

/// Squared distance from every row of `data` to its nearest center.
///
/// # Errors
/// Same conditions as [`assign`].
pub fn closest_distances<T: Scalar>(
    data: ArrayView2<'_, T>,
    centers: ArrayView2<'_, T>,
) -> Result<Vec<T>> {
    check_dims(data, centers)?;
    data.outer_iter()
        .map(|point| {
            nearest_center(point, centers)
                .map(|(_, dist)| dist)
                .ok_or(KMeansError::ZeroClusters)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn assigns_each_point_to_the_nearest_center() {
        let data = array![[0.0_f64, 0.0], [1.0, 1.0], [8.0, 8.0], [9.0, 9.0]];
        let centers = array![[9.0_f64, 9.0], [0.0, 0.0]];
        assert_eq!(assign(data.view(), centers.view()), Ok(vec![1, 1, 0, 0]));
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let data = array![[0.0_f64], [5.0]];
        let centers = array![[-1.0_f64], [1.0], [-1.0]];
        assert_eq!(assign(data.view(), centers.view()), Ok(vec![0, 1]));
    }

    #[test]
    fn closest_distances_use_the_nearest_center() {
        let data = array![[0_i64, 0], [3, 4], [10, 0]];
        let centers = array![[0_i64, 0], [10, 1]];
        assert_eq!(
            closest_distances(data.view(), centers.view()),
            Ok(vec![0, 25, 1])
        );
    }

    #[test]
    fn centers_with_fewer_columns_are_rejected() {
        let data = array![[0.0_f64, 100.0], [0.0, -100.0]];
        let centers = array![[0.0_f64], [50.0]];
        let expected = Err(KMeansError::DimensionMismatch {
            expected: 1,
            found: 2,
        });

        assert_eq!(assign(data.view(), centers.view()), expected);
        assert_eq!(
            closest_distances(data.view(), centers.view()),
            Err(KMeansError::DimensionMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn centers_with_more_columns_are_rejected() {
        let data = array![[1_i32], [2]];
        let centers = array![[1_i32, 1]];
        assert_eq!(
            assign(data.view(), centers.view()),
            Err(KMeansError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn no_centers_is_an_error() {
        let data = array![[1.0_f32, 2.0]];
        let centers = ndarray::Array2::<f32>::zeros((0, 2));
        assert!(nearest_center(data.row(0), centers.view()).is_none());
        assert_eq!(
            assign(data.view(), centers.view()),
            Err(KMeansError::ZeroClusters)
        );
    }
}
