//! Centroid recomputation.

use ndarray::{Array2, ArrayView2};

use super::Scalar;
use crate::error::{KMeansError, Result};

/// Centers produced by one update step.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome<T> {
    pub centers: Array2<T>,
    /// Clusters that received no points and kept their previous center.
    pub empty_clusters: usize,
}

/// Recomputes each center as the mean of the points assigned to it.
///
/// A cluster with no assigned points keeps its row from `previous`
/// unchanged, so the result always has as many rows as `previous`.
///
/// # Errors
/// Fails when `assignments` does not cover `data` row for row, when an
/// assignment names a cluster outside `previous`, when the dataset and
/// centers disagree on dimensionality, or when a cluster size does not fit
/// in `T`.
pub fn update<T: Scalar>(
    data: ArrayView2<'_, T>,
    assignments: &[usize],
    previous: ArrayView2<'_, T>,
) -> Result<UpdateOutcome<T>> {
    if data.ncols() != previous.ncols() {
        return Err(KMeansError::DimensionMismatch {
            expected: previous.ncols(),
            found: data.ncols(),
        });
    }
    if assignments.len() != data.nrows() {
        return Err(KMeansError::AssignmentMismatch {
            points: data.nrows(),
            assignments: assignments.len(),
        });
    }

    let k = previous.nrows();
    let mut sums = Array2::<T>::zeros(previous.raw_dim());
    let mut counts = vec![0_usize; k];

    for (point, &cluster) in data.outer_iter().zip(assignments) {
        if cluster >= k {
            return Err(KMeansError::ClusterOutOfRange { cluster, k });
        }
        counts[cluster] += 1;
        sums.row_mut(cluster)
            .zip_mut_with(&point, |sum, &value| *sum += value);
    }

    let mut empty_clusters = 0;
    for (cluster, (mut center, &count)) in sums.outer_iter_mut().zip(&counts).enumerate() {
        if count == 0 {
            center.assign(&previous.row(cluster));
            empty_clusters += 1;
        } else {
            let divisor = T::from(count).ok_or(KMeansError::NumericOverflow { value: count })?;
            center.mapv_inplace(|sum| sum / divisor);
        }
    }

    Ok(UpdateOutcome {
        centers: sums,
        empty_clusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn centers_become_cluster_means() {
        let data = array![[0.0_f64, 0.0], [1.0, 1.0], [8.0, 8.0], [9.0, 9.0]];
        let previous = array![[0.0_f64, 0.0], [9.0, 9.0]];

        let outcome = update(data.view(), &[0, 0, 1, 1], previous.view()).expect("valid input");

        assert_eq!(outcome.centers, array![[0.5, 0.5], [8.5, 8.5]]);
        assert_eq!(outcome.empty_clusters, 0);
    }

    #[test]
    fn empty_cluster_keeps_previous_center_exactly() {
        let data = array![[1.0_f32, 1.0], [3.0, 3.0]];
        let previous = array![[0.0_f32, 0.0], [123.25, -7.5], [4.0, 4.0]];

        let outcome = update(data.view(), &[0, 0], previous.view()).expect("valid input");

        assert_eq!(outcome.centers.row(0), array![2.0_f32, 2.0]);
        assert_eq!(outcome.centers.row(1), previous.row(1));
        assert_eq!(outcome.centers.row(2), previous.row(2));
        assert_eq!(outcome.empty_clusters, 2);
    }

    #[test]
    fn integer_means_use_integer_division() {
        let data = array![[1_i32], [2], [4]];
        let previous = array![[0_i32]];
        let outcome = update(data.view(), &[0, 0, 0], previous.view()).expect("valid input");
        assert_eq!(outcome.centers, array![[2]]);
    }

    #[test]
    fn cluster_size_beyond_point_type_is_reported() {
        let data = ndarray::Array2::<i8>::zeros((130, 1));
        let previous = array![[0_i8]];
        let err = update(data.view(), &[0; 130], previous.view()).expect_err("130 > i8::MAX");
        assert_eq!(err, KMeansError::NumericOverflow { value: 130 });
    }

    #[test]
    fn out_of_range_assignment_is_rejected() {
        let data = array![[1.0_f64]];
        let previous = array![[0.0_f64]];
        let err = update(data.view(), &[3], previous.view()).expect_err("cluster 3 does not exist");
        assert_eq!(err, KMeansError::ClusterOutOfRange { cluster: 3, k: 1 });
    }

    #[test]
    fn mismatched_dimensions_fail_fast() {
        let data = array![[1.0_f64, 2.0, 3.0]];
        let previous = array![[0.0_f64, 0.0]];
        let err = update(data.view(), &[0], previous.view()).expect_err("3 != 2");
        assert_eq!(err, KMeansError::DimensionMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn assignment_length_must_match_dataset() {
        let data = array![[1.0_f64], [2.0]];
        let previous = array![[0.0_f64]];
        let err = update(data.view(), &[0], previous.view()).expect_err("one assignment short");
        assert_eq!(
            err,
            KMeansError::AssignmentMismatch {
                points: 2,
                assignments: 1
            }
        );
    }
}
