//! Drift between two successive center sets.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::Scalar;
use super::distance::distance;
use crate::config::ConfigError;
use crate::error::{KMeansError, Result};

/// How the driver measures movement between iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceMetric {
    /// Distance between the mean of all current centers and the mean of all
    /// previous centers. Opposite movements of different clusters cancel out.
    #[default]
    GlobalCentroid,
    /// Largest distance any single center moved.
    MaxShift,
}

impl ConvergenceMetric {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlobalCentroid => "global_centroid",
            Self::MaxShift => "max_shift",
        }
    }
}

impl fmt::Display for ConvergenceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConvergenceMetric {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "global_centroid" | "global" => Ok(Self::GlobalCentroid),
            "max_shift" | "max" => Ok(Self::MaxShift),
            other => Err(ConfigError::Invalid {
                name: "metric",
                reason: format!("unknown convergence metric '{other}'"),
            }),
        }
    }
}

/// Measures drift between `current` and `previous` with the given metric.
///
/// # Errors
/// Returns [`KMeansError::DimensionMismatch`] when the two center sets differ
/// in shape, and [`KMeansError::ZeroClusters`] when they are empty.
pub fn drift<T: Scalar>(
    metric: ConvergenceMetric,
    current: ArrayView2<'_, T>,
    previous: ArrayView2<'_, T>,
) -> Result<T> {
    if current.nrows() != previous.nrows() {
        return Err(KMeansError::DimensionMismatch {
            expected: previous.nrows(),
            found: current.nrows(),
        });
    }
    if current.ncols() != previous.ncols() {
        return Err(KMeansError::DimensionMismatch {
            expected: previous.ncols(),
            found: current.ncols(),
        });
    }

    match metric {
        ConvergenceMetric::GlobalCentroid => global_centroid_drift(current, previous),
        ConvergenceMetric::MaxShift => Ok(max_shift(current, previous)),
    }
}

fn global_centroid_drift<T: Scalar>(
    current: ArrayView2<'_, T>,
    previous: ArrayView2<'_, T>,
) -> Result<T> {
    let current_mean = aggregate(current)?;
    let previous_mean = aggregate(previous)?;
    Ok(distance(current_mean.view(), previous_mean.view()))
}

/// Per-dimension mean over every center, treated as one point.
fn aggregate<T: Scalar>(centers: ArrayView2<'_, T>) -> Result<Array1<T>> {
    let count = centers.nrows();
    if count == 0 {
        return Err(KMeansError::ZeroClusters);
    }
    let divisor = T::from(count).ok_or(KMeansError::NumericOverflow { value: count })?;

    let mut sums = Array1::<T>::zeros(centers.ncols());
    for center in centers.outer_iter() {
        sums.zip_mut_with(&center, |sum, &value| *sum += value);
    }
    Ok(sums.mapv_into(|sum| sum / divisor))
}

fn max_shift<T: Scalar>(current: ArrayView2<'_, T>, previous: ArrayView2<'_, T>) -> T {
    current
        .outer_iter()
        .zip(previous.outer_iter())
        .map(|(now, before)| distance(now, before))
        .fold(T::zero(), |widest, shift| if shift > widest { shift } else { widest })
}
