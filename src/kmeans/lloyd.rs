//! Lloyd's iteration driver.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::{debug, info};

use super::Scalar;
use super::assignment::{assign, nearest_center};
use super::convergence::{ConvergenceMetric, drift};
use super::distance::squared_distance;
use super::seeding::kmeans_plus_plus;
use super::update::update;
use crate::config::{ConfigError, KMeansConfig};
use crate::error::{KMeansError, Result};

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering<T> {
    /// One row per cluster; the row index is the cluster id.
    pub centers: Array2<T>,
    /// Cluster id of every data point, computed against the centers as they
    /// were before the final update.
    pub assignments: Vec<usize>,
    /// Number of assignment + update passes executed.
    pub iterations: usize,
    /// Convergence metric between the last two center sets.
    pub drift: T,
    /// Whether the run stopped because `drift` fell to the threshold.
    pub converged: bool,
}

impl<T: Scalar> Clustering<T> {
    #[must_use]
    pub fn into_parts(self) -> (Array2<T>, Vec<usize>) {
        (self.centers, self.assignments)
    }

    /// Sum of squared distances from each point to its assigned center.
    ///
    /// # Errors
    /// Fails when `data` is not the dataset this result was computed from
    /// (row count or dimensionality differ).
    pub fn inertia(&self, data: ArrayView2<'_, T>) -> Result<T> {
        if data.nrows() != self.assignments.len() {
            return Err(KMeansError::AssignmentMismatch {
                points: data.nrows(),
                assignments: self.assignments.len(),
            });
        }
        self.check_dims(data.ncols())?;

        let mut total = T::zero();
        for (point, &cluster) in data.outer_iter().zip(&self.assignments) {
            total += squared_distance(point, self.centers.row(cluster));
        }
        Ok(total)
    }

    /// Cluster id of the center closest to `point`.
    ///
    /// # Errors
    /// Returns [`KMeansError::DimensionMismatch`] when `point` has the wrong
    /// length.
    pub fn predict(&self, point: ArrayView1<'_, T>) -> Result<usize> {
        self.check_dims(point.len())?;
        nearest_center(point, self.centers.view())
            .map(|(index, _)| index)
            .ok_or(KMeansError::ZeroClusters)
    }

    fn check_dims(&self, found: usize) -> Result<()> {
        if found == self.centers.ncols() {
            Ok(())
        } else {
            Err(KMeansError::DimensionMismatch {
                expected: self.centers.ncols(),
                found,
            })
        }
    }
}

/// Reusable clustering parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans<T> {
    k: usize,
    max_iter: usize,
    seed: Option<u64>,
    epsilon: T,
    metric: ConvergenceMetric,
}

impl<T: Scalar> KMeans<T> {
    /// Runner with no fixed seed, a zero threshold and the global centroid
    /// metric.
    #[must_use]
    pub fn new(k: usize, max_iter: usize) -> Self {
        Self {
            k,
            max_iter,
            seed: None,
            epsilon: T::zero(),
            metric: ConvergenceMetric::default(),
        }
    }

    /// Builds a runner from a validated configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the configuration fails
    /// validation or its threshold is not representable in `T`.
    pub fn from_config(config: &KMeansConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let epsilon = T::from(config.epsilon).ok_or_else(|| ConfigError::Invalid {
            name: "epsilon",
            reason: format!("{} does not fit the point type", config.epsilon),
        })?;
        Ok(Self {
            k: config.k,
            max_iter: config.max_iter,
            seed: config.seed,
            epsilon,
            metric: config.metric,
        })
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: ConvergenceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Partitions the rows of `data` into `k` clusters.
    ///
    /// Seeds once with k-means++, then alternates assignment and update until
    /// the drift between successive centers is at most `epsilon` or
    /// `max_iter` passes have run.
    ///
    /// # Errors
    /// Returns a [`KMeansError`] when `k` or `max_iter` is zero, when `data`
    /// has fewer than `k` rows or more rows than `T` can count, when `epsilon`
    /// is negative, or when no seed is configured and the OS entropy source
    /// fails.
    pub fn fit(&self, data: ArrayView2<'_, T>) -> Result<Clustering<T>> {
        self.check_preconditions(data)?;

        let mut centers = kmeans_plus_plus(data, self.k, self.seed)?;
        let mut iterations = 0;

        loop {
            let assignments = assign(data, centers.view())?;
            let previous = centers;
            let outcome = update(data, &assignments, previous.view())?;
            centers = outcome.centers;
            iterations += 1;

            let drift = drift(self.metric, centers.view(), previous.view())?;
            debug!(
                iteration = iterations,
                drift = ?drift,
                empty_clusters = outcome.empty_clusters,
                "lloyd iteration finished"
            );

            let converged = drift <= self.epsilon;
            if converged || iterations >= self.max_iter {
                info!(
                    k = self.k,
                    points = data.nrows(),
                    dims = data.ncols(),
                    iterations,
                    drift = ?drift,
                    converged,
                    metric = %self.metric,
                    "k-means finished"
                );
                return Ok(Clustering {
                    centers,
                    assignments,
                    iterations,
                    drift,
                    converged,
                });
            }
        }
    }

    fn check_preconditions(&self, data: ArrayView2<'_, T>) -> Result<()> {
        if self.k == 0 {
            return Err(KMeansError::ZeroClusters);
        }
        if self.max_iter == 0 {
            return Err(KMeansError::ZeroIterations);
        }
        if data.nrows() < self.k {
            return Err(KMeansError::InsufficientData {
                points: data.nrows(),
                k: self.k,
            });
        }
        // every cluster size and k itself are at most the row count
        if T::from(data.nrows()).is_none() {
            return Err(KMeansError::NumericOverflow {
                value: data.nrows(),
            });
        }
        match self.epsilon.partial_cmp(&T::zero()) {
            Some(Ordering::Less) | None => Err(KMeansError::InvalidEpsilon),
            Some(_) => Ok(()),
        }
    }
}

/// Runs k-means on the rows of `data`.
///
/// `seed` makes the run deterministic; `None` draws a seed from the OS.
///
/// # Errors
/// See [`KMeans::fit`].
pub fn cluster<T: Scalar>(
    data: ArrayView2<'_, T>,
    k: usize,
    max_iter: usize,
    seed: Option<u64>,
    epsilon: T,
) -> Result<Clustering<T>> {
    KMeans::new(k, max_iter)
        .with_seed(seed)
        .with_epsilon(epsilon)
        .fit(data)
}
