#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Lloyd's k-means clustering seeded with k-means++.
//!
//! The entry point is [`cluster`]; [`KMeans`] exposes the same run with a
//! configurable convergence metric.

pub mod cli;
pub mod config;
pub mod error;
pub mod kmeans;
pub mod observability;

pub use config::{ConfigError, KMeansConfig};
pub use error::{KMeansError, Result};
pub use kmeans::{Clustering, ConvergenceMetric, KMeans, Scalar, cluster, points_to_array};
