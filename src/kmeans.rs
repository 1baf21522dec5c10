//! Lloyd's algorithm and its building blocks.
//!
//! Points are the rows of an [`ndarray::Array2`]; the number of columns is
//! the dimensionality shared by the dataset and every center.

use std::fmt::Debug;
use std::ops::AddAssign;

use num_traits::{NumCast, Signed};

pub mod assignment;
pub mod convergence;
pub mod dataset;
pub(crate) mod distance;
pub mod lloyd;
pub mod seeding;
pub mod update;

pub use convergence::ConvergenceMetric;
pub use dataset::points_to_array;
pub use lloyd::{Clustering, KMeans, cluster};

/// Numeric component type of a point.
///
/// Only signed arithmetic types qualify, so unsigned integers are rejected
/// at compile time.
pub trait Scalar: Signed + NumCast + Copy + PartialOrd + AddAssign + Debug + 'static {}

impl<T> Scalar for T where T: Signed + NumCast + Copy + PartialOrd + AddAssign + Debug + 'static {}
