use thiserror::Error;

/// Errors raised by the clustering kernel.
///
/// Apart from [`KMeansError::Entropy`] every variant is a violated
/// precondition: the caller passed arguments no run can succeed with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KMeansError {
    #[error("cluster count must be at least 1")]
    ZeroClusters,

    #[error("iteration budget must be at least 1")]
    ZeroIterations,

    #[error("need at least {k} data points to seed {k} clusters, got {points}")]
    InsufficientData { points: usize, k: usize },

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("assignment vector covers {assignments} points but the dataset has {points}")]
    AssignmentMismatch { points: usize, assignments: usize },

    #[error("cluster index {cluster} is out of range for {k} clusters")]
    ClusterOutOfRange { cluster: usize, k: usize },

    #[error("convergence threshold must be a non-negative number")]
    InvalidEpsilon,

    /// Cluster sizes are divided in the point type itself, so a narrow type
    /// such as `i8` caps the dataset at `i8::MAX` points. The driver checks
    /// this before seeding.
    #[error("value {value} cannot be represented in the point's numeric type")]
    NumericOverflow { value: usize },

    #[error("failed to read seed from OS entropy source: {0}")]
    Entropy(String),
}

pub type Result<T> = std::result::Result<T, KMeansError>;
