//! k-means++ seeding.
//!
//! The first center is drawn uniformly from the dataset; each further center
//! is drawn with probability proportional to the squared distance from a
//! point to its nearest already chosen center.

use ndarray::{Array2, ArrayView2, s};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng, TryRngCore};
use tracing::debug;

use super::Scalar;
use super::assignment::closest_distances;
use crate::error::{KMeansError, Result};

const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;
const LCG_MODULUS: u64 = u64::MAX;

/// Linear congruential generator with Knuth's MMIX multiplier and increment
/// over the modulus `2^64 - 1`.
///
/// Small and fully reproducible: the same seed always yields the same stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn step(&mut self) -> u64 {
        let next = (u128::from(LCG_MULTIPLIER) * u128::from(self.state)
            + u128::from(LCG_INCREMENT))
            % u128::from(LCG_MODULUS);
        // reduced modulo a u64 value, so the narrowing is lossless
        self.state = next as u64;
        self.state
    }
}

impl RngCore for Lcg64 {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Lcg64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Returns `seed` unchanged, or reads a fresh one from the OS when absent.
///
/// # Errors
/// Returns [`KMeansError::Entropy`] when the OS entropy source is unavailable.
pub fn resolve_seed(seed: Option<u64>) -> Result<u64> {
    match seed {
        Some(seed) => Ok(seed),
        None => OsRng
            .try_next_u64()
            .map_err(|err| KMeansError::Entropy(err.to_string())),
    }
}

/// Picks `k` initial centers from the rows of `data` with k-means++.
///
/// With an explicit `seed` the result depends only on `data`, `k` and the
/// seed.
///
/// # Errors
/// Fails when `k` is zero, when `data` has fewer than `k` rows, or when no
/// seed is given and the OS cannot supply one.
pub fn kmeans_plus_plus<T: Scalar>(
    data: ArrayView2<'_, T>,
    k: usize,
    seed: Option<u64>,
) -> Result<Array2<T>> {
    if k == 0 {
        return Err(KMeansError::ZeroClusters);
    }
    if data.nrows() < k {
        return Err(KMeansError::InsufficientData {
            points: data.nrows(),
            k,
        });
    }

    let seed = resolve_seed(seed)?;
    let mut rng = Lcg64::seed_from_u64(seed);
    let mut centers = Array2::<T>::zeros((k, data.ncols()));

    let first = rng.random_range(0..data.nrows());
    centers.row_mut(0).assign(&data.row(first));
    debug!(seed, center = 0, point = first, "k-means++ picked first center");

    for count in 1..k {
        let distances = closest_distances(data, centers.slice(s![..count, ..]))?;
        let weights: Vec<f64> = distances
            .iter()
            .map(|dist| dist.to_f64().unwrap_or(0.0))
            .collect();
        let index = draw_weighted(&mut rng, &weights);
        centers.row_mut(count).assign(&data.row(index));
        debug!(center = count, point = index, "k-means++ picked center");
    }

    Ok(centers)
}

/// Samples an index with probability proportional to `weights`.
///
/// Weights that cannot form a distribution (all zero, negative or not
/// finite) and out-of-range draws both resolve to index 0.
fn draw_weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    let index = match WeightedIndex::<f64>::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(err) => {
            debug!(error = %err, "k-means++ weights degenerate, using first point");
            weights.len()
        }
    };
    if index >= weights.len() { 0 } else { index }
}
