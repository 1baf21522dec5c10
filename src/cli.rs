//! Command line front end: reads points as JSON, prints the clustering as JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ndarray::Array2;
use serde::Serialize;
use tracing::info;

use crate::config::KMeansConfig;
use crate::kmeans::{Clustering, ConvergenceMetric, KMeans, points_to_array};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file holding an array of equal-length number arrays ("-" reads stdin)
    #[arg(long, env = "KMEANS_INPUT", default_value = "-")]
    pub input: PathBuf,

    /// YAML configuration file; flags override its values
    #[arg(long, env = "KMEANS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of clusters
    #[arg(short, long, env = "KMEANS_K")]
    pub k: Option<usize>,

    /// Maximum number of Lloyd iterations
    #[arg(long, env = "KMEANS_MAX_ITER")]
    pub max_iter: Option<usize>,

    /// Seed for k-means++; omit for a seed from the OS
    #[arg(long, env = "KMEANS_SEED")]
    pub seed: Option<u64>,

    /// Convergence threshold on center drift
    #[arg(long, env = "KMEANS_EPSILON")]
    pub epsilon: Option<f64>,

    /// Drift metric: global_centroid or max_shift
    #[arg(long, env = "KMEANS_METRIC")]
    pub metric: Option<ConvergenceMetric>,
}

impl Cli {
    /// Merges the optional config file with the flags given on the command
    /// line. Only the merged result is validated, so a flag can supply or
    /// correct a value the file lacks.
    ///
    /// # Errors
    /// Fails when the config file cannot be loaded, when neither source
    /// provides `k`, or when the merged configuration is invalid.
    pub fn resolve_config(&self) -> Result<KMeansConfig> {
        let mut config = match (&self.config, self.k) {
            (Some(path), _) => KMeansConfig::read_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            (None, Some(k)) => KMeansConfig::new(k),
            (None, None) => anyhow::bail!("cluster count is required: pass --k or --config"),
        };

        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(max_iter) = self.max_iter {
            config.max_iter = max_iter;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(metric) = self.metric {
            config.metric = metric;
        }

        config
            .validate()
            .context("validating merged configuration")?;
        Ok(config)
    }
}

/// JSON document written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub centers: Vec<Vec<f64>>,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub drift: f64,
    pub converged: bool,
    pub inertia: f64,
}

impl Report {
    /// # Errors
    /// Fails when `data` is not the dataset `clustering` was computed from.
    pub fn new(clustering: Clustering<f64>, data: &Array2<f64>) -> Result<Self> {
        let inertia = clustering.inertia(data.view())?;
        Ok(Self {
            centers: clustering
                .centers
                .outer_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            assignments: clustering.assignments,
            iterations: clustering.iterations,
            drift: clustering.drift,
            converged: clustering.converged,
            inertia,
        })
    }
}

/// Parses a JSON array of points into a data matrix.
///
/// # Errors
/// Fails on malformed JSON or points of differing length.
pub fn parse_points(raw: &str) -> Result<Array2<f64>> {
    let points: Vec<Vec<f64>> = serde_json::from_str(raw).context("parsing points as JSON")?;
    Ok(points_to_array(&points)?)
}

/// Clusters `data` as described by `config`.
///
/// # Errors
/// Propagates configuration and clustering errors.
pub fn cluster_points(config: &KMeansConfig, data: &Array2<f64>) -> Result<Report> {
    let runner = KMeans::<f64>::from_config(config)?;
    let clustering = runner.fit(data.view())?;
    Report::new(clustering, data)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("reading points from stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Runs the whole command: load, cluster, print.
///
/// # Errors
/// Returns any input, configuration or clustering failure with context.
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let data = parse_points(&read_input(&cli.input)?)?;
    info!(
        points = data.nrows(),
        dims = data.ncols(),
        k = config.k,
        max_iter = config.max_iter,
        seeded = config.seed.is_some(),
        "clustering input"
    );

    let report = cluster_points(&config, &data)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &report).context("writing report")?;
    writeln!(out).context("writing report")?;
    Ok(())
}
