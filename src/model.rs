//! # Fee Model
//!
//! The persisted artifact and its in-memory form: a k-nearest-neighbor fee
//! estimator, an optional reference table, and one label encoder per
//! categorical field.
//!
//! - Loads from JSON (`$FEE_MODEL_PATH`, falling back to
//!   `config/fee_model.json`).
//! - The artifact is either the full `[estimator, table, encoders]` bundle
//!   or a bare estimator; the shape is decided once at load time.
//! - Load failures are logged and degrade the service instead of crashing:
//!   the process keeps serving with no estimator and an empty encoder map.
//!
//! Everything here is read-only after startup; handlers share it via `Arc`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_MODEL_PATH: &str = "FEE_MODEL_PATH";
pub const DEFAULT_MODEL_PATH: &str = "config/fee_model.json";

// Field keys as they appear in the artifact's encoder mapping.
pub const FIELD_COUNTRY: &str = "COUNTRY";
pub const FIELD_COURSE_TYPE: &str = "COURSE TYPE";
pub const FIELD_SPECIALIZATION: &str = "COURSE (SPECIALIZATION)";

/// Bijection between a fixed vocabulary of category strings and consecutive
/// integer codes. The code of a value is its index in `classes`; the order
/// is fixed at training time and presented to users as the valid input set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Forward lookup: known value -> integer code. `None` for unknown values.
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == value)
    }

    /// The ordered known-value vocabulary.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Trained k-nearest-neighbor regressor: encoded training rows with their
/// fees. Prediction averages the fees of the `n_neighbors` closest rows by
/// Euclidean distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeEstimator {
    pub n_neighbors: usize,
    pub points: Vec<[f64; 3]>,
    pub fees: Vec<f64>,
}

impl FeeEstimator {
    pub fn predict(&self, row: &[f64; 3]) -> Result<f64> {
        if self.points.is_empty() {
            bail!("estimator has no training data");
        }
        if self.points.len() != self.fees.len() {
            bail!(
                "estimator is inconsistent: {} points vs {} fees",
                self.points.len(),
                self.fees.len()
            );
        }

        let mut by_distance: Vec<(f64, f64)> = self
            .points
            .iter()
            .zip(self.fees.iter())
            .map(|(p, &fee)| (squared_distance(p, row), fee))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

        let k = self.n_neighbors.clamp(1, by_distance.len());
        let sum: f64 = by_distance[..k].iter().map(|(_, fee)| fee).sum();
        Ok(sum / k as f64)
    }
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Reference dataset bundled with the artifact. Unused at inference time;
/// its presence gates `/get_options`, matching the persisted bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceTable {
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
}

/// The two artifact shapes we accept, decided once at load time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtifactFormat {
    /// The expected 3-element bundle: estimator, reference table, encoders.
    FullBundle(FeeEstimator, ReferenceTable, HashMap<String, LabelEncoder>),
    /// A bare estimator with no table and no encoders.
    EstimatorOnly(FeeEstimator),
}

/// Process-wide model state, built once before the server accepts requests.
/// `estimator: None` means the load failed and prediction endpoints report
/// errors instead of crashing.
#[derive(Debug, Default)]
pub struct ModelState {
    pub estimator: Option<FeeEstimator>,
    pub reference: Option<ReferenceTable>,
    pub encoders: HashMap<String, LabelEncoder>,
}

impl ModelState {
    /// The state a failed load leaves behind.
    pub fn degraded() -> Self {
        Self::default()
    }

    pub fn encoder(&self, field: &str) -> Option<&LabelEncoder> {
        self.encoders.get(field)
    }

    /// Load the artifact from `path`. Errors on a missing file or on any
    /// deserialization failure; an estimator-only artifact loads with a
    /// format-mismatch warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("model artifact not found at {}", path.display()));
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading model artifact from {}", path.display()))?;
        let artifact: ArtifactFormat =
            serde_json::from_str(&raw).context("deserializing model artifact")?;

        match artifact {
            ArtifactFormat::FullBundle(estimator, reference, encoders) => Ok(Self {
                estimator: Some(estimator),
                reference: Some(reference),
                encoders,
            }),
            ArtifactFormat::EstimatorOnly(estimator) => {
                warn!("model artifact shape differs from the expected (estimator, table, encoders) bundle; loading estimator alone");
                Ok(Self {
                    estimator: Some(estimator),
                    reference: None,
                    encoders: HashMap::new(),
                })
            }
        }
    }

    /// Load from `$FEE_MODEL_PATH` (or the default path), degrading to an
    /// empty state on failure. Called exactly once at startup.
    pub fn load_or_degraded() -> Self {
        let path = std::env::var(ENV_MODEL_PATH).unwrap_or_else(|_| DEFAULT_MODEL_PATH.into());
        match Self::load(Path::new(&path)) {
            Ok(state) => {
                info!(path = %path, "fee model loaded");
                state
            }
            Err(e) => {
                warn!(error = ?e, path = %path, "failed to load fee model; prediction endpoints will report errors");
                Self::degraded()
            }
        }
    }
}
