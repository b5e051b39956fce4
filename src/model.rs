//! Loading and load-time validation of the logistic model artifact.

use crate::error::{RiskError, Result};
use crate::scoring::features::COLLECTED_FEATURES;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScalerRange {
    pub min: f64,
    pub max: f64,
}

impl ScalerRange {
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactFile {
    coefficients: Vec<f64>,
    intercept: f64,
    features: Vec<String>,
    cols_to_scale: Vec<String>,
    scaler: BTreeMap<String, ScalerRange>,
    #[serde(default)]
    placeholders: BTreeMap<String, f64>,
}

/// Immutable coefficients, scaler parameters and feature layout of a trained model.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    coefficients: Vec<f64>,
    intercept: f64,
    features: Vec<String>,
    cols_to_scale: Vec<String>,
    scaler: BTreeMap<String, ScalerRange>,
    placeholders: BTreeMap<String, f64>,
    fingerprint: Option<String>,
}

impl ModelArtifact {
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        features: Vec<String>,
        cols_to_scale: Vec<String>,
        scaler: BTreeMap<String, ScalerRange>,
        placeholders: BTreeMap<String, f64>,
    ) -> Result<Self> {
        let artifact = Self {
            coefficients,
            intercept,
            features,
            cols_to_scale,
            scaler,
            placeholders,
            fingerprint: None,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RiskError::ModelNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        let artifact = Self::from_slice(&bytes).map_err(|err| match err {
            RiskError::Json(source) => {
                RiskError::Configuration(format!("{}: {}", path.display(), source))
            }
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            features = artifact.features.len(),
            scaled = artifact.cols_to_scale.len(),
            "model artifact loaded"
        );
        Ok(artifact)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let file: ArtifactFile = serde_json::from_slice(bytes)?;
        let mut artifact = Self::new(
            file.coefficients,
            file.intercept,
            file.features,
            file.cols_to_scale,
            file.scaler,
            file.placeholders,
        )?;
        artifact.fingerprint = Some(format!("{:x}", Sha256::digest(bytes)));
        Ok(artifact)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn cols_to_scale(&self) -> &[String] {
        &self.cols_to_scale
    }

    pub fn scaler_range(&self, feature: &str) -> Option<ScalerRange> {
        self.scaler.get(feature).copied()
    }

    pub fn placeholders(&self) -> &BTreeMap<String, f64> {
        &self.placeholders
    }

    /// SHA-256 of the artifact bytes, when it was read from a file.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Scaled features whose training range collapsed to a single value.
    pub fn degenerate_scaled_features(&self) -> Vec<&str> {
        self.cols_to_scale
            .iter()
            .filter(|name| {
                self.scaler
                    .get(name.as_str())
                    .is_some_and(ScalerRange::is_degenerate)
            })
            .map(String::as_str)
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(RiskError::Configuration(
                "artifact lists no features".to_string(),
            ));
        }
        if self.coefficients.len() != self.features.len() {
            return Err(RiskError::Configuration(format!(
                "artifact has {} coefficients for {} features",
                self.coefficients.len(),
                self.features.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(RiskError::Configuration(
                "artifact coefficients and intercept must be finite".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(RiskError::Configuration(format!(
                    "feature listed more than once: {name}"
                )));
            }
            if !self.is_constructible(name) {
                return Err(RiskError::Configuration(format!(
                    "feature {name} is neither collected from the applicant nor a placeholder"
                )));
            }
        }

        for name in &self.cols_to_scale {
            if !self.is_constructible(name) {
                return Err(RiskError::Configuration(format!(
                    "scaled feature {name} is neither collected from the applicant nor a placeholder"
                )));
            }
            let range = self.scaler.get(name).ok_or_else(|| {
                RiskError::Configuration(format!("no scaler range for feature {name}"))
            })?;
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(RiskError::Configuration(format!(
                    "scaler range for {name} must be finite"
                )));
            }
            if range.is_degenerate() {
                tracing::warn!(feature = %name, "scaler range is degenerate; feature scales to 0");
            }
        }

        if let Some(name) = self
            .placeholders
            .keys()
            .find(|name| COLLECTED_FEATURES.contains(&name.as_str()))
        {
            return Err(RiskError::Configuration(format!(
                "placeholder {name} shadows a feature collected from the applicant"
            )));
        }
        if let Some((name, _)) = self.placeholders.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RiskError::Configuration(format!(
                "placeholder {name} must be finite"
            )));
        }

        Ok(())
    }

    fn is_constructible(&self, name: &str) -> bool {
        COLLECTED_FEATURES.contains(&name) || self.placeholders.contains_key(name)
    }
}

#[cfg(test)]
pub(crate) fn fixture_artifact() -> ModelArtifact {
    ModelArtifact::from_slice(include_bytes!("../tests/fixtures/model_data.json"))
        .expect("fixture artifact should load")
}
