pub mod features;
pub mod scorer;

use crate::error::Result;
use crate::model::ModelArtifact;
use crate::types::config::ScoreScale;
use crate::types::profile::ApplicantProfile;
use crate::types::scoring::{RiskLevel, ScoreResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Non-fatal conditions recovered during scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    ZeroIncome,
    DegenerateScaling { feature: String },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::ZeroIncome => {
                "income is zero; loan-to-income ratio was set to 0".to_string()
            }
            Advisory::DegenerateScaling { feature } => {
                format!("scaler range for {feature} is degenerate; scaled value set to 0")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub generated_at: DateTime<Utc>,
    pub profile: ApplicantProfile,
    pub loan_to_income: f64,
    pub result: ScoreResult,
    pub risk_level: RiskLevel,
    pub advisories: Vec<Advisory>,
    pub model_fingerprint: Option<String>,
}

pub fn assess_credit(
    profile: &ApplicantProfile,
    artifact: &ModelArtifact,
    scale: ScoreScale,
) -> Result<Assessment> {
    let vector = features::build_features(profile, artifact)?;
    let result = scorer::score(&vector, artifact, scale);

    let mut advisories = Vec::new();
    if profile.income <= 0.0 {
        advisories.push(Advisory::ZeroIncome);
    }
    advisories.extend(
        artifact
            .degenerate_scaled_features()
            .into_iter()
            .map(|feature| Advisory::DegenerateScaling {
                feature: feature.to_string(),
            }),
    );

    tracing::info!(
        credit_score = result.credit_score,
        rating = %result.rating,
        default_probability = result.default_probability,
        "applicant assessed"
    );

    Ok(Assessment {
        generated_at: Utc::now(),
        profile: profile.clone(),
        loan_to_income: profile.loan_to_income(),
        risk_level: RiskLevel::from_probability(result.default_probability),
        result,
        advisories,
        model_fingerprint: artifact.fingerprint().map(str::to_string),
    })
}
