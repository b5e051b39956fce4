use crate::model::ModelArtifact;
use crate::scoring::features::FeatureVector;
use crate::types::config::ScoreScale;
use crate::types::scoring::{Rating, ScoreResult};

pub fn linear_predictor(vector: &FeatureVector, artifact: &ModelArtifact) -> f64 {
    debug_assert_eq!(vector.values().len(), artifact.coefficients().len());
    let dot: f64 = vector
        .values()
        .iter()
        .zip(artifact.coefficients())
        .map(|(value, coefficient)| value * coefficient)
        .sum();
    dot + artifact.intercept()
}

/// Logistic transform that saturates instead of overflowing for large |x|.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Truncates toward zero; never rounds.
pub fn credit_score(default_probability: f64, scale: ScoreScale) -> i64 {
    let non_default_probability = 1.0 - default_probability;
    (scale.base_score + non_default_probability * scale.scale_length) as i64
}

pub fn rating_for(score: i64) -> Rating {
    match score {
        300..=499 => Rating::Poor,
        500..=649 => Rating::Average,
        650..=749 => Rating::Good,
        750..=900 => Rating::Excellent,
        _ => Rating::Undefined,
    }
}

pub fn score(vector: &FeatureVector, artifact: &ModelArtifact, scale: ScoreScale) -> ScoreResult {
    let x = linear_predictor(vector, artifact);
    let default_probability = sigmoid(x);
    let credit_score = credit_score(default_probability, scale);
    let rating = rating_for(credit_score);
    tracing::debug!(x, default_probability, credit_score, %rating, "scored feature vector");
    ScoreResult {
        default_probability,
        credit_score,
        rating,
    }
}
