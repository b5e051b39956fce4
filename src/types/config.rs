use crate::error::RiskError;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_BASE_SCORE: f64 = 300.0;
pub const DEFAULT_SCALE_LENGTH: f64 = 600.0;
pub const DEFAULT_MODEL_PATH: &str = "artifacts/model_data.json";
pub const DEFAULT_INSIGHT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskConfig {
    pub model: Option<ModelConfig>,
    pub scoring: Option<ScoringConfig>,
    pub insights: Option<InsightsConfig>,
    pub logging: Option<LoggingConfig>,
    /// Layer files merged into this config, lowest precedence first.
    #[serde(skip)]
    pub sources: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub base_score: Option<f64>,
    pub scale_length: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub timeout_secs: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Constants mapping a non-default probability onto the credit score range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreScale {
    pub base_score: f64,
    pub scale_length: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self {
            base_score: DEFAULT_BASE_SCORE,
            scale_length: DEFAULT_SCALE_LENGTH,
        }
    }
}

impl RiskConfig {
    pub fn score_scale(&self) -> ScoreScale {
        let defaults = ScoreScale::default();
        match &self.scoring {
            Some(scoring) => ScoreScale {
                base_score: scoring.base_score.unwrap_or(defaults.base_score),
                scale_length: scoring.scale_length.unwrap_or(defaults.scale_length),
            },
            None => defaults,
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model
            .as_ref()
            .and_then(|model| model.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.as_deref())
    }

    /// The external insight command, if one is configured and enabled.
    pub fn insight_command(&self) -> Option<(&str, &[String], u64)> {
        let insights = self.insights.as_ref()?;
        if !insights.enabled {
            return None;
        }
        let command = insights.command.as_deref()?;
        Some((
            command,
            insights.args.as_slice(),
            insights
                .timeout_secs
                .unwrap_or(DEFAULT_INSIGHT_TIMEOUT_SECS),
        ))
    }

    pub fn validate(&self) -> Result<(), RiskError> {
        let scale = self.score_scale();
        if !scale.base_score.is_finite() || !scale.scale_length.is_finite() {
            return Err(RiskError::ConfigParse(
                "scoring.base_score and scoring.scale_length must be finite".to_string(),
            ));
        }
        if scale.scale_length <= 0.0 {
            return Err(RiskError::ConfigParse(format!(
                "scoring.scale_length must be positive (found {})",
                scale.scale_length
            )));
        }

        if let Some(insights) = &self.insights {
            if let Some(command) = &insights.command {
                if command.trim().is_empty() {
                    return Err(RiskError::ConfigParse(
                        "insights.command must not be empty".to_string(),
                    ));
                }
            }
            if insights.timeout_secs == Some(0) {
                return Err(RiskError::ConfigParse(
                    "insights.timeout_secs must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }
}
