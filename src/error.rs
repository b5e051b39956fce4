use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("model configuration error: {0}")]
    Configuration(String),

    #[error("model artifact not found: {0}")]
    ModelNotFound(String),

    #[error("invalid applicant profile: {0}")]
    InvalidProfile(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("insight generation failed: {0}")]
    Insight(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RiskError>;
