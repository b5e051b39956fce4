pub mod json;
pub mod md;

use crate::error::RiskError;
use crate::insights::Narrative;
use crate::scoring::Assessment;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

#[derive(Debug, Serialize)]
pub struct AssessmentReport<'a> {
    pub assessment: &'a Assessment,
    pub narrative: Option<&'a Narrative>,
}

pub fn render(report: &AssessmentReport<'_>, format: OutputFormat) -> Result<String, RiskError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RiskError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}

#[cfg(test)]
pub(crate) fn sample_assessment() -> Assessment {
    use crate::model::fixture_artifact;
    use crate::scoring::assess_credit;
    use crate::types::config::ScoreScale;
    use crate::types::profile::sample_profile;

    assess_credit(&sample_profile(), &fixture_artifact(), ScoreScale::default())
        .expect("assessment should succeed")
}
