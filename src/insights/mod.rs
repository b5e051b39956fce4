pub mod command;
pub mod prompt;

use crate::error::Result;
use crate::scoring::Assessment;
use prompt::{build_prompt, percent, InsightPrompt};
use serde::Serialize;

/// External text-generation collaborator producing a narrative from a prompt.
pub trait InsightGenerator {
    fn generate(&self, prompt: &InsightPrompt) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Narrative {
    Generated { text: String },
    NotConfigured { text: String },
    Fallback { text: String, reason: String },
}

impl Narrative {
    pub fn text(&self) -> &str {
        match self {
            Narrative::Generated { text }
            | Narrative::NotConfigured { text }
            | Narrative::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Narrative::Fallback { .. })
    }
}

/// Asks the generator for insights, substituting a fixed summary when it is
/// absent or fails.
pub fn narrate(assessment: &Assessment, generator: Option<&dyn InsightGenerator>) -> Narrative {
    let Some(generator) = generator else {
        return Narrative::NotConfigured {
            text: not_configured_summary(assessment),
        };
    };

    let prompt = build_prompt(assessment);
    match generator.generate(&prompt) {
        Ok(text) => Narrative::Generated { text },
        Err(err) => {
            tracing::warn!(error = %err, "insight generation failed; using fallback summary");
            let reason = err.to_string();
            Narrative::Fallback {
                text: fallback_summary(assessment, &reason),
                reason,
            }
        }
    }
}

fn not_configured_summary(assessment: &Assessment) -> String {
    let result = &assessment.result;
    format!(
        "**Insight generation not configured**\n\n\
Set `[insights] command` in credit-risk.toml to enable narrative insights.\n\n\
Basic assessment:\n\
- **Credit Score**: {} ({})\n\
- **Default Probability**: {}\n",
        result.credit_score,
        result.rating,
        percent(result.default_probability)
    )
}

pub fn fallback_summary(assessment: &Assessment, reason: &str) -> String {
    let result = &assessment.result;
    let probability = percent(result.default_probability);
    format!(
        "**Error generating insights**: {reason}\n\n\
**Basic Assessment:**\n\
- Credit Score: {score} ({rating})\n\
- Default Probability: {probability}\n\
- Loan to Income Ratio: {lti:.2}\n\n\
The model indicates a **{rating}** credit rating with a {probability} probability of default.\n",
        score = result.credit_score,
        rating = result.rating,
        lti = assessment.loan_to_income,
    )
}
