use crate::report::AssessmentReport;

pub fn to_json(report: &AssessmentReport<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Narrative;
    use crate::report::sample_assessment;
    use serde_json::Value;

    #[test]
    fn json_report_contains_score_fields() {
        let assessment = sample_assessment();
        let narrative = Narrative::Generated {
            text: "Low risk.".to_string(),
        };
        let report = AssessmentReport {
            assessment: &assessment,
            narrative: Some(&narrative),
        };

        let rendered = to_json(&report).expect("json should serialize");
        let value: Value = serde_json::from_str(&rendered).expect("json should parse back");
        assert_eq!(value["assessment"]["result"]["credit_score"], 813);
        assert_eq!(value["assessment"]["result"]["rating"], "Excellent");
        assert_eq!(value["assessment"]["risk_level"], "low");
        assert_eq!(value["assessment"]["profile"]["residence_type"], "Owned");
        assert_eq!(value["narrative"]["source"], "generated");
        assert_eq!(value["narrative"]["text"], "Low risk.");
    }

    #[test]
    fn json_report_serializes_missing_narrative_as_null() {
        let assessment = sample_assessment();
        let report = AssessmentReport {
            assessment: &assessment,
            narrative: None,
        };
        let rendered = to_json(&report).expect("json should serialize");
        assert!(rendered.contains("\"narrative\": null"));
    }
}
