use crate::insights::prompt::percent;
use crate::report::AssessmentReport;

pub fn to_markdown(report: &AssessmentReport<'_>) -> String {
    let assessment = report.assessment;
    let result = &assessment.result;
    let profile = &assessment.profile;

    let mut output = String::new();
    output.push_str("# Credit Risk Assessment\n\n");
    output.push_str(&format!(
        "Generated: {}\n\n",
        assessment.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output.push_str("## Results\n\n");
    output.push_str(&format!(
        "- Credit Score: {}\n- Rating: {}\n- Default Probability: {} ({:?} risk)\n- Loan to Income Ratio: {:.2}\n\n",
        result.credit_score,
        result.rating,
        percent(result.default_probability),
        assessment.risk_level,
        assessment.loan_to_income
    ));

    output.push_str("## Applicant\n\n");
    output.push_str(&format!(
        "- Age: {}\n- Income: {}\n- Loan Amount: {}\n- Tenure: {} months\n- Loan Purpose: {}\n- Loan Type: {}\n- Residence Type: {}\n- Open Accounts: {}\n- Credit Utilization: {}%\n- Delinquency: {}%\n- Avg DPD: {}\n\n",
        profile.age,
        profile.income,
        profile.loan_amount,
        profile.loan_tenure_months,
        profile.loan_purpose,
        profile.loan_type,
        profile.residence_type,
        profile.num_open_accounts,
        profile.credit_utilization_ratio,
        profile.delinquency_ratio,
        profile.avg_dpd_per_delinquency
    ));

    output.push_str("## Advisories\n\n");
    if assessment.advisories.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for advisory in &assessment.advisories {
            output.push_str(&format!("- {}\n", advisory.message()));
        }
        output.push('\n');
    }

    if let Some(narrative) = report.narrative {
        output.push_str("## Insights\n\n");
        output.push_str(narrative.text().trim_end());
        output.push('\n');
    }

    if let Some(fingerprint) = &assessment.model_fingerprint {
        output.push_str(&format!("\nModel: sha256:{fingerprint}\n"));
    }

    output
}
