use crate::scoring::Assessment;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert credit risk analyst providing detailed, actionable insights on loan applications.";

#[derive(Debug, Clone, PartialEq)]
pub struct InsightPrompt {
    pub system: String,
    pub user: String,
}

impl InsightPrompt {
    /// System instruction followed by the request, as a single text block.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Integer part with comma separators, e.g. 1234567.0 -> "1,234,567".
pub fn group_thousands(amount: f64) -> String {
    let whole = amount.trunc().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0.0 && whole > 0 {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

pub fn build_prompt(assessment: &Assessment) -> InsightPrompt {
    let profile = &assessment.profile;
    let result = &assessment.result;

    let user = format!(
        "You are a credit risk analyst providing insights on a loan application. \
Based on the following information, provide a comprehensive risk assessment:

**Applicant Profile:**
- Age: {age} years
- Income: ₹{income}
- Loan Amount Requested: ₹{loan_amount}
- Loan Purpose: {loan_purpose}
- Loan Type: {loan_type}
- Residence Type: {residence_type}

**Financial Metrics:**
- Loan to Income Ratio: {lti:.2}
- Loan Tenure: {tenure} months
- Credit Utilization Ratio: {utilization}%
- Number of Open Accounts: {accounts}
- Delinquency Ratio: {delinquency}%
- Average Days Past Due per Delinquency: {dpd}

**Model Assessment:**
- Credit Score: {score}
- Rating: {rating}
- Default Probability: {probability}

Please provide:
1. **Risk Summary**: A brief overview of the overall credit risk level
2. **Key Risk Factors**: Identify the top 2-3 factors contributing to the risk (positive or negative)
3. **Recommendations**:
   - For the lender: Should they approve/reject and under what conditions?
   - For the borrower: How can they improve their creditworthiness?
4. **Alternative Actions**: Any suggestions for loan restructuring or mitigation strategies

Format your response in markdown with clear sections. Be professional, concise, and actionable.",
        age = profile.age,
        income = group_thousands(profile.income),
        loan_amount = group_thousands(profile.loan_amount),
        loan_purpose = profile.loan_purpose,
        loan_type = profile.loan_type,
        residence_type = profile.residence_type,
        lti = assessment.loan_to_income,
        tenure = profile.loan_tenure_months,
        utilization = profile.credit_utilization_ratio,
        accounts = profile.num_open_accounts,
        delinquency = profile.delinquency_ratio,
        dpd = profile.avg_dpd_per_delinquency,
        score = result.credit_score,
        rating = result.rating,
        probability = percent(result.default_probability),
    );

    InsightPrompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}
