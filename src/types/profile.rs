use crate::error::RiskError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidenceType {
    Owned,
    Rented,
    Mortgage,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanPurpose {
    Education,
    Home,
    Auto,
    Personal,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    Secured,
    Unsecured,
}

impl ResidenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owned => "Owned",
            Self::Rented => "Rented",
            Self::Mortgage => "Mortgage",
            Self::Other => "Other",
        }
    }
}

impl LoanPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Home => "Home",
            Self::Auto => "Auto",
            Self::Personal => "Personal",
            Self::Other => "Other",
        }
    }
}

impl LoanType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secured => "Secured",
            Self::Unsecured => "Unsecured",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(ResidenceType, LoanPurpose, LoanType);

/// Raw applicant attributes for a single scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicantProfile {
    pub age: u32,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: u32,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub num_open_accounts: u32,
    pub residence_type: ResidenceType,
    pub loan_purpose: LoanPurpose,
    pub loan_type: LoanType,
}

impl ApplicantProfile {
    /// Requested loan over annual income; zero income yields a zero ratio.
    pub fn loan_to_income(&self) -> f64 {
        if self.income > 0.0 {
            self.loan_amount / self.income
        } else {
            0.0
        }
    }

    /// Domain checks a caller runs before handing the profile to the scorer.
    pub fn validate(&self) -> Result<(), RiskError> {
        let amounts = [
            ("income", self.income),
            ("loan_amount", self.loan_amount),
            ("avg_dpd_per_delinquency", self.avg_dpd_per_delinquency),
        ];
        for (name, value) in amounts {
            if !value.is_finite() {
                return Err(RiskError::InvalidProfile(format!("{name} must be finite")));
            }
            if value < 0.0 {
                return Err(RiskError::InvalidProfile(format!(
                    "{name} must not be negative (found {value})"
                )));
            }
        }

        let percentages = [
            ("delinquency_ratio", self.delinquency_ratio),
            ("credit_utilization_ratio", self.credit_utilization_ratio),
        ];
        for (name, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(RiskError::InvalidProfile(format!(
                    "{name} must be between 0 and 100 (found {value})"
                )));
            }
        }

        if self.loan_tenure_months < 1 {
            return Err(RiskError::InvalidProfile(
                "loan_tenure_months must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> ApplicantProfile {
    ApplicantProfile {
        age: 28,
        income: 120_000.0,
        loan_amount: 256_000.0,
        loan_tenure_months: 36,
        avg_dpd_per_delinquency: 20.0,
        delinquency_ratio: 30.0,
        credit_utilization_ratio: 30.0,
        num_open_accounts: 2,
        residence_type: ResidenceType::Owned,
        loan_purpose: LoanPurpose::Education,
        loan_type: LoanType::Unsecured,
    }
}
