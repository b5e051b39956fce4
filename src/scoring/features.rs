use crate::error::{RiskError, Result};
use crate::model::{ModelArtifact, ScalerRange};
use crate::types::profile::{ApplicantProfile, LoanPurpose, LoanType, ResidenceType};
use std::collections::BTreeMap;

pub const AGE: &str = "age";
pub const LOAN_TENURE_MONTHS: &str = "loan_tenure_months";
pub const NUMBER_OF_OPEN_ACCOUNTS: &str = "number_of_open_accounts";
pub const CREDIT_UTILIZATION_RATIO: &str = "credit_utilization_ratio";
pub const LOAN_TO_INCOME: &str = "loan_to_income";
pub const DELINQUENCY_RATIO: &str = "delinquency_ratio";
pub const AVG_DPD_PER_DELINQUENCY: &str = "avg_dpd_per_delinquency";
pub const RESIDENCE_TYPE_OWNED: &str = "residence_type_Owned";
pub const RESIDENCE_TYPE_RENTED: &str = "residence_type_Rented";
pub const LOAN_PURPOSE_EDUCATION: &str = "loan_purpose_Education";
pub const LOAN_PURPOSE_HOME: &str = "loan_purpose_Home";
pub const LOAN_PURPOSE_PERSONAL: &str = "loan_purpose_Personal";
pub const LOAN_TYPE_UNSECURED: &str = "loan_type_Unsecured";

/// Feature names derived from the applicant profile.
pub const COLLECTED_FEATURES: [&str; 13] = [
    AGE,
    LOAN_TENURE_MONTHS,
    NUMBER_OF_OPEN_ACCOUNTS,
    CREDIT_UTILIZATION_RATIO,
    LOAN_TO_INCOME,
    DELINQUENCY_RATIO,
    AVG_DPD_PER_DELINQUENCY,
    RESIDENCE_TYPE_OWNED,
    RESIDENCE_TYPE_RENTED,
    LOAN_PURPOSE_EDUCATION,
    LOAN_PURPOSE_HOME,
    LOAN_PURPOSE_PERSONAL,
    LOAN_TYPE_UNSECURED,
];

/// Model-ready row, ordered exactly as the artifact's feature list.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

fn indicator(active: bool) -> f64 {
    if active {
        1.0
    } else {
        0.0
    }
}

/// Unscaled named features: profile values, one-hot indicators and placeholders.
pub fn raw_features(profile: &ApplicantProfile, artifact: &ModelArtifact) -> BTreeMap<String, f64> {
    let mut map: BTreeMap<String, f64> = artifact
        .placeholders()
        .iter()
        .map(|(name, value)| (name.clone(), *value))
        .collect();

    let collected = [
        (AGE, f64::from(profile.age)),
        (LOAN_TENURE_MONTHS, f64::from(profile.loan_tenure_months)),
        (NUMBER_OF_OPEN_ACCOUNTS, f64::from(profile.num_open_accounts)),
        (CREDIT_UTILIZATION_RATIO, profile.credit_utilization_ratio),
        (LOAN_TO_INCOME, profile.loan_to_income()),
        (DELINQUENCY_RATIO, profile.delinquency_ratio),
        (AVG_DPD_PER_DELINQUENCY, profile.avg_dpd_per_delinquency),
        (
            RESIDENCE_TYPE_OWNED,
            indicator(profile.residence_type == ResidenceType::Owned),
        ),
        (
            RESIDENCE_TYPE_RENTED,
            indicator(profile.residence_type == ResidenceType::Rented),
        ),
        (
            LOAN_PURPOSE_EDUCATION,
            indicator(profile.loan_purpose == LoanPurpose::Education),
        ),
        (
            LOAN_PURPOSE_HOME,
            indicator(profile.loan_purpose == LoanPurpose::Home),
        ),
        (
            LOAN_PURPOSE_PERSONAL,
            indicator(profile.loan_purpose == LoanPurpose::Personal),
        ),
        (
            LOAN_TYPE_UNSECURED,
            indicator(profile.loan_type == LoanType::Unsecured),
        ),
    ];
    for (name, value) in collected {
        map.insert(name.to_string(), value);
    }

    map
}

/// Min-max normalisation; a collapsed range maps every value to 0.
pub fn min_max_scale(value: f64, range: ScalerRange) -> f64 {
    let span = range.max - range.min;
    if span == 0.0 {
        return 0.0;
    }
    (value - range.min) / span
}

pub fn build_features(profile: &ApplicantProfile, artifact: &ModelArtifact) -> Result<FeatureVector> {
    let mut map = raw_features(profile, artifact);

    for name in artifact.cols_to_scale() {
        let range = artifact.scaler_range(name).ok_or_else(|| {
            RiskError::Configuration(format!("no scaler range for feature {name}"))
        })?;
        let slot = map.get_mut(name).ok_or_else(|| {
            RiskError::Configuration(format!("scaled feature {name} was not constructed"))
        })?;
        if range.is_degenerate() {
            tracing::warn!(feature = %name, "degenerate scaler range; using 0");
        }
        *slot = min_max_scale(*slot, range);
    }

    let values = artifact
        .features()
        .iter()
        .map(|name| {
            map.get(name).copied().ok_or_else(|| {
                RiskError::Configuration(format!("expected feature {name} is missing"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(features = values.len(), "feature vector built");
    Ok(FeatureVector { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixture_artifact;
    use crate::types::profile::sample_profile;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn one_hot_indicators_follow_categories() {
        let artifact = fixture_artifact();
        let map = raw_features(&sample_profile(), &artifact);
        assert_eq!(map[RESIDENCE_TYPE_OWNED], 1.0);
        assert_eq!(map[RESIDENCE_TYPE_RENTED], 0.0);
        assert_eq!(map[LOAN_PURPOSE_EDUCATION], 1.0);
        assert_eq!(map[LOAN_PURPOSE_HOME], 0.0);
        assert_eq!(map[LOAN_PURPOSE_PERSONAL], 0.0);
        assert_eq!(map[LOAN_TYPE_UNSECURED], 1.0);
    }

    #[test]
    fn reference_levels_leave_all_indicators_off() {
        let artifact = fixture_artifact();
        let profile = ApplicantProfile {
            residence_type: ResidenceType::Mortgage,
            loan_purpose: LoanPurpose::Auto,
            loan_type: LoanType::Secured,
            ..sample_profile()
        };
        let map = raw_features(&profile, &artifact);
        for name in [
            RESIDENCE_TYPE_OWNED,
            RESIDENCE_TYPE_RENTED,
            LOAN_PURPOSE_EDUCATION,
            LOAN_PURPOSE_HOME,
            LOAN_PURPOSE_PERSONAL,
            LOAN_TYPE_UNSECURED,
        ] {
            assert_eq!(map[name], 0.0, "{name} should be off");
        }

        let other = ApplicantProfile {
            residence_type: ResidenceType::Other,
            loan_purpose: LoanPurpose::Other,
            ..profile
        };
        assert_eq!(raw_features(&other, &artifact), map);
    }

    #[test]
    fn placeholders_populate_untracked_features() {
        let artifact = fixture_artifact();
        let map = raw_features(&sample_profile(), &artifact);
        assert_eq!(map["zipcode"], 1.0);
        assert_eq!(map["enquiry_count"], 1.0);
    }

    #[test]
    fn zero_income_produces_zero_loan_to_income() {
        let artifact = fixture_artifact();
        let profile = ApplicantProfile {
            income: 0.0,
            ..sample_profile()
        };
        let map = raw_features(&profile, &artifact);
        assert_eq!(map[LOAN_TO_INCOME], 0.0);
        assert!(build_features(&profile, &artifact).is_ok());
    }

    #[test]
    fn min_and_max_scale_to_unit_bounds() {
        let range = ScalerRange {
            min: 18.0,
            max: 70.0,
        };
        assert_eq!(min_max_scale(18.0, range), 0.0);
        assert_eq!(min_max_scale(70.0, range), 1.0);
        assert!(close(min_max_scale(44.0, range), 0.5));
    }

    #[test]
    fn degenerate_range_scales_to_zero() {
        let range = ScalerRange { min: 5.0, max: 5.0 };
        assert_eq!(min_max_scale(5.0, range), 0.0);
        assert_eq!(min_max_scale(42.0, range), 0.0);
    }

    #[test]
    fn vector_follows_artifact_order_and_scaling() {
        let artifact = fixture_artifact();
        let vector = build_features(&sample_profile(), &artifact).expect("features build");
        assert_eq!(vector.values().len(), artifact.features().len());

        let values = vector.values();
        assert!(close(values[0], (28.0 - 18.0) / (70.0 - 18.0)));
        assert!(close(values[1], (36.0 - 6.0) / (60.0 - 6.0)));
        assert!(close(values[2], (2.0 - 1.0) / (4.0 - 1.0)));
        assert!(close(values[4], (256_000.0 / 120_000.0 - 0.3) / (4.6 - 0.3)));
        assert_eq!(&values[7..], &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn building_is_deterministic() {
        let artifact = fixture_artifact();
        let first = build_features(&sample_profile(), &artifact).expect("features build");
        let second = build_features(&sample_profile(), &artifact).expect("features build");
        assert_eq!(first, second);
    }
}
