use serde::Serialize;

use super::domain::{ApplicantInput, LoanApplication, LoanInput};
use super::encoding::EncodedCategories;

pub const FEATURE_COUNT: usize = 13;

/// Column names in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "person_age",
    "person_income",
    "person_emp_exp",
    "loan_amnt",
    "loan_int_rate",
    "loan_percent_income",
    "cb_person_cred_hist_length",
    "credit_score",
    "Gender_Encoded",
    "person_education_Encoded",
    "loan_intent_Encoded",
    "person_home_ownership_Encoded",
    "previous_loan_defaults_on_file_Encoded",
];

/// Fixed-width row handed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_application(application: &LoanApplication) -> Self {
        let codes = EncodedCategories::from_inputs(&application.applicant, &application.loan);
        assemble(&application.applicant, &application.loan, &codes)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Lay out raw and encoded inputs in [`FEATURE_NAMES`] order.
///
/// The ordering is not checked against the model; a swapped column silently
/// changes predictions.
pub fn assemble(
    applicant: &ApplicantInput,
    loan: &LoanInput,
    codes: &EncodedCategories,
) -> FeatureVector {
    FeatureVector([
        applicant.age,
        applicant.income,
        applicant.employment_experience_years,
        loan.amount,
        loan.interest_rate_pct,
        loan.percent_of_income,
        applicant.credit_history_years,
        applicant.credit_score,
        codes.gender as f64,
        codes.education as f64,
        codes.purpose as f64,
        codes.home_ownership as f64,
        codes.previous_default as f64,
    ])
}
