use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::encoding::{Categorical, EncodingError};

pub const AGE_MIN: f64 = 18.0;
pub const CREDIT_SCORE_MIN: f64 = 300.0;
pub const CREDIT_SCORE_MAX: f64 = 900.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Education {
    Doctorate,
    Associate,
    Bachelor,
    HighSchool,
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum HomeOwnership {
    Mortgage,
    Other,
    Own,
    Rent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum LoanPurpose {
    DebtConsolidation,
    Education,
    HomeImprovement,
    Medical,
    Personal,
    Venture,
}

/// Whether the applicant has a loan default already on file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum PreviousDefault {
    Yes,
    No,
}

macro_rules! label_conversions {
    ($($choice:ty),+ $(,)?) => {
        $(
            impl From<$choice> for &'static str {
                fn from(value: $choice) -> Self {
                    value.label()
                }
            }

            impl TryFrom<String> for $choice {
                type Error = EncodingError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    <$choice as Categorical>::parse_label(&value)
                }
            }

            impl FromStr for $choice {
                type Err = EncodingError;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    <$choice as Categorical>::parse_label(value)
                }
            }

            impl fmt::Display for $choice {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

label_conversions!(Gender, Education, HomeOwnership, LoanPurpose, PreviousDefault);

/// Personal attributes captured in the first form section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub age: f64,
    pub income: f64,
    pub employment_experience_years: f64,
    pub credit_score: f64,
    pub credit_history_years: f64,
    pub gender: Gender,
    pub education: Education,
    pub home_ownership: HomeOwnership,
}

/// Requested loan terms captured in the second form section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub amount: f64,
    pub interest_rate_pct: f64,
    pub percent_of_income: f64,
    pub purpose: LoanPurpose,
    pub previous_default: PreviousDefault,
}

/// One submission of the applicant form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant: ApplicantInput,
    pub loan: LoanInput,
}

impl Default for LoanApplication {
    fn default() -> Self {
        Self {
            applicant: ApplicantInput {
                age: AGE_MIN,
                income: 0.0,
                employment_experience_years: 0.0,
                credit_score: CREDIT_SCORE_MIN,
                credit_history_years: 0.0,
                gender: Gender::UI_ORDER[0],
                education: Education::UI_ORDER[0],
                home_ownership: HomeOwnership::UI_ORDER[0],
            },
            loan: LoanInput {
                amount: 0.0,
                interest_rate_pct: 0.0,
                percent_of_income: 0.0,
                purpose: LoanPurpose::UI_ORDER[0],
                previous_default: PreviousDefault::UI_ORDER[0],
            },
        }
    }
}

impl LoanApplication {
    /// Enforce the per-field bounds the input widgets advertise.
    ///
    /// Fields are checked independently; the loan-to-income percentage is not
    /// reconciled against amount and income.
    pub fn validate(&self) -> Result<(), InputError> {
        let applicant = &self.applicant;
        let loan = &self.loan;
        let bounds = [
            ("age", applicant.age, AGE_MIN, None),
            ("income", applicant.income, 0.0, None),
            (
                "employment_experience_years",
                applicant.employment_experience_years,
                0.0,
                None,
            ),
            (
                "credit_score",
                applicant.credit_score,
                CREDIT_SCORE_MIN,
                Some(CREDIT_SCORE_MAX),
            ),
            (
                "credit_history_years",
                applicant.credit_history_years,
                0.0,
                None,
            ),
            ("loan_amount", loan.amount, 0.0, None),
            ("interest_rate_pct", loan.interest_rate_pct, 0.0, None),
            ("percent_of_income", loan.percent_of_income, 0.0, None),
        ];

        for (field, value, min, max) in bounds {
            if !value.is_finite() {
                return Err(InputError::NotFinite { field });
            }
            if value < min || max.is_some_and(|max| value > max) {
                return Err(InputError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}

/// Raised when a numeric field falls outside the range its widget allows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} value {value} is outside the accepted range {}", range_label(.min, .max))]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: Option<f64>,
    },
}

fn range_label(min: &f64, max: &Option<f64>) -> String {
    match max {
        Some(max) => format!("[{min}, {max}]"),
        None => format!(">= {min}"),
    }
}
