//! Static lookup tables mapping form choices to the integer codes the
//! classifier was trained on.

use serde::Serialize;

use super::domain::{
    ApplicantInput, Education, Gender, HomeOwnership, LoanInput, LoanPurpose, PreviousDefault,
};

/// Categorical form fields with an encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Gender,
    Education,
    Purpose,
    HomeOwnership,
    PreviousDefault,
}

impl CategoricalField {
    pub fn label(self) -> &'static str {
        match self {
            CategoricalField::Gender => "gender",
            CategoricalField::Education => "education",
            CategoricalField::Purpose => "purpose",
            CategoricalField::HomeOwnership => "home ownership",
            CategoricalField::PreviousDefault => "previous default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("'{value}' is not a recognised {} choice", .field.label())]
    UnknownValue {
        field: CategoricalField,
        value: String,
    },
}

/// A closed set of form choices with a display label and a trained code.
pub trait Categorical: Copy + Sized + 'static {
    const FIELD: CategoricalField;
    /// Choices in the order the form lists them; the first is the default.
    const UI_ORDER: &'static [Self];

    fn label(self) -> &'static str;
    fn code(self) -> i64;

    fn parse_label(raw: &str) -> Result<Self, EncodingError> {
        let wanted = raw.trim();
        Self::UI_ORDER
            .iter()
            .copied()
            .find(|choice| choice.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EncodingError::UnknownValue {
                field: Self::FIELD,
                value: raw.to_string(),
            })
    }
}

impl Categorical for Gender {
    const FIELD: CategoricalField = CategoricalField::Gender;
    const UI_ORDER: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    fn code(self) -> i64 {
        match self {
            Gender::Male => 1,
            Gender::Female => 0,
        }
    }
}

impl Categorical for Education {
    const FIELD: CategoricalField = CategoricalField::Education;
    const UI_ORDER: &'static [Self] = &[
        Education::Master,
        Education::HighSchool,
        Education::Bachelor,
        Education::Associate,
        Education::Doctorate,
    ];

    fn label(self) -> &'static str {
        match self {
            Education::Doctorate => "Doctorate",
            Education::Associate => "Associate",
            Education::Bachelor => "Bachelor",
            Education::HighSchool => "High School",
            Education::Master => "Master",
        }
    }

    fn code(self) -> i64 {
        match self {
            Education::Doctorate => 0,
            Education::Associate => 1,
            Education::Bachelor => 2,
            Education::HighSchool => 3,
            Education::Master => 4,
        }
    }
}

impl Categorical for LoanPurpose {
    const FIELD: CategoricalField = CategoricalField::Purpose;
    const UI_ORDER: &'static [Self] = &[
        LoanPurpose::Personal,
        LoanPurpose::Education,
        LoanPurpose::Medical,
        LoanPurpose::Venture,
        LoanPurpose::HomeImprovement,
        LoanPurpose::DebtConsolidation,
    ];

    fn label(self) -> &'static str {
        match self {
            LoanPurpose::DebtConsolidation => "DEBTCONSOLIDATION",
            LoanPurpose::Education => "EDUCATION",
            LoanPurpose::HomeImprovement => "HOMEIMPROVEMENT",
            LoanPurpose::Medical => "MEDICAL",
            LoanPurpose::Personal => "PERSONAL",
            LoanPurpose::Venture => "VENTURE",
        }
    }

    fn code(self) -> i64 {
        match self {
            LoanPurpose::DebtConsolidation => 0,
            LoanPurpose::Education => 1,
            LoanPurpose::HomeImprovement => 2,
            LoanPurpose::Medical => 3,
            LoanPurpose::Personal => 4,
            LoanPurpose::Venture => 5,
        }
    }
}

impl Categorical for HomeOwnership {
    const FIELD: CategoricalField = CategoricalField::HomeOwnership;
    const UI_ORDER: &'static [Self] = &[
        HomeOwnership::Rent,
        HomeOwnership::Own,
        HomeOwnership::Mortgage,
        HomeOwnership::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            HomeOwnership::Mortgage => "MORTGAGE",
            HomeOwnership::Other => "OTHER",
            HomeOwnership::Own => "OWN",
            HomeOwnership::Rent => "RENT",
        }
    }

    fn code(self) -> i64 {
        match self {
            HomeOwnership::Mortgage => 0,
            HomeOwnership::Other => 1,
            HomeOwnership::Own => 2,
            HomeOwnership::Rent => 3,
        }
    }
}

impl Categorical for PreviousDefault {
    const FIELD: CategoricalField = CategoricalField::PreviousDefault;
    const UI_ORDER: &'static [Self] = &[PreviousDefault::Yes, PreviousDefault::No];

    fn label(self) -> &'static str {
        match self {
            PreviousDefault::Yes => "Yes",
            PreviousDefault::No => "No",
        }
    }

    fn code(self) -> i64 {
        match self {
            PreviousDefault::Yes => 1,
            PreviousDefault::No => 0,
        }
    }
}

/// Encode a raw form label for `field`.
///
/// Labels outside the field's fixed choice list are rejected rather than
/// mapped to a fallback code.
pub fn encode(field: CategoricalField, value: &str) -> Result<i64, EncodingError> {
    match field {
        CategoricalField::Gender => Gender::parse_label(value).map(Categorical::code),
        CategoricalField::Education => Education::parse_label(value).map(Categorical::code),
        CategoricalField::Purpose => LoanPurpose::parse_label(value).map(Categorical::code),
        CategoricalField::HomeOwnership => {
            HomeOwnership::parse_label(value).map(Categorical::code)
        }
        CategoricalField::PreviousDefault => {
            PreviousDefault::parse_label(value).map(Categorical::code)
        }
    }
}

/// Codes for the five categorical inputs of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedCategories {
    pub gender: i64,
    pub education: i64,
    pub purpose: i64,
    pub home_ownership: i64,
    pub previous_default: i64,
}

impl EncodedCategories {
    pub fn from_inputs(applicant: &ApplicantInput, loan: &LoanInput) -> Self {
        Self {
            gender: applicant.gender.code(),
            education: applicant.education.code(),
            purpose: loan.purpose.code(),
            home_ownership: applicant.home_ownership.code(),
            previous_default: loan.previous_default.code(),
        }
    }
}
