//! Loan approval prediction: form intake, categorical encoding, feature
//! assembly, classifier scoring, and the result presentation.

pub mod classifier;
pub mod domain;
pub mod encoding;
pub mod features;
pub mod flow;
pub mod model;
pub mod page;
pub mod report;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use classifier::{ApprovalLabel, Classifier, ClassifierError};
pub use domain::{
    ApplicantInput, Education, Gender, HomeOwnership, InputError, LoanApplication, LoanInput,
    LoanPurpose, PreviousDefault,
};
pub use encoding::{encode, Categorical, CategoricalField, EncodedCategories, EncodingError};
pub use features::{assemble, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use flow::{ActiveTab, FlowError, Screen, UiFlowState};
pub use model::{GradientBoostedModel, ModelError, MODEL_ARTIFACT_PATH};
pub use report::{CreditLevel, LoanIncomeChart, PredictionReport, Verdict};
pub use router::{loan_router, LoanApplicationForm};
pub use service::{
    score_application, LoanPredictionService, PageView, PredictionServiceError, Session,
};
pub use session::{SessionError, SessionId, SessionRecord, SessionStore, SESSION_COOKIE};
