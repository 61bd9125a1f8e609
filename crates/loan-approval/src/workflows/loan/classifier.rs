use serde::{Deserialize, Serialize};

use super::features::FeatureVector;

/// Binary output of the approval classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLabel {
    Rejected = 0,
    Approved = 1,
}

impl ApprovalLabel {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Scores one assembled row. Implementations are loaded once and shared
/// read-only across sessions.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<ApprovalLabel, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("feature {name} (column {index}) is not a finite number")]
    NonFiniteFeature { index: usize, name: &'static str },
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Reject rows a tree walk would silently route down the wrong branch.
pub(crate) fn ensure_finite(features: &FeatureVector) -> Result<(), ClassifierError> {
    match features
        .named()
        .enumerate()
        .find(|(_, (_, value))| !value.is_finite())
    {
        Some((index, (name, _))) => Err(ClassifierError::NonFiniteFeature { index, name }),
        None => Ok(()),
    }
}
