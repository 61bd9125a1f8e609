//! Gradient boosted tree ensemble deserialised from the on-disk artifact.
//!
//! The artifact is JSON: an optional list of `feature_names`, the
//! `init_score` (log-odds prior), a `learning_rate`, and `trees`, each a flat
//! node list rooted at index 0. Split nodes send a row left when
//! `features[feature] <= threshold`; children always sit after their parent.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::classifier::{ensure_finite, ApprovalLabel, Classifier, ClassifierError};
use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Location of the classifier artifact, relative to the working directory.
pub const MODEL_ARTIFACT_PATH: &str = "gb.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyTree { tree });
        }

        for (node, entry) in self.nodes.iter().enumerate() {
            match *entry {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(ModelError::FeatureOutOfRange {
                            tree,
                            node,
                            feature,
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::NonFiniteParameter("threshold"));
                    }
                    for child in [left, right] {
                        if child <= node || child >= self.nodes.len() {
                            return Err(ModelError::ChildOutOfRange { tree, node, child });
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::NonFiniteParameter("leaf value"));
                    }
                }
            }
        }

        Ok(())
    }

    fn evaluate(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ClassifierError> {
        let mut cursor = 0;
        loop {
            match self.nodes.get(cursor) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).copied().ok_or_else(|| {
                        ClassifierError::Unavailable(format!("split on unknown feature {feature}"))
                    })?;
                    let next = if value <= *threshold { *left } else { *right };
                    // Children sit after their parent, so every walk terminates.
                    if next <= cursor {
                        return Err(ClassifierError::Unavailable(format!(
                            "tree node {cursor} links back to node {next}"
                        )));
                    }
                    cursor = next;
                }
                None => {
                    return Err(ClassifierError::Unavailable(format!(
                        "tree node {cursor} missing"
                    )))
                }
            }
        }
    }
}

/// Binary gradient boosting classifier over the 13 loan features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub init_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

impl GradientBoostedModel {
    /// Load the artifact from [`MODEL_ARTIFACT_PATH`].
    pub fn load_default() -> Result<Self, ModelError> {
        Self::load(MODEL_ARTIFACT_PATH)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            trees = model.tree_count(),
            "classifier artifact loaded"
        );
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(names) = &self.feature_names {
            if names.len() != FEATURE_COUNT {
                return Err(ModelError::FeatureCount { found: names.len() });
            }
            for (position, (expected, found)) in FEATURE_NAMES.iter().zip(names).enumerate() {
                if *expected != found.as_str() {
                    return Err(ModelError::FeatureMismatch {
                        position,
                        expected: *expected,
                        found: found.clone(),
                    });
                }
            }
        }

        if !self.init_score.is_finite() {
            return Err(ModelError::NonFiniteParameter("init_score"));
        }
        if !self.learning_rate.is_finite() {
            return Err(ModelError::NonFiniteParameter("learning_rate"));
        }
        if self.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }

        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(index, tree)| tree.validate(index))
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Raw log-odds for the approved class.
    pub fn decision_margin(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        ensure_finite(features)?;
        let values = features.values();
        let mut margin = self.init_score;
        for tree in &self.trees {
            margin += self.learning_rate * tree.evaluate(values)?;
        }
        Ok(margin)
    }

    pub fn approval_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        self.decision_margin(features).map(sigmoid)
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

impl Classifier for GradientBoostedModel {
    /// Approved only when the probability strictly exceeds one half.
    fn predict(&self, features: &FeatureVector) -> Result<ApprovalLabel, ClassifierError> {
        let margin = self.decision_margin(features)?;
        debug!(margin, probability = sigmoid(margin), "gradient boosted ensemble scored row");
        Ok(if margin > 0.0 {
            ApprovalLabel::Approved
        } else {
            ApprovalLabel::Rejected
        })
    }
}

/// Startup failures while reading or checking the classifier artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unable to read classifier artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("classifier artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("classifier artifact contains no trees")]
    EmptyEnsemble,
    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },
    #[error("tree {tree} node {node} points at invalid child {child}")]
    ChildOutOfRange {
        tree: usize,
        node: usize,
        child: usize,
    },
    #[error("tree {tree} node {node} splits on unknown feature {feature}")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: usize,
    },
    #[error("artifact declares {found} features; expected 13")]
    FeatureCount { found: usize },
    #[error("artifact feature {position} is '{found}'; expected '{expected}'")]
    FeatureMismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },
    #[error("classifier {0} must be finite")]
    NonFiniteParameter(&'static str),
}
