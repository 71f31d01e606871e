// src/core/types.rs
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WsdError};

/// Index of a sense label inside a [`SenseSet`].
pub type SenseId = usize;

/// Context words of one instance, deduplicated, in first-seen order.
pub type FeatureSet = IndexSet<String>;

/// The closed set of sense labels for one run, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseSet {
    labels: Vec<String>,
}

impl SenseSet {
    /// Needs at least two distinct, non-empty labels.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = IndexSet::new();
        for label in labels {
            let label = label.into();
            if label.is_empty() {
                return Err(WsdError::config_field("empty sense label", "senses"));
            }
            if !seen.insert(label.clone()) {
                return Err(WsdError::config_field(
                    format!("sense label '{label}' listed twice"),
                    "senses",
                ));
            }
        }
        if seen.len() < 2 {
            return Err(WsdError::config_field(
                format!("need at least two sense labels, got {}", seen.len()),
                "senses",
            ));
        }
        Ok(Self {
            labels: seen.into_iter().collect(),
        })
    }

    pub fn id(&self, label: &str) -> Option<SenseId> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn label(&self, id: SenseId) -> &str {
        &self.labels[id]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One occurrence of the target word, cleaned and tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    /// Gold sense; present only in labeled data.
    pub sense: Option<String>,
    /// Normalized tokens of the sentence holding the target, target included.
    pub context: Vec<String>,
    pub target_index: usize,
    /// Normalized sentence text, used by substring matching.
    pub sentence: String,
}

impl Instance {
    pub fn target(&self) -> &str {
        &self.context[self.target_index]
    }
}

/// The sense assigned to one test instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub instance_id: String,
    pub sense: String,
}
