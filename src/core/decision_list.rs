// File: src/core/decision_list.rs
use serde::{Deserialize, Serialize};

use crate::config::MatchMode;
use crate::core::types::{FeatureSet, Instance, Prediction, SenseId, SenseSet};

/// "If `feature` is present, the sense is `sense`", weighted by `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub feature: String,
    /// |ln(c_a / c_b)|, always > 0 for a kept rule.
    pub score: f64,
    pub sense: SenseId,
}

/// A trained model: rules in application order plus the fallback sense.
/// Immutable once built; shared read-only by every prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionList {
    senses: SenseSet,
    rules: Vec<Rule>,
    majority: SenseId,
}

impl DecisionList {
    /// `rules` must already be in application order.
    pub fn new(senses: SenseSet, rules: Vec<Rule>, majority: SenseId) -> Self {
        debug_assert!(rules.windows(2).all(|w| w[0].score >= w[1].score));
        debug_assert!(rules.iter().all(|r| r.score > 0.0));
        Self {
            senses,
            rules,
            majority,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn senses(&self) -> &SenseSet {
        &self.senses
    }

    /// Checks what [`DecisionList::new`] assumes, for models that did not come
    /// from the trainer. Returns the first broken invariant.
    pub fn check(&self) -> Result<(), String> {
        SenseSet::new(self.senses.labels().iter().cloned()).map_err(|e| e.to_string())?;
        let arity = self.senses.len();
        if self.majority >= arity {
            return Err(format!("majority sense {} out of range", self.majority));
        }
        for rule in &self.rules {
            if rule.sense >= arity {
                return Err(format!("rule '{}' has sense {} out of range", rule.feature, rule.sense));
            }
            if !rule.score.is_finite() || rule.score <= 0.0 {
                return Err(format!("rule '{}' has score {}", rule.feature, rule.score));
            }
        }
        if let Some(pair) = self.rules.windows(2).find(|w| w[0].score < w[1].score) {
            return Err(format!("rule '{}' is out of order", pair[1].feature));
        }
        Ok(())
    }

    pub fn majority_label(&self) -> &str {
        self.senses.label(self.majority)
    }

    pub fn label(&self, sense: SenseId) -> &str {
        self.senses.label(sense)
    }

    /// First rule, in list order, whose feature `present` accepts.
    pub fn first_match<F>(&self, present: F) -> Option<&Rule>
    where
        F: Fn(&str) -> bool,
    {
        self.rules.iter().find(|rule| present(&rule.feature))
    }

    /// Sense of the first matching rule, else the majority sense.
    pub fn classify<F>(&self, present: F) -> SenseId
    where
        F: Fn(&str) -> bool,
    {
        self.first_match(present)
            .map_or(self.majority, |rule| rule.sense)
    }

    /// Predicts one instance. No state is carried between calls.
    pub fn predict(&self, instance: &Instance, features: &FeatureSet, mode: MatchMode) -> Prediction {
        let sense = match mode {
            MatchMode::Token => self.classify(|f| features.contains(f)),
            MatchMode::Substring => self.classify(|f| instance.sentence.contains(f)),
        };
        Prediction {
            instance_id: instance.id.clone(),
            sense: self.label(sense).to_string(),
        }
    }
}
