// File: src/core/features.rs
use crate::core::types::{FeatureSet, Instance};

/// Picks the context words of an instance that count as evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    window: Option<usize>,
}

impl FeatureExtractor {
    /// `window` limits features to that many tokens on each side of the target.
    pub fn new(window: Option<usize>) -> Self {
        Self { window }
    }

    /// Presence-only: a word seen twice in the sentence is one feature.
    /// The target token itself is never a feature.
    pub fn extract(&self, instance: &Instance) -> FeatureSet {
        let target = instance.target_index;
        let (lo, hi) = match self.window {
            Some(k) => (
                target.saturating_sub(k),
                target.saturating_add(k).min(instance.context.len().saturating_sub(1)),
            ),
            None => (0, instance.context.len().saturating_sub(1)),
        };

        instance
            .context
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != target && i >= lo && i <= hi)
            .map(|(_, token)| token.clone())
            .collect()
    }
}
