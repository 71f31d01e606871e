// File: src/core/stats.rs
use indexmap::IndexMap;

use crate::core::types::{FeatureSet, SenseId};

/// Where a feature was first seen: (instance index, position in that
/// instance's feature set).
pub type Discovery = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    /// Labeled instances containing the feature, per sense.
    pub counts: Vec<u64>,
    pub first_seen: Discovery,
}

/// Per-sense co-occurrence counts, one row per feature.
///
/// Tables built from any partition of a corpus merge into the table the whole
/// corpus would have produced. `first_seen` is kept per row so discovery order
/// survives merging in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureStats {
    instances_of_sense: Vec<u64>,
    rows: IndexMap<String, FeatureRow>,
}

impl FeatureStats {
    pub fn new(sense_count: usize) -> Self {
        Self {
            instances_of_sense: vec![0; sense_count],
            rows: IndexMap::new(),
        }
    }

    pub fn sense_count(&self) -> usize {
        self.instances_of_sense.len()
    }

    /// Records labeled instance number `index`. O(features).
    pub fn add_instance(&mut self, index: usize, sense: SenseId, features: &FeatureSet) {
        let senses = self.sense_count();
        self.instances_of_sense[sense] += 1;
        for (position, feature) in features.iter().enumerate() {
            let row = self
                .rows
                .entry(feature.clone())
                .or_insert_with(|| FeatureRow {
                    counts: vec![0; senses],
                    first_seen: (index, position),
                });
            row.counts[sense] += 1;
            row.first_seen = row.first_seen.min((index, position));
        }
    }

    /// Sums `other` into `self`. Associative and commutative.
    pub fn merge(mut self, other: FeatureStats) -> Self {
        debug_assert_eq!(self.sense_count(), other.sense_count());
        for (mine, theirs) in self.instances_of_sense.iter_mut().zip(&other.instances_of_sense) {
            *mine += theirs;
        }
        for (feature, theirs) in other.rows {
            match self.rows.get_mut(&feature) {
                Some(row) => {
                    for (mine, count) in row.counts.iter_mut().zip(theirs.counts) {
                        *mine += count;
                    }
                    row.first_seen = row.first_seen.min(theirs.first_seen);
                }
                None => {
                    self.rows.insert(feature, theirs);
                }
            }
        }
        self
    }

    pub fn instances_of_sense(&self) -> &[u64] {
        &self.instances_of_sense
    }

    pub fn total_instances(&self) -> u64 {
        self.instances_of_sense.iter().sum()
    }

    pub fn count(&self, feature: &str, sense: SenseId) -> u64 {
        self.rows.get(feature).map_or(0, |row| row.counts[sense])
    }

    pub fn feature_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_instances() == 0
    }

    /// Rows in storage order, which depends on how partial tables were merged.
    /// Sort by `first_seen` for a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureRow)> {
        self.rows.iter().map(|(f, row)| (f.as_str(), row))
    }
}
