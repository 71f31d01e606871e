// File: src/learning.rs
use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{TieBreak, WsdConfig};
use crate::core::decision_list::{DecisionList, Rule};
use crate::core::features::FeatureExtractor;
use crate::core::stats::{Discovery, FeatureStats};
use crate::core::types::{Instance, SenseId, SenseSet};
use crate::errors::{Result, WsdError};

/// Learns a decision list from labeled instances.
pub struct DecisionListTrainer {
    senses: SenseSet,
    smoothing: f64,
    tie_break: TieBreak,
    extractor: FeatureExtractor,
}

impl DecisionListTrainer {
    pub fn new(config: &WsdConfig) -> Result<Self> {
        config.validate()?;
        let senses = config.sense_set()?;
        if senses.len() != 2 {
            return Err(WsdError::UnsupportedSenseArity {
                count: senses.len(),
            });
        }
        Ok(Self {
            senses,
            smoothing: config.smoothing,
            tie_break: config.tie_break,
            extractor: FeatureExtractor::new(config.window),
        })
    }

    /// Builds the feature statistics table in one parallel pass.
    pub fn tally(&self, instances: &[Instance]) -> Result<FeatureStats> {
        let labeled = instances
            .par_iter()
            .map(|instance| -> Result<_> {
                let sense = self.sense_of(instance)?;
                Ok((sense, self.extractor.extract(instance)))
            })
            .collect::<Result<Vec<_>>>()?;

        let senses = self.senses.len();
        let stats = labeled
            .par_iter()
            .enumerate()
            .fold(
                || FeatureStats::new(senses),
                |mut acc, (index, (sense, features))| {
                    acc.add_instance(index, *sense, features);
                    acc
                },
            )
            .reduce(|| FeatureStats::new(senses), FeatureStats::merge);
        Ok(stats)
    }

    /// Scores every feature and orders the survivors into a decision list.
    pub fn fit(&self, stats: &FeatureStats) -> Result<DecisionList> {
        if stats.is_empty() {
            return Err(WsdError::EmptyTrainingSet);
        }
        let majority = majority_sense(stats.instances_of_sense());

        let mut ranked: Vec<(Rule, Discovery)> = stats
            .iter()
            .filter_map(|(feature, row)| {
                let (a, b) = (row.counts[0], row.counts[1]);
                let score = log_likelihood(a, b, self.smoothing);
                // equal counts give exactly ln(1) = 0: uninformative
                if score <= 0.0 {
                    return None;
                }
                let sense = match a.cmp(&b) {
                    Ordering::Greater => 0,
                    Ordering::Less => 1,
                    Ordering::Equal => majority,
                };
                let rule = Rule {
                    feature: feature.to_string(),
                    score,
                    sense,
                };
                Some((rule, row.first_seen))
            })
            .collect();

        ranked.sort_by(|(x, x_seen), (y, y_seen)| {
            y.score.total_cmp(&x.score).then_with(|| match self.tie_break {
                TieBreak::Lexicographic => x.feature.cmp(&y.feature),
                TieBreak::Discovery => x_seen.cmp(y_seen),
            })
        });
        let rules: Vec<Rule> = ranked.into_iter().map(|(rule, _)| rule).collect();

        info!(
            instances = stats.total_instances(),
            features = stats.feature_count(),
            rules = rules.len(),
            majority = self.senses.label(majority),
            "trained decision list"
        );
        for rule in rules.iter().take(10) {
            debug!(
                feature = %rule.feature,
                score = rule.score,
                sense = self.senses.label(rule.sense),
                "top rule"
            );
        }
        Ok(DecisionList::new(self.senses.clone(), rules, majority))
    }

    pub fn train(&self, instances: &[Instance]) -> Result<DecisionList> {
        if instances.is_empty() {
            return Err(WsdError::EmptyTrainingSet);
        }
        let stats = self.tally(instances)?;
        self.fit(&stats)
    }

    fn sense_of(&self, instance: &Instance) -> Result<SenseId> {
        let label = instance
            .sense
            .as_deref()
            .ok_or_else(|| WsdError::malformed(&instance.id, "training instance has no sense"))?;
        self.senses
            .id(label)
            .ok_or_else(|| WsdError::UnknownSenseLabel {
                label: label.to_string(),
                instance: instance.id.clone(),
            })
    }
}

/// Most frequent sense; the first in canonical order wins a tie.
pub fn majority_sense(instances_of_sense: &[u64]) -> SenseId {
    let mut best = 0;
    for (sense, &count) in instances_of_sense.iter().enumerate() {
        if count > instances_of_sense[best] {
            best = sense;
        }
    }
    best
}

/// |ln(a / b)| with `smoothing` standing in for a zero count.
pub fn log_likelihood(a: u64, b: u64, smoothing: f64) -> f64 {
    let smooth = |c: u64| if c == 0 { smoothing } else { c as f64 };
    (smooth(a) / smooth(b)).ln().abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labeled(id: &str, sense: &str, words: &[&str]) -> Instance {
        let mut context = vec!["line".to_string()];
        context.extend(words.iter().map(|w| w.to_string()));
        Instance {
            id: id.into(),
            sense: Some(sense.into()),
            sentence: context.join(" "),
            context,
            target_index: 0,
        }
    }

    fn phone_product_corpus() -> Vec<Instance> {
        vec![
            labeled("1", "phone", &["call", "item"]),
            labeled("2", "phone", &["call"]),
            labeled("3", "phone", &["call"]),
            labeled("4", "product", &["sold", "item"]),
            labeled("5", "product", &["sold"]),
        ]
    }

    fn trainer() -> DecisionListTrainer {
        DecisionListTrainer::new(&WsdConfig::default()).unwrap()
    }

    #[test]
    fn score_is_symmetric_and_smoothed() {
        assert_relative_eq!(log_likelihood(3, 0, 0.001), (3.0f64 / 0.001).ln());
        assert_relative_eq!(log_likelihood(0, 3, 0.001), log_likelihood(3, 0, 0.001));
        assert_eq!(log_likelihood(4, 4, 0.001), 0.0);
    }

    #[test]
    fn majority_tie_goes_to_first_canonical_sense() {
        assert_eq!(majority_sense(&[2, 3]), 1);
        assert_eq!(majority_sense(&[3, 3]), 0);
        assert_eq!(majority_sense(&[0, 0]), 0);
    }

    #[test]
    fn learns_the_phone_product_rules() {
        let model = trainer().train(&phone_product_corpus()).unwrap();
        let rules: Vec<_> = model
            .rules()
            .iter()
            .map(|r| (r.feature.as_str(), model.label(r.sense)))
            .collect();

        assert_eq!(rules, vec![("call", "phone"), ("sold", "product")]);
        assert_eq!(model.majority_label(), "phone");
        assert!(model.rules().iter().all(|r| r.score > 0.0));
        assert_relative_eq!(model.rules()[0].score, (3.0f64 / 0.001).ln());
    }

    #[test]
    fn tally_counts_every_ingested_instance() {
        let corpus = phone_product_corpus();
        let stats = trainer().tally(&corpus).unwrap();
        assert_eq!(stats.total_instances(), corpus.len() as u64);
        assert_eq!(stats.count("item", 0), 1);
        assert_eq!(stats.count("item", 1), 1);
    }

    #[test]
    fn equal_scores_follow_the_configured_tie_break() {
        let corpus = vec![
            labeled("1", "phone", &["zebra", "dial"]),
            labeled("2", "phone", &["apple"]),
        ];
        let lexical = trainer().train(&corpus).unwrap();
        let order: Vec<_> = lexical.rules().iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(order, vec!["apple", "dial", "zebra"]);

        let config = WsdConfig {
            tie_break: TieBreak::Discovery,
            ..WsdConfig::default()
        };
        let seen = DecisionListTrainer::new(&config).unwrap().train(&corpus).unwrap();
        let order: Vec<_> = seen.rules().iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(order, vec!["zebra", "dial", "apple"]);
    }

    #[test]
    fn training_is_deterministic() {
        let corpus = phone_product_corpus();
        let first = trainer().train(&corpus).unwrap();
        for _ in 0..5 {
            assert_eq!(trainer().train(&corpus).unwrap(), first);
        }
    }

    #[test]
    fn rejects_empty_and_unknown_labels() {
        assert!(matches!(trainer().train(&[]), Err(WsdError::EmptyTrainingSet)));

        let corpus = vec![labeled("9", "cord", &["rope"])];
        let err = trainer().train(&corpus).unwrap_err();
        assert!(matches!(err, WsdError::UnknownSenseLabel { ref label, .. } if label == "cord"));
    }

    #[test]
    fn three_senses_are_refused() {
        let config = WsdConfig {
            senses: vec!["a".into(), "b".into(), "c".into()],
            ..WsdConfig::default()
        };
        assert!(matches!(
            DecisionListTrainer::new(&config),
            Err(WsdError::UnsupportedSenseArity { count: 3 })
        ));
    }
}
