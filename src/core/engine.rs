use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{MatchMode, WsdConfig};
use crate::core::decision_list::DecisionList;
use crate::core::features::FeatureExtractor;
use crate::core::tokenizer::Tokenizer;
use crate::core::types::{Instance, Prediction};
use crate::corpus::{self, Labeling};
use crate::errors::{Result, WsdError};
use crate::learning::DecisionListTrainer;
use crate::stopwords::StopWords;

/// Instances that made it through ingestion, plus the ones that did not.
#[derive(Debug, Default)]
pub struct Ingested {
    pub instances: Vec<Instance>,
    pub skipped: Vec<WsdError>,
}

// The engine wires corpus reading, tokenization, training and tagging
// together. It holds no per-instance state, so one engine serves any number
// of corpora.
pub struct WsdEngine {
    config: WsdConfig,
    tokenizer: Tokenizer,
    extractor: FeatureExtractor,
}

impl WsdEngine {
    pub fn new(config: WsdConfig, stop_words: Arc<dyn StopWords>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(&config, stop_words),
            extractor: FeatureExtractor::new(config.window),
            config,
        })
    }

    pub fn config(&self) -> &WsdConfig {
        &self.config
    }

    /// Parses and tokenizes a corpus. Malformed records are logged and
    /// skipped; the rest keep their file order.
    pub fn ingest(&self, text: &str, labeling: Labeling) -> Ingested {
        let results: Vec<Result<Instance>> = corpus::parse(text, labeling)
            .into_par_iter()
            .map(|record| record.and_then(|raw| self.tokenizer.tokenize(&raw)))
            .collect();

        let mut ingested = Ingested::default();
        for result in results {
            match result {
                Ok(instance) => ingested.instances.push(instance),
                Err(err) => {
                    warn!("skipping instance: {err}");
                    ingested.skipped.push(err);
                }
            }
        }
        info!(
            kept = ingested.instances.len(),
            skipped = ingested.skipped.len(),
            "ingested corpus"
        );
        ingested
    }

    /// Trains on a labeled corpus.
    pub fn train(&self, text: &str) -> Result<DecisionList> {
        let ingested = self.ingest(text, Labeling::Labeled);
        if ingested.instances.is_empty() {
            return Err(WsdError::EmptyTrainingSet);
        }
        DecisionListTrainer::new(&self.config)?.train(&ingested.instances)
    }

    /// One prediction per instance, in input order.
    pub fn predict(&self, model: &DecisionList, instances: &[Instance]) -> Vec<Prediction> {
        let mode: MatchMode = self.config.match_mode;
        instances
            .par_iter()
            .map(|instance| model.predict(instance, &self.extractor.extract(instance), mode))
            .collect()
    }

    /// Most-frequent-sense baseline: every instance gets the majority sense.
    pub fn baseline(&self, model: &DecisionList, instances: &[Instance]) -> Vec<Prediction> {
        instances
            .iter()
            .map(|instance| Prediction {
                instance_id: instance.id.clone(),
                sense: model.majority_label().to_string(),
            })
            .collect()
    }

    /// Tags an unlabeled corpus. Skipped records get no prediction.
    pub fn tag(&self, model: &DecisionList, text: &str) -> Vec<Prediction> {
        let ingested = self.ingest(text, Labeling::Unlabeled);
        self.predict(model, &ingested.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwords::StopWordList;

    fn record(id: &str, sense: &str, sentence: &str) -> String {
        format!(
            "<instance id=\"{id}\">\n<answer instance=\"{id}\" senseid=\"{sense}\"/>\n\
             <context>\n<s> {sentence} </s>\n</context>\n</instance>\n"
        )
    }

    fn engine() -> WsdEngine {
        WsdEngine::new(WsdConfig::default(), Arc::new(StopWordList::english())).unwrap()
    }

    fn training_text() -> String {
        [
            record("1", "phone", "please call the <head>line</head> now"),
            record("2", "phone", "the <head>line</head> was busy , call again"),
            record("3", "product", "a new <head>line</head> of shoes sold well"),
            record("4", "product", "broken record without a target"),
        ]
        .concat()
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let ingested = engine().ingest(&training_text(), Labeling::Labeled);
        assert_eq!(ingested.instances.len(), 3);
        assert_eq!(ingested.skipped.len(), 1);
        assert!(ingested.skipped[0].is_recoverable());
    }

    #[test]
    fn trains_and_tags_in_input_order() {
        let engine = engine();
        let model = engine.train(&training_text()).unwrap();
        assert_eq!(model.majority_label(), "phone");

        let test = [
            record("t1", "?", "shoes on the <head>line</head>"),
            record("t2", "?", "she will call the <head>line</head>"),
            record("t3", "?", "nothing familiar on this <head>line</head>"),
        ]
        .concat();
        let predictions = engine.tag(&model, &test);
        let got: Vec<_> = predictions
            .iter()
            .map(|p| (p.instance_id.as_str(), p.sense.as_str()))
            .collect();
        assert_eq!(got, vec![("t1", "product"), ("t2", "phone"), ("t3", "phone")]);
    }

    #[test]
    fn training_without_usable_records_fails() {
        let text = record("1", "phone", "no target here");
        assert!(matches!(engine().train(&text), Err(WsdError::EmptyTrainingSet)));
    }

    #[test]
    fn baseline_uses_majority_sense() {
        let engine = engine();
        let model = engine.train(&training_text()).unwrap();
        let ingested = engine.ingest(&training_text(), Labeling::Unlabeled);
        assert!(engine
            .baseline(&model, &ingested.instances)
            .iter()
            .all(|p| p.sense == "phone"));
    }
}
