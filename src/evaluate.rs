// File: src/evaluate.rs
//! Scores predicted senses against a gold key.

use indexmap::IndexMap;
use tracing::warn;

use crate::core::types::{Prediction, SenseSet};
use crate::corpus::ANSWER;
use crate::errors::{Result, WsdError};

/// instance id -> sense label, in stream order.
pub type AnswerKey = IndexMap<String, String>;

/// A label outside the configured sense set. Reported, never fatal here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMismatch {
    pub instance: String,
    pub label: String,
    /// "gold" or "predicted"
    pub side: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    senses: SenseSet,
    pub total: usize,
    pub correct: usize,
    /// rows = gold, columns = predicted, both in canonical sense order
    pub matrix: Vec<Vec<u64>>,
    pub mismatches: Vec<LabelMismatch>,
}

impl Evaluation {
    /// Fraction of instances whose predicted label equals the gold label.
    /// Zero for an empty evaluation.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn cell(&self, gold: &str, predicted: &str) -> u64 {
        match (self.senses.id(gold), self.senses.id(predicted)) {
            (Some(g), Some(p)) => self.matrix[g][p],
            _ => 0,
        }
    }

    pub fn senses(&self) -> &SenseSet {
        &self.senses
    }

    /// Right-aligned table with sense labels as headers.
    pub fn render_matrix(&self) -> String {
        let labels = self.senses.labels();
        let row_width = labels.iter().map(String::len).max().unwrap_or(0);
        let col_widths: Vec<usize> = labels
            .iter()
            .enumerate()
            .map(|(j, label)| {
                let widest = self.matrix.iter().map(|row| row[j].to_string().len()).max();
                label.len().max(widest.unwrap_or(0))
            })
            .collect();

        let mut out = " ".repeat(row_width);
        for (label, &width) in labels.iter().zip(&col_widths) {
            out.push_str(&format!("  {label:>width$}"));
        }
        for (i, label) in labels.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{label:<row_width$}"));
            for (count, &width) in self.matrix[i].iter().zip(&col_widths) {
                out.push_str(&format!("  {count:>width$}"));
            }
        }
        out
    }
}

/// Parses an answers stream or a gold key: one `<answer .../>` per
/// non-blank line.
pub fn parse_answers(text: &str, source_name: &str) -> Result<AnswerKey> {
    let mut key = AnswerKey::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || WsdError::MalformedAnswer {
            line: index + 1,
            content: line.to_string(),
        };
        let cap = ANSWER.captures(line).ok_or_else(malformed)?;
        let (instance, sense) = (&cap[1], &cap[2]);
        if key.insert(instance.to_string(), sense.to_string()).is_some() {
            return Err(WsdError::DuplicateInstance {
                instance: instance.to_string(),
                source_name: source_name.to_string(),
            });
        }
    }
    Ok(key)
}

pub fn answer_key(predictions: &[Prediction]) -> Result<AnswerKey> {
    let mut key = AnswerKey::new();
    for p in predictions {
        if key.insert(p.instance_id.clone(), p.sense.clone()).is_some() {
            return Err(WsdError::DuplicateInstance {
                instance: p.instance_id.clone(),
                source_name: "predictions".to_string(),
            });
        }
    }
    Ok(key)
}

/// Joins predictions and gold labels by instance id. Every id must be on
/// both sides.
pub fn evaluate(predicted: &AnswerKey, gold: &AnswerKey, senses: &SenseSet) -> Result<Evaluation> {
    if let Some(id) = predicted.keys().find(|id| !gold.contains_key(*id)) {
        return Err(WsdError::MissingGoldLabel {
            instance: id.clone(),
        });
    }
    if let Some(id) = gold.keys().find(|id| !predicted.contains_key(*id)) {
        return Err(WsdError::UnknownInstance {
            instance: id.clone(),
        });
    }

    let mut evaluation = Evaluation {
        senses: senses.clone(),
        total: 0,
        correct: 0,
        matrix: vec![vec![0; senses.len()]; senses.len()],
        mismatches: Vec::new(),
    };

    for (id, predicted_label) in predicted {
        let gold_label = &gold[id];
        evaluation.total += 1;
        if gold_label == predicted_label {
            evaluation.correct += 1;
        }

        let gold_sense = lookup(senses, id, gold_label, "gold", &mut evaluation.mismatches);
        let predicted_sense =
            lookup(senses, id, predicted_label, "predicted", &mut evaluation.mismatches);
        if let (Some(g), Some(p)) = (gold_sense, predicted_sense) {
            evaluation.matrix[g][p] += 1;
        }
    }
    Ok(evaluation)
}

fn lookup(
    senses: &SenseSet,
    instance: &str,
    label: &str,
    side: &'static str,
    mismatches: &mut Vec<LabelMismatch>,
) -> Option<usize> {
    let id = senses.id(label);
    if id.is_none() {
        warn!(instance, label, side, "sense label outside the configured set");
        mismatches.push(LabelMismatch {
            instance: instance.to_string(),
            label: label.to_string(),
            side,
        });
    }
    id
}
